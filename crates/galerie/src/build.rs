use std::{fs, time::Instant};

use colored::Colorize;
use log::info;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::{
    BuildOptions, BuildOutput,
    errors::{GalerieError, GalleryError, ThemeError},
    gallery::{GallerySources, rst},
    hooks::{self, HookContext, Hooks},
    logging::{FormatElapsedTimeOptions, format_elapsed_time, print_title},
};

pub mod metadata;
pub mod options;

pub(crate) fn execute_build(
    sources: &mut GallerySources,
    hooks: &Hooks,
    options: &BuildOptions,
) -> Result<BuildOutput, GalerieError> {
    let build_start = Instant::now();
    let mut build_metadata = BuildOutput::new(build_start);

    let ctx = HookContext::new(options);

    print_title("running build-started hooks");
    hooks::clean_gallery_index(&ctx);
    hooks.run_started(&ctx);

    let result = generate(sources, options, &mut build_metadata);

    // The finished hooks run whether generation succeeded or not, carrying
    // the failure indicator, like the event they mirror.
    print_title("running build-finished hooks");
    hooks::reclean_gallery_index(&ctx, result.is_err());
    hooks.run_finished(&ctx, result.is_err());

    result?;

    info!(target: "SKIP_FORMAT", "{}", "");
    info!(
        target: "build",
        "{}",
        format!(
            "Build completed in {}",
            format_elapsed_time(build_start.elapsed(), &FormatElapsedTimeOptions::section())
        )
        .bold()
    );

    Ok(build_metadata)
}

fn generate(
    sources: &mut GallerySources,
    options: &BuildOptions,
    build_metadata: &mut BuildOutput,
) -> Result<(), GalerieError> {
    let sources_start = Instant::now();
    print_title("initializing gallery sources");

    // Shared across sources, since they all write into the same output
    // directory and the same toctree.
    let mut seen_ids = FxHashMap::default();

    for source in sources.sources_mut() {
        let source_start = Instant::now();
        source.init(&options.gallery, &mut seen_ids)?;

        info!(
            target: "gallery",
            "{} initialized in {} ({} examples)",
            source.name,
            format_elapsed_time(source_start.elapsed(), &FormatElapsedTimeOptions::default()),
            source.entries.len()
        );
    }

    info!(
        target: "gallery",
        "{}",
        format!(
            "Gallery sources initialized in {}",
            format_elapsed_time(sources_start.elapsed(), &FormatElapsedTimeOptions::default())
        )
        .bold()
    );

    print_title("generating gallery pages");
    let pages_start = Instant::now();

    let output_dir = options.gallery_output_dir();
    fs::create_dir_all(&output_dir).map_err(|source| GalleryError::CreateDirFailed {
        path: output_dir.clone(),
        source,
    })?;

    let pages = sources
        .sources()
        .par_iter()
        .flat_map(|source| source.entries.par_iter().map(move |entry| (source, entry)))
        .map(|(source, entry)| {
            let page_start = Instant::now();

            let file_path = output_dir.join(format!("{}.rst", entry.id));
            let contents = rst::example_page(entry, source, options);

            fs::write(&file_path, contents).map_err(|source| GalleryError::WriteFailed {
                path: file_path.clone(),
                source,
            })?;

            info!(
                target: "pages",
                "{} -> {} {}",
                entry.file_path.display(),
                file_path.to_string_lossy().dimmed(),
                format!(
                    "(+{})",
                    format_elapsed_time(page_start.elapsed(), &FormatElapsedTimeOptions::default())
                )
                .dimmed()
            );

            Ok((
                source.name.clone(),
                file_path.to_string_lossy().to_string(),
                entry.file_path.to_string_lossy().to_string(),
            ))
        })
        .collect::<Result<Vec<_>, GalleryError>>()?;

    let page_count = pages.len();
    for (source_name, file_path, example_path) in pages {
        build_metadata.add_page(source_name, file_path, example_path);
    }

    if !sources.is_empty() {
        let index_path = options.gallery_index_path();
        let index = rst::gallery_index(sources.sources(), options);

        fs::write(&index_path, index).map_err(|source| GalleryError::WriteFailed {
            path: index_path.clone(),
            source,
        })?;

        info!(target: "pages", "index -> {}", index_path.to_string_lossy().dimmed());
        build_metadata.index_file = Some(index_path.to_string_lossy().to_string());
    }

    info!(
        target: "pages",
        "{}",
        format!(
            "generated {} pages in {}",
            page_count,
            format_elapsed_time(pages_start.elapsed(), &FormatElapsedTimeOptions::section())
        )
        .bold()
    );

    let theme_context_path = export_theme_context(options)?;
    build_metadata.theme_context = Some(theme_context_path);

    Ok(())
}

/// What the downstream site builder needs to know about the project and its
/// theme, serialized next to the generated pages.
#[derive(Serialize)]
struct ThemeContext<'a> {
    project: &'a str,
    base_url: Option<&'a str>,
    theme: &'a crate::ThemeOptions,
    repository: Option<RepositoryContext<'a>>,
}

#[derive(Serialize)]
struct RepositoryContext<'a> {
    github_user: &'a str,
    github_repo: &'a str,
    github_version: &'a str,
    feedback_url: String,
}

fn export_theme_context(options: &BuildOptions) -> Result<String, ThemeError> {
    let context = ThemeContext {
        project: &options.project,
        base_url: options.base_url.as_deref(),
        theme: &options.theme,
        repository: options.repository.as_ref().map(|repository| RepositoryContext {
            github_user: &repository.github_user,
            github_repo: &repository.github_repo,
            github_version: &repository.github_version,
            feedback_url: repository.resolved_feedback_url(),
        }),
    };

    let yaml = serde_yaml::to_string(&context)
        .map_err(|source| ThemeError::SerializeFailed { source })?;

    let path = options.source_dir.join("theme.yml");
    fs::write(&path, yaml).map_err(|source| ThemeError::WriteFailed {
        path: path.clone(),
        source,
    })?;

    info!(target: "theme", "Theme context exported to {}", path.to_string_lossy().dimmed());

    Ok(path.to_string_lossy().to_string())
}
