//! reStructuredText rendering for gallery pages and the gallery index.

use std::path::Path;

use crate::BuildOptions;
use crate::gallery::{ExampleEntry, GallerySource};

/// Renders the generated page for a single example.
pub(crate) fn example_page(
    entry: &ExampleEntry,
    source: &GallerySource,
    options: &BuildOptions,
) -> String {
    let mut rst = String::new();

    rst.push_str(&format!(".. _gallery_{}:\n\n", entry.id));

    rst.push_str(&entry.title);
    rst.push('\n');
    rst.push_str(&"=".repeat(entry.title.chars().count().max(3)));
    rst.push_str("\n\n");

    if !entry.description.is_empty() {
        rst.push_str(&entry.description);
        rst.push_str("\n\n");
    }

    rst.push_str(&format!(
        ".. literalinclude:: {}\n",
        include_path(entry, options).display()
    ));
    if let Some(language) = script_language(&entry.file_path) {
        rst.push_str(&format!("   :language: {}\n", language));
    }
    rst.push('\n');

    if let Some(edit_url) = edit_url(entry, source, options) {
        rst.push_str(&format!(
            ".. raw:: html\n\n    <a class=\"reference external\" href=\"{}\">Edit on GitHub</a>\n",
            escape_html(&edit_url)
        ));
    }

    rst
}

/// Renders the gallery index: header, hidden toctree, then the thumbnail
/// grid.
///
/// The toctree comes before the grid on purpose: the build's truncation hooks
/// cut the file at the grid marker, and what remains must still wire the
/// generated pages into the site's navigation.
pub(crate) fn gallery_index(sources: &[GallerySource], options: &BuildOptions) -> String {
    let mut rst = String::new();

    rst.push_str(".. _gallery_index:\n\n");
    rst.push_str(&options.project);
    rst.push('\n');
    rst.push_str(&"=".repeat(options.project.chars().count().max(3)));
    rst.push_str("\n\n");

    rst.push_str(".. toctree::\n   :hidden:\n\n");
    for source in sources {
        for entry in &source.entries {
            rst.push_str(&format!("   {}\n", entry.id));
        }
    }
    rst.push('\n');

    rst.push_str(".. raw:: html\n\n    <div class=\"sphx-glr-thumbnails\">\n");

    for source in sources {
        for entry in &source.entries {
            rst.push_str(&thumbnail(entry));
        }
    }

    rst.push_str("\n.. raw:: html\n\n    </div>\n");

    rst
}

fn thumbnail(entry: &ExampleEntry) -> String {
    let tooltip = match entry.description.lines().next() {
        Some(line) if !line.is_empty() => line,
        _ => entry.title.as_str(),
    };

    let mut rst = String::new();
    rst.push_str(&format!(
        "\n.. raw:: html\n\n    <div class=\"sphx-glr-thumbcontainer\" tooltip=\"{}\">\n",
        escape_html(tooltip)
    ));
    rst.push_str(&format!("\n.. only:: html\n\n  :ref:`gallery_{}`\n", entry.id));
    rst.push_str(&format!(
        "\n.. raw:: html\n\n      <div class=\"sphx-glr-thumbnail-title\">{}</div>\n    </div>\n",
        escape_html(&entry.title)
    ));
    rst
}

/// Path the generated page includes the script from, relative to the gallery
/// output directory when one can be computed.
fn include_path(entry: &ExampleEntry, options: &BuildOptions) -> std::path::PathBuf {
    pathdiff::diff_paths(&entry.file_path, options.gallery_output_dir())
        .unwrap_or_else(|| entry.file_path.clone())
}

fn edit_url(
    entry: &ExampleEntry,
    source: &GallerySource,
    options: &BuildOptions,
) -> Option<String> {
    if !options.theme.use_edit_page_button {
        return None;
    }

    let repository = options.repository.as_ref()?;
    let prefix = source.repo_prefix.as_ref()?;
    let file_name = entry.file_path.file_name()?.to_string_lossy();

    Some(repository.edit_url(&format!("{}/{}", prefix.trim_end_matches('/'), file_name)))
}

fn script_language(path: &Path) -> Option<&'static str> {
    match path.extension()?.to_str()? {
        "py" => Some("python"),
        "rs" => Some("rust"),
        "sh" => Some("bash"),
        "jl" => Some("julia"),
        _ => None,
    }
}

/// Escapes HTML special characters in attribute values and text.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::truncate::{THUMBNAIL_GRID_MARKER, TruncateOutcome, truncate_at_marker};
    use crate::{RepositoryOptions, ThemeOptions};
    use std::path::PathBuf;

    fn entry(id: &str, title: &str, description: &str) -> ExampleEntry {
        ExampleEntry {
            id: id.to_string(),
            file_path: PathBuf::from(format!("/repo/examples/{}.py", id)),
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    fn source_with(entries: Vec<ExampleEntry>) -> GallerySource {
        let mut source = GallerySource::new("examples", "/repo/examples");
        source.entries = entries;
        source
    }

    #[test]
    fn test_example_page_structure() {
        let options = BuildOptions {
            source_dir: "/repo/docs".into(),
            ..Default::default()
        };
        let source = source_with(vec![]);
        let page = example_page(
            &entry("plot-mesh", "Plot a mesh", "Plots things."),
            &source,
            &options,
        );

        assert!(page.starts_with(".. _gallery_plot-mesh:\n\n"));
        assert!(page.contains("Plot a mesh\n===========\n"));
        assert!(page.contains("Plots things.\n"));
        assert!(page.contains(".. literalinclude:: ../../examples/plot-mesh.py\n"));
        assert!(page.contains("   :language: python\n"));
        assert!(!page.contains("Edit on GitHub"));
    }

    #[test]
    fn test_example_page_edit_link() {
        let options = BuildOptions {
            source_dir: "/repo/docs".into(),
            theme: ThemeOptions {
                use_edit_page_button: true,
                ..Default::default()
            },
            repository: Some(RepositoryOptions {
                github_user: "bruits".into(),
                github_repo: "galerie".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let source = source_with(vec![]).with_repo_prefix("examples");

        let page = example_page(&entry("a", "A", ""), &source, &options);

        assert!(page.contains(
            "href=\"https://github.com/bruits/galerie/edit/main/examples/a.py\""
        ));
    }

    #[test]
    fn test_index_contains_exact_marker() {
        let sources = vec![source_with(vec![entry("a", "A", "")])];

        let index = gallery_index(&sources, &BuildOptions::default());

        assert!(index.contains(&THUMBNAIL_GRID_MARKER.concat()));
        assert!(index.contains("   a\n"));
        assert!(index.contains("<div class=\"sphx-glr-thumbnail-title\">A</div>"));
    }

    #[test]
    fn test_index_title_is_the_project_name() {
        let options = BuildOptions {
            project: "Brume".into(),
            ..Default::default()
        };

        let index = gallery_index(&[source_with(vec![])], &options);

        assert!(index.contains("Brume\n=====\n\n"));
    }

    #[test]
    fn test_index_tooltip_escapes_html() {
        let sources = vec![source_with(vec![entry(
            "a",
            "Mesh <17> & \"more\"",
            "",
        )])];

        let index = gallery_index(&sources, &BuildOptions::default());

        assert!(index.contains("tooltip=\"Mesh &lt;17&gt; &amp; &quot;more&quot;\""));
    }

    #[test]
    fn test_truncating_a_generated_index_keeps_the_toctree() {
        use tempfile::tempdir;

        let sources = vec![source_with(vec![
            entry("a", "A", ""),
            entry("b", "B", ""),
        ])];
        let index = gallery_index(&sources, &BuildOptions::default());

        let dir = tempdir().unwrap();
        let path = dir.path().join("index.rst");
        std::fs::write(&path, &index).unwrap();

        let outcome = truncate_at_marker(&path).unwrap();
        assert!(matches!(outcome, TruncateOutcome::Truncated { .. }));

        let truncated = std::fs::read_to_string(&path).unwrap();
        assert!(truncated.contains(".. toctree::"));
        assert!(truncated.contains("   a\n"));
        assert!(truncated.contains("   b\n"));
        assert!(!truncated.contains("sphx-glr-thumbnails"));
        assert!(index.starts_with(&truncated));
    }
}
