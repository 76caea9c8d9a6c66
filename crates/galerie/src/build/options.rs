use std::path::PathBuf;

use serde::Serialize;

/// Galerie build options. Should be passed to [`vernissage()`](crate::vernissage()).
///
/// ## Examples
/// Default values:
/// ```rs
/// use galerie::{gallery_sources, vernissage, BuildOptions, hooks::Hooks};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     vernissage(gallery_sources![], Hooks::new(), BuildOptions::default())?;
///     Ok(())
/// }
/// ```
/// Custom values:
/// ```rs
/// use galerie::{
///     gallery_sources, vernissage, BuildOptions, GalleryOptions, RepositoryOptions,
///     hooks::Hooks,
/// };
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     vernissage(
///         gallery_sources!["examples" => "../../examples"],
///         Hooks::new(),
///         BuildOptions {
///             project: "Brume".into(),
///             source_dir: "docs/source".into(),
///             gallery: GalleryOptions {
///                 filename_pattern: "*.py".into(),
///                 ..Default::default()
///             },
///             repository: Some(RepositoryOptions {
///                 github_user: "bruits".into(),
///                 github_repo: "brume".into(),
///                 ..Default::default()
///             }),
///             ..Default::default()
///         },
///     )?;
///     Ok(())
/// }
/// ```
pub struct BuildOptions {
    /// Name of the documented project, used as the gallery index title and
    /// exported in the theme context.
    pub project: String,

    /// Base URL for the published site, e.g. `https://example.com/project`.
    /// Only exported in the theme context, for themes that generate canonical
    /// and social-sharing URLs.
    pub base_url: Option<String>,

    /// The documentation source directory generated files are written into.
    pub source_dir: PathBuf,

    pub gallery: GalleryOptions,

    pub theme: ThemeOptions,

    /// Repository information, used for edit-on-GitHub links in generated
    /// pages and exported in the theme context. `None` disables both.
    pub repository: Option<RepositoryOptions>,
}

impl BuildOptions {
    /// Returns the path of the generated gallery index,
    /// `<source_dir>/<gallery_dir>/index.rst`.
    pub fn gallery_index_path(&self) -> PathBuf {
        self.gallery_output_dir().join("index.rst")
    }

    /// Returns the directory generated gallery pages are written into,
    /// `<source_dir>/<gallery_dir>`.
    pub fn gallery_output_dir(&self) -> PathBuf {
        self.source_dir.join(&self.gallery.gallery_dir)
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            project: "Documentation".to_string(),
            base_url: None,
            source_dir: "docs".into(),
            gallery: GalleryOptions::default(),
            theme: ThemeOptions::default(),
            repository: None,
        }
    }
}

/// Options controlling gallery scanning and generation.
#[derive(Clone)]
pub struct GalleryOptions {
    /// Directory inside `source_dir` to write generated pages into.
    /// Defaults to `examples`.
    pub gallery_dir: PathBuf,

    /// Glob pattern example scripts must match, relative to each source's
    /// directory. Defaults to `*.py`.
    pub filename_pattern: String,

    /// Glob patterns matched against file names to exclude from scanning.
    /// Defaults to `__init__.py`.
    pub ignore_patterns: Vec<String>,
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self {
            gallery_dir: "examples".into(),
            filename_pattern: "*.py".to_string(),
            ignore_patterns: vec!["__init__.py".to_string()],
        }
    }
}

/// Theme options exported for the downstream site builder.
///
/// Galerie doesn't render HTML itself. These options are written to the theme
/// context file so the tool that turns the source directory into a site can
/// pick them up.
#[derive(Clone, Serialize)]
pub struct ThemeOptions {
    /// Whether the theme should bind prev/next keyboard navigation.
    pub navigation_with_keys: bool,
    /// Analytics container id, e.g. a Google Tag Manager id.
    pub analytics_id: Option<String>,
    /// Links rendered as icons in the site header.
    pub icon_links: Vec<IconLink>,
    /// Whether pages should carry an edit-this-page button. Also gates the
    /// edit links in generated gallery pages.
    pub use_edit_page_button: bool,
}

impl Default for ThemeOptions {
    fn default() -> Self {
        Self {
            navigation_with_keys: false,
            analytics_id: None,
            icon_links: vec![],
            use_edit_page_button: false,
        }
    }
}

/// A single icon link in the site header.
#[derive(Clone, Serialize)]
pub struct IconLink {
    pub name: String,
    pub url: String,
    /// Icon class understood by the theme, e.g. `fa-brands fa-github`.
    pub icon: String,
}

/// Repository information for edit links.
#[derive(Clone, Serialize)]
pub struct RepositoryOptions {
    pub github_user: String,
    pub github_repo: String,
    /// Branch or ref edit links point at. Defaults to `main`.
    pub github_version: String,
    /// URL users should be sent to for feedback, exported in the theme
    /// context. `None` falls back to the repository's issue page.
    pub feedback_url: Option<String>,
}

impl RepositoryOptions {
    /// URL editing `repo_path` on GitHub, on the configured ref.
    pub fn edit_url(&self, repo_path: &str) -> String {
        format!(
            "https://github.com/{}/{}/edit/{}/{}",
            self.github_user,
            self.github_repo,
            self.github_version,
            repo_path.trim_start_matches('/')
        )
    }

    pub(crate) fn resolved_feedback_url(&self) -> String {
        self.feedback_url.clone().unwrap_or_else(|| {
            format!(
                "https://github.com/{}/{}/issues",
                self.github_user, self.github_repo
            )
        })
    }
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            github_user: String::new(),
            github_repo: String::new(),
            github_version: "main".to_string(),
            feedback_url: None,
        }
    }
}
