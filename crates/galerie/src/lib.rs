#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Modules the end-user will interact directly or indirectly with
pub mod errors;
pub mod gallery;
pub mod hooks;
pub mod truncate;

// Exports for end-users
pub use build::metadata::{BuildOutput, PageOutput};
pub use build::options::{BuildOptions, GalleryOptions, IconLink, RepositoryOptions, ThemeOptions};

mod build;

// Internal modules
mod logging;

use build::execute_build;
use gallery::GallerySources;
use hooks::Hooks;
use logging::init_logging;

/// Helps to define every gallery source that should be scanned by
/// [`vernissage()`].
///
/// ## Example
/// ```rs
/// use galerie::{gallery_sources, vernissage, BuildOptions, hooks::Hooks};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     vernissage(
///         gallery_sources![
///             "examples" => "../../examples"
///         ],
///         Hooks::new(),
///         BuildOptions::default(),
///     )?;
///     Ok(())
/// }
/// ```
///
/// ## Expand
/// ```rs
/// use galerie::gallery_sources;
///
/// gallery_sources!["examples" => "../../examples"];
/// ```
/// expands to
/// ```rs
/// galerie::gallery::GallerySources::new(vec![
///     galerie::gallery::GallerySource::new("examples", "../../examples"),
/// ]);
/// ```
#[macro_export]
macro_rules! gallery_sources {
    [$($name:expr => $dir:expr),* $(,)?] => {
        $crate::gallery::GallerySources::new(vec![$($crate::gallery::GallerySource::new($name, $dir)),*])
    };
}

/// The version of Galerie being used.
///
/// Can be used to create a generator tag in the output.
///
/// ## Example
/// ```rs
/// use galerie::GENERATOR;
///
/// format!(".. generated by {}", GENERATOR);
/// ```
pub const GENERATOR: &str = concat!("Galerie v", env!("CARGO_PKG_VERSION"));

/// 🖼️ Galerie entrypoint. Runs the gallery build and generates the output
/// files.
///
/// Fires the build-started hooks, scans the gallery sources, writes one page
/// per example plus the gallery index, then fires the build-finished hooks.
/// The built-in index truncation runs at both events, so the index the build
/// leaves behind never contains the thumbnail grid.
///
/// ## Example
/// Should be called from the main function of the binary crate.
/// ```rs
/// use galerie::{gallery_sources, vernissage, BuildOptions, hooks::Hooks};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     vernissage(
///         gallery_sources!["examples" => "../../examples"],
///         Hooks::new(),
///         BuildOptions::default(),
///     )?;
///     Ok(())
/// }
/// ```
pub fn vernissage(
    mut sources: GallerySources,
    hooks: Hooks,
    options: BuildOptions,
) -> Result<BuildOutput, Box<dyn std::error::Error>> {
    init_logging();

    execute_build(&mut sources, &hooks, &options).map_err(Into::into)
}
