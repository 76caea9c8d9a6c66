//! Build lifecycle hooks.
//!
//! A build exposes two events: one fired before gallery generation starts and
//! one fired after it finished, the latter carrying a flag telling whether the
//! build failed. Custom callbacks can be connected to both through [`Hooks`];
//! the index truncation hooks ([`clean_gallery_index`] and
//! [`reclean_gallery_index`]) are always run by the build itself.

use std::path::{Path, PathBuf};

use log::debug;

use crate::BuildOptions;
use crate::truncate::truncate;

/// Context passed to every hook, describing the build being run.
pub struct HookContext<'a> {
    /// The documentation source directory.
    pub source_dir: &'a Path,
    /// The gallery index file the build generates, resolved against
    /// `source_dir`. With default options this is `<source_dir>/examples/index.rst`.
    pub index_file: PathBuf,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(options: &'a BuildOptions) -> Self {
        Self {
            source_dir: &options.source_dir,
            index_file: options.gallery_index_path(),
        }
    }
}

type BuildStartedHook = Box<dyn Fn(&HookContext) + Send + Sync>;
type BuildFinishedHook = Box<dyn Fn(&HookContext, bool) + Send + Sync>;

/// A registry of callbacks connected to the build lifecycle events.
///
/// ## Example
/// ```rs
/// use galerie::{gallery_sources, vernissage, BuildOptions, hooks::Hooks};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let hooks = Hooks::new()
///         .on_build_started(|ctx| println!("building from {}", ctx.source_dir.display()))
///         .on_build_finished(|_ctx, failed| {
///             if !failed {
///                 println!("done!");
///             }
///         });
///
///     vernissage(gallery_sources![], hooks, BuildOptions::default())?;
///     Ok(())
/// }
/// ```
#[derive(Default)]
pub struct Hooks {
    started: Vec<BuildStartedHook>,
    finished: Vec<BuildFinishedHook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects a callback to the build-started event, fired before gallery
    /// generation begins.
    pub fn on_build_started(mut self, hook: impl Fn(&HookContext) + Send + Sync + 'static) -> Self {
        self.started.push(Box::new(hook));
        self
    }

    /// Connects a callback to the build-finished event, fired after gallery
    /// generation, whether it succeeded (`build_failed` is `false`) or not.
    pub fn on_build_finished(
        mut self,
        hook: impl Fn(&HookContext, bool) + Send + Sync + 'static,
    ) -> Self {
        self.finished.push(Box::new(hook));
        self
    }

    pub(crate) fn run_started(&self, ctx: &HookContext) {
        for hook in &self.started {
            hook(ctx);
        }
    }

    pub(crate) fn run_finished(&self, ctx: &HookContext, build_failed: bool) {
        for hook in &self.finished {
            hook(ctx, build_failed);
        }
    }
}

/// Build-started hook: truncates a stale gallery index left over from a
/// previous build, so downstream tools never see the thumbnail grid even if
/// the build is interrupted before generation re-runs.
///
/// A missing index is not an error, it will be generated during the build.
pub fn clean_gallery_index(ctx: &HookContext) {
    if ctx.index_file.exists() {
        truncate(&ctx.index_file);
    } else {
        debug!(
            target: "hooks",
            "{} does not exist yet, it will be generated during the build",
            ctx.index_file.display()
        );
    }
}

/// Build-finished hook: re-applies the index truncation after generation
/// re-created the thumbnail grid. Does nothing when the build failed or the
/// index was never generated.
pub fn reclean_gallery_index(ctx: &HookContext, build_failed: bool) {
    if !build_failed && ctx.index_file.exists() {
        truncate(&ctx.index_file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    const INDEX_WITH_GRID: &str =
        "Examples\n========\n\n.. raw:: html\n\n    <div class=\"sphx-glr-thumbnails\">\n<img>\n";

    fn context_for(source_dir: &Path) -> (BuildOptions, PathBuf) {
        let options = BuildOptions {
            source_dir: source_dir.to_path_buf(),
            ..Default::default()
        };
        let index_file = options.gallery_index_path();
        (options, index_file)
    }

    #[test]
    fn test_index_path_follows_convention() {
        let (options, index_file) = context_for(Path::new("docs/source"));
        let ctx = HookContext::new(&options);

        assert_eq!(ctx.index_file, Path::new("docs/source/examples/index.rst"));
        assert_eq!(index_file, ctx.index_file);
    }

    #[test]
    fn test_clean_truncates_existing_index() {
        let dir = tempdir().unwrap();
        let (options, index_file) = context_for(dir.path());
        fs::create_dir_all(index_file.parent().unwrap()).unwrap();
        fs::write(&index_file, INDEX_WITH_GRID).unwrap();

        clean_gallery_index(&HookContext::new(&options));

        assert_eq!(
            fs::read_to_string(&index_file).unwrap(),
            "Examples\n========\n\n"
        );
    }

    #[test]
    fn test_clean_ignores_missing_index() {
        let dir = tempdir().unwrap();
        let (options, index_file) = context_for(dir.path());

        clean_gallery_index(&HookContext::new(&options));

        assert!(!index_file.exists());
    }

    #[test]
    fn test_reclean_skips_failed_builds() {
        let dir = tempdir().unwrap();
        let (options, index_file) = context_for(dir.path());
        fs::create_dir_all(index_file.parent().unwrap()).unwrap();
        fs::write(&index_file, INDEX_WITH_GRID).unwrap();

        reclean_gallery_index(&HookContext::new(&options), true);
        assert_eq!(fs::read_to_string(&index_file).unwrap(), INDEX_WITH_GRID);

        reclean_gallery_index(&HookContext::new(&options), false);
        assert_eq!(
            fs::read_to_string(&index_file).unwrap(),
            "Examples\n========\n\n"
        );
    }

    #[test]
    fn test_hooks_run_in_registration_order() {
        let calls: &'static Mutex<Vec<&'static str>> = Box::leak(Box::new(Mutex::new(vec![])));

        let hooks = Hooks::new()
            .on_build_started(|_ctx| calls.lock().unwrap().push("first"))
            .on_build_started(|_ctx| calls.lock().unwrap().push("second"))
            .on_build_finished(|_ctx, failed| {
                calls
                    .lock()
                    .unwrap()
                    .push(if failed { "failed" } else { "finished" })
            });

        let (options, _) = context_for(Path::new("docs"));
        let ctx = HookContext::new(&options);
        hooks.run_started(&ctx);
        hooks.run_finished(&ctx, false);

        assert_eq!(*calls.lock().unwrap(), vec!["first", "second", "finished"]);
    }
}
