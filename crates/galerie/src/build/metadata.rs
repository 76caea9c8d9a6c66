use std::{process::Termination, time::Instant};

/// Metadata returned by [`vernissage()`](crate::vernissage) for a single
/// generated gallery page.
#[derive(Debug)]
pub struct PageOutput {
    /// Name of the gallery source the page came from.
    pub source: String,
    /// Path of the generated page.
    pub file_path: String,
    /// Path of the example script the page was generated from.
    pub example_path: String,
}

/// Metadata returned by [`vernissage()`](crate::vernissage) after a
/// successful build.
#[derive(Debug)]
pub struct BuildOutput {
    pub start_time: Instant,
    pub pages: Vec<PageOutput>,
    /// Path of the generated gallery index, if any source produced entries.
    pub index_file: Option<String>,
    /// Path of the exported theme context file.
    pub theme_context: Option<String>,
}

impl BuildOutput {
    pub fn new(start_time: Instant) -> Self {
        Self {
            start_time,
            pages: Vec::new(),
            index_file: None,
            theme_context: None,
        }
    }

    pub(crate) fn add_page(&mut self, source: String, file_path: String, example_path: String) {
        self.pages.push(PageOutput {
            source,
            file_path,
            example_path,
        });
    }
}

impl Default for BuildOutput {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl Termination for BuildOutput {
    fn report(self) -> std::process::ExitCode {
        0.into()
    }
}
