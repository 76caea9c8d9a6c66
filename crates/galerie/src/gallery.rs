//! Gallery sources and example scanning.
//!
//! A gallery source is a directory of example scripts. Sources are declared
//! with the [`gallery_sources!`](crate::gallery_sources) macro and scanned at
//! the start of a build; each discovered script becomes an [`ExampleEntry`]
//! from which a page is generated.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{Pattern, glob};
use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use slug::slugify;

use crate::GalleryOptions;
use crate::errors::GalleryError;

pub(crate) mod rst;

/// Represents a collection of gallery sources.
///
/// Mostly seen as the return type of [`gallery_sources!`](crate::gallery_sources).
pub struct GallerySources(Vec<GallerySource>);

impl GallerySources {
    pub fn new(sources: Vec<GallerySource>) -> Self {
        Self(sources)
    }

    pub fn sources(&self) -> &[GallerySource] {
        &self.0
    }

    pub(crate) fn sources_mut(&mut self) -> &mut [GallerySource] {
        &mut self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<GallerySource>> for GallerySources {
    fn from(sources: Vec<GallerySource>) -> Self {
        Self(sources)
    }
}

/// A named directory of example scripts.
///
/// ## Example
/// ```rs
/// use galerie::gallery::GallerySource;
///
/// let source = GallerySource::new("examples", "../../examples")
///     .with_repo_prefix("examples");
/// ```
pub struct GallerySource {
    pub name: String,
    pub dir: PathBuf,
    /// Path of `dir` relative to the repository root, used to build
    /// edit-on-GitHub links. `None` disables edit links for this source.
    pub repo_prefix: Option<String>,
    pub entries: Vec<ExampleEntry>,
}

impl GallerySource {
    pub fn new<N, P>(name: N, dir: P) -> Self
    where
        N: Into<String>,
        P: Into<PathBuf>,
    {
        Self {
            name: name.into(),
            dir: dir.into(),
            repo_prefix: None,
            entries: vec![],
        }
    }

    pub fn with_repo_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.repo_prefix = Some(prefix.into());
        self
    }

    /// Scans the source directory and fills `entries`, ordered by file name.
    ///
    /// All sources of a build write pages into the same output directory, so
    /// `seen_ids` is shared between their `init` calls to keep ids unique
    /// across the whole gallery.
    pub(crate) fn init(
        &mut self,
        options: &GalleryOptions,
        seen_ids: &mut FxHashMap<String, usize>,
    ) -> Result<(), GalleryError> {
        let pattern = self
            .dir
            .join(&options.filename_pattern)
            .to_string_lossy()
            .into_owned();

        let ignore_patterns = options
            .ignore_patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| GalleryError::InvalidPattern {
                    source_name: self.name.clone(),
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let walker = glob(&pattern).map_err(|source| GalleryError::InvalidPattern {
            source_name: self.name.clone(),
            pattern: pattern.clone(),
            source,
        })?;

        let mut paths = vec![];
        for entry in walker {
            let path = entry.map_err(|source| GalleryError::ScanFailed {
                source_name: self.name.clone(),
                source,
            })?;

            if !path.is_file() {
                continue;
            }

            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            if ignore_patterns.iter().any(|p| p.matches(&file_name)) {
                debug!(target: "gallery", "Ignoring {}", path.display());
                continue;
            }

            paths.push(path);
        }

        paths.sort();

        let mut entries = Vec::with_capacity(paths.len());

        for path in paths {
            let raw = fs::read_to_string(&path).map_err(|source| GalleryError::ReadFailed {
                path: path.clone(),
                source,
            })?;

            let stem = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();

            let mut id = slugify(&stem);
            if id.is_empty() {
                id = "example".to_string();
            }

            match seen_ids.get_mut(&id) {
                Some(count) => {
                    *count += 1;
                    id = format!("{}-{}", id, count);
                }
                None => {
                    seen_ids.insert(id.clone(), 0);
                }
            }

            let (title, description) = match parse_header(&raw, &path)? {
                Some(header) => (header.title, header.description),
                None => (stem, String::new()),
            };

            entries.push(ExampleEntry {
                id,
                file_path: path,
                title,
                description,
            });
        }

        self.entries = entries;
        Ok(())
    }
}

/// An example script discovered by a gallery source.
#[derive(Debug, Clone)]
pub struct ExampleEntry {
    /// Slug of the script's file stem, unique within the gallery.
    pub id: String,
    pub file_path: PathBuf,
    pub title: String,
    pub description: String,
}

pub(crate) struct ExampleHeader {
    pub(crate) title: String,
    pub(crate) description: String,
}

#[derive(Deserialize)]
struct YamlHeader {
    title: String,
    #[serde(default)]
    description: String,
}

/// Extracts a title and description from the head of an example script.
///
/// Two header forms are supported: a triple-quoted docstring whose first
/// non-empty line is the title, and a `---`-delimited YAML metadata block
/// with `title` and optional `description` keys. A shebang or an encoding
/// comment before the header is skipped.
pub(crate) fn parse_header(
    raw: &str,
    path: &Path,
) -> Result<Option<ExampleHeader>, GalleryError> {
    let rest = skip_preamble(raw);

    for delimiter in ["\"\"\"", "'''"] {
        if let Some(body) = rest.strip_prefix(delimiter) {
            let Some(end) = body.find(delimiter) else {
                warn!(
                    target: "gallery",
                    "Unterminated docstring in {}, ignoring header", path.display()
                );
                return Ok(None);
            };

            return Ok(Some(header_from_docstring(&body[..end])));
        }
    }

    if rest.starts_with("---\n") || rest.starts_with("---\r\n") {
        let mut yaml = String::new();
        let mut closed = false;
        for line in rest.lines().skip(1) {
            if line.trim_end() == "---" {
                closed = true;
                break;
            }
            yaml.push_str(line);
            yaml.push('\n');
        }

        if !closed {
            warn!(
                target: "gallery",
                "Unterminated metadata block in {}, ignoring header", path.display()
            );
            return Ok(None);
        }

        let header: YamlHeader =
            serde_yaml::from_str(&yaml).map_err(|source| GalleryError::InvalidMetadata {
                path: path.to_path_buf(),
                source,
            })?;

        return Ok(Some(ExampleHeader {
            title: header.title,
            description: header.description,
        }));
    }

    Ok(None)
}

/// Skips blank lines, a shebang and an encoding comment before the header.
fn skip_preamble(raw: &str) -> &str {
    let mut rest = raw;
    loop {
        let Some(line_end) = rest.find('\n') else {
            return rest;
        };
        let line = rest[..line_end].trim_end();

        if line.is_empty() || line.starts_with("#!") || line.starts_with("# -*-") {
            rest = &rest[line_end + 1..];
        } else {
            return rest;
        }
    }
}

fn header_from_docstring(body: &str) -> ExampleHeader {
    let mut lines = body.lines().skip_while(|line| line.trim().is_empty());

    let title = lines.next().unwrap_or_default().trim().to_string();

    let mut description_lines: Vec<&str> = lines.collect();

    // Docstrings often underline the title reStructuredText-style.
    if description_lines
        .first()
        .is_some_and(|line| is_title_underline(line))
    {
        description_lines.remove(0);
    }

    ExampleHeader {
        title,
        description: description_lines.join("\n").trim().to_string(),
    }
}

fn is_title_underline(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_punctuation() && trimmed.starts_with(c))
}
