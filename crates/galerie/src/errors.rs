//! Error types for Galerie.
use std::fmt::{self, Debug, Formatter};
use std::path::PathBuf;
use thiserror::Error;

macro_rules! impl_debug_for_error {
    ($($t:ty),*) => {
        $(
            impl Debug for $t {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    // Rust uses the Debug trait to show errors when they're returned from main,
                    // but thiserror uses the Display trait. This redirects Debug to Display, essentially.
                    write!(f, "{}", self)
                }
            }
        )*
    };
}

#[derive(Error)]
pub enum TruncateError {
    #[error("Failed to read index file: {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to rewrite index file: {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error)]
pub enum GalleryError {
    // Covers both the filename pattern and the ignore patterns.
    #[error("Invalid glob pattern `{pattern}` in gallery source `{source_name}`")]
    InvalidPattern {
        source_name: String,
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("Failed to scan gallery source `{source_name}`")]
    ScanFailed {
        source_name: String,
        #[source]
        source: glob::GlobError,
    },
    #[error("Failed to read example script: {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid metadata header in example script: {path}")]
    InvalidMetadata {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Failed to create gallery directory: {path}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write generated page: {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error)]
pub enum ThemeError {
    #[error("Failed to serialize theme context")]
    SerializeFailed {
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Failed to write theme context: {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum GalerieError {
    #[error(transparent)]
    Gallery(#[from] GalleryError),

    #[error(transparent)]
    Theme(#[from] ThemeError),
}

impl_debug_for_error!(TruncateError, GalleryError, ThemeError);
