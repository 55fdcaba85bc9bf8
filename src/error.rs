//! Error types for bindery operations.

use thiserror::Error;

/// Errors that can occur while converting a chapter archive to an EPUB.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("unsupported XHTML version: {0}")]
    UnsupportedVersion(String),

    #[error("missing front matter: {0}")]
    MissingMetadata(String),

    #[error("malformed chapter filename: {0}")]
    MalformedChapterFilename(String),

    #[error("unexpected document structure: {0}")]
    StructuralInconsistency(String),

    #[error("duplicate chapter number: {0}")]
    DuplicateChapterNumber(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
