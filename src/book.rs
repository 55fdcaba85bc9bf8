//! Book data model.
//!
//! Built once by the archive reader and read-only afterwards.

/// Book-level metadata, taken from the front-matter file.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub title: String,
    pub author: String,
}

impl Metadata {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }
}

/// A sub-heading inside a chapter, used for nested navigation entries.
///
/// `fragment` is the anchor id to link to (produced by the XHTML 1.1
/// name-to-id conversion); absent when the heading has no usable anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub fragment: Option<String>,
}

/// One numbered chapter.
#[derive(Debug, Clone)]
pub struct Chapter {
    /// Display title, from the last `<h1>` in the chapter body.
    pub title: String,
    /// Ordinal parsed from the filename's trailing digits; the sort key.
    pub number: u32,
    /// Filename within the EPUB (the source file's base name).
    pub output_name: String,
    /// Serialized XHTML for the chapter document.
    pub content: String,
    /// Sub-headings in body order.
    pub sections: Vec<Section>,
}

/// A complete book: metadata plus chapters sorted ascending by number.
#[derive(Debug, Clone)]
pub struct Book {
    pub metadata: Metadata,
    pub chapters: Vec<Chapter>,
}

/// One output unit for the EPUB container writer.
#[derive(Debug, Clone)]
pub struct PackagedFile {
    pub path: String,
    pub bytes: Vec<u8>,
    pub compress: bool,
}

impl PackagedFile {
    /// A deflate-compressed text entry.
    pub fn text(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            bytes: content.into().into_bytes(),
            compress: true,
        }
    }

    /// An uncompressed (stored) text entry.
    pub fn stored(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            bytes: content.into().into_bytes(),
            compress: false,
        }
    }
}
