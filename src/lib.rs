//! # bindery
//!
//! Converts a tarball of HTML chapter files into a single EPUB 2 e-book.
//!
//! Each chapter's markup is normalized into valid XHTML, book and chapter
//! metadata are taken from heading tags, the EPUB navigation and manifest
//! documents are generated, and everything is packaged into a ZIP container
//! with the layout the EPUB format requires.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bindery::{package_book, read_book, write_epub_file};
//!
//! let archive = std::fs::read("zshguide_html.tar.gz").unwrap();
//! let book = read_book(&archive, "zshguide.html").unwrap();
//! let files = package_book(&book, None);
//! write_epub_file(&files, "zsh-guide.epub").unwrap();
//! ```
//!
//! The normalizer is also usable on its own for one-off HTML to XHTML
//! conversion:
//!
//! ```
//! use bindery::{normalize, XhtmlVersion};
//!
//! let xhtml = normalize(b"<html><body><p>hi</p></body></html>", XhtmlVersion::V1_1).unwrap();
//! assert!(xhtml.contains("xmlns=\"http://www.w3.org/1999/xhtml\""));
//! ```

pub mod archive;
pub mod book;
pub mod dom;
pub mod epub;
pub mod error;
pub mod extract;
pub mod xhtml;

pub(crate) mod util;

pub use archive::read_book;
pub use book::{Book, Chapter, Metadata, PackagedFile, Section};
pub use epub::{package_book, write_epub, write_epub_file};
pub use error::{Error, Result};
pub use xhtml::{XhtmlVersion, normalize};
