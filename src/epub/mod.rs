//! EPUB 2 document building and container writing.

pub mod build;
mod writer;

pub use build::{
    build_container_descriptor, build_mime_marker, build_navigation, build_package_document,
};
pub use writer::{write_epub, write_epub_file};

use crate::book::{Book, PackagedFile};
use crate::util::uuid_v4;

/// Assemble the complete, ordered file list for a book's EPUB container:
/// chapters, navigation document, package document, MIME marker, container
/// descriptor. When `identifier` is `None` a random `urn:uuid:` identifier
/// is generated.
pub fn package_book(book: &Book, identifier: Option<&str>) -> Vec<PackagedFile> {
    let uid = match identifier {
        Some(uid) => uid.to_string(),
        None => format!("urn:uuid:{}", uuid_v4()),
    };

    let mut files = Vec::new();
    for chapter in &book.chapters {
        files.push(PackagedFile::text(
            format!("OEBPS/{}", chapter.output_name),
            chapter.content.clone(),
        ));
    }

    let (path, ncx) = build_navigation(book, &uid);
    files.push(PackagedFile::text(path, ncx));
    let (path, opf) = build_package_document(book, &uid);
    files.push(PackagedFile::text(path, opf));
    let (path, mime) = build_mime_marker();
    files.push(PackagedFile::stored(path, mime));
    let (path, container) = build_container_descriptor();
    files.push(PackagedFile::text(path, container));

    files
}
