//! Tar archive reading.
//!
//! Turns a tar (optionally gzip-compressed) byte stream of HTML chapter
//! files into a [`Book`]: the front-matter file yields the metadata, the
//! numbered chapter files are normalized and extracted, everything else is
//! ignored.

use std::io::Read;

use flate2::read::GzDecoder;

use crate::book::{Book, Chapter, Metadata};
use crate::error::{Error, Result};
use crate::extract::{extract_chapter, extract_metadata};
use crate::xhtml::{XhtmlVersion, normalize};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Read a book from tar archive bytes.
///
/// `contents_name` is the base filename of the front-matter file (the one
/// holding the book title and author); chapter members are those whose base
/// name ends in two digits before `.html`. Chapters come back sorted
/// ascending by number; a duplicate number is rejected rather than left to
/// archive-scan order.
pub fn read_book(archive: &[u8], contents_name: &str) -> Result<Book> {
    let data = maybe_gunzip(archive)?;
    let mut tar = tar::Archive::new(data.as_slice());

    let mut metadata: Option<Metadata> = None;
    let mut chapters: Vec<Chapter> = Vec::new();

    for entry in tar.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let name = {
            let path = entry.path()?;
            match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            }
        };

        if name == contents_name {
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            metadata = Some(extract_metadata(&bytes)?);
        } else if is_chapter_name(&name) {
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            let xhtml = normalize(&bytes, XhtmlVersion::V1_1)?;
            chapters.push(extract_chapter(&name, &xhtml, contents_name)?);
        }
    }

    let metadata = metadata.ok_or_else(|| {
        Error::MissingMetadata(format!("archive has no '{contents_name}' member"))
    })?;

    chapters.sort_by_key(|c| c.number);
    if let Some(pair) = chapters.windows(2).find(|w| w[0].number == w[1].number) {
        return Err(Error::DuplicateChapterNumber(pair[0].number));
    }

    Ok(Book { metadata, chapters })
}

fn maybe_gunzip(archive: &[u8]) -> Result<Vec<u8>> {
    if archive.starts_with(&GZIP_MAGIC) {
        let mut decoded = Vec::new();
        GzDecoder::new(archive).read_to_end(&mut decoded)?;
        Ok(decoded)
    } else {
        Ok(archive.to_vec())
    }
}

/// Chapter members end in exactly a two-digit run before `.html`, like
/// `zshguide01.html`.
fn is_chapter_name(name: &str) -> bool {
    name.strip_suffix(".html").is_some_and(|stem| {
        let bytes = stem.as_bytes();
        bytes.len() >= 2
            && bytes[bytes.len() - 1].is_ascii_digit()
            && bytes[bytes.len() - 2].is_ascii_digit()
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::*;

    const CONTENTS: &str = "zshguide.html";

    const FRONT_MATTER: &str =
        "<html><body><h1>Z Shell User's Guide</h1><h2>Author Name</h2></body></html>";

    fn chapter_html(title: &str) -> String {
        format!("<html><body><h1>{title}</h1><p>text</p></body></html>")
    }

    fn tar_bytes(members: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (name, content) in members {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap()
    }

    #[test]
    fn reads_metadata_and_sorted_chapters() {
        let archive = tar_bytes(&[
            ("guide02.html", &chapter_html("Chapter Two")),
            (CONTENTS, FRONT_MATTER),
            ("guide01.html", &chapter_html("Chapter One")),
        ]);
        let book = read_book(&archive, CONTENTS).unwrap();

        assert_eq!(book.metadata.title, "Z Shell User's Guide");
        assert_eq!(book.metadata.author, "Author Name");
        assert_eq!(book.chapters.len(), 2);
        assert_eq!(book.chapters[0].number, 1);
        assert_eq!(book.chapters[0].title, "Chapter One");
        assert_eq!(book.chapters[1].number, 2);
    }

    #[test]
    fn member_order_does_not_affect_chapter_order() {
        let forward = tar_bytes(&[
            (CONTENTS, FRONT_MATTER),
            ("guide01.html", &chapter_html("One")),
            ("guide02.html", &chapter_html("Two")),
        ]);
        let reversed = tar_bytes(&[
            ("guide02.html", &chapter_html("Two")),
            ("guide01.html", &chapter_html("One")),
            (CONTENTS, FRONT_MATTER),
        ]);

        let a = read_book(&forward, CONTENTS).unwrap();
        let b = read_book(&reversed, CONTENTS).unwrap();
        let titles_a: Vec<_> = a.chapters.iter().map(|c| c.title.clone()).collect();
        let titles_b: Vec<_> = b.chapters.iter().map(|c| c.title.clone()).collect();
        assert_eq!(titles_a, titles_b);
        assert_eq!(titles_a, vec!["One", "Two"]);
    }

    #[test]
    fn gzip_compressed_archives_are_accepted() {
        let archive = tar_bytes(&[
            (CONTENTS, FRONT_MATTER),
            ("guide01.html", &chapter_html("One")),
        ]);
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&archive).unwrap();
        let gzipped = encoder.finish().unwrap();

        let book = read_book(&gzipped, CONTENTS).unwrap();
        assert_eq!(book.chapters.len(), 1);
    }

    #[test]
    fn missing_front_matter_is_fatal() {
        let archive = tar_bytes(&[("guide01.html", &chapter_html("One"))]);
        assert!(matches!(
            read_book(&archive, CONTENTS),
            Err(Error::MissingMetadata(_))
        ));
    }

    #[test]
    fn duplicate_chapter_numbers_are_rejected() {
        let archive = tar_bytes(&[
            (CONTENTS, FRONT_MATTER),
            ("guide01.html", &chapter_html("One")),
            ("other/guide01.html", &chapter_html("Also One")),
        ]);
        assert!(matches!(
            read_book(&archive, CONTENTS),
            Err(Error::DuplicateChapterNumber(1))
        ));
    }

    #[test]
    fn non_ascii_chapter_names_are_read() {
        let archive = tar_bytes(&[
            (CONTENTS, FRONT_MATTER),
            ("guidé01.html", &chapter_html("One")),
        ]);
        let book = read_book(&archive, CONTENTS).unwrap();
        assert_eq!(book.chapters.len(), 1);
        assert_eq!(book.chapters[0].number, 1);
        assert_eq!(book.chapters[0].output_name, "guidé01.html");
    }

    #[test]
    fn unrelated_members_are_ignored() {
        let archive = tar_bytes(&[
            (CONTENTS, FRONT_MATTER),
            ("guide01.html", &chapter_html("One")),
            ("style.css", "body { margin: 0 }"),
            ("notes.txt", "scratch"),
        ]);
        let book = read_book(&archive, CONTENTS).unwrap();
        assert_eq!(book.chapters.len(), 1);
    }

    #[test]
    fn chapter_name_pattern() {
        assert!(is_chapter_name("zshguide01.html"));
        assert!(is_chapter_name("guide42.html"));
        assert!(!is_chapter_name("zshguide.html"));
        assert!(!is_chapter_name("guide1.html"));
        assert!(!is_chapter_name("guide01.txt"));
    }
}
