//! ZIP container writing.

use std::io::{Seek, Write};
use std::path::Path;

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::book::PackagedFile;
use crate::error::Result;

/// Write packaged files into an EPUB ZIP container.
///
/// The `mimetype` entry is forced to be the very first entry and is stored
/// without compression, so tools can sniff the file type at a fixed offset.
/// Every other entry follows in caller order, deflate-compressed.
pub fn write_epub<W: Write + Seek>(files: &[PackagedFile], writer: W) -> Result<()> {
    let mut zip = ZipWriter::new(writer);

    let options_stored =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let options_deflate =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let (mime, rest): (Vec<_>, Vec<_>) = files.iter().partition(|f| f.path == "mimetype");
    for file in mime.into_iter().chain(rest) {
        let options = if file.compress {
            options_deflate
        } else {
            options_stored
        };
        zip.start_file(file.path.as_str(), options)?;
        zip.write_all(&file.bytes)?;
    }

    zip.finish()?;
    Ok(())
}

/// Write packaged files to an EPUB file on disk.
pub fn write_epub_file<P: AsRef<Path>>(files: &[PackagedFile], path: P) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_epub(files, file)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use zip::ZipArchive;

    use super::*;

    fn sample_files() -> Vec<PackagedFile> {
        vec![
            PackagedFile::text("OEBPS/guide01.html", "<html/>"),
            PackagedFile::text("OEBPS/toc.ncx", "<ncx/>"),
            PackagedFile::stored("mimetype", "application/epub+zip"),
            PackagedFile::text("META-INF/container.xml", "<container/>"),
        ]
    }

    #[test]
    fn mimetype_is_first_and_stored() {
        let mut buffer = Cursor::new(Vec::new());
        write_epub(&sample_files(), &mut buffer).unwrap();

        let bytes = buffer.into_inner();
        // Local file header is 30 bytes; the first entry's name and content
        // follow it directly because the entry is stored.
        assert_eq!(&bytes[30..38], b"mimetype");
        assert_eq!(&bytes[38..58], b"application/epub+zip");

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), zip::CompressionMethod::Stored);
    }

    #[test]
    fn other_entries_keep_caller_order_and_deflate() {
        let mut buffer = Cursor::new(Vec::new());
        write_epub(&sample_files(), &mut buffer).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(buffer.into_inner())).unwrap();
        let names: Vec<_> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "mimetype",
                "OEBPS/guide01.html",
                "OEBPS/toc.ncx",
                "META-INF/container.xml"
            ]
        );

        let chapter = archive.by_index(1).unwrap();
        assert_eq!(chapter.compression(), zip::CompressionMethod::Deflated);
    }

    #[test]
    fn contents_round_trip() {
        let mut buffer = Cursor::new(Vec::new());
        write_epub(&sample_files(), &mut buffer).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(buffer.into_inner())).unwrap();
        let mut content = String::new();
        archive
            .by_name("OEBPS/guide01.html")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<html/>");
    }
}
