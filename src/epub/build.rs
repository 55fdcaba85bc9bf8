//! EPUB 2 auxiliary document builders.
//!
//! Four pure functions produce the non-chapter files of the container: the
//! NCX navigation document, the OPF package document, the MIME marker, and
//! the container descriptor. All XML is assembled by string building.

use std::fmt::Write;

use crate::book::Book;
use crate::util::{escape_attr, escape_text};

pub const NAVIGATION_PATH: &str = "OEBPS/toc.ncx";
pub const PACKAGE_PATH: &str = "OEBPS/content.opf";
pub const MIMETYPE_PATH: &str = "mimetype";
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Build the NCX navigation document.
///
/// One top-level navPoint per chapter, with nested navPoints for the
/// chapter's sections; playOrder runs sequentially from 1 across the whole
/// map.
pub fn build_navigation(book: &Book, uid: &str) -> (&'static str, String) {
    let depth = if book.chapters.iter().any(|c| !c.sections.is_empty()) {
        2
    } else {
        1
    };

    let mut ncx = String::new();
    ncx.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
"#,
    );
    writeln!(
        ncx,
        "    <meta name=\"dtb:uid\" content=\"{}\"/>",
        escape_attr(uid)
    )
    .unwrap();
    writeln!(ncx, "    <meta name=\"dtb:depth\" content=\"{depth}\"/>").unwrap();
    ncx.push_str(
        r#"    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
  <docTitle>
    <text>"#,
    );
    ncx.push_str(&escape_text(&book.metadata.title));
    ncx.push_str(
        r#"</text>
  </docTitle>
  <navMap>
"#,
    );

    let mut play_order = 1;
    for chapter in &book.chapters {
        write_nav_point(&mut ncx, &chapter.title, &chapter.output_name, &mut play_order, 2);
        for section in &chapter.sections {
            let src = match &section.fragment {
                Some(fragment) => format!("{}#{}", chapter.output_name, fragment),
                None => chapter.output_name.clone(),
            };
            write_nav_point(&mut ncx, &section.title, &src, &mut play_order, 3);
            ncx.push_str("      </navPoint>\n");
        }
        ncx.push_str("    </navPoint>\n");
    }

    ncx.push_str("  </navMap>\n</ncx>\n");
    (NAVIGATION_PATH, ncx)
}

fn write_nav_point(ncx: &mut String, label: &str, src: &str, play_order: &mut usize, indent: usize) {
    let pad = "  ".repeat(indent);
    writeln!(
        ncx,
        "{pad}<navPoint id=\"navpoint-{n}\" playOrder=\"{n}\">",
        n = play_order
    )
    .unwrap();
    writeln!(
        ncx,
        "{pad}  <navLabel>\n{pad}    <text>{}</text>\n{pad}  </navLabel>",
        escape_text(label)
    )
    .unwrap();
    writeln!(ncx, "{pad}  <content src=\"{}\"/>", escape_attr(src)).unwrap();
    *play_order += 1;
}

/// Build the OPF package document: Dublin Core metadata, a manifest of the
/// NCX plus every chapter, and a spine in manifest order.
pub fn build_package_document(book: &Book, uid: &str) -> (&'static str, String) {
    let mut opf = String::new();
    opf.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" xmlns:dc="http://purl.org/dc/elements/1.1/" unique-identifier="bookid" version="2.0">
  <metadata>
"#,
    );
    writeln!(
        opf,
        "    <dc:title>{}</dc:title>",
        escape_text(&book.metadata.title)
    )
    .unwrap();
    writeln!(
        opf,
        "    <dc:creator>{}</dc:creator>",
        escape_text(&book.metadata.author)
    )
    .unwrap();
    writeln!(
        opf,
        "    <dc:identifier id=\"bookid\">{}</dc:identifier>",
        escape_text(uid)
    )
    .unwrap();
    opf.push_str("    <dc:language>en-US</dc:language>\n  </metadata>\n  <manifest>\n");

    opf.push_str(
        "    <item id=\"ncx\" href=\"toc.ncx\" media-type=\"application/x-dtbncx+xml\"/>\n",
    );
    for chapter in &book.chapters {
        writeln!(
            opf,
            "    <item id=\"{}\" href=\"{}\" media-type=\"application/xhtml+xml\"/>",
            escape_attr(file_id(&chapter.output_name)),
            escape_attr(&chapter.output_name)
        )
        .unwrap();
    }

    opf.push_str("  </manifest>\n  <spine toc=\"ncx\">\n");
    for chapter in &book.chapters {
        writeln!(
            opf,
            "    <itemref idref=\"{}\"/>",
            escape_attr(file_id(&chapter.output_name))
        )
        .unwrap();
    }
    opf.push_str("  </spine>\n</package>\n");

    (PACKAGE_PATH, opf)
}

/// The fixed MIME marker pair.
pub fn build_mime_marker() -> (&'static str, &'static str) {
    (MIMETYPE_PATH, "application/epub+zip")
}

/// The fixed container descriptor pointing at the package document.
pub fn build_container_descriptor() -> (&'static str, &'static str) {
    (
        CONTAINER_PATH,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#,
    )
}

/// Manifest id: filename without its extension.
fn file_id(name: &str) -> &str {
    name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name)
}
