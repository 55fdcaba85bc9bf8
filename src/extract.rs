//! Chapter and book metadata extraction.
//!
//! Works on documents the normalizer already produced, plus the raw
//! front-matter file for book metadata.

use crate::book::{Chapter, Metadata, Section};
use crate::dom::{Dom, NodeId, parse_bytes, serialize};
use crate::error::{Error, Result};

/// Parse the chapter ordinal from the trailing digit run immediately before
/// `.html`.
///
/// No trailing digits (or no `.html` suffix) is fatal: skipping would
/// silently produce an incomplete book.
pub fn chapter_number(filename: &str) -> Result<u32> {
    let malformed = || Error::MalformedChapterFilename(filename.to_string());

    let stem = filename.strip_suffix(".html").ok_or_else(malformed)?;
    let prefix = stem.trim_end_matches(|c: char| c.is_ascii_digit());
    let run = &stem[prefix.len()..];
    if run.is_empty() {
        return Err(malformed());
    }
    run.parse().map_err(|_| malformed())
}

/// Extract a [`Chapter`] from one normalized XHTML document.
///
/// Strips links back to the table-of-contents file (`contents_name`) by
/// removing their enclosing `<li>`, takes the last `<h1>` in the body as
/// the chapter title, and records each `<h2>` as a [`Section`] for nested
/// navigation.
pub fn extract_chapter(source_name: &str, xhtml: &str, contents_name: &str) -> Result<Chapter> {
    let output_name = base_name(source_name);
    let number = chapter_number(output_name)?;

    let mut dom = parse_bytes(xhtml.as_bytes());
    strip_contents_links(&mut dom, contents_name)?;

    let body = dom
        .find_first(dom.document(), "body")
        .ok_or_else(|| structural(source_name, "no <body>"))?;

    let title = dom
        .descendants(body)
        .filter(|&id| dom.is_tag(id, "h1"))
        .last()
        .map(|id| dom.collect_text(id).trim().to_string())
        .ok_or_else(|| structural(source_name, "no <h1> chapter heading"))?;

    let sections = collect_sections(&dom, body);

    Ok(Chapter {
        title,
        number,
        output_name: output_name.to_string(),
        content: serialize(&dom),
        sections,
    })
}

/// Extract book metadata from the raw front-matter HTML: title from the
/// first `<h1>`, author from the first `<h2>`.
pub fn extract_metadata(html: &[u8]) -> Result<Metadata> {
    let dom = parse_bytes(html);
    let body = dom
        .find_first(dom.document(), "body")
        .ok_or_else(|| Error::MissingMetadata("front matter has no <body>".to_string()))?;

    let title = dom
        .find_first(body, "h1")
        .map(|id| dom.collect_text(id).trim().to_string())
        .ok_or_else(|| Error::MissingMetadata("front matter has no <h1> title".to_string()))?;
    let author = dom
        .find_first(body, "h2")
        .map(|id| dom.collect_text(id).trim().to_string())
        .ok_or_else(|| Error::MissingMetadata("front matter has no <h2> author".to_string()))?;

    Ok(Metadata { title, author })
}

fn structural(source_name: &str, detail: &str) -> Error {
    Error::StructuralInconsistency(format!("{source_name}: {detail}"))
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Remove every list item wrapping a link back to the contents file.
///
/// A contents link outside a `<li>` means the input no longer matches the
/// expected template, which is reported rather than ignored.
fn strip_contents_links(dom: &mut Dom, contents_name: &str) -> Result<()> {
    let anchors: Vec<_> = dom
        .descendants(dom.document())
        .filter(|&id| dom.is_tag(id, "a") && links_to_contents(dom, id, contents_name))
        .collect();

    let mut items: Vec<NodeId> = Vec::new();
    for anchor in anchors {
        let item = dom
            .ancestors(anchor)
            .find(|&id| dom.is_tag(id, "li"))
            .ok_or_else(|| {
                Error::StructuralInconsistency(format!(
                    "link to '{contents_name}' is not inside a list item"
                ))
            })?;
        if !items.contains(&item) {
            items.push(item);
        }
    }
    for item in items {
        dom.detach(item);
    }
    Ok(())
}

fn links_to_contents(dom: &Dom, id: NodeId, contents_name: &str) -> bool {
    match dom.attr(id, "href") {
        Some(href) => {
            href == contents_name
                || href
                    .strip_prefix(contents_name)
                    .is_some_and(|rest| rest.starts_with('#'))
        }
        None => false,
    }
}

/// One [`Section`] per `<h2>` in body order; the fragment is the heading's
/// own id or the id of its first anchor descendant.
fn collect_sections(dom: &Dom, body: NodeId) -> Vec<Section> {
    dom.descendants(body)
        .filter(|&id| dom.is_tag(id, "h2"))
        .map(|h2| {
            let fragment = dom
                .attr(h2, "id")
                .map(str::to_string)
                .or_else(|| {
                    dom.descendants(h2)
                        .filter(|&id| dom.is_tag(id, "a"))
                        .find_map(|a| dom.attr(a, "id").map(str::to_string))
                });
            Section {
                title: dom.collect_text(h2).trim().to_string(),
                fragment,
            }
        })
        .collect()
}
