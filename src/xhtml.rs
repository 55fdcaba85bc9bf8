//! HTML to XHTML normalization.
//!
//! Takes one best-effort-parsed HTML document and produces a well-formed
//! XHTML 1.0 or 1.1 document: canonical doctype, XHTML namespace on the
//! root, a single UTF-8 charset meta, empty paragraphs dropped, and the
//! body content wrapped in a single `<div>`.

use std::str::FromStr;

use crate::dom::{Attr, Dom, NodeData, NodeId, parse_bytes, qual_name, serialize};
use crate::error::{Error, Result};

/// The XHTML namespace URI set on the root element.
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Target XHTML version.
///
/// The two versions differ in their doctype and in anchor attributes:
/// XHTML 1.1 drops `name` on `<a>`, so 1.1 output carries `id` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XhtmlVersion {
    V1_0,
    #[default]
    V1_1,
}

impl XhtmlVersion {
    /// (root name, public identifier, system identifier) for the doctype.
    pub fn doctype(self) -> (&'static str, &'static str, &'static str) {
        match self {
            XhtmlVersion::V1_0 => (
                "html",
                "-//W3C//DTD XHTML 1.0 Strict//EN",
                "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd",
            ),
            XhtmlVersion::V1_1 => (
                "html",
                "-//W3C//DTD XHTML 1.1//EN",
                "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd",
            ),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            XhtmlVersion::V1_0 => "1.0",
            XhtmlVersion::V1_1 => "1.1",
        }
    }
}

impl FromStr for XhtmlVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1.0" => Ok(XhtmlVersion::V1_0),
            "1.1" => Ok(XhtmlVersion::V1_1),
            other => Err(Error::UnsupportedVersion(other.to_string())),
        }
    }
}

/// Normalize one HTML document to XHTML.
///
/// Deterministic for deterministic input, and idempotent with respect to the
/// doctype, namespace, and charset steps: normalizing an already normalized
/// document still yields exactly one of each.
pub fn normalize(html: &[u8], version: XhtmlVersion) -> Result<String> {
    let mut dom = parse_bytes(html);

    set_doctype(&mut dom, version);
    set_namespace(&mut dom)?;
    set_charset(&mut dom)?;
    remove_empty_paragraphs(&mut dom);
    if version == XhtmlVersion::V1_1 {
        convert_name_to_id(&mut dom);
    }
    wrap_body(&mut dom)?;

    Ok(serialize(&dom))
}

/// Replace any existing doctype with the canonical one for `version`.
fn set_doctype(dom: &mut Dom, version: XhtmlVersion) {
    let stale: Vec<_> = dom
        .children(dom.document())
        .filter(|&id| matches!(dom.get(id).map(|n| &n.data), Some(NodeData::Doctype { .. })))
        .collect();
    for id in stale {
        dom.detach(id);
    }

    let (name, public_id, system_id) = version.doctype();
    let doctype = dom.create_doctype(name, public_id, system_id);
    let doc = dom.document();
    dom.prepend(doc, doctype);
}

fn root_element(dom: &Dom) -> Result<NodeId> {
    dom.find_first(dom.document(), "html")
        .ok_or_else(|| Error::StructuralInconsistency("document has no <html> root".to_string()))
}

fn set_namespace(dom: &mut Dom) -> Result<()> {
    let html = root_element(dom)?;
    dom.set_attr(html, "xmlns", XHTML_NS);
    Ok(())
}

/// Drop every charset-declaring `<meta>` from the head, then append the one
/// canonical UTF-8 declaration.
fn set_charset(dom: &mut Dom) -> Result<()> {
    let html = root_element(dom)?;
    let head = dom
        .find_first(html, "head")
        .ok_or_else(|| Error::StructuralInconsistency("document has no <head>".to_string()))?;

    let stale: Vec<_> = dom
        .descendants(head)
        .filter(|&id| is_charset_meta(dom, id))
        .collect();
    for id in stale {
        dom.detach(id);
    }

    let meta = dom.create_element(
        qual_name("meta"),
        vec![
            Attr {
                name: qual_name("http-equiv"),
                value: "Content-Type".to_string(),
            },
            Attr {
                name: qual_name("content"),
                value: "text/html; charset=utf-8".to_string(),
            },
        ],
    );
    dom.append(head, meta);
    Ok(())
}

fn is_charset_meta(dom: &Dom, id: NodeId) -> bool {
    if !dom.is_tag(id, "meta") {
        return false;
    }
    if dom.attr(id, "charset").is_some() {
        return true;
    }
    dom.attr(id, "http-equiv") == Some("Content-Type")
}

/// Remove paragraphs whose children are all whitespace-only text or
/// comments. Any element child, or text or comment content, keeps the
/// paragraph.
fn remove_empty_paragraphs(dom: &mut Dom) {
    let empty: Vec<_> = dom
        .descendants(dom.document())
        .filter(|&id| dom.is_tag(id, "p") && paragraph_is_empty(dom, id))
        .collect();
    for id in empty {
        dom.detach(id);
    }
}

fn paragraph_is_empty(dom: &Dom, id: NodeId) -> bool {
    dom.children(id).all(|child| {
        matches!(
            dom.get(child).map(|n| &n.data),
            Some(NodeData::Text(text) | NodeData::Comment(text)) if text.trim().is_empty()
        )
    })
}

/// XHTML 1.1 dropped the `name` attribute on anchors: copy it to `id` and
/// delete it.
fn convert_name_to_id(dom: &mut Dom) {
    let anchors: Vec<_> = dom
        .descendants(dom.document())
        .filter(|&id| dom.is_tag(id, "a") && dom.attr(id, "name").is_some())
        .collect();
    for anchor in anchors {
        let value = dom.attr(anchor, "name").map(str::to_string);
        if let Some(value) = value {
            dom.set_attr(anchor, "id", &value);
            dom.remove_attr(anchor, "name");
        }
    }
}

/// Move all body children, in order, into one new `<div>` wrapper.
fn wrap_body(dom: &mut Dom) -> Result<()> {
    let html = root_element(dom)?;
    let body = dom
        .find_first(html, "body")
        .ok_or_else(|| Error::StructuralInconsistency("document has no <body>".to_string()))?;

    let children: Vec<_> = dom.children(body).collect();
    let wrapper = dom.create_element(qual_name("div"), vec![]);
    dom.append(body, wrapper);
    for child in children {
        dom.append(wrapper, child);
    }
    Ok(())
}
