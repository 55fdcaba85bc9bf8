//! XHTML serialization of the arena DOM.
//!
//! Emits XML-well-formed output: text and attribute values are escaped and
//! void elements are self-closed.

use super::{Dom, NodeData, NodeId};
use crate::util::{escape_attr, escape_text};

/// Elements serialized as `<tag/>` with no closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Serialize a whole document back to a string.
pub fn serialize(dom: &Dom) -> String {
    let mut out = String::new();
    for child in dom.children(dom.document()) {
        serialize_node(dom, child, &mut out);
    }
    out
}

fn serialize_node(dom: &Dom, id: NodeId, out: &mut String) {
    let Some(node) = dom.get(id) else { return };
    match &node.data {
        NodeData::Document => {}
        NodeData::Doctype {
            name,
            public_id,
            system_id,
        } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            if !public_id.is_empty() {
                out.push_str(" PUBLIC \"");
                out.push_str(public_id);
                out.push('"');
                if !system_id.is_empty() {
                    out.push_str(" \"");
                    out.push_str(system_id);
                    out.push('"');
                }
            }
            out.push_str(">\n");
        }
        NodeData::Text(text) => out.push_str(&escape_text(text)),
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::Element { name, attrs } => {
            let tag = name.local.as_ref();
            out.push('<');
            out.push_str(tag);
            for attr in attrs {
                out.push(' ');
                out.push_str(attr.name.local.as_ref());
                out.push_str("=\"");
                out.push_str(&escape_attr(&attr.value));
                out.push('"');
            }
            if VOID_ELEMENTS.contains(&tag) {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in dom.children(id) {
                serialize_node(dom, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}
