//! html5ever TreeSink implementation for the arena [`Dom`].

use std::cell::RefCell;

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeBuilderOpts, TreeSink};
use html5ever::{Attribute as Html5Attribute, ParseOpts, QualName, parse_document};

use super::{Attr, Dom, NodeData, NodeId};

/// Parse HTML bytes into an arena [`Dom`].
///
/// Parsing is lenient: malformed markup is recovered from rather than
/// rejected, and existing doctypes are kept so the normalizer can replace
/// them.
pub fn parse_bytes(input: &[u8]) -> Dom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: false,
            ..Default::default()
        },
        ..Default::default()
    };
    parse_document(DomSink::new(), opts)
        .from_utf8()
        .one(input)
        .into_dom()
}

/// TreeSink that builds a [`Dom`].
///
/// html5ever's TreeSink methods take `&self`, so the DOM sits behind a
/// RefCell.
pub struct DomSink {
    dom: RefCell<Dom>,
    quirks_mode: RefCell<QuirksMode>,
}

impl Default for DomSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DomSink {
    pub fn new() -> Self {
        Self {
            dom: RefCell::new(Dom::new()),
            quirks_mode: RefCell::new(QuirksMode::NoQuirks),
        }
    }

    /// Consume the sink and return the DOM.
    pub fn into_dom(self) -> Dom {
        self.dom.into_inner()
    }

    fn append_node_or_text(&self, parent: NodeId, child: NodeOrText<NodeId>) {
        let mut dom = self.dom.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => dom.append(parent, node),
            NodeOrText::AppendText(text) => dom.append_text(parent, &text),
        }
    }
}

impl TreeSink for DomSink {
    type Handle = NodeId;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, _msg: std::borrow::Cow<'static, str>) {
        // Recover silently, like a browser would.
    }

    fn get_document(&self) -> NodeId {
        self.dom.borrow().document()
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> Self::ElemName<'a> {
        static EMPTY: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };

        let dom = self.dom.borrow();
        match dom.get(*target).map(|n| &n.data) {
            Some(NodeData::Element { name, .. }) => {
                // SAFETY: the QualName lives in the arena, which lives as long
                // as self; the borrow checker cannot see through the RefCell.
                // The tree builder uses the reference immediately and never
                // stores it.
                unsafe { std::mem::transmute::<&QualName, &'a QualName>(name) }
            }
            _ => &EMPTY,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Html5Attribute>,
        _flags: ElementFlags,
    ) -> NodeId {
        let attrs = attrs
            .into_iter()
            .map(|a| Attr {
                name: a.name,
                value: a.value.to_string(),
            })
            .collect();
        self.dom.borrow_mut().create_element(name, attrs)
    }

    fn create_comment(&self, text: StrTendril) -> NodeId {
        self.dom.borrow_mut().create_comment(text.to_string())
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> NodeId {
        // Processing instructions are irrelevant here; keep an empty comment
        // so the handle is valid.
        self.dom.borrow_mut().create_comment(String::new())
    }

    fn append(&self, parent: &NodeId, child: NodeOrText<NodeId>) {
        self.append_node_or_text(*parent, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        let parent = self
            .dom
            .borrow()
            .get(*element)
            .map(|n| n.parent)
            .unwrap_or(NodeId::NONE);
        if parent.is_some() {
            self.append_node_or_text(parent, child);
        } else {
            self.append_node_or_text(*prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        let mut dom = self.dom.borrow_mut();
        let doctype = dom.create_doctype(&name, &public_id, &system_id);
        let doc = dom.document();
        dom.append(doc, doctype);
    }

    fn get_template_contents(&self, target: &NodeId) -> NodeId {
        // Template contents are not tracked separately.
        *target
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        *self.quirks_mode.borrow_mut() = mode;
    }

    fn append_before_sibling(&self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        let mut dom = self.dom.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => dom.insert_before(*sibling, node),
            NodeOrText::AppendText(text) => {
                let text_node = dom.create_text(text.to_string());
                dom.insert_before(*sibling, text_node);
            }
        }
    }

    fn add_attrs_if_missing(&self, target: &NodeId, attrs: Vec<Html5Attribute>) {
        let mut dom = self.dom.borrow_mut();
        if let Some(node) = dom.get_mut(*target)
            && let NodeData::Element {
                attrs: existing, ..
            } = &mut node.data
        {
            for attr in attrs {
                if !existing.iter().any(|a| a.name == attr.name) {
                    existing.push(Attr {
                        name: attr.name,
                        value: attr.value.to_string(),
                    });
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &NodeId) {
        self.dom.borrow_mut().detach(*target);
    }

    fn reparent_children(&self, node: &NodeId, new_parent: &NodeId) {
        let children: Vec<_> = self.dom.borrow().children(*node).collect();
        let mut dom = self.dom.borrow_mut();
        for child in children {
            dom.append(*new_parent, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_document() {
        let dom = parse_bytes(b"<html><body><p>Hello</p></body></html>");
        let p = dom.find_first(dom.document(), "p").expect("should find p");
        assert_eq!(dom.collect_text(p), "Hello");
    }

    #[test]
    fn recovers_from_malformed_markup() {
        // Unclosed tags and stray close tags must not fail.
        let dom = parse_bytes(b"<p>one<p>two</div><b>three");
        let body = dom.find_first(dom.document(), "body").unwrap();
        assert_eq!(dom.collect_text(body), "onetwothree");
    }

    #[test]
    fn synthesizes_html_head_body() {
        let dom = parse_bytes(b"just text");
        assert!(dom.find_first(dom.document(), "html").is_some());
        assert!(dom.find_first(dom.document(), "head").is_some());
        assert!(dom.find_first(dom.document(), "body").is_some());
    }

    #[test]
    fn keeps_existing_doctype() {
        let dom = parse_bytes(b"<!DOCTYPE html><html><body></body></html>");
        let has_doctype = dom
            .children(dom.document())
            .any(|id| matches!(dom.get(id).map(|n| &n.data), Some(NodeData::Doctype { .. })));
        assert!(has_doctype);
    }
}
