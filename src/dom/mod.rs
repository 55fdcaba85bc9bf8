//! Arena-based DOM for HTML normalization.
//!
//! html5ever parses into this tree via the sink in [`sink`]. Nodes live in a
//! single vector and reference each other by index, so subtrees can be moved
//! and detached without ownership cycles.

pub mod serialize;
pub mod sink;

use html5ever::{LocalName, QualName, ns};

pub use serialize::serialize;
pub use sink::parse_bytes;

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel for "no node".
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::NONE
    }
}

/// An HTML attribute.
#[derive(Debug, Clone)]
pub struct Attr {
    pub name: QualName,
    pub value: String,
}

/// Payload of a node.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element { name: QualName, attrs: Vec<Attr> },
    Text(String),
    Comment(String),
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
}

/// A node with its tree links. Links are arena indices, `NodeId::NONE`
/// meaning absent.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Build a `QualName` in the null namespace, as used for attributes and for
/// elements we synthesize ourselves.
pub fn qual_name(local: &str) -> QualName {
    QualName::new(None, ns!(), LocalName::from(local))
}

/// The arena DOM tree.
pub struct Dom {
    nodes: Vec<Node>,
    document: NodeId,
}

impl Dom {
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
        };
        dom.document = dom.alloc(Node::new(NodeData::Document));
        dom
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attr>) -> NodeId {
        self.alloc(Node::new(NodeData::Element { name, attrs }))
    }

    pub fn create_text(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text)))
    }

    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text)))
    }

    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.alloc(Node::new(NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }))
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous position first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);

        let last = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);

        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = last;
        }
        if let Some(node) = self.get_mut(last) {
            node.next_sibling = child;
        }
        if let Some(node) = self.get_mut(parent) {
            if node.first_child.is_none() {
                node.first_child = child;
            }
            node.last_child = child;
        }
    }

    /// Insert `child` as the first child of `parent`.
    pub fn prepend(&mut self, parent: NodeId, child: NodeId) {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        if first.is_some() {
            self.insert_before(first, child);
        } else {
            self.append(parent, child);
        }
    }

    /// Insert `new_node` immediately before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        self.detach(new_node);

        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(node) = self.get_mut(new_node) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = sibling;
        }
        if let Some(node) = self.get_mut(sibling) {
            node.prev_sibling = new_node;
        }
        if prev.is_some() {
            if let Some(node) = self.get_mut(prev) {
                node.next_sibling = new_node;
            }
        } else if let Some(node) = self.get_mut(parent) {
            node.first_child = new_node;
        }
    }

    /// Unlink a node (and its subtree) from its parent and siblings.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(node) = self.get_mut(prev) {
                node.next_sibling = next;
            }
        } else if let Some(node) = self.get_mut(parent) {
            node.first_child = next;
        }

        if next.is_some() {
            if let Some(node) = self.get_mut(next) {
                node.prev_sibling = prev;
            }
        } else if let Some(node) = self.get_mut(parent) {
            node.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Append text to `parent`, merging into an existing trailing text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);
        if let Some(node) = self.get_mut(last)
            && let NodeData::Text(existing) = &mut node.data
        {
            existing.push_str(text);
            return;
        }
        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    pub fn children(&self, parent: NodeId) -> Children<'_> {
        Children {
            dom: self,
            current: self
                .get(parent)
                .map(|n| n.first_child)
                .unwrap_or(NodeId::NONE),
        }
    }

    /// Depth-first preorder walk of the subtree below `root` (excluding
    /// `root` itself).
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut stack: Vec<_> = self.children(root).collect();
        stack.reverse();
        Descendants { dom: self, stack }
    }

    /// Walk from a node's parent up to the document.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            dom: self,
            current: self.get(id).map(|n| n.parent).unwrap_or(NodeId::NONE),
        }
    }

    /// First element with the given tag below `root`, in document order.
    pub fn find_first(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(root).find(|&id| self.is_tag(id, tag))
    }

    /// Whether the node is an element with the given local name.
    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Element { name, .. }) => name.local.as_ref() == tag,
            _ => false,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(
            self.get(id).map(|n| &n.data),
            Some(NodeData::Element { .. })
        )
    }

    pub fn attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Element { attrs, .. }) => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == attr_name)
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    /// Set an attribute, replacing an existing value of the same name.
    pub fn set_attr(&mut self, id: NodeId, attr_name: &str, value: &str) {
        if let Some(node) = self.get_mut(id)
            && let NodeData::Element { attrs, .. } = &mut node.data
        {
            if let Some(attr) = attrs.iter_mut().find(|a| a.name.local.as_ref() == attr_name) {
                attr.value = value.to_string();
            } else {
                attrs.push(Attr {
                    name: qual_name(attr_name),
                    value: value.to_string(),
                });
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, attr_name: &str) {
        if let Some(node) = self.get_mut(id)
            && let NodeData::Element { attrs, .. } = &mut node.data
        {
            attrs.retain(|a| a.name.local.as_ref() != attr_name);
        }
    }

    /// Concatenated text of all text nodes below `root`.
    pub fn collect_text(&self, root: NodeId) -> String {
        let mut out = String::new();
        for id in self.descendants(root) {
            if let Some(NodeData::Text(text)) = self.get(id).map(|n| &n.data) {
                out.push_str(text);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children.
pub struct Children<'a> {
    dom: &'a Dom,
    current: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

/// Preorder subtree iterator.
pub struct Descendants<'a> {
    dom: &'a Dom,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let mut children: Vec<_> = self.dom.children(id).collect();
        children.reverse();
        self.stack.extend(children);
        Some(id)
    }
}

/// Parent chain iterator.
pub struct Ancestors<'a> {
    dom: &'a Dom,
    current: NodeId,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.parent)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_iterate_children() {
        let mut dom = Dom::new();
        let ul = dom.create_element(qual_name("ul"), vec![]);
        let li1 = dom.create_element(qual_name("li"), vec![]);
        let li2 = dom.create_element(qual_name("li"), vec![]);
        dom.append(dom.document(), ul);
        dom.append(ul, li1);
        dom.append(ul, li2);

        let children: Vec<_> = dom.children(ul).collect();
        assert_eq!(children, vec![li1, li2]);
        assert!(dom.is_tag(li1, "li"));
    }

    #[test]
    fn detach_unlinks_subtree() {
        let mut dom = Dom::new();
        let ul = dom.create_element(qual_name("ul"), vec![]);
        let li1 = dom.create_element(qual_name("li"), vec![]);
        let li2 = dom.create_element(qual_name("li"), vec![]);
        let li3 = dom.create_element(qual_name("li"), vec![]);
        dom.append(dom.document(), ul);
        dom.append(ul, li1);
        dom.append(ul, li2);
        dom.append(ul, li3);

        dom.detach(li2);
        let children: Vec<_> = dom.children(ul).collect();
        assert_eq!(children, vec![li1, li3]);
        assert!(dom.get(li2).unwrap().parent.is_none());
    }

    #[test]
    fn prepend_becomes_first_child() {
        let mut dom = Dom::new();
        let body = dom.create_element(qual_name("body"), vec![]);
        let p = dom.create_element(qual_name("p"), vec![]);
        let h1 = dom.create_element(qual_name("h1"), vec![]);
        dom.append(dom.document(), body);
        dom.append(body, p);
        dom.prepend(body, h1);

        let children: Vec<_> = dom.children(body).collect();
        assert_eq!(children, vec![h1, p]);
    }

    #[test]
    fn text_nodes_merge() {
        let mut dom = Dom::new();
        let p = dom.create_element(qual_name("p"), vec![]);
        dom.append(dom.document(), p);
        dom.append_text(p, "Hello, ");
        dom.append_text(p, "World!");

        assert_eq!(dom.children(p).count(), 1);
        assert_eq!(dom.collect_text(p), "Hello, World!");
    }

    #[test]
    fn attributes_set_and_remove() {
        let mut dom = Dom::new();
        let a = dom.create_element(
            qual_name("a"),
            vec![Attr {
                name: qual_name("name"),
                value: "intro".to_string(),
            }],
        );
        dom.append(dom.document(), a);

        assert_eq!(dom.attr(a, "name"), Some("intro"));
        dom.set_attr(a, "id", "intro");
        dom.remove_attr(a, "name");
        assert_eq!(dom.attr(a, "id"), Some("intro"));
        assert_eq!(dom.attr(a, "name"), None);
    }

    #[test]
    fn ancestors_walk_to_document() {
        let mut dom = Dom::new();
        let ul = dom.create_element(qual_name("ul"), vec![]);
        let li = dom.create_element(qual_name("li"), vec![]);
        let a = dom.create_element(qual_name("a"), vec![]);
        dom.append(dom.document(), ul);
        dom.append(ul, li);
        dom.append(li, a);

        let chain: Vec<_> = dom.ancestors(a).collect();
        assert_eq!(chain, vec![li, ul, dom.document()]);
    }
}
