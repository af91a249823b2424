//! In-memory element tree
//!
//! A deliberately small DOM: elements with a tag, classes, attributes, own
//! text and children. Enough to express the shapes the synchronizer cares
//! about and to watch what it does to them.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::core::{DiagramMarker, Document, DomError, CONVERTED_ATTR};

/// Handle to an element of a [`MemoryDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag: &str, classes: &[&str], text: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            attributes: BTreeMap::new(),
            text: text.to_string(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Element tree rooted at a `body` element
///
/// Elements are never freed; removing one only detaches it, the way a DOM
/// node survives removal as long as someone holds a reference.
///
/// # Example
///
/// ```rust
/// use mermaid_sync::memory::MemoryDocument;
///
/// let mut doc = MemoryDocument::new();
/// let body = doc.body();
/// doc.append_fenced_block(body, "language-mermaid", "graph TD; A-->B;");
/// assert_eq!(
///     doc.to_html(),
///     "<body><pre><code class=\"language-mermaid\">graph TD; A--&gt;B;</code></pre></body>"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDocument {
    elements: Vec<Element>,
    replacements: usize,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self {
            elements: vec![Element::new("body", &[], "")],
            replacements: 0,
        }
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a new element as the last child of `parent`
    pub fn append_element(&mut self, parent: NodeId, tag: &str, classes: &[&str], text: &str) -> NodeId {
        let id = NodeId(self.elements.len());
        let mut element = Element::new(tag, classes, text);
        if self.elements.get(parent.0).is_some() {
            element.parent = Some(parent);
        }
        self.elements.push(element);
        if let Some(parent) = self.elements.get_mut(parent.0) {
            parent.children.push(id);
        }
        id
    }

    /// Append `<pre><code class="{language_class}">{text}</code></pre>`
    ///
    /// Returns the `pre` element.
    pub fn append_fenced_block(&mut self, parent: NodeId, language_class: &str, text: &str) -> NodeId {
        let pre = self.append_element(parent, "pre", &[], "");
        self.append_element(pre, "code", &[language_class], text);
        pre
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.elements.get_mut(node.0) {
            element.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Detach `node` from its parent
    pub fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.elements.get(node.0).and_then(|e| e.parent) else {
            return;
        };
        if let Some(parent) = self.elements.get_mut(parent.0) {
            parent.children.retain(|child| *child != node);
        }
        if let Some(element) = self.elements.get_mut(node.0) {
            element.parent = None;
        }
    }

    /// Detach every child of `node`, as a client-side navigation does
    pub fn clear_children(&mut self, node: NodeId) {
        for child in self.children(node).to_vec() {
            self.remove(child);
        }
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.elements
            .get(node.0)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `node` is reachable from the body
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.body() {
                return true;
            }
            current = self.elements.get(id.0).and_then(|e| e.parent);
        }
        false
    }

    /// Attached elements carrying `class`, in document order
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.body())
            .into_iter()
            .filter(|id| self.has_class(id, class))
            .collect()
    }

    /// Successful [`replace_with_marker`](Document::replace_with_marker) calls
    pub fn replacements(&self) -> usize {
        self.replacements
    }

    /// Serialize the attached tree as HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(self.body(), &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some(element) = self.elements.get(node.0) else {
            return;
        };
        let _ = write!(out, "<{}", element.tag);
        if !element.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&element.classes.join(" ")));
        }
        for (name, value) in &element.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        out.push('>');
        out.push_str(&escape(&element.text));
        for child in &element.children {
            self.write_html(*child, out);
        }
        let _ = write!(out, "</{}>", element.tag);
    }

    /// Pre-order walk, excluding `node` itself
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            found.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        found
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Document for MemoryDocument {
    type Node = NodeId;

    fn elements_with_any_class(&self, classes: &[&str]) -> Result<Vec<NodeId>, DomError> {
        Ok(self
            .descendants(self.body())
            .into_iter()
            .filter(|id| classes.iter().any(|class| self.has_class(id, class)))
            .collect())
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.elements.get(node.0).and_then(|e| e.parent)
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.elements
            .get(node.0)
            .map(|e| e.tag.clone())
            .unwrap_or_default()
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.elements
            .get(node.0)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.elements
            .get(node.0)
            .and_then(|e| e.attributes.get(name).cloned())
    }

    fn text_content(&self, node: &NodeId) -> String {
        let Some(element) = self.elements.get(node.0) else {
            return String::new();
        };
        let mut text = element.text.clone();
        for child in &element.children {
            text.push_str(&self.text_content(child));
        }
        text
    }

    fn replace_with_marker(&mut self, target: &NodeId, marker: &DiagramMarker) -> Result<NodeId, DomError> {
        // A node inside a removed subtree still has a parent
        if !self.is_attached(*target) {
            return Err(DomError::Detached);
        }
        let parent = self.parent(target).ok_or(DomError::Detached)?;
        let position = self
            .children(parent)
            .iter()
            .position(|child| child == target)
            .ok_or(DomError::Detached)?;

        let id = NodeId(self.elements.len());
        let mut element = Element::new("div", &[marker.class.as_str()], &marker.text);
        element
            .attributes
            .insert(CONVERTED_ATTR.to_string(), marker.origin.as_str().to_string());
        element.parent = Some(parent);
        self.elements.push(element);

        let siblings = &mut self
            .elements
            .get_mut(parent.0)
            .ok_or_else(|| DomError::mutation("parent element missing"))?
            .children;
        siblings[position] = id;

        if let Some(old) = self.elements.get_mut(target.0) {
            old.parent = None;
        }
        self.replacements += 1;
        Ok(id)
    }
}
