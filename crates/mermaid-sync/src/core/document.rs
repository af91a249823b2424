//! Document abstraction
//!
//! The synchronizer never touches a concrete DOM. It reads and mutates the
//! page through this trait, which the browser binding implements over
//! `web_sys` and [`MemoryDocument`](crate::memory::MemoryDocument) implements
//! in memory.

use std::fmt::Debug;

use crate::core::{DiagramMarker, DomError};

/// Core trait for the page being synchronized
///
/// Queries are cheap reads; [`replace_with_marker`](Document::replace_with_marker)
/// is the only mutation the synchronizer performs.
pub trait Document {
    /// Handle to an element; equal handles refer to the same element
    type Node: Clone + PartialEq + Debug;

    /// Elements carrying at least one of `classes`, in document order
    fn elements_with_any_class(&self, classes: &[&str]) -> Result<Vec<Self::Node>, DomError>;

    /// Parent element, or `None` for the root and for detached nodes
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Lower-case tag name
    fn tag_name(&self, node: &Self::Node) -> String;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Concatenated text of the node and all its descendants
    fn text_content(&self, node: &Self::Node) -> String;

    /// Replace `target` with a new marker element at the same position
    ///
    /// Returns the new element. Fails with [`DomError::Detached`] when
    /// `target` has no parent any more.
    fn replace_with_marker(
        &mut self,
        target: &Self::Node,
        marker: &DiagramMarker,
    ) -> Result<Self::Node, DomError>;
}
