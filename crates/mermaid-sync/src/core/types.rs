//! Core data types shared by selection, planning and the document backends

use std::fmt;

/// Attribute set on every marker this crate creates; its value is the source shape
pub const CONVERTED_ATTR: &str = "data-mermaid-sync";

/// Attribute the engine sets on markers it has already drawn
pub const ENGINE_PROCESSED_ATTR: &str = "data-processed";

/// DOM event fired once the document has been parsed
pub const READY_EVENT: &str = "DOMContentLoaded";

/// How a diagram source appears in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceShape {
    /// `<pre><code class="language-mermaid">…</code></pre>`
    Fenced,
    /// Any element carrying the marker class directly
    Classed,
}

impl SourceShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceShape::Fenced => "fenced",
            SourceShape::Classed => "classed",
        }
    }
}

impl fmt::Display for SourceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node holding raw diagram text
///
/// `node` is the element that gets replaced: the `pre` for fenced blocks,
/// the class-marked element itself otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSource<N> {
    pub node: N,
    pub shape: SourceShape,
    pub text: String,
    pub converted: bool,
}

/// The element that replaces a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramMarker {
    pub class: String,
    pub text: String,
    pub origin: SourceShape,
}

impl DiagramMarker {
    /// Build a marker from raw source text
    ///
    /// Surrounding whitespace is dropped; the text itself is not validated.
    pub fn new(class: impl Into<String>, text: &str, origin: SourceShape) -> Self {
        Self {
            class: class.into(),
            text: text.trim().to_string(),
            origin,
        }
    }
}

/// Selector covering every marker in the document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerSelector {
    class: String,
}

impl MarkerSelector {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// CSS form, e.g. `.mermaid`
    pub fn css(&self) -> String {
        format!(".{}", self.class)
    }
}

impl fmt::Display for MarkerSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_trims_text() {
        let marker = DiagramMarker::new("mermaid", "\n  graph TD; A-->B;\n", SourceShape::Fenced);
        assert_eq!(marker.text, "graph TD; A-->B;");
        assert_eq!(marker.class, "mermaid");
    }

    #[test]
    fn test_marker_keeps_empty_text() {
        let marker = DiagramMarker::new("mermaid", "   ", SourceShape::Classed);
        assert_eq!(marker.text, "");
    }

    #[test]
    fn test_selector_css() {
        let selector = MarkerSelector::new("mermaid");
        assert_eq!(selector.css(), ".mermaid");
        assert_eq!(selector.to_string(), ".mermaid");
    }

    #[test]
    fn test_shape_display() {
        assert_eq!(SourceShape::Fenced.to_string(), "fenced");
        assert_eq!(SourceShape::Classed.to_string(), "classed");
    }
}
