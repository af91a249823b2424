//! Source selection
//!
//! Finds every diagram source in the document, converted or not. Deciding
//! what to do with them is left to [`plan`](super::plan).

use tracing::trace;

use crate::core::{
    DiagramSource, Document, DomError, SourceShape, SyncConfig, CONVERTED_ATTR,
    ENGINE_PROCESSED_ATTR,
};

/// Collect diagram sources of both shapes in document order
///
/// A `code` element with the language class is fenced only inside a `pre`;
/// the `pre` is what gets replaced. Outside a `pre` it counts only if it
/// also carries the marker class. The same node can be reported twice when
/// it matches both shapes, e.g. `<pre class="mermaid"><code
/// class="language-mermaid">`.
pub fn select_sources<D: Document>(
    document: &D,
    config: &SyncConfig,
) -> Result<Vec<DiagramSource<D::Node>>, DomError> {
    let marker_class = config.marker_class.as_str();
    let language_class = config.language_class.as_str();

    let candidates = document.elements_with_any_class(&[marker_class, language_class])?;
    trace!(candidates = candidates.len(), "queried diagram candidates");

    let mut sources = Vec::with_capacity(candidates.len());
    for element in candidates {
        if document.has_class(&element, language_class) && document.tag_name(&element) == "code" {
            match document.parent(&element) {
                Some(pre) if document.tag_name(&pre) == "pre" => {
                    sources.push(DiagramSource {
                        converted: is_converted(document, &pre),
                        text: document.text_content(&element),
                        node: pre,
                        shape: SourceShape::Fenced,
                    });
                    continue;
                }
                _ => trace!("code element outside pre, not a fenced block"),
            }
        }

        if document.has_class(&element, marker_class) {
            sources.push(DiagramSource {
                converted: is_converted(document, &element),
                text: document.text_content(&element),
                node: element,
                shape: SourceShape::Classed,
            });
        }
    }

    Ok(sources)
}

/// Whether this crate or the engine already handled the node
pub fn is_converted<D: Document>(document: &D, node: &D::Node) -> bool {
    document.attribute(node, CONVERTED_ATTR).is_some()
        || document.attribute(node, ENGINE_PROCESSED_ATTR).is_some()
}
