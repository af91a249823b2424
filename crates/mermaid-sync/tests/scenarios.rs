//! End-to-end synchronization scenarios against the in-memory document

use mermaid_sync::memory::{EngineCall, MemoryDocument, NodeId, RecordingEngine};
use mermaid_sync::prelude::*;
use mermaid_sync::{DomError, CONVERTED_ATTR, ENGINE_PROCESSED_ATTR};

type MemorySync = Synchronizer<MemoryDocument, Option<RecordingEngine>>;

fn with_engine(document: MemoryDocument) -> MemorySync {
    Synchronizer::new(document, Some(RecordingEngine::new()), SyncConfig::default())
}

fn engine(sync: &MemorySync) -> &RecordingEngine {
    sync.capability().as_ref().expect("engine present")
}

#[test]
fn test_fenced_block_replaced_by_marker() {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let pre = doc.append_fenced_block(body, "language-mermaid", "graph TD; A-->B;");

    let mut sync = with_engine(doc);
    let report = sync.synchronize().unwrap();

    assert_eq!(report.outcome, PassOutcome::Rendered);
    assert_eq!(report.converted, 1);

    let doc = sync.document();
    let markers = doc.elements_with_class("mermaid");
    assert_eq!(markers.len(), 1);
    assert_eq!(doc.text_content(&markers[0]), "graph TD; A-->B;");
    assert_eq!(doc.tag_name(&markers[0]), "div");
    assert!(!doc.is_attached(pre));
    assert_eq!(engine(&sync).render_count(), 1);
}

#[test]
fn test_no_sources_still_renders() {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    doc.append_element(body, "p", &[], "Nothing to see here");
    doc.append_fenced_block(body, "language-python", "print('hi')");
    let before = doc.clone();

    let mut sync = with_engine(doc);
    let report = sync.synchronize().unwrap();

    assert_eq!(report.found, 0);
    assert_eq!(report.converted, 0);
    assert_eq!(sync.document(), &before);
    assert_eq!(sync.document().replacements(), 0);
    assert_eq!(
        engine(&sync).calls().last(),
        Some(&EngineCall::Render(".mermaid".to_string()))
    );
}

#[test]
fn test_only_new_sources_converted_after_navigation() {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    doc.append_fenced_block(body, "language-mermaid", "graph TD; A-->B;");

    let mut sync = with_engine(doc);
    sync.synchronize().unwrap();
    let first_marker = sync.document().elements_with_class("mermaid")[0];
    let html_before = sync.document().to_html();

    // Content injected by client-side navigation
    let doc = sync.document_mut();
    let body = doc.body();
    doc.append_fenced_block(body, "language-mermaid", "sequenceDiagram\n  A->>B: hi");
    doc.append_element(body, "div", &["mermaid"], "pie title Pets");

    let report = sync.synchronize().unwrap();
    assert_eq!(report.converted, 2);
    assert_eq!(report.already_converted, 1);

    let markers = sync.document().elements_with_class("mermaid");
    assert_eq!(markers.len(), 3);
    // The first marker is the very same element, untouched
    assert_eq!(markers[0], first_marker);
    assert!(sync.document().to_html().starts_with(html_before.trim_end_matches("</body>")));
}

#[test]
fn test_engine_arrives_late() {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    doc.append_fenced_block(body, "language-mermaid", "graph LR; X-->Y");
    doc.append_fenced_block(body, "language-mermaid", "graph LR; Y-->Z");
    let before = doc.clone();

    let mut sync: MemorySync = Synchronizer::new(doc, None, SyncConfig::default());
    let report = sync.synchronize().unwrap();
    assert_eq!(report.outcome, PassOutcome::EngineUnavailable);
    assert_eq!(sync.document(), &before);

    // The engine script finished loading
    *sync.capability_mut() = Some(RecordingEngine::new());
    let report = sync.synchronize().unwrap();
    assert_eq!(report.outcome, PassOutcome::Rendered);
    assert!(report.initialized);
    assert_eq!(report.converted, 2);
    assert_eq!(engine(&sync).initialize_count(), 1);
}

#[test]
fn test_second_pass_is_idempotent() {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    doc.append_fenced_block(body, "language-mermaid", "graph TD; A-->B;");
    doc.append_element(body, "div", &["mermaid"], "graph TD; C-->D;");

    let mut sync = with_engine(doc);
    sync.synchronize().unwrap();
    let after_first = sync.document().clone();

    let report = sync.synchronize().unwrap();
    assert_eq!(report.converted, 0);
    assert_eq!(report.already_converted, 2);
    assert_eq!(sync.document(), &after_first);
}

#[test]
fn test_marker_takes_source_position() {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    doc.append_element(body, "h1", &[], "Architecture");
    let article = doc.append_element(body, "article", &[], "");
    doc.append_element(article, "p", &[], "Request flow:");
    doc.append_fenced_block(article, "language-mermaid", "graph LR; Client-->Server");
    doc.append_element(article, "p", &[], "Fin.");

    let mut sync = with_engine(doc);
    sync.synchronize().unwrap();

    assert_eq!(
        sync.document().to_html(),
        "<body><h1>Architecture</h1><article><p>Request flow:</p>\
         <div class=\"mermaid\" data-mermaid-sync=\"fenced\">graph LR; Client--&gt;Server</div>\
         <p>Fin.</p></article></body>"
    );
}

#[test]
fn test_class_marked_source_normalized() {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let pre = doc.append_element(body, "pre", &["mermaid"], "");
    doc.append_element(pre, "code", &[], "\n  graph TD; A-->B;\n");

    let mut sync = with_engine(doc);
    let report = sync.synchronize().unwrap();
    assert_eq!(report.converted, 1);

    let doc = sync.document();
    let marker = doc.elements_with_class("mermaid")[0];
    assert_eq!(doc.tag_name(&marker), "div");
    assert_eq!(doc.text_content(&marker), "graph TD; A-->B;");
    assert_eq!(doc.attribute(&marker, CONVERTED_ATTR).as_deref(), Some("classed"));
    assert!(doc.children(marker).is_empty());
}

#[test]
fn test_both_shapes_on_one_block_convert_once() {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let pre = doc.append_element(body, "pre", &["mermaid"], "");
    doc.append_element(pre, "code", &["language-mermaid"], "graph TD; A-->B;");

    let mut sync = with_engine(doc);
    let report = sync.synchronize().unwrap();

    assert_eq!(report.found, 1);
    assert_eq!(report.converted, 1);
    assert_eq!(sync.document().elements_with_class("mermaid").len(), 1);
}

#[test]
fn test_start_on_load_leaves_classed_sources_to_engine() {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let div = doc.append_element(body, "div", &["mermaid"], "graph TD; A-->B;");
    doc.append_fenced_block(body, "language-mermaid", "graph TD; C-->D;");

    let config =
        SyncConfig::default().with_render(RenderConfig::default().with_start_on_load(true));
    let mut sync = Synchronizer::new(doc, Some(RecordingEngine::new()), config);
    let report = sync.synchronize().unwrap();

    assert_eq!(report.deferred, 1);
    assert_eq!(report.converted, 1);
    // Untouched and still in place
    assert!(sync.document().is_attached(div));
    assert_eq!(sync.document().attribute(&div, CONVERTED_ATTR), None);
}

#[test]
fn test_engine_rendered_markers_left_alone() {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let div = doc.append_element(body, "div", &["mermaid"], "");
    doc.set_attribute(div, ENGINE_PROCESSED_ATTR, "true");
    let before = doc.clone();

    let mut sync = with_engine(doc);
    let report = sync.synchronize().unwrap();
    assert_eq!(report.already_converted, 1);
    assert_eq!(sync.document(), &before);
}

#[test]
fn test_malformed_diagram_passes_through() {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    doc.append_fenced_block(body, "language-mermaid", "graph TD; A-->");
    doc.append_fenced_block(body, "language-mermaid", "");

    let mut sync = with_engine(doc);
    let report = sync.synchronize().unwrap();
    assert_eq!(report.converted, 2);

    let doc = sync.document();
    let texts: Vec<String> = doc
        .elements_with_class("mermaid")
        .iter()
        .map(|id| doc.text_content(id))
        .collect();
    assert_eq!(texts, vec!["graph TD; A-->".to_string(), String::new()]);
}

#[test]
fn test_replaced_page_content_dropped_from_selection() {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let main = doc.append_element(body, "main", &[], "");
    doc.append_fenced_block(main, "language-mermaid", "graph TD; A-->B;");

    let mut sync = with_engine(doc);
    sync.synchronize().unwrap();

    let doc = sync.document_mut();
    doc.clear_children(main);
    doc.append_fenced_block(main, "language-mermaid", "graph TD; Next-->Page;");

    let report = sync.synchronize().unwrap();
    assert_eq!(report.found, 1);
    assert_eq!(report.converted, 1);
    assert_eq!(report.already_converted, 0);
}

/// Detaches a node in the middle of a pass, like navigation teardown racing
/// the synchronizer
struct TeardownDocument {
    inner: MemoryDocument,
    detach_on_first_replace: Option<NodeId>,
}

impl Document for TeardownDocument {
    type Node = NodeId;

    fn elements_with_any_class(&self, classes: &[&str]) -> Result<Vec<NodeId>, DomError> {
        self.inner.elements_with_any_class(classes)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.inner.parent(node)
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.inner.tag_name(node)
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.inner.has_class(node, class)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.inner.attribute(node, name)
    }

    fn text_content(&self, node: &NodeId) -> String {
        self.inner.text_content(node)
    }

    fn replace_with_marker(
        &mut self,
        target: &NodeId,
        marker: &DiagramMarker,
    ) -> Result<NodeId, DomError> {
        if let Some(node) = self.detach_on_first_replace.take() {
            self.inner.remove(node);
        }
        self.inner.replace_with_marker(target, marker)
    }
}

#[test]
fn test_source_removed_mid_pass_is_skipped() {
    let mut inner = MemoryDocument::new();
    let body = inner.body();
    inner.append_fenced_block(body, "language-mermaid", "graph TD; A-->B;");
    let doomed = inner.append_fenced_block(body, "language-mermaid", "graph TD; C-->D;");
    inner.append_fenced_block(body, "language-mermaid", "graph TD; E-->F;");

    let document = TeardownDocument {
        inner,
        detach_on_first_replace: Some(doomed),
    };
    let mut sync = Synchronizer::new(document, Some(RecordingEngine::new()), SyncConfig::default());
    let report = sync.synchronize().unwrap();

    assert_eq!(report.found, 3);
    assert_eq!(report.converted, 2);
    assert_eq!(report.vanished, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(sync.document().inner.elements_with_class("mermaid").len(), 2);

    let engine = sync.capability().as_ref().unwrap();
    assert_eq!(engine.render_count(), 1);
}

#[test]
fn test_source_inside_removed_container_is_skipped() {
    let mut inner = MemoryDocument::new();
    let body = inner.body();
    inner.append_fenced_block(body, "language-mermaid", "graph TD; Nav-->Home;");
    let main = inner.append_element(body, "main", &[], "");
    inner.append_fenced_block(main, "language-mermaid", "graph TD; Old-->Page;");

    let document = TeardownDocument {
        inner,
        detach_on_first_replace: Some(main),
    };
    let mut sync = Synchronizer::new(document, Some(RecordingEngine::new()), SyncConfig::default());
    let report = sync.synchronize().unwrap();

    assert_eq!(report.found, 2);
    assert_eq!(report.converted, 1);
    assert_eq!(report.vanished, 1);
    assert_eq!(sync.document().inner.replacements(), 1);
    assert_eq!(sync.document().inner.elements_with_class("mermaid").len(), 1);
}

#[test]
fn test_fenced_block_nested_in_classed_element_converts_once() {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let div = doc.append_element(body, "div", &["mermaid"], "");
    doc.append_fenced_block(div, "language-mermaid", "graph LR; In-->Out");

    let mut sync = with_engine(doc);
    let report = sync.synchronize().unwrap();

    assert_eq!(report.found, 2);
    assert_eq!(report.converted, 1);
    assert_eq!(report.vanished, 1);

    let doc = sync.document();
    let markers = doc.elements_with_class("mermaid");
    assert_eq!(markers.len(), 1);
    assert_eq!(doc.text_content(&markers[0]), "graph LR; In-->Out");
    assert_eq!(doc.replacements(), 1);
}
