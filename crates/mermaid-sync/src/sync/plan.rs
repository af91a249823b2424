//! Conversion planning
//!
//! Pure decision step between selection and mutation: given the sources found
//! in the document, work out which ones get a new marker.

use tracing::trace;

use crate::core::{DiagramMarker, DiagramSource, SourceShape, SyncConfig};

/// Replace `target` with `marker`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion<N> {
    pub target: N,
    pub marker: DiagramMarker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPlan<N> {
    pub conversions: Vec<Conversion<N>>,
    /// Sources that already are markers
    pub already_converted: usize,
    /// Class-marked sources left to the engine's own scan
    pub deferred: usize,
    /// Repeat sightings of a node matched by both shapes
    pub duplicates: usize,
}

impl<N> Default for ConversionPlan<N> {
    fn default() -> Self {
        Self {
            conversions: Vec::new(),
            already_converted: 0,
            deferred: 0,
            duplicates: 0,
        }
    }
}

impl<N> ConversionPlan<N> {
    pub fn is_empty(&self) -> bool {
        self.conversions.is_empty()
    }
}

/// Decide which sources to convert
///
/// - converted sources are skipped
/// - with `startOnLoad` enabled, class-marked sources belong to the engine's
///   auto-scan and are skipped, so the two sets never overlap
/// - each node is considered once, at its first sighting
pub fn plan_conversions<N: Clone + PartialEq>(
    sources: &[DiagramSource<N>],
    config: &SyncConfig,
) -> ConversionPlan<N> {
    let mut plan = ConversionPlan::default();
    let mut seen: Vec<&N> = Vec::with_capacity(sources.len());

    for source in sources {
        if seen.contains(&&source.node) {
            plan.duplicates += 1;
            continue;
        }
        seen.push(&source.node);

        if source.converted {
            plan.already_converted += 1;
            continue;
        }

        if config.render.start_on_load && source.shape == SourceShape::Classed {
            trace!("class-marked source left to engine auto-scan");
            plan.deferred += 1;
            continue;
        }

        plan.conversions.push(Conversion {
            target: source.node.clone(),
            marker: DiagramMarker::new(config.marker_class.as_str(), &source.text, source.shape),
        });
    }

    plan
}
