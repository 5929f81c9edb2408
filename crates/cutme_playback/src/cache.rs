use crate::error::Result;
use crate::graph::MediaGraph;
use cutme_core::types::Timeline;
use std::sync::Arc;

/// Remembers the last compiled graph and the timeline it came from, so an
/// unchanged timeline never rebuilds the player source.
#[derive(Debug, Default)]
pub struct MediaGraphCache {
    saved: Option<(Timeline, Arc<MediaGraph>)>,
}

#[derive(Debug, Clone)]
pub struct CachedGraph {
    pub graph: Arc<MediaGraph>,
    /// Whether the graph was compiled by this call.
    pub rebuilt: bool,
}

impl MediaGraphCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compile(&mut self, timeline: &Timeline) -> Result<CachedGraph> {
        if let Some((saved_timeline, graph)) = &self.saved {
            if saved_timeline == timeline {
                return Ok(CachedGraph {
                    graph: Arc::clone(graph),
                    rebuilt: false,
                });
            }
        }

        let graph = match MediaGraph::compile(timeline) {
            Ok(graph) => Arc::new(graph),
            Err(e) => {
                self.saved = None;
                return Err(e);
            }
        };
        tracing::info!(
            tracks = graph.tracks.len(),
            inputs = graph.inputs.len(),
            duration = %graph.duration(),
            "compiled playback graph"
        );
        self.saved = Some((timeline.clone(), Arc::clone(&graph)));
        Ok(CachedGraph {
            graph,
            rebuilt: true,
        })
    }

    pub fn current(&self) -> Option<Arc<MediaGraph>> {
        self.saved.as_ref().map(|(_, graph)| Arc::clone(graph))
    }

    pub fn invalidate(&mut self) {
        self.saved = None;
    }
}
