//! Decides when the player should be handed a new source or a seek.

use crate::cache::MediaGraphCache;
use crate::error::{PlaybackError, Result};
use crate::graph::MediaGraph;
use cutme_core::types::{TimeMs, Timeline};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum GraphUpdate {
    Play(Arc<MediaGraph>),
    /// The timeline no longer has anything to play.
    Clear,
}

/// Sits between the editing session and the player. A new graph is handed
/// out once per timeline change; seeks are forwarded only while the user is
/// scrubbing the timeline, so playback progress never fights the scroll.
#[derive(Debug, Default)]
pub struct PlayerGate {
    cache: MediaGraphCache,
    pending: Option<GraphUpdate>,
    playing_graph: bool,
    touching: bool,
}

impl PlayerGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when a new update is waiting for the player.
    pub fn update_timeline(&mut self, timeline: &Timeline) -> Result<bool> {
        match self.cache.get_or_compile(timeline) {
            Ok(cached) if cached.rebuilt => {
                self.pending = Some(GraphUpdate::Play(cached.graph));
                self.playing_graph = true;
            }
            Ok(_) => {}
            Err(PlaybackError::NothingToPlay) => {
                if self.playing_graph {
                    tracing::debug!("timeline emptied, clearing player");
                    self.pending = Some(GraphUpdate::Clear);
                    self.playing_graph = false;
                }
            }
            Err(e) => return Err(e),
        }
        Ok(self.pending.is_some())
    }

    /// Take the pending update, if any. Each update is returned once.
    pub fn take_update(&mut self) -> Option<GraphUpdate> {
        self.pending.take()
    }

    pub fn set_touching(&mut self, touching: bool) {
        self.touching = touching;
    }

    pub fn is_touching(&self) -> bool {
        self.touching
    }

    /// Seek target for the player while the user drives the cursor. Consumes
    /// the touch, so one gesture yields one seek.
    pub fn take_seek(&mut self, cursor: TimeMs) -> Option<TimeMs> {
        if !self.touching {
            return None;
        }
        self.touching = false;
        Some(cursor)
    }
}
