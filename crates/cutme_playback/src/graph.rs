use crate::error::{PlaybackError, Result};
use cutme_core::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A compiled playback source: one concatenation per non-empty track, all
/// tracks merged and played in parallel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaGraph {
    pub inputs: Vec<MediaInput>,
    pub tracks: Vec<TrackSource>,
}

/// A distinct media file the player has to open. Pieces cut from the same
/// file share one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaInput {
    pub uri: String,
    pub kind: MediaKind,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSource {
    /// Index of the track in the timeline it was compiled from.
    pub track_index: usize,
    pub segments: Vec<Segment>,
}

impl TrackSource {
    pub fn duration(&self) -> TimeMs {
        self.segments.iter().map(Segment::duration).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    /// `[clip_start_us, clip_end_us)` of an input.
    Clip {
        input: usize,
        clip_start_us: i64,
        clip_end_us: i64,
    },
    /// Nothing plays on this track for `duration`.
    Gap { duration: TimeMs },
}

impl Segment {
    pub fn duration(&self) -> TimeMs {
        match self {
            Segment::Clip {
                clip_start_us,
                clip_end_us,
                ..
            } => TimeMs((clip_end_us - clip_start_us) / 1_000),
            Segment::Gap { duration } => *duration,
        }
    }
}

impl MediaGraph {
    /// Compile a timeline into a playback graph.
    ///
    /// Empty tracks are skipped; blank pieces become gaps.
    pub fn compile(timeline: &Timeline) -> Result<MediaGraph> {
        let mut uri_to_index: HashMap<&str, usize> = HashMap::new();
        let mut inputs: Vec<MediaInput> = Vec::new();
        let mut tracks = Vec::new();

        for (track_index, track) in timeline.tracks.iter().enumerate() {
            if track.is_empty() {
                continue;
            }

            let segments = track
                .pieces
                .iter()
                .map(|piece| match piece.model() {
                    Some(media) => {
                        let input = *uri_to_index.entry(media.uri.as_str()).or_insert_with(|| {
                            inputs.push(MediaInput {
                                uri: media.uri.clone(),
                                kind: media.kind,
                                index: inputs.len(),
                            });
                            inputs.len() - 1
                        });
                        Segment::Clip {
                            input,
                            clip_start_us: piece.start().as_micros(),
                            clip_end_us: piece.end().as_micros(),
                        }
                    }
                    None => Segment::Gap {
                        duration: piece.duration(),
                    },
                })
                .collect();

            tracks.push(TrackSource {
                track_index,
                segments,
            });
        }

        if tracks.is_empty() {
            return Err(PlaybackError::NothingToPlay);
        }

        Ok(MediaGraph { inputs, tracks })
    }

    /// Length of the merged output: the longest track.
    pub fn duration(&self) -> TimeMs {
        self.tracks
            .iter()
            .map(TrackSource::duration)
            .max()
            .unwrap_or(TimeMs::ZERO)
    }

    pub fn input(&self, index: usize) -> Option<&MediaInput> {
        self.inputs.get(index)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
