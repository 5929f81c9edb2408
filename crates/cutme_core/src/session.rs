//! The editing session: sole owner of the current timeline.
//!
//! Every intent resolves piece ids to addresses against the current timeline
//! right before acting, builds a new timeline, and publishes it in a single
//! assignment. Successful edits are recorded in the history.

use crate::error::{CoreError, Result};
use crate::history::HistoryRecorder;
use crate::layout::{clamp_zoom, rescale_zoom, LayoutMapper, ScrollProgress};
use crate::settings::EditorSettings;
use crate::types::*;
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSummary {
    pub total: TimeMs,
    pub count: usize,
}

impl fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.total.short_label(), self.count)
    }
}

#[derive(Debug, Clone)]
pub struct EditSession {
    settings: EditorSettings,
    timeline: Timeline,
    history: HistoryRecorder,
    selection: HashSet<Uuid>,
    zoom: f32,
    cursor: TimeMs,
}

impl EditSession {
    pub fn new(settings: EditorSettings) -> Self {
        Self::with_timeline(settings, Timeline::default())
    }

    pub fn with_timeline(settings: EditorSettings, timeline: Timeline) -> Self {
        let timeline = timeline.normalized();
        let mut history = HistoryRecorder::new(settings.history_limit);
        history.record(timeline.clone());
        let zoom = clamp_zoom(1.0, settings.min_zoom);
        Self {
            settings,
            timeline,
            history,
            selection: HashSet::new(),
            zoom,
            cursor: TimeMs::ZERO,
        }
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn history(&self) -> &HistoryRecorder {
        &self.history
    }

    pub fn selection(&self) -> &HashSet<Uuid> {
        &self.selection
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn cursor(&self) -> TimeMs {
        self.cursor
    }

    pub fn layout(&self) -> LayoutMapper {
        LayoutMapper::new(&self.settings, &self.timeline, self.zoom)
    }

    pub fn can_undo(&self) -> bool {
        self.history.has_previous()
    }

    pub fn can_redo(&self) -> bool {
        self.history.has_next()
    }

    // -----------------------------------------------------------------------
    // view state
    // -----------------------------------------------------------------------

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = clamp_zoom(zoom, self.settings.min_zoom);
    }

    /// Apply a pinch gesture's incremental scale factor.
    pub fn zoom_by(&mut self, factor: f32) {
        self.set_zoom(self.zoom * factor);
    }

    pub fn set_cursor(&mut self, position: TimeMs) {
        self.cursor = position.clamp(TimeMs::ZERO, self.timeline.longest_duration());
    }

    /// Follow the timeline's scroll position.
    pub fn sync_cursor(&mut self, progress: ScrollProgress) {
        self.cursor = progress.cursor(self.timeline.longest_duration());
    }

    // -----------------------------------------------------------------------
    // selection
    // -----------------------------------------------------------------------

    /// Returns whether the piece is selected afterwards.
    pub fn toggle_selection(&mut self, piece_id: Uuid) -> Result<bool> {
        if !self.timeline.contains(piece_id) {
            return Err(CoreError::PieceNotFound(piece_id));
        }
        if self.selection.remove(&piece_id) {
            Ok(false)
        } else {
            self.selection.insert(piece_id);
            Ok(true)
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection_summary(&self) -> SelectionSummary {
        let total = self
            .timeline
            .tracks
            .iter()
            .flat_map(|t| &t.pieces)
            .filter(|p| self.selection.contains(&p.id()))
            .map(Piece::duration)
            .sum();
        SelectionSummary {
            total,
            count: self.selection.len(),
        }
    }

    // -----------------------------------------------------------------------
    // edits
    // -----------------------------------------------------------------------

    /// Remove every selected piece. Returns how many were removed.
    pub fn delete_selected(&mut self) -> Result<usize> {
        if self.selection.is_empty() {
            return Err(CoreError::InvalidOperation("nothing selected".into()));
        }
        let before = self.timeline.piece_count();
        let next = self.timeline.remove_pieces(&self.selection);
        let removed = before - next.piece_count();
        self.selection.clear();
        self.commit(next);
        tracing::debug!(removed, "deleted selected pieces");
        Ok(removed)
    }

    /// Cut every selected piece under the cursor. Pieces the cursor does not
    /// fall strictly inside are skipped. Returns how many pieces were cut.
    pub fn cut_selected_at_cursor(&mut self) -> Result<usize> {
        if self.selection.is_empty() {
            return Err(CoreError::InvalidOperation("nothing selected".into()));
        }

        let selected: Vec<Uuid> = self.selection.drain().collect();
        let mut next = self.timeline.clone();
        let mut cut = 0;
        for piece_id in selected {
            let Some(pos) = next.locate(piece_id) else {
                continue;
            };
            let cut_point = self.cursor - next.preceding_duration(pos)?;
            match next.cut_piece(pos, cut_point) {
                Ok(edited) => {
                    next = edited;
                    cut += 1;
                }
                Err(err @ CoreError::InvalidCutPoint { .. }) => {
                    tracing::warn!(%piece_id, %pos, "skipping cut: {err}");
                }
                Err(err) => return Err(err),
            }
        }

        if cut > 0 {
            self.commit(next);
        }
        Ok(cut)
    }

    /// Append imported media to the end of `track`.
    pub fn append_media(&mut self, track: usize, imports: &[MediaImport]) -> Result<()> {
        let pieces = self.pieces_from(imports)?;
        let next = self.timeline.insert_into_track(track, usize::MAX, pieces)?;
        self.commit(next);
        Ok(())
    }

    /// Insert imported media right after the single selected piece.
    pub fn insert_after_selected(&mut self, imports: &[MediaImport]) -> Result<()> {
        let piece_id = match self.selection.iter().collect::<Vec<_>>().as_slice() {
            [id] => **id,
            _ => {
                return Err(CoreError::InvalidOperation(
                    "exactly one piece must be selected".into(),
                ))
            }
        };
        let pos = self
            .timeline
            .locate(piece_id)
            .ok_or(CoreError::PieceNotFound(piece_id))?;
        let pieces = self.pieces_from(imports)?;
        let next = self.timeline.insert_into_track(pos.track, pos.piece + 1, pieces)?;
        self.selection.clear();
        self.commit(next);
        Ok(())
    }

    /// Finish a drag: move the piece to `target`, leaving a blank spacer of
    /// `blank_width_dp` in front of it.
    pub fn drop_piece(&mut self, piece_id: Uuid, target: PositionAddress, blank_width_dp: u32) -> Result<()> {
        let initial = self
            .timeline
            .locate(piece_id)
            .ok_or(CoreError::PieceNotFound(piece_id))?;
        let blank = self.layout().blank_duration(blank_width_dp);
        let next = self.timeline.move_piece(initial, target, blank)?;
        self.commit(next);
        Ok(())
    }

    pub fn undo(&mut self) -> Result<()> {
        let previous = self.history.previous()?.clone();
        self.publish(previous);
        Ok(())
    }

    pub fn redo(&mut self) -> Result<()> {
        let next = self.history.next()?.clone();
        self.publish(next);
        Ok(())
    }

    fn pieces_from(&self, imports: &[MediaImport]) -> Result<Vec<Piece>> {
        if imports.is_empty() {
            return Err(CoreError::InvalidOperation("no media to add".into()));
        }
        imports
            .iter()
            .map(|import| Piece::from_import(import, self.settings.default_import_duration))
            .collect()
    }

    fn commit(&mut self, next: Timeline) {
        let next = next.normalized();
        self.history.record(next.clone());
        self.publish(next);
    }

    fn publish(&mut self, next: Timeline) {
        let old_longest = self.timeline.longest_duration();
        let new_longest = next.longest_duration();
        self.zoom = rescale_zoom(self.zoom, old_longest, new_longest, self.settings.min_zoom);
        self.selection.retain(|id| next.contains(*id));
        self.cursor = self.cursor.clamp(TimeMs::ZERO, new_longest);
        self.timeline = next;
        tracing::debug!(
            tracks = self.timeline.tracks.len(),
            pieces = self.timeline.piece_count(),
            zoom = self.zoom,
            "timeline updated"
        );
    }
}
