use crate::error::{CoreError, Result};
use crate::types::Timeline;

/// Linear undo/redo log of whole-timeline snapshots.
///
/// `cursor` always names the snapshot currently on screen. Recording while
/// the cursor is behind the newest entry discards everything after it.
#[derive(Debug, Clone)]
pub struct HistoryRecorder {
    snapshots: Vec<Timeline>,
    cursor: Option<usize>,
    max_size: usize,
}

impl HistoryRecorder {
    pub fn new(max_size: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            cursor: None,
            max_size: max_size.max(1),
        }
    }

    /// Append a snapshot and make it current. Drops the oldest snapshot once
    /// `max_size` is exceeded.
    pub fn record(&mut self, snapshot: Timeline) {
        match self.cursor {
            Some(cursor) => self.snapshots.truncate(cursor + 1),
            None => self.snapshots.clear(),
        }
        self.snapshots.push(snapshot);
        if self.snapshots.len() > self.max_size {
            self.snapshots.remove(0);
        }
        self.cursor = Some(self.snapshots.len() - 1);
        tracing::debug!(len = self.snapshots.len(), "recorded timeline snapshot");
    }

    pub fn has_previous(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn has_next(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.snapshots.len())
    }

    /// Step back one snapshot.
    pub fn previous(&mut self) -> Result<&Timeline> {
        let cursor = match self.cursor {
            Some(c) if c > 0 => c - 1,
            _ => return Err(CoreError::NothingToUndo),
        };
        self.cursor = Some(cursor);
        Ok(&self.snapshots[cursor])
    }

    /// Step forward one snapshot.
    pub fn next(&mut self) -> Result<&Timeline> {
        let cursor = match self.cursor {
            Some(c) if c + 1 < self.snapshots.len() => c + 1,
            _ => return Err(CoreError::NothingToRedo),
        };
        self.cursor = Some(cursor);
        Ok(&self.snapshots[cursor])
    }

    pub fn current(&self) -> Option<&Timeline> {
        self.cursor.map(|c| &self.snapshots[c])
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn snapshots(&self) -> &[Timeline] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl Default for HistoryRecorder {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    fn snapshot(ms: i64) -> Timeline {
        Timeline::new(vec![Track::new(vec![Piece::blank(TimeMs(ms)).unwrap()])])
    }

    // -----------------------------------------------------------------------
    // empty history
    // -----------------------------------------------------------------------

    #[test]
    fn empty_history_has_no_neighbours() {
        let mut history = HistoryRecorder::new(100);
        assert!(history.is_empty());
        assert!(history.current().is_none());
        assert!(!history.has_previous());
        assert!(!history.has_next());
        assert!(matches!(history.previous().unwrap_err(), CoreError::NothingToUndo));
        assert!(matches!(history.next().unwrap_err(), CoreError::NothingToRedo));
    }

    // -----------------------------------------------------------------------
    // record / navigate
    // -----------------------------------------------------------------------

    #[test]
    fn record_moves_cursor_to_end() {
        let mut history = HistoryRecorder::new(100);
        history.record(snapshot(1));
        history.record(snapshot(2));
        assert_eq!(history.cursor(), Some(1));
        assert_eq!(history.current().unwrap().longest_duration(), TimeMs(2));
        assert!(history.has_previous());
        assert!(!history.has_next());
    }

    #[test]
    fn previous_and_next_step_by_one() {
        let mut history = HistoryRecorder::new(100);
        let (a, b, c) = (snapshot(1), snapshot(2), snapshot(3));
        history.record(a.clone());
        history.record(b.clone());
        history.record(c.clone());

        assert_eq!(history.previous().unwrap(), &b);
        assert_eq!(history.previous().unwrap(), &a);
        assert!(!history.has_previous());
        assert!(history.previous().is_err());
        assert_eq!(history.cursor(), Some(0));

        assert_eq!(history.next().unwrap(), &b);
        assert_eq!(history.next().unwrap(), &c);
        assert!(!history.has_next());
        assert!(history.next().is_err());
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn record_after_undo_truncates_forward_history() {
        let mut history = HistoryRecorder::new(100);
        let (a, b, c, d) = (snapshot(1), snapshot(2), snapshot(3), snapshot(4));
        history.record(a.clone());
        history.record(b);
        history.record(c);
        history.previous().unwrap();
        history.previous().unwrap();

        history.record(d.clone());
        assert!(!history.has_next());
        assert_eq!(history.snapshots(), &[a, d]);
        assert_eq!(history.cursor(), Some(1));
    }

    #[test]
    fn max_size_drops_oldest() {
        let mut history = HistoryRecorder::new(3);
        for i in 1..=5 {
            history.record(snapshot(i));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.snapshots()[0].longest_duration(), TimeMs(3));
        assert_eq!(history.cursor(), Some(2));

        assert!(history.previous().is_ok());
        assert!(history.previous().is_ok());
        assert!(history.previous().is_err());
    }
}
