use serde::Serialize;

use crate::Adjustments;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryState {
    CanUndo,
    AtSeed,
}

/// Linear stack of adjustment snapshots, oldest first.
///
/// Always holds at least the seed snapshot, and the last entry is the current
/// value. Snapshots are stored whole: `Adjustments` is `Copy` and no larger
/// than a `(field, previous value)` log entry would be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct History {
    entries: Vec<Adjustments>,
}

impl Default for History {
    fn default() -> Self {
        Self::seeded(Adjustments::default())
    }
}

impl History {
    pub fn seeded(seed: Adjustments) -> Self {
        Self {
            entries: vec![seed],
        }
    }

    pub fn push(&mut self, snapshot: Adjustments) {
        self.entries.push(snapshot);
    }

    /// Drops the newest snapshot and returns the one that is current now.
    /// Returns `None` without touching anything when only the seed is left.
    pub fn undo(&mut self) -> Option<Adjustments> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop();
        self.entries.last().copied()
    }

    pub fn current(&self) -> Adjustments {
        self.entries
            .last()
            .copied()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Adjustments] {
        &self.entries
    }

    pub fn state(&self) -> HistoryState {
        if self.entries.len() > 1 {
            HistoryState::CanUndo
        } else {
            HistoryState::AtSeed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AdjustmentField;

    #[test]
    fn starts_at_seed() {
        let history = History::default();
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), Adjustments::default());
        assert_eq!(history.state(), HistoryState::AtSeed);
    }

    #[test]
    fn undo_at_seed_is_noop() {
        let mut history = History::default();
        assert_eq!(history.undo(), None);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn undo_lands_on_previous_snapshot() {
        let mut history = History::default();
        let first = Adjustments::default().with_field(AdjustmentField::Brightness, 120);
        let second = first.with_field(AdjustmentField::Blur, 3);
        history.push(first);
        history.push(second);
        assert_eq!(history.state(), HistoryState::CanUndo);

        assert_eq!(history.undo(), Some(first));
        assert_eq!(history.state(), HistoryState::CanUndo);
        assert_eq!(history.undo(), Some(Adjustments::default()));
        assert_eq!(history.state(), HistoryState::AtSeed);
    }

    #[test]
    fn identical_snapshots_are_kept() {
        let mut history = History::default();
        let snapshot = Adjustments::default().with_field(AdjustmentField::Saturation, 0);
        for _ in 0..3 {
            history.push(snapshot);
        }
        assert_eq!(history.len(), 4);
    }
}
