use std::collections::BTreeMap;

use crate::structures::PixelGrid;

/// Per-screen stacks of grid snapshots. The editor records one snapshot
/// before every mutating action and pops it back on undo.
#[derive(Debug, Default)]
pub struct UndoHistory {
    stacks: BTreeMap<usize, Vec<PixelGrid>>,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a copy of `grid` onto the stack for `screen_index`.
    pub fn record(&mut self, screen_index: usize, grid: &PixelGrid) {
        self.stacks
            .entry(screen_index)
            .or_default()
            .push(grid.clone());
    }

    /// Pops the most recent snapshot for `screen_index`. `None` means
    /// there is nothing to undo, which callers treat as a no-op.
    pub fn undo(&mut self, screen_index: usize) -> Option<PixelGrid> {
        self.stacks.get_mut(&screen_index)?.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_pops_in_reverse_order() {
        let mut history = UndoHistory::new();
        let mut grid = PixelGrid::new();
        history.record(0, &grid);
        grid.toggle(1, 1);
        history.record(0, &grid);

        assert!(history.undo(0).unwrap().is_lit(1, 1));
        assert!(history.undo(0).unwrap().is_empty());
        assert!(history.undo(0).is_none());
    }

    #[test]
    fn screens_keep_separate_stacks() {
        let mut history = UndoHistory::new();
        history.record(2, &PixelGrid::new());

        assert!(history.undo(0).is_none());
        assert!(history.undo(2).is_some());
        assert!(history.undo(2).is_none());
    }

    #[test]
    fn snapshots_do_not_alias_the_live_grid() {
        let mut history = UndoHistory::new();
        let mut grid = PixelGrid::new();
        history.record(0, &grid);

        grid.toggle(5, 5);
        assert!(history.undo(0).unwrap().is_empty());
    }
}
