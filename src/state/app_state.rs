use crate::app::MenuItem;
use chrono::Local;
use sweepstake_domain::board::SweepstakeBoard;

// ---------------------------------------------------------------------------
// Prize board state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct BoardState {
    pub boards: Vec<SweepstakeBoard>,
    /// Index into `boards` of the sweepstake on screen.
    pub selected: usize,
    /// Vertical scroll offset, reset whenever the sweepstake changes.
    pub scroll_offset: u16,
    /// Local time of the last successful load.
    pub loaded_at: Option<String>,
}

impl BoardState {
    /// Replace the boards, keeping the same sweepstake on screen when it
    /// is still present after a reload.
    pub fn load(&mut self, boards: Vec<SweepstakeBoard>) {
        let previous_id = self.selected_board().map(|b| b.id.clone());
        let reselected = previous_id
            .as_deref()
            .and_then(|id| boards.iter().position(|b| b.id == id));

        match reselected {
            Some(idx) => self.selected = idx,
            None => {
                self.selected = 0;
                self.scroll_offset = 0;
            }
        }
        self.boards = boards;
        self.loaded_at = Some(Local::now().format("%H:%M:%S").to_string());
    }

    pub fn selected_board(&self) -> Option<&SweepstakeBoard> {
        self.boards.get(self.selected)
    }

    pub fn next(&mut self) {
        if self.boards.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.boards.len();
        self.scroll_offset = 0;
    }

    pub fn prev(&mut self) {
        if self.boards.is_empty() {
            return;
        }
        self.selected = self.selected.checked_sub(1).unwrap_or(self.boards.len() - 1);
        self.scroll_offset = 0;
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub board: BoardState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweepstake_domain::board::BoardPrizes;

    fn board(id: &str) -> SweepstakeBoard {
        SweepstakeBoard {
            id: id.to_string(),
            title: format!("{id} sweepstake"),
            image_url: String::new(),
            last_updated: None,
            prizes: BoardPrizes::default(),
            entries: vec![],
            matches: vec![],
            build: true,
        }
    }

    #[test]
    fn cycling_wraps_both_ways() {
        let mut state = BoardState::default();
        state.load(vec![board("a"), board("b"), board("c")]);

        state.prev();
        assert_eq!(state.selected_board().map(|b| b.id.as_str()), Some("c"));
        state.next();
        assert_eq!(state.selected_board().map(|b| b.id.as_str()), Some("a"));
        state.next();
        assert_eq!(state.selected, 1);
    }

    #[test]
    fn cycling_with_no_boards_is_a_noop() {
        let mut state = BoardState::default();
        state.next();
        state.prev();
        assert_eq!(state.selected, 0);
        assert!(state.selected_board().is_none());
    }

    #[test]
    fn reload_keeps_selected_sweepstake() {
        let mut state = BoardState::default();
        state.load(vec![board("a"), board("b")]);
        state.next();
        state.scroll_down();
        state.scroll_down();

        state.load(vec![board("z"), board("a"), board("b")]);
        assert_eq!(state.selected, 2);
        assert_eq!(state.scroll_offset, 2);
        assert!(state.loaded_at.is_some());
    }

    #[test]
    fn reload_without_selected_sweepstake_resets() {
        let mut state = BoardState::default();
        state.load(vec![board("a"), board("b")]);
        state.next();
        state.scroll_down();

        state.load(vec![board("c")]);
        assert_eq!(state.selected, 0);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn scrolling_saturates_at_top() {
        let mut state = BoardState::default();
        state.scroll_up();
        assert_eq!(state.scroll_offset, 0);
        state.scroll_down();
        state.scroll_up();
        assert_eq!(state.scroll_offset, 0);
    }
}
