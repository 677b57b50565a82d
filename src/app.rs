use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use sweepstake_domain::board::SweepstakeBoard;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Prizes,
    Participants,
    Matches,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let app = Self {
            state: AppState::new(),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_sweepstakes_loaded(&mut self, boards: Vec<SweepstakeBoard>) {
        self.state.last_error = None;
        self.state.board.load(boards);
    }

    /// Keeps the last good boards on screen; the error is shown alongside.
    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        self.state.board.scroll_offset = 0;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Sweepstake navigation, delegated to BoardState
    // -----------------------------------------------------------------------

    pub fn next_sweepstake(&mut self) {
        self.state.board.next();
    }

    pub fn prev_sweepstake(&mut self) {
        self.state.board.prev();
    }

    pub fn scroll_down(&mut self) {
        self.state.board.scroll_down();
    }

    pub fn scroll_up(&mut self) {
        self.state.board.scroll_up();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweepstake_domain::board::BoardPrizes;

    fn app() -> App {
        App::new(AppSettings::from_lookup(|_| None))
    }

    fn board(id: &str) -> SweepstakeBoard {
        SweepstakeBoard {
            id: id.into(),
            title: id.into(),
            image_url: String::new(),
            last_updated: None,
            prizes: BoardPrizes::default(),
            entries: vec![],
            matches: vec![],
            build: false,
        }
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = app();
        app.update_tab(MenuItem::Matches);
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Matches);

        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Matches);
    }

    #[test]
    fn error_keeps_boards_until_next_load() {
        let mut app = app();
        app.on_sweepstakes_loaded(vec![board("a")]);
        app.on_error("cannot read sweepstakes: boom".into());
        assert_eq!(app.state.board.boards.len(), 1);
        assert!(app.state.last_error.is_some());

        app.on_sweepstakes_loaded(vec![board("a"), board("b")]);
        assert!(app.state.last_error.is_none());
        app.next_sweepstake();
        assert_eq!(app.state.board.selected_board().map(|b| b.id.as_str()), Some("b"));
    }

    #[test]
    fn switching_tabs_resets_scroll() {
        let mut app = app();
        app.scroll_down();
        app.update_tab(MenuItem::Participants);
        assert_eq!(app.state.board.scroll_offset, 0);
        app.toggle_full_screen();
        assert!(app.settings.full_screen);
    }
}
