use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
pub const LOG_PANE_HEIGHT: u16 = 8;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    /// Zero-sized unless the log pane is shown.
    pub logs: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let (content, logs) = Self::split_logs(area, show_logs);

        if full_screen {
            return LayoutAreas {
                tab_bar: [Rect::ZERO, Rect::ZERO],
                main: content,
                logs,
            };
        }

        let [tab, main] = Layout::vertical([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Fill(1),
        ])
        .areas(content);

        LayoutAreas {
            tab_bar: Self::split_tab_bar(tab),
            main,
            logs,
        }
    }

    fn split_logs(area: Rect, show_logs: bool) -> (Rect, Rect) {
        if !show_logs {
            return (area, Rect::ZERO);
        }
        let [content, logs] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(LOG_PANE_HEIGHT),
        ])
        .areas(area);
        (content, logs)
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_screen_drops_tab_bar() {
        let mut layout = LayoutAreas::new(Size::new(80, 24));
        assert_eq!(layout.main.height, 24 - TAB_BAR_HEIGHT);

        layout.update(Rect::new(0, 0, 80, 24), true, false);
        assert_eq!(layout.tab_bar, [Rect::ZERO, Rect::ZERO]);
        assert_eq!(layout.main, Rect::new(0, 0, 80, 24));
    }

    #[test]
    fn log_pane_takes_the_bottom_rows() {
        let mut layout = LayoutAreas::new(Size::new(80, 24));
        layout.update(Rect::new(0, 0, 80, 24), false, true);
        assert_eq!(layout.logs, Rect::new(0, 24 - LOG_PANE_HEIGHT, 80, LOG_PANE_HEIGHT));
        assert_eq!(layout.main.bottom(), layout.logs.top());
    }
}
