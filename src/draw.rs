use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::Line;
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::prize_board::{MatchesView, ParticipantsView, PrizesView};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;

static TABS: &[&str; 3] = &["Prizes", "Participants", "Matches"];

const HELP_TEXT: &str = "\
q          quit
1 / 2 / 3  prizes / participants / matches
h / l      previous / next sweepstake
j / k      scroll down / up
r          reload tournaments and sweepstakes
f          toggle full screen
\"          toggle log pane
?          this help (Esc to go back)";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Help => draw_help(f, layout.main),
            tab => draw_board(f, layout.main, app, tab),
        }

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        log::error!("cannot draw frame: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Prizes => 0,
        MenuItem::Participants => 1,
        MenuItem::Matches => 2,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Title line shows which sweepstake is on screen, e.g. ` Office (1/3) `.
fn board_title(app: &App, tab: MenuItem) -> String {
    let board = &app.state.board;
    let tab_name = match tab {
        MenuItem::Participants => "Participants",
        MenuItem::Matches => "Matches",
        _ => "Prizes",
    };
    match board.selected_board() {
        Some(b) => format!(" {} | {tab_name} ({}/{}) ", b.title, board.selected + 1, board.boards.len()),
        None => format!(" {tab_name} "),
    }
}

fn draw_board(f: &mut Frame, area: Rect, app: &App, tab: MenuItem) {
    let border_color = if app.state.last_error.is_some() { Color::Red } else { Color::White };
    let block = default_border(border_color).title(board_title(app, tab));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(board) = app.state.board.selected_board() else {
        let msg = match app.state.last_error.as_deref() {
            Some(err) => format!("Load failed:\n{err}"),
            None => "Loading sweepstakes...".to_string(),
        };
        draw_message(f, inner, msg, Color::DarkGray);
        return;
    };

    let status_height = if app.state.last_error.is_some() { 4 } else { 1 };
    let [content, status] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(status_height)]).areas(inner);

    let scroll_offset = app.state.board.scroll_offset;
    match tab {
        MenuItem::Participants => f.render_widget(ParticipantsView { board, scroll_offset }, content),
        MenuItem::Matches => f.render_widget(MatchesView { board, scroll_offset }, content),
        _ => f.render_widget(PrizesView { board, scroll_offset }, content),
    }

    draw_status(f, status, app, board.last_updated.as_deref());
}

fn draw_status(f: &mut Frame, area: Rect, app: &App, last_updated: Option<&str>) {
    if let Some(err) = app.state.last_error.as_deref() {
        draw_message(f, area, format!("Reload failed, showing previous results:\n{err}"), Color::Red);
        return;
    }

    let stamp = match (last_updated, app.state.board.loaded_at.as_deref()) {
        (Some(updated), _) => format!("Last updated {updated}"),
        (None, Some(loaded)) => format!("Loaded at {loaded}"),
        (None, None) => String::new(),
    };
    f.render_widget(
        Paragraph::new(stamp)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Right),
        area,
    );
}

fn draw_message(f: &mut Frame, area: Rect, msg: String, color: Color) {
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(HELP_TEXT).style(Style::default().fg(Color::Gray)), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::Gray));
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
