use sweepstake_domain::board::{BoardEntry, SweepstakeBoard};
use sweepstake_domain::prizes::{OutrightPrize, RankedPrize, TBC};
use sweepstake_domain::{Match, MatchCompetitor};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Paragraph, Widget};

const NAME_WIDTH: usize = 28;

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))
}

fn dim(text: impl Into<String>) -> Span<'static> {
    Span::styled(text.into(), Style::default().fg(Color::DarkGray))
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
        clipped.push('…');
        clipped
    } else {
        format!("{text}{}", " ".repeat(width - len))
    }
}

fn render_lines(lines: Vec<Line<'static>>, scroll_offset: u16, area: Rect, buf: &mut Buffer) {
    Paragraph::new(lines).scroll((scroll_offset, 0)).render(area, buf);
}

// ---------------------------------------------------------------------------
// Prizes
// ---------------------------------------------------------------------------

/// Outright prizes first, then each ranked table.
pub struct PrizesView<'a> {
    pub board: &'a SweepstakeBoard,
    pub scroll_offset: u16,
}

impl PrizesView<'_> {
    pub fn lines(&self) -> Vec<Line<'static>> {
        let prizes = &self.board.prizes;
        if prizes.is_empty() {
            return vec![Line::from(dim("No prizes enabled for this sweepstake"))];
        }

        let mut lines = Vec::new();
        for prize in prizes.outright() {
            lines.push(outright_line(prize));
        }
        for prize in prizes.ranked() {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.extend(ranked_lines(prize));
        }
        lines
    }
}

fn outright_line(prize: &OutrightPrize) -> Line<'static> {
    let style = if prize.participant_name == TBC {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };
    Line::from(vec![
        Span::styled(pad(&prize.prize_name, NAME_WIDTH), Style::default().fg(Color::Yellow)),
        Span::styled(prize.participant_name.clone(), style),
    ])
}

fn ranked_lines(prize: &RankedPrize) -> Vec<Line<'static>> {
    let mut lines = vec![heading(&prize.prize_name)];
    if prize.rankings.is_empty() {
        lines.push(Line::from(dim(format!("  {TBC}"))));
        return lines;
    }

    for rank in &prize.rankings {
        let position = rank.position.map(|p| format!("{p:>3}. ")).unwrap_or_else(|| "   - ".to_string());
        lines.push(Line::from(vec![
            dim(position),
            Span::raw(pad(&rank.participant_name, NAME_WIDTH)),
            Span::raw(rank.value.clone()),
        ]));
    }
    lines
}

impl Widget for PrizesView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        render_lines(self.lines(), self.scroll_offset, area, buf);
    }
}

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

/// Every team of the tournament with whoever drew it.
pub struct ParticipantsView<'a> {
    pub board: &'a SweepstakeBoard,
    pub scroll_offset: u16,
}

impl ParticipantsView<'_> {
    pub fn lines(&self) -> Vec<Line<'static>> {
        self.board.entries.iter().map(entry_line).collect()
    }
}

fn entry_line(entry: &BoardEntry) -> Line<'static> {
    let participant = if entry.participant_name.is_empty() {
        dim("-")
    } else {
        Span::raw(entry.participant_name.clone())
    };
    Line::from(vec![
        Span::styled(pad(&entry.team.name, NAME_WIDTH), Style::default().fg(Color::Cyan)),
        participant,
    ])
}

impl Widget for ParticipantsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        render_lines(self.lines(), self.scroll_offset, area, buf);
    }
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

/// Fixtures and results in file order.
pub struct MatchesView<'a> {
    pub board: &'a SweepstakeBoard,
    pub scroll_offset: u16,
}

impl MatchesView<'_> {
    pub fn lines(&self) -> Vec<Line<'static>> {
        if self.board.matches.is_empty() {
            return vec![Line::from(dim("No matches yet"))];
        }
        self.board.matches.iter().map(match_line).collect()
    }
}

fn competitor_name(competitor: &MatchCompetitor) -> String {
    competitor
        .team
        .as_ref()
        .map(|t| t.name.clone())
        .unwrap_or_else(|| TBC.to_string())
}

fn match_line(m: &Match) -> Line<'static> {
    let kickoff = m
        .timestamp
        .map(|t| t.format("%d/%m %H:%M").to_string())
        .unwrap_or_else(|| "--/-- --:--".to_string());

    let home = competitor_name(&m.home);
    let away = competitor_name(&m.away);
    let (score, score_style) = if m.completed {
        (
            format!("{} - {}", m.home.goals, m.away.goals),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )
    } else {
        ("vs".to_string(), Style::default().fg(Color::DarkGray))
    };

    Line::from(vec![
        dim(format!("{:>4} ", m.id)),
        Span::raw(format!("{kickoff}  ")),
        dim(format!("{:<9}", m.stage.label())),
        Span::raw(format!("{home:>20} ")),
        Span::styled(format!("{score:^7}"), score_style),
        Span::raw(format!(" {away}")),
    ])
}

impl Widget for MatchesView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        render_lines(self.lines(), self.scroll_offset, area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweepstake_domain::board::BoardPrizes;
    use sweepstake_domain::prizes::Rank;
    use sweepstake_domain::{MatchStage, Team};

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn team(id: &str, name: &str) -> Team {
        Team { id: id.into(), name: name.into(), image_url: String::new() }
    }

    fn board() -> SweepstakeBoard {
        let prizes = BoardPrizes {
            winner: Some(OutrightPrize {
                prize_name: "Tournament Winner".into(),
                participant_name: "Ann (Spain)".into(),
                image_url: String::new(),
            }),
            most_goals_conceded: Some(RankedPrize {
                prize_name: "Most Goals Conceded".into(),
                rankings: vec![Rank {
                    position: Some(1),
                    image_url: String::new(),
                    participant_name: "Bob (England)".into(),
                    value: "6 ⚽️".into(),
                }],
            }),
            quickest_red_card: Some(RankedPrize { prize_name: "Quickest Red Card".into(), rankings: vec![] }),
            ..Default::default()
        };

        let mut final_match = Match {
            id: "F".into(),
            stage: MatchStage::Knockout,
            completed: true,
            ..Default::default()
        };
        final_match.home.team = Some(team("ESP", "Spain"));
        final_match.home.goals = 2;
        final_match.away.team = Some(team("ENG", "England"));
        final_match.away.goals = 1;

        SweepstakeBoard {
            id: "office".into(),
            title: "Office".into(),
            image_url: String::new(),
            last_updated: None,
            prizes,
            entries: vec![
                BoardEntry { team: team("ENG", "England"), participant_name: "Bob".into(), summary: "Bob (England)".into() },
                BoardEntry { team: team("ESP", "Spain"), participant_name: String::new(), summary: "Spain".into() },
            ],
            matches: vec![final_match, Match { id: "SF1".into(), ..Default::default() }],
            build: true,
        }
    }

    #[test]
    fn prizes_list_outright_then_ranked() {
        let board = board();
        let lines: Vec<String> = PrizesView { board: &board, scroll_offset: 0 }.lines().iter().map(text).collect();
        assert!(lines[0].starts_with("Tournament Winner"));
        assert!(lines[0].ends_with("Ann (Spain)"));
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Most Goals Conceded");
        assert!(lines[3].starts_with("  1. Bob (England)"));
        assert!(lines[3].ends_with("6 ⚽️"));
        assert_eq!(lines[5], "Quickest Red Card");
        assert_eq!(lines[6], "  TBC");
    }

    #[test]
    fn no_prizes_message() {
        let mut board = board();
        board.prizes = BoardPrizes::default();
        let lines = PrizesView { board: &board, scroll_offset: 0 }.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(text(&lines[0]), "No prizes enabled for this sweepstake");
    }

    #[test]
    fn unclaimed_team_shows_dash() {
        let board = board();
        let lines: Vec<String> = ParticipantsView { board: &board, scroll_offset: 0 }.lines().iter().map(text).collect();
        assert_eq!(lines[0], format!("{}Bob", pad("England", NAME_WIDTH)));
        assert_eq!(lines[1], format!("{}-", pad("Spain", NAME_WIDTH)));
    }

    #[test]
    fn matches_show_score_or_vs() {
        let board = board();
        let lines: Vec<String> = MatchesView { board: &board, scroll_offset: 0 }.lines().iter().map(text).collect();
        assert!(lines[0].contains("Knockout"));
        assert!(lines[0].contains("Spain  2 - 1  England"), "{}", lines[0]);
        assert!(lines[1].contains("--/-- --:--"));
        assert!(lines[1].contains("TBC   vs    TBC"), "{}", lines[1]);
    }

    #[test]
    fn long_names_are_clipped() {
        assert_eq!(pad("abc", 5), "abc  ");
        assert_eq!(pad("abcdef", 5), "abcd…");
    }

    #[test]
    fn renders_into_buffer_with_scroll() {
        let board = board();
        let area = Rect::new(0, 0, 60, 3);
        let mut buf = Buffer::empty(area);
        PrizesView { board: &board, scroll_offset: 2 }.render(area, &mut buf);

        let first_row: String = (0..area.width).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(first_row.starts_with("Most Goals Conceded"));
    }
}
