use crate::prizes::{self, OutrightPrize, RankedPrize};
use crate::{Match, Sweepstake, Team, team_summary};
use chrono::{DateTime, TimeZone};
use serde::Serialize;

const LAST_UPDATED_FORMAT: &str = "%a %-d %b %Y at %H:%M";

/// Everything a renderer needs to show one sweepstake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepstakeBoard {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub last_updated: Option<String>,
    pub prizes: BoardPrizes,
    pub entries: Vec<BoardEntry>,
    pub matches: Vec<Match>,
    pub build: bool,
}

/// Enabled prizes only; disabled ones stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardPrizes {
    pub winner: Option<OutrightPrize>,
    pub runner_up: Option<OutrightPrize>,
    pub most_goals_conceded: Option<RankedPrize>,
    pub most_yellow_cards: Option<RankedPrize>,
    pub quickest_own_goal: Option<RankedPrize>,
    pub quickest_red_card: Option<RankedPrize>,
}

impl BoardPrizes {
    pub fn outright(&self) -> impl Iterator<Item = &OutrightPrize> {
        [&self.winner, &self.runner_up].into_iter().flatten()
    }

    pub fn ranked(&self) -> impl Iterator<Item = &RankedPrize> {
        [
            &self.most_goals_conceded,
            &self.most_yellow_cards,
            &self.quickest_own_goal,
            &self.quickest_red_card,
        ]
        .into_iter()
        .flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.outright().next().is_none() && self.ranked().next().is_none()
    }
}

/// One drawn team and whoever drew it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardEntry {
    pub team: Team,
    pub participant_name: String,
    pub summary: String,
}

impl SweepstakeBoard {
    /// Title and image fall back to the tournament's when blank. Validated
    /// sweepstakes always carry both; the fallback covers callers that
    /// build boards from unvalidated data.
    pub fn build<Tz: TimeZone>(sweepstake: &Sweepstake, now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let tournament = &sweepstake.tournament;
        let settings = sweepstake.prizes;
        let s = Some(sweepstake);

        let prizes = BoardPrizes {
            winner: settings.winner.then(|| prizes::tournament_winner(s)),
            runner_up: settings.runner_up.then(|| prizes::tournament_runner_up(s)),
            most_goals_conceded: settings.most_goals_conceded.then(|| prizes::most_goals_conceded(s)),
            most_yellow_cards: settings.most_yellow_cards.then(|| prizes::most_yellow_cards(s)),
            quickest_own_goal: settings.quickest_own_goal.then(|| prizes::quickest_own_goal(s)),
            quickest_red_card: settings.quickest_red_card.then(|| prizes::quickest_red_card(s)),
        };

        let mut teams: Vec<&Team> = tournament.teams.iter().collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        let entries = teams
            .into_iter()
            .map(|team| {
                let participant = sweepstake.participant_for(&team.id);
                BoardEntry {
                    team: team.clone(),
                    participant_name: participant.map(|p| p.name.clone()).unwrap_or_default(),
                    summary: team_summary(team, participant),
                }
            })
            .collect();

        Self {
            id: sweepstake.id.clone(),
            title: non_empty_or(&sweepstake.name, &tournament.name),
            image_url: non_empty_or(&sweepstake.image_url, &tournament.image_url),
            last_updated: tournament
                .with_last_updated
                .then(|| now.format(LAST_UPDATED_FORMAT).to_string()),
            prizes,
            entries,
            matches: tournament.matches.clone(),
            build: sweepstake.build,
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let chosen = if value.is_empty() { fallback } else { value };
    chosen.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::{PrizeSettings, Tournament};
    use chrono::{NaiveDate, Utc};
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 7, 15)
            .and_then(|d| d.and_hms_opt(9, 5, 0))
            .unwrap()
            .and_utc()
    }

    fn board_sweepstake() -> Sweepstake {
        let mut zed = team("Z");
        zed.name = "Albania".into();
        let (a, b) = (team("A"), team("B"));
        let mut f = completed("F", &a, &zed);
        f.winner = Some(zed.clone());
        f.home.goals = 3;
        sweepstake(
            vec![b, a, zed],
            vec![f],
            vec![participant("A", "Ann"), participant("Z", "Zoe"), participant("B", "")],
        )
    }

    #[test]
    fn only_enabled_prizes_are_computed() {
        let mut s = board_sweepstake();
        s.prizes = PrizeSettings { winner: true, most_goals_conceded: true, ..Default::default() };

        let board = SweepstakeBoard::build(&s, &now());
        let winner = board.prizes.winner.as_ref().unwrap();
        assert_eq!(winner.participant_name, "Zoe (Albania)");
        assert!(board.prizes.runner_up.is_none());
        assert_eq!(board.prizes.outright().count(), 1);
        let ranked: Vec<_> = board.prizes.ranked().map(|p| p.prize_name.as_str()).collect();
        assert_eq!(ranked, vec![prizes::MOST_GOALS_CONCEDED]);
        assert!(!board.prizes.is_empty());
    }

    #[test]
    fn entries_are_sorted_by_team_name() {
        let board = SweepstakeBoard::build(&board_sweepstake(), &now());
        let names: Vec<_> = board.entries.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(names, vec!["Zoe (Albania)", "Ann (Team A)", "Team B"]);
        assert!(board.prizes.is_empty());
        assert_eq!(board.matches.len(), 1);
    }

    #[test]
    fn title_and_image_fall_back_to_tournament() {
        let mut s = board_sweepstake();
        s.name.clear();
        s.image_url.clear();
        let board = SweepstakeBoard::build(&s, &now());
        assert_eq!(board.title, "Tourney");
        assert_eq!(board.image_url, "http://tourney.jpg");
        assert_eq!(board.last_updated, None);
    }

    #[test]
    fn last_updated_only_when_tournament_asks() {
        let mut s = board_sweepstake();
        let mut t = Tournament::clone(&s.tournament);
        t.with_last_updated = true;
        s.tournament = Arc::new(t);

        let board = SweepstakeBoard::build(&s, &now());
        assert_eq!(board.last_updated.as_deref(), Some("Mon 15 Jul 2024 at 09:05"));
    }

    #[test]
    fn serialises_for_export() {
        let board = SweepstakeBoard::build(&board_sweepstake(), &now());
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["title"], "Test Sweepstake");
        assert_eq!(json["entries"][0]["team"]["id"], "Z");
        assert!(json["prizes"]["winner"].is_null());
    }
}
