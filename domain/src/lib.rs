pub mod audit;
pub mod board;
pub mod client;
pub mod errors;
pub mod matches;
pub mod prizes;
pub mod sweepstake;
pub mod tournament;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use errors::{LoadError, LoadResult, MultiError, Scope};

/// Id of the match treated as the tournament final.
pub const FINAL_MATCH_ID: &str = "F";

// ---------------------------------------------------------------------------
// Domain types: validated model, independent of the input file formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "imageURL")]
    pub image_url: String,
}

impl Team {
    /// Id-only reference, resolved against a tournament's team list later.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }
}

/// First team with a matching id. Later duplicates are never returned.
pub fn find_team<'a>(teams: &'a [Team], id: &str) -> Option<&'a Team> {
    teams.iter().find(|t| t.id == id)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStage {
    #[default]
    Group,
    Knockout,
}

impl MatchStage {
    pub fn label(&self) -> &'static str {
        match self {
            MatchStage::Group => "Group",
            MatchStage::Knockout => "Knockout",
        }
    }
}

/// Own goal or red card. `offset` > 0 means stoppage time, e.g. 45+2.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub name: String,
    pub minute: u8,
    pub offset: u8,
}

impl MatchEvent {
    pub fn clock(&self) -> String {
        if self.offset > 0 {
            format!("{}'+{}", self.minute, self.offset)
        } else {
            format!("{}'", self.minute)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCompetitor {
    pub team: Option<Team>, // None = not yet known (e.g. knockout slot)
    pub goals: u8,
    pub yellow_cards: u8,
    pub own_goals: Vec<MatchEvent>,
    pub red_cards: Vec<MatchEvent>,
}

impl MatchCompetitor {
    pub fn team_id(&self) -> Option<&str> {
        self.team.as_ref().map(|t| t.id.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub timestamp: Option<NaiveDateTime>,
    pub stage: MatchStage,
    pub home: MatchCompetitor,
    pub away: MatchCompetitor,
    pub winner: Option<Team>,
    pub completed: bool,
}

impl Match {
    /// Winner, but only once the match is marked completed.
    pub fn completed_winner(&self) -> Option<&Team> {
        if !self.completed {
            return None;
        }
        self.winner.as_ref()
    }

    /// Whichever side did not win a completed match.
    pub fn completed_runner_up(&self) -> Option<&Team> {
        let winner = self.completed_winner()?;
        [&self.home, &self.away]
            .into_iter()
            .filter_map(|c| c.team.as_ref())
            .find(|t| t.id != winner.id)
    }
}

/// First match with a matching id.
pub fn find_match<'a>(matches: &'a [Match], id: &str) -> Option<&'a Match> {
    matches.iter().find(|m| m.id == id)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub with_last_updated: bool,
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
}

impl Tournament {
    pub fn find_match(&self, id: &str) -> Option<&Match> {
        find_match(&self.matches, id)
    }

    pub fn find_team(&self, id: &str) -> Option<&Team> {
        find_team(&self.teams, id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub team_id: String,
    #[serde(rename = "participant_name", default)]
    pub name: String,
}

/// First participant holding the given team.
pub fn find_participant<'a>(participants: &'a [Participant], team_id: &str) -> Option<&'a Participant> {
    participants.iter().find(|p| p.team_id == team_id)
}

/// `"<participant> (<team>)"`, or just the team name when nobody (named) holds it.
pub fn team_summary(team: &Team, participant: Option<&Participant>) -> String {
    match participant {
        Some(p) if !p.name.is_empty() => format!("{} ({})", p.name, team.name),
        _ => team.name.clone(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrizeSettings {
    pub winner: bool,
    pub runner_up: bool,
    pub most_goals_conceded: bool,
    pub most_yellow_cards: bool,
    pub quickest_own_goal: bool,
    pub quickest_red_card: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sweepstake {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub tournament: Arc<Tournament>,
    pub participants: Vec<Participant>,
    pub prizes: PrizeSettings,
    pub build: bool,
}

impl Sweepstake {
    pub fn participant_for(&self, team_id: &str) -> Option<&Participant> {
        find_participant(&self.participants, team_id)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::NaiveDate;

    pub fn team(id: &str) -> Team {
        Team {
            id: id.to_string(),
            name: format!("Team {id}"),
            image_url: format!("http://{id}.jpg"),
        }
    }

    pub fn kickoff(day: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2024, 6, day).and_then(|d| d.and_hms_opt(20, 0, 0))
    }

    pub fn completed(id: &str, home: &Team, away: &Team) -> Match {
        Match {
            id: id.to_string(),
            timestamp: kickoff(14),
            stage: MatchStage::Group,
            home: MatchCompetitor { team: Some(home.clone()), ..Default::default() },
            away: MatchCompetitor { team: Some(away.clone()), ..Default::default() },
            winner: None,
            completed: true,
        }
    }

    pub fn participant(team_id: &str, name: &str) -> Participant {
        Participant { team_id: team_id.into(), name: name.into() }
    }

    pub fn event(name: &str, minute: u8, offset: u8) -> MatchEvent {
        MatchEvent { name: name.to_string(), minute, offset }
    }

    pub fn sweepstake(teams: Vec<Team>, matches: Vec<Match>, participants: Vec<Participant>) -> Sweepstake {
        Sweepstake {
            id: "test".to_string(),
            name: "Test Sweepstake".to_string(),
            image_url: "http://sweepstake.jpg".to_string(),
            tournament: Arc::new(Tournament {
                id: "tourney".to_string(),
                name: "Tourney".to_string(),
                image_url: "http://tourney.jpg".to_string(),
                with_last_updated: false,
                teams,
                matches,
            }),
            participants,
            prizes: PrizeSettings::default(),
            build: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn lookups_return_first_seen_entry() {
        let mut dup = team("A");
        dup.name = "Second A".into();
        let teams = vec![team("A"), dup];
        assert_eq!(find_team(&teams, "A").map(|t| t.name.as_str()), Some("Team A"));
        assert!(find_team(&teams, "Z").is_none());
    }

    #[test]
    fn runner_up_is_the_side_that_did_not_win() {
        let (a, b) = (team("A"), team("B"));
        let mut m = completed("F", &a, &b);
        m.winner = Some(b.clone());
        assert_eq!(m.completed_winner(), Some(&b));
        assert_eq!(m.completed_runner_up(), Some(&a));

        m.completed = false;
        assert!(m.completed_winner().is_none());
        assert!(m.completed_runner_up().is_none());
    }

    #[test]
    fn summary_falls_back_to_team_name() {
        let a = team("A");
        let named = Participant { team_id: "A".into(), name: "Marc Pugh".into() };
        let unnamed = Participant { team_id: "A".into(), name: String::new() };
        assert_eq!(team_summary(&a, Some(&named)), "Marc Pugh (Team A)");
        assert_eq!(team_summary(&a, Some(&unnamed)), "Team A");
        assert_eq!(team_summary(&a, None), "Team A");
    }

    #[test]
    fn team_json_accepts_legacy_image_key() {
        let t: Team = serde_json::from_str(r#"{"id":"A","name":"A","imageURL":"http://a"}"#).unwrap();
        assert_eq!(t.image_url, "http://a");
    }

    #[test]
    fn event_clock_shows_stoppage_time() {
        assert_eq!(event("x", 7, 0).clock(), "7'");
        assert_eq!(event("x", 45, 2).clock(), "45'+2");
    }
}
