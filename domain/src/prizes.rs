//! Prize results derived from a validated sweepstake.
//!
//! Every prize is a plain function of `Option<&Sweepstake>`: missing input
//! gives the default result (`TBC` or an empty ranking), never an error.

use crate::audit::TeamAudit;
use crate::{FINAL_MATCH_ID, Match, MatchCompetitor, MatchEvent, Sweepstake, Team, team_summary};
use chrono::NaiveDateTime;
use serde::Serialize;

pub const TBC: &str = "TBC";

pub const WINNER: &str = "Tournament Winner";
pub const RUNNER_UP: &str = "Tournament Runner-Up";
pub const MOST_GOALS_CONCEDED: &str = "Most Goals Conceded";
pub const MOST_YELLOW_CARDS: &str = "Most Yellow Cards";
pub const QUICKEST_OWN_GOAL: &str = "Quickest Own Goal";
pub const QUICKEST_RED_CARD: &str = "Quickest Red Card";

const GOAL: &str = "⚽️";
const YELLOW_CARD: &str = "🟨️";
const OWN_GOAL: &str = "🙈";
const RED_CARD: &str = "🟥";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutrightPrize {
    pub prize_name: String,
    pub participant_name: String,
    pub image_url: String,
}

impl OutrightPrize {
    fn tbc(prize_name: &str) -> Self {
        Self {
            prize_name: prize_name.to_string(),
            participant_name: TBC.to_string(),
            image_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedPrize {
    pub prize_name: String,
    pub rankings: Vec<Rank>,
}

impl RankedPrize {
    fn empty(prize_name: &str) -> Self {
        Self { prize_name: prize_name.to_string(), rankings: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rank {
    pub position: Option<u32>, // None for event prizes
    pub image_url: String,
    pub participant_name: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Outright
// ---------------------------------------------------------------------------

pub fn tournament_winner(sweepstake: Option<&Sweepstake>) -> OutrightPrize {
    outright(WINNER, sweepstake, Match::completed_winner)
}

pub fn tournament_runner_up(sweepstake: Option<&Sweepstake>) -> OutrightPrize {
    outright(RUNNER_UP, sweepstake, Match::completed_runner_up)
}

fn outright(prize_name: &str, sweepstake: Option<&Sweepstake>, pick: fn(&Match) -> Option<&Team>) -> OutrightPrize {
    let Some(s) = sweepstake else {
        return OutrightPrize::tbc(prize_name);
    };
    let Some(team) = s.tournament.find_match(FINAL_MATCH_ID).and_then(pick) else {
        return OutrightPrize::tbc(prize_name);
    };

    OutrightPrize {
        prize_name: prize_name.to_string(),
        participant_name: team_summary(team, s.participant_for(&team.id)),
        image_url: team.image_url.clone(),
    }
}

// ---------------------------------------------------------------------------
// Ranked by total
// ---------------------------------------------------------------------------

pub fn most_goals_conceded(sweepstake: Option<&Sweepstake>) -> RankedPrize {
    ranked_by_total(MOST_GOALS_CONCEDED, GOAL, sweepstake, |_, opponent| opponent.goals)
}

pub fn most_yellow_cards(sweepstake: Option<&Sweepstake>) -> RankedPrize {
    ranked_by_total(MOST_YELLOW_CARDS, YELLOW_CARD, sweepstake, |side, _| side.yellow_cards)
}

/// Credit `tally(side, opponent)` to each side of every completed match,
/// then rank the non-zero totals, highest first.
fn ranked_by_total(
    prize_name: &str,
    symbol: &str,
    sweepstake: Option<&Sweepstake>,
    tally: fn(&MatchCompetitor, &MatchCompetitor) -> u8,
) -> RankedPrize {
    let Some(s) = sweepstake else {
        return RankedPrize::empty(prize_name);
    };

    let mut audit = TeamAudit::new(&s.tournament.teams);
    for m in s.tournament.matches.iter().filter(|m| m.completed) {
        for (side, opponent) in [(&m.home, &m.away), (&m.away, &m.home)] {
            if let Some(id) = side.team_id() {
                audit.add(id, u32::from(tally(side, opponent)));
            }
        }
    }

    let mut totals: Vec<(&str, u32)> = audit.entries().filter(|&(_, n)| n > 0).collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    let rankings = totals
        .into_iter()
        .zip(1..)
        .filter_map(|((id, total), position)| {
            let team = s.tournament.find_team(id)?;
            Some(Rank {
                position: Some(position),
                image_url: team.image_url.clone(),
                participant_name: team_summary(team, s.participant_for(id)),
                value: format!("{symbol} {total}"),
            })
        })
        .collect();

    RankedPrize { prize_name: prize_name.to_string(), rankings }
}

// ---------------------------------------------------------------------------
// Ranked by earliest event
// ---------------------------------------------------------------------------

pub fn quickest_own_goal(sweepstake: Option<&Sweepstake>) -> RankedPrize {
    ranked_by_event(QUICKEST_OWN_GOAL, OWN_GOAL, sweepstake, |side| &side.own_goals)
}

pub fn quickest_red_card(sweepstake: Option<&Sweepstake>) -> RankedPrize {
    ranked_by_event(QUICKEST_RED_CARD, RED_CARD, sweepstake, |side| &side.red_cards)
}

struct TimedEvent<'a> {
    event: &'a MatchEvent,
    team: Option<&'a Team>,
    opponent: Option<&'a Team>,
    timestamp: Option<NaiveDateTime>,
}

fn ranked_by_event(
    prize_name: &str,
    symbol: &str,
    sweepstake: Option<&Sweepstake>,
    events: fn(&MatchCompetitor) -> &Vec<MatchEvent>,
) -> RankedPrize {
    let Some(s) = sweepstake else {
        return RankedPrize::empty(prize_name);
    };

    let mut timed: Vec<TimedEvent<'_>> = Vec::new();
    for m in s.tournament.matches.iter().filter(|m| m.completed) {
        for (side, opponent) in [(&m.home, &m.away), (&m.away, &m.home)] {
            timed.extend(events(side).iter().map(|event| TimedEvent {
                event,
                team: side.team.as_ref(),
                opponent: opponent.team.as_ref(),
                timestamp: m.timestamp,
            }));
        }
    }
    timed.sort_by_key(|t| (t.event.minute, t.event.offset));

    let rankings = timed
        .into_iter()
        .map(|t| {
            let opponent = t.opponent.map(|o| o.name.as_str()).unwrap_or("?");
            let date = t.timestamp.map(|ts| ts.format("%d/%m").to_string()).unwrap_or_else(|| "--/--".to_string());
            Rank {
                position: None,
                image_url: t.team.map(|team| team.image_url.clone()).unwrap_or_default(),
                participant_name: t
                    .team
                    .map(|team| team_summary(team, s.participant_for(&team.id)))
                    .unwrap_or_else(|| "?".to_string()),
                value: format!("{symbol} {} {} (vs {opponent} {date})", t.event.clock(), t.event.name),
            }
        })
        .collect();

    RankedPrize { prize_name: prize_name.to_string(), rankings }
}
