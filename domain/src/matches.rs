use crate::errors::{IS_DUPLICATE, IS_EMPTY, LoadError, LoadResult, MultiError, Scope, read_file};
use crate::tournament::MatchesSource;
use crate::{Match, MatchCompetitor, MatchEvent, MatchStage, Team};
use chrono::NaiveDateTime;
use log::debug;
use std::collections::HashSet;
use std::path::PathBuf;

pub const MATCHES_CSV_HEADER: [&str; 16] = [
    "MATCH_ID",
    "DATE",
    "TIME",
    "STAGE",
    "COMPLETED",
    "WINNER_TEAM_ID",
    "HOME_TEAM_ID",
    "AWAY_TEAM_ID",
    "HOME_GOALS",
    "AWAY_GOALS",
    "HOME_YELLOW_CARDS",
    "AWAY_YELLOW_CARDS",
    "HOME_OG",
    "AWAY_OG",
    "HOME_RED_CARDS",
    "AWAY_RED_CARDS",
];

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Matches read from a CSV file on disk.
#[derive(Debug, Clone)]
pub struct MatchesCsvFile {
    pub path: PathBuf,
}

impl MatchesCsvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MatchesSource for MatchesCsvFile {
    fn load_matches(&self) -> LoadResult<Vec<Match>> {
        debug!("loading matches from {}", self.path.display());
        let raw = read_file(&self.path)?;
        let matches = parse_matches_csv(&raw)?;
        Ok(validate_matches(matches)?)
    }
}

// ---------------------------------------------------------------------------
// CSV → raw matches
// ---------------------------------------------------------------------------

/// Tokenise and parse a whole matches file. Every row must carry 16 fields.
pub fn parse_matches_csv(raw: &[u8]) -> LoadResult<Vec<Match>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(false).from_reader(raw);
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_owned).collect::<Vec<_>>());
    }
    parse_match_records(&records)
}

/// Header row first, then one match per row. Row errors are collected, not
/// returned one at a time.
pub fn parse_match_records(records: &[Vec<String>]) -> LoadResult<Vec<Match>> {
    if records.len() < 2 {
        return Err(LoadError::Structure(format!(
            "rows {}: file must have header row and at least one more row",
            records.len()
        )));
    }

    let header = &records[0];
    if header.iter().map(String::as_str).ne(MATCHES_CSV_HEADER) {
        return Err(LoadError::Structure(format!("invalid headers: {}", header.join(","))));
    }

    let mut errs = MultiError::new();
    let mut matches = Vec::with_capacity(records.len() - 1);
    for (idx, row) in records[1..].iter().enumerate() {
        let mut scope = errs.with_prefix(format!("row {}", idx + 1));
        if row.len() != MATCHES_CSV_HEADER.len() {
            scope.add(format!("must have {} fields, found {}", MATCHES_CSV_HEADER.len(), row.len()));
            continue;
        }
        matches.push(parse_match_row(row, &mut scope));
    }

    Ok(errs.into_result(matches)?)
}

/// Convert one 16-field row. Problems go to `errs`; the returned match then
/// carries zero values for the fields that failed.
pub fn parse_match_row(row: &[String], errs: &mut Scope<'_>) -> Match {
    let field = |i: usize| row.get(i).map(String::as_str).unwrap_or_default();

    let timestamp = parse_timestamp(field(1), field(2), errs);
    let stage = parse_stage(field(3), errs);
    let home = parse_competitor("home", [field(6), field(8), field(10), field(12), field(14)], errs);
    let away = parse_competitor("away", [field(7), field(9), field(11), field(13), field(15)], errs);

    Match {
        id: field(0).to_string(),
        timestamp,
        stage,
        home,
        away,
        winner: team_ref(field(5)),
        completed: field(4) == "Y",
    }
}

/// `[team id, goals, yellow cards, own goals, red cards]` for one side.
fn parse_competitor(side: &str, fields: [&str; 5], errs: &mut Scope<'_>) -> MatchCompetitor {
    let [team_id, goals, yellow_cards, own_goals, red_cards] = fields;

    let goals = parse_u8(goals, &mut errs.with_prefix(format!("{side} goals")));
    let yellow_cards = parse_u8(yellow_cards, &mut errs.with_prefix(format!("{side} yellow cards")));
    let own_goals = parse_match_events(own_goals, &mut errs.with_prefix(format!("{side} own goals")));
    let red_cards = parse_match_events(red_cards, &mut errs.with_prefix(format!("{side} red cards")));

    MatchCompetitor {
        team: team_ref(team_id),
        goals,
        yellow_cards,
        own_goals,
        red_cards,
    }
}

fn team_ref(id: &str) -> Option<Team> {
    if id.is_empty() { None } else { Some(Team::placeholder(id)) }
}

fn parse_timestamp(date: &str, time: &str, errs: &mut Scope<'_>) -> Option<NaiveDateTime> {
    let raw = format!("{date} {time}");
    let raw = raw.trim_matches(' ');
    if raw.is_empty() {
        return None;
    }
    match NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        Ok(ts) => Some(ts),
        Err(_) => {
            errs.add(format!("invalid timestamp format: {raw}"));
            None
        }
    }
}

fn parse_stage(raw: &str, errs: &mut Scope<'_>) -> MatchStage {
    match raw {
        "GROUP" => MatchStage::Group,
        "KO" => MatchStage::Knockout,
        _ => {
            errs.add(format!("invalid match stage: {raw}"));
            MatchStage::default()
        }
    }
}

fn parse_u8(raw: &str, errs: &mut Scope<'_>) -> u8 {
    if raw.is_empty() {
        return 0;
    }
    raw.parse().unwrap_or_else(|e| {
        errs.add(format!("invalid int: {e}"));
        0
    })
}

// ---------------------------------------------------------------------------
// Event grammar: "N;name:minute[+offset];..."
// ---------------------------------------------------------------------------

/// Parse an own-goal or red-card field. Any error empties the whole field.
pub fn parse_match_events(raw: &str, errs: &mut Scope<'_>) -> Vec<MatchEvent> {
    let raw = raw.trim_matches(' ');
    if raw.is_empty() {
        return Vec::new();
    }

    let mut parts = raw.split(';');
    let Some(Ok(count)) = parts.next().map(str::parse::<usize>) else {
        errs.add("first element must provide count of remaining elements");
        return Vec::new();
    };

    let entries: Vec<&str> = parts.collect();
    if entries.len() != count {
        let plural = if count == 1 { "" } else { "s" };
        errs.add(format!("must have {count} element{plural}"));
        return Vec::new();
    }

    let before = errs.len();
    let events: Vec<MatchEvent> = entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| parse_match_event(entry, &mut errs.with_prefix(format!("event {}", idx + 1))))
        .collect();

    if errs.len() > before { Vec::new() } else { events }
}

fn parse_match_event(raw: &str, errs: &mut Scope<'_>) -> Option<MatchEvent> {
    let mut split = raw.split(':');
    let (Some(name), Some(clock), None) = (split.next(), split.next(), split.next()) else {
        errs.add("invalid format");
        return None;
    };

    let (raw_minute, raw_offset) = match clock.split_once('+') {
        Some((minute, offset)) => (minute, Some(offset)),
        None => (clock, None),
    };

    let minute = parse_event_number(raw_minute, "minute", errs)?;
    let offset = match raw_offset {
        Some(raw) if !raw.is_empty() => parse_event_number(raw, "offset", errs)?,
        _ => 0,
    };

    Some(MatchEvent {
        name: name.trim_matches(' ').to_string(),
        minute,
        offset,
    })
}

fn parse_event_number(raw: &str, label: &str, errs: &mut Scope<'_>) -> Option<u8> {
    let value = match raw.parse::<i64>() {
        Ok(v) => v,
        Err(e) => {
            errs.add(format!("{label}: invalid int: {e}"));
            return None;
        }
    };
    if value < 1 {
        errs.add(format!("{label}: must be greater than 0"));
        return None;
    }
    match u8::try_from(value) {
        Ok(v) => Some(v),
        Err(e) => {
            errs.add(format!("{label}: invalid int: {e}"));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Entity rules
// ---------------------------------------------------------------------------

/// Trim ids and check each match, then check id uniqueness.
pub fn validate_matches(mut matches: Vec<Match>) -> Result<Vec<Match>, MultiError> {
    let mut errs = MultiError::new();
    let mut seen = HashSet::new();

    for (idx, m) in matches.iter_mut().enumerate() {
        let mut scope = errs.with_prefix(format!("index {idx}"));
        validate_match(m, &mut scope);

        if !seen.insert(m.id.clone()) {
            scope.add(format!("id '{}': {IS_DUPLICATE}", m.id));
        }
    }

    errs.into_result(matches)
}

pub fn validate_match(m: &mut Match, errs: &mut Scope<'_>) {
    m.id = m.id.trim_matches(' ').to_string();
    for team in [&mut m.home.team, &mut m.away.team, &mut m.winner].into_iter().flatten() {
        team.id = team.id.trim_matches(' ').to_string();
    }

    if m.id.is_empty() {
        errs.add(format!("id: {IS_EMPTY}"));
    }

    if m.timestamp.is_none() {
        errs.add(format!("timestamp: {IS_EMPTY}"));
    }

    if let (Some(home), Some(away)) = (m.home.team_id(), m.away.team_id())
        && home == away
    {
        errs.add(format!("home team id and away team id are identical: {home}"));
    }

    if let Some(winner) = &m.winner
        && m.home.team_id() != Some(winner.id.as_str())
        && m.away.team_id() != Some(winner.id.as_str())
    {
        errs.add(format!("winning team id {} must match either home or away team id", winner.id));
    }
}
