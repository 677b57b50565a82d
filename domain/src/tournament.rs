use crate::audit::{AuditMode, TeamAudit};
use crate::errors::{IS_DUPLICATE, IS_EMPTY, LoadError, LoadResult, MultiError, NOT_FOUND, Scope, read_file};
use crate::matches::MatchesCsvFile;
use crate::{Match, Team, Tournament, find_team};
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const TOURNAMENTS_DIR: &str = "tournaments";
pub const TOURNAMENT_CONFIG_FILE: &str = "tournament.json";
pub const TEAMS_FILE: &str = "teams.json";
pub const MATCHES_FILE: &str = "matches.csv";

// ---------------------------------------------------------------------------
// Pluggable sources
// ---------------------------------------------------------------------------

pub trait TeamsSource: Send + Sync {
    fn load_teams(&self) -> LoadResult<Vec<Team>>;
}

pub trait MatchesSource: Send + Sync {
    fn load_matches(&self) -> LoadResult<Vec<Match>>;
}

/// `{"teams": [...]}` on disk.
#[derive(Debug, Clone)]
pub struct TeamsFile {
    pub path: PathBuf,
}

impl TeamsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Deserialize)]
struct TeamsDocument {
    #[serde(default)]
    teams: Vec<Team>,
}

impl TeamsSource for TeamsFile {
    fn load_teams(&self) -> LoadResult<Vec<Team>> {
        debug!("loading teams from {}", self.path.display());
        let raw = read_file(&self.path)?;
        let doc: TeamsDocument = serde_json::from_slice(&raw)
            .map_err(|source| LoadError::Json { context: "team collection", source })?;
        Ok(validate_teams(doc.teams)?)
    }
}

pub fn validate_teams(mut teams: Vec<Team>) -> Result<Vec<Team>, MultiError> {
    let mut errs = MultiError::new();
    let mut seen = HashSet::new();

    for (idx, team) in teams.iter_mut().enumerate() {
        let mut scope = errs.with_prefix(format!("index {idx}"));
        team.id = team.id.trim_matches(' ').to_string();
        team.name = team.name.trim_matches(' ').to_string();
        team.image_url = team.image_url.trim_matches(' ').to_string();

        if team.id.is_empty() {
            scope.add(format!("id: {IS_EMPTY}"));
        }
        if team.name.is_empty() {
            scope.add(format!("name: {IS_EMPTY}"));
        }
        if team.image_url.is_empty() {
            scope.add(format!("image url: {IS_EMPTY}"));
        }
        if !seen.insert(team.id.clone()) {
            scope.add(format!("id '{}': {IS_DUPLICATE}", team.id));
        }
    }

    errs.into_result(teams)
}

// ---------------------------------------------------------------------------
// Tournament loading
// ---------------------------------------------------------------------------

/// Contents of `tournament.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub with_last_updated: bool,
}

pub struct TournamentLoader {
    pub config: PathBuf,
    pub teams: Box<dyn TeamsSource>,
    pub matches: Box<dyn MatchesSource>,
}

impl TournamentLoader {
    /// `tournament.json`, `teams.json` and `matches.csv` inside `dir`.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            config: dir.join(TOURNAMENT_CONFIG_FILE),
            teams: Box::new(TeamsFile::new(dir.join(TEAMS_FILE))),
            matches: Box::new(MatchesCsvFile::new(dir.join(MATCHES_FILE))),
        }
    }

    pub fn load(&self) -> LoadResult<Tournament> {
        let raw = read_file(&self.config)?;
        let config: TournamentConfig = serde_json::from_slice(&raw)
            .map_err(|source| LoadError::Json { context: "tournament", source })?;

        let teams = self.teams.load_teams().map_err(|e| e.context("cannot load teams"))?;
        let matches = self.matches.load_matches().map_err(|e| e.context("cannot load matches"))?;

        let mut tournament = Tournament {
            id: config.id,
            name: config.name,
            image_url: config.image_url,
            with_last_updated: config.with_last_updated,
            teams,
            matches,
        };

        let mut errs = MultiError::new();
        validate_tournament(&mut tournament, &mut errs.scope());
        Ok(errs.into_result(tournament)?)
    }
}

/// Replace an id-only reference with the full team record.
pub fn enrich_team(slot: &mut Option<Team>, teams: &[Team]) -> Result<(), String> {
    let Some(current) = slot.as_mut() else {
        return Ok(());
    };
    if current.id.is_empty() {
        return Ok(());
    }
    match find_team(teams, &current.id) {
        Some(full) => {
            *current = full.clone();
            Ok(())
        }
        None => Err(format!("team id '{}': {NOT_FOUND}", current.id)),
    }
}

/// Trim and check the tournament, resolve every match slot against the team
/// list, and check that each team plays at least once.
pub fn validate_tournament(tournament: &mut Tournament, errs: &mut Scope<'_>) {
    tournament.id = tournament.id.trim_matches(' ').to_string();
    tournament.name = tournament.name.trim_matches(' ').to_string();
    tournament.image_url = tournament.image_url.trim_matches(' ').to_string();

    if tournament.id.is_empty() {
        errs.add(format!("id: {IS_EMPTY}"));
    }
    if tournament.name.is_empty() {
        errs.add(format!("name: {IS_EMPTY}"));
    }
    if tournament.image_url.is_empty() {
        errs.add(format!("image url: {IS_EMPTY}"));
    }

    let mut audit = TeamAudit::new(&tournament.teams);
    let mut seen = HashSet::new();

    for (idx, m) in tournament.matches.iter_mut().enumerate() {
        if !seen.insert(m.id.clone()) {
            errs.add(format!("match id '{}': {IS_DUPLICATE}", m.id));
        }

        let mut scope = errs.with_prefix(format!("match {}", idx + 1));

        for (slot, team) in [("home", &mut m.home.team), ("away", &mut m.away.team), ("winner", &mut m.winner)] {
            if let Err(e) = enrich_team(team, &tournament.teams) {
                scope.add(format!("{slot}: {e}"));
            }
        }

        for id in [m.home.team_id(), m.away.team_id()].into_iter().flatten() {
            audit.ack(id);
        }
    }

    audit.validate(AuditMode::AtLeastOnce, errs);
}

/// Load every `tournaments/<dir>` under `data_dir`, in directory name order.
pub fn load_tournaments(data_dir: &Path) -> LoadResult<Vec<Arc<Tournament>>> {
    let root = data_dir.join(TOURNAMENTS_DIR);
    let entries = std::fs::read_dir(&root).map_err(|source| LoadError::Io { path: root.clone(), source })?;

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut tournaments = Vec::with_capacity(dirs.len());
    for dir in &dirs {
        let name = dir.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let tournament = TournamentLoader::from_dir(dir)
            .load()
            .map_err(|e| e.context(format!("tournament '{name}'")))?;
        debug!("loaded tournament {} ({} teams, {} matches)", tournament.id, tournament.teams.len(), tournament.matches.len());
        tournaments.push(tournament);
    }

    let tournaments = validate_tournaments(tournaments)?;
    info!("loaded {} tournament(s) from {}", tournaments.len(), root.display());
    Ok(tournaments.into_iter().map(Arc::new).collect())
}

pub fn validate_tournaments(tournaments: Vec<Tournament>) -> Result<Vec<Tournament>, MultiError> {
    let mut errs = MultiError::new();
    let mut seen = HashSet::new();
    for tournament in &tournaments {
        if !seen.insert(tournament.id.as_str()) {
            errs.add(format!("id '{}': {IS_DUPLICATE}", tournament.id));
        }
    }
    errs.into_result(tournaments)
}
