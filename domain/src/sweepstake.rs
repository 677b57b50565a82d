use crate::audit::{AuditMode, TeamAudit};
use crate::errors::{IS_DUPLICATE, IS_EMPTY, LoadError, LoadResult, MultiError, Scope};
use crate::{Participant, PrizeSettings, Sweepstake, Tournament};
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Deserialize)]
struct SweepstakesManifest {
    #[serde(default)]
    sweepstakes: Vec<SweepstakeEntry>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct SweepstakeEntry {
    id: String,
    name: String,
    image_url: String,
    tournament_id: String,
    participants: Vec<Participant>,
    prizes: PrizeSettings,
    build: bool,
}

/// Decode a sweepstakes manifest and attach each entry to its tournament.
///
/// An unknown `tournament_id` fails straight away; everything else is
/// collected by [`validate_sweepstakes`].
pub fn load_sweepstakes(raw: &[u8], tournaments: &[Arc<Tournament>]) -> LoadResult<Vec<Sweepstake>> {
    let manifest: SweepstakesManifest = serde_json::from_slice(raw)
        .map_err(|source| LoadError::Json { context: "sweepstakes", source })?;

    if manifest.sweepstakes.is_empty() {
        return Err(LoadError::NoSweepstakes);
    }

    let mut sweepstakes = Vec::with_capacity(manifest.sweepstakes.len());
    for (idx, entry) in manifest.sweepstakes.into_iter().enumerate() {
        let Some(tournament) = tournaments.iter().find(|t| t.id == entry.tournament_id) else {
            return Err(LoadError::NotFound(format!(
                "sweepstake index {idx}: tournament id '{}'",
                entry.tournament_id
            )));
        };
        debug!("sweepstake {} uses tournament {}", entry.id, tournament.id);

        sweepstakes.push(Sweepstake {
            id: entry.id,
            name: entry.name,
            image_url: entry.image_url,
            tournament: Arc::clone(tournament),
            participants: entry.participants,
            prizes: entry.prizes,
            build: entry.build,
        });
    }

    let sweepstakes = validate_sweepstakes(sweepstakes)?;
    info!("loaded {} sweepstake(s)", sweepstakes.len());
    Ok(sweepstakes)
}

pub fn validate_sweepstakes(mut sweepstakes: Vec<Sweepstake>) -> Result<Vec<Sweepstake>, MultiError> {
    let mut errs = MultiError::new();
    let mut seen = HashSet::new();

    for (idx, sweepstake) in sweepstakes.iter_mut().enumerate() {
        validate_sweepstake(sweepstake, &mut errs.with_prefix(format!("sweepstake index {idx}")));

        if !seen.insert(sweepstake.id.clone()) {
            errs.add(format!("id '{}': {IS_DUPLICATE}", sweepstake.id));
        }
    }

    errs.into_result(sweepstakes)
}

/// Trim the sweepstake and its participants, then check that every team of
/// the tournament is drawn by exactly one participant.
pub fn validate_sweepstake(sweepstake: &mut Sweepstake, errs: &mut Scope<'_>) {
    sweepstake.id = sweepstake.id.trim_matches(' ').to_string();
    sweepstake.name = sweepstake.name.trim_matches(' ').to_string();
    sweepstake.image_url = sweepstake.image_url.trim_matches(' ').to_string();

    if sweepstake.id.is_empty() {
        errs.add(format!("id: {IS_EMPTY}"));
    }
    if sweepstake.name.is_empty() {
        errs.add(format!("name: {IS_EMPTY}"));
    }
    if sweepstake.image_url.is_empty() {
        errs.add(format!("image url: {IS_EMPTY}"));
    }

    let mut audit = TeamAudit::new(&sweepstake.tournament.teams);
    for (idx, participant) in sweepstake.participants.iter_mut().enumerate() {
        participant.team_id = participant.team_id.trim_matches(' ').to_string();
        participant.name = participant.name.trim_matches(' ').to_string();

        if !audit.ack(&participant.team_id) {
            errs.with_prefix(format!("participant index {idx}"))
                .add(format!("unrecognised participant team id: {}", participant.team_id));
        }
    }

    audit.validate(AuditMode::ExactlyOnce, errs);
}
