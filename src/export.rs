use anyhow::Context;
use chrono::Local;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use sweepstake_domain::board::SweepstakeBoard;
use sweepstake_domain::client::SweepstakeClient;

pub const INDEX_FILE: &str = "index.json";

/// Outcome of one export run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub generated: Vec<PathBuf>,
    pub skipped: usize,
}

impl std::fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "success! {} generated ({} skipped)", self.generated.len(), self.skipped)
    }
}

/// Load everything, then write one board per buildable sweepstake.
pub async fn run(client: &SweepstakeClient, public_dir: &Path) -> anyhow::Result<ExportSummary> {
    let sweepstakes = client.fetch_sweepstakes().await?;
    let now = Local::now();
    let boards: Vec<SweepstakeBoard> = sweepstakes.iter().map(|s| SweepstakeBoard::build(s, &now)).collect();
    write_boards(&boards, public_dir)
}

/// Writes `<public_dir>/<id>/index.json` for every board with `build` set.
pub fn write_boards(boards: &[SweepstakeBoard], public_dir: &Path) -> anyhow::Result<ExportSummary> {
    let mut summary = ExportSummary::default();

    for board in boards {
        if !board.build {
            debug!("skipping sweepstake {}", board.id);
            summary.skipped += 1;
            continue;
        }

        let dir = public_dir.join(&board.id);
        fs::create_dir_all(&dir).with_context(|| format!("cannot create directory '{}'", dir.display()))?;

        let path = dir.join(INDEX_FILE);
        let json = serde_json::to_vec_pretty(board)
            .with_context(|| format!("cannot marshal sweepstake '{}'", board.id))?;
        fs::write(&path, json).with_context(|| format!("cannot write file '{}'", path.display()))?;

        info!("generated {}", path.display());
        summary.generated.push(path);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweepstake_domain::board::BoardPrizes;
    use sweepstake_domain::client::Source;

    fn board(id: &str, build: bool) -> SweepstakeBoard {
        SweepstakeBoard {
            id: id.into(),
            title: format!("{id} title"),
            image_url: "http://img".into(),
            last_updated: None,
            prizes: BoardPrizes::default(),
            entries: vec![],
            matches: vec![],
            build,
        }
    }

    #[test]
    fn writes_only_buildable_boards() {
        let public = tempfile::tempdir().unwrap();
        let summary = write_boards(&[board("a", true), board("b", false), board("c", true)], public.path()).unwrap();

        assert_eq!(summary.generated.len(), 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.to_string(), "success! 2 generated (1 skipped)");
        assert!(!public.path().join("b").exists());

        let raw = fs::read_to_string(public.path().join("a").join(INDEX_FILE)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["title"], "a title");
    }

    #[test]
    fn unwritable_target_is_reported_with_path() {
        let public = tempfile::tempdir().unwrap();
        let blocker = public.path().join("a");
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_boards(&[board("a", true)], public.path()).unwrap_err();
        assert!(err.to_string().starts_with("cannot create directory"), "{err}");
    }

    #[tokio::test]
    async fn run_fails_when_data_is_missing() {
        let data = tempfile::tempdir().unwrap();
        let client = SweepstakeClient::new(data.path(), Source::File(data.path().join("sweepstakes.json")));
        let err = run(&client, &data.path().join("public")).await.unwrap_err();
        assert!(err.to_string().starts_with("cannot load tournaments"), "{err}");
    }
}
