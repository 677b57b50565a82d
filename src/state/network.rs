use crate::state::messages::{NetworkRequest, NetworkResponse};
use chrono::Local;
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use sweepstake_domain::LoadResult;
use sweepstake_domain::board::SweepstakeBoard;
use sweepstake_domain::client::SweepstakeClient;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: SweepstakeClient,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        client: SweepstakeClient,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::LoadSweepstakes => {
                    debug!("loading sweepstakes from {}", self.client.source());
                    self.load_boards().await
                }
                NetworkRequest::Refresh => {
                    debug!("refreshing sweepstakes");
                    self.load_boards().await
                }
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = match result {
                Ok(boards) => NetworkResponse::SweepstakesLoaded { boards },
                Err(err) => NetworkResponse::Error { message: err.to_string() },
            };

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn load_boards(&self) -> LoadResult<Vec<SweepstakeBoard>> {
        let sweepstakes = self.client.fetch_sweepstakes().await?;
        let now = Local::now();
        Ok(sweepstakes.iter().map(|s| SweepstakeBoard::build(s, &now)).collect())
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use sweepstake_domain::client::Source;

    #[tokio::test]
    async fn failed_load_reports_error_and_error_spinner() {
        let data = tempfile::tempdir().unwrap();
        fs::create_dir_all(data.path().join("tournaments")).unwrap();
        let client = SweepstakeClient::new(data.path(), Source::File(data.path().join("missing.json")));

        let (req_tx, req_rx) = mpsc::channel(8);
        let (resp_tx, mut resp_rx) = mpsc::channel(64);
        let worker = tokio::spawn(NetworkWorker::new(client, req_rx, resp_tx).run());

        req_tx.send(NetworkRequest::LoadSweepstakes).await.unwrap();

        let mut last_spinner = None;
        let message = loop {
            match resp_rx.recv().await.unwrap() {
                NetworkResponse::LoadingStateChanged { loading_state } => {
                    last_spinner = Some(loading_state.spinner_char)
                }
                NetworkResponse::Error { message } => break message,
                NetworkResponse::SweepstakesLoaded { .. } => panic!("load should fail"),
            }
        };

        assert!(message.starts_with("cannot read sweepstakes: "), "{message}");
        assert_eq!(last_spinner, Some(ERROR_CHAR));
        worker.abort();
    }
}
