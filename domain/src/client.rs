use crate::errors::{LoadError, LoadResult, read_file};
use crate::sweepstake::load_sweepstakes;
use crate::tournament::load_tournaments;
use crate::{Sweepstake, Tournament};
use log::{debug, info};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Where the sweepstakes manifest comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url { url: String, basic_auth: Option<String> },
}

impl Source {
    /// `http://` and `https://` values are URLs, anything else is a path.
    pub fn parse(raw: &str, basic_auth: Option<String>) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Source::Url {
                url: raw.to_string(),
                basic_auth: basic_auth.filter(|a| !a.is_empty()),
            }
        } else {
            Source::File(PathBuf::from(raw))
        }
    }

    pub async fn fetch(&self, client: &Client, timeout: Duration) -> LoadResult<Vec<u8>> {
        match self {
            Source::File(path) => read_file(path),
            Source::Url { url, basic_auth } => fetch_url(client, timeout, url, basic_auth.as_deref()).await,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url { url, .. } => write!(f, "{url}"),
        }
    }
}

/// GET `url`, expecting a 200 with a JSON body. `basic_auth` is `user:password`.
async fn fetch_url(client: &Client, timeout: Duration, url: &str, basic_auth: Option<&str>) -> LoadResult<Vec<u8>> {
    let mut request = client.get(url).timeout(timeout);
    if let Some(auth) = basic_auth {
        let (user, password) = match auth.split_once(':') {
            Some((user, password)) => (user, Some(password)),
            None => (auth, None),
        };
        request = request.basic_auth(user, password);
    }

    let response = request
        .send()
        .await
        .map_err(|e| LoadError::Network(e, url.to_owned()))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(LoadError::Status(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let media_type = content_type.split(';').next().unwrap_or_default().trim();
    if !media_type.eq_ignore_ascii_case(JSON_MEDIA_TYPE) {
        return Err(LoadError::ContentType(content_type));
    }

    let body = response.bytes().await.map_err(LoadError::Body)?;
    Ok(body.to_vec())
}

/// Loads tournaments from the data directory and sweepstakes from `source`.
#[derive(Debug, Clone)]
pub struct SweepstakeClient {
    client: Client,
    timeout: Duration,
    data_dir: PathBuf,
    source: Source,
}

impl SweepstakeClient {
    pub fn new(data_dir: impl Into<PathBuf>, source: Source) -> Self {
        Self {
            client: Client::builder()
                .user_agent("sweepstake/0.1 (terminal prize board)")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            data_dir: data_dir.into(),
            source,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn tournaments(&self) -> LoadResult<Vec<Arc<Tournament>>> {
        load_tournaments(&self.data_dir).map_err(|e| e.context("cannot load tournaments"))
    }

    /// Load every tournament, then the sweepstakes that draw from them.
    pub async fn fetch_sweepstakes(&self) -> LoadResult<Vec<Sweepstake>> {
        let tournaments = self.tournaments()?;

        debug!("fetching sweepstakes from {}", self.source);
        let raw = self
            .source
            .fetch(&self.client, self.timeout)
            .await
            .map_err(|e| e.context("cannot read sweepstakes"))?;

        let sweepstakes =
            load_sweepstakes(&raw, &tournaments).map_err(|e| e.context("cannot load sweepstakes"))?;
        info!("{} sweepstake(s) ready from {}", sweepstakes.len(), self.source);
        Ok(sweepstakes)
    }
}
