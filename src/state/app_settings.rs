use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;
use sweepstake_domain::client::Source;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_MANIFEST: &str = "sweepstakes.json";
const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_REFRESH_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub data_dir: PathBuf,
    pub source: Source,
    pub public_dir: PathBuf,
    pub refresh_interval: Duration,
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = PathBuf::from(var("SWEEPSTAKE_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.into()));
        let basic_auth = var("SWEEPSTAKE_BASIC_AUTH");
        let source = match var("SWEEPSTAKE_SOURCE") {
            Some(raw) => Source::parse(&raw, basic_auth),
            None => Source::File(data_dir.join(DEFAULT_MANIFEST)),
        };

        let refresh_secs = var("SWEEPSTAKE_REFRESH_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REFRESH_SECS);

        Self {
            full_screen: false,
            log_level: var("SWEEPSTAKE_LOG").and_then(|v| v.trim().parse().ok()),
            public_dir: PathBuf::from(var("SWEEPSTAKE_PUBLIC_DIR").unwrap_or_else(|| DEFAULT_PUBLIC_DIR.into())),
            data_dir,
            source,
            refresh_interval: Duration::from_secs(refresh_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> AppSettings {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[]);
        assert_eq!(s.data_dir, PathBuf::from("data"));
        assert_eq!(s.source, Source::File(PathBuf::from("data/sweepstakes.json")));
        assert_eq!(s.public_dir, PathBuf::from("public"));
        assert_eq!(s.refresh_interval, Duration::from_secs(60));
        assert_eq!(s.log_level, None);
        assert!(!s.full_screen);
    }

    #[test]
    fn manifest_follows_data_dir() {
        let s = settings(&[("SWEEPSTAKE_DATA_DIR", "/srv/euro")]);
        assert_eq!(s.source, Source::File(PathBuf::from("/srv/euro/sweepstakes.json")));
    }

    #[test]
    fn url_source_with_basic_auth() {
        let s = settings(&[
            ("SWEEPSTAKE_SOURCE", "https://example.com/sweepstakes.json"),
            ("SWEEPSTAKE_BASIC_AUTH", "user:pass"),
            ("SWEEPSTAKE_LOG", "debug"),
            ("SWEEPSTAKE_REFRESH_SECS", "15"),
        ]);
        assert_eq!(
            s.source,
            Source::Url {
                url: "https://example.com/sweepstakes.json".into(),
                basic_auth: Some("user:pass".into()),
            }
        );
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
        assert_eq!(s.refresh_interval, Duration::from_secs(15));
    }

    #[test]
    fn bad_values_fall_back() {
        let s = settings(&[
            ("SWEEPSTAKE_REFRESH_SECS", "0"),
            ("SWEEPSTAKE_LOG", "chatty"),
            ("SWEEPSTAKE_PUBLIC_DIR", "  "),
        ]);
        assert_eq!(s.refresh_interval, Duration::from_secs(60));
        assert_eq!(s.log_level, None);
        assert_eq!(s.public_dir, PathBuf::from("public"));
    }
}
