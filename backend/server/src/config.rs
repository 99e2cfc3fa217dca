use std::{
    env,
    fmt::Display,
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};

use axum::http::HeaderValue;
use chrono::{DateTime, FixedOffset, Utc};
use dashboard::MergeMode;
use reqwest::Url;
use sheets::{Credential, CredentialError, DEFAULT_API_BASE, HEADER_SENTINEL, SheetSource};
use thiserror::Error;
use tracing::{info, warn};

pub const SECRETS_DIR: &str = "/run/secrets";

pub const DEFAULT_PORT: &str = "4000";
pub const DEFAULT_RANGE: &str = "Entries";
pub const DEFAULT_CORS_ORIGIN: &str = "https://your-frontend-domain.com";
pub const DEFAULT_END: &str = "2025-07-17T22:00:00-07:00";

const CREDENTIAL_JSON: &str = "GOOGLE_SERVICE_ACCOUNT_JSON";
const CREDENTIAL_PATH: &str = "GOOGLE_SERVICE_ACCOUNT_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value: {message}")]
    Invalid { key: &'static str, message: String },

    #[error(
        "No service account found, set GOOGLE_SERVICE_ACCOUNT_JSON, GOOGLE_SERVICE_ACCOUNT_PATH or the docker secret"
    )]
    MissingCredential,

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

pub struct Config {
    pub port: u16,
    pub cors_origin: HeaderValue,
    pub sweepstakes_end: DateTime<Utc>,
    pub merge_mode: MergeMode,
    pub source: SheetSource,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(&|key| env::var(key).ok(), Path::new(SECRETS_DIR))
    }

    pub fn from_sources(
        lookup: &dyn Fn(&str) -> Option<String>,
        secrets_dir: &Path,
    ) -> Result<Self, ConfigError> {
        let sources = Sources {
            lookup,
            secrets_dir: secrets_dir.to_path_buf(),
        };

        let api_base: Url = sources.try_load("SHEETS_API_BASE", DEFAULT_API_BASE)?;
        if api_base.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                key: "SHEETS_API_BASE",
                message: format!("{api_base} cannot be used as a base URL"),
            });
        }

        Ok(Self {
            port: sources.try_load("PORT", DEFAULT_PORT)?,
            cors_origin: sources.try_load("CORS_ORIGIN", DEFAULT_CORS_ORIGIN)?,
            sweepstakes_end: sources
                .try_load::<DateTime<FixedOffset>>("SWEEPSTAKES_END", DEFAULT_END)?
                .with_timezone(&Utc),
            merge_mode: sources.try_load("MERGE_WALLETS", "false")?,
            source: SheetSource {
                spreadsheet_id: sources.require("GOOGLE_SHEET_ID")?,
                range: sources.try_load("SHEET_RANGE", DEFAULT_RANGE)?,
                header_sentinel: sources.try_load("HEADER_SENTINEL", HEADER_SENTINEL)?,
                api_base,
                credential: sources.credential()?,
            },
        })
    }
}

struct Sources<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
    secrets_dir: PathBuf,
}

impl Sources<'_> {
    fn var(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    fn try_load<T: FromStr>(&self, key: &'static str, default: &str) -> Result<T, ConfigError>
    where
        T::Err: Display,
    {
        self.var(key)
            .unwrap_or_else(|| {
                info!("{key} not set, using default: {default}");
                default.to_string()
            })
            .trim()
            .parse::<T>()
            .map_err(|e| {
                warn!("Invalid {key} value: {e}");
                ConfigError::Invalid {
                    key,
                    message: e.to_string(),
                }
            })
    }

    fn require(&self, key: &'static str) -> Result<String, ConfigError> {
        self.var(key)
            .map(|value| value.trim().to_string())
            .ok_or(ConfigError::Missing(key))
    }

    fn read_secret(&self, secret_name: &str) -> Option<String> {
        let path = self.secrets_dir.join(secret_name);

        read_to_string(&path)
            .map(|s| s.trim().to_string())
            .map_err(|e| {
                warn!("Failed to read {secret_name} from file: {e}");
            })
            .ok()
    }

    /// Inline JSON first, then a key file, then the docker secret.
    fn credential(&self) -> Result<Credential, ConfigError> {
        if let Some(json) = self.var(CREDENTIAL_JSON) {
            info!("Using service account from {CREDENTIAL_JSON}");
            return Ok(Credential::from_json(&json)?);
        }

        if let Some(path) = self.var(CREDENTIAL_PATH) {
            info!("Using service account file {path}");
            return Ok(Credential::from_file(path.trim())?);
        }

        match self.read_secret(CREDENTIAL_JSON) {
            Some(json) => Ok(Credential::from_json(&json)?),
            None => Err(ConfigError::MissingCredential),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, fs};

    use rsa::{
        RsaPrivateKey,
        pkcs8::{EncodePrivateKey, LineEnding},
    };
    use serde_json::json;

    use super::*;

    fn service_account() -> String {
        let key = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
        let pem = key.to_pkcs8_pem(LineEnding::LF).unwrap();

        json!({
            "client_email": "reader@sweepstakes.iam.gserviceaccount.com",
            "private_key": pem.as_str(),
            "token_uri": "http://127.0.0.1:9/token",
        })
        .to_string()
    }

    fn load(vars: &[(&str, String)], secrets_dir: &Path) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();

        Config::from_sources(&move |key| vars.get(key).cloned(), secrets_dir)
    }

    fn no_secrets() -> PathBuf {
        env::temp_dir().join("sweepstakes-config-tests-none")
    }

    #[test]
    fn test_defaults() {
        let config = load(
            &[
                ("GOOGLE_SHEET_ID", "sheet-1".to_string()),
                (CREDENTIAL_JSON, service_account()),
            ],
            &no_secrets(),
        )
        .unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.cors_origin, DEFAULT_CORS_ORIGIN);
        assert_eq!(config.merge_mode, MergeMode::PerRow);
        assert_eq!(config.sweepstakes_end.to_rfc3339(), "2025-07-18T05:00:00+00:00");
        assert_eq!(config.source.spreadsheet_id, "sheet-1");
        assert_eq!(config.source.range, "Entries");
        assert_eq!(config.source.header_sentinel, "HolderAddress");
        assert_eq!(config.source.api_base.as_str(), DEFAULT_API_BASE);
    }

    #[test]
    fn test_overrides() {
        let config = load(
            &[
                ("GOOGLE_SHEET_ID", "sheet-1".to_string()),
                (CREDENTIAL_JSON, service_account()),
                ("PORT", "8080".to_string()),
                ("SHEET_RANGE", "Entries!A2:C100".to_string()),
                ("MERGE_WALLETS", "true".to_string()),
                ("CORS_ORIGIN", "https://sweepstakes.example".to_string()),
            ],
            &no_secrets(),
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.source.range, "Entries!A2:C100");
        assert_eq!(config.merge_mode, MergeMode::PerWallet);
        assert_eq!(config.cors_origin, "https://sweepstakes.example");
    }

    #[test]
    fn test_missing_sheet_id() {
        let result = load(&[(CREDENTIAL_JSON, service_account())], &no_secrets());

        assert!(matches!(result, Err(ConfigError::Missing("GOOGLE_SHEET_ID"))));
    }

    #[test]
    fn test_missing_credential_fails_fast() {
        let result = load(&[("GOOGLE_SHEET_ID", "sheet-1".to_string())], &no_secrets());

        assert!(matches!(result, Err(ConfigError::MissingCredential)));
    }

    #[test]
    fn test_invalid_port() {
        let result = load(
            &[
                ("GOOGLE_SHEET_ID", "sheet-1".to_string()),
                ("PORT", "eighty".to_string()),
            ],
            &no_secrets(),
        );

        assert!(matches!(result, Err(ConfigError::Invalid { key: "PORT", .. })));
    }

    #[test]
    fn test_credential_from_path_and_secret() {
        let dir = env::temp_dir().join(format!("sweepstakes-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let key_file = dir.join("service-account.json");
        fs::write(&key_file, service_account()).unwrap();

        let from_path = load(
            &[
                ("GOOGLE_SHEET_ID", "sheet-1".to_string()),
                (CREDENTIAL_PATH, key_file.display().to_string()),
            ],
            &no_secrets(),
        )
        .unwrap();
        assert_eq!(
            from_path.source.credential.client_email(),
            "reader@sweepstakes.iam.gserviceaccount.com"
        );

        fs::write(dir.join(CREDENTIAL_JSON), service_account()).unwrap();
        let from_secret = load(&[("GOOGLE_SHEET_ID", "sheet-1".to_string())], &dir).unwrap();
        assert_eq!(
            from_secret.source.credential.token_uri(),
            "http://127.0.0.1:9/token"
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_unreadable_credential_path() {
        let result = load(
            &[
                ("GOOGLE_SHEET_ID", "sheet-1".to_string()),
                (CREDENTIAL_PATH, "/definitely/not/here.json".to_string()),
            ],
            &no_secrets(),
        );

        assert!(matches!(
            result,
            Err(ConfigError::Credential(CredentialError::Unreadable { .. }))
        ));
    }
}
