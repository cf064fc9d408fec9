//! Configuration for Latchkey.
//!
//! Raw TOML structs (all `Option`s) are deserialized from
//! `~/.latchkey/config.toml` and then resolved, together with environment
//! overrides, into [`Settings`]. Everything downstream only sees `Settings`.
//!
//! ```toml
//! [api]
//! base_url = "https://auth.example.com"
//! timeout_secs = 15
//! connect_timeout_secs = 10
//!
//! [storage]
//! dir = "~/.latchkey/credentials"
//! ephemeral = false
//!
//! [app]
//! ascii_only = false
//! high_contrast = false
//! ```
//!
//! String values may reference environment variables as `${NAME}`.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use latchkey_types::UiOptions;

/// Overrides `[api] base_url`.
pub const API_URL_ENV: &str = "LATCHKEY_API_URL";
/// Overrides `[storage] dir`.
pub const STORAGE_DIR_ENV: &str = "LATCHKEY_STORAGE_DIR";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid API base URL `{value}`: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("API base URL `{0}` must use http or https")]
    UnsupportedScheme(String),
    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LatchkeyConfig {
    pub api: Option<ApiConfig>,
    pub storage: Option<StorageConfig>,
    pub app: Option<AppConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the stored credential. Supports a leading `~/`.
    pub dir: Option<String>,
    /// Keep the credential in memory only; nothing survives a restart.
    #[serde(default)]
    pub ephemeral: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
}

/// Where the session credential is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    Directory(PathBuf),
    Ephemeral,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: Url,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub storage: StorageLocation,
    pub ui: UiOptions,
}

impl LatchkeyConfig {
    /// Load `~/.latchkey/config.toml`. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };
        Self::parse(&content, path)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, err);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source: err,
            }
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Resolve against the process environment.
    pub fn resolve(self) -> Result<Settings, ConfigError> {
        self.resolve_with(|name| env::var(name).ok())
    }

    /// Resolve using `lookup` for environment variables.
    pub fn resolve_with(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Settings, ConfigError> {
        let api = self.api.unwrap_or_default();
        let storage = self.storage.unwrap_or_default();
        let app = self.app.unwrap_or_default();

        let raw_url = lookup(API_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .or(api.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let raw_url = expand_env_vars(raw_url.trim(), &lookup);
        let api_base_url = Url::parse(&raw_url).map_err(|source| ConfigError::InvalidUrl {
            value: raw_url.clone(),
            source,
        })?;
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(raw_url));
        }

        let request_timeout = timeout(
            api.timeout_secs,
            DEFAULT_TIMEOUT_SECS,
            "api.timeout_secs",
        )?;
        let connect_timeout = timeout(
            api.connect_timeout_secs,
            DEFAULT_CONNECT_TIMEOUT_SECS,
            "api.connect_timeout_secs",
        )?;

        let storage = if storage.ephemeral {
            StorageLocation::Ephemeral
        } else {
            let dir = lookup(STORAGE_DIR_ENV)
                .filter(|v| !v.trim().is_empty())
                .or(storage.dir)
                .map(|raw| expand_home(&expand_env_vars(raw.trim(), &lookup)))
                .unwrap_or_else(default_storage_dir);
            StorageLocation::Directory(dir)
        };

        Ok(Settings {
            api_base_url,
            request_timeout,
            connect_timeout,
            storage,
            ui: UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
            },
        })
    }
}

impl Settings {
    /// Load the config file (if any) and resolve it against the environment.
    pub fn load() -> Result<Self, ConfigError> {
        LatchkeyConfig::load()?.unwrap_or_default().resolve()
    }
}

fn timeout(value: Option<u64>, default: u64, field: &'static str) -> Result<Duration, ConfigError> {
    match value {
        Some(0) => Err(ConfigError::ZeroTimeout { field }),
        Some(secs) => Ok(Duration::from_secs(secs)),
        None => Ok(Duration::from_secs(default)),
    }
}

/// Replace `${NAME}` references using `lookup`; unknown names expand to "".
pub fn expand_env_vars(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&lookup(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}

/// `~/.latchkey`, or `./.latchkey` when no home directory is known.
#[must_use]
pub fn latchkey_dir() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(".latchkey"), |home| home.join(".latchkey"))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".latchkey").join("config.toml"))
}

fn default_storage_dir() -> PathBuf {
    latchkey_dir().join("credentials")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use super::{
        API_URL_ENV, ConfigError, LatchkeyConfig, STORAGE_DIR_ENV, StorageLocation,
        expand_env_vars,
    };

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn parse(content: &str) -> LatchkeyConfig {
        LatchkeyConfig::parse(content, Path::new("config.toml")).expect("parse")
    }

    #[test]
    fn expand_env_vars_no_vars() {
        assert_eq!(expand_env_vars("hello world", env_of(&[])), "hello world");
    }

    #[test]
    fn expand_env_vars_substitutes_and_blanks_unknown() {
        let lookup = env_of(&[("HOST", "auth.local")]);
        assert_eq!(
            expand_env_vars("https://${HOST}/${MISSING}v1", lookup),
            "https://auth.local/v1"
        );
    }

    #[test]
    fn expand_env_vars_keeps_unterminated_reference() {
        assert_eq!(expand_env_vars("a${B", env_of(&[])), "a${B");
    }

    #[test]
    fn empty_config_resolves_to_defaults() {
        let settings = LatchkeyConfig::default()
            .resolve_with(env_of(&[]))
            .expect("resolve");
        assert_eq!(settings.api_base_url.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(settings.request_timeout, Duration::from_secs(15));
        assert!(matches!(settings.storage, StorageLocation::Directory(_)));
        assert!(!settings.ui.ascii_only);
    }

    #[test]
    fn file_values_are_applied() {
        let config = parse(
            r#"
            [api]
            base_url = "https://auth.example.com/api"
            timeout_secs = 3

            [storage]
            dir = "/tmp/latchkey-test"

            [app]
            high_contrast = true
            "#,
        );
        let settings = config.resolve_with(env_of(&[])).expect("resolve");
        assert_eq!(settings.api_base_url.as_str(), "https://auth.example.com/api");
        assert_eq!(settings.request_timeout, Duration::from_secs(3));
        assert_eq!(
            settings.storage,
            StorageLocation::Directory(PathBuf::from("/tmp/latchkey-test"))
        );
        assert!(settings.ui.high_contrast);
    }

    #[test]
    fn environment_overrides_file() {
        let config = parse(
            r#"
            [api]
            base_url = "https://file.example.com"
            [storage]
            dir = "/from/file"
            "#,
        );
        let settings = config
            .resolve_with(env_of(&[
                (API_URL_ENV, "http://localhost:9000"),
                (STORAGE_DIR_ENV, "/from/env"),
            ]))
            .expect("resolve");
        assert_eq!(settings.api_base_url.as_str(), "http://localhost:9000/");
        assert_eq!(
            settings.storage,
            StorageLocation::Directory(PathBuf::from("/from/env"))
        );
    }

    #[test]
    fn ephemeral_storage_ignores_dir() {
        let config = parse("[storage]\nephemeral = true\ndir = \"/x\"\n");
        let settings = config.resolve_with(env_of(&[])).expect("resolve");
        assert_eq!(settings.storage, StorageLocation::Ephemeral);
    }

    #[test]
    fn rejects_bad_urls_and_zero_timeouts() {
        let err = parse("[api]\nbase_url = \"not a url\"\n")
            .resolve_with(env_of(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let err = parse("[api]\nbase_url = \"ftp://example.com\"\n")
            .resolve_with(env_of(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme(_)));

        let err = parse("[api]\ntimeout_secs = 0\n")
            .resolve_with(env_of(&[]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ZeroTimeout {
                field: "api.timeout_secs"
            }
        ));
    }

    #[test]
    fn parse_error_carries_path() {
        let err = LatchkeyConfig::parse("[api", Path::new("/etc/latchkey.toml")).unwrap_err();
        assert_eq!(err.path(), Some(Path::new("/etc/latchkey.toml")));
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[app]\nascii_only = true\n").expect("write");
        let config = LatchkeyConfig::load_from(&path).expect("load");
        assert!(config.app.expect("app").ascii_only);
    }
}
