//! Configuration for the Rise client.
//!
//! Loaded from `~/.rise/config.toml`. A missing file is not an error; every
//! section is optional and environment variables fill the gaps.
//!
//! ```toml
//! [api]
//! base_url = "https://api.example.com/v1"
//! token = "${RISE_API_TOKEN}"
//! timeout_secs = 30
//!
//! [plan]
//! minimum_horizon_years = 1
//!
//! [app]
//! log_filter = "info"
//! ```

use std::{env, fs, path::Path, path::PathBuf};

use serde::Deserialize;

/// Overrides `[api] base_url`.
pub const API_URL_ENV: &str = "RISE_API_URL";
/// Used when `[api] token` is absent.
pub const API_TOKEN_ENV: &str = "RISE_API_TOKEN";

#[derive(Debug, Default, Deserialize)]
pub struct RiseConfig {
    pub api: Option<ApiSettings>,
    pub plan: Option<PlanSettings>,
    pub app: Option<AppSettings>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Default, Deserialize)]
pub struct ApiSettings {
    pub base_url: Option<String>,
    /// Bearer token. `${VAR}` references are expanded.
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
}

// Manual Debug impl to prevent leaking the token in logs.
impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("base_url", &self.base_url)
            .field(
                "token",
                &if self.token.is_some() {
                    "[REDACTED]"
                } else {
                    "None"
                },
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanSettings {
    /// Target dates must be at least this many years (and a day) out.
    /// Absent means tomorrow is the earliest acceptable date.
    pub minimum_horizon_years: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppSettings {
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

/// Replace `${VAR}` references with environment values (missing vars become empty).
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if end > 0 => {
                out.push_str(&env::var(&after[..end]).unwrap_or_default());
                rest = &after[end + 1..];
            }
            _ => {
                out.push_str("${");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

impl RiseConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

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

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Base URL: `RISE_API_URL` wins over the config file.
    #[must_use]
    pub fn base_url(&self) -> Option<String> {
        env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| {
                self.api
                    .as_ref()
                    .and_then(|api| api.base_url.as_deref())
                    .map(expand_env_vars)
            })
            .filter(|v| !v.trim().is_empty())
    }

    /// Token: `[api] token` (expanded), falling back to `RISE_API_TOKEN`.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.api
            .as_ref()
            .and_then(|api| api.token.as_deref())
            .map(expand_env_vars)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| env::var(API_TOKEN_ENV).ok())
            .filter(|v| !v.trim().is_empty())
    }

    #[must_use]
    pub fn timeout_secs(&self) -> Option<u64> {
        self.api.as_ref().and_then(|api| api.timeout_secs)
    }

    #[must_use]
    pub fn minimum_horizon_years(&self) -> Option<u32> {
        self.plan.as_ref().and_then(|plan| plan.minimum_horizon_years)
    }

    #[must_use]
    pub fn log_filter(&self) -> Option<&str> {
        self.app.as_ref().and_then(|app| app.log_filter.as_deref())
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".rise").join("config.toml"))
}
