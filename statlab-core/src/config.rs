//! Configuration management for `statlab-core`.
//!
//! The effective configuration is layered: embedded defaults, then a user
//! YAML file, then environment variables, then command-line flags. Every
//! layer above the defaults is a [`ConfigOverrides`] whose `None` fields
//! leave the value underneath untouched.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use statlab_numeric::hypothesis::VarianceAssumption;

use crate::errors::StatlabError;
use crate::procedure::AnalysisOptions;
use crate::session::SessionMode;
use crate::table::MissingValuePolicy;

/// Environment variable overriding `server.host`.
pub const HOST_ENV: &str = "STATLAB_HOST";
/// Environment variable overriding `server.port`.
pub const PORT_ENV: &str = "STATLAB_PORT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 3000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// How non-numeric cells enter the t-test, z-test and ANOVA.
    pub missing_values: MissingValuePolicy,
    /// Threshold for the ANOVA significance sentence.
    pub significance_level: f64,
    /// Pooled (Student) t-test when true, Welch otherwise.
    pub equal_variance: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            missing_values: MissingValuePolicy::Drop,
            significance_level: 0.05,
            equal_variance: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Rows in each randomly generated seed table.
    pub rows: usize,
    /// Fixes the random seed tables and row draws.
    pub random_seed: Option<u64>,
    /// Appended population rows draw from [80, 100] instead of 0.
    pub random_new_rows: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { rows: 30, random_seed: None, random_new_rows: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub mode: SessionMode,
    /// Oldest isolated sessions are evicted beyond this many.
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { mode: SessionMode::Isolated, max_sessions: 1024 }
    }
}

/// The fully resolved application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub analysis: AnalysisConfig,
    pub seed: SeedConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisOverrides {
    pub missing_values: Option<MissingValuePolicy>,
    pub significance_level: Option<f64>,
    pub equal_variance: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedOverrides {
    pub rows: Option<usize>,
    pub random_seed: Option<u64>,
    pub random_new_rows: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionOverrides {
    pub mode: Option<SessionMode>,
    pub max_sessions: Option<usize>,
}

/// A partial configuration layer. Absent keys keep the lower layer's value.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub server: ServerOverrides,
    pub analysis: AnalysisOverrides,
    pub seed: SeedOverrides,
    pub session: SessionOverrides,
}

impl ConfigOverrides {
    /// Reads a user configuration file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Builds the environment layer from a variable lookup.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overrides = Self::default();
        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.trim().is_empty()) {
            overrides.server.host = Some(host.trim().to_string());
        }
        if let Some(port) = lookup(PORT_ENV) {
            let port = port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("{} must be a port number, got '{}'", PORT_ENV, port))?;
            overrides.server.port = Some(port);
        }
        Ok(overrides)
    }

    /// The environment layer from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }
}

/// Applies `overrides` on top of `base`.
pub fn merge_config(base: AppConfig, overrides: Option<ConfigOverrides>) -> AppConfig {
    let mut config = base;
    let Some(o) = overrides else {
        return config;
    };

    if let Some(host) = o.server.host {
        debug!("Overriding server.host with: {}", host);
        config.server.host = host;
    }
    if let Some(port) = o.server.port {
        debug!("Overriding server.port with: {}", port);
        config.server.port = port;
    }
    if let Some(policy) = o.analysis.missing_values {
        debug!("Overriding analysis.missing_values with: {:?}", policy);
        config.analysis.missing_values = policy;
    }
    if let Some(alpha) = o.analysis.significance_level {
        debug!("Overriding analysis.significance_level with: {}", alpha);
        config.analysis.significance_level = alpha;
    }
    if let Some(equal) = o.analysis.equal_variance {
        config.analysis.equal_variance = equal;
    }
    if let Some(rows) = o.seed.rows {
        debug!("Overriding seed.rows with: {}", rows);
        config.seed.rows = rows;
    }
    if let Some(seed) = o.seed.random_seed {
        debug!("Overriding seed.random_seed with: {}", seed);
        config.seed.random_seed = Some(seed);
    }
    if let Some(random) = o.seed.random_new_rows {
        config.seed.random_new_rows = random;
    }
    if let Some(mode) = o.session.mode {
        debug!("Overriding session.mode with: {:?}", mode);
        config.session.mode = mode;
    }
    if let Some(max) = o.session.max_sessions {
        config.session.max_sessions = max;
    }
    config
}

/// Locations searched for a user configuration file, in order.
pub fn config_candidate_paths() -> Vec<PathBuf> {
    let candidates = vec![
        dirs::config_dir().map(|p| p.join("statlab").join("config.yaml")),
        dirs::home_dir().map(|p| p.join(".statlab").join("config.yaml")),
        Some(PathBuf::from("./config/statlab.yaml")),
    ];
    candidates.into_iter().flatten().collect()
}

impl AppConfig {
    /// Parses the embedded defaults.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default configuration from embedded string...");
        let default_yaml = include_str!("../config/default.yaml");
        serde_yml::from_str(default_yaml).context("Failed to parse default configuration")
    }

    /// Defaults merged with the user file: `explicit` if given, otherwise the
    /// first existing candidate path.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let defaults = Self::load_default()?;
        let user_path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => config_candidate_paths().into_iter().find(|p| p.is_file()),
        };
        let user = match user_path {
            Some(path) => Some(ConfigOverrides::load_from_file(&path)?),
            None => {
                debug!("No user configuration file found; using defaults.");
                None
            }
        };
        let config = merge_config(defaults, user);
        config.validate()?;
        Ok(config)
    }

    /// Applies further layers (environment, CLI) and re-validates.
    pub fn with_overrides(self, overrides: ConfigOverrides) -> std::result::Result<Self, StatlabError> {
        let config = merge_config(self, Some(overrides));
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), StatlabError> {
        let mut errors = Vec::new();
        let alpha = self.analysis.significance_level;
        if !(alpha > 0.0 && alpha < 1.0) {
            errors.push(format!("analysis.significance_level must be in (0, 1), got {}", alpha));
        }
        if self.server.port == 0 {
            errors.push("server.port must not be 0".to_string());
        }
        if self.server.host.trim().is_empty() {
            errors.push("server.host must not be empty".to_string());
        }
        if self.session.max_sessions == 0 {
            errors.push("session.max_sessions must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(StatlabError::Config(errors.join("; ")))
        }
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            missing_values: self.analysis.missing_values,
            significance_level: self.analysis.significance_level,
            variance: if self.analysis.equal_variance {
                VarianceAssumption::Pooled
            } else {
                VarianceAssumption::Welch
            },
        }
    }

    /// `host:port` for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_match_struct_defaults() {
        assert_eq!(AppConfig::load_default().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let overrides = ConfigOverrides {
            server: ServerOverrides { port: Some(8080), ..Default::default() },
            ..Default::default()
        };
        let merged = merge_config(AppConfig::default(), Some(overrides));
        assert_eq!(merged.server.port, 8080);
        assert_eq!(merged.server.host, "127.0.0.1");
        assert_eq!(merged.analysis, AnalysisConfig::default());
    }

    #[test]
    fn test_env_layer() {
        let overrides = ConfigOverrides::from_env_with(|key| match key {
            HOST_ENV => Some("0.0.0.0".to_string()),
            PORT_ENV => Some(" 9000 ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(overrides.server.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(overrides.server.port, Some(9000));

        assert!(ConfigOverrides::from_env_with(|key| (key == PORT_ENV).then(|| "http".to_string())).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_alpha_and_port() {
        let mut config = AppConfig::default();
        config.analysis.significance_level = 1.5;
        config.server.port = 0;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("significance_level"));
        assert!(err.contains("server.port"));
    }

    #[test]
    fn test_analysis_options_variance() {
        let mut config = AppConfig::default();
        assert_eq!(config.analysis_options().variance, VarianceAssumption::Pooled);
        config.analysis.equal_variance = false;
        assert_eq!(config.analysis_options().variance, VarianceAssumption::Welch);
    }
}
