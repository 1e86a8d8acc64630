//! Configuration loading for the `mimir` CLI.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.mimir/config.toml` (user)
//! 3. `/etc/mimir/config.toml` (system)
//! 4. built-in defaults
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.mimir/secrets.toml` (user, must be 0600)
//! 2. `/etc/mimir/secrets.toml` (system, must be 0600)
//! 3. provider environment variables

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::corpus::ReferenceCorpus;
use crate::provider::{DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, ProviderBackend};
use crate::session::DEFAULT_MAX_USAGE;
use crate::types::{ContractKind, LabelSet, ReferenceEntry};
use crate::{MimirError, Result};

/// CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub contract: ContractConfig,
    /// Replacement reference corpus. Empty means the built-in samples.
    #[serde(default)]
    pub corpus: Vec<ReferenceEntry>,
}

/// Provider selection.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub backend: ProviderBackend,
    /// Model identifier (default: gpt-4o).
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds (default: 120).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: ProviderBackend::default(),
            model: default_model(),
            timeout_secs: default_timeout(),
            base_url: None,
            temperature: None,
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Session limits.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Attempts allowed per session (default: 5).
    #[serde(default = "default_max_usage")]
    pub max_usage: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_usage: default_max_usage(),
        }
    }
}

fn default_max_usage() -> u32 {
    DEFAULT_MAX_USAGE
}

/// Which reply shape to request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractChoice {
    #[default]
    Structured,
    Labeled,
}

/// Which label strings the labeled-line contract uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelChoice {
    #[default]
    Japanese,
    English,
}

/// Output contract configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractConfig {
    #[serde(default)]
    pub kind: ContractChoice,
    #[serde(default)]
    pub labels: LabelChoice,
}

impl ContractConfig {
    pub fn contract_kind(&self) -> ContractKind {
        match self.kind {
            ContractChoice::Structured => ContractKind::Structured,
            ContractChoice::Labeled => ContractKind::LabeledLine(match self.labels {
                LabelChoice::Japanese => LabelSet::japanese(),
                LabelChoice::English => LabelSet::english(),
            }),
        }
    }
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub openai: Option<ApiKeySecret>,
    #[serde(default)]
    pub anthropic: Option<ApiKeySecret>,
    #[serde(default)]
    pub openrouter: Option<ApiKeySecret>,
    #[serde(default)]
    pub google: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// Provider name → environment variable name mapping.
const PROVIDER_ENV_VARS: &[(&str, &str)] = &[
    ("openai", "OPENAI_API_KEY"),
    ("anthropic", "ANTHROPIC_API_KEY"),
    ("openrouter", "OPENROUTER_API_KEY"),
    ("google", "GOOGLE_API_KEY"),
];

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, the first existing standard
    /// file is used, and defaults apply if there is none.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MimirError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MimirError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MimirError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".mimir").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/mimir/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// The configured corpus, or the built-in one when none is configured.
    pub fn reference_corpus(&self) -> Result<ReferenceCorpus> {
        if self.corpus.is_empty() {
            Ok(ReferenceCorpus::default())
        } else {
            ReferenceCorpus::new(self.corpus.clone())
        }
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (providers may use env vars).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".mimir").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/mimir/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load a secrets file after checking its permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            MimirError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MimirError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            MimirError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(MimirError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// API key for a backend, falling back to its environment variable.
    pub fn api_key(&self, backend: ProviderBackend) -> Option<String> {
        let from_file = match backend {
            ProviderBackend::OpenAI => self.openai.as_ref(),
            ProviderBackend::Anthropic => self.anthropic.as_ref(),
            ProviderBackend::OpenRouter => self.openrouter.as_ref(),
            ProviderBackend::Google => self.google.as_ref(),
            ProviderBackend::Ollama => None,
        }
        .map(|s| s.api_key.clone());

        from_file.or_else(|| {
            PROVIDER_ENV_VARS
                .iter()
                .find(|(name, _)| *name == backend.as_str())
                .and_then(|(_, env_var)| std::env::var(env_var).ok())
        })
    }
}
