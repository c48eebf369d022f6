//! Configuration for chatwork-notify.
//!
//! There are two boundary parsers, and both produce one immutable
//! [`BridgeConfig`]:
//!
//! - [`ActionInputs`]: the raw string inputs of the GitHub Action
//!   (`roomid`, `token`, `mapping`, `mappingFile`, `ignoreBody`,
//!   `skipSendingMessage`, `context`).
//! - [`AppConfig::load_and_resolve`]: a TOML file. Secrets are stored as
//!   `_env` fields that name an environment variable, and are resolved at
//!   runtime via [`AppConfig::resolve_env_vars`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{ConfigError, CoreError};
use crate::event::GitHubContext;
use crate::identity::IdentityMapping;
use crate::notify::DEFAULT_API_URL;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Settings loaded from a TOML file (or assembled from action inputs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Destination room and API credentials.
    pub chatwork: ChatworkConfig,

    /// Identity mapping settings.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Message composition and delivery policy.
    #[serde(default)]
    pub message: MessageConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

// ---------------------------------------------------------------------------
// Chatwork
// ---------------------------------------------------------------------------

/// Chatwork room and API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatworkConfig {
    /// Numeric room id messages are posted to.
    pub room_id: u64,

    /// Environment variable holding the Chatwork API token.
    #[serde(default)]
    pub token_env: Option<String>,

    /// Chatwork API base URL (default `https://api.chatwork.com`).
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Resolved token (populated by `resolve_env_vars` or from inputs).
    #[serde(skip)]
    pub token: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Identity mapping sources.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IdentityConfig {
    /// Inline GitHub login -> Chatwork address entries. These win over the file.
    #[serde(default)]
    pub mapping: IdentityMapping,

    /// Path to a JSON (or `.toml`) mapping file.
    #[serde(default)]
    pub mapping_file: Option<PathBuf>,
}

impl IdentityConfig {
    /// An empty `mapping_file` means no mapping file, as with the action input.
    fn normalize(&mut self) {
        self.mapping_file = self
            .mapping_file
            .take()
            .filter(|p| !p.to_string_lossy().trim().is_empty());
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MessageConfig {
    /// Leave the raw event body out of the message.
    #[serde(default)]
    pub minimal_body: bool,

    /// Do not post at all when nobody was mentioned or assigned.
    #[serde(default)]
    pub skip_if_no_participant: bool,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & resolving
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load an [`AppConfig`] from a TOML file at the given path.
    ///
    /// This does **not** resolve environment variables -- call
    /// [`resolve_env_vars`](Self::resolve_env_vars) afterwards.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let mut config: AppConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.identity.normalize();

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Resolve `chatwork.token_env` into `chatwork.token`.
    ///
    /// A token that is already set (e.g. from action inputs) is kept.
    pub fn resolve_env_vars(&mut self) -> Result<(), ConfigError> {
        if self.chatwork.token.is_some() {
            return Ok(());
        }
        if let Some(ref env_name) = self.chatwork.token_env {
            let token = resolve_optional_env(env_name, "chatwork.token_env");
            if token.is_none() {
                return Err(ConfigError::EnvVarMissing {
                    var: env_name.clone(),
                    field: "chatwork.token_env".into(),
                });
            }
            self.chatwork.token = token;
        }
        Ok(())
    }

    /// Validate that all required fields are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chatwork.room_id == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chatwork.room_id".into(),
                detail: "room id must be > 0".into(),
            });
        }
        if self.chatwork.token.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::InvalidValue {
                field: "chatwork.token".into(),
                detail: "Chatwork API token must not be empty".into(),
            });
        }
        if self.chatwork.api_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "chatwork.api_url".into(),
                detail: "API URL must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Convenience: load, resolve, and validate in one call.
    pub fn load_and_resolve<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file(path)?;
        config.resolve_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// The validated API token.
    pub fn token(&self) -> &str {
        self.chatwork.token.as_deref().unwrap_or_default()
    }
}

/// Try to read an environment variable by name. Returns `Some(value)` on
/// success; logs a warning and returns `None` if the variable is unset or empty.
fn resolve_optional_env(env_name: &str, field: &str) -> Option<String> {
    match std::env::var(env_name) {
        Ok(val) if !val.is_empty() => {
            debug!(field, env_name, "resolved env var");
            Some(val)
        }
        Ok(_) => {
            warn!(field, env_name, "env var is set but empty");
            None
        }
        Err(_) => {
            warn!(field, env_name, "env var not set");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Action inputs
// ---------------------------------------------------------------------------

/// Raw GitHub Action inputs, exactly as strings.
#[derive(Debug, Clone, Default)]
pub struct ActionInputs {
    pub room_id: String,
    pub token: String,
    /// JSON object of login -> address|null. Empty means `{}`.
    pub mapping: String,
    /// Empty means no mapping file.
    pub mapping_file: String,
    pub ignore_body: String,
    pub skip_sending_message: String,
    /// JSON of the `github` context.
    pub context: String,
    pub api_url: Option<String>,
}

fn input_flag(value: &str) -> bool {
    value.trim() == "true"
}

impl ActionInputs {
    /// Turn raw inputs into settings, without touching the event context.
    pub fn to_app_config(&self) -> Result<AppConfig, ConfigError> {
        let room_id = self
            .room_id
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "roomid".into(),
                detail: format!("'{}' is not a room id: {}", self.room_id, e),
            })?;

        let mapping = if self.mapping.trim().is_empty() {
            IdentityMapping::new()
        } else {
            IdentityMapping::from_json(&self.mapping).map_err(|e| ConfigError::InvalidValue {
                field: "mapping".into(),
                detail: e.to_string(),
            })?
        };

        let mapping_file = match self.mapping_file.trim() {
            "" => None,
            path => Some(PathBuf::from(path)),
        };

        let config = AppConfig {
            chatwork: ChatworkConfig {
                room_id,
                token_env: None,
                api_url: self
                    .api_url
                    .clone()
                    .filter(|url| !url.trim().is_empty())
                    .unwrap_or_else(default_api_url),
                token: Some(self.token.clone()),
            },
            identity: IdentityConfig {
                mapping,
                mapping_file,
            },
            message: MessageConfig {
                minimal_body: input_flag(&self.ignore_body),
                skip_if_no_participant: input_flag(&self.skip_sending_message),
            },
            log: LogConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Bridge config
// ---------------------------------------------------------------------------

/// Everything one run needs: settings plus the parsed event context.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub settings: AppConfig,
    pub context: GitHubContext,
}

impl BridgeConfig {
    /// Parse action inputs in full, including the event context.
    pub fn from_inputs(inputs: &ActionInputs) -> Result<Self, CoreError> {
        let settings = inputs.to_app_config()?;
        let context = GitHubContext::from_json(&inputs.context)?;
        Ok(Self { settings, context })
    }

    /// Load settings from a TOML file and pair them with a context document.
    pub fn from_file<P: AsRef<Path>>(path: P, context_json: &str) -> Result<Self, CoreError> {
        let settings = AppConfig::load_and_resolve(path)?;
        let context = GitHubContext::from_json(context_json)?;
        Ok(Self { settings, context })
    }
}
