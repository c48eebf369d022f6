//! Error types for the chatwork-notify core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Notification(#[from] NotificationError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and input parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A required environment variable is not set.
    #[error(
        "required environment variable '{var}' is not set (referenced by config field '{field}')"
    )]
    EnvVarMissing {
        var: String,
        field: String,
    },

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue {
        field: String,
        detail: String,
    },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Event errors
// ---------------------------------------------------------------------------

/// Errors from parsing the GitHub event context.
#[derive(Debug, Error)]
pub enum EventError {
    /// The `(event_name, action)` pair is not one this bridge handles.
    #[error("unsupported event: {event_name}/{action}")]
    Unsupported {
        event_name: String,
        action: String,
    },

    /// The payload does not have the shape its event kind requires.
    #[error("invalid payload for event {kind}: {detail}")]
    Payload {
        kind: String,
        detail: String,
    },

    /// The context document itself is not valid JSON of the expected shape.
    #[error("invalid event context: {0}")]
    Context(String),
}

// ---------------------------------------------------------------------------
// Identity errors
// ---------------------------------------------------------------------------

/// Errors from the identity mapping subsystem.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The mapping file could not be loaded.
    #[error("identity mapping file error at '{path}': {detail}")]
    MappingFileError {
        path: String,
        detail: String,
    },

    /// The mapping file (or inline mapping) is not a flat string -> string|null object.
    #[error("identity mapping parse error: {0}")]
    ParseError(String),

    /// Generic I/O error.
    #[error("identity I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Notification errors
// ---------------------------------------------------------------------------

/// Errors from delivering the message to Chatwork.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// HTTP-level transport error (network, TLS, etc.).
    #[error("notification HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The API answered with something other than `200 OK`.
    #[error("status code error. status code: {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },

    /// The response body could not be decoded into a posted message.
    #[error("invalid Chatwork response: {0}")]
    InvalidResponse(String),
}
