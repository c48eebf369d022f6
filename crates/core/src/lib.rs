//! chatwork-notify core library.
//!
//! Turns a GitHub event (issue, pull request, discussion, or a comment on
//! one) into a Chatwork message addressed to the mentioned and assigned
//! people: event parsing, field extraction, `@mention` scanning, identity
//! mapping, message composition, and delivery through the Chatwork API.

pub mod bridge;
pub mod compose;
pub mod config;
pub mod errors;
pub mod event;
pub mod extract;
pub mod identity;
pub mod mention;
pub mod notify;

// Re-exports for convenience.
pub use bridge::{prepare_message, NotifyBridge, Outcome};
pub use compose::{compose, ComposedMessage};
pub use config::{ActionInputs, AppConfig, BridgeConfig};
pub use event::{Event, EventKind, GitHubContext};
pub use extract::{extract_message_parts, MessageParts};
pub use identity::{merge_mapping, resolve_addresses, IdentityMapping};
pub use mention::extract_mentions;
pub use notify::{ChatworkClient, MessageSender};
