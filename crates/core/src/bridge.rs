//! GitHub -> Chatwork notification pipeline.
//!
//! One run is strictly sequential:
//!
//! 1. Merge the inline mapping over the mapping file.
//! 2. Extract title, body, logins and URL from the event.
//! 3. Compose the message and decide whether anyone was addressed.
//! 4. Apply the skip policy.
//! 5. Deliver through the [`MessageSender`].
//!
//! Any failure aborts the run before delivery; nothing is partially sent.

use tracing::{debug, info};

use crate::compose::{compose, ComposedMessage};
use crate::config::BridgeConfig;
use crate::errors::CoreError;
use crate::extract::extract_message_parts;
use crate::identity::merge_mapping;
use crate::notify::MessageSender;

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The message was posted.
    Sent { message_id: String },
    /// Skipped because nobody was mentioned or assigned.
    Skipped,
}

/// Merge the mapping and compose the message for `config`, without sending.
pub fn prepare_message(config: &BridgeConfig) -> Result<ComposedMessage, CoreError> {
    let identity = &config.settings.identity;
    let mapping = merge_mapping(identity.mapping.clone(), identity.mapping_file.as_deref())?;

    let event = &config.context.event;
    info!(event = %event.kind(), actor = %config.context.actor, "composing notification");

    let parts = extract_message_parts(event);
    let message = compose(
        &config.context.actor,
        &parts,
        &mapping,
        config.settings.message.minimal_body,
    );
    debug!(body = %message.text, "message body");
    Ok(message)
}

/// Drives one notification from config to delivery.
pub struct NotifyBridge<S> {
    config: BridgeConfig,
    sender: S,
}

impl<S: MessageSender> NotifyBridge<S> {
    pub fn new(config: BridgeConfig, sender: S) -> Self {
        Self { config, sender }
    }

    /// Execute the full pipeline.
    pub async fn run(&self) -> Result<Outcome, CoreError> {
        let message = prepare_message(&self.config)?;

        if self.config.settings.message.skip_if_no_participant && !message.has_participant {
            info!("no participant found, skipping message");
            return Ok(Outcome::Skipped);
        }

        let posted = self.sender.send_message(&message.text).await?;
        Ok(Outcome::Sent {
            message_id: posted.message_id,
        })
    }
}
