//! Delivery of composed messages to Chatwork.
//!
//! [`MessageSender`] is the seam between the bridge and the network:
//! [`chatwork::ChatworkClient`] posts to the Chatwork REST API, and tests
//! substitute their own sender.

pub mod chatwork;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::NotificationError;

pub use chatwork::{ChatworkClient, DEFAULT_API_URL};

/// A message accepted by the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedMessage {
    pub message_id: String,
}

/// Something that can deliver a message body to the configured room.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, body: &str) -> Result<PostedMessage, NotificationError>;
}
