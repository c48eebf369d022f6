//! Chatwork message composition.
//!
//! Message layout:
//!
//! ```text
//! [To:123]@mechiru          <- one line per resolved address, if any
//! author: octocat
//! title: crash on start
//! url: https://github.com/o/r/issues/1
//!
//! raw event body            <- omitted in minimal-body mode
//! ```

use tracing::debug;

use crate::extract::MessageParts;
use crate::identity::{resolve_addresses, IdentityMapping};
use crate::mention::extract_mentions;

/// A composed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    /// Whether any GitHub identity was mentioned or assigned, whether or not
    /// it resolved to a Chatwork address.
    pub has_participant: bool,
    pub text: String,
}

/// Mentions in the body followed by metadata logins, first occurrence wins.
pub fn participants(parts: &MessageParts) -> Vec<String> {
    let mut combined = extract_mentions(&parts.body);
    for login in &parts.logins {
        if !combined.contains(login) {
            combined.push(login.clone());
        }
    }
    combined
}

/// Build the notification text for `parts`, addressed via `mapping`.
pub fn compose(
    author: &str,
    parts: &MessageParts,
    mapping: &IdentityMapping,
    minimal_body: bool,
) -> ComposedMessage {
    let participants = participants(parts);
    let addresses = resolve_addresses(&participants, mapping);
    debug!(
        participants = participants.len(),
        addresses = addresses.len(),
        "resolved participants"
    );

    let mut text = String::new();
    for address in &addresses {
        text.push_str(address);
        text.push('\n');
    }
    text.push_str(&format!(
        "author: {}\ntitle: {}\nurl: {}\n",
        author, parts.title, parts.url
    ));
    if !minimal_body {
        text.push('\n');
        text.push_str(&parts.body);
    }

    ComposedMessage {
        has_participant: !participants.is_empty(),
        text,
    }
}
