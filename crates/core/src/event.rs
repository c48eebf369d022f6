//! GitHub event model.
//!
//! The GitHub Actions context identifies an event by its `event_name` and
//! the payload's `action`. Each supported pair is one [`EventKind`], and the
//! parsed payload is an [`Event`] variant carrying only the records that kind
//! needs. Parsing happens once, at the boundary, in [`GitHubContext::from_json`];
//! everything downstream matches on [`Event`] exhaustively.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::EventError;

// ---------------------------------------------------------------------------
// Payload records
// ---------------------------------------------------------------------------

/// A GitHub account reference (assignee, reviewer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discussion {
    pub title: String,
    /// GitHub sends `null` for an empty body.
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub assignees: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub requested_reviewers: Vec<User>,
}

/// An issue comment, discussion comment, or discussion answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
}

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// Every `(event_name, action)` pair the bridge handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DiscussionCreated,
    DiscussionEdited,
    DiscussionAnswered,
    DiscussionCommentCreated,
    DiscussionCommentEdited,
    IssueOpened,
    IssueEdited,
    IssueCommentCreated,
    IssueCommentEdited,
    PullRequestOpened,
    PullRequestEdited,
}

impl EventKind {
    pub const ALL: [EventKind; 11] = [
        Self::DiscussionCreated,
        Self::DiscussionEdited,
        Self::DiscussionAnswered,
        Self::DiscussionCommentCreated,
        Self::DiscussionCommentEdited,
        Self::IssueOpened,
        Self::IssueEdited,
        Self::IssueCommentCreated,
        Self::IssueCommentEdited,
        Self::PullRequestOpened,
        Self::PullRequestEdited,
    ];

    /// The `github.event_name` for this kind.
    pub fn event_name(self) -> &'static str {
        match self {
            Self::DiscussionCreated | Self::DiscussionEdited | Self::DiscussionAnswered => {
                "discussion"
            }
            Self::DiscussionCommentCreated | Self::DiscussionCommentEdited => {
                "discussion_comment"
            }
            Self::IssueOpened | Self::IssueEdited => "issues",
            Self::IssueCommentCreated | Self::IssueCommentEdited => "issue_comment",
            Self::PullRequestOpened | Self::PullRequestEdited => "pull_request",
        }
    }

    /// The `github.event.action` for this kind.
    pub fn action(self) -> &'static str {
        match self {
            Self::DiscussionCreated
            | Self::DiscussionCommentCreated
            | Self::IssueCommentCreated => "created",
            Self::DiscussionEdited
            | Self::DiscussionCommentEdited
            | Self::IssueEdited
            | Self::IssueCommentEdited
            | Self::PullRequestEdited => "edited",
            Self::DiscussionAnswered => "answered",
            Self::IssueOpened | Self::PullRequestOpened => "opened",
        }
    }

    /// Look up the kind for an `(event_name, action)` pair.
    pub fn from_parts(event_name: &str, action: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.event_name() == event_name && k.action() == action)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.event_name(), self.action())
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A parsed event payload. Exactly the records its kind requires are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    DiscussionCreated { discussion: Discussion },
    DiscussionEdited { discussion: Discussion },
    DiscussionAnswered { discussion: Discussion, answer: Comment },
    DiscussionCommentCreated { discussion: Discussion, comment: Comment },
    DiscussionCommentEdited { discussion: Discussion, comment: Comment },
    IssueOpened { issue: Issue },
    IssueEdited { issue: Issue },
    IssueCommentCreated { issue: Issue, comment: Comment },
    IssueCommentEdited { issue: Issue, comment: Comment },
    PullRequestOpened { pull_request: PullRequest },
    PullRequestEdited { pull_request: PullRequest },
}

#[derive(Deserialize)]
struct DiscussionPayload {
    discussion: Discussion,
}

#[derive(Deserialize)]
struct DiscussionAnswerPayload {
    discussion: Discussion,
    answer: Comment,
}

#[derive(Deserialize)]
struct DiscussionCommentPayload {
    discussion: Discussion,
    comment: Comment,
}

#[derive(Deserialize)]
struct IssuePayload {
    issue: Issue,
}

#[derive(Deserialize)]
struct IssueCommentPayload {
    issue: Issue,
    comment: Comment,
}

#[derive(Deserialize)]
struct PullRequestPayload {
    pull_request: PullRequest,
}

fn decode<T: DeserializeOwned>(
    kind: EventKind,
    payload: serde_json::Value,
) -> Result<T, EventError> {
    serde_json::from_value(payload).map_err(|e| EventError::Payload {
        kind: kind.to_string(),
        detail: e.to_string(),
    })
}

impl Event {
    /// Decode `payload` (the `github.event` object) as an event of `kind`.
    pub fn from_payload(kind: EventKind, payload: serde_json::Value) -> Result<Self, EventError> {
        let event = match kind {
            EventKind::DiscussionCreated => {
                let p: DiscussionPayload = decode(kind, payload)?;
                Self::DiscussionCreated { discussion: p.discussion }
            }
            EventKind::DiscussionEdited => {
                let p: DiscussionPayload = decode(kind, payload)?;
                Self::DiscussionEdited { discussion: p.discussion }
            }
            EventKind::DiscussionAnswered => {
                let p: DiscussionAnswerPayload = decode(kind, payload)?;
                Self::DiscussionAnswered {
                    discussion: p.discussion,
                    answer: p.answer,
                }
            }
            EventKind::DiscussionCommentCreated => {
                let p: DiscussionCommentPayload = decode(kind, payload)?;
                Self::DiscussionCommentCreated {
                    discussion: p.discussion,
                    comment: p.comment,
                }
            }
            EventKind::DiscussionCommentEdited => {
                let p: DiscussionCommentPayload = decode(kind, payload)?;
                Self::DiscussionCommentEdited {
                    discussion: p.discussion,
                    comment: p.comment,
                }
            }
            EventKind::IssueOpened => {
                let p: IssuePayload = decode(kind, payload)?;
                Self::IssueOpened { issue: p.issue }
            }
            EventKind::IssueEdited => {
                let p: IssuePayload = decode(kind, payload)?;
                Self::IssueEdited { issue: p.issue }
            }
            EventKind::IssueCommentCreated => {
                let p: IssueCommentPayload = decode(kind, payload)?;
                Self::IssueCommentCreated {
                    issue: p.issue,
                    comment: p.comment,
                }
            }
            EventKind::IssueCommentEdited => {
                let p: IssueCommentPayload = decode(kind, payload)?;
                Self::IssueCommentEdited {
                    issue: p.issue,
                    comment: p.comment,
                }
            }
            EventKind::PullRequestOpened => {
                let p: PullRequestPayload = decode(kind, payload)?;
                Self::PullRequestOpened { pull_request: p.pull_request }
            }
            EventKind::PullRequestEdited => {
                let p: PullRequestPayload = decode(kind, payload)?;
                Self::PullRequestEdited { pull_request: p.pull_request }
            }
        };
        Ok(event)
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::DiscussionCreated { .. } => EventKind::DiscussionCreated,
            Self::DiscussionEdited { .. } => EventKind::DiscussionEdited,
            Self::DiscussionAnswered { .. } => EventKind::DiscussionAnswered,
            Self::DiscussionCommentCreated { .. } => EventKind::DiscussionCommentCreated,
            Self::DiscussionCommentEdited { .. } => EventKind::DiscussionCommentEdited,
            Self::IssueOpened { .. } => EventKind::IssueOpened,
            Self::IssueEdited { .. } => EventKind::IssueEdited,
            Self::IssueCommentCreated { .. } => EventKind::IssueCommentCreated,
            Self::IssueCommentEdited { .. } => EventKind::IssueCommentEdited,
            Self::PullRequestOpened { .. } => EventKind::PullRequestOpened,
            Self::PullRequestEdited { .. } => EventKind::PullRequestEdited,
        }
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// The subset of the GitHub Actions `github` context the bridge reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubContext {
    /// Login of the user that triggered the workflow.
    pub actor: String,
    pub event: Event,
}

#[derive(Deserialize)]
struct RawContext {
    #[serde(default)]
    actor: String,
    event_name: String,
    event: serde_json::Value,
}

impl GitHubContext {
    /// Parse the JSON produced by `${{ toJson(github) }}`.
    pub fn from_json(json: &str) -> Result<Self, EventError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| EventError::Context(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, EventError> {
        let raw: RawContext =
            serde_json::from_value(value).map_err(|e| EventError::Context(e.to_string()))?;

        let action = raw
            .event
            .get("action")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        debug!(event_name = %raw.event_name, action = %action, "parsing event context");

        let kind = EventKind::from_parts(&raw.event_name, &action).ok_or_else(|| {
            EventError::Unsupported {
                event_name: raw.event_name.clone(),
                action: action.clone(),
            }
        })?;

        Ok(Self {
            actor: raw.actor,
            event: Event::from_payload(kind, raw.event)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_round_trips_through_parts() {
        for kind in EventKind::ALL {
            assert_eq!(
                EventKind::from_parts(kind.event_name(), kind.action()),
                Some(kind)
            );
        }
        assert_eq!(EventKind::from_parts("issues", "closed"), None);
        assert_eq!(EventKind::from_parts("push", ""), None);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(EventKind::IssueCommentCreated.to_string(), "issue_comment/created");
        assert_eq!(EventKind::DiscussionAnswered.to_string(), "discussion/answered");
    }

    #[test]
    fn test_parse_issue_opened() {
        let ctx = GitHubContext::from_value(json!({
            "actor": "mechiru",
            "event_name": "issues",
            "event": {
                "action": "opened",
                "issue": {
                    "title": "crash on start",
                    "body": null,
                    "html_url": "https://github.com/o/r/issues/1",
                    "assignees": [{"login": "alice", "id": 1}]
                }
            }
        }))
        .unwrap();

        assert_eq!(ctx.actor, "mechiru");
        assert_eq!(ctx.event.kind(), EventKind::IssueOpened);
        match ctx.event {
            Event::IssueOpened { issue } => {
                assert_eq!(issue.body, None);
                assert_eq!(issue.assignees, vec![User { login: "alice".into() }]);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_discussion_answered() {
        let ctx = GitHubContext::from_value(json!({
            "actor": "bob",
            "event_name": "discussion",
            "event": {
                "action": "answered",
                "discussion": {"title": "Q", "body": "how?", "html_url": "https://d/1"},
                "answer": {"body": "like this", "html_url": "https://d/1#a"}
            }
        }))
        .unwrap();
        assert_eq!(ctx.event.kind(), EventKind::DiscussionAnswered);
    }

    #[test]
    fn test_parse_discussion_created() {
        let ctx = GitHubContext::from_value(json!({
            "actor": "bob",
            "event_name": "discussion",
            "event": {
                "action": "created",
                "discussion": {"title": "Q", "body": null, "html_url": "https://d/1"}
            }
        }))
        .unwrap();
        assert_eq!(
            ctx.event,
            Event::DiscussionCreated {
                discussion: Discussion {
                    title: "Q".into(),
                    body: None,
                    html_url: "https://d/1".into(),
                },
            }
        );
    }

    #[test]
    fn test_parse_discussion_comment_edited() {
        let ctx = GitHubContext::from_value(json!({
            "actor": "bob",
            "event_name": "discussion_comment",
            "event": {
                "action": "edited",
                "discussion": {"title": "Q", "body": "how?", "html_url": "https://d/1"},
                "comment": {"body": "cc @alice", "html_url": "https://d/1#c2", "id": 2}
            }
        }))
        .unwrap();
        match ctx.event {
            Event::DiscussionCommentEdited { discussion, comment } => {
                assert_eq!(discussion.title, "Q");
                assert_eq!(comment.body.as_deref(), Some("cc @alice"));
                assert_eq!(comment.html_url, "https://d/1#c2");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_issue_comment_created() {
        let ctx = GitHubContext::from_value(json!({
            "actor": "bob",
            "event_name": "issue_comment",
            "event": {
                "action": "created",
                "issue": {"title": "t", "body": "b", "html_url": "https://i/1"},
                "comment": {"body": null, "html_url": "https://i/1#c1"}
            }
        }))
        .unwrap();
        match ctx.event {
            Event::IssueCommentCreated { issue, comment } => {
                assert!(issue.assignees.is_empty());
                assert_eq!(comment.body, None);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_pull_request_edited() {
        let ctx = GitHubContext::from_value(json!({
            "actor": "bob",
            "event_name": "pull_request",
            "event": {
                "action": "edited",
                "pull_request": {
                    "title": "Add feature",
                    "body": "see @carol",
                    "html_url": "https://p/2",
                    "assignees": [{"login": "alice"}],
                    "requested_reviewers": [{"login": "dave", "type": "User"}]
                }
            }
        }))
        .unwrap();
        match ctx.event {
            Event::PullRequestEdited { pull_request } => {
                assert_eq!(pull_request.title, "Add feature");
                assert_eq!(pull_request.assignees, vec![User { login: "alice".into() }]);
                assert_eq!(
                    pull_request.requested_reviewers,
                    vec![User { login: "dave".into() }]
                );
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_pull_request_without_reviewers() {
        let ctx = GitHubContext::from_value(json!({
            "event_name": "pull_request",
            "event": {
                "action": "opened",
                "pull_request": {"title": "t", "body": null, "html_url": "https://p/3"}
            }
        }))
        .unwrap();
        match ctx.event {
            Event::PullRequestOpened { pull_request } => {
                assert!(pull_request.assignees.is_empty());
                assert!(pull_request.requested_reviewers.is_empty());
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(ctx.actor, "");
    }

    #[test]
    fn test_unsupported_event() {
        let err = GitHubContext::from_value(json!({
            "actor": "bob",
            "event_name": "issues",
            "event": {"action": "closed"}
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            EventError::Unsupported { ref event_name, ref action }
                if event_name == "issues" && action == "closed"
        ));
    }

    #[test]
    fn test_missing_record_is_payload_error() {
        let err = GitHubContext::from_value(json!({
            "event_name": "issue_comment",
            "event": {
                "action": "created",
                "issue": {"title": "t", "html_url": "u"}
            }
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            EventError::Payload { ref kind, .. } if kind == "issue_comment/created"
        ));
    }

    #[test]
    fn test_invalid_json_is_context_error() {
        let err = GitHubContext::from_json("{not json").unwrap_err();
        assert!(matches!(err, EventError::Context(_)));

        let err = GitHubContext::from_json(r#"{"actor": "x"}"#).unwrap_err();
        assert!(matches!(err, EventError::Context(_)));
    }
}
