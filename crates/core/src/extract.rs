//! Per-event field extraction.
//!
//! | Kind                      | title      | body       | logins               | url        |
//! |---------------------------|------------|------------|----------------------|------------|
//! | discussion created/edited | discussion | discussion | -                    | discussion |
//! | discussion answered       | discussion | answer     | -                    | answer     |
//! | discussion_comment        | discussion | comment    | -                    | comment    |
//! | issues opened/edited      | issue      | issue      | assignees            | issue      |
//! | issue_comment             | issue      | comment    | -                    | comment    |
//! | pull_request              | pr         | pr         | assignees, reviewers | pr         |
//!
//! Each cell names the record the field (`title`, `body`, `html_url`) is read from.
//!
//! Comment notifications rely on in-text mentions only, so comment-bearing
//! kinds never surface assignees or reviewers of the parent record.

use crate::event::{Comment, Discussion, Event, Issue, PullRequest, User};

/// The normalized fields a notification is built from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageParts {
    pub title: String,
    pub body: String,
    /// Participant logins from event metadata, no duplicates.
    pub logins: Vec<String>,
    pub url: String,
}

/// Extract the [`MessageParts`] of an event.
pub fn extract_message_parts(event: &Event) -> MessageParts {
    match event {
        Event::DiscussionCreated { discussion } | Event::DiscussionEdited { discussion } => {
            from_discussion(discussion)
        }
        Event::DiscussionAnswered { discussion, answer } => {
            from_comment(&discussion.title, answer)
        }
        Event::DiscussionCommentCreated { discussion, comment }
        | Event::DiscussionCommentEdited { discussion, comment } => {
            from_comment(&discussion.title, comment)
        }
        Event::IssueOpened { issue } | Event::IssueEdited { issue } => from_issue(issue),
        Event::IssueCommentCreated { issue, comment }
        | Event::IssueCommentEdited { issue, comment } => from_comment(&issue.title, comment),
        Event::PullRequestOpened { pull_request } | Event::PullRequestEdited { pull_request } => {
            from_pull_request(pull_request)
        }
    }
}

fn from_discussion(discussion: &Discussion) -> MessageParts {
    MessageParts {
        title: discussion.title.clone(),
        body: discussion.body.clone().unwrap_or_default(),
        logins: Vec::new(),
        url: discussion.html_url.clone(),
    }
}

fn from_comment(title: &str, comment: &Comment) -> MessageParts {
    MessageParts {
        title: title.to_string(),
        body: comment.body.clone().unwrap_or_default(),
        logins: Vec::new(),
        url: comment.html_url.clone(),
    }
}

fn from_issue(issue: &Issue) -> MessageParts {
    MessageParts {
        title: issue.title.clone(),
        body: issue.body.clone().unwrap_or_default(),
        logins: distinct_logins(&issue.assignees),
        url: issue.html_url.clone(),
    }
}

fn from_pull_request(pr: &PullRequest) -> MessageParts {
    let users: Vec<User> = pr
        .assignees
        .iter()
        .chain(pr.requested_reviewers.iter())
        .cloned()
        .collect();
    MessageParts {
        title: pr.title.clone(),
        body: pr.body.clone().unwrap_or_default(),
        logins: distinct_logins(&users),
        url: pr.html_url.clone(),
    }
}

fn distinct_logins(users: &[User]) -> Vec<String> {
    let mut logins: Vec<String> = Vec::with_capacity(users.len());
    for user in users {
        if !logins.contains(&user.login) {
            logins.push(user.login.clone());
        }
    }
    logins
}
