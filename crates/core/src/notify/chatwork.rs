//! Chatwork REST API client.
//!
//! Posts to `POST /v2/rooms/{room_id}/messages` with the API token in the
//! `X-ChatWorkToken` header and a form-encoded `body` field.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{MessageSender, PostedMessage};
use crate::errors::NotificationError;

/// Public Chatwork API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.chatwork.com";

const TOKEN_HEADER: &str = "X-ChatWorkToken";

/// Chatwork has returned `message_id` both as a string and as a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum MessageId {
    Text(String),
    Number(u64),
}

#[derive(Deserialize)]
struct PostMessageResponse {
    message_id: MessageId,
}

/// Asynchronous Chatwork client bound to one room.
#[derive(Clone)]
pub struct ChatworkClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
    room_id: u64,
}

impl ChatworkClient {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        room_id: u64,
    ) -> Result<Self, NotificationError> {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("chatwork-notify/", env!("CARGO_PKG_VERSION"))),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        info!(api_url = %api_url, room_id, "created ChatworkClient");
        Ok(Self {
            http,
            api_url,
            token: token.into(),
            room_id,
        })
    }

    /// Post `body` to the room and return the created message id.
    #[instrument(skip(self, body), fields(room_id = self.room_id))]
    pub async fn post_message(&self, body: &str) -> Result<PostedMessage, NotificationError> {
        let url = format!("{}/v2/rooms/{}/messages", self.api_url, self.room_id);
        debug!(len = body.len(), "posting Chatwork message");

        let resp = self
            .http
            .post(&url)
            .header(TOKEN_HEADER, &self.token)
            .form(&[("body", body)])
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Chatwork API returned error");
            return Err(NotificationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        debug!(response = %text, "Chatwork API response");

        let parsed: PostMessageResponse = serde_json::from_str(&text)
            .map_err(|e| NotificationError::InvalidResponse(e.to_string()))?;
        let message_id = match parsed.message_id {
            MessageId::Text(id) => id,
            MessageId::Number(id) => id.to_string(),
        };

        info!(message_id = %message_id, "Chatwork message posted");
        Ok(PostedMessage { message_id })
    }
}

#[async_trait]
impl MessageSender for ChatworkClient {
    async fn send_message(&self, body: &str) -> Result<PostedMessage, NotificationError> {
        self.post_message(body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_construction_trims_slash() {
        let client = ChatworkClient::new("https://api.chatwork.com/", "tok", 42).unwrap();
        assert_eq!(client.api_url, "https://api.chatwork.com");
        assert_eq!(client.room_id, 42);
    }

    #[tokio::test]
    async fn test_post_message_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/rooms/42/messages"))
            .and(header("X-ChatWorkToken", "tok"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("body=Hello+Chatwork%21"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message_id": "1234"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatworkClient::new(server.uri(), "tok", 42).unwrap();
        let posted = client.post_message("Hello Chatwork!").await.unwrap();
        assert_eq!(posted.message_id, "1234");
    }

    #[tokio::test]
    async fn test_numeric_message_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/rooms/7/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message_id": 99})))
            .mount(&server)
            .await;

        let client = ChatworkClient::new(server.uri(), "tok", 7).unwrap();
        assert_eq!(client.send_message("hi").await.unwrap().message_id, "99");
    }

    #[tokio::test]
    async fn test_non_200_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string("{\"errors\":[\"Invalid API token\"]}"),
            )
            .mount(&server)
            .await;

        let client = ChatworkClient::new(server.uri(), "bad", 1).unwrap();
        let err = client.post_message("hi").await.unwrap_err();
        assert!(matches!(err, NotificationError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_error_status_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ChatworkClient::new(server.uri(), "tok", 1).unwrap();
        match client.post_message("hi").await.unwrap_err() {
            NotificationError::Status { status, body } => {
                assert_eq!(status, 500);
                assert!(body.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_other_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = ChatworkClient::new(server.uri(), "tok", 1).unwrap();
        let err = client.post_message("hi").await.unwrap_err();
        assert!(matches!(err, NotificationError::Status { status: 204, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = ChatworkClient::new(server.uri(), "tok", 1).unwrap();
        let err = client.post_message("hi").await.unwrap_err();
        assert!(matches!(err, NotificationError::InvalidResponse(_)));
    }
}
