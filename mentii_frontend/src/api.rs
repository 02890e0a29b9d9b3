use std::time::Duration;

use log::warn;
use reqwest::blocking::multipart::Form;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::models::{
    AuthResponse, CommunityDetail, CommunityList, Community, ContentInput, Conversation,
    ConversationList, LoginRequest, Message, MessageList, NewPost, Post, PostList, Resource,
    ResourceKind, ResourceList, SignUpRequest, User,
};
use crate::session::Session;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request could not be built: {0}")]
    Request(String),
    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("server responded with {status}")]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// Server-provided `detail`, if the failure carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Message suitable for an inline banner: the server detail, or `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Session) -> Result<Self, ApiError> {
        let base = sanitize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ApiError::Request(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            base_url: base,
            client,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = self.client.post(self.url("/auth/login")?).json(&body);
        decode(self.execute(request)?)
    }

    pub fn signup(&self, input: &SignUpRequest) -> Result<AuthResponse, ApiError> {
        let request = self.client.post(self.url("/api/auth/signup")?).json(input);
        decode(self.execute(request)?)
    }

    pub fn list_posts(&self, subject: Option<&str>) -> Result<Vec<Post>, ApiError> {
        let mut request = self.client.get(self.url("/posts")?);
        if let Some(subject) = subject {
            request = request.query(&[("subject", subject)]);
        }
        let list: PostList = decode(self.execute(request)?)?;
        Ok(list.posts)
    }

    pub fn create_post(&self, post: &NewPost) -> Result<(), ApiError> {
        let mut form = Form::new()
            .text("content", post.content.clone())
            .text("subject", post.subject.clone());
        if let Some(path) = &post.image {
            form = form.file("image", path).map_err(|err| {
                ApiError::Request(format!("cannot attach {}: {err}", path.display()))
            })?;
        }
        let request = self.client.post(self.url("/posts")?).multipart(form);
        self.execute(request).map(drop)
    }

    pub fn like_post(&self, post_id: i64) -> Result<(), ApiError> {
        let request = self.client.post(self.url(&format!("/posts/{post_id}/like"))?);
        self.execute(request).map(drop)
    }

    pub fn list_communities(&self, level: Option<&str>) -> Result<Vec<Community>, ApiError> {
        let mut request = self.client.get(self.url("/communities")?);
        if let Some(level) = level {
            request = request.query(&[("level", level)]);
        }
        let list: CommunityList = decode(self.execute(request)?)?;
        Ok(list.communities)
    }

    pub fn get_community(&self, community_id: i64) -> Result<CommunityDetail, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("/communities/{community_id}"))?);
        decode(self.execute(request)?)
    }

    pub fn join_community(&self, community_id: i64) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.url(&format!("/communities/{community_id}/join"))?);
        self.execute(request).map(drop)
    }

    pub fn create_community_post(&self, community_id: i64, content: &str) -> Result<(), ApiError> {
        let body = ContentInput {
            content: content.to_string(),
        };
        let request = self
            .client
            .post(self.url(&format!("/communities/{community_id}/posts"))?)
            .json(&body);
        self.execute(request).map(drop)
    }

    pub fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let request = self.client.get(self.url("/chat/conversations")?);
        let list: ConversationList = decode(self.execute(request)?)?;
        Ok(list.conversations)
    }

    pub fn list_messages(&self, conversation_id: i64) -> Result<Vec<Message>, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("/chat/conversations/{conversation_id}/messages"))?);
        let list: MessageList = decode(self.execute(request)?)?;
        Ok(list.messages)
    }

    pub fn send_message(&self, conversation_id: i64, content: &str) -> Result<(), ApiError> {
        let body = ContentInput {
            content: content.to_string(),
        };
        let request = self
            .client
            .post(self.url(&format!("/chat/conversations/{conversation_id}/messages"))?)
            .json(&body);
        self.execute(request).map(drop)
    }

    pub fn list_resources(
        &self,
        kind: Option<ResourceKind>,
        subject: Option<&str>,
    ) -> Result<Vec<Resource>, ApiError> {
        let mut request = self.client.get(self.url("/resources")?);
        if let Some(kind) = kind {
            request = request.query(&[("type", kind.as_str())]);
        }
        if let Some(subject) = subject {
            request = request.query(&[("subject", subject)]);
        }
        let list: ResourceList = decode(self.execute(request)?)?;
        Ok(list.resources)
    }

    pub fn me(&self) -> Result<User, ApiError> {
        let request = self.client.get(self.url("/users/me")?);
        decode(self.execute(request)?)
    }

    /// Attaches the bearer token and turns non-2xx responses into [`ApiError::Status`].
    fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().map_err(ApiError::Transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        let detail = extract_detail(&body);
        warn!(
            "request failed with {status}: {}",
            detail.as_deref().unwrap_or("no detail in response body")
        );
        Err(ApiError::Status { status, detail })
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|err| ApiError::Request(format!("invalid URL for {path}: {err}")))
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().map_err(ApiError::Transport)?;
    let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
    serde_json::from_str(body).map_err(ApiError::Decode)
}

/// Pulls a human readable message out of an error body.
///
/// Plain errors carry `{"detail": "..."}`; validation failures carry a list of
/// `{"msg": "..."}` entries, in which case the first message wins.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn sanitize_base_url(mut base: String) -> Result<String, ApiError> {
    base = base.trim().to_string();
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    while base.ends_with('/') {
        base.pop();
    }
    Url::parse(&base).map_err(|err| ApiError::Request(format!("invalid base URL: {err}")))?;
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_is_extracted() {
        assert_eq!(
            extract_detail(r#"{"detail": "Incorrect email or password"}"#).as_deref(),
            Some("Incorrect email or password")
        );
    }

    #[test]
    fn validation_detail_uses_first_message() {
        let body = r#"{"detail": [{"loc": ["body", "email"], "msg": "value is not a valid email address"}]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("value is not a valid email address")
        );
    }

    #[test]
    fn bodies_without_detail_yield_none() {
        assert_eq!(extract_detail(""), None);
        assert_eq!(extract_detail("<html>502</html>"), None);
        assert_eq!(extract_detail(r#"{"error": "nope"}"#), None);
    }

    #[test]
    fn user_message_prefers_detail() {
        let with_detail = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            detail: Some("Email already registered".into()),
        };
        let bare = ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: None,
        };
        assert_eq!(with_detail.user_message("Sign up failed. Try again."), "Email already registered");
        assert_eq!(bare.user_message("Sign up failed. Try again."), "Sign up failed. Try again.");
    }

    #[test]
    fn base_url_is_normalized() {
        assert_eq!(sanitize_base_url("127.0.0.1:8000/".into()).unwrap(), "http://127.0.0.1:8000");
        assert_eq!(
            sanitize_base_url("https://api.mentii.app//".into()).unwrap(),
            "https://api.mentii.app"
        );
    }
}
