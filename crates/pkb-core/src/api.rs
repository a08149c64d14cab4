//! REST client for the notes service.
//!
//! `ApiClient` owns the local precondition checks and the mapping from HTTP
//! status to [`Error`]; a [`Transport`] only moves bytes.

use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::Client;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::models::{
    AccessToken, ApiErrorBody, AuthGrant, AuthResponse, Credentials, NewNote, Note,
    RegisterRequest, Registration,
};
use crate::session::REFRESH_COOKIE_KEY;

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const REFRESH_PATH: &str = "/auth/refresh";
pub const NOTES_PATH: &str = "/notes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outgoing call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: &'static str,
    pub bearer: Option<AccessToken>,
    pub refresh_cookie: Option<AccessToken>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    const fn new(method: Method, path: &'static str) -> Self {
        Self {
            method,
            path,
            bearer: None,
            refresh_cookie: None,
            body: None,
        }
    }

    fn json(mut self, body: &impl Serialize) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    fn bearer(mut self, token: &AccessToken) -> Self {
        self.bearer = Some(token.clone());
        self
    }
}

/// Raw answer to an [`ApiRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
    /// Value of a `refreshToken` cookie set by the response, if any.
    pub refresh_cookie: Option<String>,
}

impl ApiResponse {
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends a single request. Transport failures are returned as errors; any
/// HTTP status, including 4xx/5xx, is a successful send.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: ClientConfig,
    client: Client,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let config = config.validated()?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { config, client })
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.config.endpoint(request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.as_str());
        }
        if let Some(cookie) = &request.refresh_cookie {
            builder = builder.header(COOKIE, format!("{REFRESH_COOKIE_KEY}={}", cookie.as_str()));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = ?request.method, path = request.path, "Sending API request");
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let refresh_cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(parse_refresh_cookie);
        let body = response.text().await?;
        tracing::debug!(status, path = request.path, "API response received");

        Ok(ApiResponse {
            status,
            body,
            refresh_cookie,
        })
    }
}

/// Notes service operations.
#[derive(Debug, Clone)]
pub struct ApiClient<T: Transport> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthGrant> {
        let request = ApiRequest::new(Method::Post, LOGIN_PATH).json(credentials)?;
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(Error::Auth(parse_api_error(response.status, &response.body)));
        }
        into_grant(response)
    }

    pub async fn register(&self, registration: &Registration) -> Result<()> {
        validate_registration(registration)?;

        let body = RegisterRequest {
            username: &registration.username,
            email: &registration.email,
            password_hash: &registration.password,
        };
        let request = ApiRequest::new(Method::Post, REGISTER_PATH).json(&body)?;
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(Error::Auth(parse_api_error(response.status, &response.body)));
        }
        Ok(())
    }

    /// Exchange the refresh cookie for a new access token.
    pub async fn refresh(&self, refresh_cookie: Option<&AccessToken>) -> Result<AuthGrant> {
        let mut request = ApiRequest::new(Method::Get, REFRESH_PATH);
        request.refresh_cookie = refresh_cookie.cloned();
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(Error::Auth(parse_api_error(response.status, &response.body)));
        }
        into_grant(response)
    }

    /// Create a note. `raw_tags` is split on commas without deduplication.
    pub async fn create_note(
        &self,
        token: Option<&AccessToken>,
        title: &str,
        content: &str,
        raw_tags: &str,
    ) -> Result<Note> {
        let token = require_token(token)?;
        let tags = split_tags(raw_tags);
        if tags.is_empty() {
            return Err(Error::Validation("Enter at least one tag".to_string()));
        }

        let body = NewNote {
            title: title.trim().to_string(),
            content: content.trim().to_string(),
            tags,
        };
        let request = ApiRequest::new(Method::Post, NOTES_PATH)
            .json(&body)?
            .bearer(token);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(request_error(&response));
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    pub async fn list_notes(&self, token: Option<&AccessToken>) -> Result<Vec<Note>> {
        let token = require_token(token)?;
        let request = ApiRequest::new(Method::Get, NOTES_PATH).bearer(token);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(request_error(&response));
        }
        Ok(serde_json::from_str(&response.body)?)
    }
}

/// Split a comma-separated tag field, trimming entries and dropping empties.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
        .collect()
}

pub fn validate_registration(registration: &Registration) -> Result<()> {
    let fields = [
        &registration.username,
        &registration.email,
        &registration.password,
        &registration.password_confirm,
    ];
    if fields.iter().any(|field| field.is_empty()) {
        return Err(Error::Validation("All registration fields are required".to_string()));
    }
    if registration.password != registration.password_confirm {
        return Err(Error::Validation("Passwords must match".to_string()));
    }
    Ok(())
}

fn require_token(token: Option<&AccessToken>) -> Result<&AccessToken> {
    token.ok_or_else(|| Error::Auth("Not signed in".to_string()))
}

fn into_grant(response: ApiResponse) -> Result<AuthGrant> {
    let payload = serde_json::from_str::<AuthResponse>(&response.body)?;
    Ok(AuthGrant {
        access_token: AccessToken::new(payload.access_token),
        refresh_cookie: response.refresh_cookie.map(AccessToken::new),
    })
}

fn request_error(response: &ApiResponse) -> Error {
    Error::Request {
        status: response.status,
        message: parse_api_error(response.status, &response.body),
    }
}

/// Extract the `refreshToken` value from one `Set-Cookie` header.
pub fn parse_refresh_cookie(header: &str) -> Option<String> {
    let pair = header.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    (name.trim() == REFRESH_COOKIE_KEY).then(|| value.trim().to_string())
}

/// Longest slice of a non-JSON error body (proxy pages, stack traces) kept in
/// error text.
const MAX_ERROR_BODY_CHARS: usize = 180;

fn parse_api_error(status: u16, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status);
        }
    }

    let body = body.trim();
    if body.is_empty() {
        return format!("HTTP {status}");
    }
    let excerpt: String = body
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_ERROR_BODY_CHARS)
        .collect();
    format!("{excerpt} ({status})")
}
