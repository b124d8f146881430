//! HTTP client for the registration API.
//!
//! Every call goes through [`ApiClient::send`], which joins path segments onto
//! the configured base URL, decodes the JSON body and folds all failures into
//! a single [`ApiError`] shape.

use std::fmt;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;

use crate::config::Config;
use crate::models::{Rating, Registration, Workshop, null_as_default};
use crate::rating::NewRating;

/// Message used whenever the server gave us nothing better.
pub const GENERIC_FAILURE: &str = "Request failed";

/// Categories of API failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Connection refused, DNS failure, TLS error, ...
    Transport,
    /// Success status but the body was not the JSON we expected.
    Parse,
    /// Non-success status reported by the server.
    Server,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::Parse => write!(f, "parse"),
            ApiErrorKind::Server => write!(f, "server"),
        }
    }
}

/// Single error shape surfaced by every API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status for server-reported failures.
    pub status: Option<u16>,
    /// One-line message suitable for display.
    pub message: String,
}

impl ApiError {
    pub fn transport() -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            status: None,
            message: GENERIC_FAILURE.to_string(),
        }
    }

    pub fn parse() -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            status: None,
            message: GENERIC_FAILURE.to_string(),
        }
    }

    /// Server-reported failure. Uses the body's `error` field when present.
    pub fn server(status: u16, body_error: Option<String>) -> Self {
        Self {
            kind: ApiErrorKind::Server,
            status: Some(status),
            message: body_error.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        }
    }

    /// Failure reported inside a success response (e.g. `success: false`).
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Server,
            status: None,
            message: message.into(),
        }
    }

    /// The message, or `fallback` when the server sent an empty one.
    pub fn message_or(&self, fallback: &str) -> String {
        let trimmed = self.message.trim();
        if trimmed.is_empty() {
            fallback.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// User record returned by `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub ticket_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub admin_workshops: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default)]
    pub user: Option<LoginUser>,
}

#[derive(Debug, Deserialize)]
struct WorkshopsEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    workshops: Vec<Workshop>,
}

#[derive(Debug, Deserialize)]
struct RegistrationsEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    registrations: Vec<Registration>,
}

#[derive(Debug, Deserialize)]
struct RatingsEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    ratings: Vec<Rating>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RatingSubmission<'a> {
    ticket_id: &'a str,
    workshop_id: &'a str,
    #[serde(flatten)]
    rating: &'a NewRating,
}

/// Thin request wrapper bound to one base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client for `base_url` (any stage path is preserved).
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|err| anyhow::anyhow!("Invalid API base URL '{base_url}': {err}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid API base URL '{base_url}': not a base URL");
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    /// Creates a client from the effective configured base URL.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(&config.effective_api_base_url()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /workshops`
    pub async fn workshops(&self) -> ApiResult<Vec<Workshop>> {
        let envelope: WorkshopsEnvelope =
            self.send(Method::GET, &["workshops"], None, None).await?;
        Ok(envelope.workshops)
    }

    /// `POST /auth/login`
    pub async fn login(&self, ticket_id: &str) -> ApiResult<LoginResponse> {
        let body = json!({ "ticketId": ticket_id });
        self.send(Method::POST, &["auth", "login"], Some(&body), None)
            .await
    }

    /// `POST /registrations`
    pub async fn register(&self, ticket_id: &str, workshop_id: &str) -> ApiResult<()> {
        let body = json!({ "ticketId": ticket_id, "workshopId": workshop_id });
        let _: Value = self
            .send(Method::POST, &["registrations"], Some(&body), None)
            .await?;
        Ok(())
    }

    /// `GET /registrations/{ticketId}`
    pub async fn registrations(&self, ticket_id: &str) -> ApiResult<Vec<Registration>> {
        let envelope: RegistrationsEnvelope = self
            .send(Method::GET, &["registrations", ticket_id], None, None)
            .await?;
        Ok(envelope.registrations)
    }

    /// `DELETE /registrations/{ticketId}/{workshopId}`
    pub async fn withdraw(&self, ticket_id: &str, workshop_id: &str) -> ApiResult<()> {
        let _: Value = self
            .send(
                Method::DELETE,
                &["registrations", ticket_id, workshop_id],
                None,
                None,
            )
            .await?;
        Ok(())
    }

    /// `GET /ratings/{ticketId}`
    pub async fn ratings(&self, ticket_id: &str) -> ApiResult<Vec<Rating>> {
        let envelope: RatingsEnvelope = self
            .send(Method::GET, &["ratings", ticket_id], None, None)
            .await?;
        Ok(envelope.ratings)
    }

    /// `POST /ratings`
    pub async fn submit_rating(
        &self,
        ticket_id: &str,
        workshop_id: &str,
        rating: &NewRating,
    ) -> ApiResult<()> {
        let submission = RatingSubmission {
            ticket_id,
            workshop_id,
            rating,
        };
        let body = serde_json::to_value(&submission).map_err(|_| ApiError::parse())?;
        let _: Value = self
            .send(Method::POST, &["ratings"], Some(&body), None)
            .await?;
        Ok(())
    }

    /// `GET /admin/registrations` (bearer = admin ticket id)
    pub async fn admin_registrations(&self, admin_ticket: &str) -> ApiResult<Vec<Registration>> {
        let envelope: RegistrationsEnvelope = self
            .send(
                Method::GET,
                &["admin", "registrations"],
                None,
                Some(admin_ticket),
            )
            .await?;
        Ok(envelope.registrations)
    }

    /// `GET /admin/ratings/{workshopId}` (bearer = admin ticket id)
    pub async fn admin_workshop_ratings(
        &self,
        admin_ticket: &str,
        workshop_id: &str,
    ) -> ApiResult<Vec<Rating>> {
        let envelope: RatingsEnvelope = self
            .send(
                Method::GET,
                &["admin", "ratings", workshop_id],
                None,
                Some(admin_ticket),
            )
            .await?;
        Ok(envelope.ratings)
    }

    /// `DELETE /admin/registrations/{ticketId}/{workshopId}` (bearer = admin ticket id)
    pub async fn admin_withdraw(
        &self,
        admin_ticket: &str,
        ticket_id: &str,
        workshop_id: &str,
    ) -> ApiResult<()> {
        let _: Value = self
            .send(
                Method::DELETE,
                &["admin", "registrations", ticket_id, workshop_id],
                None,
                Some(admin_ticket),
            )
            .await?;
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::transport())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&Value>,
        bearer: Option<&str>,
    ) -> ApiResult<T> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, path = url.path(), "api request");

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = bearer {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = request.send().await.map_err(|err| {
            tracing::warn!(%method, path = url.path(), error = %err, "api transport failure");
            ApiError::transport()
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|err| {
            tracing::warn!(%method, path = url.path(), error = %err, "api body read failure");
            ApiError::transport()
        })?;

        if !status.is_success() {
            let body_error = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.error);
            let error = ApiError::server(status.as_u16(), body_error);
            tracing::warn!(
                %method,
                path = url.path(),
                status = status.as_u16(),
                message = %error.message,
                "api request rejected"
            );
            return Err(error);
        }

        serde_json::from_str(&text).map_err(|err| {
            tracing::warn!(%method, path = url.path(), error = %err, "api response parse failure");
            ApiError::parse()
        })
    }
}
