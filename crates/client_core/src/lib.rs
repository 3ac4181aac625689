use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    domain::Position,
    protocol::{RegistrationResponse, TokenResponse, UsersPage},
};
use tracing::{debug, error, info, warn};
use url::Url;

pub mod error;
pub mod form;
pub mod page;
pub mod tooltip;
pub mod types;
pub mod user_list;
pub mod validation;

pub use error::{FormError, RegistrationError};
pub use form::{FormController, SubmissionState, SubmitOutcome};
pub use page::RegistrationPage;
pub use tooltip::TooltipState;
pub use types::{FieldValue, FormField, FormValues, PhotoFile};
pub use user_list::{merge_users, LoadOutcome, PageRequest, UserListController};
pub use validation::FieldErrors;

pub const DEFAULT_API_BASE_URL: &str = "https://frontend-test-assignment-api.abz.agency/api/v1";
pub const DEFAULT_PAGE_SIZE: u32 = 6;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const TOKEN_HEADER: &str = "Token";

const FALLBACK_PHOTO_MIME: &str = "image/jpeg";

/// Remote user registry. Implementations report protocol-level failures in the
/// returned body (`success: false`) and reserve `Err` for transport faults.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    async fn request_token(&self) -> Result<TokenResponse>;
    async fn register_user(
        &self,
        token: &str,
        payload: RegistrationPayload,
    ) -> Result<RegistrationResponse>;
    async fn fetch_users(&self, page: u32, count: u32) -> Result<UsersPage>;
}

/// Trimmed, validated registration fields ready to be sent as multipart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position: Position,
    pub photo: PhotoFile,
}

impl RegistrationPayload {
    /// Returns `None` when the position or photo is missing; callers validate first.
    pub fn from_values(values: &FormValues) -> Option<Self> {
        let position = values.position.parse::<Position>().ok()?;
        let photo = values.photo.clone()?;
        Some(Self {
            name: values.name.trim().to_string(),
            email: values.email.trim().to_string(),
            phone: values.phone.trim().to_string(),
            position,
            photo,
        })
    }

    fn into_multipart(self) -> Result<Form> {
        let mime = self
            .photo
            .mime_type
            .clone()
            .unwrap_or_else(|| FALLBACK_PHOTO_MIME.to_string());
        let photo = Part::bytes(self.photo.bytes)
            .file_name(self.photo.filename)
            .mime_str(&mime)
            .with_context(|| format!("invalid photo mime type '{mime}'"))?;
        Ok(Form::new()
            .text("name", self.name)
            .text("email", self.email)
            .text("phone", self.phone)
            .text("position_id", self.position.id().to_string())
            .part("photo", photo))
    }
}

/// Runs the token-then-submit protocol once. No retries.
pub async fn register(
    api: &dyn RegistryApi,
    payload: RegistrationPayload,
) -> std::result::Result<RegistrationResponse, RegistrationError> {
    let token = api
        .request_token()
        .await
        .map_err(RegistrationError::Transport)?;
    let token = match token {
        TokenResponse {
            success: true,
            token: Some(token),
            ..
        } if !token.is_empty() => token,
        other => {
            warn!(message = ?other.message, "token endpoint refused to issue a token");
            return Err(RegistrationError::TokenUnavailable);
        }
    };

    let response = api
        .register_user(&token, payload)
        .await
        .map_err(RegistrationError::Transport)?;
    if !response.success {
        warn!(message = ?response.message, "registration rejected by server");
        return Err(RegistrationError::Rejected {
            message: response.message.filter(|message| !message.trim().is_empty()),
        });
    }

    info!(user_id = ?response.user_id, "user registered");
    Ok(response)
}

pub struct HttpRegistryClient {
    http: Client,
    base_url: String,
}

impl HttpRegistryClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed =
            Url::parse(base_url).with_context(|| format!("invalid API base url '{base_url}'"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow!(
                "unsupported API base url scheme '{}'",
                parsed.scheme()
            ));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RegistryApi for HttpRegistryClient {
    async fn request_token(&self) -> Result<TokenResponse> {
        let url = format!("{}/token", self.base_url);
        debug!(%url, "requesting upload token");
        let response: TokenResponse = self
            .http
            .post(&url)
            .send()
            .await
            .context("token request failed")?
            .json()
            .await
            .context("token response is not valid json")?;
        Ok(response)
    }

    async fn register_user(
        &self,
        token: &str,
        payload: RegistrationPayload,
    ) -> Result<RegistrationResponse> {
        let url = format!("{}/users", self.base_url);
        let form = payload.into_multipart()?;
        // Non-2xx statuses still carry a `{success, message}` body, so the
        // status code is not turned into an error here.
        let response = self
            .http
            .post(&url)
            .header(TOKEN_HEADER, token)
            .multipart(form)
            .send()
            .await
            .context("registration request failed")?;
        let status = response.status();
        let body: RegistrationResponse = response.json().await.map_err(|err| {
            error!(%status, "registration response is not valid json: {err}");
            anyhow!("registration response is not valid json (status {status}): {err}")
        })?;
        Ok(body)
    }

    async fn fetch_users(&self, page: u32, count: u32) -> Result<UsersPage> {
        let url = format!("{}/users", self.base_url);
        let response: UsersPage = self
            .http
            .get(&url)
            .query(&[("page", page), ("count", count)])
            .send()
            .await
            .with_context(|| format!("users request for page {page} failed"))?
            .json()
            .await
            .with_context(|| format!("users page {page} is not valid json"))?;
        Ok(response)
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
