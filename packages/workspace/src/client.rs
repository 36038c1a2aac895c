//! Persistence collaborator client.
//!
//! All requests are same-origin JSON, authenticated by an ambient CSRF
//! token header. The backend signals "not authenticated" by answering
//! with an HTML login page instead of JSON, so an HTML content type or an
//! HTML-prefixed body maps to [`ClientError::AuthRequired`] - callers
//! surface that as a hard redirect to login, distinct from ordinary save
//! failures.

use async_trait::async_trait;
use pagewright_model::{
    CssGenerateRequest, CssGenerateResponse, LoadResponse, PublishRequest, SaveNodeSettingsRequest,
    SavePageRequest, SaveResponse, SaveWidgetSettingsRequest,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The backend answered with a login page instead of JSON
    #[error("Not authenticated: session expired or logged out")]
    AuthRequired,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Narrow interface over the persistence backend (§ external collaborators)
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    async fn load_page(&self, page_id: &str) -> Result<LoadResponse, ClientError>;

    async fn save_page(&self, request: &SavePageRequest) -> Result<SaveResponse, ClientError>;

    async fn publish_page(&self, page_id: &str) -> Result<SaveResponse, ClientError>;

    async fn save_widget_settings(
        &self,
        page_id: &str,
        widget_id: &str,
        request: &SaveWidgetSettingsRequest,
    ) -> Result<SaveResponse, ClientError>;

    async fn save_section_settings(
        &self,
        page_id: &str,
        section_id: &str,
        request: &SaveNodeSettingsRequest,
    ) -> Result<SaveResponse, ClientError>;

    async fn save_column_settings(
        &self,
        page_id: &str,
        column_id: &str,
        request: &SaveNodeSettingsRequest,
    ) -> Result<SaveResponse, ClientError>;

    async fn generate_css(
        &self,
        request: &CssGenerateRequest,
    ) -> Result<CssGenerateResponse, ClientError>;

    async fn generate_css_bulk(
        &self,
        requests: &[CssGenerateRequest],
    ) -> Result<Vec<CssGenerateResponse>, ClientError>;
}

/// reqwest-backed implementation
pub struct HttpPersistenceClient {
    http: reqwest::Client,
    base_url: String,
    csrf_token: String,
}

impl HttpPersistenceClient {
    pub fn new(base_url: impl Into<String>, csrf_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            csrf_token: csrf_token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        debug!(path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .header("X-CSRF-Token", &self.csrf_token)
            .header("Accept", "application/json")
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ClientError> {
        debug!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .header("X-CSRF-Token", &self.csrf_token)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("text/html"))
            .unwrap_or(false);

        let text = response.text().await?;

        // Auth heuristic: HTML where JSON was expected means the session
        // bounced to the login page
        if is_html || text.trim_start().starts_with('<') {
            return Err(ClientError::AuthRequired);
        }

        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
                message: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl PersistenceClient for HttpPersistenceClient {
    async fn load_page(&self, page_id: &str) -> Result<LoadResponse, ClientError> {
        self.get_json(&format!("/content/{}", page_id)).await
    }

    async fn save_page(&self, request: &SavePageRequest) -> Result<SaveResponse, ClientError> {
        self.post_json("/save", request).await
    }

    async fn publish_page(&self, page_id: &str) -> Result<SaveResponse, ClientError> {
        let request = PublishRequest {
            page_id: page_id.to_string(),
        };
        self.post_json("/publish", &request).await
    }

    async fn save_widget_settings(
        &self,
        page_id: &str,
        widget_id: &str,
        request: &SaveWidgetSettingsRequest,
    ) -> Result<SaveResponse, ClientError> {
        self.post_json(
            &format!("/widgets/{}/{}/save-all-settings", page_id, widget_id),
            request,
        )
        .await
    }

    async fn save_section_settings(
        &self,
        page_id: &str,
        section_id: &str,
        request: &SaveNodeSettingsRequest,
    ) -> Result<SaveResponse, ClientError> {
        self.post_json(
            &format!("/sections/{}/{}/save-all-settings", page_id, section_id),
            request,
        )
        .await
    }

    async fn save_column_settings(
        &self,
        page_id: &str,
        column_id: &str,
        request: &SaveNodeSettingsRequest,
    ) -> Result<SaveResponse, ClientError> {
        self.post_json(
            &format!("/columns/{}/{}/save-all-settings", page_id, column_id),
            request,
        )
        .await
    }

    async fn generate_css(
        &self,
        request: &CssGenerateRequest,
    ) -> Result<CssGenerateResponse, ClientError> {
        self.post_json("/css/generate", request).await
    }

    async fn generate_css_bulk(
        &self,
        requests: &[CssGenerateRequest],
    ) -> Result<Vec<CssGenerateResponse>, ClientError> {
        self.post_json("/css/generate-bulk", &requests).await
    }
}
