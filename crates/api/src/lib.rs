pub mod error;
pub mod request;

use error::{ApiError, Result};
use jira_transition_config::Config;
use reqwest::{Client, Request, StatusCode};
use tracing::{debug, info, warn};

pub use request::{build_request_body, transition_url};

/// Response header Jira sets when it refuses a login and wants a CAPTCHA.
pub const LOGIN_REASON_HEADER: &str = "X-Seraph-LoginReason";
pub const AUTHENTICATION_DENIED: &str = "AUTHENTICATION_DENIED";

/// HTTP client for the issue transitions endpoint. One instance is reused for
/// every issue in a run.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("jira-transition/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self { client })
    }

    /// Send a prepared transition request. Only `204 No Content` counts as
    /// success; every other status is classified into an [`ApiError`].
    pub async fn execute(&self, request: Request) -> Result<()> {
        debug!(method = %request.method(), url = %request.url(), "Sending request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(());
        }

        warn!(%status, "Jira API response status");

        let authentication_denied = response
            .headers()
            .get(LOGIN_REASON_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|reason| reason == AUTHENTICATION_DENIED);

        let body = response
            .text()
            .await
            .map_err(|source| ApiError::ResponseRead {
                status: status.as_u16(),
                source,
            })?;

        if authentication_denied {
            warn!("CAPTCHA triggered");
            return Err(ApiError::AuthenticationDenied {
                status: status.as_u16(),
            });
        }

        warn!(body = %body, "Jira API response");
        Err(ApiError::ApiFailure {
            status: status.as_u16(),
            body,
        })
    }

    /// Build and send the transition request for a single issue.
    pub async fn transition_issue(&self, config: &Config, issue: &str, body: &[u8]) -> Result<()> {
        info!(%issue, "Triggering transition for issue");

        let request = self.build_request(config, issue, body)?;
        self.execute(request).await?;

        info!(%issue, "Issue updated successfully");
        Ok(())
    }
}
