use jira_transition_config::Config;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Request;
use serde::Serialize;
use url::Url;

use crate::error::{ApiError, Result};
use crate::ApiClient;

#[derive(Serialize)]
struct TransitionPayload<'a> {
    transition: TransitionRef<'a>,
}

#[derive(Serialize)]
struct TransitionRef<'a> {
    id: &'a str,
}

/// Serialize `{"transition":{"id":"<transition_id>"}}`.
pub fn build_request_body(config: &Config) -> Result<Vec<u8>> {
    let payload = TransitionPayload {
        transition: TransitionRef {
            id: &config.transition_id,
        },
    };
    Ok(serde_json::to_vec(&payload)?)
}

/// `<instance_url>/rest/api/2/issue/<issue>/transitions`, with the issue
/// appended as one encoded path segment.
pub fn transition_url(instance_url: &str, issue: &str) -> Result<Url> {
    let construction = |reason: String| ApiError::RequestConstruction {
        issue: issue.to_string(),
        reason,
    };

    let mut url = Url::parse(instance_url).map_err(|e| construction(e.to_string()))?;
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| construction(format!("'{instance_url}' cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(["rest", "api", "2", "issue", issue, "transitions"]);

    Ok(url)
}

impl ApiClient {
    /// Build the authenticated POST that triggers the transition on one issue.
    pub fn build_request(&self, config: &Config, issue: &str, body: &[u8]) -> Result<Request> {
        let url = transition_url(&config.instance_url, issue)?;

        self.client
            .post(url)
            .basic_auth(&config.username, Some(&config.password))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body.to_vec())
            .build()
            .map_err(|e| ApiError::RequestConstruction {
                issue: issue.to_string(),
                reason: e.to_string(),
            })
    }
}
