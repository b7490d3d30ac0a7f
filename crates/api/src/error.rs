use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Could not build request for issue {issue}: {reason}")]
    RequestConstruction { issue: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Could not read Jira API response (status {status}): {source}")]
    ResponseRead {
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    #[error("Authentication denied (status {status}): Jira requires a CAPTCHA login")]
    AuthenticationDenied { status: u16 },

    #[error("Jira API request failed: {status} - {body}")]
    ApiFailure { status: u16, body: String },
}

impl ApiError {
    /// HTTP status of the response that caused the error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ResponseRead { status, .. }
            | ApiError::AuthenticationDenied { status }
            | ApiError::ApiFailure { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ApiError::AuthenticationDenied { .. } => Some(
                "Log in to Jira through the browser to clear the CAPTCHA, then rerun with the same credentials",
            ),
            ApiError::ApiFailure { status: 401, .. } => {
                Some("Verify jira_username and jira_password")
            }
            ApiError::ApiFailure { status: 404, .. } => {
                Some("Check that the issue exists and the user can see it")
            }
            ApiError::ApiFailure { status: 400, .. } => {
                Some("Check that the transition is valid for the issue's current status")
            }
            ApiError::Transport(_) => Some("Check jira_instance_url and your network connection"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_exposed() {
        let err = ApiError::ApiFailure {
            status: 400,
            body: "{}".to_string(),
        };
        assert_eq!(err.status(), Some(400));
        assert_eq!(ApiError::AuthenticationDenied { status: 403 }.status(), Some(403));

        let err = ApiError::RequestConstruction {
            issue: "PROJ-1".to_string(),
            reason: "bad".to_string(),
        };
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_api_failure_message_includes_body() {
        let err = ApiError::ApiFailure {
            status: 400,
            body: r#"{"errorMessages":["nope"]}"#.to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("400"));
        assert!(message.contains("nope"));
    }

    #[test]
    fn test_suggestions() {
        assert!(ApiError::AuthenticationDenied { status: 403 }
            .suggestion()
            .is_some());
        let err = ApiError::ApiFailure {
            status: 500,
            body: String::new(),
        };
        assert!(err.suggestion().is_none());
    }
}
