use std::fmt;

use jira_transition_auth::SECRET_MASK;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const USERNAME_VAR: &str = "jira_username";
pub const PASSWORD_VAR: &str = "jira_password";
pub const INSTANCE_URL_VAR: &str = "jira_instance_url";
pub const ISSUE_LIST_VAR: &str = "issue_id_or_key_list";
pub const TRANSITION_ID_VAR: &str = "transition_id";

/// Separator between entries of `issue_id_or_key_list`.
pub const ISSUE_DELIMITER: char = '|';

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no Jira username specified (jira_username)")]
    MissingUsername,

    #[error("no Jira password specified (jira_password)")]
    MissingPassword,

    #[error("invalid Jira instance URL '{url}' (jira_instance_url): {source}")]
    InvalidInstanceUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("no Jira issue IDs or keys specified (issue_id_or_key_list)")]
    NoIssues,

    #[error("empty Jira issue ID or key at index {index} (issue_id_or_key_list)")]
    EmptyIssue { index: usize },

    #[error("no transition ID specified (transition_id)")]
    MissingTransitionId,
}

impl ConfigError {
    /// Name of the environment variable the failing check looked at.
    pub fn field(&self) -> &'static str {
        match self {
            ConfigError::MissingUsername => USERNAME_VAR,
            ConfigError::MissingPassword => PASSWORD_VAR,
            ConfigError::InvalidInstanceUrl { .. } => INSTANCE_URL_VAR,
            ConfigError::NoIssues | ConfigError::EmptyIssue { .. } => ISSUE_LIST_VAR,
            ConfigError::MissingTransitionId => TRANSITION_ID_VAR,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Everything one run needs, read once from the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub username: String,
    pub password: String,
    pub instance_url: String,
    pub issue_keys: Vec<String>,
    pub transition_id: String,
}

impl Config {
    /// Build a configuration from an arbitrary key lookup. Missing keys are
    /// treated as empty strings; nothing is validated here.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();

        let config = Self {
            username: get(USERNAME_VAR),
            password: get(PASSWORD_VAR),
            instance_url: get(INSTANCE_URL_VAR),
            issue_keys: split_issue_list(&get(ISSUE_LIST_VAR)),
            transition_id: get(TRANSITION_ID_VAR),
        };
        debug!(issues = config.issue_keys.len(), "Loaded configuration");
        config
    }

    /// Build a configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Run every check in order and stop at the first one that fails.
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(ConfigError::MissingUsername);
        }
        if self.password.is_empty() {
            return Err(ConfigError::MissingPassword);
        }
        Url::parse(&self.instance_url).map_err(|source| ConfigError::InvalidInstanceUrl {
            url: self.instance_url.clone(),
            source,
        })?;
        if self.issue_keys.is_empty() {
            return Err(ConfigError::NoIssues);
        }
        if let Some(index) = self.issue_keys.iter().position(|key| key.is_empty()) {
            return Err(ConfigError::EmptyIssue { index });
        }
        if self.transition_id.is_empty() {
            return Err(ConfigError::MissingTransitionId);
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &SECRET_MASK)
            .field("instance_url", &self.instance_url)
            .field("issue_keys", &self.issue_keys)
            .field("transition_id", &self.transition_id)
            .finish()
    }
}

/// Split a `|`-delimited list and trim each entry. An empty input yields a
/// single empty entry so that the validator can reject it.
pub fn split_issue_list(raw: &str) -> Vec<String> {
    raw.split(ISSUE_DELIMITER)
        .map(|entry| entry.trim().to_string())
        .collect()
}
