use jira_transition_api::error::ApiError;
use jira_transition_api::{build_request_body, ApiClient};
use jira_transition_config::{Config, ConfigError};
use jira_transition_output::{IssueOutcome, Outcome, OutputRenderer};
use jira_transition_runner::SequentialExecutor;
use thiserror::Error;
use tracing::info;

use crate::{EXIT_CONFIGURATION, EXIT_EXECUTION};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loaded,
    Validated,
    BodyBuilt,
    Iterating,
    Done,
    Failed,
}

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Issue with input: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Could not build request body: {0}")]
    Body(#[source] ApiError),

    #[error("Could not create HTTP client: {0}")]
    Client(#[source] ApiError),

    #[error("Could not update issue {issue}: {source}")]
    Transition {
        issue: String,
        index: usize,
        #[source]
        source: ApiError,
    },
}

impl DriverError {
    pub fn exit_code(&self) -> u8 {
        match self {
            DriverError::Configuration(_) => EXIT_CONFIGURATION,
            _ => EXIT_EXECUTION,
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            DriverError::Configuration(err) => Some(match err {
                ConfigError::InvalidInstanceUrl { .. } => {
                    "Set jira_instance_url to an absolute URL, e.g. https://example.atlassian.net"
                }
                ConfigError::NoIssues | ConfigError::EmptyIssue { .. } => {
                    "Separate issue keys with '|' and leave no entry empty"
                }
                _ => "Set every required environment variable before running the step",
            }),
            DriverError::Body(source)
            | DriverError::Client(source)
            | DriverError::Transition { source, .. } => source.suggestion(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub show_progress: bool,
}

/// Drives one run: validate, build the body, then transition each issue in
/// order until one fails.
pub struct Driver<'a> {
    config: Config,
    options: RunOptions,
    renderer: &'a OutputRenderer,
    stage: Stage,
    outcomes: Vec<IssueOutcome>,
}

impl<'a> Driver<'a> {
    pub fn new(config: Config, options: RunOptions, renderer: &'a OutputRenderer) -> Self {
        Self {
            config,
            options,
            renderer,
            stage: Stage::Loaded,
            outcomes: Vec::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Per-issue outcomes; empty until validation and body building pass.
    pub fn outcomes(&self) -> &[IssueOutcome] {
        &self.outcomes
    }

    pub async fn run(&mut self) -> Result<(), DriverError> {
        let result = self.advance().await;
        self.stage = if result.is_ok() {
            Stage::Done
        } else {
            Stage::Failed
        };
        result
    }

    async fn advance(&mut self) -> Result<(), DriverError> {
        self.renderer.render_config_summary(&self.config);

        self.config.validate()?;
        self.stage = Stage::Validated;

        let body = build_request_body(&self.config).map_err(DriverError::Body)?;
        self.stage = Stage::BodyBuilt;

        self.outcomes = self
            .config
            .issue_keys
            .iter()
            .map(|issue| IssueOutcome::new(issue.as_str(), Outcome::NotAttempted))
            .collect();
        self.stage = Stage::Iterating;

        let client = ApiClient::new().map_err(DriverError::Client)?;
        if self.options.dry_run {
            return self.plan(&client, &body);
        }

        let executor = SequentialExecutor::new().with_progress(self.options.show_progress);

        let config = &self.config;
        let renderer = self.renderer;
        let client = &client;
        let body = body.as_slice();

        let result = executor
            .run(config.issue_keys.clone(), move |_, issue| async move {
                client.transition_issue(config, &issue, body).await?;
                renderer.render_issue_transitioned(&issue);
                Ok::<(), ApiError>(())
            })
            .await;

        match result {
            Ok(summary) => {
                self.mark_transitioned(summary.completed);
                info!(total = summary.total, "All issues transitioned");
                Ok(())
            }
            Err(failure) => {
                self.mark_transitioned(failure.completed);
                self.outcomes[failure.index].outcome = Outcome::Failed;

                let issue = self.config.issue_keys[failure.index].clone();
                self.renderer.render_issue_failed(&issue, &failure.source);
                Err(DriverError::Transition {
                    issue,
                    index: failure.index,
                    source: failure.source,
                })
            }
        }
    }

    /// Dry run: build every request so construction errors still surface,
    /// but send nothing.
    fn plan(&mut self, client: &ApiClient, body: &[u8]) -> Result<(), DriverError> {
        for (index, issue) in self.config.issue_keys.iter().enumerate() {
            let request = client
                .build_request(&self.config, issue, body)
                .map_err(|source| DriverError::Transition {
                    issue: issue.clone(),
                    index,
                    source,
                })?;
            info!(%issue, url = %request.url(), "Dry run: request not sent");
            self.renderer
                .render_issue_planned(issue, request.url().as_str());
            self.outcomes[index].outcome = Outcome::Planned;
        }
        Ok(())
    }

    fn mark_transitioned(&mut self, completed: usize) {
        for outcome in self.outcomes.iter_mut().take(completed) {
            outcome.outcome = Outcome::Transitioned;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jira_transition_output::OutputFormat;

    fn config(issue_list: &str) -> Config {
        Config {
            username: "ci-bot".to_string(),
            password: "s3cret".to_string(),
            instance_url: "https://jira.example.com".to_string(),
            issue_keys: jira_transition_config::split_issue_list(issue_list),
            transition_id: "31".to_string(),
        }
    }

    #[test]
    fn test_exit_codes() {
        let err = DriverError::Configuration(ConfigError::MissingUsername);
        assert_eq!(err.exit_code(), EXIT_CONFIGURATION);

        let err = DriverError::Transition {
            issue: "PROJ-1".to_string(),
            index: 0,
            source: ApiError::AuthenticationDenied { status: 403 },
        };
        assert_eq!(err.exit_code(), EXIT_EXECUTION);
        assert!(err.to_string().contains("PROJ-1"));
    }

    #[test]
    fn test_configuration_suggestion_by_field() {
        let err = DriverError::Configuration(ConfigError::EmptyIssue { index: 0 });
        assert!(err.suggestion().unwrap().contains('|'));

        let err = DriverError::Configuration(ConfigError::NoIssues);
        assert!(err.suggestion().unwrap().contains('|'));

        let err = DriverError::Configuration(ConfigError::InvalidInstanceUrl {
            url: "jira".to_string(),
            source: url::ParseError::RelativeUrlWithoutBase,
        });
        assert!(err.suggestion().unwrap().contains("absolute URL"));

        let err = DriverError::Configuration(ConfigError::MissingTransitionId);
        assert!(err
            .suggestion()
            .unwrap()
            .contains("every required environment variable"));
    }

    #[tokio::test]
    async fn test_invalid_config_stops_before_body() {
        let renderer = OutputRenderer::new(OutputFormat::Quiet);
        let mut driver = Driver::new(config(""), RunOptions::default(), &renderer);

        let err = driver.run().await.unwrap_err();
        assert!(matches!(
            err,
            DriverError::Configuration(ConfigError::EmptyIssue { index: 0 })
        ));
        assert_eq!(driver.stage(), Stage::Failed);
        assert!(driver.outcomes().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_plans_every_issue() {
        let renderer = OutputRenderer::new(OutputFormat::Quiet);
        let options = RunOptions {
            dry_run: true,
            show_progress: false,
        };
        let mut driver = Driver::new(config("PROJ-1|PROJ-2"), options, &renderer);

        driver.run().await.unwrap();
        assert_eq!(driver.stage(), Stage::Done);
        assert_eq!(
            driver.outcomes(),
            &[
                IssueOutcome::new("PROJ-1", Outcome::Planned),
                IssueOutcome::new("PROJ-2", Outcome::Planned),
            ]
        );
    }
}
