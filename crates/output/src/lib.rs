use std::io::{self, Write};

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use jira_transition_auth::mask_secret;
use jira_transition_config::Config;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
    Quiet,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Transitioned,
    Failed,
    NotAttempted,
    Planned,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Transitioned => "transitioned",
            Outcome::Failed => "failed",
            Outcome::NotAttempted => "not_attempted",
            Outcome::Planned => "planned",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IssueOutcome {
    pub issue: String,
    pub outcome: Outcome,
}

impl IssueOutcome {
    pub fn new(issue: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            issue: issue.into(),
            outcome,
        }
    }
}

pub struct OutputRenderer {
    format: OutputFormat,
}

impl OutputRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Print the configuration with the password masked. Shown in every
    /// output format.
    pub fn render_config_summary(&self, config: &Config) {
        let stdout = io::stdout();
        let _ = self.write_config_summary(&mut stdout.lock(), config);
    }

    pub fn write_config_summary<W: Write>(&self, out: &mut W, config: &Config) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", "Configs:".bold())?;
        for line in config_summary_lines(config) {
            writeln!(out, "{line}")?;
        }
        writeln!(out)
    }

    pub fn render_issue_transitioned(&self, issue: &str) {
        if self.format != OutputFormat::Quiet {
            println!("{} Issue {} transitioned", "✅".green(), issue.bold());
        }
    }

    pub fn render_issue_failed(&self, issue: &str, error: &dyn std::fmt::Display) {
        eprintln!("{} Issue {} failed: {}", "❌".red(), issue.bold(), error);
    }

    pub fn render_issue_planned(&self, issue: &str, url: &str) {
        if self.format != OutputFormat::Quiet {
            println!("{} Would POST {} ({})", "🔍".yellow(), url, issue);
        }
    }

    /// Final per-issue report in the selected format.
    pub fn render_outcomes(&self, outcomes: &[IssueOutcome]) -> Result<()> {
        match self.format {
            OutputFormat::Table => {
                if !outcomes.is_empty() {
                    println!("{}", outcomes_table(outcomes));
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(outcomes)?);
            }
            OutputFormat::Yaml => {
                print!("{}", serde_yaml::to_string(outcomes)?);
            }
            OutputFormat::Quiet => {
                for key in quiet_lines(outcomes) {
                    println!("{key}");
                }
            }
        }
        Ok(())
    }
}

fn config_summary_lines(config: &Config) -> Vec<String> {
    vec![
        format!(" - JiraUsername: {}", config.username),
        format!(" - JiraPassword (hidden): {}", mask_secret(&config.password)),
        format!(" - JiraInstanceURL: {}", config.instance_url),
        format!(" - IssueIdOrKeyList: {:?}", config.issue_keys),
        format!(" - TransitionId: {}", config.transition_id),
    ]
}

fn outcomes_table(outcomes: &[IssueOutcome]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["issue", "outcome"]);
    for row in outcomes {
        builder.push_record([row.issue.as_str(), row.outcome.as_str()]);
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Only issues that were actually transitioned, one key per line.
fn quiet_lines(outcomes: &[IssueOutcome]) -> Vec<&str> {
    outcomes
        .iter()
        .filter(|o| o.outcome == Outcome::Transitioned)
        .map(|o| o.issue.as_str())
        .collect()
}
