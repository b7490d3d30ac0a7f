use std::process::Command;

const ENV_VARS: [&str; 5] = [
    "jira_username",
    "jira_password",
    "jira_instance_url",
    "issue_id_or_key_list",
    "transition_id",
];

fn command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_jira-transition"));
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_version() {
    let output = command()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("jira-transition"));
}

#[test]
fn test_cli_help() {
    let output = command()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("--dry-run"));
    assert!(stdout.contains("--output"));
}

#[test]
fn test_missing_environment_exits_with_configuration_code() {
    let output = command().output().expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("no Jira username specified"));
}

#[test]
fn test_invalid_url_exits_with_configuration_code() {
    let output = command()
        .env("jira_username", "ci-bot")
        .env("jira_password", "s3cret")
        .env("jira_instance_url", "jira.example.com")
        .env("issue_id_or_key_list", "PROJ-1")
        .env("transition_id", "31")
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("invalid Jira instance URL"));
    assert!(!stdout.contains("s3cret"));
    assert!(stdout.contains("*****"));
}

#[test]
fn test_unreachable_instance_exits_with_execution_code() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let output = command()
        .env("jira_username", "ci-bot")
        .env("jira_password", "s3cret")
        .env("jira_instance_url", format!("http://{addr}"))
        .env("issue_id_or_key_list", "PROJ-1|PROJ-2")
        .env("transition_id", "31")
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}
