use anyhow::Result;
use httpmock::prelude::*;
use pulsarctl_cli::cli::GlobalArgs;
use pulsarctl_cli::client::{CliDependencies, CliResult};
use pulsarctl_cli::commands::registry;
use pulsarctl_cli::run_with;
use serde_json::{Value, json};

struct Outcome {
    code: i32,
    stdout: String,
    stderr: String,
}

async fn run_against(server: &MockServer, args: &[&str]) -> Result<Outcome> {
    let base = server.base_url();
    let mut argv = vec![
        "pulsarctl",
        "--web-service-url",
        base.as_str(),
        "--bookie-service-url",
        base.as_str(),
    ];
    argv.extend_from_slice(args);

    let registry = registry();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run_with(
        &registry,
        argv,
        CliDependencies::from_env,
        &mut stdout,
        &mut stderr,
    )
    .await;

    Ok(Outcome {
        code,
        stdout: String::from_utf8(stdout)?,
        stderr: String::from_utf8(stderr)?,
    })
}

fn no_connect(_: &GlobalArgs, _: &str) -> CliResult<CliDependencies> {
    panic!("command must not build an administrative client")
}

#[tokio::test]
async fn isolation_policy_is_printed_as_json() -> Result<()> {
    let server = MockServer::start_async().await;
    let policy = json!({
        "namespaces": ["default"],
        "primary": ["aaa"],
        "secondary": [],
        "auto_failover_policy": {
            "policy_type": "min_available",
            "parameters": {"min_limit": "3", "usage_threshold": "100"}
        }
    });
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/admin/v2/clusters/standalone/namespaceIsolationPolicies/policy-1")
            .header_exists("x-request-id");
        then.status(200).json_body(policy.clone());
    });

    let outcome = run_against(
        &server,
        &["ns-isolation-policy", "get", "standalone", "policy-1"],
    )
    .await?;

    mock.assert();
    assert_eq!(outcome.code, 0);
    assert!(outcome.stderr.is_empty());
    let printed: Value = serde_json::from_str(&outcome.stdout)?;
    assert_eq!(printed, policy);
    Ok(())
}

#[tokio::test]
async fn missing_policy_reports_the_server_reason() -> Result<()> {
    let server = MockServer::start_async().await;
    let reason = "NamespaceIsolationPolicies for cluster standalone does not exist";
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/admin/v2/clusters/standalone/namespaceIsolationPolicies/missing");
        then.status(404).json_body(json!({ "reason": reason }));
    });

    let outcome = run_against(
        &server,
        &["ns-isolation-policy", "get", "standalone", "missing"],
    )
    .await?;

    mock.assert();
    assert_eq!(outcome.code, 3);
    assert!(outcome.stdout.is_empty());
    assert_eq!(outcome.stderr, format!("error: {reason}\n"));
    Ok(())
}

#[tokio::test]
async fn ledger_delete_hits_the_bookie_endpoint() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(DELETE)
            .path("/api/v1/ledger/delete/")
            .query_param("ledger_id", "7");
        then.status(200);
    });

    let outcome = run_against(&server, &["ledger", "delete", "7"]).await?;

    mock.assert();
    assert_eq!(outcome.code, 0);
    assert_eq!(outcome.stdout, "Deleted ledger 7\n");
    assert!(outcome.stderr.is_empty());
    Ok(())
}

#[tokio::test]
async fn invalid_ledger_ids_never_reach_the_server() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.path_includes("/api/v1/ledger");
        then.status(200);
    });

    for (args, expected) in [
        (
            &["ledger", "delete"][..],
            "error: the ledger id is not specified or the ledger id is specified more than one\n",
        ),
        (&["ledger", "delete", "a"][..], "error: invalid ledger id a\n"),
        (
            &["ledger", "delete", "--", "-1"][..],
            "error: invalid ledger id -1\n",
        ),
    ] {
        let outcome = run_against(&server, args).await?;
        assert_eq!(outcome.code, 2);
        assert!(outcome.stdout.is_empty());
        assert_eq!(outcome.stderr, expected);
    }

    mock.assert_calls(0);
    Ok(())
}

#[tokio::test]
async fn cluster_create_sends_camel_case_body() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/admin/v2/clusters/east")
            .json_body(json!({"serviceUrl": "http://east:8080"}));
        then.status(204);
    });

    let outcome = run_against(
        &server,
        &["cluster", "create", "east", "--url", "http://east:8080"],
    )
    .await?;

    mock.assert();
    assert_eq!(outcome.code, 0);
    assert_eq!(outcome.stdout, "Cluster east added\n");
    Ok(())
}

#[tokio::test]
async fn help_and_docs_do_not_connect() -> Result<()> {
    let registry = registry();

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run_with(
        &registry,
        ["pulsarctl", "ledger", "--help"],
        no_connect,
        &mut stdout,
        &mut stderr,
    )
    .await;
    assert_eq!(code, 0);
    assert!(stderr.is_empty());
    assert!(String::from_utf8(stdout)?.contains("delete"));

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run_with(
        &registry,
        ["pulsarctl", "docs", "ns-isolation-policy"],
        no_connect,
        &mut stdout,
        &mut stderr,
    )
    .await;
    assert_eq!(code, 0);
    assert!(stderr.is_empty());
    let docs = String::from_utf8(stdout)?;
    assert!(docs.starts_with("## pulsarctl ns-isolation-policy get"));
    assert!(docs.contains("REQUIRED PERMISSION:\n    This command requires super-user permissions."));
    Ok(())
}

#[tokio::test]
async fn unknown_commands_are_usage_errors() -> Result<()> {
    let registry = registry();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run_with(
        &registry,
        ["pulsarctl", "topic", "list"],
        no_connect,
        &mut stdout,
        &mut stderr,
    )
    .await;
    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert!(!stderr.is_empty());
    Ok(())
}
