use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use colored::Colorize;
use obl_gate::AttributeMap;
use obl_issuance::{ContractError, Executed, Executor, Response, Router};
use obl_server::{OblServer, ServerConfig};
use obl_store::InMemoryLedger;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Command::Serve(args) = &cli.command {
        cmd_serve(args, &cli.state)?;
        return Ok(ExitCode::SUCCESS);
    }
    let Some((function, args)) = cli.command.invocation() else {
        return Ok(ExitCode::SUCCESS);
    };

    let caller = caller_attributes(&cli);
    match execute(&cli.state, &caller, &function, &args) {
        Ok(executed) => {
            print_success(&cli.format, &function, &executed);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report_failure(&cli.format, err),
    }
}

/// In JSON mode the error payload on stdout is the only rendering and the
/// exit status carries the failure. Text mode leaves reporting to `main`.
fn report_failure(format: &OutputFormat, err: ContractError) -> anyhow::Result<ExitCode> {
    match format {
        OutputFormat::Json => {
            println!("{}", err.to_payload().to_json());
            Ok(ExitCode::FAILURE)
        }
        OutputFormat::Text => Err(err.into()),
    }
}

/// Caller attributes from `--role` / `--email`, under the default names.
pub fn caller_attributes(cli: &Cli) -> AttributeMap {
    let mut attrs = AttributeMap::new();
    if let Some(role) = &cli.role {
        attrs.insert("role", role);
    }
    if let Some(email) = &cli.email {
        attrs.insert("email", email);
    }
    attrs
}

/// Run one invocation against the snapshot at `state`, saving it if the
/// invocation wrote anything.
pub fn execute(
    state: &Path,
    caller: &AttributeMap,
    function: &str,
    args: &[String],
) -> Result<Executed, ContractError> {
    let ledger = InMemoryLedger::load_or_default(state)?;
    let executor = Executor::new(Arc::new(ledger), Router::default());
    let executed = executor.invoke(caller, function, args)?;
    if executed.changed() {
        executor.ledger().save(state)?;
        tracing::debug!(path = %state.display(), height = executed.receipt.height, "state saved");
    }
    Ok(executed)
}

fn print_success(format: &OutputFormat, function: &str, executed: &Executed) {
    match format {
        OutputFormat::Json => {
            let payload = match &executed.response {
                Response::Empty => serde_json::Value::Null,
                Response::Message(msg) => serde_json::Value::String(msg.clone()),
                Response::Record(bytes) => serde_json::from_slice(bytes).unwrap_or_else(|_| {
                    serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned())
                }),
            };
            println!(
                "{}",
                serde_json::json!({
                    "function": function,
                    "height": executed.receipt.height,
                    "written": executed.receipt.written,
                    "payload": payload,
                })
            );
        }
        OutputFormat::Text => match &executed.response {
            Response::Empty => {
                println!("{} {} committed", "✓".green().bold(), function.bold());
                println!("  Height: {}", executed.receipt.height.to_string().yellow());
            }
            Response::Message(msg) => {
                println!("{} {}", "✓".green().bold(), msg);
                for key in &executed.receipt.written {
                    println!("  {} {}", "wrote:".green(), key.cyan());
                }
            }
            Response::Record(bytes) => {
                let pretty = serde_json::from_slice::<serde_json::Value>(bytes)
                    .ok()
                    .and_then(|v| serde_json::to_string_pretty(&v).ok());
                match pretty {
                    Some(text) => println!("{text}"),
                    None => println!("{}", String::from_utf8_lossy(bytes)),
                }
            }
        },
    }
}

fn cmd_serve(args: &ServeArgs, state: &Path) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if config.state_file.is_none() {
        config.state_file = Some(state.to_path_buf());
    }

    let server = OblServer::new(config)?;
    println!(
        "OBL server on {} (state: {})",
        server.config().bind_addr.to_string().bold(),
        state_label(server.config())
    );
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn state_label(config: &ServerConfig) -> String {
    config
        .state_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "in-memory".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn jane() -> AttributeMap {
        AttributeMap::university("jane@acme.edu")
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn caller_from_flags() {
        let cli =
            Cli::try_parse_from(["obl", "--role", "university", "--email", "jane@acme.edu", "init"])
                .unwrap();
        assert_eq!(caller_attributes(&cli), jane());

        let anonymous = Cli::try_parse_from(["obl", "init"]).unwrap();
        assert!(caller_attributes(&anonymous).is_empty());
    }

    #[test]
    fn state_persists_between_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");

        execute(&state, &jane(), "initLedger", &[]).unwrap();
        assert!(state.exists());

        let badge = strings(&[
            "Acme Univ",
            "https://acme.edu",
            "Intro Course",
            "desc",
            "criteria",
            "Dean",
            "Jane Doe",
        ]);
        execute(&state, &jane(), "issueBadge", &badge).unwrap();

        let got = execute(&state, &jane(), "getCertificate", &strings(&["badge:introcourse"]))
            .unwrap();
        assert!(!got.changed());
        assert!(matches!(got.response, Response::Record(_)));
    }

    #[test]
    fn failure_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        execute(&state, &jane(), "initLedger", &[]).unwrap();
        let before = std::fs::read(&state).unwrap();

        let err = execute(&state, &jane(), "initLedger", &[]).unwrap_err();
        assert_eq!(err.code(), "ALREADY_EXISTS");
        assert_eq!(std::fs::read(&state).unwrap(), before);
    }

    #[test]
    fn json_failure_is_reported_once() {
        let err = ContractError::not_found("record", "doesnotexist");
        assert!(report_failure(&OutputFormat::Json, err.clone()).is_ok());

        let text = report_failure(&OutputFormat::Text, err).unwrap_err();
        assert_eq!(text.to_string(), "record 'doesnotexist' does not exist");
    }

    #[test]
    fn json_mode_run_does_not_return_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let state_arg = state.to_str().unwrap();

        let cli = Cli::try_parse_from([
            "obl",
            "--format",
            "json",
            "--state",
            state_arg,
            "--role",
            "university",
            "--email",
            "jane@acme.edu",
            "get",
            "doesnotexist",
        ])
        .unwrap();
        assert!(run_command(cli).is_ok());

        let cli = Cli::try_parse_from([
            "obl",
            "--state",
            state_arg,
            "--role",
            "university",
            "--email",
            "jane@acme.edu",
            "get",
            "doesnotexist",
        ])
        .unwrap();
        assert!(run_command(cli).is_err());
    }

    #[test]
    fn missing_role_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let err = execute(&state, &AttributeMap::new(), "initLedger", &[]).unwrap_err();
        assert_eq!(err.code(), "AUTHORIZATION");
        assert!(!state.exists());
    }
}
