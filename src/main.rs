use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use farerule::policy::{PolicyChecker, PolicyConfig, PolicyRegistry};
use farerule::{ExecutionResult, PolicyVerdict, Rule};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "farerule")]
#[command(about = "Execute travel rules against booking payloads")]
struct Cli {
    /// Policy configuration file (JSON).
    #[arg(long, global = true, env = "FARERULE_POLICY_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Execute a rule, then check policies against the result.
    Execute {
        #[arg(long)]
        rule: PathBuf,
        #[arg(long)]
        payload: PathBuf,
        /// Policy to check; repeat for several. Defaults to all registered.
        #[arg(long = "policy")]
        policies: Vec<String>,
    },
    /// Check policies against a payload without executing a rule.
    Check {
        #[arg(long)]
        payload: PathBuf,
        #[arg(long = "policy")]
        policies: Vec<String>,
    },
    /// List registered policy names.
    Policies,
}

#[derive(Serialize)]
struct ExecuteOutput<'a> {
    execution: &'a ExecutionResult,
    policies: Vec<PolicyVerdict>,
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("farerule=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

fn verdicts(
    checker: &PolicyChecker,
    names: &[String],
    payload: &Value,
    result: Option<&ExecutionResult>,
) -> Result<Vec<PolicyVerdict>> {
    if names.is_empty() {
        return Ok(checker.check_all(payload, result));
    }
    Ok(checker.check_many(names.iter().map(String::as_str), payload, result)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = match &cli.config {
        Some(path) => PolicyConfig::from_file(path)
            .with_context(|| format!("loading policy config {}", path.display()))?,
        None => PolicyConfig::default(),
    };
    let checker = PolicyChecker::new(PolicyRegistry::with_builtins(&config));

    match cli.command {
        Command::Execute {
            rule,
            payload,
            policies,
        } => {
            let rule = Rule::from_file(&rule)
                .with_context(|| format!("loading rule {}", rule.display()))?;
            let payload = read_json(&payload)?;
            let execution = rule.execute(&payload)?;
            tracing::info!(rule_id = %rule.rule_id, matched = execution.is_matched(), "rule executed");
            let policies = verdicts(&checker, &policies, &payload, Some(&execution))?;
            let output = ExecuteOutput {
                execution: &execution,
                policies,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Check { payload, policies } => {
            let payload = read_json(&payload)?;
            let policies = verdicts(&checker, &policies, &payload, None)?;
            println!("{}", serde_json::to_string_pretty(&policies)?);
        }
        Command::Policies => {
            for name in checker.registry().names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}
