mod args;
mod client;
mod icp_config;
mod render;

use std::io::{IsTerminal, Read};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::args::{Cli, Command, EvaluateArgs};
use crate::client::{Decision, EvaluationClient};
use crate::icp_config::IcpConfig;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays clean for --json.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            match err.downcast_ref::<client::RequesterError>() {
                Some(requester_err) => eprintln!("{}", render::render_error(requester_err)),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.cmd {
        Command::Evaluate(args) => evaluate(&cli.api_url, args).await,
        Command::Health => {
            let client = EvaluationClient::new(&cli.api_url, HEALTH_TIMEOUT)?;
            let report = client.health().await?;
            println!("{}", render::render_health(&report));
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn evaluate(api_url: &str, args: EvaluateArgs) -> Result<ExitCode> {
    let icp = IcpConfig::load(&args.config)?;
    let profile_text = read_profile(&args)?;
    debug!(
        "Evaluating {} chars against {} rules",
        profile_text.len(),
        icp.rules.len()
    );

    let client = EvaluationClient::new(api_url, Duration::from_secs(args.timeout_secs))?
        .with_retries(args.retries);
    let outcome = client.evaluate(&profile_text, &icp).await?;

    if args.json {
        println!("{}", render::render_outcome_json(&outcome));
    } else {
        println!("{}", render::render_outcome(&outcome));
    }

    Ok(match outcome.decision {
        Decision::Fit => ExitCode::SUCCESS,
        Decision::NotFit => ExitCode::from(1),
    })
}

fn read_profile(args: &EvaluateArgs) -> Result<String> {
    if let Some(text) = &args.profile_text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.profile {
        return std::fs::read_to_string(path)
            .with_context(|| format!("cannot read profile file {}", path.display()));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("no profile given: pass --profile <file>, --profile-text <text>, or pipe it on stdin");
    }
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .context("cannot read profile from stdin")?;
    Ok(text)
}
