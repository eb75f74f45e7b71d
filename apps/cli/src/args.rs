use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "icp-eval",
    version,
    about = "Check a professional profile against an Ideal Customer Profile via the ICP evaluation service"
)]
pub struct Cli {
    /// Base URL of the evaluation service
    #[arg(
        long,
        global = true,
        env = "ICP_API_URL",
        default_value = "http://127.0.0.1:8000"
    )]
    pub api_url: String,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a profile. Exit code 0 = Fit, 1 = Not Fit, 2 = error
    Evaluate(EvaluateArgs),
    /// Show whether the service is up and has a language model configured
    Health,
}

#[derive(clap::Args, Debug)]
pub struct EvaluateArgs {
    /// ICP config JSON: {"icp_title": "...", "rules": ["..."]}
    #[arg(long)]
    pub config: PathBuf,

    /// File holding the profile text (reads stdin when neither profile flag is given)
    #[arg(long, conflicts_with = "profile_text")]
    pub profile: Option<PathBuf>,

    /// Profile text passed inline
    #[arg(long)]
    pub profile_text: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Extra attempts after a timeout (0 = never retry, at most 5)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=5))]
    pub retries: u32,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}
