use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use obl_issuance::{GET_CERTIFICATE, INIT_LEDGER, ISSUE_BADGE, ISSUE_CERTIFICATE};

#[derive(Parser)]
#[command(
    name = "obl",
    about = "Open Badges Ledger: badge and certificate issuance",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger snapshot file
    #[arg(long, global = true, default_value = "obl-state.json")]
    pub state: PathBuf,

    /// Caller role attribute
    #[arg(long, global = true)]
    pub role: Option<String>,

    /// Caller email attribute
    #[arg(long, global = true)]
    pub email: Option<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the empty issuer list
    Init,
    /// Issue a badge class as the calling university
    IssueBadge(IssueBadgeArgs),
    /// Issue a certificate for one of your badges
    IssueCert(IssueCertArgs),
    /// Print the record stored under a key
    Get(GetArgs),
    /// Invoke a contract function with positional arguments
    Invoke(InvokeArgs),
    /// Start the HTTP server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct IssueBadgeArgs {
    #[arg(long)]
    pub issuer_name: String,
    #[arg(long)]
    pub issuer_url: String,
    /// Badge name; its key is the lowercased name without spaces
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub criteria: String,
    /// Job title on the signature line
    #[arg(long)]
    pub job_title: String,
    /// Name on the signature line
    #[arg(long)]
    pub signature: String,
}

#[derive(Args)]
pub struct IssueCertArgs {
    /// Badge key without the `badge:` prefix
    #[arg(long)]
    pub badge: String,
    #[arg(long)]
    pub recipient_email: String,
    #[arg(long)]
    pub recipient_name: String,
    #[arg(long)]
    pub public_key: String,
    /// Verification location
    #[arg(long)]
    pub location: String,
    /// Issue date, YYYY-MM-DD (defaults to today, UTC)
    #[arg(long)]
    pub issued_on: Option<String>,
}

#[derive(Args)]
pub struct GetArgs {
    pub key: String,
}

#[derive(Args)]
pub struct InvokeArgs {
    pub function: String,
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML server configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the configured bind address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

impl Command {
    /// The contract call this command performs, or `None` for `serve`.
    pub fn invocation(&self) -> Option<(String, Vec<String>)> {
        match self {
            Self::Init => Some((INIT_LEDGER.into(), Vec::new())),
            Self::IssueBadge(a) => Some((
                ISSUE_BADGE.into(),
                vec![
                    a.issuer_name.clone(),
                    a.issuer_url.clone(),
                    a.name.clone(),
                    a.description.clone(),
                    a.criteria.clone(),
                    a.job_title.clone(),
                    a.signature.clone(),
                ],
            )),
            Self::IssueCert(a) => Some((
                ISSUE_CERTIFICATE.into(),
                vec![
                    a.issued_on.clone().unwrap_or_else(today),
                    a.recipient_email.clone(),
                    a.recipient_name.clone(),
                    a.public_key.clone(),
                    a.location.clone(),
                    a.badge.clone(),
                ],
            )),
            Self::Get(a) => Some((GET_CERTIFICATE.into(), vec![a.key.clone()])),
            Self::Invoke(a) => Some((a.function.clone(), a.args.clone())),
            Self::Serve(_) => None,
        }
    }
}

fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
