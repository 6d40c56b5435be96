pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::database::models::{OrganizationRole, OrganizationScope};

#[derive(Parser)]
#[command(name = "orgres")]
#[command(about = "Command-line client for the organization resource API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "API base URL (defaults to ORGRES_SERVER or http://localhost:<port>)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Organization scope management")]
    Scope {
        #[command(subcommand)]
        cmd: commands::resource::ResourceCommands,
    },

    #[command(about = "Organization role management")]
    Role {
        #[command(subcommand)]
        cmd: commands::resource::ResourceCommands,
    },

    #[command(about = "Database schema alterations")]
    Alteration {
        #[command(subcommand)]
        cmd: commands::alteration::AlterationCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let server = config::resolve_server_url(cli.server.as_deref());

    match cli.command {
        Commands::Scope { cmd } => {
            commands::resource::handle::<OrganizationScope>(cmd, &server, output_format).await
        }
        Commands::Role { cmd } => {
            commands::resource::handle::<OrganizationRole>(cmd, &server, output_format).await
        }
        Commands::Alteration { cmd } => commands::alteration::handle(cmd, output_format).await,
    }
}
