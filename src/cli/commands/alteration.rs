use clap::Subcommand;
use serde_json::json;

use crate::alteration::Alterator;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum AlterationCommands {
    #[command(about = "Show the applied timestamp and pending alterations")]
    Status,

    #[command(about = "Apply pending alterations")]
    Deploy {
        #[arg(long, help = "Stop after the alteration with this timestamp")]
        to: Option<i64>,
    },

    #[command(about = "Revert alterations newer than the target timestamp")]
    Rollback {
        #[arg(help = "Timestamp to roll back to (0 reverts everything)")]
        target: i64,
    },
}

pub async fn handle(cmd: AlterationCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&crate::config::config().database).await?;
    let alterator = Alterator::new(pool);
    alterator.ensure_baseline().await?;

    match cmd {
        AlterationCommands::Status => {
            let status = alterator.status().await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
                OutputFormat::Text => {
                    println!("Applied up to: {} (updated {})", status.timestamp, status.updated_at.format("%Y-%m-%d %H:%M"));
                    if status.pending.is_empty() {
                        println!("No pending alterations");
                    } else {
                        println!("Pending:");
                        for version in &status.pending {
                            println!("  {}", version);
                        }
                    }
                }
            }
            Ok(())
        }
        AlterationCommands::Deploy { to } => {
            let applied = alterator.deploy(to).await?;
            output_success(
                &output_format,
                &format!("Applied {} alteration(s)", applied.len()),
                Some(json!({ "applied": applied })),
            )
        }
        AlterationCommands::Rollback { target } => {
            let reverted = alterator.rollback(target).await?;
            output_success(
                &output_format,
                &format!("Reverted {} alteration(s)", reverted.len()),
                Some(json!({ "reverted": reverted })),
            )
        }
    }
}
