use clap::Subcommand;

use crate::cli::utils::{output_record, output_records, output_success};
use crate::cli::OutputFormat;
use crate::client::ResourceClient;
use crate::database::models::Resource;
use crate::types::{CreateInput, ListQuery, UpdateInput};

#[derive(Subcommand)]
pub enum ResourceCommands {
    #[command(about = "Create a record")]
    Create {
        #[arg(help = "Unique name")]
        name: String,
        #[arg(long, help = "Optional description")]
        description: Option<String>,
    },

    #[command(about = "Show a record by id")]
    Get {
        #[arg(help = "Record ID")]
        id: String,
    },

    #[command(about = "List records in creation order")]
    List {
        #[arg(long, help = "Page number, starting at 1")]
        page: Option<u32>,
        #[arg(long, help = "Records per page (server default 20)")]
        page_size: Option<u32>,
    },

    #[command(about = "Update name and/or description")]
    Update {
        #[arg(help = "Record ID")]
        id: String,
        #[arg(long, help = "New name")]
        name: Option<String>,
        #[arg(long, help = "New description", conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long, help = "Set description to null")]
        clear_description: bool,
    },

    #[command(about = "Delete a record")]
    Delete {
        #[arg(help = "Record ID")]
        id: String,
    },
}

pub async fn handle<E: Resource>(
    cmd: ResourceCommands,
    server: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let client = ResourceClient::<E>::new(server)?;

    match cmd {
        ResourceCommands::Create { name, description } => {
            let input = CreateInput { name, description };
            let record = client.create(&input).await?;
            output_record(&output_format, &record)
        }
        ResourceCommands::Get { id } => {
            let record = client.get(&id).await?;
            output_record(&output_format, &record)
        }
        ResourceCommands::List { page, page_size } => {
            let query = ListQuery { page, page_size };
            let (records, total) = client.list_with_total(&query).await?;
            output_records(&output_format, &records, total)
        }
        ResourceCommands::Update {
            id,
            name,
            description,
            clear_description,
        } => {
            let input = UpdateInput {
                name,
                description: if clear_description {
                    Some(None)
                } else {
                    description.map(Some)
                },
            };
            if input.is_empty() {
                return Err(anyhow::anyhow!(
                    "Nothing to update; pass --name, --description or --clear-description"
                ));
            }
            let record = client.update(&id, &input).await?;
            output_record(&output_format, &record)
        }
        ResourceCommands::Delete { id } => {
            client.delete(&id).await?;
            output_success(
                &output_format,
                &format!("Deleted {} '{}'", E::LABEL, id),
                Some(serde_json::json!({ "id": id })),
            )
        }
    }
}
