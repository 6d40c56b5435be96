use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::database::models::Resource;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(target)) = (data, response.as_object_mut()) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a single record in the appropriate format
pub fn output_record<E: Resource>(output_format: &OutputFormat, record: &E) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        OutputFormat::Text => {
            println!("ID:          {}", record.id());
            println!("Name:        {}", record.name());
            println!("Description: {}", record.description().unwrap_or("-"));
        }
    }
    Ok(())
}

/// Output a page of records as a table or a JSON document
pub fn output_records<E: Resource>(
    output_format: &OutputFormat,
    records: &[E],
    total: Option<u64>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "items": records,
                    "total": total
                }))?
            );
        }
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No {}s found", E::LABEL);
                return Ok(());
            }

            println!("{:<34} {:<30} {}", "ID", "NAME", "DESCRIPTION");
            println!("{}", "-".repeat(90));
            for record in records {
                println!(
                    "{:<34} {:<30} {}",
                    record.id(),
                    record.name(),
                    record.description().unwrap_or("")
                );
            }
            if let Some(total) = total {
                println!("\n{} of {} shown", records.len(), total);
            }
        }
    }
    Ok(())
}
