use std::time::Duration;
use serde_json::json;
use crate::cli::commands::QueryArgs;
use crate::cli::load_config;
use crate::cli::scan::print_report;
use crate::db::Database;
use crate::errors::ScannerError;
use crate::pipeline::normalize_lookup_url;
use tracing::debug;

pub async fn handle_query(args: QueryArgs) -> Result<(), ScannerError> {
    let config = load_config(&args.config).await?;
    let db = Database::new(&config.server.database)?;

    let target = args.target.trim();
    let record = if target.contains("://") {
        let url = normalize_lookup_url(target);
        debug!(%url, "Looking up latest scan by URL");
        db.get_latest_scan_by_url(&url)?
    } else {
        debug!(scan_id = %target, "Looking up scan by id");
        db.get_scan(target)?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&json!({ "found": record.is_some(), "scan": record }))?);
        return Ok(());
    }

    match record {
        Some(record) => {
            let elapsed = record
                .completed_at
                .and_then(|done| (done - record.created_at).to_std().ok())
                .unwrap_or(Duration::ZERO);
            print_report(&record, elapsed);
        }
        None => println!("No scan found for {}", target),
    }
    Ok(())
}
