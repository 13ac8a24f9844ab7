use std::time::{Duration, Instant};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use crate::auditor::create_auditor;
use crate::cli::commands::ScanArgs;
use crate::cli::load_config;
use crate::config::ExecutionMode;
use crate::db::{Database, ScanStore};
use crate::errors::ScannerError;
use crate::models::{Impact, ScanRecord, ScanStatus};
use crate::pipeline::{OrchestratorSettings, ScanOrchestrator};
use crate::utils::formatting::format_duration;
use crate::utils::truncation::truncate_snippet;
use crate::views::ScoreBand;
use std::sync::Arc;

pub async fn handle_scan(args: ScanArgs) -> Result<(), ScannerError> {
    let config = load_config(&args.config).await?;
    let db = Database::new(&config.server.database)?;
    let auditor = create_auditor(&config)?;

    let mut settings = OrchestratorSettings::from_config(&config);
    settings.mode = ExecutionMode::Synchronous;
    let store: Arc<dyn ScanStore> = Arc::new(db.clone());
    let orchestrator = ScanOrchestrator::new(store.clone(), auditor, settings);

    let spinner = if args.json {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg} {elapsed:.dim}") {
            bar.set_style(spinner_style);
        }
        bar.set_message(format!("Auditing {} via {}", args.url, orchestrator.backend_name()));
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    };

    let started = Instant::now();
    let submission = orchestrator.submit_scan(Some(&args.url), None).await;
    spinner.finish_and_clear();
    let submission = submission?;

    let record = store
        .get(&submission.scan_id)
        .await?
        .ok_or_else(|| ScannerError::Internal(format!("Scan {} vanished after completion", submission.scan_id)))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&json!(record))?);
    } else {
        print_report(&record, started.elapsed());
    }

    if record.status == ScanStatus::Failed {
        return Err(ScannerError::Internal(format!("Scan {} failed", record.id)));
    }
    Ok(())
}

pub fn print_report(record: &ScanRecord, elapsed: Duration) {
    println!();
    println!("  {} {}", style("Page").dim(), style(&record.url).bold());
    println!("  {} {}", style("Scan").dim(), record.id);

    match record.status {
        ScanStatus::Pending => {
            println!("  {} in progress", style("…").cyan());
            return;
        }
        ScanStatus::Failed => {
            println!("  {} scan failed after {}", style("✘").red().bold(), format_duration(elapsed.as_millis() as u64));
            return;
        }
        ScanStatus::Completed => {}
    }

    let score = record.score.unwrap_or(0);
    let score_text = format!("{}/100", score);
    let score_styled = match ScoreBand::from_score(score) {
        ScoreBand::Good => style(score_text).green().bold(),
        ScoreBand::Average => style(score_text).yellow().bold(),
        ScoreBand::Poor => style(score_text).red().bold(),
    };
    println!(
        "  {} {}  {} violation(s) in {}",
        style("Score").dim(),
        score_styled,
        record.violation_count(),
        format_duration(elapsed.as_millis() as u64)
    );

    for violation in record.violations.iter().flatten() {
        let badge = format!("[{}]", violation.impact);
        let badge = match violation.impact {
            Impact::Critical => style(badge).red().bold(),
            Impact::Serious => style(badge).red(),
            Impact::Moderate => style(badge).yellow(),
            Impact::Minor => style(badge).cyan(),
        };
        println!();
        println!("  {} {} {}", badge, style(&violation.description).bold(), style(&violation.id).dim());
        for line in violation.help.lines() {
            println!("      {}", line);
        }
        for node in &violation.nodes {
            println!("      {} {}", style("→").dim(), style(&node.target).cyan());
            if !node.html.is_empty() {
                println!("        {}", style(truncate_snippet(&node.html)).dim());
            }
        }
    }
    println!();
}
