use clap::{Args, Parser, Subcommand};
use crate::config::{AuditBackend, ExecutionMode};

#[derive(Parser)]
#[command(name = "a11y-scanner", version, about = "WCAG accessibility scanning service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Run one synchronous scan and print the report
    Scan(ScanArgs),
    /// Show the latest stored scan for a URL or scan id
    Query(QueryArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Configuration file plus the flags that override it.
#[derive(Args, Clone, Default)]
pub struct ConfigArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// SQLite database path
    #[arg(long)]
    pub db: Option<String>,

    /// Audit backend: remote or headless
    #[arg(long, value_parser = parse_backend)]
    pub backend: Option<AuditBackend>,

    /// Execution mode: synchronous or fire-and-forget
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<ExecutionMode>,
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Listen address
    #[arg(long)]
    pub host: Option<String>,
}

#[derive(Args, Clone)]
pub struct ScanArgs {
    /// Page to audit
    pub url: String,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output the stored record as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct QueryArgs {
    /// Page URL or scan id
    pub target: String,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Path to YAML config file
    pub config: String,
}

fn parse_backend(s: &str) -> Result<AuditBackend, String> {
    AuditBackend::parse(s).ok_or_else(|| format!("unknown backend '{}', expected remote or headless", s))
}

fn parse_mode(s: &str) -> Result<ExecutionMode, String> {
    ExecutionMode::parse(s)
        .ok_or_else(|| format!("unknown mode '{}', expected synchronous or fire-and-forget", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from([
            "a11y-scanner", "serve", "--port", "9000", "--backend", "headless", "--mode", "fire-and-forget",
        ]);
        let Commands::Serve(args) = cli.command else { panic!("expected serve") };
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.config.backend, Some(AuditBackend::Headless));
        assert_eq!(args.config.mode, Some(ExecutionMode::FireAndForget));
    }

    #[test]
    fn test_rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["a11y-scanner", "scan", "https://x.com", "--backend", "lynx"]).is_err());
    }
}
