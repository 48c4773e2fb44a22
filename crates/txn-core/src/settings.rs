use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::models::ReportQueries;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Analyze a collection of financial transaction records
#[derive(Parser, Debug, Clone)]
#[command(
    name = "txn-analyzer",
    about = "Analyze a collection of financial transaction records",
    version
)]
pub struct Settings {
    /// Transactions file (.json / .jsonl) or a directory containing them
    #[arg(long, env = "TXN_ANALYZER_DATA")]
    pub data_path: Option<PathBuf>,

    /// View mode
    #[arg(long, default_value = "report", value_parser = ["report", "monthly"])]
    pub view: String,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Year filter for the by-date total
    #[arg(long)]
    pub year: Option<i32>,

    /// Month filter (1-12) for the by-date total
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Day-of-month filter (1-31) for the by-date total
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=31))]
    pub day: Option<u32>,

    /// Transaction type to list
    #[arg(long, default_value = "debit")]
    pub transaction_type: String,

    /// Merchant to list (defaults to the first transaction's merchant)
    #[arg(long)]
    pub merchant: Option<String>,

    /// Transaction id to look up (defaults to the first transaction's id)
    #[arg(long)]
    pub id: Option<String>,

    /// Start of the date range, inclusive
    #[arg(long)]
    pub from: Option<String>,

    /// End of the date range, inclusive
    #[arg(long)]
    pub to: Option<String>,

    /// List transactions strictly before this date
    #[arg(long)]
    pub before: Option<String>,

    /// Lower bound of the amount range, inclusive
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub min_amount: f64,

    /// Upper bound of the amount range, inclusive
    #[arg(long, default_value = "1000", allow_negative_numbers = true)]
    pub max_amount: f64,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list, so tests
    /// can drive it without spawning subprocesses.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// Apply flags that override other settings.
    fn resolve(mut settings: Settings) -> Settings {
        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Collect the query arguments used by the analysis report.
    pub fn report_queries(&self) -> ReportQueries {
        ReportQueries {
            year: self.year,
            month: self.month,
            day: self.day,
            transaction_type: self.transaction_type.clone(),
            merchant: self.merchant.clone(),
            transaction_id: self.id.clone(),
            date_from: self.from.clone(),
            date_to: self.to.clone(),
            before_date: self.before.clone(),
            min_amount: self.min_amount,
            max_amount: self.max_amount,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
