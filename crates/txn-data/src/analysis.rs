//! Report pipeline for the transaction analyzer.
//!
//! Loads transactions, seeds a [`TransactionAnalyzer`], runs every query once
//! in a fixed order and renders the results as text or JSON.

use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use txn_core::error::Result;
use txn_core::formatting::{format_amount, format_count, percentage};
use txn_core::models::{ReportQueries, Transaction};
use tracing::{info, warn};

use crate::aggregator::{AggregatedPeriod, AggregatedStats, TransactionAggregator};
use crate::analyzer::TransactionAnalyzer;
use crate::reader::load_transactions;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    /// Where the transactions were loaded from.
    pub source: String,
    /// Number of transactions the analyzer was seeded with.
    pub transactions_loaded: usize,
    /// Wall-clock seconds spent loading the input.
    pub load_time_seconds: f64,
}

/// The result of one report query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SectionBody {
    Amount(f64),
    Text(String),
    Values(Vec<String>),
    Transactions(Vec<Transaction>),
    /// A lookup that matched nothing; holds the key that was searched for.
    NotFound(String),
    /// The query failed; holds the error message.
    Error(String),
}

/// One titled block of the report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSection {
    pub title: String,
    pub body: SectionBody,
}

/// Every query result, in presentation order.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub sections: Vec<ReportSection>,
}

impl AnalysisReport {
    /// The first section whose title starts with `prefix`.
    pub fn section(&self, prefix: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.title.starts_with(prefix))
    }
}

/// The complete output of [`analyze_transactions`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub analyzer: TransactionAnalyzer,
    pub report: AnalysisReport,
}

/// Month-by-month breakdown for the `monthly` view.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyBreakdown {
    pub periods: Vec<AggregatedPeriod>,
    pub totals: AggregatedStats,
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Run the full pipeline.
///
/// 1. Load transactions from `data_path`.
/// 2. Seed a [`TransactionAnalyzer`].
/// 3. Run every report query via [`build_report`].
pub fn analyze_transactions(data_path: &Path, queries: &ReportQueries) -> Result<AnalysisResult> {
    let load_start = std::time::Instant::now();
    let transactions = load_transactions(data_path)?;
    let load_time = load_start.elapsed().as_secs_f64();

    let analyzer = TransactionAnalyzer::new(transactions);

    let metadata = ReportMetadata {
        generated_at: Utc::now().to_rfc3339(),
        source: data_path.display().to_string(),
        transactions_loaded: analyzer.len(),
        load_time_seconds: load_time,
    };
    let sections = build_report(&analyzer, queries);

    info!(
        "Report built: {} sections over {} transactions",
        sections.len(),
        analyzer.len()
    );

    Ok(AnalysisResult {
        analyzer,
        report: AnalysisReport { metadata, sections },
    })
}

/// Call every analyzer query once, in presentation order.
///
/// Query arguments left as `None` in `queries` are taken from the data: the
/// first transaction's merchant and id, the first transaction's date as the
/// range start, and the last transaction's date as the range end and the
/// before-date cutoff. A failing query becomes an [`SectionBody::Error`].
pub fn build_report(analyzer: &TransactionAnalyzer, queries: &ReportQueries) -> Vec<ReportSection> {
    let all = analyzer.all_transactions();
    let first = all.first();
    let last = all.last();
    let pick = |given: &Option<String>, fallback: Option<&str>| -> String {
        given
            .clone()
            .unwrap_or_else(|| fallback.unwrap_or_default().to_string())
    };

    let merchant = pick(&queries.merchant, first.map(Transaction::merchant));
    let id = pick(&queries.transaction_id, first.map(Transaction::id));
    let from = pick(&queries.date_from, first.map(Transaction::date));
    let to = pick(&queries.date_to, last.map(Transaction::date));
    let before = pick(&queries.before_date, last.map(Transaction::date));
    let kind = queries.transaction_type.as_str();

    let mut sections = Vec::with_capacity(16);

    sections.push(section(
        "All transactions",
        SectionBody::Transactions(all.to_vec()),
    ));
    sections.push(section(
        "Unique transaction types",
        SectionBody::Values(to_strings(analyzer.unique_transaction_types())),
    ));
    sections.push(amount_section("Total amount", analyzer.total_amount()));
    sections.push(amount_section(
        format!(
            "Total amount by date (year={}, month={}, day={})",
            wildcard(queries.year),
            wildcard(queries.month),
            wildcard(queries.day)
        ),
        analyzer.total_amount_by_date(queries.year, queries.month, queries.day),
    ));
    sections.push(section(
        format!("Transactions of type \"{}\"", kind),
        transactions_body(analyzer.transactions_by_type(kind)),
    ));
    sections.push(list_section(
        format!("Transactions from {} to {}", from, to),
        analyzer.transactions_in_date_range(&from, &to),
    ));
    sections.push(section(
        format!("Transactions at merchant \"{}\"", merchant),
        transactions_body(analyzer.transactions_by_merchant(&merchant)),
    ));
    sections.push(amount_section(
        "Average transaction amount",
        analyzer.average_transaction_amount(),
    ));
    sections.push(list_section(
        format!(
            "Transactions with amount between {} and {}",
            format_amount(queries.min_amount, 2),
            format_amount(queries.max_amount, 2)
        ),
        analyzer.transactions_by_amount_range(queries.min_amount, queries.max_amount),
    ));
    sections.push(amount_section("Total debit amount", analyzer.total_debit_amount()));
    sections.push(text_section(
        "Month with most transactions",
        analyzer.most_transactions_month(),
    ));
    sections.push(text_section(
        "Month with most debit transactions",
        analyzer.most_debit_transactions_month(),
    ));
    sections.push(section(
        "Most common transaction type",
        SectionBody::Text(analyzer.dominant_transaction_type().to_string()),
    ));
    sections.push(list_section(
        format!("Transactions before {}", before),
        analyzer.transactions_before_date(&before),
    ));
    sections.push(section(
        format!("Transaction with id \"{}\"", id),
        match analyzer.find_transaction_by_id(&id) {
            Some(tx) => SectionBody::Transactions(vec![tx.clone()]),
            None => SectionBody::NotFound(id.clone()),
        },
    ));
    sections.push(section(
        "Transaction descriptions",
        SectionBody::Values(to_strings(analyzer.transaction_descriptions())),
    ));

    sections
}

/// Group the analyzer's transactions by month and total them.
pub fn monthly_breakdown(analyzer: &TransactionAnalyzer) -> Result<MonthlyBreakdown> {
    let periods = TransactionAggregator::aggregate_monthly(analyzer.all_transactions())?;
    let totals = TransactionAggregator::calculate_totals(&periods);
    Ok(MonthlyBreakdown { periods, totals })
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render the report as plain text.
///
/// Record collections use each transaction's pretty JSON form.
pub fn render_text(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();
    let meta = &report.metadata;
    push_line(
        &mut out,
        format!(
            "Transaction report for {}: {} (loaded in {:.3}s)",
            meta.source,
            format_count(meta.transactions_loaded, "transaction"),
            meta.load_time_seconds
        ),
    );

    for s in &report.sections {
        push_line(&mut out, format!("\n== {} ==", s.title));
        match &s.body {
            SectionBody::Amount(v) => push_line(&mut out, format_amount(*v, 2)),
            SectionBody::Text(t) => push_line(&mut out, t),
            SectionBody::Values(values) => {
                if values.is_empty() {
                    push_line(&mut out, "(none)");
                }
                for v in values {
                    push_line(&mut out, format!("- {}", v));
                }
            }
            SectionBody::Transactions(txs) => {
                push_line(&mut out, format_count(txs.len(), "transaction"));
                for tx in txs {
                    push_line(&mut out, tx.to_pretty_json()?);
                }
            }
            SectionBody::NotFound(key) => push_line(&mut out, format!("not found: {}", key)),
            SectionBody::Error(msg) => push_line(&mut out, format!("error: {}", msg)),
        }
    }

    Ok(out)
}

/// Render the monthly breakdown as a fixed-width table.
///
/// Each month row lists the transaction types seen in that month; the total
/// row is omitted when there are no periods.
pub fn render_monthly_table(breakdown: &MonthlyBreakdown) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "{:<8} {:>6} {:>7} {:>14} {:>14} {:>14}  {}",
            "Month", "Count", "Share", "Total", "Debit", "Credit", "Types"
        ),
    );

    let total_count = breakdown.totals.count as f64;
    for period in &breakdown.periods {
        let types = period.types_used().join(", ");
        push_line(&mut out, table_row(&period.period_key, &period.stats, total_count, &types));
    }
    if breakdown.periods.is_empty() {
        push_line(&mut out, "(no transactions)");
    } else {
        push_line(&mut out, table_row("Total", &breakdown.totals, total_count, ""));
    }
    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn push_line(out: &mut String, line: impl AsRef<str>) {
    out.push_str(line.as_ref());
    out.push('\n');
}

fn table_row(label: &str, stats: &AggregatedStats, total_count: f64, types: &str) -> String {
    let row = format!(
        "{:<8} {:>6} {:>6.1}% {:>14} {:>14} {:>14}",
        label,
        stats.count,
        percentage(stats.count as f64, total_count, 1),
        format_amount(stats.total_amount, 2),
        format_amount(stats.debit_amount, 2),
        format_amount(stats.credit_amount, 2)
    );
    if types.is_empty() {
        row
    } else {
        format!("{}  {}", row, types)
    }
}

fn section(title: impl Into<String>, body: SectionBody) -> ReportSection {
    ReportSection {
        title: title.into(),
        body,
    }
}

fn error_body(title: &str, err: impl std::fmt::Display) -> SectionBody {
    warn!("Report query \"{}\" failed: {}", title, err);
    SectionBody::Error(err.to_string())
}

fn amount_section(title: impl Into<String>, result: Result<f64>) -> ReportSection {
    let title = title.into();
    let body = match result {
        Ok(v) => SectionBody::Amount(v),
        Err(e) => error_body(&title, e),
    };
    section(title, body)
}

fn text_section(title: impl Into<String>, result: Result<String>) -> ReportSection {
    let title = title.into();
    let body = match result {
        Ok(v) => SectionBody::Text(v),
        Err(e) => error_body(&title, e),
    };
    section(title, body)
}

fn list_section(title: impl Into<String>, result: Result<Vec<&Transaction>>) -> ReportSection {
    let title = title.into();
    let body = match result {
        Ok(txs) => transactions_body(txs),
        Err(e) => error_body(&title, e),
    };
    section(title, body)
}

fn transactions_body(txs: Vec<&Transaction>) -> SectionBody {
    SectionBody::Transactions(txs.into_iter().cloned().collect())
}

fn to_strings(values: Vec<&str>) -> Vec<String> {
    values.into_iter().map(str::to_string).collect()
}

fn wildcard<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "*".to_string(), |v| v.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
