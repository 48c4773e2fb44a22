//! Grouping of transactions by calendar month.
//!
//! Month keys come from the raw date literal (see [`Transaction::month_key`]),
//! so grouping never depends on date parsing succeeding.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use txn_core::error::Result;
use txn_core::models::Transaction;

// ── MonthCounter ──────────────────────────────────────────────────────────────

/// Transaction counts per month key, kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct MonthCounter {
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl MonthCounter {
    /// Count every transaction in `transactions` by month key.
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut counter = Self::default();
        for tx in transactions {
            counter.record(tx.month_key());
        }
        counter
    }

    /// Add one occurrence of `key`.
    pub fn record(&mut self, key: String) {
        match self.index.get(&key) {
            Some(&pos) => self.counts[pos].1 += 1,
            None => {
                self.index.insert(key.clone(), self.counts.len());
                self.counts.push((key, 1));
            }
        }
    }

    /// `(key, count)` pairs in the order the keys were first seen.
    pub fn counts(&self) -> &[(String, usize)] {
        &self.counts
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The key with the highest count.
    ///
    /// Keys are folded in first-seen order and the running best is only
    /// replaced by a strictly greater count, so ties go to the earliest key.
    pub fn max_key(&self) -> Option<&str> {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.counts {
            match best {
                Some(current) if entry.1 <= current.1 => {}
                _ => best = Some(entry),
            }
        }
        best.map(|(key, _)| key.as_str())
    }
}

// ── AggregatedStats ───────────────────────────────────────────────────────────

/// Count and amount totals accumulated across multiple transactions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregatedStats {
    pub count: usize,
    pub total_amount: f64,
    pub debit_amount: f64,
    pub credit_amount: f64,
}

impl AggregatedStats {
    /// Add a single transaction to the running totals.
    pub fn add_transaction(&mut self, tx: &Transaction) -> Result<()> {
        let amount = tx.parsed_amount()?;
        self.count += 1;
        self.total_amount += amount;
        match tx.transaction_type() {
            "debit" => self.debit_amount += amount,
            "credit" => self.credit_amount += amount,
            _ => {}
        }
        Ok(())
    }

    fn merge(&mut self, other: &AggregatedStats) {
        self.count += other.count;
        self.total_amount += other.total_amount;
        self.debit_amount += other.debit_amount;
        self.credit_amount += other.credit_amount;
    }
}

// ── AggregatedPeriod ──────────────────────────────────────────────────────────

/// All transactions within one month.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedPeriod {
    /// The month key, e.g. `"2019-01"`.
    pub period_key: String,
    /// Combined stats for the month.
    pub stats: AggregatedStats,
    /// Per-type breakdown, keyed by the raw type label.
    pub type_breakdowns: BTreeMap<String, AggregatedStats>,
}

impl AggregatedPeriod {
    fn new(period_key: impl Into<String>) -> Self {
        Self {
            period_key: period_key.into(),
            stats: AggregatedStats::default(),
            type_breakdowns: BTreeMap::new(),
        }
    }

    fn add_transaction(&mut self, tx: &Transaction) -> Result<()> {
        self.stats.add_transaction(tx)?;
        self.type_breakdowns
            .entry(tx.transaction_type().to_string())
            .or_default()
            .add_transaction(tx)
    }

    /// Distinct type labels seen in this month, sorted.
    pub fn types_used(&self) -> Vec<&str> {
        self.type_breakdowns.keys().map(String::as_str).collect()
    }
}

// ── TransactionAggregator ─────────────────────────────────────────────────────

/// Stateless helper that groups transactions by month.
pub struct TransactionAggregator;

impl TransactionAggregator {
    /// Aggregate `transactions` by month key, sorted ascending.
    ///
    /// Fails on the first transaction whose amount does not parse.
    pub fn aggregate_monthly(transactions: &[Transaction]) -> Result<Vec<AggregatedPeriod>> {
        let mut map: BTreeMap<String, AggregatedPeriod> = BTreeMap::new();

        for tx in transactions {
            let key = tx.month_key();
            map.entry(key.clone())
                .or_insert_with(|| AggregatedPeriod::new(key))
                .add_transaction(tx)?;
        }

        Ok(map.into_values().collect())
    }

    /// Sum up the stats from all periods.
    pub fn calculate_totals(periods: &[AggregatedPeriod]) -> AggregatedStats {
        let mut totals = AggregatedStats::default();
        for period in periods {
            totals.merge(&period.stats);
        }
        totals
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
