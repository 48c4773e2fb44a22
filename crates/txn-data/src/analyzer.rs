//! In-memory query engine over an ordered collection of transactions.
//!
//! Every query is an independent pass over the stored sequence; there is no
//! index or cache, so results always reflect the current contents.

use std::collections::HashSet;

use chrono::Datelike;
use txn_core::dates::parse_date;
use txn_core::error::{AnalyzerError, Result};
use txn_core::models::{Transaction, TypeBalance};
use tracing::debug;

use crate::aggregator::MonthCounter;

const DEBIT: &str = "debit";
const CREDIT: &str = "credit";

// ── TransactionAnalyzer ───────────────────────────────────────────────────────

/// Owns an ordered sequence of transactions and answers analytical queries.
#[derive(Debug, Clone, Default)]
pub struct TransactionAnalyzer {
    transactions: Vec<Transaction>,
}

impl TransactionAnalyzer {
    /// Create an analyzer seeded with `transactions`, keeping their order.
    pub fn new(transactions: Vec<Transaction>) -> Self {
        debug!("TransactionAnalyzer: seeded with {} transactions", transactions.len());
        Self { transactions }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    // ── Mutation ──────────────────────────────────────────────────────────────

    /// Append one transaction. No duplicate check is made.
    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    // ── Listing & lookup ──────────────────────────────────────────────────────

    /// The full sequence, in stored order.
    pub fn all_transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Distinct type labels, in first-seen order.
    pub fn unique_transaction_types(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.transactions
            .iter()
            .map(Transaction::transaction_type)
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Transactions whose type equals `transaction_type` exactly.
    pub fn transactions_by_type(&self, transaction_type: &str) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|tx| tx.transaction_type() == transaction_type)
            .collect()
    }

    /// Transactions whose merchant equals `merchant` exactly.
    pub fn transactions_by_merchant(&self, merchant: &str) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|tx| tx.merchant() == merchant)
            .collect()
    }

    /// The first transaction with the given id.
    pub fn find_transaction_by_id(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id() == id)
    }

    /// Every description, one per transaction, in stored order.
    pub fn transaction_descriptions(&self) -> Vec<&str> {
        self.transactions
            .iter()
            .map(Transaction::description)
            .collect()
    }

    // ── Date filters ──────────────────────────────────────────────────────────

    /// Transactions dated within `[start, end]`, both ends inclusive.
    ///
    /// Boundaries are parsed with the same parser as record dates. An
    /// unparseable boundary or record date is an error.
    pub fn transactions_in_date_range(&self, start: &str, end: &str) -> Result<Vec<&Transaction>> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        self.filter_by_date(|date| start <= date && date <= end)
    }

    /// Transactions dated strictly earlier than `date`.
    pub fn transactions_before_date(&self, date: &str) -> Result<Vec<&Transaction>> {
        let cutoff = parse_date(date)?;
        self.filter_by_date(|d| d < cutoff)
    }

    fn filter_by_date<F>(&self, keep: F) -> Result<Vec<&Transaction>>
    where
        F: Fn(chrono::NaiveDateTime) -> bool,
    {
        let mut out = Vec::new();
        for tx in &self.transactions {
            if keep(tx.parsed_date()?) {
                out.push(tx);
            }
        }
        Ok(out)
    }

    // ── Amount filters & sums ─────────────────────────────────────────────────

    /// Transactions whose amount lies within `[min, max]`, both inclusive.
    pub fn transactions_by_amount_range(&self, min: f64, max: f64) -> Result<Vec<&Transaction>> {
        let mut out = Vec::new();
        for tx in &self.transactions {
            let amount = tx.parsed_amount()?;
            if min <= amount && amount <= max {
                out.push(tx);
            }
        }
        Ok(out)
    }

    /// Sum of every amount. `0.0` for an empty collection.
    pub fn total_amount(&self) -> Result<f64> {
        sum_amounts(self.transactions.iter())
    }

    /// Sum of amounts whose date matches every supplied component.
    ///
    /// `None` components match anything. `month` is 1-based and `day` is the
    /// day of the month. `Some(0)` is not a wildcard: a zero month or day is
    /// [`AnalyzerError::InvalidDateComponent`] and a zero year matches year 0.
    /// Every record's date is parsed, even when all components are `None`.
    pub fn total_amount_by_date(
        &self,
        year: Option<i32>,
        month: Option<u32>,
        day: Option<u32>,
    ) -> Result<f64> {
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(AnalyzerError::InvalidDateComponent {
                    component: "month",
                    value: i64::from(m),
                });
            }
        }
        if let Some(d) = day {
            if !(1..=31).contains(&d) {
                return Err(AnalyzerError::InvalidDateComponent {
                    component: "day",
                    value: i64::from(d),
                });
            }
        }

        let mut total = 0.0;
        for tx in &self.transactions {
            let date = tx.parsed_date()?;
            let matches = year.map_or(true, |y| date.year() == y)
                && month.map_or(true, |m| date.month() == m)
                && day.map_or(true, |d| date.day() == d);
            if matches {
                total += tx.parsed_amount()?;
            }
        }
        Ok(total)
    }

    /// Sum of amounts over transactions typed `"debit"`.
    pub fn total_debit_amount(&self) -> Result<f64> {
        sum_amounts(self.transactions_by_type(DEBIT).into_iter())
    }

    /// Mean amount across all transactions.
    ///
    /// An empty collection is [`AnalyzerError::EmptyCollection`] rather than
    /// a `NaN`.
    pub fn average_transaction_amount(&self) -> Result<f64> {
        if self.transactions.is_empty() {
            return Err(AnalyzerError::EmptyCollection("average amount"));
        }
        Ok(self.total_amount()? / self.transactions.len() as f64)
    }

    // ── Frequency ─────────────────────────────────────────────────────────────

    /// The `"YYYY-MM"` key holding the most transactions.
    ///
    /// Ties go to the month seen first in stored order.
    pub fn most_transactions_month(&self) -> Result<String> {
        busiest_month(self.transactions.iter(), "all")
    }

    /// Like [`most_transactions_month`](Self::most_transactions_month) over
    /// debit transactions only.
    pub fn most_debit_transactions_month(&self) -> Result<String> {
        busiest_month(self.transactions_by_type(DEBIT).into_iter(), DEBIT)
    }

    /// Compare the number of debit and credit transactions.
    ///
    /// Other type labels are ignored.
    pub fn dominant_transaction_type(&self) -> TypeBalance {
        let (debits, credits) =
            self.transactions
                .iter()
                .fold((0usize, 0usize), |(d, c), tx| match tx.transaction_type() {
                    DEBIT => (d + 1, c),
                    CREDIT => (d, c + 1),
                    _ => (d, c),
                });

        match debits.cmp(&credits) {
            std::cmp::Ordering::Greater => TypeBalance::Debit,
            std::cmp::Ordering::Less => TypeBalance::Credit,
            std::cmp::Ordering::Equal => TypeBalance::Equal,
        }
    }
}

impl FromIterator<Transaction> for TransactionAnalyzer {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn sum_amounts<'a, I>(transactions: I) -> Result<f64>
where
    I: Iterator<Item = &'a Transaction>,
{
    let mut total = 0.0;
    for tx in transactions {
        total += tx.parsed_amount()?;
    }
    Ok(total)
}

/// `scope` names the filter in the error message.
fn busiest_month<'a, I>(transactions: I, scope: &'static str) -> Result<String>
where
    I: Iterator<Item = &'a Transaction>,
{
    let counter = MonthCounter::from_transactions(transactions);
    if counter.is_empty() {
        debug!("No transactions to rank by month (scope: {})", scope);
        return Err(AnalyzerError::NoMonthData(scope));
    }
    counter
        .max_key()
        .map(str::to_string)
        .ok_or(AnalyzerError::NoMonthData(scope))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
