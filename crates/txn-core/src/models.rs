use std::fmt;

use chrono::NaiveDateTime;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::dates;
use crate::error::{AnalyzerError, Result};

/// A single financial transaction as read from the input file.
///
/// Fields are stored verbatim and never change after construction. Numeric and
/// date interpretation happens on demand through [`Transaction::parsed_amount`]
/// and [`Transaction::parsed_date`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "transaction_id")]
    id: String,
    #[serde(rename = "transaction_date")]
    date: String,
    #[serde(rename = "transaction_amount", deserialize_with = "amount_as_text")]
    amount: String,
    transaction_type: String,
    #[serde(rename = "transaction_description")]
    description: String,
    #[serde(rename = "merchant_name")]
    merchant: String,
    card_type: String,
}

impl Transaction {
    /// Build a transaction from its seven fields, in canonical order.
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        amount: impl Into<String>,
        transaction_type: impl Into<String>,
        description: impl Into<String>,
        merchant: impl Into<String>,
        card_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            amount: amount.into(),
            transaction_type: transaction_type.into(),
            description: description.into(),
            merchant: merchant.into(),
            card_type: card_type.into(),
        }
    }

    /// Materialise a transaction from a raw JSON mapping.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    /// The amount exactly as it appeared in the input.
    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn transaction_type(&self) -> &str {
        &self.transaction_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn merchant(&self) -> &str {
        &self.merchant
    }

    pub fn card_type(&self) -> &str {
        &self.card_type
    }

    /// Parse the amount text into a finite `f64`.
    ///
    /// Returns [`AnalyzerError::MalformedAmount`] for anything that is not a
    /// plain finite decimal number (including `NaN` and `inf`).
    pub fn parsed_amount(&self) -> Result<f64> {
        match self.amount.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(AnalyzerError::MalformedAmount {
                id: self.id.clone(),
                amount: self.amount.clone(),
            }),
        }
    }

    /// Parse the date text with [`dates::parse_date`].
    pub fn parsed_date(&self) -> Result<NaiveDateTime> {
        dates::parse_date(&self.date)
    }

    /// The `"YYYY-MM"` grouping key taken from the raw date literal.
    pub fn month_key(&self) -> String {
        dates::month_key(&self.date)
    }

    /// Pretty-printed JSON with two-space indentation and fields in
    /// canonical order.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Accept the amount either as a JSON string or a JSON number, keeping text.
fn amount_as_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "transaction_amount must be a string or number, got {}",
            other
        ))),
    }
}

/// Outcome of comparing the number of debit and credit transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeBalance {
    /// More debits than credits.
    Debit,
    /// More credits than debits.
    Credit,
    /// Same number of each.
    Equal,
}

impl TypeBalance {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeBalance::Debit => "debit",
            TypeBalance::Credit => "credit",
            TypeBalance::Equal => "equal",
        }
    }
}

impl fmt::Display for TypeBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments for the parameterised queries of the analysis report.
///
/// `None` lookups are filled in from the loaded data when the report is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportQueries {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub transaction_type: String,
    pub merchant: Option<String>,
    pub transaction_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub before_date: Option<String>,
    pub min_amount: f64,
    pub max_amount: f64,
}

impl Default for ReportQueries {
    fn default() -> Self {
        Self {
            year: None,
            month: None,
            day: None,
            transaction_type: "debit".to_string(),
            merchant: None,
            transaction_id: None,
            date_from: None,
            date_to: None,
            before_date: None,
            min_amount: 0.0,
            max_amount: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction::new(
            "tx-1",
            "2019-01-15",
            "45.99",
            "debit",
            "Coffee beans",
            "Roastery",
            "visa",
        )
    }

    // ── construction ─────────────────────────────────────────────────────────

    #[test]
    fn test_from_value_uses_source_keys() {
        let value = serde_json::json!({
            "transaction_id": "tx-9",
            "transaction_date": "2019-02-01",
            "transaction_amount": "75.00",
            "transaction_type": "credit",
            "transaction_description": "Refund",
            "merchant_name": "Bookshop",
            "card_type": "mastercard"
        });
        let tx = Transaction::from_value(value).unwrap();
        assert_eq!(tx.id(), "tx-9");
        assert_eq!(tx.date(), "2019-02-01");
        assert_eq!(tx.amount(), "75.00");
        assert_eq!(tx.transaction_type(), "credit");
        assert_eq!(tx.description(), "Refund");
        assert_eq!(tx.merchant(), "Bookshop");
        assert_eq!(tx.card_type(), "mastercard");
    }

    #[test]
    fn test_from_value_accepts_numeric_amount() {
        let value = serde_json::json!({
            "transaction_id": "tx-2",
            "transaction_date": "2019-02-01",
            "transaction_amount": 12.5,
            "transaction_type": "debit",
            "transaction_description": "",
            "merchant_name": "",
            "card_type": ""
        });
        let tx = Transaction::from_value(value).unwrap();
        assert_eq!(tx.amount(), "12.5");
    }

    #[test]
    fn test_from_value_missing_field_is_error() {
        let value = serde_json::json!({ "transaction_id": "tx-3" });
        assert!(Transaction::from_value(value).is_err());
    }

    #[test]
    fn test_fields_stored_verbatim() {
        let tx = Transaction::new("a", " not a date ", "abc", "DEBIT", "", "", "");
        assert_eq!(tx.date(), " not a date ");
        assert_eq!(tx.amount(), "abc");
        assert_eq!(tx.transaction_type(), "DEBIT");
    }

    // ── parsing helpers ──────────────────────────────────────────────────────

    #[test]
    fn test_parsed_amount() {
        assert!((sample().parsed_amount().unwrap() - 45.99).abs() < 1e-9);
        let negative = Transaction::new("n", "2019-01-01", " -3.5 ", "credit", "", "", "");
        assert!((negative.parsed_amount().unwrap() + 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_parsed_amount_rejects_non_numeric() {
        for bad in ["", "12abc", "NaN", "inf", "1,000"] {
            let tx = Transaction::new("bad", "2019-01-01", bad, "debit", "", "", "");
            assert!(
                matches!(tx.parsed_amount(), Err(AnalyzerError::MalformedAmount { ref id, .. }) if id == "bad"),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_month_key() {
        assert_eq!(sample().month_key(), "2019-01");
    }

    // ── textual form ─────────────────────────────────────────────────────────

    #[test]
    fn test_pretty_json_field_order_and_indent() {
        let json = sample().to_pretty_json().unwrap();
        let expected = "{\n  \"transaction_id\": \"tx-1\",\n  \"transaction_date\": \"2019-01-15\",\n  \"transaction_amount\": \"45.99\",\n  \"transaction_type\": \"debit\",\n  \"transaction_description\": \"Coffee beans\",\n  \"merchant_name\": \"Roastery\",\n  \"card_type\": \"visa\"\n}";
        assert_eq!(json, expected);
        assert_eq!(sample().to_string(), expected);
    }

    #[test]
    fn test_serialised_form_reads_back() {
        let json = sample().to_pretty_json().unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }

    // ── TypeBalance ──────────────────────────────────────────────────────────

    #[test]
    fn test_type_balance_display() {
        assert_eq!(TypeBalance::Debit.to_string(), "debit");
        assert_eq!(TypeBalance::Credit.to_string(), "credit");
        assert_eq!(TypeBalance::Equal.to_string(), "equal");
        assert_eq!(serde_json::to_string(&TypeBalance::Equal).unwrap(), "\"equal\"");
    }

    #[test]
    fn test_report_queries_default() {
        let q = ReportQueries::default();
        assert_eq!(q.transaction_type, "debit");
        assert_eq!(q.min_amount, 0.0);
        assert_eq!(q.max_amount, 1000.0);
        assert!(q.merchant.is_none());
    }
}
