//! Core types for the transaction analyzer.
//!
//! Holds the transaction record, the error type, date parsing, number
//! formatting and command-line settings shared by the data layer and the
//! binary.

pub mod dates;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{AnalyzerError, Result};
pub use models::{ReportQueries, Transaction, TypeBalance};
