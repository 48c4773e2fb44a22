//! Data layer for the transaction analyzer.
//!
//! Loads transaction files, holds them in the in-memory [`analyzer`],
//! aggregates them by month and runs the top-level report pipeline.

pub mod aggregator;
pub mod analysis;
pub mod analyzer;
pub mod reader;

pub use analyzer::TransactionAnalyzer;
