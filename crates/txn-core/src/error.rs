use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the transaction analyzer.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file was read but its contents could not be turned into
    /// transactions. `source` is the underlying parse error.
    #[error("Failed to load {path}: {source}")]
    FileParse {
        path: PathBuf,
        #[source]
        source: Box<AnalyzerError>,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A record in the input did not have the expected shape.
    ///
    /// `record` is the 1-based position in a JSON array, or the line number
    /// in a JSONL file.
    #[error("Invalid transaction record #{record}: {source}")]
    InvalidRecord {
        record: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A JSON document was neither an array nor a `transactions` wrapper.
    #[error("Unsupported document shape: expected an array of transactions or an object with a \"transactions\" array")]
    UnsupportedDocument,

    /// A transaction amount could not be parsed as a number.
    #[error("Malformed amount {amount:?} on transaction {id}")]
    MalformedAmount { id: String, amount: String },

    /// A date string did not match any recognised format.
    #[error("Unparseable date: {0:?}")]
    UnparseableDate(String),

    /// A year/month/day filter component is outside its valid range.
    #[error("Invalid {component} value: {value}")]
    InvalidDateComponent {
        component: &'static str,
        value: i64,
    },

    /// An average was requested over zero transactions.
    #[error("Cannot compute {0} of an empty transaction collection")]
    EmptyCollection(&'static str),

    /// A month ranking was requested but no transactions qualified.
    #[error("No transactions to rank by month (scope: {0})")]
    NoMonthData(&'static str),

    /// The given data path does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No transaction files were found under the given directory.
    #[error("No transaction files found in {0}")]
    NoDataFiles(PathBuf),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the analyzer crates.
pub type Result<T> = std::result::Result<T, AnalyzerError>;
