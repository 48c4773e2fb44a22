//! Transaction file discovery and loading.
//!
//! Accepts a single `.json` / `.jsonl` file or a directory tree of them and
//! turns the raw mappings into [`Transaction`] values, preserving file order.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde_json::Value;
use txn_core::error::{AnalyzerError, Result};
use txn_core::models::Transaction;
use tracing::{debug, info};

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.json` and `.jsonl` files recursively under `dir`, sorted by path.
pub fn find_transaction_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_transaction_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load every transaction reachable from `path`.
///
/// A file is parsed according to its extension (`.jsonl` line by line,
/// anything else as one JSON document). A directory is scanned with
/// [`find_transaction_files`] and the files are concatenated in path order.
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    if !path.exists() {
        return Err(AnalyzerError::DataPathNotFound(path.to_path_buf()));
    }

    if path.is_file() {
        let transactions = load_file(path)?;
        info!(
            "Loaded {} transactions from {}",
            transactions.len(),
            path.display()
        );
        return Ok(transactions);
    }

    let files = find_transaction_files(path);
    if files.is_empty() {
        return Err(AnalyzerError::NoDataFiles(path.to_path_buf()));
    }

    let mut all = Vec::new();
    for file in &files {
        all.extend(load_file(file)?);
    }

    info!(
        "Loaded {} transactions from {} files under {}",
        all.len(),
        files.len(),
        path.display()
    );
    Ok(all)
}

/// Parse a JSON document holding transactions.
///
/// The document is either a top-level array of transaction mappings or an
/// object whose `transactions` field is such an array.
pub fn parse_json_document(content: &str) -> Result<Vec<Transaction>> {
    let document: Value = serde_json::from_str(content)?;
    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("transactions") {
            Some(Value::Array(items)) => items,
            _ => return Err(AnalyzerError::UnsupportedDocument),
        },
        _ => return Err(AnalyzerError::UnsupportedDocument),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<Transaction>(item)
                .map_err(|source| AnalyzerError::InvalidRecord { record: i + 1, source })
        })
        .collect()
}

/// Parse JSONL content: one transaction mapping per non-blank line.
pub fn parse_jsonl<R: BufRead>(reader: R) -> Result<Vec<Transaction>> {
    let mut transactions = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let tx: Transaction = serde_json::from_str(trimmed)
            .map_err(|source| AnalyzerError::InvalidRecord { record: i + 1, source })?;
        transactions.push(tx);
    }

    Ok(transactions)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn is_transaction_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == "json" || ext == "jsonl")
        .unwrap_or(false)
}

fn is_jsonl(path: &Path) -> bool {
    path.extension().map(|ext| ext == "jsonl").unwrap_or(false)
}

/// Read and parse one file. Parse errors are wrapped in
/// [`AnalyzerError::FileParse`] so the failing file is named.
fn load_file(path: &Path) -> Result<Vec<Transaction>> {
    let file_error = |source: std::io::Error| AnalyzerError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let parse_error = |source: AnalyzerError| AnalyzerError::FileParse {
        path: path.to_path_buf(),
        source: Box::new(source),
    };

    let transactions = if is_jsonl(path) {
        let file = std::fs::File::open(path).map_err(file_error)?;
        parse_jsonl(std::io::BufReader::new(file)).map_err(parse_error)?
    } else {
        let content = std::fs::read_to_string(path).map_err(file_error)?;
        parse_json_document(&content).map_err(parse_error)?
    };

    debug!("File {}: {} transactions", path.display(), transactions.len());
    Ok(transactions)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn record(id: &str, date: &str, amount: &str) -> String {
        format!(
            r#"{{"transaction_id":"{id}","transaction_date":"{date}","transaction_amount":"{amount}","transaction_type":"debit","transaction_description":"d","merchant_name":"m","card_type":"visa"}}"#
        )
    }

    // ── parse_json_document ───────────────────────────────────────────────────

    #[test]
    fn test_parse_top_level_array() {
        let content = format!("[{},{}]", record("a", "2019-01-01", "1"), record("b", "2019-01-02", "2"));
        let txs = parse_json_document(&content).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].id(), "a");
        assert_eq!(txs[1].id(), "b");
    }

    #[test]
    fn test_parse_wrapped_array() {
        let content = format!(r#"{{"transactions":[{}]}}"#, record("a", "2019-01-01", "1"));
        let txs = parse_json_document(&content).unwrap();
        assert_eq!(txs.len(), 1);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_json_document("[]").unwrap().is_empty());
        assert!(parse_json_document(r#"{"transactions": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_unsupported_shapes() {
        assert!(matches!(
            parse_json_document(r#"{"items": []}"#),
            Err(AnalyzerError::UnsupportedDocument)
        ));
        assert!(matches!(
            parse_json_document("42"),
            Err(AnalyzerError::UnsupportedDocument)
        ));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_json_document("[{"),
            Err(AnalyzerError::JsonParse(_))
        ));
    }

    #[test]
    fn test_parse_reports_bad_record_position() {
        let content = format!(r#"[{}, {{"transaction_id": "x"}}]"#, record("a", "2019-01-01", "1"));
        assert!(matches!(
            parse_json_document(&content),
            Err(AnalyzerError::InvalidRecord { record: 2, .. })
        ));
    }

    // ── parse_jsonl ───────────────────────────────────────────────────────────

    #[test]
    fn test_parse_jsonl_skips_blank_lines() {
        let content = format!(
            "{}\n\n   \n{}\n",
            record("a", "2019-01-01", "1"),
            record("b", "2019-01-02", "2")
        );
        let txs = parse_jsonl(content.as_bytes()).unwrap();
        let ids: Vec<&str> = txs.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_jsonl_bad_line_number() {
        let content = format!("{}\nnot json\n", record("a", "2019-01-01", "1"));
        assert!(matches!(
            parse_jsonl(content.as_bytes()),
            Err(AnalyzerError::InvalidRecord { record: 2, .. })
        ));
    }

    // ── find_transaction_files ────────────────────────────────────────────────

    #[test]
    fn test_find_files_recursive_and_sorted() {
        let tmp = TempDir::new().expect("tempdir");
        fs::create_dir_all(tmp.path().join("2019")).unwrap();
        fs::write(tmp.path().join("b.json"), "[]").unwrap();
        fs::write(tmp.path().join("2019").join("a.jsonl"), "").unwrap();
        fs::write(tmp.path().join("notes.txt"), "ignore me").unwrap();

        let files = find_transaction_files(tmp.path());
        assert_eq!(
            files,
            vec![tmp.path().join("2019").join("a.jsonl"), tmp.path().join("b.json")]
        );
    }

    // ── load_transactions ─────────────────────────────────────────────────────

    #[test]
    fn test_load_single_json_file() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("transactions.json");
        fs::write(
            &path,
            format!("[{},{}]", record("a", "2019-01-01", "1"), record("b", "2019-02-01", "2")),
        )
        .unwrap();

        let txs = load_transactions(&path).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[1].date(), "2019-02-01");
    }

    #[test]
    fn test_load_directory_concatenates_in_path_order() {
        let tmp = TempDir::new().expect("tempdir");
        fs::write(tmp.path().join("02.json"), format!("[{}]", record("second", "2019-02-01", "2")))
            .unwrap();
        fs::write(tmp.path().join("01.jsonl"), record("first", "2019-01-01", "1")).unwrap();

        let txs = load_transactions(tmp.path()).unwrap();
        let ids: Vec<&str> = txs.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_load_directory_names_failing_file() {
        let tmp = TempDir::new().expect("tempdir");
        fs::write(tmp.path().join("01.json"), format!("[{}]", record("a", "2019-01-01", "1")))
            .unwrap();
        let bad = tmp.path().join("02.jsonl");
        fs::write(&bad, format!("{}\n{{oops\n", record("b", "2019-02-01", "2"))).unwrap();

        let err = load_transactions(tmp.path()).unwrap_err();
        match &err {
            AnalyzerError::FileParse { path, source } => {
                assert_eq!(path, &bad);
                assert!(matches!(**source, AnalyzerError::InvalidRecord { record: 2, .. }));
            }
            other => panic!("expected FileParse, got {other:?}"),
        }
        assert!(err.to_string().contains("02.jsonl"));
    }

    #[test]
    fn test_load_malformed_document_names_file() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("broken.json");
        fs::write(&path, "[{").unwrap();

        assert!(matches!(
            load_transactions(&path),
            Err(AnalyzerError::FileParse { path: ref p, ref source })
                if p == &path && matches!(**source, AnalyzerError::JsonParse(_))
        ));
    }

    #[test]
    fn test_load_missing_path() {
        let tmp = TempDir::new().expect("tempdir");
        let missing = tmp.path().join("nope.json");
        assert!(matches!(
            load_transactions(&missing),
            Err(AnalyzerError::DataPathNotFound(p)) if p == missing
        ));
    }

    #[test]
    fn test_load_empty_directory() {
        let tmp = TempDir::new().expect("tempdir");
        assert!(matches!(
            load_transactions(tmp.path()),
            Err(AnalyzerError::NoDataFiles(_))
        ));
    }
}
