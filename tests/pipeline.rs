//! Integration tests for edgequake-pdf2csv.
//!
//! These drive the public API end to end over in-memory detector output and
//! the sample dumps in `./test_cases/`. No network access is needed.
//!
//! Run with:
//!   cargo test --test pipeline -- --nocapture

use edgequake_pdf2csv::{
    extract, extract_from_bytes, extract_from_source, extract_sync, extract_to_file,
    render_or_signal, ExtractError, ExtractionConfig, ExtractionOutput,
    ExtractionProgressCallback, JsonTableSource, OutputFormat, OutputVariant, PageSelection,
    RawTable, Value,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

fn statement_path() -> String {
    test_cases_dir()
        .join("statement.tables.json")
        .to_string_lossy()
        .into_owned()
}

fn normalized(year: i32) -> ExtractionConfig {
    ExtractionConfig::builder()
        .variant(OutputVariant::Normalized)
        .default_year(year)
        .build()
        .unwrap()
}

fn coffee_shop() -> JsonTableSource {
    JsonTableSource::from_pages(vec![vec![RawTable::from(vec![
        vec![Some("Date"), Some("Description"), Some("Amount")],
        vec![Some("2025-01-03"), Some("Coffee Shop"), Some("-4.50")],
    ])]])
}

// ── In-memory sources ────────────────────────────────────────────────────────

#[test]
fn test_coffee_shop_normalized_json() {
    let out = extract_from_source(&coffee_shop(), &normalized(2025)).unwrap();
    let v: serde_json::Value = serde_json::from_str(&out.to_json().unwrap()).unwrap();
    assert_eq!(
        v,
        json!({
            "rows": 1,
            "columns": ["Date", "Description", "Amount"],
            "data": [{"Date": "2025-01-03", "Description": "Coffee Shop", "Amount": -4.5}]
        })
    );
}

#[test]
fn test_coffee_shop_flat_keeps_header_row() {
    let out = extract_from_source(&coffee_shop(), &ExtractionConfig::default()).unwrap();
    assert_eq!(
        out.to_csv().unwrap().unwrap(),
        "Date,Description,Amount\n2025-01-03,Coffee Shop,-4.50\n"
    );
}

#[test]
fn test_zero_tables_reports_zero_rows_for_both_variants() {
    let source = JsonTableSource::from_pages(vec![vec![], vec![]]);

    let flat = extract_from_source(&source, &ExtractionConfig::default()).unwrap();
    assert_eq!(flat.rows(), 0);
    assert_eq!(
        render_or_signal(&flat, OutputFormat::Csv).unwrap(),
        r#"{"rows":0,"message":"no tables found"}"#
    );

    let norm = extract_from_source(&source, &normalized(2025)).unwrap();
    assert_eq!(norm.rows(), 0);
    assert_eq!(render_or_signal(&norm, OutputFormat::Csv).unwrap(), "");
}

#[test]
fn test_flat_csv_pads_across_tables() {
    let source = JsonTableSource::from_pages(vec![
        vec![RawTable::from(vec![vec![Some("a"), Some("b"), Some("c")]])],
        vec![RawTable::from(vec![vec![Some("d"), None]])],
    ]);
    let out = extract_from_source(&source, &ExtractionConfig::default()).unwrap();
    assert_eq!(out.to_csv().unwrap().unwrap(), "a,b,c\nd,,\n");

    let ExtractionOutput::Flat(flat) = out else {
        panic!("expected flat output");
    };
    assert_eq!(flat.data[1], vec!["d".to_string(), String::new()]);
}

#[test]
fn test_headers_unify_across_pages() {
    let source = JsonTableSource::from_pages(vec![
        vec![RawTable::from(vec![
            vec![Some("Txn Date"), Some("Memo"), Some("Amount")],
            vec![Some("Mar 2"), Some("Rent"), Some("(950.00)")],
        ])],
        vec![RawTable::from(vec![
            vec![Some("Date"), Some("Details"), Some("Amount ($)")],
            vec![Some("3/4"), Some("Groceries"), Some("$82.10")],
        ])],
    ]);
    let ExtractionOutput::Normalized(out) = extract_from_source(&source, &normalized(2024)).unwrap()
    else {
        panic!("expected normalized output");
    };
    assert_eq!(out.columns, vec!["Date", "Description", "Amount"]);
    assert_eq!(out.rows, 2);
    assert_eq!(out.get(0, "Date"), Some(&Value::Text("2024-03-02".into())));
    assert_eq!(out.get(0, "Amount"), Some(&Value::Number(-950.0)));
    assert_eq!(out.get(1, "Date"), Some(&Value::Text("2024-03-04".into())));
    assert_eq!(out.get(1, "Amount"), Some(&Value::Number(82.1)));
}

#[test]
fn test_progress_callback_sees_every_page() {
    #[derive(Default)]
    struct Counter {
        pages: AtomicUsize,
        errors: AtomicUsize,
        rows: AtomicUsize,
    }

    impl ExtractionProgressCallback for Counter {
        fn on_page_complete(&self, _page_num: usize, _total_pages: usize, _tables: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
        }
        fn on_page_error(&self, _page_num: usize, _total_pages: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
        fn on_extraction_complete(&self, _total_pages: usize, rows: usize) {
            self.rows.store(rows, Ordering::SeqCst);
        }
    }

    let mut source = coffee_shop();
    source.push_failed_page("detector crashed");

    let counter = Arc::new(Counter::default());
    let config = ExtractionConfig::builder()
        .progress_callback(counter.clone())
        .build()
        .unwrap();
    let out = extract_from_source(&source, &config).unwrap();

    assert_eq!(out.rows(), 2);
    assert_eq!(counter.pages.load(Ordering::SeqCst), 2);
    assert_eq!(counter.errors.load(Ordering::SeqCst), 1);
    assert_eq!(counter.rows.load(Ordering::SeqCst), 2);
}

// ── Sample dumps on disk ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_statement_normalized() {
    let out = extract(statement_path(), &normalized(2025)).await.unwrap();
    let ExtractionOutput::Normalized(out) = out else {
        panic!("expected normalized output");
    };

    assert_eq!(
        out.columns,
        vec!["Date", "Description", "Amount", "Debit", "Credit", "Balance"]
    );
    assert_eq!(out.rows, 3);

    assert_eq!(out.get(0, "Date"), Some(&Value::Text("2025-01-03".into())));
    assert_eq!(out.get(0, "Amount"), Some(&Value::Number(-4.5)));
    assert_eq!(out.get(0, "Debit"), Some(&Value::Text("4.50".into())));
    assert_eq!(out.get(1, "Date"), Some(&Value::Text("2025-01-05".into())));
    assert_eq!(out.get(1, "Amount"), Some(&Value::Number(1200.0)));
    assert_eq!(out.get(2, "Amount"), Some(&Value::Number(10.0)));
    assert_eq!(out.get(2, "Balance"), Some(&Value::Number(2405.5)));

    assert_eq!(
        out.to_csv().unwrap(),
        "Date,Description,Amount,Debit,Credit,Balance\n\
         2025-01-03,Coffee Shop,-4.5,4.50,,1195.5\n\
         2025-01-05,Payroll,1200,,\"$1,200.00\",2395.5\n\
         2025-01-09,Refund,10,(10.00),,2405.5\n"
    );
}

#[test]
fn test_statement_flat_sync() {
    let out = extract_sync(statement_path(), &ExtractionConfig::default()).unwrap();
    assert_eq!(out.rows(), 6);
    assert_eq!(
        out.to_csv().unwrap().unwrap(),
        "Posting Date,Description,Debit,Credit,Balance\n\
         01/03/2025,Coffee Shop,4.50,,\"1,195.50\"\n\
         Jan 5,Payroll,,\"$1,200.00\",\"2,395.50\"\n\
         Posting Date,Description,Debit,Credit,Balance\n\
         2025-01-09,Refund,(10.00),,\"2,405.50\"\n\
         Total,\"2,405.50\",,,\n"
    );
}

#[test]
fn test_statement_page_selection() {
    let config = ExtractionConfig::builder()
        .pages(PageSelection::Set(vec![2, 3]))
        .build()
        .unwrap();
    let out = extract_sync(statement_path(), &config).unwrap();
    assert_eq!(out.rows(), 3);
}

#[test]
fn test_extract_from_bytes() {
    let bytes = std::fs::read(test_cases_dir().join("statement.tables.json")).unwrap();
    let out = extract_from_bytes(&bytes, &normalized(2025)).unwrap();
    assert_eq!(out.rows(), 3);
}

#[test]
fn test_malformed_dump_is_fatal() {
    let err = extract_from_bytes(br#"{"rows": 3}"#, &ExtractionConfig::default()).unwrap_err();
    assert!(matches!(err, ExtractError::MalformedTables { .. }));
}

#[test]
fn test_missing_input_is_fatal() {
    let err = tokio_test::block_on(extract(
        "/no/such/statement.tables.json",
        &ExtractionConfig::default(),
    ))
    .unwrap_err();
    assert!(matches!(err, ExtractError::FileNotFound { .. }));
}

// ── Writing to disk ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_extract_to_file_json() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("nested/statement.json");
    let config = ExtractionConfig::builder()
        .variant(OutputVariant::Normalized)
        .format(OutputFormat::Json)
        .default_year(2025)
        .build()
        .unwrap();

    let rows = extract_to_file(statement_path(), &out_path, &config).await.unwrap();
    assert_eq!(rows, 3);

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(written["rows"], json!(3));
    assert_eq!(written["data"][1]["Date"], json!("2025-01-05"));
    assert_eq!(written["data"][1]["Credit"], json!("$1,200.00"));
    assert!(!out_path.with_extension("tmp").exists());
}

#[tokio::test]
async fn test_extract_to_file_without_tables_writes_signal() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.tables.json");
    std::fs::write(&input, "[[], []]").unwrap();
    let out_path = dir.path().join("out.csv");

    let rows = extract_to_file(input.to_string_lossy(), &out_path, &ExtractionConfig::default())
        .await
        .unwrap();
    assert_eq!(rows, 0);
    assert_eq!(
        std::fs::read_to_string(&out_path).unwrap(),
        r#"{"rows":0,"message":"no tables found"}"#
    );
}

#[test]
fn test_null_pages_and_tables_do_not_abort() {
    let dump = br#"[null, [null, [["Date", "Amount"], ["2025-01-03T10:22:00Z", "(12.00)"]]]]"#;
    let out = extract_from_bytes(dump, &normalized(2025)).unwrap();
    let ExtractionOutput::Normalized(out) = out else {
        panic!("expected normalized output");
    };
    assert_eq!(out.rows, 1);
    assert_eq!(out.get(0, "Date"), Some(&Value::Text("2025-01-03".into())));
    assert_eq!(out.get(0, "Amount"), Some(&Value::Number(-12.0)));
}
