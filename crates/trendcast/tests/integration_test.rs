//! Integration tests for Trendcast.

use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use chrono::{Duration, NaiveDate};
use trendcast::{
    Cell, ForecastAdapter, ForecastOptions, ForecastTable, HorizonUnit, MockAdapter, ParserConfig,
    SchemaProber, StorageKind, Trendcast, TrendcastConfig, TrendcastError, prepare,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

/// 52 weekly rows of `Week,Revenue`, newest first.
fn weekly_revenue_csv() -> String {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let mut content = String::from("Week,Revenue\n");
    for i in (0..52).rev() {
        let week = start + Duration::weeks(i);
        content.push_str(&format!("{},{}\n", week.format("%Y-%m-%d"), 1000 + i * 10));
    }
    content
}

// =============================================================================
// Loading and Detection
// =============================================================================

#[test]
fn test_load_detects_columns() {
    let file = create_test_file(&weekly_revenue_csv());

    let trendcast = Trendcast::new();
    let loaded = trendcast.load(file.path()).expect("Load failed");

    assert_eq!(loaded.source.format, "csv");
    assert_eq!(loaded.source.row_count, 52);
    assert_eq!(loaded.source.column_count, 2);
    assert!(loaded.source.hash.starts_with("sha256:"));
    assert_eq!(loaded.suggestion.date_column.as_deref(), Some("Week"));
    assert_eq!(loaded.suggestion.numeric_columns, vec!["Revenue"]);
}

#[test]
fn test_load_tsv_with_null_tokens() {
    let content = "date\tunits\tnote\n\
                   2024-01-01\t5\tok\n\
                   2024-01-02\tNA\t\n\
                   2024-01-03\t7\tlate\n";
    let file = create_test_file(content);

    let loaded = Trendcast::new().load(file.path()).expect("Load failed");
    assert_eq!(loaded.source.format, "tsv");
    assert_eq!(loaded.suggestion.date_column.as_deref(), Some("date"));
    assert_eq!(loaded.suggestion.numeric_columns, vec!["units"]);
}

#[test]
fn test_threshold_from_config() {
    // 4 of 5 dates parse: 0.8
    let content = "when,qty\n2024-01-01,1\n2024-01-02,2\n2024-01-03,3\n2024-01-04,4\nsoon,5\n";
    let file = create_test_file(content);

    let loaded = Trendcast::new().load(file.path()).unwrap();
    assert_eq!(loaded.suggestion.date_column.as_deref(), Some("when"));

    let mut config = TrendcastConfig::default();
    config.prober.date_threshold = 0.81;
    let loaded = Trendcast::with_config(config).load(file.path()).unwrap();
    assert_eq!(loaded.suggestion.date_column, None);
}

#[test]
fn test_load_missing_file() {
    let result = Trendcast::new().load("/nonexistent/sales.csv");
    assert!(matches!(result, Err(TrendcastError::Io { .. })));
}

// =============================================================================
// Workbooks
// =============================================================================

/// Two sheets. `Sales` holds six weekly date cells from 2024-01-07, a `Sales`
/// column with `NA` and `#N/A` strings, a second `Sales` column and an
/// unlabeled note column. `Regions` holds three `Region,Units` rows.
fn workbook_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/weekly_sales.xlsx")
}

fn sheet_config(sheet: &str) -> TrendcastConfig {
    TrendcastConfig {
        parser: ParserConfig::default().with_sheet(sheet),
        ..TrendcastConfig::default()
    }
}

#[test]
fn test_workbook_reads_first_sheet() {
    let loaded = Trendcast::new().load(workbook_fixture()).expect("Load failed");

    assert_eq!(loaded.source.format, "xlsx");
    assert_eq!(loaded.source.sheet_names, vec!["Sales", "Regions"]);
    assert_eq!(loaded.source.sheet.as_deref(), Some("Sales"));
    assert_eq!(loaded.source.row_count, 6);
    assert_eq!(
        loaded.table.column_names(),
        vec!["Week", "Sales", "Sales.1", "Unnamed: 3"]
    );
}

#[test]
fn test_workbook_date_cells_are_native() {
    let loaded = Trendcast::new().load(workbook_fixture()).unwrap();

    let week = loaded.table.column("Week").unwrap();
    assert_eq!(week[0], Cell::from(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()));
    assert_eq!(week[5], Cell::from(NaiveDate::from_ymd_opt(2024, 2, 11).unwrap()));
    assert_eq!(loaded.source.columns[0].storage, StorageKind::Temporal);
    assert_eq!(loaded.source.date_columns, vec!["Week"]);
}

#[test]
fn test_workbook_null_strings_stay_numeric() {
    let loaded = Trendcast::new().load(workbook_fixture()).unwrap();

    assert_eq!(loaded.table.column("Sales").unwrap()[1], Cell::Missing);
    assert_eq!(loaded.suggestion.date_column.as_deref(), Some("Week"));
    assert_eq!(loaded.suggestion.numeric_columns, vec!["Sales", "Sales.1"]);

    let (series, report) = trendcast::prepare_with_report(&loaded.table, "Week", "Sales").unwrap();
    assert_eq!(series.len(), 4);
    assert_eq!(report.invalid_values, 2);
    assert_eq!(series.values().collect::<Vec<_>>(), vec![120.5, 131.0, 128.25, 140.0]);
}

#[test]
fn test_workbook_sheet_selection() {
    let loaded = Trendcast::with_config(sheet_config("Regions"))
        .load(workbook_fixture())
        .unwrap();

    assert_eq!(loaded.source.sheet.as_deref(), Some("Regions"));
    assert_eq!(loaded.table.column_names(), vec!["Region", "Units"]);
    assert_eq!(loaded.table.row_count(), 3);
    assert_eq!(loaded.suggestion.date_column, None);
    assert_eq!(loaded.suggestion.numeric_columns, vec!["Units"]);
}

#[test]
fn test_workbook_unknown_sheet() {
    let result = Trendcast::with_config(sheet_config("Q9")).load(workbook_fixture());

    match result {
        Err(TrendcastError::Config(message)) => {
            assert!(message.contains("Sheet 'Q9' not found"));
            assert!(message.contains("Sales, Regions"));
        }
        other => panic!("expected config error, got {:?}", other.map(|l| l.source)),
    }
}

// =============================================================================
// Normalization
// =============================================================================

#[test]
fn test_weekly_rows_prepare_sorted() {
    let file = create_test_file(&weekly_revenue_csv());
    let loaded = Trendcast::new().load(file.path()).unwrap();

    let series = prepare(&loaded.table, "Week", "Revenue").expect("Prepare failed");
    assert_eq!(series.len(), 52);
    let timestamps: Vec<_> = series.timestamps().collect();
    assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(series.first().unwrap().value, 1000.0);
}

#[test]
fn test_unknown_value_column_names_it() {
    let file = create_test_file(&weekly_revenue_csv());
    let loaded = Trendcast::new().load(file.path()).unwrap();

    let err = prepare(&loaded.table, "Week", "DoesNotExist").unwrap_err();
    match &err {
        TrendcastError::Schema { missing, .. } => assert_eq!(missing, &vec!["DoesNotExist".to_string()]),
        other => panic!("expected schema error, got {:?}", other),
    }
    assert!(err.to_string().contains("DoesNotExist"));
}

#[test]
fn test_bad_rows_are_dropped() {
    let content = "Date,Sales\n\
                   2024-01-10,10\n\
                   not a date,11\n\
                   2024-01-03,12\n\
                   2024-01-08,abc\n\
                   2024-01-01,14\n\
                   ,15\n\
                   2024-01-05,16\n\
                   2024-01-02,17\n\
                   2024-01-09,18\n\
                   2024-01-04,19\n";
    let file = create_test_file(content);
    let loaded = Trendcast::new().load(file.path()).unwrap();

    // Sales holds 'abc' so it is not suggested, but may still be chosen
    assert!(loaded.suggestion.numeric_columns.is_empty());

    let series = prepare(&loaded.table, "Date", "Sales").unwrap();
    assert!(series.len() <= 7);
    assert_eq!(series.len(), 7);
    let timestamps: Vec<_> = series.timestamps().collect();
    assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(series.values().collect::<Vec<_>>(), vec![14.0, 17.0, 12.0, 19.0, 16.0, 18.0, 10.0]);
}

#[test]
fn test_prepare_is_idempotent() {
    let file = create_test_file(&weekly_revenue_csv());
    let loaded = Trendcast::new().load(file.path()).unwrap();

    let once = prepare(&loaded.table, "Week", "Revenue").unwrap();
    assert_eq!(once, prepare(&loaded.table, "Week", "Revenue").unwrap());

    let mut out = Vec::new();
    once.write_csv(&mut out).unwrap();

    let rewritten = create_test_file(std::str::from_utf8(&out).unwrap());
    let reloaded = Trendcast::new().load(rewritten.path()).unwrap();
    let twice = prepare(&reloaded.table, "timestamp", "value").unwrap();

    assert_eq!(once, twice);
}

// =============================================================================
// Pipeline
// =============================================================================

#[test]
fn test_pipeline_with_mock_adapter() {
    let file = create_test_file(&weekly_revenue_csv());

    let mut config = TrendcastConfig::default();
    config.forecast = ForecastOptions::default().with_horizon(12, HorizonUnit::Week);
    let trendcast = Trendcast::with_config(config);

    let loaded = trendcast.load(file.path()).unwrap();
    let choice = trendcast.select(&loaded, None, None).unwrap();
    let run = trendcast.forecast(&MockAdapter::new(), &loaded, choice).unwrap();

    assert_eq!(run.series.len(), 52);
    assert_eq!(run.forecast.len(), 64);

    let last = run.series.last().unwrap().timestamp;
    let future = run.forecast.future(last);
    assert_eq!(future.len(), 12);
    // Revenue grows by 10 a week
    assert!((future.rows[0].yhat - 1520.0).abs() < 1e-6);
}

#[test]
fn test_header_only_file_fails_before_adapter() {
    let file = create_test_file("Week,Revenue\n");
    let trendcast = Trendcast::new();

    let loaded = trendcast.load(file.path()).unwrap();
    assert_eq!(loaded.source.row_count, 0);
    assert_eq!(loaded.suggestion.date_column, None);

    let choice = trendcast.select(&loaded, Some("Week"), Some("Revenue")).unwrap();
    let result = trendcast.forecast(&MockAdapter::new(), &loaded, choice);
    assert!(matches!(result, Err(TrendcastError::EmptySeries(_))));
}

#[test]
fn test_forecast_csv_round_trip() {
    let file = create_test_file(&weekly_revenue_csv());
    let loaded = Trendcast::new().load(file.path()).unwrap();
    let series = prepare(&loaded.table, "Week", "Revenue").unwrap();

    let options = ForecastOptions::default().with_seed(42);
    let (_, forecast) = MockAdapter::with_jitter(0.1)
        .fit_and_forecast(&series, &options)
        .unwrap();

    let mut out = NamedTempFile::new().unwrap();
    forecast.write_csv(out.as_file_mut()).unwrap();

    let reread = ForecastTable::from_csv(std::fs::File::open(out.path()).unwrap()).unwrap();
    assert_eq!(reread.len(), forecast.len());
    assert_eq!(
        reread.point_estimates().collect::<Vec<_>>(),
        forecast.point_estimates().collect::<Vec<_>>()
    );
    assert_eq!(reread, forecast);
}

#[test]
fn test_prober_on_loaded_table() {
    let content = "id,label,amount\n1,a,2.5\n2,b,3.5\n3,c,\n";
    let file = create_test_file(content);
    let loaded = Trendcast::new().load(file.path()).unwrap();

    let prober = SchemaProber::new();
    assert_eq!(prober.detect_date_column(&loaded.table), None);
    assert_eq!(prober.detect_numeric_columns(&loaded.table, &["id"]), vec!["amount"]);
}
