use std::sync::{Arc, Mutex};

use places_enrichment::EnrichmentError;
use places_enrichment::ingestion::csv::{read_csv_with_schema, reader_with_separator};
use places_enrichment::ingestion::{read_source_table, ReadOptions, SourceTable};
use places_enrichment::observability::{
    EnrichmentContext, EnrichmentObserver, EnrichmentSeverity, EnrichmentStage, EnrichmentStats,
};
use places_enrichment::types::{DataType, Field, Schema, Value};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(EnrichmentStage, usize)>>,
    failures: Mutex<Vec<EnrichmentSeverity>>,
    alerts: Mutex<Vec<EnrichmentSeverity>>,
}

impl EnrichmentObserver for RecordingObserver {
    fn on_success(&self, ctx: &EnrichmentContext, stats: EnrichmentStats) {
        self.successes.lock().unwrap().push((ctx.stage, stats.rows));
    }

    fn on_failure(&self, _ctx: &EnrichmentContext, severity: EnrichmentSeverity, _error: &EnrichmentError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &EnrichmentContext, severity: EnrichmentSeverity, _error: &EnrichmentError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

#[test]
fn reads_semicolon_separated_fixture_with_inferred_types() {
    let ds = read_source_table("establishments", "tests/fixtures/establishments.csv", &ReadOptions::default())
        .unwrap();

    assert_eq!(ds.row_count(), 3);
    assert_eq!(
        ds.schema.fields,
        vec![
            Field::new("id", DataType::Int64),
            Field::new("name", DataType::Utf8),
            Field::new("lat", DataType::Float64),
            Field::new("lon", DataType::Float64),
            Field::new("city", DataType::Utf8),
        ]
    );
    assert_eq!(
        ds.rows[0],
        vec![
            Value::Int64(1),
            Value::Utf8("Padaria Central".to_string()),
            Value::Float64(-23.5614),
            Value::Float64(-46.6559),
            Value::Utf8("Sao Paulo".to_string()),
        ]
    );
    assert_eq!(ds.rows[2][4], Value::Null);
}

#[test]
fn missing_file_returns_named_error_instead_of_table() {
    let err = read_source_table("stores", "tests/fixtures/does_not_exist.csv", &ReadOptions::default())
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("[ERROR]"));
    assert!(msg.contains("stores file not found"));
    assert!(matches!(err, EnrichmentError::SourceUnavailable { ref name, .. } if name == "stores"));
}

#[test]
fn wrong_separator_reads_a_single_column() {
    let opts = ReadOptions {
        separator: b',',
        ..Default::default()
    };
    let ds = read_source_table("establishments", "tests/fixtures/establishments.csv", &opts).unwrap();
    assert_eq!(ds.schema.fields.len(), 1);
    assert_eq!(ds.schema.fields[0].name, "id;name;lat;lon;city");
}

#[test]
fn observer_sees_success_and_critical_alert() {
    let obs = Arc::new(RecordingObserver::default());
    let table = SourceTable {
        name: "establishments".to_string(),
        path: "tests/fixtures/establishments.csv".into(),
        options: ReadOptions {
            observer: Some(obs.clone()),
            alert_at_or_above: EnrichmentSeverity::Critical,
            ..Default::default()
        },
    };

    table.read().unwrap();
    let missing = SourceTable {
        path: "tests/fixtures/nope.csv".into(),
        ..table.clone()
    };
    missing.read().unwrap_err();

    assert_eq!(*obs.successes.lock().unwrap(), vec![(EnrichmentStage::ReadSource, 3)]);
    assert_eq!(*obs.failures.lock().unwrap(), vec![EnrichmentSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![EnrichmentSeverity::Critical]);
}

#[test]
fn schema_reading_allows_reordered_columns_and_reports_missing_ones() {
    let schema = Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new("lat", DataType::Float64),
    ]);

    let input = "lat;id\n-23.5;7\n";
    let mut rdr = reader_with_separator(input.as_bytes(), b';');
    let ds = read_csv_with_schema(&mut rdr, &schema).unwrap();
    assert_eq!(ds.rows[0], vec![Value::Int64(7), Value::Float64(-23.5)]);

    let input = "id;name\n7;x\n";
    let mut rdr = reader_with_separator(input.as_bytes(), b';');
    let err = read_csv_with_schema(&mut rdr, &schema).unwrap_err();
    assert!(err.to_string().contains("missing required column 'lat'"));
}

#[test]
fn schema_reading_reports_parse_errors_with_row_and_column() {
    let schema = Schema::new(vec![Field::new("id", DataType::Int64)]);
    let input = "id\n1\nnot_an_int\n";
    let mut rdr = reader_with_separator(input.as_bytes(), b';');

    let err = read_csv_with_schema(&mut rdr, &schema).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse value at row 3"));
    assert!(msg.contains("column 'id'"));
}
