//! Delimited-text table reading.

use std::io::Read;

use crate::error::{EnrichmentError, EnrichmentResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Build a CSV reader over `input` with headers and the given single-byte `separator`.
pub fn reader_with_separator<R: Read>(input: R, separator: u8) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(separator)
        .from_reader(input)
}

/// Read a table without a predeclared schema, inferring one column type per header.
///
/// A column is [`DataType::Int64`] if every non-empty cell parses as `i64`, otherwise
/// [`DataType::Float64`] if every non-empty cell parses as `f64`, otherwise [`DataType::Utf8`].
/// Empty cells become [`Value::Null`]; an all-empty column is `Utf8`.
pub fn read_csv_inferred<R: Read>(rdr: &mut csv::Reader<R>) -> EnrichmentResult<DataSet> {
    let headers = rdr.headers()?.clone();

    let mut raw_rows: Vec<csv::StringRecord> = Vec::new();
    for result in rdr.records() {
        raw_rows.push(result?);
    }

    let fields: Vec<Field> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells = raw_rows.iter().map(|r| r.get(idx).unwrap_or("").trim());
            Field::new(name, infer_type(cells))
        })
        .collect();
    let schema = Schema::new(fields);

    let mut rows = Vec::with_capacity(raw_rows.len());
    for (row_idx0, record) in raw_rows.iter().enumerate() {
        let user_row = row_idx0 + 2;
        let mut row = Vec::with_capacity(schema.fields.len());
        for (idx, field) in schema.fields.iter().enumerate() {
            let raw = record.get(idx).unwrap_or("");
            row.push(parse_typed_value(user_row, &field.name, &field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema, rows))
}

/// Read a table against a user-provided schema.
///
/// Rules:
///
/// - the input must have headers,
/// - headers must contain all schema fields (order can differ),
/// - each value is parsed according to the schema field type.
pub fn read_csv_with_schema<R: Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> EnrichmentResult<DataSet> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(EnrichmentError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = record.get(csv_idx).unwrap_or("");
            row.push(parse_typed_value(user_row, &field.name, &field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

fn infer_type<'a>(cells: impl Iterator<Item = &'a str> + Clone) -> DataType {
    let mut non_empty = cells.filter(|c| !c.is_empty()).peekable();
    if non_empty.peek().is_none() {
        return DataType::Utf8;
    }
    if non_empty.clone().all(|c| c.parse::<i64>().is_ok()) {
        DataType::Int64
    } else if non_empty.all(|c| c.parse::<f64>().is_ok()) {
        DataType::Float64
    } else {
        DataType::Utf8
    }
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: &DataType,
    raw: &str,
) -> EnrichmentResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    let parse_error = |message: String| EnrichmentError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Utf8List => Ok(Value::Utf8List(
            trimmed.split(',').map(|s| s.trim().to_owned()).collect(),
        )),
    }
}
