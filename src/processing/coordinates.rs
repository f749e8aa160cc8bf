//! Coordinate extraction from free-form geometry text.
//!
//! Geometry arrives in whatever text shape the API used (JSON object, `lat: .., lng: ..`, ...).
//! It is scanned for numbers and the first two are taken as `(lat, lon)`. Any numeric noise
//! ahead of the latitude shifts the result.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{EnrichmentError, EnrichmentResult};
use crate::types::{DataSet, DataType, Field, Value};

use super::group::{require_column, require_row_widths};

/// Optionally signed number with an optional decimal part, ASCII digits only so every match
/// parses as `f64`.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?[0-9]+\.?[0-9]*").expect("valid regex"));

/// All numbers found in `text`, in order of appearance.
pub fn numeric_tokens(text: &str) -> Vec<f64> {
    NUMBER_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// Take the first two numbers in `geometry` as `(lat, lon)`.
///
/// Fewer than two numbers is [`EnrichmentError::MalformedGeometry`]; no default is substituted.
pub fn extract_coordinates(place_id: &str, geometry: &str) -> EnrichmentResult<(f64, f64)> {
    let numbers = numeric_tokens(geometry);
    match numbers.as_slice() {
        [lat, lon, ..] => Ok((*lat, *lon)),
        _ => Err(EnrichmentError::MalformedGeometry {
            place_id: place_id.to_string(),
            raw: geometry.to_string(),
            found: numbers.len(),
        }),
    }
}

/// Append `lat` and `lon` columns parsed from the distinct-geometry list column `geometry_col`.
///
/// The list is rendered as one text (items joined with `", "`) before scanning, so the
/// coordinates come from the first geometry observed for the key.
pub fn add_coordinates(dataset: &mut DataSet, key: &str, geometry_col: &str) -> EnrichmentResult<()> {
    require_row_widths(dataset)?;
    let key_idx = require_column(dataset, key)?;
    let geometry_idx = require_column(dataset, geometry_col)?;

    for row in &mut dataset.rows {
        let text = match &row[geometry_idx] {
            Value::Utf8List(items) => items.join(", "),
            other => other.to_string(),
        };
        let (lat, lon) = extract_coordinates(&row[key_idx].to_string(), &text)?;
        row.push(Value::Float64(lat));
        row.push(Value::Float64(lon));
    }

    dataset.schema.fields.push(Field::new("lat", DataType::Float64));
    dataset.schema.fields.push(Field::new("lon", DataType::Float64));
    Ok(())
}
