//! Group-by with distinct-value aggregation.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{EnrichmentError, EnrichmentResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Suffix appended to aggregated column names.
pub const UNIQUE_SUFFIX: &str = "_unique";

/// Group `dataset` by `key` and collect the distinct values of each of `columns` per group.
///
/// The output has the key column followed by one [`DataType::Utf8List`] column per aggregated
/// column, named `{column}_unique`. Distinct values are kept in first-seen order with nulls
/// skipped; non-text values are stored in their display form. Groups come out in ascending key
/// order (numbers numerically, text by bytes) and rows whose key is null are dropped.
pub fn group_unique(dataset: &DataSet, key: &str, columns: &[&str]) -> EnrichmentResult<DataSet> {
    require_row_widths(dataset)?;
    let key_idx = require_column(dataset, key)?;
    let col_idxs = columns
        .iter()
        .map(|c| require_column(dataset, c))
        .collect::<EnrichmentResult<Vec<_>>>()?;

    let mut groups: BTreeMap<GroupKey, Vec<Vec<String>>> = BTreeMap::new();
    for row in &dataset.rows {
        let key_value = &row[key_idx];
        if key_value.is_null() {
            continue;
        }
        let uniques = groups
            .entry(GroupKey(key_value.clone()))
            .or_insert_with(|| vec![Vec::new(); col_idxs.len()]);

        for (unique, &idx) in uniques.iter_mut().zip(&col_idxs) {
            let value = &row[idx];
            if value.is_null() {
                continue;
            }
            let text = value.to_string();
            if !unique.contains(&text) {
                unique.push(text);
            }
        }
    }

    let mut fields = vec![dataset.schema.fields[key_idx].clone()];
    fields.extend(
        columns
            .iter()
            .map(|c| Field::new(format!("{c}{UNIQUE_SUFFIX}"), DataType::Utf8List)),
    );

    let rows = groups
        .into_iter()
        .map(|(GroupKey(key_value), uniques)| {
            let mut row = Vec::with_capacity(1 + uniques.len());
            row.push(key_value);
            row.extend(uniques.into_iter().map(Value::Utf8List));
            row
        })
        .collect();

    Ok(DataSet::new(Schema::new(fields), rows))
}

/// Total order over key values: nulls, then numbers (compared numerically across `Int64` and
/// `Float64`), then text by bytes, then lists. Equal keys are the same group.
#[derive(Debug, Clone)]
pub(crate) struct GroupKey(pub(crate) Value);

impl GroupKey {
    fn rank(&self) -> u8 {
        match &self.0 {
            Value::Null => 0,
            Value::Int64(_) | Value::Float64(_) => 1,
            Value::Utf8(_) => 2,
            Value::Utf8List(_) => 3,
        }
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (Value::Int64(a), Value::Int64(b)) => a.cmp(b),
            (Value::Float64(a), Value::Float64(b)) => a.total_cmp(b),
            (Value::Int64(a), Value::Float64(b)) => (*a as f64).total_cmp(b),
            (Value::Float64(a), Value::Int64(b)) => a.total_cmp(&(*b as f64)),
            (Value::Utf8(a), Value::Utf8(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Value::Utf8List(a), Value::Utf8List(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

/// Fails on the first row whose width differs from the schema.
pub(crate) fn require_row_widths(dataset: &DataSet) -> EnrichmentResult<()> {
    let width = dataset.schema.fields.len();
    match dataset.rows.iter().position(|row| row.len() != width) {
        Some(i) => Err(EnrichmentError::SchemaMismatch {
            message: format!(
                "row {i} has {} values, schema has {width} columns",
                dataset.rows[i].len()
            ),
        }),
        None => Ok(()),
    }
}

pub(crate) fn require_column(dataset: &DataSet, name: &str) -> EnrichmentResult<usize> {
    dataset
        .schema
        .index_of(name)
        .ok_or_else(|| EnrichmentError::SchemaMismatch {
            message: format!(
                "missing required column '{name}'. columns={:?}",
                dataset.schema.field_names().collect::<Vec<_>>()
            ),
        })
}
