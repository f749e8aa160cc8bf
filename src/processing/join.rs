//! Left join of two tables on a shared key column.

use std::collections::BTreeMap;

use crate::error::EnrichmentResult;
use crate::types::{DataSet, Field, Schema, Value};

use super::group::{require_column, require_row_widths, GroupKey};

/// Output of [`left_join`].
#[derive(Debug, Clone, PartialEq)]
pub struct LeftJoin {
    /// Joined table.
    pub dataset: DataSet,
    /// Left rows that found no match on the right and were null-filled.
    pub unmatched: usize,
}

/// Left-join `left` with `right` on column `on`.
///
/// Output columns are all of `left` followed by every `right` column except `on`. A column name
/// present on both sides gets `_x` (left) and `_y` (right) suffixes. Every left row is kept:
/// it is repeated once per matching right row, or emitted once with nulls for the right
/// columns when nothing matches. Null keys never match.
pub fn left_join(left: &DataSet, right: &DataSet, on: &str) -> EnrichmentResult<LeftJoin> {
    require_row_widths(left)?;
    require_row_widths(right)?;
    let left_key = require_column(left, on)?;
    let right_key = require_column(right, on)?;

    let right_cols: Vec<usize> = (0..right.schema.fields.len())
        .filter(|&i| i != right_key)
        .collect();

    let mut index: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
    for (i, row) in right.rows.iter().enumerate() {
        let key = &row[right_key];
        if !key.is_null() {
            index.entry(GroupKey(key.clone())).or_default().push(i);
        }
    }

    let schema = joined_schema(left, right, on, &right_cols);

    let mut rows = Vec::with_capacity(left.row_count());
    let mut unmatched = 0;
    for row in &left.rows {
        let key = &row[left_key];
        let matches = if key.is_null() {
            None
        } else {
            index.get(&GroupKey(key.clone()))
        };

        match matches {
            Some(right_rows) => {
                for &r in right_rows {
                    let mut out = row.clone();
                    out.extend(right_cols.iter().map(|&c| right.rows[r][c].clone()));
                    rows.push(out);
                }
            }
            None => {
                unmatched += 1;
                let mut out = row.clone();
                out.extend(right_cols.iter().map(|_| Value::Null));
                rows.push(out);
            }
        }
    }

    Ok(LeftJoin {
        dataset: DataSet::new(schema, rows),
        unmatched,
    })
}

fn joined_schema(left: &DataSet, right: &DataSet, on: &str, right_cols: &[usize]) -> Schema {
    let right_names: Vec<&str> = right_cols
        .iter()
        .map(|&c| right.schema.fields[c].name.as_str())
        .collect();

    let mut fields: Vec<Field> = left
        .schema
        .fields
        .iter()
        .map(|f| {
            if f.name != on && right_names.contains(&f.name.as_str()) {
                Field::new(format!("{}_x", f.name), f.data_type.clone())
            } else {
                f.clone()
            }
        })
        .collect();

    fields.extend(right_cols.iter().map(|&c| {
        let f = &right.schema.fields[c];
        if left.schema.index_of(&f.name).is_some() {
            Field::new(format!("{}_y", f.name), f.data_type.clone())
        } else {
            f.clone()
        }
    }));

    Schema::new(fields)
}
