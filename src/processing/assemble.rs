//! Column-wise table assembly.

use crate::error::{EnrichmentError, EnrichmentResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Build a [`DataSet`] by pairing each label with its column, in label order.
///
/// Each field takes the type of the first non-null value in its column; an all-null or empty
/// column is [`DataType::Utf8`].
///
/// Returns [`EnrichmentError::SchemaMismatch`] if the label and column counts differ and
/// [`EnrichmentError::ColumnLengthMismatch`] if the columns do not all have the same length.
pub fn assemble(labels: &[&str], columns: Vec<Vec<Value>>) -> EnrichmentResult<DataSet> {
    if labels.len() != columns.len() {
        return Err(EnrichmentError::SchemaMismatch {
            message: format!("{} labels for {} columns", labels.len(), columns.len()),
        });
    }

    let expected = columns.first().map(Vec::len).unwrap_or(0);
    for (label, column) in labels.iter().zip(&columns) {
        if column.len() != expected {
            return Err(EnrichmentError::ColumnLengthMismatch {
                column: (*label).to_string(),
                expected,
                actual: column.len(),
            });
        }
    }

    let fields = labels
        .iter()
        .zip(&columns)
        .map(|(label, column)| {
            let data_type = column
                .iter()
                .find_map(Value::data_type)
                .unwrap_or(DataType::Utf8);
            Field::new(*label, data_type)
        })
        .collect();

    let mut rows: Vec<Vec<Value>> = (0..expected)
        .map(|_| Vec::with_capacity(columns.len()))
        .collect();
    for column in columns {
        for (row, value) in rows.iter_mut().zip(column) {
            row.push(value);
        }
    }

    Ok(DataSet::new(Schema::new(fields), rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_rows_in_label_order() {
        let ds = assemble(
            &["id", "name"],
            vec![
                vec![Value::Int64(1), Value::Int64(2)],
                vec![Value::Null, Value::Utf8("b".to_string())],
            ],
        )
        .unwrap();

        assert_eq!(ds.schema.fields[0], Field::new("id", DataType::Int64));
        assert_eq!(ds.schema.fields[1], Field::new("name", DataType::Utf8));
        assert_eq!(ds.rows[0], vec![Value::Int64(1), Value::Null]);
        assert_eq!(ds.rows[1], vec![Value::Int64(2), Value::Utf8("b".to_string())]);
    }

    #[test]
    fn unequal_columns_are_a_length_mismatch() {
        let err = assemble(
            &["a", "b"],
            vec![vec![Value::Int64(1), Value::Int64(2)], vec![Value::Int64(1)]],
        )
        .unwrap_err();

        assert!(err.to_string().contains("column length mismatch"));
        assert!(matches!(
            err,
            EnrichmentError::ColumnLengthMismatch { ref column, expected: 2, actual: 1 } if column == "b"
        ));
    }

    #[test]
    fn label_count_must_match_column_count() {
        let err = assemble(&["a"], vec![vec![], vec![]]).unwrap_err();
        assert!(matches!(err, EnrichmentError::SchemaMismatch { .. }));
    }
}
