//! Reshaping an observation table into one row per establishment.
//!
//! [`treat_data`] composes the stages in this module's siblings:
//!
//! 1. [`group_unique`] by `place_id`, collecting distinct geometries and categories,
//! 2. [`add_coordinates`] from the first geometry of each group,
//! 3. flatten: `category_unique` becomes `categories`,
//! 4. [`drop_duplicates`] on the observation table, minus `geometry`, `opening_hours` and
//!    `category`,
//! 5. [`left_join`] of groups with details on `place_id`,
//! 6. drop the `geometry_unique` helper column.

use serde::{Deserialize, Serialize};

use crate::error::{EnrichmentError, EnrichmentResult};
use crate::types::{DataSet, Value};

use super::coordinates::add_coordinates;
use super::dedup::drop_duplicates;
use super::group::{group_unique, require_column, require_row_widths, UNIQUE_SUFFIX};
use super::join::left_join;

/// Dedup key shared by every observation of the same establishment.
pub const PLACE_ID: &str = "place_id";

/// Columns of the treated table, in order.
pub const ESTABLISHMENT_FIELDS: [&str; 11] = [
    "place_id",
    "categories",
    "lat",
    "lon",
    "business_status",
    "name",
    "price_level",
    "rating",
    "types",
    "user_ratings_total",
    "vicinity",
];

const GEOMETRY: &str = "geometry";
const CATEGORY: &str = "category";
const SUPERSEDED_DETAIL_COLUMNS: [&str; 3] = [GEOMETRY, "opening_hours", CATEGORY];

/// Collapse an observation table into one row per distinct `place_id`.
///
/// The input needs at least the observation columns (see
/// [`crate::accumulate::OBSERVATION_FIELDS`]); extra columns are carried through from the first
/// observation of each establishment. The output columns are [`ESTABLISHMENT_FIELDS`] followed
/// by any such extras, sorted by `place_id`.
///
/// Fails with [`EnrichmentError::MalformedGeometry`] if a group's geometry holds fewer than two
/// numbers, and with [`EnrichmentError::SchemaMismatch`] if a row is narrower or wider than the
/// schema, a required column is missing or a group lost its detail row in the join.
pub fn treat_data(observations: &DataSet) -> EnrichmentResult<DataSet> {
    require_row_widths(observations)?;
    for column in crate::accumulate::OBSERVATION_FIELDS {
        require_column(observations, column)?;
    }

    let geometry_unique = format!("{GEOMETRY}{UNIQUE_SUFFIX}");
    let category_unique = format!("{CATEGORY}{UNIQUE_SUFFIX}");

    let mut groups = group_unique(observations, PLACE_ID, &[GEOMETRY, CATEGORY])?;
    add_coordinates(&mut groups, PLACE_ID, &geometry_unique)?;
    groups.rename_columns(&[(category_unique.as_str(), "categories")]);

    let details = drop_duplicates(observations, PLACE_ID)?.drop_columns(&SUPERSEDED_DETAIL_COLUMNS);

    let joined = left_join(&groups, &details, PLACE_ID)?;
    if joined.unmatched > 0 {
        return Err(EnrichmentError::SchemaMismatch {
            message: format!("{} establishment(s) have no detail row after join", joined.unmatched),
        });
    }

    Ok(joined.dataset.drop_columns(&[geometry_unique.as_str()]))
}

/// Typed view of one row of the treated table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstablishmentRecord {
    pub place_id: String,
    /// Distinct queried categories, in first-seen order.
    pub categories: Vec<String>,
    pub lat: f64,
    pub lon: f64,
    pub business_status: Option<String>,
    pub name: Option<String>,
    pub price_level: Option<i64>,
    pub rating: Option<f64>,
    pub types: Vec<String>,
    pub user_ratings_total: Option<i64>,
    pub vicinity: Option<String>,
}

/// Convert a table produced by [`treat_data`] into [`EstablishmentRecord`]s.
///
/// List columns (`categories`, `types`) also accept comma-separated text, which is how they come
/// back from a source table read with inferred types.
pub fn establishment_records(dataset: &DataSet) -> EnrichmentResult<Vec<EstablishmentRecord>> {
    require_row_widths(dataset)?;
    let idx = ESTABLISHMENT_FIELDS
        .iter()
        .map(|c| require_column(dataset, c))
        .collect::<EnrichmentResult<Vec<_>>>()?;
    let idx = idx.as_slice();

    dataset
        .rows
        .iter()
        .enumerate()
        .map(|(row_num, row)| -> EnrichmentResult<EstablishmentRecord> {
            let cell = move |i: usize| Cell {
                row: row_num,
                column: ESTABLISHMENT_FIELDS[i],
                value: &row[idx[i]],
            };
            Ok(EstablishmentRecord {
                place_id: cell(0).text()?.ok_or_else(|| cell(0).mismatch("non-null text"))?,
                categories: cell(1).list()?,
                lat: cell(2).float()?.ok_or_else(|| cell(2).mismatch("non-null number"))?,
                lon: cell(3).float()?.ok_or_else(|| cell(3).mismatch("non-null number"))?,
                business_status: cell(4).text()?,
                name: cell(5).text()?,
                price_level: cell(6).int()?,
                rating: cell(7).float()?,
                types: cell(8).list()?,
                user_ratings_total: cell(9).int()?,
                vicinity: cell(10).text()?,
            })
        })
        .collect()
}

struct Cell<'a> {
    row: usize,
    column: &'a str,
    value: &'a Value,
}

impl Cell<'_> {
    fn mismatch(&self, expected: &str) -> EnrichmentError {
        EnrichmentError::SchemaMismatch {
            message: format!(
                "row {} column '{}': expected {expected}, got {:?}",
                self.row, self.column, self.value
            ),
        }
    }

    fn text(&self) -> EnrichmentResult<Option<String>> {
        match self.value {
            Value::Null => Ok(None),
            Value::Utf8(s) => Ok(Some(s.clone())),
            _ => Err(self.mismatch("text")),
        }
    }

    fn int(&self) -> EnrichmentResult<Option<i64>> {
        match self.value {
            Value::Null => Ok(None),
            Value::Int64(v) => Ok(Some(*v)),
            _ => Err(self.mismatch("integer")),
        }
    }

    fn float(&self) -> EnrichmentResult<Option<f64>> {
        match self.value {
            Value::Null => Ok(None),
            Value::Float64(v) => Ok(Some(*v)),
            Value::Int64(v) => Ok(Some(*v as f64)),
            _ => Err(self.mismatch("number")),
        }
    }

    fn list(&self) -> EnrichmentResult<Vec<String>> {
        match self.value {
            Value::Null => Ok(Vec::new()),
            Value::Utf8List(items) => Ok(items.clone()),
            Value::Utf8(text) => Ok(text.split(',').map(|s| s.trim().to_owned()).collect()),
            _ => Err(self.mismatch("list")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulate::OBSERVATION_FIELDS;
    use crate::processing::assemble;

    fn observation(place_id: &str, category: &str, geometry: &str) -> Vec<Value> {
        vec![
            Value::Utf8("OPERATIONAL".to_string()),
            Value::Utf8(geometry.to_string()),
            Value::Utf8(format!("Place {place_id}")),
            Value::Null,
            Value::Utf8(place_id.to_string()),
            Value::Int64(2),
            Value::Float64(4.5),
            Value::Utf8List(vec!["food".to_string()]),
            Value::Int64(10),
            Value::Utf8("Main St".to_string()),
            Value::Utf8(category.to_string()),
        ]
    }

    fn table(rows: Vec<Vec<Value>>) -> DataSet {
        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); OBSERVATION_FIELDS.len()];
        for row in rows {
            for (c, v) in columns.iter_mut().zip(row) {
                c.push(v);
            }
        }
        assemble(&OBSERVATION_FIELDS, columns).unwrap()
    }

    #[test]
    fn two_categories_collapse_into_one_row() {
        let geometry = r#"{"location":{"lat":37.4224,"lng":-122.0841}}"#;
        let ds = table(vec![
            observation("p1", "bakery", geometry),
            observation("p1", "cafe", geometry),
        ]);

        let out = treat_data(&ds).unwrap();
        assert_eq!(out.schema.field_names().collect::<Vec<_>>(), ESTABLISHMENT_FIELDS.to_vec());
        assert_eq!(out.row_count(), 1);

        let records = establishment_records(&out).unwrap();
        let p1 = &records[0];
        assert_eq!(p1.place_id, "p1");
        assert_eq!(p1.categories, vec!["bakery", "cafe"]);
        assert_eq!((p1.lat, p1.lon), (37.4224, -122.0841));
        assert_eq!(p1.name.as_deref(), Some("Place p1"));
        assert_eq!(p1.price_level, Some(2));
    }

    #[test]
    fn missing_observation_column_is_schema_mismatch() {
        let ds = table(vec![observation("p1", "cafe", "1.0, 2.0")]).drop_columns(&["category"]);
        let err = treat_data(&ds).unwrap_err();
        assert!(err.to_string().contains("missing required column 'category'"));
    }

    #[test]
    fn malformed_geometry_propagates() {
        let ds = table(vec![observation("p1", "cafe", "somewhere 7")]);
        assert!(matches!(
            treat_data(&ds).unwrap_err(),
            EnrichmentError::MalformedGeometry { found: 1, .. }
        ));
    }

    #[test]
    fn rows_narrower_than_schema_are_schema_mismatch() {
        let mut ds = table(vec![observation("p1", "cafe", "1.0, 2.0")]);
        ds.rows[0].truncate(1);
        let err = treat_data(&ds).unwrap_err();
        assert!(matches!(err, EnrichmentError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("row 0 has 1 values, schema has 11 columns"));
    }

    #[test]
    fn records_split_comma_separated_types() {
        let mut row = observation("p1", "cafe", "1.0, 2.0");
        row[7] = Value::Utf8("bakery, food".to_string());
        let out = treat_data(&table(vec![row])).unwrap();

        let records = establishment_records(&out).unwrap();
        assert_eq!(records[0].types, vec!["bakery", "food"]);
    }

    #[test]
    fn records_reject_wrong_cell_types() {
        let ds = table(vec![observation("p1", "cafe", "1.0, 2.0")]);
        let mut out = treat_data(&ds).unwrap();
        out.rows[0][6] = Value::Utf8("cheap".to_string());
        let err = establishment_records(&out).unwrap_err();
        assert!(err.to_string().contains("column 'price_level'"));
    }
}
