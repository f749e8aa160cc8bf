//! Accumulation of places API results into observation rows.
//!
//! Each API result becomes one [`Observation`]: one row per establishment per queried category.
//! Column-aligned sequences are derived from the records on demand, so every column always has
//! exactly one entry per observation.

use serde::{Deserialize, Serialize};

use crate::error::EnrichmentResult;
use crate::places::{build_url, PlaceResult, PlacesClient, PlacesConfig, PlacesResponse};
use crate::processing::assemble;
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Observation column labels, in table order.
pub const OBSERVATION_FIELDS: [&str; 11] = [
    "business_status",
    "geometry",
    "name",
    "opening_hours",
    "place_id",
    "price_level",
    "rating",
    "types",
    "user_ratings_total",
    "vicinity",
    "category",
];

/// Typed schema of the observation table, for reading previously saved observations.
pub fn observation_schema() -> Schema {
    let types = [
        DataType::Utf8,
        DataType::Utf8,
        DataType::Utf8,
        DataType::Utf8,
        DataType::Utf8,
        DataType::Int64,
        DataType::Float64,
        DataType::Utf8List,
        DataType::Int64,
        DataType::Utf8,
        DataType::Utf8,
    ];
    Schema::new(
        OBSERVATION_FIELDS
            .iter()
            .zip(types)
            .map(|(name, data_type)| Field::new(*name, data_type))
            .collect(),
    )
}

/// One API result observed under one queried category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub business_status: Option<String>,
    /// Geometry object as JSON text.
    pub geometry: Option<String>,
    pub name: Option<String>,
    /// Opening-hours object as JSON text.
    pub opening_hours: Option<String>,
    pub place_id: String,
    pub price_level: Option<i64>,
    pub rating: Option<f64>,
    pub types: Vec<String>,
    pub user_ratings_total: Option<i64>,
    pub vicinity: Option<String>,
    /// Keyword of the request that produced this row.
    pub category: String,
}

impl Observation {
    /// Build an observation from an API result and the category it was queried with.
    pub fn from_result(result: &PlaceResult, category: &str) -> Self {
        Self {
            business_status: result.business_status.clone(),
            geometry: result.geometry.as_ref().map(|g| g.to_string()),
            name: result.name.clone(),
            opening_hours: result.opening_hours.as_ref().map(|o| o.to_string()),
            place_id: result.place_id.clone(),
            price_level: result.price_level,
            rating: result.rating,
            types: result.types.clone(),
            user_ratings_total: result.user_ratings_total,
            vicinity: result.vicinity.clone(),
            category: category.to_string(),
        }
    }

    /// Row values in [`OBSERVATION_FIELDS`] order.
    pub fn to_row(&self) -> Vec<Value> {
        vec![
            opt_utf8(&self.business_status),
            opt_utf8(&self.geometry),
            opt_utf8(&self.name),
            opt_utf8(&self.opening_hours),
            Value::Utf8(self.place_id.clone()),
            self.price_level.map(Value::Int64).unwrap_or(Value::Null),
            self.rating.map(Value::Float64).unwrap_or(Value::Null),
            Value::Utf8List(self.types.clone()),
            self.user_ratings_total.map(Value::Int64).unwrap_or(Value::Null),
            opt_utf8(&self.vicinity),
            Value::Utf8(self.category.clone()),
        ]
    }
}

fn opt_utf8(v: &Option<String>) -> Value {
    v.as_ref().map(|s| Value::Utf8(s.clone())).unwrap_or(Value::Null)
}

/// Collects observations across many requests and categories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationAccumulator {
    observations: Vec<Observation>,
}

impl ObservationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column labels of the accumulated table.
    pub fn labels(&self) -> &'static [&'static str] {
        &OBSERVATION_FIELDS
    }

    pub fn push(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    /// Append one observation per result in `response`, tagged with `category`.
    pub fn extend_from_response(&mut self, response: &PlacesResponse, category: &str) {
        self.observations.extend(
            response
                .results
                .iter()
                .map(|r| Observation::from_result(r, category)),
        );
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// One value sequence per label; entry `i` of every sequence describes observation `i`.
    pub fn columns(&self) -> Vec<Vec<Value>> {
        let mut columns: Vec<Vec<Value>> = OBSERVATION_FIELDS
            .iter()
            .map(|_| Vec::with_capacity(self.observations.len()))
            .collect();
        for obs in &self.observations {
            for (column, value) in columns.iter_mut().zip(obs.to_row()) {
                column.push(value);
            }
        }
        columns
    }

    /// Assemble the observation table.
    pub fn to_dataset(&self) -> EnrichmentResult<DataSet> {
        assemble(&OBSERVATION_FIELDS, self.columns())
    }
}

impl Extend<Observation> for ObservationAccumulator {
    fn extend<I: IntoIterator<Item = Observation>>(&mut self, iter: I) {
        self.observations.extend(iter);
    }
}

/// One `(location, category)` nearby-search request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceQuery {
    pub lat: f64,
    pub lon: f64,
    pub category: String,
}

impl PlaceQuery {
    pub fn new(lat: f64, lon: f64, category: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            category: category.into(),
        }
    }

    /// Issue this request and turn its results into observations.
    pub fn fetch(&self, client: &PlacesClient, config: &PlacesConfig) -> EnrichmentResult<Vec<Observation>> {
        let url = build_url(config, self.lat, self.lon, &self.category)?;
        let response = client.call(&url)?;
        Ok(response
            .results
            .iter()
            .map(|r| Observation::from_result(r, &self.category))
            .collect())
    }
}

/// Run `queries` one after another, folding every result into one accumulator.
///
/// The first failing request aborts the run.
pub fn collect_observations(
    client: &PlacesClient,
    config: &PlacesConfig,
    queries: &[PlaceQuery],
) -> EnrichmentResult<ObservationAccumulator> {
    let mut acc = ObservationAccumulator::new();
    for query in queries {
        acc.extend(query.fetch(client, config)?);
    }
    Ok(acc)
}
