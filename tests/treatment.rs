use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;

use places_enrichment::EnrichmentError;
use places_enrichment::accumulate::{observation_schema, Observation, ObservationAccumulator};
use places_enrichment::ingestion::csv::{read_csv_inferred, read_csv_with_schema, reader_with_separator};
use places_enrichment::ingestion::{read_source_table, ReadOptions};
use places_enrichment::processing::{establishment_records, treat_data, ESTABLISHMENT_FIELDS};
use places_enrichment::types::{DataSet, Value};

fn fixture_observations() -> DataSet {
    let file = File::open("tests/fixtures/observations.csv").unwrap();
    let mut rdr = reader_with_separator(file, b';');
    read_csv_with_schema(&mut rdr, &observation_schema()).unwrap()
}

fn observation(place_id: &str, category: &str, lat: f64, lng: f64) -> Observation {
    Observation {
        business_status: Some("OPERATIONAL".to_string()),
        geometry: Some(format!(r#"{{"location":{{"lat":{lat:?},"lng":{lng:?}}}}}"#)),
        name: Some(format!("Place {place_id}")),
        opening_hours: None,
        place_id: place_id.to_string(),
        price_level: None,
        rating: Some(4.0),
        types: vec!["establishment".to_string()],
        user_ratings_total: Some(3),
        vicinity: Some("Somewhere".to_string()),
        category: category.to_string(),
    }
}

fn expected_categories(ds: &DataSet) -> BTreeMap<String, BTreeSet<String>> {
    let mut out: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let place = ds.schema.index_of("place_id").unwrap();
    let category = ds.schema.index_of("category").unwrap();
    for row in &ds.rows {
        out.entry(row[place].to_string())
            .or_default()
            .insert(row[category].to_string());
    }
    out
}

#[test]
fn one_row_per_distinct_place_id() {
    let ds = fixture_observations();
    assert_eq!(ds.row_count(), 6);

    let out = treat_data(&ds).unwrap();
    assert_eq!(out.row_count(), expected_categories(&ds).len());
    assert_eq!(out.row_count(), 3);
    assert_eq!(out.schema.field_names().collect::<Vec<_>>(), ESTABLISHMENT_FIELDS.to_vec());
}

#[test]
fn categories_equal_distinct_observed_categories() {
    let ds = fixture_observations();
    let expected = expected_categories(&ds);

    for record in establishment_records(&treat_data(&ds).unwrap()).unwrap() {
        let got: BTreeSet<String> = record.categories.iter().cloned().collect();
        assert_eq!(got.len(), record.categories.len(), "duplicates in {:?}", record.categories);
        assert_eq!(got, expected[&record.place_id]);
    }
}

#[test]
fn details_come_from_first_observation() {
    let out = treat_data(&fixture_observations()).unwrap();
    let records = establishment_records(&out).unwrap();

    let p1 = records.iter().find(|r| r.place_id == "ChIJ-p1").unwrap();
    // The second p1 row says 121; the first one wins.
    assert_eq!(p1.user_ratings_total, Some(120));
    assert_eq!(p1.types, vec!["bakery", "food"]);
    assert_eq!((p1.lat, p1.lon), (-23.5614, -46.6559));

    let p3 = records.iter().find(|r| r.place_id == "ChIJ-p3").unwrap();
    assert_eq!(p3.business_status.as_deref(), Some("CLOSED_TEMPORARILY"));
    assert_eq!(p3.price_level, None);
    assert_eq!(p3.categories, vec!["bar"]);
}

#[test]
fn inferred_source_table_converts_to_records() {
    let ds = read_source_table("observations", "tests/fixtures/observations.csv", &ReadOptions::default())
        .unwrap();
    let records = establishment_records(&treat_data(&ds).unwrap()).unwrap();

    assert_eq!(records.len(), 3);
    let p1 = records.iter().find(|r| r.place_id == "ChIJ-p1").unwrap();
    assert_eq!(p1.types, vec!["bakery", "food"]);
    assert_eq!(p1.categories, vec!["bakery", "cafe"]);
    let p3 = records.iter().find(|r| r.place_id == "ChIJ-p3").unwrap();
    assert_eq!(p3.types, vec!["bar"]);
    assert_eq!(p3.user_ratings_total, None);
}

#[test]
fn treatment_is_deterministic() {
    let ds = fixture_observations();
    assert_eq!(treat_data(&ds).unwrap(), treat_data(&ds).unwrap());
}

#[test]
fn rows_are_sorted_by_place_id() {
    let mut acc = ObservationAccumulator::new();
    acc.push(observation("zeta", "bar", 1.0, 2.0));
    acc.push(observation("alpha", "cafe", 3.0, 4.0));
    acc.push(observation("mid", "pub", 5.0, 6.0));

    let out = treat_data(&acc.to_dataset().unwrap()).unwrap();
    let ids: Vec<_> = out.column("place_id").unwrap().map(Value::to_string).collect();
    assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn integer_place_ids_sort_numerically() {
    let header = "business_status;geometry;name;opening_hours;place_id;price_level;rating;types;user_ratings_total;vicinity;category";
    let mut text = format!("{header}\n");
    for id in [2, 10, 1] {
        text.push_str(&format!("OPERATIONAL;lat {id}.5 lng 3.5;P{id};;{id};;4.0;food;5;Here;cafe\n"));
    }
    let mut rdr = reader_with_separator(text.as_bytes(), b';');
    let ds = read_csv_inferred(&mut rdr).unwrap();

    let out = treat_data(&ds).unwrap();
    let ids: Vec<_> = out.column("place_id").unwrap().cloned().collect();
    assert_eq!(ids, vec![Value::Int64(1), Value::Int64(2), Value::Int64(10)]);
    let lats: Vec<_> = out.column("lat").unwrap().cloned().collect();
    assert_eq!(lats, vec![Value::Float64(1.5), Value::Float64(2.5), Value::Float64(10.5)]);
}

#[test]
fn bakery_and_cafe_observations_collapse() {
    let mut acc = ObservationAccumulator::new();
    acc.push(observation("p1", "bakery", 37.4224, -122.0841));
    acc.push(observation("p1", "cafe", 37.4224, -122.0841));

    let out = treat_data(&acc.to_dataset().unwrap()).unwrap();
    let records = establishment_records(&out).unwrap();
    assert_eq!(records.len(), 1);

    let categories: BTreeSet<_> = records[0].categories.iter().map(String::as_str).collect();
    assert_eq!(categories, BTreeSet::from(["bakery", "cafe"]));
    assert_eq!((records[0].lat, records[0].lon), (37.4224, -122.0841));
}

#[test]
fn geometry_with_a_single_number_fails_loudly() {
    let mut acc = ObservationAccumulator::new();
    let mut broken = observation("p1", "bar", 0.0, 0.0);
    broken.geometry = Some("unknown location 42".to_string());
    acc.push(broken);

    let err = treat_data(&acc.to_dataset().unwrap()).unwrap_err();
    assert!(matches!(err, EnrichmentError::MalformedGeometry { found: 1, ref place_id, .. } if place_id == "p1"));
}

#[test]
fn missing_geometry_fails_loudly() {
    let mut acc = ObservationAccumulator::new();
    let mut broken = observation("p1", "bar", 0.0, 0.0);
    broken.geometry = None;
    acc.push(broken);

    let err = treat_data(&acc.to_dataset().unwrap()).unwrap_err();
    assert!(matches!(err, EnrichmentError::MalformedGeometry { found: 0, .. }));
}
