//! Common test utilities for integration tests.

use neowatch::feed::{parse_page, NeoRecord};
use serde_json::{json, Value};

/// JSON for one feed record, with numbers encoded as strings like the live feed.
pub fn record_json(
    id: &str,
    hazardous: bool,
    diameter_meters: f64,
    miss_distance_km: f64,
    date_full: &str,
) -> Value {
    json!({
        "id": id,
        "name": format!("({id})"),
        "is_potentially_hazardous_asteroid": hazardous,
        "estimated_diameter": {
            "meters": {
                "estimated_diameter_min": diameter_meters * 0.45,
                "estimated_diameter_max": diameter_meters
            }
        },
        "close_approach_data": [{
            "close_approach_date_full": date_full,
            "relative_velocity": { "kilometers_per_hour": "45000.5" },
            "miss_distance": { "kilometers": miss_distance_km.to_string() }
        }]
    })
}

/// A feed page body grouping `records` under a single date key.
pub fn page_json(date: &str, records: Vec<Value>) -> String {
    json!({
        "element_count": records.len(),
        "near_earth_objects": { date: records }
    })
    .to_string()
}

/// Parse one record through the same path as the live feed.
pub fn record(
    id: &str,
    hazardous: bool,
    diameter_meters: f64,
    miss_distance_km: f64,
    date_full: &str,
) -> NeoRecord {
    let body = page_json(
        "2026-10-18",
        vec![record_json(id, hazardous, diameter_meters, miss_distance_km, date_full)],
    );
    parse_page(&body)
        .expect("fixture page parses")
        .remove(0)
}
