//! Test utilities for simulation tests.
//!
//! Provides fixtures for building feed records and tracked objects with
//! deterministic geometry.

use crate::feed::{
    CloseApproach, DiameterRange, EstimatedDiameter, MissDistance, NeoRecord, Numeric,
    RelativeVelocity,
};

/// Fixtures for creating test records and objects.
pub mod fixtures {
    use super::*;
    use crate::sim::{synthesize, TrackedObject};
    use crate::types::MILLIS_PER_DAY;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// A well-formed feed record. Numbers are encoded as strings, like the live feed.
    pub fn record(
        id: &str,
        hazardous: bool,
        diameter_meters: f64,
        miss_distance_km: f64,
        velocity_km_per_hour: f64,
        date_full: &str,
    ) -> NeoRecord {
        NeoRecord {
            id: id.to_string(),
            name: format!("({id})"),
            is_potentially_hazardous_asteroid: hazardous,
            estimated_diameter: Some(EstimatedDiameter {
                meters: Some(DiameterRange {
                    estimated_diameter_min: Some(Numeric::from(diameter_meters * 0.45)),
                    estimated_diameter_max: Some(Numeric::from(diameter_meters)),
                }),
            }),
            close_approach_data: vec![CloseApproach {
                close_approach_date_full: Some(date_full.to_string()),
                epoch_date_close_approach: None,
                relative_velocity: Some(RelativeVelocity {
                    kilometers_per_hour: Some(Numeric::Text(velocity_km_per_hour.to_string())),
                }),
                miss_distance: Some(MissDistance {
                    kilometers: Some(Numeric::Text(miss_distance_km.to_string())),
                }),
            }],
        }
    }

    /// A tracked object created at t = 0 with its close approach two days later.
    pub fn tracked(id: &str, hazardous: bool, miss_distance_km: f64) -> TrackedObject {
        let record = record(id, hazardous, 50.0, miss_distance_km, 36_000.0, "2000-Jan-01 12:00");
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let mut object = synthesize(&record, 0.0, &mut rng)
            .expect("fixture record is valid");
        object.approach_ms = 2.0 * MILLIS_PER_DAY;
        object
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_fixture_is_valid() {
        let record = fixtures::record("1", true, 10.0, 100.0, 1000.0, "2026-Oct-18 00:00");
        assert!(crate::sim::trajectory::validate(&record).is_ok());
    }

    #[test]
    fn test_tracked_fixture_timing() {
        let object = fixtures::tracked("1", false, 1.0e6);
        assert_eq!(object.start_ms, 0.0);
        assert!(object.approach_ms > object.start_ms);
    }
}
