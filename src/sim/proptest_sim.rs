//! Property-based tests for synthesis and animation using proptest.
//!
//! These tests verify invariants across a wide range of records, clock rates
//! and simulated times.

use bevy::math::DVec3;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::sim::animator::{progress_at, tick, FrameInput};
use crate::sim::registry::NeoRegistry;
use crate::sim::trajectory::{orbit_radius, synthesize};
use crate::sim::visibility::{apply_visibility, VisibilityToggles};
use crate::test_utils::fixtures;
use crate::types::{SimulationClock, EARTH_RADIUS, MILLIS_PER_DAY};

/// Build a registry of one object created at t = 0 approaching at `approach_ms`.
fn single_object_registry(seed: u64, hazardous: bool, miss_km: f64, approach_ms: f64) -> NeoRegistry {
    let record = fixtures::record("p", hazardous, 40.0, miss_km, 50_000.0, "2000-Jan-01 12:00");
    let mut object = synthesize(&record, 0.0, &mut StdRng::seed_from_u64(seed)).unwrap();
    object.approach_ms = approach_ms;
    let mut registry = NeoRegistry::from_objects([object]);
    apply_visibility(
        &mut registry,
        &VisibilityToggles {
            master: true,
            ..VisibilityToggles::default()
        },
    );
    registry
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Hazardous paths terminate on Earth's surface.
    #[test]
    fn prop_hazardous_endpoint_on_surface(
        seed in any::<u64>(),
        miss_km in 0.0f64..1.0e9,
    ) {
        let record = fixtures::record("h", true, 30.0, miss_km, 20_000.0, "2000-Jan-01 12:00");
        let object = synthesize(&record, 0.0, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert!((object.curve.end.length() - EARTH_RADIUS).abs() < 1e-9);
    }

    /// The curve midpoint stays inside the hull built from the orbit radius.
    #[test]
    fn prop_midpoint_within_construction_bounds(
        seed in any::<u64>(),
        hazardous in any::<bool>(),
        miss_km in 0.0f64..1.0e9,
    ) {
        let record = fixtures::record("m", hazardous, 30.0, miss_km, 20_000.0, "2000-Jan-01 12:00");
        let object = synthesize(&record, 0.0, &mut StdRng::seed_from_u64(seed)).unwrap();
        let radius = orbit_radius(miss_km);
        prop_assert!((object.curve.control.length()
            - if hazardous { radius } else { radius * 1.5 }).abs() < 1e-6,
            "control point length does not match orbit radius");

        let mid = object.curve.point_at(0.5).length();
        let bound = object.curve.start.length()
            .max(object.curve.control.length())
            .max(object.curve.end.length());
        prop_assert!(mid <= bound + 1e-9);
        if hazardous {
            prop_assert!(mid <= radius + 400.0_f64.min(radius * 1.5) + 1e-9);
        }
    }

    /// Progress never leaves [0, 1], however far the clock is from the approach.
    #[test]
    fn prop_progress_bounded(
        start in -1.0e13f64..1.0e13,
        approach in -1.0e13f64..1.0e13,
        sim in -1.0e15f64..1.0e15,
    ) {
        if let Ok(progress) = progress_at(start, approach, sim) {
            prop_assert!((0.0..=1.0).contains(&progress));
        }
    }

    /// With a positive constant rate, progress never decreases.
    #[test]
    fn prop_progress_monotonic_forward(
        seed in any::<u64>(),
        approach_days in 0.01f64..30.0,
        rate in 1.0f64..100_000.0,
        deltas in prop::collection::vec(0.0f64..2.0, 1..50),
    ) {
        let mut registry = single_object_registry(seed, false, 1.0e6, approach_days * MILLIS_PER_DAY);
        let mut clock = SimulationClock::starting_at(0.0);
        clock.set_rate(rate);

        let mut last = 0.0;
        for delta in deltas {
            let frame = FrameInput { real_delta_secs: delta, ..FrameInput::default() };
            tick(&mut clock, &mut registry, &frame);
            let progress = registry.get("p").unwrap().display.progress;
            prop_assert!(progress >= last);
            last = progress;
        }
    }

    /// Two zero-length ticks leave every derived quantity untouched.
    #[test]
    fn prop_zero_delta_idempotent(
        seed in any::<u64>(),
        hazardous in any::<bool>(),
        sim_offset_days in -10.0f64..10.0,
        wall in 0.0f64..1000.0,
    ) {
        let mut registry = single_object_registry(seed, hazardous, 30_000.0, 2.0 * MILLIS_PER_DAY);
        let mut clock = SimulationClock::starting_at(sim_offset_days * MILLIS_PER_DAY);
        let frame = FrameInput { real_delta_secs: 0.0, wall_elapsed_secs: wall, ..FrameInput::default() };

        tick(&mut clock, &mut registry, &frame);
        let once = registry.get("p").unwrap().display.clone();
        let clock_once = clock.simulated_ms;
        tick(&mut clock, &mut registry, &frame);

        prop_assert_eq!(&registry.get("p").unwrap().display, &once);
        prop_assert_eq!(clock.simulated_ms, clock_once);
    }

    /// While paused, real time passing changes neither the clock nor the object.
    #[test]
    fn prop_pause_freezes_state(
        seed in any::<u64>(),
        deltas in prop::collection::vec(0.0f64..100.0, 1..20),
    ) {
        // Far miss: no warning pulse, so glow depends on simulated time only.
        let mut registry = single_object_registry(seed, true, 5.0e7, MILLIS_PER_DAY);
        let mut clock = SimulationClock::starting_at(0.3 * MILLIS_PER_DAY);
        tick(&mut clock, &mut registry, &FrameInput::default());

        clock.set_rate(0.0);
        let frozen_time = clock.simulated_ms;
        let frozen = registry.get("p").unwrap().display.clone();

        let mut wall = 0.0;
        for delta in deltas {
            wall += delta;
            let frame = FrameInput { real_delta_secs: delta, wall_elapsed_secs: wall, ..FrameInput::default() };
            tick(&mut clock, &mut registry, &frame);
        }

        prop_assert_eq!(clock.simulated_ms, frozen_time);
        prop_assert_eq!(&registry.get("p").unwrap().display, &frozen);
    }

    /// Huge real deltas teleport time without producing non-finite state.
    #[test]
    fn prop_large_deltas_stay_finite(
        seed in any::<u64>(),
        delta in 0.0f64..1.0e7,
        rate in -1.0e4f64..1.0e4,
    ) {
        let mut registry = single_object_registry(seed, true, 1.0e5, MILLIS_PER_DAY);
        let mut clock = SimulationClock::starting_at(0.0);
        clock.set_rate(rate);
        let frame = FrameInput { real_delta_secs: delta, camera_position: DVec3::new(30.0, 15.0, 30.0), ..FrameInput::default() };
        tick(&mut clock, &mut registry, &frame);

        let display = &registry.get("p").unwrap().display;
        prop_assert!(clock.simulated_ms.is_finite());
        prop_assert!(display.position.is_finite());
        prop_assert!(display.current_distance_km.is_finite());
        prop_assert!(display.glow_intensity.is_finite());
    }
}
