//! Trajectory synthesis.
//!
//! Each feed record carries a single close approach, which is not enough to
//! recover a real orbit. Instead every object gets an illustrative quadratic
//! Bézier curve through a randomly oriented closest-approach point at the
//! (capped) miss distance:
//!
//! - hazardous objects start out in space, swing through the closest point and
//!   end on Earth's surface;
//! - everything else crosses the whole scene on a long, gently bowed path.

use std::f64::consts::{FRAC_PI_2, TAU};

use bevy::math::{DQuat, DVec3};
use chrono::NaiveDateTime;
use rand::Rng;

use crate::feed::{NeoRecord, Numeric};
use crate::sim::registry::{DisplayState, TrackedObject};
use crate::types::{format_date_time, ASTEROID_DENSITY, EARTH_RADIUS, KM_SCALE};

/// Upper bound on the closest-approach radius, in scene units.
pub const MAX_ORBIT_RADIUS: f64 = 500.0;

/// Hazardous path length cap, in scene units.
pub const HAZARDOUS_MAX_PATH_LENGTH: f64 = 400.0;

/// Hazardous path length as a multiple of the orbit radius (before the cap).
pub const HAZARDOUS_PATH_FACTOR: f64 = 1.5;

/// Half-length of a safe fly-by path, in scene units.
pub const FLYBY_PATH_LENGTH: f64 = 5000.0;

/// Control point of a fly-by sits this far out relative to the closest point.
pub const FLYBY_CONTROL_FACTOR: f64 = 1.5;

/// Format of `close_approach_date_full`, e.g. "2026-Oct-18 14:05" (UTC).
pub const APPROACH_DATE_FORMAT: &str = "%Y-%b-%d %H:%M";

/// Divisions used to approximate the arc length.
const ARC_LENGTH_DIVISIONS: usize = 200;

/// Quadratic Bézier curve in scene coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadraticBezier {
    pub start: DVec3,
    pub control: DVec3,
    pub end: DVec3,
}

impl QuadraticBezier {
    pub fn new(start: DVec3, control: DVec3, end: DVec3) -> Self {
        Self {
            start,
            control,
            end,
        }
    }

    /// Evaluate at curve parameter `t` in [0, 1].
    ///
    /// This is the raw Bézier parameter, not arc length, so equal steps in `t`
    /// do not cover equal distances.
    pub fn point_at(&self, t: f64) -> DVec3 {
        let u = 1.0 - t;
        self.start * (u * u) + self.control * (2.0 * u * t) + self.end * (t * t)
    }

    /// `segments + 1` evenly spaced (in `t`) points from start to end.
    pub fn sample(&self, segments: usize) -> Vec<DVec3> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }

    /// Polyline approximation of the curve length.
    pub fn arc_length(&self, divisions: usize) -> f64 {
        self.sample(divisions)
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
}

/// A feed record that cannot be turned into a tracked object.
///
/// Per-record and non-fatal: the loader skips the record and keeps going.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("record {id}: missing field `{field}`")]
    MissingField { id: String, field: &'static str },

    #[error("record {id}: field `{field}` is not a number: {value:?}")]
    NotANumber {
        id: String,
        field: &'static str,
        value: String,
    },

    #[error("record {id}: field `{field}` out of range: {value}")]
    OutOfRange {
        id: String,
        field: &'static str,
        value: f64,
    },

    #[error("record {id}: unparseable approach time {value:?}")]
    BadTimestamp { id: String, value: String },
}

/// Validated values pulled out of a record.
#[derive(Clone, Debug, PartialEq)]
pub struct ApproachFacts {
    pub diameter_meters: f64,
    pub miss_distance_km: f64,
    pub velocity_km_per_hour: f64,
    /// Unix milliseconds.
    pub approach_ms: f64,
    /// Approach time as shown to the user.
    pub approach_label: String,
}

fn non_negative(
    id: &str,
    field: &'static str,
    value: Option<&Numeric>,
) -> Result<f64, ValidationError> {
    let value = value.ok_or_else(|| ValidationError::MissingField {
        id: id.to_string(),
        field,
    })?;
    let number = value.as_f64().ok_or_else(|| ValidationError::NotANumber {
        id: id.to_string(),
        field,
        value: value.raw(),
    })?;
    if number < 0.0 {
        return Err(ValidationError::OutOfRange {
            id: id.to_string(),
            field,
            value: number,
        });
    }
    Ok(number)
}

/// Parse a `close_approach_date_full` string as UTC Unix milliseconds.
pub fn parse_approach_timestamp(value: &str) -> Option<f64> {
    NaiveDateTime::parse_from_str(value.trim(), APPROACH_DATE_FORMAT)
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis() as f64)
}

/// Check a record and extract the numbers synthesis needs.
pub fn validate(record: &NeoRecord) -> Result<ApproachFacts, ValidationError> {
    let id = record.id.as_str();
    if id.trim().is_empty() {
        return Err(ValidationError::MissingField {
            id: String::new(),
            field: "id",
        });
    }
    let approach = record
        .first_approach()
        .ok_or_else(|| ValidationError::MissingField {
            id: id.to_string(),
            field: "close_approach_data",
        })?;

    let diameter_meters = non_negative(
        id,
        "estimated_diameter.meters.estimated_diameter_max",
        record.max_diameter_meters(),
    )?;
    let miss_distance_km = non_negative(
        id,
        "miss_distance.kilometers",
        approach
            .miss_distance
            .as_ref()
            .and_then(|m| m.kilometers.as_ref()),
    )?;
    let velocity_km_per_hour = non_negative(
        id,
        "relative_velocity.kilometers_per_hour",
        approach
            .relative_velocity
            .as_ref()
            .and_then(|v| v.kilometers_per_hour.as_ref()),
    )?;

    let date_full = approach.close_approach_date_full.as_deref();
    let epoch = approach
        .epoch_date_close_approach
        .as_ref()
        .and_then(Numeric::as_f64);

    let (approach_ms, approach_label) = match (date_full.and_then(parse_approach_timestamp), epoch)
    {
        (Some(ms), _) => (ms, date_full.unwrap_or_default().trim().to_string()),
        (None, Some(ms)) => (ms, format_date_time(ms)),
        (None, None) => {
            return Err(match date_full {
                Some(value) => ValidationError::BadTimestamp {
                    id: id.to_string(),
                    value: value.to_string(),
                },
                None => ValidationError::MissingField {
                    id: id.to_string(),
                    field: "close_approach_date_full",
                },
            });
        }
    };

    Ok(ApproachFacts {
        diameter_meters,
        miss_distance_km,
        velocity_km_per_hour,
        approach_ms,
        approach_label,
    })
}

/// Uniformly distributed direction on the unit sphere.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> DVec3 {
    let z: f64 = rng.gen_range(-1.0..=1.0);
    let phi: f64 = rng.gen_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    DVec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Closest-approach radius in scene units: Earth radius plus scaled miss distance, capped.
pub fn orbit_radius(miss_distance_km: f64) -> f64 {
    (EARTH_RADIUS + miss_distance_km * KM_SCALE).min(MAX_ORBIT_RADIUS)
}

/// Sphere volume times the assumed density.
pub fn mass_from_diameter(diameter_meters: f64) -> f64 {
    let radius = diameter_meters / 2.0;
    4.0 / 3.0 * std::f64::consts::PI * radius.powi(3) * ASTEROID_DENSITY
}

/// Build the curve for a closest-approach direction and a rotation axis.
///
/// `closest_dir` and `axis` must be unit vectors. The lateral direction is
/// `closest_dir` turned 90° about `axis`.
pub fn build_curve(
    is_hazardous: bool,
    closest_dir: DVec3,
    axis: DVec3,
    orbit_radius: f64,
) -> QuadraticBezier {
    let closest_point = closest_dir * orbit_radius;
    let direction = DQuat::from_axis_angle(axis, FRAC_PI_2) * closest_dir;

    if is_hazardous {
        let path_length = HAZARDOUS_MAX_PATH_LENGTH.min(orbit_radius * HAZARDOUS_PATH_FACTOR);
        QuadraticBezier::new(
            closest_point + direction * path_length,
            closest_point,
            closest_dir * EARTH_RADIUS,
        )
    } else {
        QuadraticBezier::new(
            closest_point - direction * FLYBY_PATH_LENGTH,
            closest_point * FLYBY_CONTROL_FACTOR,
            closest_point + direction * FLYBY_PATH_LENGTH,
        )
    }
}

/// Turn one feed record into a tracked object created at `now_ms`.
///
/// The only nondeterminism is the two direction samples drawn from `rng`.
pub fn synthesize<R: Rng + ?Sized>(
    record: &NeoRecord,
    now_ms: f64,
    rng: &mut R,
) -> Result<TrackedObject, ValidationError> {
    let facts = validate(record)?;
    let is_hazardous = record.is_potentially_hazardous_asteroid;

    let radius = orbit_radius(facts.miss_distance_km);
    let closest_dir = random_unit_vector(rng);
    let axis = random_unit_vector(rng);
    let curve = build_curve(is_hazardous, closest_dir, axis, radius);

    let name = if record.name.trim().is_empty() {
        record.id.clone()
    } else {
        record.name.clone()
    };

    Ok(TrackedObject {
        id: record.id.clone(),
        name,
        is_hazardous,
        diameter_meters: facts.diameter_meters,
        mass_kg: mass_from_diameter(facts.diameter_meters),
        miss_distance_km: facts.miss_distance_km,
        velocity_km_per_hour: facts.velocity_km_per_hour,
        approach_ms: facts.approach_ms,
        approach_label: facts.approach_label,
        orbit_radius: radius,
        curve_length: curve.arc_length(ARC_LENGTH_DIVISIONS),
        curve,
        start_ms: now_ms,
        display: DisplayState::initial(is_hazardous),
    })
}
