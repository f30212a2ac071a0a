//! Scene constants, time helpers and the simulation clock.

use bevy::prelude::*;
use chrono::{DateTime, Datelike, Timelike, Utc};

/// Earth radius in scene units. Everything else in the scene is sized relative to it.
pub const EARTH_RADIUS: f64 = 10.0;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Scene units per kilometer.
pub const KM_SCALE: f64 = EARTH_RADIUS / EARTH_RADIUS_KM;

/// Moon radius in scene units (not to scale with its orbit).
pub const MOON_RADIUS: f64 = EARTH_RADIUS * 0.27;

/// Moon orbit radius in scene units (compressed for display).
pub const MOON_ORBIT_DISTANCE: f64 = EARTH_RADIUS * 3.84;

/// Earth axial tilt in radians.
pub const EARTH_TILT: f64 = 23.5 * DEG_TO_RAD;

/// Assumed bulk density of an asteroid (kg/m³).
pub const ASTEROID_DENSITY: f64 = 2000.0;

/// Degrees to radians conversion factor
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Milliseconds per second
pub const MILLIS_PER_SECOND: f64 = 1000.0;

/// Milliseconds per day
pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Milliseconds per hour
pub const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Milliseconds per minute
pub const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Observable state of the simulation clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClockState {
    /// Advancing at the given (non-zero, possibly negative) rate.
    Running(f64),
    /// Rate multiplier is zero.
    Paused,
}

/// Simulated wall-clock, decoupled from real elapsed time.
///
/// `simulated_ms` advances by `real_delta_seconds * rate * 1000` per tick.
/// A rate of zero is the paused state; negative rates run time backwards.
#[derive(Resource, Clone, Debug)]
pub struct SimulationClock {
    /// Current simulated time in Unix milliseconds.
    pub simulated_ms: f64,
    /// Signed rate multiplier (0 = paused).
    pub rate: f64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::starting_at(unix_millis_now())
    }
}

impl SimulationClock {
    /// Create a running clock (rate 1) at the given Unix milliseconds.
    pub fn starting_at(simulated_ms: f64) -> Self {
        Self {
            simulated_ms,
            rate: 1.0,
        }
    }

    pub fn state(&self) -> ClockState {
        if self.rate == 0.0 {
            ClockState::Paused
        } else {
            ClockState::Running(self.rate)
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state() == ClockState::Paused
    }

    /// Flip between paused and running at real-time rate.
    pub fn toggle(&mut self) {
        self.rate = if self.is_paused() { 1.0 } else { 0.0 };
    }

    /// Set an arbitrary rate. Non-finite rates are ignored.
    pub fn set_rate(&mut self, rate: f64) {
        if rate.is_finite() {
            self.rate = rate;
        }
    }

    /// Advance by a real-time delta and return the simulated milliseconds elapsed.
    ///
    /// Large deltas (a backgrounded window) are applied in full. Non-finite or
    /// negative deltas advance nothing, so the clock can never become NaN.
    pub fn advance(&mut self, real_delta_secs: f64) -> f64 {
        if self.is_paused() || !real_delta_secs.is_finite() || real_delta_secs <= 0.0 {
            return 0.0;
        }
        let step = real_delta_secs * MILLIS_PER_SECOND * self.rate;
        let next = self.simulated_ms + step;
        if !next.is_finite() {
            return 0.0;
        }
        self.simulated_ms = next;
        step
    }
}

/// Current system time in Unix milliseconds.
pub fn unix_millis_now() -> f64 {
    Utc::now().timestamp_millis() as f64
}

/// Convert Unix milliseconds to a UTC date-time, if representable.
pub fn millis_to_datetime(unix_ms: f64) -> Option<DateTime<Utc>> {
    if !unix_ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(unix_ms as i64)
}

/// Format as "Oct 18, 2026".
pub fn format_date(unix_ms: f64) -> String {
    millis_to_datetime(unix_ms)
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "--".to_string())
}

/// Format as "Oct 18, 2026, 14:05".
pub fn format_date_time(unix_ms: f64) -> String {
    millis_to_datetime(unix_ms)
        .map(|dt| dt.format("%b %-d, %Y, %H:%M").to_string())
        .unwrap_or_else(|| "--".to_string())
}

/// Format as a 24-hour "HH:MM:SS" UTC time of day.
pub fn format_time_of_day(unix_ms: f64) -> String {
    millis_to_datetime(unix_ms)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

/// Seconds elapsed since UTC midnight.
pub fn seconds_of_day(unix_ms: f64) -> f64 {
    millis_to_datetime(unix_ms)
        .map(|dt| dt.num_seconds_from_midnight() as f64)
        .unwrap_or(0.0)
}

/// Day of the month (1-31) in UTC.
pub fn day_of_month(unix_ms: f64) -> u32 {
    millis_to_datetime(unix_ms).map(|dt| dt.day()).unwrap_or(1)
}
