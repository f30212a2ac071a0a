//! Text the UI shows about tracked objects.
//!
//! All time-relative strings are computed from the simulation clock through
//! [`time_until_approach`], so the label, the threat list and the hover panel
//! can never disagree.

use crate::sim::registry::{NeoRegistry, TrackedObject};
use crate::types::{format_date_time, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE};

/// Aggregate counts for the HUD.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FleetSummary {
    pub tracked: usize,
    pub hazardous: usize,
    pub safe: usize,
}

impl FleetSummary {
    pub fn from_registry(registry: &NeoRegistry) -> Self {
        let hazardous = registry.iter().filter(|o| o.is_hazardous).count();
        Self {
            tracked: registry.len(),
            hazardous,
            safe: registry.len() - hazardous,
        }
    }

    /// Whether the alert banner should be raised.
    pub fn has_threats(&self) -> bool {
        self.hazardous > 0
    }
}

/// Signed distance in time from now to the close approach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApproachCountdown {
    Until { days: u64, hours: u64, minutes: u64 },
    Since { days: u64, hours: u64 },
}

impl std::fmt::Display for ApproachCountdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApproachCountdown::Until {
                days,
                hours,
                minutes,
            } => write!(f, "{days}d {hours}h {minutes}m"),
            ApproachCountdown::Since { days, hours } => write!(f, "{days}d {hours}h ago"),
        }
    }
}

/// Countdown to (or time since) an object's close approach at simulated time `sim_ms`.
pub fn time_until_approach(object: &TrackedObject, sim_ms: f64) -> ApproachCountdown {
    let remaining = object.approach_ms - sim_ms;
    let span = remaining.abs();
    let days = (span / MILLIS_PER_DAY).floor() as u64;
    let hours = ((span % MILLIS_PER_DAY) / MILLIS_PER_HOUR).floor() as u64;

    if remaining < 0.0 {
        ApproachCountdown::Since { days, hours }
    } else {
        let minutes = ((span % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE).floor() as u64;
        ApproachCountdown::Until {
            days,
            hours,
            minutes,
        }
    }
}

/// Group an integer part with commas: 1234567.8 -> "1,234,567.8".
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 2);
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Estimated mass, scaled by 1e6 ("MT") or, above 1e9 kg, by 1e9 ("GT").
pub fn format_mass(mass_kg: f64) -> String {
    if mass_kg > 1.0e9 {
        format!("{:.2} GT", mass_kg / 1.0e9)
    } else {
        format!("{:.2} MT", mass_kg / 1.0e6)
    }
}

pub fn status_text(is_hazardous: bool) -> &'static str {
    if is_hazardous {
        "POTENTIALLY HAZARDOUS"
    } else {
        "SAFE PASSAGE"
    }
}

/// One entry in the threat list.
#[derive(Clone, Debug, PartialEq)]
pub struct ThreatEntry {
    pub id: String,
    pub name: String,
    pub closest_approach: String,
    pub diameter: String,
    pub velocity: String,
    pub miss_distance: String,
}

impl ThreatEntry {
    pub fn from_object(object: &TrackedObject) -> Self {
        Self {
            id: object.id.clone(),
            name: object.name.clone(),
            closest_approach: format_date_time(object.approach_ms),
            diameter: format!("{:.1} m", object.diameter_meters),
            velocity: format!("{} km/h", group_thousands(object.velocity_km_per_hour, 2)),
            miss_distance: format!("{} km", group_thousands(object.miss_distance_km, 2)),
        }
    }
}

/// Threat list entries for every hazardous object, in feed order.
pub fn threat_list(registry: &NeoRegistry) -> Vec<ThreatEntry> {
    registry
        .iter()
        .filter(|o| o.is_hazardous)
        .map(ThreatEntry::from_object)
        .collect()
}

/// Hover panel contents, recomputed from the clock on every request.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectDetails {
    pub name: String,
    pub is_hazardous: bool,
    /// (label, value) rows in display order.
    pub rows: Vec<(&'static str, String)>,
}

impl ObjectDetails {
    pub fn new(object: &TrackedObject, sim_ms: f64) -> Self {
        let display = &object.display;
        let rows = vec![
            ("Approach Date", object.approach_label.clone()),
            ("Time Until", time_until_approach(object, sim_ms).to_string()),
            ("Diameter", format!("{:.2} m", object.diameter_meters)),
            (
                "Velocity",
                format!("{} km/h", group_thousands(object.velocity_km_per_hour, 2)),
            ),
            ("Mass (Est.)", format_mass(object.mass_kg)),
            (
                "Miss Distance",
                format!("{} km", group_thousands(object.miss_distance_km, 2)),
            ),
            (
                "Current Distance",
                format!("{} km", group_thousands(display.current_distance_km, 0)),
            ),
            ("Progress", format!("{:.1}%", display.progress * 100.0)),
            ("Status", status_text(object.is_hazardous).to_string()),
        ];
        Self {
            name: object.name.clone(),
            is_hazardous: object.is_hazardous,
            rows,
        }
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }
}
