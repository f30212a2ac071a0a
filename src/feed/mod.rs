//! Near-Earth-object feed: record types, fetch windows and merging.
//!
//! The upstream feed (NASA NeoWs) answers one request per date range of at
//! most seven days. A load splits the requested window into such chunks,
//! fetches them sequentially and merges the pages, keeping the first record
//! seen for each identifier.

mod client;

use std::collections::{BTreeMap, HashSet};

use bevy::log::info;
use chrono::{Days, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

pub use client::{NeoWsClient, FEED_URL};

/// Longest date range a single feed request may cover.
pub const MAX_DAYS_PER_REQUEST: u32 = 7;

/// Failure while fetching or decoding the feed. Aborts the whole load.
#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("NASA API key required")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API Error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("malformed feed payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// A numeric field that the feed encodes either as a JSON number or as a string.
///
/// Any other JSON value lands in `Other` so that validation can name the field.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Numeric {
    /// Finite numeric value, if the field parses as one.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => s.trim().parse().ok()?,
            Numeric::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Raw representation for error messages.
    pub fn raw(&self) -> String {
        match self {
            Numeric::Number(n) => n.to_string(),
            Numeric::Text(s) => s.clone(),
            Numeric::Other(v) => v.to_string(),
        }
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Numeric::Number(value)
    }
}

impl From<&str> for Numeric {
    fn from(value: &str) -> Self {
        Numeric::Text(value.to_string())
    }
}

/// Decode a field, treating a value of the wrong JSON type as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Record identifiers arrive as strings, occasionally as bare numbers.
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => id,
        serde_json::Value::Number(id) => id.to_string(),
        _ => String::new(),
    })
}

/// One near-Earth object as delivered by the feed.
///
/// Decoding never fails on a JSON object: fields of the wrong type come out
/// empty and are reported later by validation.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NeoRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub is_potentially_hazardous_asteroid: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub estimated_diameter: Option<EstimatedDiameter>,
    #[serde(default, deserialize_with = "lenient")]
    pub close_approach_data: Vec<CloseApproach>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct EstimatedDiameter {
    #[serde(default, deserialize_with = "lenient")]
    pub meters: Option<DiameterRange>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DiameterRange {
    #[serde(default)]
    pub estimated_diameter_min: Option<Numeric>,
    #[serde(default)]
    pub estimated_diameter_max: Option<Numeric>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CloseApproach {
    /// e.g. "2026-Oct-18 14:05"
    #[serde(default, deserialize_with = "lenient")]
    pub close_approach_date_full: Option<String>,
    /// Unix milliseconds.
    #[serde(default)]
    pub epoch_date_close_approach: Option<Numeric>,
    #[serde(default, deserialize_with = "lenient")]
    pub relative_velocity: Option<RelativeVelocity>,
    #[serde(default, deserialize_with = "lenient")]
    pub miss_distance: Option<MissDistance>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RelativeVelocity {
    #[serde(default)]
    pub kilometers_per_hour: Option<Numeric>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MissDistance {
    #[serde(default)]
    pub kilometers: Option<Numeric>,
}

impl NeoRecord {
    /// The approach the simulation uses. Later entries are ignored.
    pub fn first_approach(&self) -> Option<&CloseApproach> {
        self.close_approach_data.first()
    }

    pub fn max_diameter_meters(&self) -> Option<&Numeric> {
        self.estimated_diameter
            .as_ref()?
            .meters
            .as_ref()?
            .estimated_diameter_max
            .as_ref()
    }
}

/// One feed response page.
#[derive(Deserialize, Debug)]
struct FeedPage {
    /// Keyed by "YYYY-MM-DD"; `BTreeMap` keeps the days in order.
    near_earth_objects: BTreeMap<String, Vec<serde_json::Value>>,
}

/// Decode a feed response body into records, flattening all days.
///
/// Only the page envelope can fail. Each entry is decoded on its own, and an
/// entry that is not even an object becomes an empty record that validation
/// rejects.
pub fn parse_page(body: &str) -> Result<Vec<NeoRecord>, FeedError> {
    let page: FeedPage = serde_json::from_str(body)?;
    Ok(page
        .near_earth_objects
        .into_values()
        .flatten()
        .map(|entry| serde_json::from_value(entry).unwrap_or_default())
        .collect())
}

/// Extract the human-readable message from an error response body.
pub fn api_error_message(body: &str) -> String {
    let fallback = || "An unknown error occurred.".to_string();
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback();
    };
    value
        .pointer("/error/message")
        .or_else(|| value.get("error_message"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(fallback)
}

/// Preset fetch window lengths offered to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FetchWindow {
    OneDay,
    ThreeDays,
    #[default]
    SevenDays,
    FourteenDays,
    ThirtyDays,
}

impl FetchWindow {
    pub const ALL: [FetchWindow; 5] = [
        FetchWindow::OneDay,
        FetchWindow::ThreeDays,
        FetchWindow::SevenDays,
        FetchWindow::FourteenDays,
        FetchWindow::ThirtyDays,
    ];

    pub fn days(self) -> u32 {
        match self {
            FetchWindow::OneDay => 1,
            FetchWindow::ThreeDays => 3,
            FetchWindow::SevenDays => 7,
            FetchWindow::FourteenDays => 14,
            FetchWindow::ThirtyDays => 30,
        }
    }

    pub fn from_days(days: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.days() == days)
    }

    pub fn label(self) -> String {
        match self.days() {
            1 => "1 day".to_string(),
            n => format!("{n} days"),
        }
    }
}

/// Inclusive date range covered by one feed request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Split `days` starting at `today` into request-sized ranges.
///
/// Chunk `i` starts at `today + i` and spans `min(6, days - i - 1)` further days.
pub fn date_ranges(today: NaiveDate, days: u32) -> Vec<DateRange> {
    (0..days)
        .step_by(MAX_DAYS_PER_REQUEST as usize)
        .filter_map(|offset| {
            let start = today.checked_add_days(Days::new(offset.into()))?;
            let span = (MAX_DAYS_PER_REQUEST - 1).min(days - offset - 1);
            let end = start.checked_add_days(Days::new(span.into()))?;
            Some(DateRange { start, end })
        })
        .collect()
}

/// Concatenate pages, keeping only the first record for each identifier.
///
/// Records without an identifier all pass through so each one is reported.
pub fn merge_unique<I>(pages: I) -> Vec<NeoRecord>
where
    I: IntoIterator<Item = Vec<NeoRecord>>,
{
    let mut seen = HashSet::new();
    pages
        .into_iter()
        .flatten()
        .filter(|record| record.id.is_empty() || seen.insert(record.id.clone()))
        .collect()
}

/// Anything that can answer a single date-range request.
pub trait FeedSource {
    fn fetch_range(&self, range: &DateRange) -> Result<Vec<NeoRecord>, FeedError>;
}

/// Fetch every chunk of `window` sequentially and merge the results.
///
/// The first failing request aborts the load. `on_progress` receives
/// `(completed, total)` after each chunk.
pub fn load_feed<S>(
    source: &S,
    today: NaiveDate,
    window: FetchWindow,
    mut on_progress: impl FnMut(usize, usize),
) -> Result<Vec<NeoRecord>, FeedError>
where
    S: FeedSource + ?Sized,
{
    let ranges = date_ranges(today, window.days());
    let mut pages = Vec::with_capacity(ranges.len());

    for (i, range) in ranges.iter().enumerate() {
        info!("Fetching NEO feed {} .. {}", range.start, range.end);
        pages.push(source.fetch_range(range)?);
        on_progress(i + 1, ranges.len());
    }

    let fetched: usize = pages.iter().map(Vec::len).sum();
    let merged = merge_unique(pages);
    info!(
        "Feed load complete: {} records, {} unique",
        fetched,
        merged.len()
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const SAMPLE: &str = r#"{
        "element_count": 2,
        "near_earth_objects": {
            "2026-10-19": [{
                "id": "3542519",
                "name": "(2010 PK9)",
                "is_potentially_hazardous_asteroid": true,
                "estimated_diameter": {"meters": {"estimated_diameter_min": 110.2, "estimated_diameter_max": 246.4}},
                "close_approach_data": [{
                    "close_approach_date_full": "2026-Oct-19 03:12",
                    "epoch_date_close_approach": 1792379520000,
                    "relative_velocity": {"kilometers_per_hour": "63471.2217"},
                    "miss_distance": {"kilometers": "7239585.4"}
                }]
            }],
            "2026-10-18": [{
                "id": "54016234",
                "name": "(2020 RQ4)",
                "is_potentially_hazardous_asteroid": false,
                "estimated_diameter": {"meters": {"estimated_diameter_max": 38.1}},
                "close_approach_data": [{
                    "close_approach_date_full": "2026-Oct-18 21:40",
                    "relative_velocity": {"kilometers_per_hour": "30412.9"},
                    "miss_distance": {"kilometers": "1523000.7"}
                }]
            }]
        }
    }"#;

    fn record(id: &str) -> NeoRecord {
        NeoRecord {
            id: id.to_string(),
            name: format!("({id})"),
            is_potentially_hazardous_asteroid: false,
            estimated_diameter: None,
            close_approach_data: Vec::new(),
        }
    }

    #[test]
    fn test_parse_page_flattens_days_in_order() {
        let records = parse_page(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "54016234");
        assert_eq!(records[1].id, "3542519");
        assert!(records[1].is_potentially_hazardous_asteroid);

        let approach = records[1].first_approach().unwrap();
        let velocity = approach.relative_velocity.as_ref().unwrap();
        assert_eq!(
            velocity.kilometers_per_hour.as_ref().and_then(Numeric::as_f64),
            Some(63471.2217)
        );
        assert_eq!(
            records[1].max_diameter_meters().and_then(Numeric::as_f64),
            Some(246.4)
        );
    }

    #[test]
    fn test_numeric_rejects_garbage() {
        assert_eq!(Numeric::from("12.5").as_f64(), Some(12.5));
        assert_eq!(Numeric::from("abc").as_f64(), None);
        assert_eq!(Numeric::from("NaN").as_f64(), None);
        assert_eq!(Numeric::from(f64::INFINITY).as_f64(), None);
    }

    #[test]
    fn test_parse_page_survives_mistyped_fields() {
        let body = r#"{"near_earth_objects": {"2026-10-18": [
            {"id": "1", "name": null, "close_approach_data": null},
            {"id": 2, "is_potentially_hazardous_asteroid": "yes",
             "close_approach_data": [{"relative_velocity": {"kilometers_per_hour": true},
                                      "miss_distance": 12}]},
            42
        ]}}"#;
        let records = parse_page(body).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].name, "");
        assert!(records[0].close_approach_data.is_empty());

        assert_eq!(records[1].id, "2");
        assert!(!records[1].is_potentially_hazardous_asteroid);
        let approach = records[1].first_approach().unwrap();
        assert!(approach.miss_distance.is_none());
        let velocity = approach.relative_velocity.as_ref().unwrap();
        let speed = velocity.kilometers_per_hour.as_ref().unwrap();
        assert_eq!(speed.as_f64(), None);
        assert_eq!(speed.raw(), "true");

        assert_eq!(records[2], NeoRecord::default());
    }

    #[test]
    fn test_merge_passes_records_without_id() {
        let merged = merge_unique(vec![
            vec![NeoRecord::default(), record("a")],
            vec![NeoRecord::default(), record("a")],
        ]);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_api_error_message_variants() {
        assert_eq!(
            api_error_message(r#"{"error": {"code": "API_KEY_INVALID", "message": "An invalid api_key was supplied."}}"#),
            "An invalid api_key was supplied."
        );
        assert_eq!(
            api_error_message(r#"{"error_message": "Date Format Exception"}"#),
            "Date Format Exception"
        );
        assert_eq!(api_error_message("<html>"), "An unknown error occurred.");
    }

    #[test]
    fn test_date_ranges_chunk_by_week() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        let one = date_ranges(today, 1);
        assert_eq!(one, vec![DateRange { start: today, end: today }]);

        let thirty = date_ranges(today, 30);
        assert_eq!(thirty.len(), 5);
        assert_eq!(thirty[0].end, NaiveDate::from_ymd_opt(2026, 10, 24).unwrap());
        assert_eq!(thirty[4].start, NaiveDate::from_ymd_opt(2026, 11, 15).unwrap());
        // Last chunk covers only the remaining two days.
        assert_eq!(thirty[4].end, NaiveDate::from_ymd_opt(2026, 11, 16).unwrap());
    }

    #[test]
    fn test_fetch_window_presets() {
        assert_eq!(FetchWindow::default().days(), 7);
        assert_eq!(FetchWindow::from_days(14), Some(FetchWindow::FourteenDays));
        assert_eq!(FetchWindow::from_days(5), None);
        assert_eq!(FetchWindow::OneDay.label(), "1 day");
    }

    #[test]
    fn test_merge_keeps_first_occurrence() {
        let mut first = record("54016234");
        first.name = "first".to_string();
        let mut second = record("54016234");
        second.name = "second".to_string();

        let merged = merge_unique(vec![vec![first, record("1")], vec![second, record("2")]]);
        let ids: Vec<_> = merged.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["54016234", "1", "2"]);
        assert_eq!(merged[0].name, "first");
    }

    struct ScriptedSource {
        pages: RefCell<Vec<Result<Vec<NeoRecord>, FeedError>>>,
    }

    impl FeedSource for ScriptedSource {
        fn fetch_range(&self, _range: &DateRange) -> Result<Vec<NeoRecord>, FeedError> {
            self.pages.borrow_mut().remove(0)
        }
    }

    #[test]
    fn test_load_feed_reports_progress_and_dedups() {
        let source = ScriptedSource {
            pages: RefCell::new(vec![
                Ok(vec![record("a"), record("b")]),
                Ok(vec![record("b"), record("c")]),
            ]),
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let mut progress = Vec::new();

        let records = load_feed(&source, today, FetchWindow::FourteenDays, |done, total| {
            progress.push((done, total))
        })
        .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(progress, vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_load_feed_aborts_on_first_error() {
        let source = ScriptedSource {
            pages: RefCell::new(vec![
                Ok(vec![record("a")]),
                Err(FeedError::Api {
                    status: 403,
                    message: "denied".to_string(),
                }),
            ]),
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        let err = load_feed(&source, today, FetchWindow::FourteenDays, |_, _| {}).unwrap_err();
        assert_eq!(err.to_string(), "API Error: 403 - denied");
    }
}
