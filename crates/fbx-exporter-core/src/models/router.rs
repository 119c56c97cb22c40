use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Width of the window requested from the rrd database, in seconds.
/// Matches the collection interval so each cycle reads the latest sample.
const RRD_WINDOW_SECS: i64 = 10;

/// Body of `POST rrd/`
#[derive(Debug, Clone, Serialize)]
pub struct RrdQuery {
    pub db: String,
    pub date_start: i64,
    pub precision: u32,
    pub fields: Vec<String>,
}

impl RrdQuery {
    /// Query the latest window of `db` for the given fields.
    pub fn latest(db: &str, fields: &[&str], now: i64) -> Self {
        Self {
            db: db.to_string(),
            date_start: now - RRD_WINDOW_SECS,
            precision: RRD_WINDOW_SECS as u32,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Answer of `POST rrd/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RrdResult {
    pub date_start: Option<i64>,
    pub date_end: Option<i64>,
    #[serde(default)]
    pub data: Vec<HashMap<String, f64>>,
}

impl RrdResult {
    /// Values of `fields` in the first data point, in order.
    /// Empty when the router returned no data point at all.
    pub fn first_values(&self, fields: &[&str]) -> Vec<f64> {
        match self.data.first() {
            Some(point) => fields
                .iter()
                .map(|f| point.get(*f).copied().unwrap_or_default())
                .collect(),
            None => Vec::new(),
        }
    }
}

/// One host of `GET lan/browser/pub/`
#[derive(Debug, Clone, Deserialize)]
pub struct LanHost {
    pub primary_name: Option<String>,
    #[serde(default)]
    pub reachable: bool,
}

/// Answer of `GET system/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemInfo {
    #[serde(default)]
    pub temp_cpub: f64,
    #[serde(default)]
    pub temp_cpum: f64,
    #[serde(default)]
    pub temp_hdd: f64,
    #[serde(default)]
    pub temp_sw: f64,
    #[serde(default)]
    pub fan_rpm: f64,
}
