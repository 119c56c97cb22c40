//! Metric collectors, one per router domain.
//!
//! Each collector issues one request through the [`RequestExecutor`],
//! decodes the answer and returns its readings in a fixed order. They never
//! retry; a failed domain is reported to the caller and skipped this cycle.
//!
//! - DSL: `[rate_up, rate_down, snr_up, snr_down]`
//! - NET: `[bw_up, bw_down, rate_up, rate_down, vpn_rate_up, vpn_rate_down]`
//! - LAN: `{name, reachable}` per named host
//! - SYSTEM: `[temp_cpub, temp_cpum, temp_hdd, temp_sw, fan_rpm]`

pub mod dsl;
pub mod lan;
pub mod net;
pub mod system;

use chrono::Utc;

use crate::api::{ApiError, ApiRequest, RequestExecutor};
use crate::models::{RrdQuery, RrdResult};

pub use dsl::{collect_dsl, DSL_FIELDS};
pub use lan::{collect_lan, HostReachability};
pub use net::{collect_net, NET_FIELDS};
pub use system::{collect_system, SYSTEM_FIELDS};

/// Latest values of `fields` from the router's rrd database `db`.
async fn fetch_rrd(executor: &RequestExecutor, db: &str, fields: &[&str]) -> Result<Vec<f64>, ApiError> {
    let query = RrdQuery::latest(db, fields, Utc::now().timestamp());
    let request = ApiRequest::post(executor.endpoints().rrd.as_str(), &query)?;
    let result: RrdResult = executor.execute_json(&request).await?;
    Ok(result.first_values(fields))
}
