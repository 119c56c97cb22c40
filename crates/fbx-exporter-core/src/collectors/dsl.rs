use crate::api::{ApiError, RequestExecutor};

use super::fetch_rrd;

pub const DSL_FIELDS: [&str; 4] = ["rate_up", "rate_down", "snr_up", "snr_down"];

/// Line rates and signal-to-noise ratios of the DSL link.
pub async fn collect_dsl(executor: &RequestExecutor) -> Result<Vec<f64>, ApiError> {
    fetch_rrd(executor, "dsl", &DSL_FIELDS).await
}
