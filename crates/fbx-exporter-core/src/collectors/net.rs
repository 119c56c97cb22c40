use crate::api::{ApiError, RequestExecutor};

use super::fetch_rrd;

pub const NET_FIELDS: [&str; 6] = [
    "bw_up",
    "bw_down",
    "rate_up",
    "rate_down",
    "vpn_rate_up",
    "vpn_rate_down",
];

/// WAN bandwidth, WAN throughput and VPN throughput.
pub async fn collect_net(executor: &RequestExecutor) -> Result<Vec<f64>, ApiError> {
    fetch_rrd(executor, "net", &NET_FIELDS).await
}
