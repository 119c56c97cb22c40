use crate::api::{ApiError, ApiRequest, RequestExecutor};
use crate::models::LanHost;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostReachability {
    pub name: String,
    pub reachable: bool,
}

/// Reachability of every named host on the LAN.
pub async fn collect_lan(executor: &RequestExecutor) -> Result<Vec<HostReachability>, ApiError> {
    let request = ApiRequest::get(executor.endpoints().lan_browser.as_str());
    let hosts: Vec<LanHost> = executor.execute_json(&request).await?;
    Ok(reachability(hosts))
}

fn reachability(hosts: Vec<LanHost>) -> Vec<HostReachability> {
    hosts
        .into_iter()
        .filter_map(|host| {
            let name = host.primary_name.filter(|n| !n.is_empty())?;
            Some(HostReachability {
                name,
                reachable: host.reachable,
            })
        })
        .collect()
}
