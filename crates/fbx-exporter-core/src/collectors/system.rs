use crate::api::{ApiError, ApiRequest, RequestExecutor};
use crate::models::SystemInfo;

pub const SYSTEM_FIELDS: [&str; 5] = ["temp_cpub", "temp_cpum", "temp_hdd", "temp_sw", "fan_rpm"];

/// Board temperatures and fan speed.
pub async fn collect_system(executor: &RequestExecutor) -> Result<Vec<f64>, ApiError> {
    let request = ApiRequest::get(executor.endpoints().system.as_str());
    let info: SystemInfo = executor.execute_json(&request).await?;
    Ok(vec![
        info.temp_cpub,
        info.temp_cpum,
        info.temp_hdd,
        info.temp_sw,
        info.fan_rpm,
    ])
}
