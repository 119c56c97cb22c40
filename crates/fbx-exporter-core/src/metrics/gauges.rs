use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Label values of the temperature gauges, in SYSTEM collector order
const TEMPERATURE_SENSORS: [&str; 4] = [
    "Température CPU B",
    "Température CPU M",
    "Disque dur",
    "Température Switch",
];

const FAN: &str = "Ventilateur 1";

/// Every gauge the exporter publishes, registered on a private registry.
pub struct GaugeSet {
    registry: Registry,
    // rate_up, rate_down, snr_up, snr_down
    dsl: [Gauge; 4],
    // bw_up, bw_down, rate_up, rate_down, vpn_rate_up, vpn_rate_down
    net: [Gauge; 6],
    lan_reachable: GaugeVec,
    system_temp: GaugeVec,
    system_fan: GaugeVec,
}

impl GaugeSet {
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let dsl = [
            Gauge::new("freebox_dsl_up_bytes", "Available upload bandwidth on the DSL line")?,
            Gauge::new("freebox_dsl_down_bytes", "Available download bandwidth on the DSL line")?,
            Gauge::new("freebox_dsl_snr_up_decibel", "Upload signal/noise ratio")?,
            Gauge::new("freebox_dsl_snr_down_decibel", "Download signal/noise ratio")?,
        ];
        let net = [
            Gauge::new("freebox_net_bw_up_bytes", "Upload available bandwidth")?,
            Gauge::new("freebox_net_bw_down_bytes", "Download available bandwidth")?,
            Gauge::new("freebox_net_up_bytes", "Upload rate")?,
            Gauge::new("freebox_net_down_bytes", "Download rate")?,
            Gauge::new("freebox_net_vpn_up_bytes", "VPN client upload rate")?,
            Gauge::new("freebox_net_vpn_down_bytes", "VPN client download rate")?,
        ];
        let lan_reachable = GaugeVec::new(
            Opts::new("freebox_lan_reachable", "Hosts reachable on LAN"),
            &["name"],
        )?;
        let system_temp = GaugeVec::new(
            Opts::new("freebox_system_temp_celsius", "Temperature sensors reported by the router"),
            &["name"],
        )?;
        let system_fan = GaugeVec::new(
            Opts::new("freebox_system_fan_rpm", "Fan speed reported by the router"),
            &["name"],
        )?;

        for gauge in dsl.iter().chain(net.iter()) {
            registry.register(Box::new(gauge.clone()))?;
        }
        registry.register(Box::new(lan_reachable.clone()))?;
        registry.register(Box::new(system_temp.clone()))?;
        registry.register(Box::new(system_fan.clone()))?;

        Ok(Self {
            registry,
            dsl,
            net,
            lan_reachable,
            system_temp,
            system_fan,
        })
    }

    /// Publish DSL readings; anything shorter than four values publishes zeros.
    /// Returns false when zeros were published.
    pub fn set_dsl(&self, values: &[f64]) -> bool {
        publish(&self.dsl, values)
    }

    /// Publish NET readings; anything shorter than six values publishes zeros.
    pub fn set_net(&self, values: &[f64]) -> bool {
        publish(&self.net, values)
    }

    pub fn set_lan_host(&self, name: &str, reachable: bool) {
        self.lan_reachable
            .with_label_values(&[name])
            .set(if reachable { 1.0 } else { 0.0 });
    }

    /// Publish SYSTEM readings: four temperatures then the fan speed.
    pub fn set_system(&self, values: &[f64]) -> bool {
        let complete = values.len() >= TEMPERATURE_SENSORS.len() + 1;
        for (i, sensor) in TEMPERATURE_SENSORS.iter().enumerate() {
            let value = if complete { values[i] } else { 0.0 };
            self.system_temp.with_label_values(&[*sensor]).set(value);
        }
        let fan = if complete { values[TEMPERATURE_SENSORS.len()] } else { 0.0 };
        self.system_fan.with_label_values(&[FAN]).set(fan);
        complete
    }

    pub fn dsl_values(&self) -> Vec<f64> {
        self.dsl.iter().map(Gauge::get).collect()
    }

    pub fn net_values(&self) -> Vec<f64> {
        self.net.iter().map(Gauge::get).collect()
    }

    pub fn lan_value(&self, name: &str) -> f64 {
        self.lan_reachable.with_label_values(&[name]).get()
    }

    pub fn system_values(&self) -> Vec<f64> {
        let mut values: Vec<f64> = TEMPERATURE_SENSORS
            .iter()
            .map(|sensor| self.system_temp.with_label_values(&[*sensor]).get())
            .collect();
        values.push(self.system_fan.with_label_values(&[FAN]).get());
        values
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn publish(gauges: &[Gauge], values: &[f64]) -> bool {
    let complete = values.len() >= gauges.len();
    for (i, gauge) in gauges.iter().enumerate() {
        gauge.set(if complete { values[i] } else { 0.0 });
    }
    complete
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        assert!(GaugeSet::new().is_ok());
    }

    #[test]
    fn test_set_dsl() {
        let gauges = GaugeSet::new().unwrap();
        assert!(gauges.set_dsl(&[12000.0, 45000.0, 31.0, 28.0]));
        assert_eq!(gauges.dsl_values(), vec![12000.0, 45000.0, 31.0, 28.0]);

        let output = gauges.encode().unwrap();
        assert!(output.contains("freebox_dsl_up_bytes 12000"));
        assert!(output.contains("freebox_dsl_down_bytes 45000"));
        assert!(output.contains("freebox_dsl_snr_up_decibel 31"));
        assert!(output.contains("freebox_dsl_snr_down_decibel 28"));
    }

    #[test]
    fn test_short_readings_publish_zeros() {
        let gauges = GaugeSet::new().unwrap();
        gauges.set_net(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(!gauges.set_net(&[]));
        assert_eq!(gauges.net_values(), vec![0.0; 6]);

        gauges.set_system(&[60.0, 55.0, 40.0, 48.0, 2000.0]);
        assert!(!gauges.set_system(&[60.0]));
        assert_eq!(gauges.system_values(), vec![0.0; 5]);
    }

    #[test]
    fn test_system_labels() {
        let gauges = GaugeSet::new().unwrap();
        gauges.set_system(&[61.0, 55.0, 40.0, 48.0, 2003.0]);

        let output = gauges.encode().unwrap();
        assert!(output.contains(r#"freebox_system_temp_celsius{name="Température CPU B"} 61"#));
        assert!(output.contains(r#"freebox_system_temp_celsius{name="Disque dur"} 40"#));
        assert!(output.contains(r#"freebox_system_temp_celsius{name="Température Switch"} 48"#));
        assert!(output.contains(r#"freebox_system_fan_rpm{name="Ventilateur 1"} 2003"#));
    }

    #[test]
    fn test_lan_hosts() {
        let gauges = GaugeSet::new().unwrap();
        gauges.set_lan_host("host-a", true);
        gauges.set_lan_host("host-b", false);
        assert_eq!(gauges.lan_value("host-a"), 1.0);
        assert_eq!(gauges.lan_value("host-b"), 0.0);
        assert!(gauges.encode().unwrap().contains(r#"freebox_lan_reachable{name="host-a"} 1"#));
    }
}
