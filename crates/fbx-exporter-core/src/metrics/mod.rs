//! Prometheus gauges and the `/metrics` endpoint.
//!
//! # Metrics Exposed
//!
//! ## DSL
//! - `freebox_dsl_up_bytes`, `freebox_dsl_down_bytes` - line rates
//! - `freebox_dsl_snr_up_decibel`, `freebox_dsl_snr_down_decibel` - signal-to-noise ratios
//!
//! ## NET
//! - `freebox_net_bw_up_bytes`, `freebox_net_bw_down_bytes` - available bandwidth
//! - `freebox_net_up_bytes`, `freebox_net_down_bytes` - WAN throughput
//! - `freebox_net_vpn_up_bytes`, `freebox_net_vpn_down_bytes` - VPN throughput
//!
//! ## LAN
//! - `freebox_lan_reachable{name}` - 1 if the host answers, else 0
//!
//! ## SYSTEM
//! - `freebox_system_temp_celsius{name}` - `Température CPU B`, `Température CPU M`,
//!   `Disque dur`, `Température Switch`
//! - `freebox_system_fan_rpm{name}` - `Ventilateur 1`

mod gauges;
mod server;

pub use gauges::{GaugeSet, MetricsError};
pub use server::{MetricsServer, ServerError};
