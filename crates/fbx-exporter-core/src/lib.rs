//! Core library for fbx-exporter.
//!
//! Polls a Freebox router's local API and republishes DSL, NET, LAN and
//! SYSTEM readings as Prometheus gauges. The router authenticates
//! applications with a one-time registration followed by challenge-response
//! session logins; [`auth`] owns that lifecycle so collectors only see an
//! authenticated [`api::RequestExecutor`].

pub mod api;
pub mod auth;
pub mod collectors;
pub mod config;
pub mod exporter;
pub mod metrics;
pub mod models;

pub use config::ExporterConfig;
pub use exporter::Exporter;
