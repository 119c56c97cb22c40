//! Exporter configuration.
//!
//! This module holds the settings the exporter runs with (router endpoint,
//! listen address, token file location, polling interval) and resolves the
//! fixed router API paths from the configured base endpoint.
//!
//! The token file defaults to `~/.freebox_token`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Default base URL of the router API
pub const DEFAULT_ENDPOINT: &str = "http://mafreebox.freebox.fr/";

/// Default bind address for the metrics endpoint
pub const DEFAULT_LISTEN: &str = ":10001";

/// Token file name in the home directory
const TOKEN_FILE: &str = ".freebox_token";

/// Interval between two collection cycles.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// API generation every resource path lives under
const API_PREFIX: &str = "api/v4/";

#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Base URL of the router API, always ending with `/`
    pub endpoint: String,
    pub listen: SocketAddr,
    /// Fiber boxes have no DSL modem, so DSL collection is skipped
    pub fiber: bool,
    pub token_file: PathBuf,
    pub poll_interval: Duration,
}

impl ExporterConfig {
    /// The home directory is only looked up when no token file is given.
    pub fn new(endpoint: &str, listen: &str, token_file: Option<PathBuf>) -> Result<Self> {
        let token_file = match token_file {
            Some(path) => path,
            None => default_token_file()?,
        };
        Ok(Self {
            endpoint: normalize_endpoint(endpoint),
            listen: parse_listen(listen)?,
            fiber: false,
            token_file,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        })
    }

    pub fn endpoints(&self) -> ApiEndpoints {
        ApiEndpoints::from_base(&self.endpoint)
    }
}

/// Router resource URLs, resolved once from the base endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    pub login: String,
    pub authorize: String,
    pub session: String,
    pub rrd: String,
    pub lan_browser: String,
    pub system: String,
}

impl ApiEndpoints {
    pub fn from_base(base: &str) -> Self {
        let api = format!("{}{}", normalize_endpoint(base), API_PREFIX);
        let login = format!("{}login/", api);
        Self {
            authorize: format!("{}authorize/", login),
            session: format!("{}session/", login),
            login,
            rrd: format!("{}rrd/", api),
            lan_browser: format!("{}lan/browser/pub/", api),
            system: format!("{}system/", api),
        }
    }

    /// Status URL for a pending authorization request
    pub fn authorize_status(&self, track_id: i64) -> String {
        format!("{}{}", self.authorize, track_id)
    }
}

pub fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.ends_with('/') {
        endpoint.to_string()
    } else {
        format!("{}/", endpoint)
    }
}

/// Parse a listen address, accepting the `:port` shorthand for all interfaces.
pub fn parse_listen(listen: &str) -> Result<SocketAddr> {
    let full = if listen.starts_with(':') {
        format!("0.0.0.0{}", listen)
    } else {
        listen.to_string()
    };
    full.parse()
        .with_context(|| format!("Invalid listen address: {}", listen))
}

pub fn default_token_file() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
    Ok(home.join(TOKEN_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_from_base() {
        let endpoints = ApiEndpoints::from_base("http://192.168.1.254");
        assert_eq!(endpoints.login, "http://192.168.1.254/api/v4/login/");
        assert_eq!(endpoints.authorize, "http://192.168.1.254/api/v4/login/authorize/");
        assert_eq!(endpoints.session, "http://192.168.1.254/api/v4/login/session/");
        assert_eq!(endpoints.rrd, "http://192.168.1.254/api/v4/rrd/");
        assert_eq!(endpoints.lan_browser, "http://192.168.1.254/api/v4/lan/browser/pub/");
        assert_eq!(endpoints.system, "http://192.168.1.254/api/v4/system/");
        assert_eq!(
            endpoints.authorize_status(42),
            "http://192.168.1.254/api/v4/login/authorize/42"
        );
    }

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(normalize_endpoint(DEFAULT_ENDPOINT), DEFAULT_ENDPOINT);
        assert_eq!(normalize_endpoint("http://box"), "http://box/");
    }

    #[test]
    fn test_parse_listen() {
        assert_eq!(parse_listen(":10001").unwrap().port(), 10001);
        assert!(parse_listen(":10001").unwrap().ip().is_unspecified());
        assert_eq!(
            parse_listen("127.0.0.1:9100").unwrap(),
            "127.0.0.1:9100".parse::<SocketAddr>().unwrap()
        );
        assert!(parse_listen("not-an-address").is_err());
    }

    #[test]
    fn test_explicit_token_file_used_as_given() {
        let config = ExporterConfig::new("http://box", ":10001", Some(PathBuf::from("/srv/fbx/token.json"))).unwrap();
        assert_eq!(config.token_file, PathBuf::from("/srv/fbx/token.json"));
        assert_eq!(config.endpoint, "http://box/");
        assert_eq!(config.poll_interval, Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS));
    }

    #[test]
    fn test_default_token_file_in_home() {
        let Ok(path) = default_token_file() else {
            return;
        };
        assert!(path.ends_with(TOKEN_FILE));
    }
}
