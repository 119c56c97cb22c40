//! Fixed-interval polling loop feeding the gauges.
//!
//! Every cycle runs the collectors in a fixed order (DSL unless the box is a
//! fiber model, then NET, LAN, SYSTEM) and publishes their readings. A
//! failed domain is logged and published as zeros, so scrapers never see a
//! stale value during an outage. Nothing here stops the loop, and a refused
//! login is attempted again only on the next cycle.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::api::{ApiError, RequestExecutor};
use crate::collectors::{collect_dsl, collect_lan, collect_net, collect_system, HostReachability};
use crate::config::ExporterConfig;
use crate::metrics::GaugeSet;

pub struct Exporter {
    executor: RequestExecutor,
    gauges: Arc<GaugeSet>,
    fiber: bool,
    interval: Duration,
    /// LAN hosts published so far, zeroed when the LAN domain fails
    known_hosts: HashSet<String>,
}

impl Exporter {
    pub fn new(executor: RequestExecutor, gauges: Arc<GaugeSet>, config: &ExporterConfig) -> Self {
        Self {
            executor,
            gauges,
            fiber: config.fiber,
            interval: config.poll_interval,
            known_hosts: HashSet::new(),
        }
    }

    /// Poll forever.
    pub async fn run(mut self) {
        loop {
            self.run_cycle().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One pass over every domain.
    pub async fn run_cycle(&mut self) {
        self.executor.session().begin_cycle().await;

        if !self.fiber {
            let readings = collect_dsl(&self.executor).await;
            self.publish_dsl(readings);
        }

        let readings = collect_net(&self.executor).await;
        self.publish_net(readings);

        let hosts = collect_lan(&self.executor).await;
        self.publish_lan(hosts);

        let readings = collect_system(&self.executor).await;
        self.publish_system(readings);

        debug!("Collection cycle done");
    }

    pub fn publish_dsl(&self, readings: Result<Vec<f64>, ApiError>) {
        publish_tuple("dsl", readings, |values| self.gauges.set_dsl(values));
    }

    pub fn publish_net(&self, readings: Result<Vec<f64>, ApiError>) {
        publish_tuple("net", readings, |values| self.gauges.set_net(values));
    }

    pub fn publish_system(&self, readings: Result<Vec<f64>, ApiError>) {
        publish_tuple("system", readings, |values| self.gauges.set_system(values));
    }

    pub fn publish_lan(&mut self, hosts: Result<Vec<HostReachability>, ApiError>) {
        match hosts {
            Ok(hosts) => {
                let seen: HashSet<String> = hosts.iter().map(|h| h.name.clone()).collect();
                for host in &hosts {
                    self.gauges.set_lan_host(&host.name, host.reachable);
                }
                for gone in self.known_hosts.difference(&seen) {
                    self.gauges.set_lan_host(gone, false);
                }
                self.known_hosts.extend(seen);
            }
            Err(e) => {
                warn!(domain = "lan", error = %e, "Collection failed, publishing zeros");
                for host in &self.known_hosts {
                    self.gauges.set_lan_host(host, false);
                }
            }
        }
    }
}

fn publish_tuple(domain: &str, readings: Result<Vec<f64>, ApiError>, set: impl Fn(&[f64]) -> bool) {
    match readings {
        Ok(values) => {
            if !set(&values) {
                warn!(domain, count = values.len(), "Incomplete readings, publishing zeros");
            }
        }
        Err(e) => {
            warn!(domain, error = %e, "Collection failed, publishing zeros");
            let none: &[f64] = &[];
            set(none);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;
    use crate::api::RouterClient;
    use crate::auth::{ApplicationCredential, Authenticator, SessionManager};
    use crate::config::ApiEndpoints;
    use crate::models::AppIdentity;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl CapturedLogs {
        fn warnings(&self) -> usize {
            let output = String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned();
            output.lines().filter(|l| l.contains("WARN")).count()
        }
    }

    fn exporter() -> (Exporter, Arc<GaugeSet>) {
        // Never contacted: these tests only exercise publishing
        let client = RouterClient::new(ApiEndpoints::from_base("http://127.0.0.1:9")).unwrap();
        let credential = ApplicationCredential::new(AppIdentity::default(), "token".to_string(), 1);
        let session = Arc::new(SessionManager::new(Authenticator::new(client.clone(), credential)));
        let gauges = Arc::new(GaugeSet::new().unwrap());
        let exporter = Exporter {
            executor: RequestExecutor::new(client, session),
            gauges: Arc::clone(&gauges),
            fiber: false,
            interval: Duration::from_secs(10),
            known_hosts: HashSet::new(),
        };
        (exporter, gauges)
    }

    fn with_logs<F: FnOnce()>(f: F) -> CapturedLogs {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        logs
    }

    #[test]
    fn test_dsl_readings_published() {
        let (exporter, gauges) = exporter();
        let logs = with_logs(|| exporter.publish_dsl(Ok(vec![12000.0, 45000.0, 31.0, 28.0])));

        assert_eq!(gauges.dsl_values(), vec![12000.0, 45000.0, 31.0, 28.0]);
        assert_eq!(logs.warnings(), 0);
    }

    #[test]
    fn test_empty_net_readings_zero_all_gauges() {
        let (exporter, gauges) = exporter();
        exporter.publish_net(Ok(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));

        let logs = with_logs(|| exporter.publish_net(Ok(vec![])));

        assert_eq!(gauges.net_values(), vec![0.0; 6]);
        assert_eq!(logs.warnings(), 1);
    }

    #[test]
    fn test_failed_system_zeroes_gauges() {
        let (exporter, gauges) = exporter();
        exporter.publish_system(Ok(vec![61.0, 55.0, 40.0, 48.0, 2003.0]));

        let logs = with_logs(|| exporter.publish_system(Err(ApiError::Unauthorized)));

        assert_eq!(gauges.system_values(), vec![0.0; 5]);
        assert_eq!(logs.warnings(), 1);
    }

    #[test]
    fn test_lan_hosts_published() {
        let (mut exporter, gauges) = exporter();
        exporter.publish_lan(Ok(vec![
            HostReachability { name: "host-a".to_string(), reachable: true },
            HostReachability { name: "host-b".to_string(), reachable: false },
        ]));

        assert_eq!(gauges.lan_value("host-a"), 1.0);
        assert_eq!(gauges.lan_value("host-b"), 0.0);
    }

    #[test]
    fn test_lan_failure_zeroes_known_hosts() {
        let (mut exporter, gauges) = exporter();
        exporter.publish_lan(Ok(vec![HostReachability { name: "nas".to_string(), reachable: true }]));

        let logs = with_logs(|| {
            exporter.publish_lan(Err(ApiError::InvalidResponse("bad".to_string())))
        });

        assert_eq!(gauges.lan_value("nas"), 0.0);
        assert_eq!(logs.warnings(), 1);
    }

    #[test]
    fn test_vanished_lan_host_zeroed() {
        let (mut exporter, gauges) = exporter();
        exporter.publish_lan(Ok(vec![
            HostReachability { name: "laptop".to_string(), reachable: true },
            HostReachability { name: "nas".to_string(), reachable: true },
        ]));
        exporter.publish_lan(Ok(vec![HostReachability { name: "nas".to_string(), reachable: true }]));

        assert_eq!(gauges.lan_value("laptop"), 0.0);
        assert_eq!(gauges.lan_value("nas"), 1.0);
    }
}
