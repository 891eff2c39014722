// src/bridge/discovery.rs

//! Finding a launch monitor's OpenAPI endpoint on the local network.

use std::fmt;
use std::time::Duration;

use log::{debug, info, warn};
use mdns_sd::{ServiceDaemon, ServiceEvent};
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};

use crate::error::DiscoveryError;

pub const SSDP_MULTICAST_ADDR: &str = "239.255.255.250";
pub const SSDP_PORT: u16 = 1900;
pub const SERVICE_URN: &str = "urn:openlaunch:service:openapi:1";
pub const MDNS_SERVICE_TYPE: &str = "_openapi-nova._tcp.local.";
pub const DEFAULT_MONITOR_PORT: u16 = 2921;

const SSDP_BUFFER: usize = 2048;
const MDNS_POLL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorEndpoint {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for MonitorEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DiscoveryMethod {
    /// SSDP first, mDNS if that finds nothing
    Ssdp,
    Mdns,
    /// Use `--monitor-host` and `--monitor-port`
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    pub method: DiscoveryMethod,
    pub timeout: Duration,
    pub manual_host: Option<String>,
    pub manual_port: u16,
}

impl DiscoveryConfig {
    /// Rejects settings no amount of retrying can fix.
    pub fn validate(&self) -> Result<(), DiscoveryError> {
        let has_host = self
            .manual_host
            .as_deref()
            .is_some_and(|host| !host.trim().is_empty());
        if self.method == DiscoveryMethod::Manual && !has_host {
            return Err(DiscoveryError::MissingHost);
        }
        Ok(())
    }
}

pub fn build_search_request() -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: {SSDP_MULTICAST_ADDR}:{SSDP_PORT}\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: 3\r\n\
         ST: {SERVICE_URN}\r\n\
         \r\n"
    )
}

/// Value of the `LOCATION` header in an SSDP response, matched
/// case-insensitively.
pub fn location_header(response: &str) -> Option<&str> {
    response.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("location") {
            Some(value.trim())
        } else {
            None
        }
    })
}

/// Extracts host and port from a location such as `http://10.0.0.5:2921/`.
pub fn parse_location(location: &str) -> Option<MonitorEndpoint> {
    let without_scheme = location
        .split_once("://")
        .map_or(location, |(_, rest)| rest);
    let authority = without_scheme.split('/').next()?;

    let (host, port) = authority.rsplit_once(':')?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return None;
    }

    Some(MonitorEndpoint {
        host: host.to_string(),
        port: port.parse().ok()?,
    })
}

/// Endpoint advertised in one SSDP response, if it is for our service.
pub fn endpoint_from_ssdp_response(response: &str) -> Option<MonitorEndpoint> {
    if !response.contains(SERVICE_URN) {
        return None;
    }
    parse_location(location_header(response)?)
}

pub async fn discover_via_ssdp(timeout: Duration) -> Result<MonitorEndpoint, DiscoveryError> {
    let socket = UdpSocket::bind(("0.0.0.0", 0)).await?;
    socket
        .send_to(build_search_request().as_bytes(), (SSDP_MULTICAST_ADDR, SSDP_PORT))
        .await?;

    let deadline = Instant::now() + timeout;
    let mut buf = [0u8; SSDP_BUFFER];
    loop {
        let (n, from) = match timeout_at(deadline, socket.recv_from(&mut buf)).await {
            Ok(received) => received?,
            Err(_) => return Err(DiscoveryError::Timeout("SSDP")),
        };

        let response = String::from_utf8_lossy(&buf[..n]);
        match endpoint_from_ssdp_response(&response) {
            Some(endpoint) => return Ok(endpoint),
            None => debug!("Ignoring SSDP response from {}", from),
        }
    }
}

fn browse_mdns(timeout: Duration) -> Result<MonitorEndpoint, DiscoveryError> {
    let daemon = ServiceDaemon::new().map_err(|e| DiscoveryError::Mdns(e.to_string()))?;
    let receiver = daemon
        .browse(MDNS_SERVICE_TYPE)
        .map_err(|e| DiscoveryError::Mdns(e.to_string()))?;

    let deadline = std::time::Instant::now() + timeout;
    let mut found = None;
    while found.is_none() && std::time::Instant::now() < deadline {
        match receiver.recv_timeout(MDNS_POLL) {
            Ok(ServiceEvent::ServiceResolved(info)) => {
                found = info.get_addresses().iter().next().map(|addr| MonitorEndpoint {
                    host: addr.to_string(),
                    port: info.get_port(),
                });
            }
            Ok(_) => {}
            Err(e) if receiver.is_disconnected() => {
                return Err(DiscoveryError::Mdns(e.to_string()));
            }
            Err(_) => {}
        }
    }

    if let Err(e) = daemon.shutdown() {
        debug!("mDNS daemon shutdown failed: {}", e);
    }
    found.ok_or(DiscoveryError::Timeout("mDNS"))
}

pub async fn discover_via_mdns(timeout: Duration) -> Result<MonitorEndpoint, DiscoveryError> {
    tokio::task::spawn_blocking(move || browse_mdns(timeout))
        .await
        .map_err(|e| DiscoveryError::Mdns(e.to_string()))?
}

/// Resolves the endpoint to connect to using the configured method.
pub async fn resolve_endpoint(config: &DiscoveryConfig) -> Result<MonitorEndpoint, DiscoveryError> {
    match config.method {
        DiscoveryMethod::Manual => {
            config.validate()?;
            Ok(MonitorEndpoint {
                host: config.manual_host.clone().unwrap_or_default().trim().to_string(),
                port: config.manual_port,
            })
        }
        DiscoveryMethod::Ssdp => {
            info!("Discovering launch monitor via SSDP...");
            match discover_via_ssdp(config.timeout).await {
                Ok(endpoint) => Ok(endpoint),
                Err(e) => {
                    warn!("SSDP discovery failed ({}), trying mDNS...", e);
                    discover_via_mdns(config.timeout).await
                }
            }
        }
        DiscoveryMethod::Mdns => {
            info!("Discovering launch monitor via mDNS...");
            discover_via_mdns(config.timeout).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_targets_service() {
        let request = build_search_request();
        assert!(request.starts_with("M-SEARCH * HTTP/1.1\r\n"));
        assert!(request.contains("HOST: 239.255.255.250:1900\r\n"));
        assert!(request.contains("MAN: \"ssdp:discover\"\r\n"));
        assert!(request.contains(&format!("ST: {}\r\n", SERVICE_URN)));
        assert!(request.ends_with("\r\n\r\n"));
    }

    #[test]
    fn parses_locations() {
        let expected = MonitorEndpoint {
            host: "192.168.1.20".to_string(),
            port: 2921,
        };
        assert_eq!(parse_location("http://192.168.1.20:2921/"), Some(expected.clone()));
        assert_eq!(parse_location("ws://192.168.1.20:2921/openapi"), Some(expected.clone()));
        assert_eq!(parse_location("192.168.1.20:2921"), Some(expected));
        assert_eq!(
            parse_location("http://[fe80::1]:2921").map(|e| e.to_string()),
            Some("[fe80::1]:2921".to_string())
        );
        assert_eq!(parse_location("http://monitor.local/"), None);
        assert_eq!(parse_location("http://host:notaport"), None);
    }

    #[test]
    fn reads_ssdp_responses() {
        let response = format!(
            "HTTP/1.1 200 OK\r\nCACHE-CONTROL: max-age=1800\r\nLocation: http://10.0.0.7:2921/\r\nST: {}\r\n\r\n",
            SERVICE_URN
        );
        assert_eq!(location_header(&response), Some("http://10.0.0.7:2921/"));
        assert_eq!(
            endpoint_from_ssdp_response(&response),
            Some(MonitorEndpoint {
                host: "10.0.0.7".to_string(),
                port: 2921
            })
        );

        let other = "HTTP/1.1 200 OK\r\nLOCATION: http://10.0.0.8:80/\r\nST: upnp:rootdevice\r\n\r\n";
        assert_eq!(endpoint_from_ssdp_response(other), None);
    }

    #[tokio::test]
    async fn manual_discovery_needs_a_host() {
        let mut config = DiscoveryConfig {
            method: DiscoveryMethod::Manual,
            timeout: Duration::from_secs(1),
            manual_host: None,
            manual_port: DEFAULT_MONITOR_PORT,
        };
        assert!(matches!(config.validate(), Err(DiscoveryError::MissingHost)));
        assert!(matches!(
            resolve_endpoint(&config).await,
            Err(DiscoveryError::MissingHost)
        ));

        config.manual_host = Some("  ".to_string());
        assert!(matches!(config.validate(), Err(DiscoveryError::MissingHost)));

        config.manual_host = Some("10.0.0.9".to_string());
        assert!(config.validate().is_ok());
        let endpoint = resolve_endpoint(&config).await.unwrap();
        assert_eq!(endpoint.to_string(), "10.0.0.9:2921");
    }

    #[test]
    fn network_discovery_needs_no_host() {
        for method in [DiscoveryMethod::Ssdp, DiscoveryMethod::Mdns] {
            let config = DiscoveryConfig {
                method,
                timeout: Duration::from_secs(1),
                manual_host: None,
                manual_port: DEFAULT_MONITOR_PORT,
            };
            assert!(config.validate().is_ok());
        }
    }
}
