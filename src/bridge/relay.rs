// src/bridge/relay.rs

//! Reading shots from a launch monitor and enriching them.

use std::time::Duration;

use log::{debug, info, warn};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::net::TcpStream;

use crate::bridge::discovery::MonitorEndpoint;
use crate::bridge::output::OutputServer;
use crate::engine::{derive_with, ShotCalculator};
use crate::error::RelayError;
use crate::protocol::framing::MAX_FRAME_BYTES;
use crate::protocol::{is_heartbeat, map_launch_monitor_record};
use crate::shot::mirror_for_left_handed;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const READ_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct RelayOptions {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub left_handed: bool,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
            read_timeout: READ_TIMEOUT,
            left_handed: false,
        }
    }
}

/// Turns one raw launch monitor line into an enriched result line.
///
/// # Returns
/// * `Ok(Some(line))` - Compact JSON of the shot with derived values
/// * `Ok(None)` - The record was a heartbeat
/// * `Err(RelayError)` - The record could not be parsed, mapped or calculated
pub fn enrich_line(
    calculator: &dyn ShotCalculator,
    raw: &str,
    left_handed: bool,
) -> Result<Option<String>, RelayError> {
    let record: Value = serde_json::from_str(raw)?;
    if is_heartbeat(&record) {
        return Ok(None);
    }

    let mut shot = map_launch_monitor_record(&record).ok_or(RelayError::Unmappable)?;
    if left_handed {
        mirror_for_left_handed(&mut shot);
    }

    let enriched = derive_with(calculator, shot)?;
    Ok(Some(serde_json::to_string(&enriched)?))
}

pub async fn connect(endpoint: &MonitorEndpoint, timeout: Duration) -> Result<TcpStream, RelayError> {
    let address = endpoint.to_string();
    match tokio::time::timeout(timeout, TcpStream::connect(address.as_str())).await {
        Ok(stream) => Ok(stream?),
        Err(_) => Err(RelayError::ConnectTimeout(address)),
    }
}

/// Relays shots from `reader` until the monitor closes the connection.
///
/// Bad records are logged and skipped. Going `read_timeout` without any data
/// ends the session with [`RelayError::ReadTimeout`].
///
/// # Returns
/// * `Ok(usize)` - Number of shots relayed before the monitor disconnected
pub async fn relay_session<R>(
    reader: R,
    calculator: &dyn ShotCalculator,
    options: &RelayOptions,
    output: Option<&OutputServer>,
) -> Result<usize, RelayError>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader);
    let mut line = String::new();
    let mut relayed = 0;

    loop {
        line.clear();
        let mut bounded = (&mut lines).take(MAX_FRAME_BYTES as u64);
        let read = tokio::time::timeout(options.read_timeout, bounded.read_line(&mut line))
            .await
            .map_err(|_| RelayError::ReadTimeout(options.read_timeout.as_secs()))??;
        if read == 0 {
            info!("Launch monitor closed the connection");
            return Ok(relayed);
        }

        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }

        match enrich_line(calculator, raw, options.left_handed) {
            Ok(Some(enriched)) => {
                info!("Processed shot -> {}", enriched);
                relayed += 1;
                if let Some(output) = output {
                    debug!("Rebroadcast to {} local clients", output.publish(&enriched));
                }
            }
            Ok(None) => debug!("Heartbeat from launch monitor"),
            Err(e) => warn!("Failed to process shot: {} | raw={}", e, raw),
        }
    }
}
