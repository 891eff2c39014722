// src/server/openapi.rs

//! OpenAPI Connect V1 ingest socket. Launch monitors push records and never
//! get a per-shot reply.

use std::io;
use std::sync::Arc;

use log::{debug, error, info, warn};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::hub::{ShotHub, ShotSource};
use crate::protocol::{handshake_line, map_launch_monitor_record, read_message, JsonFramer};

#[derive(Debug, Clone, PartialEq)]
pub struct OpenApiOptions {
    /// Send `{"Code":201,...}` to every new client.
    pub handshake: bool,
    pub game_id: String,
}

/// Processes one record. Returns the derived result, or `None` if the record
/// carried no shot or could not be calculated.
pub fn ingest(hub: &ShotHub, message: &str) -> Option<Value> {
    let record: Value = match serde_json::from_str(message) {
        Ok(record) => record,
        Err(e) => {
            warn!("Skipping malformed OpenAPI record: {}", e);
            return None;
        }
    };

    let Some(shot) = map_launch_monitor_record(&record) else {
        debug!("Skipping OpenAPI record without shot data");
        return None;
    };

    match hub.process(ShotSource::OpenApi, shot) {
        Ok(result) => Some(result),
        Err(e) => {
            warn!("OpenAPI shot could not be calculated: {}", e);
            None
        }
    }
}

/// Serves one launch monitor until it disconnects.
///
/// # Returns
/// * `Ok(usize)` - Number of shots processed on this connection
/// * `Err(e)` - The handshake write or a read failed
pub async fn handle_connection<S>(stream: S, hub: Arc<ShotHub>, options: &OpenApiOptions) -> io::Result<usize>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut reader, mut writer) = tokio::io::split(stream);

    if options.handshake {
        writer.write_all(handshake_line(&options.game_id).as_bytes()).await?;
        writer.flush().await?;
    }

    let mut framer = JsonFramer::new();
    let mut shots = 0;
    while let Some(message) = read_message(&mut reader, &mut framer).await? {
        if ingest(&hub, &message).is_some() {
            shots += 1;
        }
    }

    Ok(shots)
}

/// Accept loop for the OpenAPI socket.
pub async fn run(listener: TcpListener, hub: Arc<ShotHub>, options: OpenApiOptions) -> io::Result<()> {
    let local = listener.local_addr()?;
    info!("OpenAPI server listening on {}", local);
    hub.register_listener(format!("openapi {}", local));
    let options = Arc::new(options);

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("OpenAPI accept failed: {}", e);
                continue;
            }
        };

        let hub = hub.clone();
        let options = options.clone();
        tokio::spawn(async move {
            let peer = peer.to_string();
            info!("Launch monitor connected: {}", peer);
            hub.connection_opened(&peer);

            match handle_connection(stream, hub.clone(), &options).await {
                Ok(shots) => info!("Launch monitor {} disconnected after {} shots", peer, shots),
                Err(e) => warn!("Launch monitor {} dropped: {}", peer, e),
            }
            hub.connection_closed(&peer);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::database::Database;
    use crate::engine::FlightModel;

    fn hub() -> ShotHub {
        ShotHub::new(
            Arc::new(FlightModel::default()),
            Database::new(":memory:").unwrap(),
            8,
        )
    }

    #[test]
    fn ingest_skips_what_it_cannot_use() {
        let hub = hub();
        assert!(ingest(&hub, "garbage").is_none());
        assert!(ingest(&hub, r#"{"ShotDataOptions": {"IsHeartBeat": true}}"#).is_none());
        assert!(ingest(&hub, r#"{"BallData": {"Speed": 150.0}}"#).is_none());
        assert!(hub.latest().is_none());
    }

    #[test]
    fn ingest_processes_vendor_shots() {
        let hub = hub();
        let result = ingest(
            &hub,
            r#"{"Units": "Yards", "BallData": {"Speed": 150.0, "VLA": 14.0, "HLA": 0.0, "TotalSpin": 3000.0, "SpinAxis": 0.0}}"#,
        );
        assert!(result.is_some());
        assert_eq!(hub.latest().unwrap().shot_name, "Straight");
    }
}
