// src/server/native.rs

//! Native shot socket: JSON shot in, one JSON line out.

use std::io;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::hub::{ShotHub, ShotSource};
use crate::protocol::native::{calculation_error_reply, parse_request, result_reply};
use crate::protocol::{read_message, JsonFramer};

/// Builds the reply line for one framed message.
pub fn respond(hub: &ShotHub, message: &str) -> String {
    let shot = match parse_request(message) {
        Ok(shot) => shot,
        Err(reply) => {
            warn!("Rejected malformed shot: {}", reply.trim_end());
            return reply;
        }
    };

    match hub.process(ShotSource::Native, shot) {
        Ok(result) => result_reply(&result),
        Err(e) => {
            warn!("Calculation failed: {}", e);
            calculation_error_reply(&e)
        }
    }
}

/// Serves one client until it closes its write side.
///
/// Each framed message gets exactly one reply line, so newline-delimited
/// clients can keep the connection open while single-shot clients can send
/// one object and shut down.
pub async fn handle_connection<S>(stream: S, hub: Arc<ShotHub>) -> io::Result<usize>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut reader, mut writer) = tokio::io::split(stream);
    let mut framer = JsonFramer::new();
    let mut replies = 0;

    while let Some(message) = read_message(&mut reader, &mut framer).await? {
        debug!("Native shot message: {}", message);
        let reply = respond(&hub, &message);
        writer.write_all(reply.as_bytes()).await?;
        writer.flush().await?;
        replies += 1;
    }

    Ok(replies)
}

/// Accept loop for the native shot socket.
pub async fn run(listener: TcpListener, hub: Arc<ShotHub>) -> io::Result<()> {
    let local = listener.local_addr()?;
    info!("Native shot server listening on {}", local);
    hub.register_listener(format!("native {}", local));

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Native accept failed: {}", e);
                continue;
            }
        };

        let hub = hub.clone();
        tokio::spawn(async move {
            let peer = peer.to_string();
            info!("Native client connected: {}", peer);
            hub.connection_opened(&peer);

            match handle_connection(stream, hub.clone()).await {
                Ok(replies) => info!("Native client {} disconnected after {} replies", peer, replies),
                Err(e) => warn!("Native client {} dropped: {}", peer, e),
            }
            hub.connection_closed(&peer);
        });
    }
}
