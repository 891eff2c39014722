// src/bridge/output.rs

//! Local rebroadcast of enriched shots to any connected TCP client.

use std::io;

use log::{error, info, warn};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

const OUTPUT_CAPACITY: usize = 64;

/// Fan-out of result lines. Cloning shares the same set of clients.
#[derive(Debug, Clone)]
pub struct OutputServer {
    lines: broadcast::Sender<String>,
}

impl Default for OutputServer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputServer {
    pub fn new() -> Self {
        let (lines, _) = broadcast::channel(OUTPUT_CAPACITY);
        Self { lines }
    }

    /// Queues `line` for every connected client. Returns how many will
    /// receive it.
    pub fn publish(&self, line: &str) -> usize {
        self.lines.send(line.to_string()).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.lines.subscribe()
    }

    pub async fn run(self, listener: TcpListener) -> io::Result<()> {
        info!("Output server listening on {}", listener.local_addr()?);
        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Output client connection error: {}", e);
                    continue;
                }
            };

            info!("Local client connected: {}", peer);
            let lines = self.subscribe();
            tokio::spawn(async move {
                if let Err(e) = serve_client(stream, lines).await {
                    warn!("Dropping local client {}: {}", peer, e);
                }
            });
        }
    }
}

/// Writes every published line to one client until a write fails or the
/// server goes away.
pub async fn serve_client<W>(mut writer: W, mut lines: broadcast::Receiver<String>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    loop {
        let line = match lines.recv().await {
            Ok(line) => line,
            Err(RecvError::Lagged(missed)) => {
                warn!("Local client lagged, skipped {} shots", missed);
                continue;
            }
            Err(RecvError::Closed) => return Ok(()),
        };

        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader};

    #[tokio::test]
    async fn clients_receive_each_line() {
        let output = OutputServer::new();
        assert_eq!(output.publish("nobody listening"), 0);

        let (client, server) = tokio::io::duplex(1024);
        tokio::spawn(serve_client(server, output.subscribe()));

        assert_eq!(output.publish("{\"a\":1}"), 1);
        assert_eq!(output.publish("{\"b\":2}"), 1);

        let mut lines = BufReader::new(client).lines();
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("{\"a\":1}"));
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("{\"b\":2}"));
    }

    #[tokio::test]
    async fn failed_write_ends_client() {
        let output = OutputServer::new();
        let (client, server) = tokio::io::duplex(64);
        drop(client);
        let task = tokio::spawn(serve_client(server, output.subscribe()));
        output.publish("{}");
        assert!(task.await.unwrap().is_err());
    }
}
