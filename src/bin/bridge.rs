// src/bin/bridge.rs

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};
use tokio::net::TcpListener;

use shotlink::bridge::discovery::DEFAULT_MONITOR_PORT;
use shotlink::bridge::{
    connect, relay_session, resolve_endpoint, DiscoveryConfig, DiscoveryMethod, OutputServer, RelayOptions,
};
use shotlink::engine::default_model;

#[derive(Parser, Debug)]
#[command(name = "shotlink-bridge")]
#[command(about = "Discover a launch monitor and relay its shots with derived values", long_about = None)]
struct Cli {
    /// How to find the launch monitor
    #[arg(long, value_enum, default_value_t = DiscoveryMethod::Ssdp)]
    discovery: DiscoveryMethod,

    /// Launch monitor host (required when --discovery=manual)
    #[arg(long)]
    monitor_host: Option<String>,

    /// Launch monitor port for manual discovery
    #[arg(long, default_value_t = DEFAULT_MONITOR_PORT)]
    monitor_port: u16,

    /// Discovery timeout in seconds
    #[arg(long, default_value_t = 5)]
    discovery_timeout_secs: u64,

    /// Local port to rebroadcast enriched shots on
    #[arg(long)]
    output_port: Option<u16>,

    /// Seconds to wait before reconnecting
    #[arg(long, default_value_t = 3)]
    reconnect_delay_secs: u64,

    /// Mirror shots for a left-handed golfer
    #[arg(long)]
    left_handed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let cli = Cli::parse();

    let discovery = DiscoveryConfig {
        method: cli.discovery,
        timeout: Duration::from_secs(cli.discovery_timeout_secs),
        manual_host: cli.monitor_host.clone(),
        manual_port: cli.monitor_port,
    };
    discovery.validate()?;

    let output = match cli.output_port {
        Some(port) => {
            let listener = TcpListener::bind(("0.0.0.0", port))
                .await
                .with_context(|| format!("binding output port {}", port))?;
            let output = OutputServer::new();
            let server = output.clone();
            tokio::spawn(async move {
                if let Err(e) = server.run(listener).await {
                    error!("Output server stopped: {}", e);
                }
            });
            Some(output)
        }
        None => None,
    };

    let options = RelayOptions {
        left_handed: cli.left_handed,
        ..Default::default()
    };
    let reconnect_delay = Duration::from_secs(cli.reconnect_delay_secs);

    loop {
        match resolve_endpoint(&discovery).await {
            Ok(endpoint) => {
                info!("Connecting to launch monitor at {}", endpoint);
                match connect(&endpoint, options.connect_timeout).await {
                    Ok(stream) => {
                        info!("Connected. Waiting for shots...");
                        match relay_session(stream, default_model(), &options, output.as_ref()).await {
                            Ok(relayed) => info!("Session ended after {} shots", relayed),
                            Err(e) => warn!("Connection dropped: {}", e),
                        }
                    }
                    Err(e) => error!("Failed to connect to {}: {}", endpoint, e),
                }
            }
            Err(e) => error!("Discovery failed: {}", e),
        }

        info!("Retrying in {}s...", cli.reconnect_delay_secs);
        tokio::time::sleep(reconnect_delay).await;
    }
}
