//! Launch monitor bridge: discover a monitor, read its OpenAPI stream, enrich
//! every shot and optionally rebroadcast it to local clients.

pub mod discovery;
pub mod output;
pub mod relay;

pub use discovery::{resolve_endpoint, DiscoveryConfig, DiscoveryMethod, MonitorEndpoint};
pub use output::OutputServer;
pub use relay::{connect, enrich_line, relay_session, RelayOptions};
