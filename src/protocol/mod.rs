//! Wire protocols: socket framing, native replies and OpenAPI Connect V1
//! records.

pub mod framing;
pub mod native;
pub mod openapi;

pub use framing::{read_message, JsonFramer};
pub use openapi::{handshake_line, is_heartbeat, map_launch_monitor_record, OpenApiShot};
