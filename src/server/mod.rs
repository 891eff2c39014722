//! TCP shot listeners.
//!
//! Both servers accept any number of clients and give each one its own task;
//! all of them feed the same [`ShotHub`](crate::hub::ShotHub).

pub mod native;
pub mod openapi;

pub use native::run as run_native;
pub use openapi::{run as run_openapi, OpenApiOptions};
