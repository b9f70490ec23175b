//! Host transport
//!
//! - Wire messages shared with the host editor (protocol.rs)
//! - A local implementation backed by the file system (local.rs)
//! - Inbound host events read from stdin (stdin.rs)

pub mod local;
pub mod protocol;
pub mod stdin;

pub use local::LocalHost;
pub use protocol::{CatalogResponse, HostCommand, HostEvent};
