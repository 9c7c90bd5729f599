//! Logger initialization.
//!
//! The engine itself only emits through the `log` facade; this module wires
//! up `env_logger` for binaries that want the default setup.

mod init;

pub use init::{init_logging, LoggingConfig};
