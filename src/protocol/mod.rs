//! High-level components of the OSSM protocol: telemetry decoding, the
//! command/response engine, configuration operations, the known-SPN registry
//! and the session that ties them to a bus.
pub mod command;
pub mod lookups;
pub mod operations;
pub mod session;
pub mod telemetry;
pub mod transport;
