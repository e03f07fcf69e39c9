//! Telemetry for the migration tool.
//!
//! Logs are JSON on stderr because stdout carries the migrated data. Spans are
//! additionally exported over OTLP when an endpoint is configured.
//!
//! No envelope, plaintext, or key material is ever recorded; failures are
//! logged by line number and error kind only.

pub mod init;

pub use init::{init, shutdown};
