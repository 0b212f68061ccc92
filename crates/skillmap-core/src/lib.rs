//! # skillmap-core
//!
//! Shared plumbing for the skillmap crates.
//!
//! - **Logging**: [`logging::init_subscriber`] installs the stderr `tracing`
//!   subscriber used by the binary.
//! - **Log capture**: [`logging::capture_logs`] records events in memory so
//!   tests can assert that absorbed failures were reported.

#![deny(unsafe_code)]

pub mod logging;
