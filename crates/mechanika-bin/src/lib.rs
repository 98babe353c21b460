// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! MyMechanika service binary.
//!
//! This crate assembles the workspace into a runnable service:
//!
//! ```text
//! cli ──> commands ──> runtime ──> mechanika-api (HTTP server, gate)
//!                        │             │
//!                        │             └──> mechanika-session (store, bridge)
//!                        │                        │
//!                        │                        └──> mechanika-core (roles, catalog)
//!                        └──> shutdown (signals, graceful drain)
//! ```
//!
//! The library form exists so integration tests can drive the CLI and
//! runtime without spawning a process.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

pub use cli::{Cli, Commands};
pub use error::{report_error, report_error_and_exit, BinError, BinResult};
pub use runtime::{RuntimeBuilder, ServiceRuntime};
pub use shutdown::ShutdownCoordinator;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
