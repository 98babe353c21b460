// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! HTTP surface for the MyMechanika service.
//!
//! This crate assembles the access-control core into a server: the request
//! gate middleware, the auth and page-descriptor handlers, configuration,
//! and the axum router. The decision logic itself lives in `mechanika-core`;
//! everything here is transport.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod gate;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use config::{ConfigError, ConfigFormat, ConfigResult, ServiceConfig};
pub use error::{ApiError, ApiResult};
pub use extractors::CurrentSnapshot;
pub use gate::{evaluate, GateOutcome, RedirectReason};
pub use middleware::GateLayer;
pub use response::{ApiResponse, SessionResponse};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::{AppState, AppStateBuilder};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
