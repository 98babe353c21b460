// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # MyMechanika Integration Tests
//!
//! This crate provides integration tests for the MyMechanika workshop
//! dashboard service. It includes test utilities, fixtures, and helpers
//! designed for extensibility and maintainability.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities, fixtures, and helpers
//!   - `fixtures`: Pre-built identities, snapshots, and cookie values
//!   - `builders`: Builder patterns for constructing test objects
//!   - `assertions`: Custom assertion helpers
//!   - `mocks`: Mock credential and storage implementations
//!   - `harness`: Test harness wiring a full service router
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p mechanika-tests
//!
//! # Run specific test suite
//! cargo test -p mechanika-tests --test integration_rbac
//! cargo test -p mechanika-tests --test integration_auth
//! cargo test -p mechanika-tests --test integration_gate
//! cargo test -p mechanika-tests --test integration_api
//! cargo test -p mechanika-tests --test integration_cli
//!
//! # Run with verbose output
//! cargo test -p mechanika-tests -- --nocapture
//! ```
//!
//! ## Test Categories
//!
//! ### RBAC Tests (`integration_rbac.rs`)
//! - Role parsing and the route catalog
//! - Permission matrix resolution, including custom grants
//! - The per-route CRUD action grid
//!
//! ### Auth Tests (`integration_auth.rs`)
//! - Session store login / logout / restore lifecycle
//! - State persistence across store instances
//! - Cookie bridge rendering and cookie classification
//!
//! ### Gate Tests (`integration_gate.rs`)
//! - Redirect decisions for every identity class
//! - Query preservation and parameter replacement
//! - Bypass prefixes and asset paths
//!
//! ### API Tests (`integration_api.rs`)
//! - End-to-end login → cookie → protected page flows
//! - Session endpoints and navigation listings
//! - Health and readiness probes
//!
//! ### CLI Tests (`integration_cli.rs`)
//! - Argument parsing and command defaulting
//! - Runtime configuration resolution and overrides
//!
//! ## Writing New Tests
//!
//! ### Using Fixtures
//!
//! ```rust,ignore
//! use mechanika_tests::common::fixtures::IdentityFixtures;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let manager = IdentityFixtures::manager();
//!     // ... test logic
//! }
//! ```
//!
//! ### Using the Harness
//!
//! ```rust,ignore
//! use mechanika_tests::common::harness::ServiceHarness;
//!
//! #[tokio::test]
//! async fn test_with_harness() {
//!     let harness = ServiceHarness::new();
//!     let cookie = harness.login_as_admin().await;
//!     // ... drive harness.router() with the cookie
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::mocks::*;
}
