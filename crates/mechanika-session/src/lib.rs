// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session lifecycle for the MyMechanika dashboard service.
//!
//! This crate owns everything stateful about authentication:
//!
//! - **Store** ([`SessionStore`]): the explicit auth-state container with
//!   login / logout / check-auth operations and read selectors
//! - **Storage** ([`StateStorage`]): persistence of the `{user,
//!   isAuthenticated}` projection, in memory or on disk
//! - **Bridge** ([`CookieBridge`]): renders the session as the auth cookie
//!   the request gate reads
//!
//! The request gate itself lives upstream and is deliberately stateless; it
//! never calls into this crate.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mechanika_core::credentials::{FixtureCredentials, FIXTURE_PASSWORD};
//! use mechanika_session::{CookieBridge, SessionStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), mechanika_core::error::AuthError> {
//! let store = SessionStore::builder()
//!     .credentials(Arc::new(FixtureCredentials::for_testing()))
//!     .build();
//!
//! let identity = store.login("admin@mymechanika.com", FIXTURE_PASSWORD).await?;
//! assert_eq!(identity.role.as_str(), "ADMIN");
//!
//! let bridge = CookieBridge::new();
//! let cookie = bridge.cookie_for(&store.snapshot());
//! assert!(cookie.starts_with("mymechanika-auth="));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bridge;
pub mod storage;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use bridge::CookieBridge;
pub use storage::{FileStorage, MemoryStorage, StateStorage};
pub use store::{SessionStore, SessionStoreBuilder, STORAGE_KEY, TOKEN_KEY};

/// Crate version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name from Cargo.toml.
pub const NAME: &str = env!("CARGO_PKG_NAME");
