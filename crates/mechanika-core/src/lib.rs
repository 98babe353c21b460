// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # mechanika-core
//!
//! Core RBAC types and auth primitives for the MyMechanika workshop dashboard.
//!
//! This crate provides the foundational pieces shared by the session layer
//! and the HTTP service:
//!
//! - **Role**: The closed set of staff roles
//! - **Catalog**: Route definitions, navigation metadata, and the CRUD action grid
//! - **Rbac**: Pure role-to-route permission resolution
//! - **Identity**: The authenticated user record
//! - **Snapshot**: The serializable auth projection and its cookie codec
//! - **Credentials**: The credential-store collaborator and demo fixtures
//! - **Error**: The auth error taxonomy
//!
//! ## Example
//!
//! ```rust
//! use mechanika_core::{accessible_route_metadata, has_route_permission, Role};
//!
//! assert!(has_route_permission(Role::Admin, "/inventory/42"));
//! assert!(!has_route_permission(Role::Supervisor, "/inventory"));
//!
//! let nav = accessible_route_metadata(Role::Supervisor);
//! assert_eq!(nav.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Core Modules
// =============================================================================

pub mod error;
pub mod role;

// =============================================================================
// Catalog & Resolution Modules
// =============================================================================

pub mod catalog;
pub mod rbac;

// =============================================================================
// Session Primitive Modules
// =============================================================================

pub mod credentials;
pub mod identity;
pub mod snapshot;

// =============================================================================
// Re-exports for convenience
// =============================================================================

pub use catalog::{
    accessible_route_metadata, actions_for, allowed_routes, route_metadata, Action, ActionSet,
    Route, RouteMetadata, ROUTE_METADATA,
};
pub use credentials::{
    CredentialListing, CredentialStore, FixtureCredentials, FIXTURE_PASSWORD,
};
pub use error::{AuthError, AuthResult};
pub use identity::Identity;
pub use rbac::{has_route_permission, PermissionMatrix, PermissionMatrixBuilder};
pub use role::Role;
pub use snapshot::{
    classify_cookie_value, encode_cookie_value, parse_cookie_value, AuthSnapshot, CookieAuth,
    AUTH_COOKIE_MAX_AGE_SECS, AUTH_COOKIE_NAME,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
