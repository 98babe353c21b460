// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role-based route permission resolution.
//!
//! Resolution is a pure function of (role, pathname, matrix): no I/O, no
//! time dependence. The request gate and the navigation renderer both call
//! it independently and must always agree.

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::{self, Route};
use crate::role::Role;

// =============================================================================
// Free Functions
// =============================================================================

/// Returns `true` if the role may access the given pathname.
///
/// A pathname is permitted iff it starts with the path prefix of at least one
/// route in the role's catalog entry, so sub-resources inherit the parent
/// route's access: `/inventory/42` is permitted whenever `/inventory` is.
/// Literal prefix only; no wildcards.
pub fn has_route_permission(role: Role, pathname: &str) -> bool {
    catalog::allowed_routes(role)
        .iter()
        .any(|route| pathname.starts_with(route.path()))
}

// =============================================================================
// Permission Matrix
// =============================================================================

/// Role-to-routes authorization table.
///
/// Built once at startup and shared across all requests. The default matrix
/// mirrors the static catalog; tests inject narrower ones through the
/// builder. Lookups for a role without an entry fail closed (deny).
#[derive(Debug, Clone)]
pub struct PermissionMatrix {
    role_routes: Arc<HashMap<Role, Vec<Route>>>,
}

impl PermissionMatrix {
    /// Creates the default matrix from the static catalog.
    ///
    /// Every role in the closed set receives exactly one entry.
    pub fn new() -> Self {
        let mut role_routes = HashMap::new();
        for role in Role::ALL {
            role_routes.insert(role, catalog::allowed_routes(role).to_vec());
        }
        Self {
            role_routes: Arc::new(role_routes),
        }
    }

    /// Creates a matrix builder.
    pub fn builder() -> PermissionMatrixBuilder {
        PermissionMatrixBuilder::new()
    }

    /// Returns the routes granted to a role, empty when the role has no entry.
    pub fn routes(&self, role: Role) -> &[Route] {
        self.role_routes
            .get(&role)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns `true` if the role is granted the exact route.
    pub fn is_allowed(&self, role: Role, route: Route) -> bool {
        self.routes(role).contains(&route)
    }

    /// Returns `true` if the role may access the given pathname.
    ///
    /// Same prefix semantics as the free [`has_route_permission`], evaluated
    /// against this matrix instead of the static catalog.
    pub fn has_route_permission(&self, role: Role, pathname: &str) -> bool {
        self.routes(role)
            .iter()
            .any(|route| pathname.starts_with(route.path()))
    }

    /// Returns all roles with an entry in the matrix.
    pub fn roles(&self) -> Vec<Role> {
        self.role_routes.keys().copied().collect()
    }
}

impl Default for PermissionMatrix {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Permission Matrix Builder
// =============================================================================

/// Builder for constructing permission matrices.
#[derive(Debug, Default)]
pub struct PermissionMatrixBuilder {
    role_routes: HashMap<Role, Vec<Route>>,
}

impl PermissionMatrixBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the catalog defaults for every role.
    pub fn with_catalog_defaults(mut self) -> Self {
        for role in Role::ALL {
            self.role_routes
                .insert(role, catalog::allowed_routes(role).to_vec());
        }
        self
    }

    /// Grants a role a specific set of routes, replacing any previous entry.
    pub fn grant(mut self, role: Role, routes: impl IntoIterator<Item = Route>) -> Self {
        self.role_routes.insert(role, routes.into_iter().collect());
        self
    }

    /// Adds a single route to a role's entry.
    pub fn grant_route(mut self, role: Role, route: Route) -> Self {
        let entry = self.role_routes.entry(role).or_default();
        if !entry.contains(&route) {
            entry.push(route);
        }
        self
    }

    /// Builds the matrix.
    pub fn build(self) -> PermissionMatrix {
        PermissionMatrix {
            role_routes: Arc::new(self.role_routes),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
