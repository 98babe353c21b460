// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route catalog and per-module action grid.
//!
//! The catalog is the static authorization table of the dashboard: which
//! navigable sections exist, how they are presented in navigation, which
//! roles may see them, and which CRUD actions each role may perform inside
//! them. Declaration order of [`ROUTE_METADATA`] is user-visible (it drives
//! navigation rendering) and must stay stable across calls.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::role::Role;

// =============================================================================
// Route
// =============================================================================

/// A navigable section of the dashboard, identified by its path prefix.
///
/// Sub-resources inherit the prefix: `/inventory/42` belongs to
/// [`Route::Inventory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Overview landing page.
    #[serde(rename = "/dashboard")]
    Dashboard,
    /// Customer booking management.
    #[serde(rename = "/bookings")]
    Bookings,
    /// Service catalog management.
    #[serde(rename = "/services")]
    Services,
    /// Parts and stock management.
    #[serde(rename = "/inventory")]
    Inventory,
    /// Mechanic roster management.
    #[serde(rename = "/mechanics")]
    Mechanics,
}

impl Route {
    /// Returns the path prefix of this route.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
            Route::Bookings => "/bookings",
            Route::Services => "/services",
            Route::Inventory => "/inventory",
            Route::Mechanics => "/mechanics",
        }
    }

    /// Parses a route from a path prefix or bare section name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim_start_matches('/') {
            "dashboard" => Some(Route::Dashboard),
            "bookings" => Some(Route::Bookings),
            "services" => Some(Route::Services),
            "inventory" => Some(Route::Inventory),
            "mechanics" => Some(Route::Mechanics),
            _ => None,
        }
    }

    /// Returns all routes, in catalog declaration order.
    pub fn all() -> &'static [Route] {
        &[
            Route::Dashboard,
            Route::Bookings,
            Route::Services,
            Route::Inventory,
            Route::Mechanics,
        ]
    }

    /// Returns the route owning the given pathname, if any.
    ///
    /// Matches on literal path-segment prefixes: `/bookings/42` maps to
    /// [`Route::Bookings`], `/bookingsx` maps to nothing.
    pub fn owning(pathname: &str) -> Option<Self> {
        Route::all().iter().copied().find(|route| {
            let prefix = route.path();
            pathname == prefix
                || (pathname.starts_with(prefix)
                    && pathname.as_bytes().get(prefix.len()) == Some(&b'/'))
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

// =============================================================================
// Action
// =============================================================================

/// A CRUD action within a route's module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// View module data.
    View,
    /// Create new records.
    Create,
    /// Edit existing records.
    Edit,
    /// Delete records.
    Delete,
}

impl Action {
    /// Returns the action name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }

    /// Parses an action from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "view" => Some(Action::View),
            "create" => Some(Action::Create),
            "edit" => Some(Action::Edit),
            "delete" => Some(Action::Delete),
            _ => None,
        }
    }

    /// Returns all actions.
    pub fn all() -> &'static [Action] {
        &[Action::View, Action::Create, Action::Edit, Action::Delete]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Action Set
// =============================================================================

/// A set of CRUD actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSet {
    actions: std::collections::HashSet<Action>,
}

impl ActionSet {
    /// Creates an empty action set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an action set from a list of actions.
    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    /// Adds an action to the set.
    pub fn add(&mut self, action: Action) {
        self.actions.insert(action);
    }

    /// Returns `true` if the set contains the given action.
    pub fn contains(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// Returns `true` if the set contains all of the given actions.
    pub fn contains_all(&self, actions: &[Action]) -> bool {
        actions.iter().all(|a| self.actions.contains(a))
    }

    /// Returns the number of actions in the set.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the actions as a vector in view/create/edit/delete order.
    pub fn to_vec(&self) -> Vec<Action> {
        let mut actions: Vec<Action> = self.actions.iter().copied().collect();
        actions.sort();
        actions
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self::from_actions(iter)
    }
}

// =============================================================================
// Route Metadata
// =============================================================================

/// Presentation and authorization metadata for a catalog route.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetadata {
    /// The route this entry describes.
    pub route: Route,
    /// Navigation label.
    pub label: &'static str,
    /// Icon identifier consumed by the navigation renderer.
    pub icon: &'static str,
    /// Short description shown on the dashboard.
    pub description: &'static str,
    /// Roles permitted to see this route.
    pub required_roles: &'static [Role],
}

impl RouteMetadata {
    /// Returns `true` if the given role may see this route.
    pub fn allows(&self, role: Role) -> bool {
        self.required_roles.contains(&role)
    }
}

/// The full route catalog, in navigation declaration order.
pub static ROUTE_METADATA: [RouteMetadata; 5] = [
    RouteMetadata {
        route: Route::Dashboard,
        label: "Dashboard",
        icon: "LayoutDashboard",
        description: "Overview and statistics",
        required_roles: &[Role::Admin, Role::Manager, Role::Supervisor],
    },
    RouteMetadata {
        route: Route::Bookings,
        label: "Bookings",
        icon: "Calendar",
        description: "Manage customer bookings",
        required_roles: &[Role::Admin, Role::Manager, Role::Supervisor],
    },
    RouteMetadata {
        route: Route::Services,
        label: "Services",
        icon: "Wrench",
        description: "Service management",
        required_roles: &[Role::Admin, Role::Manager, Role::Supervisor],
    },
    RouteMetadata {
        route: Route::Inventory,
        label: "Inventory",
        icon: "Package",
        description: "Parts and inventory",
        required_roles: &[Role::Admin],
    },
    RouteMetadata {
        route: Route::Mechanics,
        label: "Mechanics",
        icon: "Users",
        description: "Mechanic management",
        required_roles: &[Role::Admin, Role::Manager],
    },
];

// =============================================================================
// Catalog Queries
// =============================================================================

/// Returns the routes a role may access.
///
/// Every role in the closed set has exactly one entry here; there is no
/// default-allow path.
pub fn allowed_routes(role: Role) -> &'static [Route] {
    match role {
        Role::Admin => &[
            Route::Dashboard,
            Route::Bookings,
            Route::Services,
            Route::Inventory,
            Route::Mechanics,
        ],
        Role::Manager => &[
            Route::Dashboard,
            Route::Bookings,
            Route::Services,
            Route::Mechanics,
        ],
        Role::Supervisor => &[Route::Dashboard, Route::Bookings, Route::Services],
    }
}

/// Returns the full catalog in declaration order.
pub fn route_metadata() -> &'static [RouteMetadata] {
    &ROUTE_METADATA
}

/// Returns the catalog entries visible to the given role.
///
/// Declaration order is preserved: the result is rendered directly as
/// navigation, so the order must be stable and deterministic.
pub fn accessible_route_metadata(role: Role) -> Vec<&'static RouteMetadata> {
    ROUTE_METADATA.iter().filter(|m| m.allows(role)).collect()
}

/// Returns the CRUD actions the role may perform within a route's module.
///
/// The grid fails closed: a (role, route) pair outside the role's allowed
/// routes yields the empty set. Whenever the set is non-empty it contains
/// [`Action::View`].
pub fn actions_for(role: Role, route: Route) -> ActionSet {
    use Action::*;

    let actions: &[Action] = match (role, route) {
        (Role::Admin, _) => &[View, Create, Edit, Delete],

        (Role::Manager, Route::Dashboard) => &[View],
        (Role::Manager, Route::Bookings) => &[View, Create, Edit, Delete],
        (Role::Manager, Route::Services) => &[View, Create, Edit],
        (Role::Manager, Route::Mechanics) => &[View, Edit],
        (Role::Manager, Route::Inventory) => &[],

        (Role::Supervisor, Route::Dashboard) => &[View],
        (Role::Supervisor, Route::Bookings) => &[View, Create, Edit],
        (Role::Supervisor, Route::Services) => &[View],
        (Role::Supervisor, Route::Inventory | Route::Mechanics) => &[],
    };

    ActionSet::from_actions(actions.iter().copied())
}

// =============================================================================
// Tests
// =============================================================================
