// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # RBAC Integration Tests
//!
//! Integration tests for the role catalog and permission resolution:
//!
//! - Role parsing and display
//! - The route catalog and navigation metadata
//! - Permission matrix resolution, default and custom
//! - The per-route CRUD action grid
//!
//! ## Test Categories
//!
//! - `test_role_*`: Role parsing tests
//! - `test_catalog_*`: Route catalog tests
//! - `test_matrix_*`: Permission matrix tests
//! - `test_actions_*`: Action grid tests

use mechanika_core::{
    accessible_route_metadata, actions_for, allowed_routes, has_route_permission, Action,
    PermissionMatrix, Role, Route,
};

// =============================================================================
// Role Tests
// =============================================================================

#[test]
fn test_role_parse_wire_names() {
    assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
    assert_eq!(Role::parse("MANAGER"), Some(Role::Manager));
    assert_eq!(Role::parse("SUPERVISOR"), Some(Role::Supervisor));
}

#[test]
fn test_role_parse_is_case_insensitive() {
    assert_eq!(Role::parse("admin"), Some(Role::Admin));
    assert_eq!(Role::parse("Supervisor"), Some(Role::Supervisor));
}

#[test]
fn test_role_parse_rejects_unknown() {
    assert_eq!(Role::parse("INTERN"), None);
    assert_eq!(Role::parse(""), None);
    assert_eq!(Role::parse("ADMINISTRATOR"), None);
}

#[test]
fn test_role_round_trips_through_wire_form() {
    for role in Role::ALL {
        assert_eq!(Role::parse(role.as_str()), Some(role));
    }
}

// =============================================================================
// Catalog Tests
// =============================================================================

#[test]
fn test_catalog_route_parsing_matches_paths() {
    for route in Route::all() {
        assert_eq!(Route::parse(route.path()), Some(*route));
    }
    assert_eq!(Route::parse("/about"), None);
}

#[test]
fn test_catalog_owning_route_covers_subpaths() {
    assert_eq!(Route::owning("/bookings"), Some(Route::Bookings));
    assert_eq!(Route::owning("/bookings/42/edit"), Some(Route::Bookings));
    assert_eq!(Route::owning("/bookingsarchive"), None);
    assert_eq!(Route::owning("/"), None);
}

#[test]
fn test_catalog_navigation_order_is_stable() {
    let nav: Vec<Route> = accessible_route_metadata(Role::Admin)
        .iter()
        .map(|m| m.route)
        .collect();
    assert_eq!(
        nav,
        vec![
            Route::Dashboard,
            Route::Bookings,
            Route::Services,
            Route::Inventory,
            Route::Mechanics,
        ]
    );
}

#[test]
fn test_catalog_navigation_filters_by_role() {
    let manager: Vec<Route> = accessible_route_metadata(Role::Manager)
        .iter()
        .map(|m| m.route)
        .collect();
    assert!(!manager.contains(&Route::Inventory));
    assert!(manager.contains(&Route::Mechanics));

    let supervisor: Vec<Route> = accessible_route_metadata(Role::Supervisor)
        .iter()
        .map(|m| m.route)
        .collect();
    assert_eq!(
        supervisor,
        vec![Route::Dashboard, Route::Bookings, Route::Services]
    );
}

// =============================================================================
// Permission Matrix Tests
// =============================================================================

#[test]
fn test_matrix_default_mirrors_catalog() {
    let matrix = PermissionMatrix::new();
    for role in Role::ALL {
        assert_eq!(matrix.routes(role), allowed_routes(role));
    }
}

#[test]
fn test_matrix_inventory_is_admin_only() {
    let matrix = PermissionMatrix::new();
    assert!(matrix.is_allowed(Role::Admin, Route::Inventory));
    assert!(!matrix.is_allowed(Role::Manager, Route::Inventory));
    assert!(!matrix.is_allowed(Role::Supervisor, Route::Inventory));
}

#[test]
fn test_matrix_prefix_resolution() {
    let matrix = PermissionMatrix::new();
    assert!(matrix.has_route_permission(Role::Manager, "/bookings/42"));
    assert!(matrix.has_route_permission(Role::Manager, "/mechanics"));
    assert!(!matrix.has_route_permission(Role::Supervisor, "/mechanics/7"));
}

#[test]
fn test_matrix_free_function_agrees_with_default() {
    let matrix = PermissionMatrix::new();
    let paths = ["/dashboard", "/bookings", "/services", "/inventory", "/mechanics"];
    for role in Role::ALL {
        for path in paths {
            assert_eq!(
                has_route_permission(role, path),
                matrix.has_route_permission(role, path),
                "divergence for {:?} on {}",
                role,
                path
            );
        }
    }
}

#[test]
fn test_matrix_custom_grants_fail_closed() {
    let matrix = PermissionMatrix::builder()
        .grant(Role::Supervisor, [Route::Dashboard])
        .build();

    assert!(matrix.is_allowed(Role::Supervisor, Route::Dashboard));
    assert!(!matrix.is_allowed(Role::Supervisor, Route::Bookings));
    // Roles without an entry have no access at all.
    assert!(!matrix.is_allowed(Role::Admin, Route::Dashboard));
    assert!(!matrix.has_route_permission(Role::Admin, "/dashboard"));
}

#[test]
fn test_matrix_builder_catalog_defaults_extendable() {
    let matrix = PermissionMatrix::builder()
        .with_catalog_defaults()
        .grant_route(Role::Supervisor, Route::Mechanics)
        .build();

    assert!(matrix.is_allowed(Role::Supervisor, Route::Mechanics));
    // Untouched grants keep their catalog shape.
    assert!(!matrix.is_allowed(Role::Supervisor, Route::Inventory));
    assert!(matrix.is_allowed(Role::Admin, Route::Inventory));
}

// =============================================================================
// Action Grid Tests
// =============================================================================

#[test]
fn test_actions_admin_gets_full_crud_everywhere() {
    for route in Route::all() {
        let actions = actions_for(Role::Admin, *route);
        assert!(actions.contains_all(&[
            Action::View,
            Action::Create,
            Action::Edit,
            Action::Delete
        ]));
    }
}

#[test]
fn test_actions_manager_grid() {
    assert_eq!(
        actions_for(Role::Manager, Route::Bookings).to_vec(),
        vec![Action::View, Action::Create, Action::Edit, Action::Delete]
    );
    assert_eq!(
        actions_for(Role::Manager, Route::Services).to_vec(),
        vec![Action::View, Action::Create, Action::Edit]
    );
    assert_eq!(
        actions_for(Role::Manager, Route::Mechanics).to_vec(),
        vec![Action::View, Action::Edit]
    );
    assert!(actions_for(Role::Manager, Route::Inventory).is_empty());
}

#[test]
fn test_actions_supervisor_grid() {
    assert_eq!(
        actions_for(Role::Supervisor, Route::Bookings).to_vec(),
        vec![Action::View, Action::Create, Action::Edit]
    );
    assert_eq!(
        actions_for(Role::Supervisor, Route::Services).to_vec(),
        vec![Action::View]
    );
    assert!(actions_for(Role::Supervisor, Route::Mechanics).is_empty());
    assert!(actions_for(Role::Supervisor, Route::Inventory).is_empty());
}

#[test]
fn test_actions_nonempty_sets_always_include_view() {
    for role in Role::ALL {
        for route in Route::all() {
            let actions = actions_for(role, *route);
            if !actions.is_empty() {
                assert!(
                    actions.contains(Action::View),
                    "{:?} on {:?} grants actions without View",
                    role,
                    route
                );
            }
        }
    }
}

#[test]
fn test_actions_align_with_matrix_grants() {
    let matrix = PermissionMatrix::new();
    for role in Role::ALL {
        for route in Route::all() {
            let granted = matrix.is_allowed(role, *route);
            let actions = actions_for(role, *route);
            assert_eq!(
                granted,
                !actions.is_empty(),
                "action grid and matrix disagree for {:?} on {:?}",
                role,
                route
            );
        }
    }
}
