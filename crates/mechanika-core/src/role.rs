// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Workshop staff roles.
//!
//! Roles form a fixed, closed set. Every serialized auth snapshot carries the
//! uppercase wire form (`"ADMIN"`, `"MANAGER"`, `"SUPERVISOR"`); parsing an
//! unknown string yields `None` and every consumer treats that as "no role"
//! rather than defaulting to any grant.

use serde::{Deserialize, Serialize};

// =============================================================================
// Role
// =============================================================================

/// Staff role determining which sections of the dashboard are accessible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full access to every section, including inventory.
    Admin,
    /// Day-to-day workshop management: bookings, services, mechanics.
    Manager,
    /// Floor supervision: bookings and services, read-mostly.
    Supervisor,
}

impl Role {
    /// All roles, in a stable order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::Supervisor];

    /// Returns the wire form of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Supervisor => "SUPERVISOR",
        }
    }

    /// Parses a role from a string.
    ///
    /// Case-insensitive. Returns `None` for anything outside the closed set.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "MANAGER" => Some(Role::Manager),
            "SUPERVISOR" => Some(Role::Supervisor),
            _ => None,
        }
    }

    /// Returns a short human-readable description of the role.
    pub fn description(&self) -> &'static str {
        match self {
            Role::Admin => "Full access to all modules",
            Role::Manager => "Bookings, services and mechanic management",
            Role::Supervisor => "Bookings and service oversight",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================
