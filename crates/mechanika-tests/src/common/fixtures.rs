// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built test data for consistent and reproducible testing.
//!
//! ## Design Principles
//!
//! - Fixtures are immutable and thread-safe
//! - Each fixture represents a realistic scenario
//! - Fixtures can be composed for complex test scenarios

use chrono::{TimeZone, Utc};
use mechanika_core::{
    encode_cookie_value, AuthSnapshot, Identity, Role, FIXTURE_PASSWORD,
};

// =============================================================================
// Account Fixtures
// =============================================================================

/// Fixture providing the seeded demo accounts.
pub struct AccountFixtures;

impl AccountFixtures {
    /// Email of the seeded admin account.
    pub const ADMIN_EMAIL: &'static str = "admin@mymechanika.com";

    /// Email of the seeded manager account.
    pub const MANAGER_EMAIL: &'static str = "manager@mymechanika.com";

    /// Email of the seeded supervisor account.
    pub const SUPERVISOR_EMAIL: &'static str = "supervisor@mymechanika.com";

    /// The shared fixture password.
    pub fn password() -> &'static str {
        FIXTURE_PASSWORD
    }

    /// Email of the seeded account for a role.
    pub fn email_for(role: Role) -> &'static str {
        match role {
            Role::Admin => Self::ADMIN_EMAIL,
            Role::Manager => Self::MANAGER_EMAIL,
            Role::Supervisor => Self::SUPERVISOR_EMAIL,
        }
    }
}

// =============================================================================
// Identity Fixtures
// =============================================================================

/// Fixture providing standard identities.
pub struct IdentityFixtures;

impl IdentityFixtures {
    /// An admin identity with a stable creation timestamp.
    pub fn admin() -> Identity {
        Self::with_role(Role::Admin)
    }

    /// A manager identity.
    pub fn manager() -> Identity {
        Self::with_role(Role::Manager)
    }

    /// A supervisor identity.
    pub fn supervisor() -> Identity {
        Self::with_role(Role::Supervisor)
    }

    /// An identity for an arbitrary role.
    pub fn with_role(role: Role) -> Identity {
        let label = match role {
            Role::Admin => ("1", "Admin User"),
            Role::Manager => ("2", "Manager User"),
            Role::Supervisor => ("3", "Supervisor User"),
        };
        Identity::new(label.0, AccountFixtures::email_for(role), label.1, role)
            .with_created_at(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                    .single()
                    .unwrap_or_else(Utc::now),
            )
    }

    /// Identities for all three roles.
    pub fn all() -> Vec<Identity> {
        vec![Self::admin(), Self::manager(), Self::supervisor()]
    }
}

// =============================================================================
// Snapshot Fixtures
// =============================================================================

/// Fixture providing auth snapshots.
pub struct SnapshotFixtures;

impl SnapshotFixtures {
    /// The signed-out snapshot.
    pub fn anonymous() -> AuthSnapshot {
        AuthSnapshot::anonymous()
    }

    /// An authenticated snapshot for a role.
    pub fn authenticated(role: Role) -> AuthSnapshot {
        AuthSnapshot::authenticated(IdentityFixtures::with_role(role))
    }
}

// =============================================================================
// Cookie Fixtures
// =============================================================================

/// Fixture providing raw auth cookie values as the gate would see them.
pub struct CookieFixtures;

impl CookieFixtures {
    /// A well-formed authenticated cookie value for a role.
    pub fn authenticated(role: Role) -> String {
        encode_cookie_value(&SnapshotFixtures::authenticated(role))
    }

    /// A well-formed signed-out cookie value.
    pub fn anonymous() -> String {
        encode_cookie_value(&SnapshotFixtures::anonymous())
    }

    /// A cookie that claims authentication but carries an unknown role.
    /// Classifies as a session the gate must treat as invalid.
    pub fn unknown_role() -> String {
        urlencoding::encode(
            "{\"state\":{\"isAuthenticated\":true,\"user\":{\"id\":\"9\",\"role\":\"INTERN\"}}}",
        )
        .into_owned()
    }

    /// A cookie value that is not valid JSON after decoding.
    pub fn garbled() -> String {
        "%7B%22state%22%3A%7B%22isAuthenticated".to_string()
    }

    /// A cookie value with valid JSON but a missing state envelope.
    pub fn wrong_shape() -> String {
        urlencoding::encode("{\"session\":{\"active\":true}}").into_owned()
    }
}
