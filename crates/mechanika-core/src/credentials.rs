// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Credential verification.
//!
//! The session store's only external dependency: something that turns an
//! email/password pair into an [`Identity`]. The store does not care how —
//! fixture lookup here, a directory service in a real deployment — as long as
//! a simple mismatch yields `Ok(None)` rather than an error, and retrying is
//! safe.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::error::AuthResult;
use crate::identity::Identity;
use crate::role::Role;

// =============================================================================
// CredentialStore
// =============================================================================

/// Verifies credentials and produces identities.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug {
    /// Authenticates an email/password pair.
    ///
    /// Returns `Ok(Some(identity))` with the last-login timestamp refreshed
    /// on a match, `Ok(None)` on any mismatch — by contract the caller cannot
    /// learn whether the email or the password was wrong — and `Err` only for
    /// infrastructure failures.
    async fn authenticate(&self, email: &str, password: &str) -> AuthResult<Option<Identity>>;
}

// =============================================================================
// Fixture Credentials
// =============================================================================

/// Demo login entry exposed for operator tooling.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialListing {
    /// Login email.
    pub email: String,
    /// Demo password.
    pub password: String,
    /// Assigned role.
    pub role: Role,
}

/// The shared demo password for all fixture accounts.
pub const FIXTURE_PASSWORD: &str = "password123";

/// In-memory credential store seeded with the demo workshop staff.
///
/// Authentication latency is simulated to keep the login flow honest about
/// being asynchronous; tests run with zero latency via [`for_testing`].
///
/// [`for_testing`]: FixtureCredentials::for_testing
#[derive(Debug, Clone)]
pub struct FixtureCredentials {
    records: Vec<(Identity, String)>,
    latency: Duration,
}

impl FixtureCredentials {
    /// Creates the store with the three seeded accounts and 1 s of
    /// simulated latency.
    pub fn new() -> Self {
        Self {
            records: seed_records(),
            latency: Duration::from_secs(1),
        }
    }

    /// Creates the store with zero latency.
    pub fn for_testing() -> Self {
        Self::new().with_latency(Duration::ZERO)
    }

    /// Overrides the simulated latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Adds an extra account.
    pub fn with_account(mut self, identity: Identity, password: impl Into<String>) -> Self {
        self.records.push((identity, password.into()));
        self
    }

    /// Returns the demo logins, for display by operator tooling.
    pub fn credential_listing(&self) -> Vec<CredentialListing> {
        self.records
            .iter()
            .map(|(identity, password)| CredentialListing {
                email: identity.email.clone(),
                password: password.clone(),
                role: identity.role,
            })
            .collect()
    }
}

impl Default for FixtureCredentials {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for FixtureCredentials {
    async fn authenticate(&self, email: &str, password: &str) -> AuthResult<Option<Identity>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let matched = self
            .records
            .iter()
            .find(|(identity, stored)| identity.email == email && stored == password);

        Ok(matched.map(|(identity, _)| identity.with_last_login_now()))
    }
}

fn fixture_created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn seed_records() -> Vec<(Identity, String)> {
    let created_at = fixture_created_at();

    vec![
        (
            Identity::new("1", "admin@mymechanika.com", "Admin User", Role::Admin)
                .with_avatar("https://api.dicebear.com/7.x/avataaars/svg?seed=Admin")
                .with_created_at(created_at),
            FIXTURE_PASSWORD.to_string(),
        ),
        (
            Identity::new("2", "manager@mymechanika.com", "Manager User", Role::Manager)
                .with_avatar("https://api.dicebear.com/7.x/avataaars/svg?seed=Manager")
                .with_created_at(created_at),
            FIXTURE_PASSWORD.to_string(),
        ),
        (
            Identity::new(
                "3",
                "supervisor@mymechanika.com",
                "Supervisor User",
                Role::Supervisor,
            )
            .with_avatar("https://api.dicebear.com/7.x/avataaars/svg?seed=Supervisor")
            .with_created_at(created_at),
            FIXTURE_PASSWORD.to_string(),
        ),
    ]
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_authenticate_success_refreshes_last_login() {
        let store = FixtureCredentials::for_testing();

        let identity = store
            .authenticate("admin@mymechanika.com", FIXTURE_PASSWORD)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(identity.role, Role::Admin);
        assert!(identity.last_login.is_some());
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password_is_none() {
        let store = FixtureCredentials::for_testing();

        let result = store
            .authenticate("admin@mymechanika.com", "wrong-password")
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email_is_none() {
        let store = FixtureCredentials::for_testing();

        let result = store
            .authenticate("nobody@mymechanika.com", FIXTURE_PASSWORD)
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_is_safe_to_retry() {
        let store = FixtureCredentials::for_testing();

        let first = store
            .authenticate("manager@mymechanika.com", FIXTURE_PASSWORD)
            .await
            .unwrap()
            .unwrap();
        let second = store
            .authenticate("manager@mymechanika.com", FIXTURE_PASSWORD)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.email, second.email);
    }

    #[test]
    fn test_credential_listing_covers_all_roles() {
        let store = FixtureCredentials::for_testing();
        let listing = store.credential_listing();

        assert_eq!(listing.len(), 3);
        let roles: Vec<Role> = listing.iter().map(|c| c.role).collect();
        assert!(roles.contains(&Role::Admin));
        assert!(roles.contains(&Role::Manager));
        assert!(roles.contains(&Role::Supervisor));
    }

    #[test]
    fn test_with_account_extends_listing() {
        let extra = Identity::new("4", "extra@mymechanika.com", "Extra User", Role::Supervisor);
        let store = FixtureCredentials::for_testing().with_account(extra, "secret");

        assert_eq!(store.credential_listing().len(), 4);
    }
}
