// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Cookie bridge.
//!
//! Mirrors the session store into the auth cookie so the request gate — which
//! never touches the store — can make its decision from the request alone.
//! The bridge is the only writer of the cookie; signing in sets it, signing
//! out clears it in the same response, with no decay window in between.
//!
//! The cookie carries no expiry of its own beyond `Max-Age`: a stale but
//! well-formed snapshot is trusted by the gate and only reconciled when the
//! session store next checks persisted state.

use mechanika_core::snapshot::{
    encode_cookie_value, AuthSnapshot, AUTH_COOKIE_MAX_AGE_SECS, AUTH_COOKIE_NAME,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

// =============================================================================
// Cookie Bridge
// =============================================================================

/// Renders session snapshots as `Set-Cookie` values.
#[derive(Debug, Clone)]
pub struct CookieBridge {
    name: String,
    max_age_secs: u64,
}

impl CookieBridge {
    /// Creates a bridge with the standard cookie name and seven-day max age.
    pub fn new() -> Self {
        Self {
            name: AUTH_COOKIE_NAME.to_string(),
            max_age_secs: AUTH_COOKIE_MAX_AGE_SECS,
        }
    }

    /// Overrides the cookie name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Overrides the max age.
    pub fn with_max_age_secs(mut self, secs: u64) -> Self {
        self.max_age_secs = secs;
        self
    }

    /// Returns the cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Set-Cookie` value installing the given snapshot.
    pub fn set_cookie(&self, snapshot: &AuthSnapshot) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            self.name,
            encode_cookie_value(snapshot),
            self.max_age_secs
        )
    }

    /// `Set-Cookie` value removing the cookie immediately.
    pub fn clear_cookie(&self) -> String {
        format!("{}=; Path=/; Max-Age=0; SameSite=Lax", self.name)
    }

    /// `Set-Cookie` value for a snapshot: install when authenticated, clear
    /// otherwise. Signing out never leaves a decaying cookie behind.
    pub fn cookie_for(&self, snapshot: &AuthSnapshot) -> String {
        if snapshot.is_authenticated {
            self.set_cookie(snapshot)
        } else {
            self.clear_cookie()
        }
    }

    /// Follows a session change feed, logging each cookie transition.
    ///
    /// The HTTP handlers render cookies synchronously per response; this task
    /// exists for observability and for embedders that mirror the cookie into
    /// an external sink. Runs until the feed closes.
    pub async fn run(&self, mut changes: broadcast::Receiver<AuthSnapshot>) {
        loop {
            match changes.recv().await {
                Ok(snapshot) => {
                    if snapshot.is_authenticated {
                        info!(role = ?snapshot.role(), "auth cookie set");
                    } else {
                        info!("auth cookie cleared");
                    }
                    debug!(cookie = %self.cookie_for(&snapshot), "cookie transition");
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    // Intermediate states were skipped; the next received
                    // snapshot is still the latest truth.
                    warn!(missed, "cookie bridge lagged behind session changes");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("session change feed closed, stopping cookie bridge");
                    break;
                }
            }
        }
    }
}

impl Default for CookieBridge {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mechanika_core::identity::Identity;
    use mechanika_core::role::Role;
    use mechanika_core::snapshot::{classify_cookie_value, parse_cookie_value, CookieAuth};

    fn admin_snapshot() -> AuthSnapshot {
        AuthSnapshot::authenticated(Identity::new(
            "1",
            "admin@mymechanika.com",
            "Admin User",
            Role::Admin,
        ))
    }

    #[test]
    fn test_set_cookie_shape() {
        let bridge = CookieBridge::new();
        let cookie = bridge.set_cookie(&admin_snapshot());

        assert!(cookie.starts_with("mymechanika-auth="));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.contains("SameSite=Lax"));
    }

    #[test]
    fn test_set_cookie_round_trips_through_gate_parser() {
        let bridge = CookieBridge::new();
        let snapshot = admin_snapshot();
        let cookie = bridge.set_cookie(&snapshot);

        let value = cookie
            .split(';')
            .next()
            .and_then(|pair| pair.split_once('='))
            .map(|(_, v)| v)
            .unwrap();

        assert_eq!(parse_cookie_value(value), snapshot);
        assert_eq!(
            classify_cookie_value(value),
            CookieAuth::Authenticated(Role::Admin)
        );
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let bridge = CookieBridge::new();
        let cookie = bridge.clear_cookie();

        assert!(cookie.starts_with("mymechanika-auth=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_cookie_for_dispatches_on_auth_state() {
        let bridge = CookieBridge::new();

        assert!(bridge.cookie_for(&admin_snapshot()).contains("Max-Age=604800"));
        assert!(bridge
            .cookie_for(&AuthSnapshot::anonymous())
            .contains("Max-Age=0"));
    }

    #[test]
    fn test_custom_name_and_max_age() {
        let bridge = CookieBridge::new()
            .with_name("staging-auth")
            .with_max_age_secs(60);
        let cookie = bridge.set_cookie(&admin_snapshot());

        assert!(cookie.starts_with("staging-auth="));
        assert!(cookie.contains("Max-Age=60"));
    }

    #[tokio::test]
    async fn test_run_stops_when_feed_closes() {
        let bridge = CookieBridge::new();
        let (tx, rx) = broadcast::channel(4);

        let task = tokio::spawn(async move { bridge.run(rx).await });

        tx.send(admin_snapshot()).unwrap();
        tx.send(AuthSnapshot::anonymous()).unwrap();
        drop(tx);

        task.await.unwrap();
    }
}
