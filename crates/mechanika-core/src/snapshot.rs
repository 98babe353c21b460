// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Auth snapshot and cookie codec.
//!
//! The session store and the request gate run in different contexts and never
//! share memory; the only channel between them is a cookie carrying a
//! point-in-time projection of the session. This module owns that boundary:
//! the snapshot type, the wire envelope, and the defensive parse.
//!
//! # Wire schema
//!
//! The cookie value is URL-encoded JSON of shape
//!
//! ```json
//! { "state": { "isAuthenticated": true, "user": { "...": "..." } } }
//! ```
//!
//! Unknown fields (including a future `version` field) are ignored on parse,
//! so the schema can grow without breaking older readers. Any structural
//! failure — undecodable value, invalid JSON, missing `state` — yields the
//! anonymous snapshot. Nothing in this module returns an error to callers.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::role::Role;

/// Name of the auth cookie shared with the request gate.
pub const AUTH_COOKIE_NAME: &str = "mymechanika-auth";

/// Cookie lifetime in seconds (7 days).
///
/// A synchronization bound, not a security boundary: the cookie mirrors the
/// session and is rewritten on every auth change.
pub const AUTH_COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 7;

// =============================================================================
// AuthSnapshot
// =============================================================================

/// Serializable projection of the session state.
///
/// Invariant: `is_authenticated == true` implies `user` is present with a
/// role from the closed set. Snapshots violating this are produced only by
/// tampered or truncated cookies, and [`classify_cookie_value`] maps them to
/// [`CookieAuth::Invalid`] so the gate can force re-authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    /// Whether a session is active.
    pub is_authenticated: bool,
    /// The authenticated identity, if any.
    pub user: Option<Identity>,
}

impl AuthSnapshot {
    /// The snapshot of a signed-out session.
    pub fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            user: None,
        }
    }

    /// The snapshot of an authenticated session.
    pub fn authenticated(user: Identity) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
        }
    }

    /// Returns the role carried by the snapshot, if any.
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Returns `true` if the snapshot satisfies its own invariant.
    pub fn is_consistent(&self) -> bool {
        !self.is_authenticated || self.user.is_some()
    }
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self::anonymous()
    }
}

// =============================================================================
// Wire Envelope
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    state: AuthSnapshot,
}

/// Lenient mirror of the envelope used for classification: every field is
/// optional so a partial or stale cookie still classifies instead of failing
/// the whole parse.
#[derive(Debug, Default, Deserialize)]
struct LenientEnvelope {
    #[serde(default)]
    state: Option<LenientState>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LenientState {
    #[serde(default)]
    is_authenticated: Option<bool>,
    #[serde(default)]
    user: Option<LenientUser>,
}

#[derive(Debug, Default, Deserialize)]
struct LenientUser {
    #[serde(default)]
    role: Option<String>,
}

// =============================================================================
// Cookie Codec
// =============================================================================

/// Encodes a snapshot into the URL-encoded cookie value.
///
/// Never fails: a serialization error degrades to the empty string, which
/// parses back as the anonymous snapshot.
pub fn encode_cookie_value(snapshot: &AuthSnapshot) -> String {
    let envelope = Envelope {
        state: snapshot.clone(),
    };
    let json = serde_json::to_string(&envelope).unwrap_or_default();
    urlencoding::encode(&json).into_owned()
}

/// Parses a cookie value into a snapshot, failing closed.
///
/// Any failure — undecodable percent-encoding, invalid JSON, a missing or
/// malformed `state` — yields [`AuthSnapshot::anonymous`]. This is a
/// defensive default, not a reported error.
pub fn parse_cookie_value(raw: &str) -> AuthSnapshot {
    let decoded = match urlencoding::decode(raw) {
        Ok(decoded) => decoded,
        Err(_) => return AuthSnapshot::anonymous(),
    };

    match serde_json::from_str::<Envelope>(&decoded) {
        Ok(envelope) if envelope.state.is_consistent() => envelope.state,
        _ => AuthSnapshot::anonymous(),
    }
}

// =============================================================================
// Cookie Classification
// =============================================================================

/// Authentication state derived from a cookie by the request gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieAuth {
    /// No cookie, unparseable cookie, or a signed-out snapshot.
    Anonymous,
    /// The snapshot claims authentication but carries no resolvable role.
    /// Never allowed through; forces re-authentication.
    Invalid,
    /// An authenticated snapshot with a role from the closed set.
    Authenticated(Role),
}

impl CookieAuth {
    /// Returns the resolved role, if authenticated.
    pub fn role(&self) -> Option<Role> {
        match self {
            CookieAuth::Authenticated(role) => Some(*role),
            _ => None,
        }
    }

    /// Returns `true` for any snapshot that claims authentication,
    /// resolvable or not.
    pub fn claims_authentication(&self) -> bool {
        !matches!(self, CookieAuth::Anonymous)
    }
}

/// Classifies a raw cookie value for the request gate.
///
/// More lenient than [`parse_cookie_value`]: a cookie whose `user` record is
/// partial still classifies, because the gate must distinguish "not signed
/// in" (redirect to login) from "signed in with a corrupted role" (session
/// invalid). Structural failures classify as [`CookieAuth::Anonymous`].
pub fn classify_cookie_value(raw: &str) -> CookieAuth {
    let decoded = match urlencoding::decode(raw) {
        Ok(decoded) => decoded,
        Err(_) => return CookieAuth::Anonymous,
    };

    let envelope: LenientEnvelope = match serde_json::from_str(&decoded) {
        Ok(envelope) => envelope,
        Err(_) => return CookieAuth::Anonymous,
    };

    let Some(state) = envelope.state else {
        return CookieAuth::Anonymous;
    };

    if state.is_authenticated != Some(true) {
        return CookieAuth::Anonymous;
    }

    match state.user.and_then(|u| u.role).and_then(|r| Role::parse(&r)) {
        Some(role) => CookieAuth::Authenticated(role),
        None => CookieAuth::Invalid,
    }
}

// =============================================================================
// Tests
// =============================================================================
