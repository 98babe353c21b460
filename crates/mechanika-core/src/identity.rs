// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authenticated user identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::role::Role;

// =============================================================================
// Identity
// =============================================================================

/// The identity of an authenticated staff member.
///
/// Created by a successful authentication attempt (a copy of the matched
/// credential record with the last-login timestamp refreshed), held by the
/// session store for the lifetime of the session, and destroyed on logout.
///
/// JSON field names are camelCase because the serialized form is shared with
/// the auth cookie consumed by the request gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable user identifier.
    pub id: String,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Assigned role.
    pub role: Role,
    /// Avatar image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Most recent successful login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl Identity {
    /// Creates an identity with the given core fields.
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            role,
            avatar: None,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    /// Sets the avatar URL.
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Sets the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Returns a copy with the last-login timestamp refreshed to now.
    ///
    /// This is the copy handed out on successful authentication; the stored
    /// credential record itself is never mutated.
    pub fn with_last_login_now(&self) -> Self {
        Self {
            last_login: Some(Utc::now()),
            ..self.clone()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
