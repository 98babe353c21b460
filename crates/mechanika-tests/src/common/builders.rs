// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Builders
//!
//! Builder patterns for constructing test objects with sensible defaults.
//!
//! ## Design Principles
//!
//! - All builders have sensible defaults
//! - Fluent API for readability
//! - Each builder produces a valid object

use chrono::{DateTime, Utc};
use mechanika_core::{Identity, Role};
use serde_json::json;

// =============================================================================
// Identity Builder
// =============================================================================

/// Builder for [`Identity`] records.
#[derive(Debug, Clone)]
pub struct IdentityBuilder {
    id: String,
    email: String,
    name: String,
    role: Role,
    avatar: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl IdentityBuilder {
    /// Creates a builder with default values (a manager account).
    pub fn new() -> Self {
        Self {
            id: "test-user".to_string(),
            email: "test@mymechanika.com".to_string(),
            name: "Test User".to_string(),
            role: Role::Manager,
            avatar: None,
            created_at: None,
        }
    }

    /// Set the user ID.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the login email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the role.
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Set the avatar URL.
    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Set the creation timestamp.
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Build the identity.
    pub fn build(self) -> Identity {
        let mut identity = Identity::new(self.id, self.email, self.name, self.role);
        if let Some(avatar) = self.avatar {
            identity = identity.with_avatar(avatar);
        }
        if let Some(created_at) = self.created_at {
            identity = identity.with_created_at(created_at);
        }
        identity
    }
}

impl Default for IdentityBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Auth Cookie Builder
// =============================================================================

/// Builder for raw auth cookie values with full control over the claims.
///
/// Unlike the fixtures, this builder can produce deliberately inconsistent
/// cookies (claimed authentication without a user, unknown role strings) for
/// exercising the gate's fail-closed paths.
#[derive(Debug, Clone)]
pub struct AuthCookieBuilder {
    is_authenticated: bool,
    user_id: Option<String>,
    role: Option<String>,
}

impl AuthCookieBuilder {
    /// Creates a builder for a signed-out cookie.
    pub fn new() -> Self {
        Self {
            is_authenticated: false,
            user_id: None,
            role: None,
        }
    }

    /// Claim authentication.
    pub fn authenticated(mut self) -> Self {
        self.is_authenticated = true;
        self
    }

    /// Set the embedded user ID.
    pub fn user_id(mut self, id: impl Into<String>) -> Self {
        self.user_id = Some(id.into());
        self
    }

    /// Set the embedded role string (wire form, e.g. `"ADMIN"`).
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Build the URL-encoded cookie value.
    pub fn build(self) -> String {
        let user = if self.user_id.is_some() || self.role.is_some() {
            json!({
                "id": self.user_id,
                "role": self.role,
            })
        } else {
            serde_json::Value::Null
        };

        let envelope = json!({
            "state": {
                "isAuthenticated": self.is_authenticated,
                "user": user,
            }
        });

        urlencoding::encode(&envelope.to_string()).into_owned()
    }

    /// Build a full `Cookie` header value under the given cookie name.
    pub fn build_header(self, cookie_name: &str) -> String {
        format!("{}={}", cookie_name, self.build())
    }
}

impl Default for AuthCookieBuilder {
    fn default() -> Self {
        Self::new()
    }
}
