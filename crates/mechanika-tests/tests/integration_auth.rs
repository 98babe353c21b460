// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Auth Integration Tests
//!
//! Integration tests for the session lifecycle:
//!
//! - Login, logout, and restore across store instances
//! - Error retention and explicit clearing
//! - Persistence interactions with storage
//! - Cookie bridge rendering and classification
//!
//! ## Test Categories
//!
//! - `test_session_*`: Session store lifecycle tests
//! - `test_persistence_*`: Storage interaction tests
//! - `test_bridge_*`: Cookie bridge tests
//! - `test_cookie_*`: Cookie codec and classification tests

use std::sync::Arc;

use mechanika_core::{
    classify_cookie_value, parse_cookie_value, AuthError, CookieAuth, FixtureCredentials, Role,
    FIXTURE_PASSWORD,
};
use mechanika_session::{CookieBridge, FileStorage, SessionStore, STORAGE_KEY, TOKEN_KEY};

use mechanika_tests::common::{init_test_logging, temp_test_dir};
use mechanika_tests::prelude::*;

fn fixture_store() -> SessionStore {
    SessionStore::builder()
        .credentials(Arc::new(FixtureCredentials::for_testing()))
        .build()
}

// =============================================================================
// Session Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_session_login_success() {
    init_test_logging();
    let store = fixture_store();

    let identity = store
        .login(AccountFixtures::MANAGER_EMAIL, FIXTURE_PASSWORD)
        .await
        .expect("login should succeed");

    assert_eq!(identity.role, Role::Manager);
    assert!(identity.last_login.is_some());
    store.snapshot().assert_signed_in(Role::Manager);
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn test_session_login_rejects_bad_password() {
    let store = fixture_store();

    let result = store
        .login(AccountFixtures::MANAGER_EMAIL, "wrong-password")
        .await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    store.snapshot().assert_signed_out();
}

#[tokio::test]
async fn test_session_failed_login_keeps_existing_session() {
    let store = fixture_store();
    store
        .login(AccountFixtures::ADMIN_EMAIL, FIXTURE_PASSWORD)
        .await
        .expect("login should succeed");

    let result = store
        .login(AccountFixtures::ADMIN_EMAIL, "wrong-password")
        .await;
    assert!(result.is_err());

    // The admin session survives the failed attempt.
    store.snapshot().assert_signed_in(Role::Admin);
    assert!(store.last_error().is_some());
}

#[tokio::test]
async fn test_session_error_persists_until_cleared() {
    let store = fixture_store();

    let _ = store.login("nobody@mymechanika.com", "whatever").await;
    assert!(store.last_error().is_some());

    // Reads do not clear the error.
    let _ = store.snapshot();
    assert!(store.last_error().is_some());

    store.clear_error();
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn test_session_logout_is_idempotent() {
    let store = fixture_store();
    store
        .login(AccountFixtures::SUPERVISOR_EMAIL, FIXTURE_PASSWORD)
        .await
        .expect("login should succeed");

    store.logout().await;
    store.snapshot().assert_signed_out();

    // Logging out again is a no-op.
    store.logout().await;
    store.snapshot().assert_signed_out();
}

#[tokio::test]
async fn test_session_credential_outage_is_reported() {
    let credentials = Arc::new(MockCredentialStore::new().failing("directory offline"));
    let store = SessionStore::builder()
        .credentials(credentials.clone())
        .build();

    let result = store.login("anyone@mymechanika.com", "pw").await;
    assert!(matches!(result, Err(AuthError::Storage { .. })));
    assert_eq!(credentials.attempts(), 1);
    store.snapshot().assert_signed_out();
}

#[tokio::test]
async fn test_session_subscribers_observe_login_and_logout() {
    let store = fixture_store();
    let mut receiver = store.subscribe();

    store
        .login(AccountFixtures::ADMIN_EMAIL, FIXTURE_PASSWORD)
        .await
        .expect("login should succeed");
    let snapshot = receiver.recv().await.expect("login snapshot");
    snapshot.assert_signed_in(Role::Admin);

    store.logout().await;
    let snapshot = receiver.recv().await.expect("logout snapshot");
    snapshot.assert_signed_out();
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[tokio::test]
async fn test_persistence_session_restores_across_stores() {
    let dir = temp_test_dir("mechanika_auth_");
    let path = dir.path().join("session.json");

    let store = SessionStore::builder()
        .credentials(Arc::new(FixtureCredentials::for_testing()))
        .storage(Arc::new(FileStorage::new(&path)))
        .build();
    store
        .login(AccountFixtures::MANAGER_EMAIL, FIXTURE_PASSWORD)
        .await
        .expect("login should succeed");

    // A fresh store over the same file restores the session.
    let restored = SessionStore::builder()
        .credentials(Arc::new(FixtureCredentials::for_testing()))
        .storage(Arc::new(FileStorage::new(&path)))
        .build();
    restored.check_auth().await.assert_signed_in(Role::Manager);
    restored.snapshot().assert_signed_in(Role::Manager);
}

#[tokio::test]
async fn test_persistence_logout_clears_stored_records() {
    let storage = Arc::new(RecordingStorage::new());
    let store = SessionStore::builder()
        .credentials(Arc::new(FixtureCredentials::for_testing()))
        .storage(storage.clone())
        .build();

    store
        .login(AccountFixtures::ADMIN_EMAIL, FIXTURE_PASSWORD)
        .await
        .expect("login should succeed");
    assert!(storage.value(STORAGE_KEY).is_some());
    assert!(storage.value(TOKEN_KEY).is_some());

    store.logout().await;
    assert!(storage.value(STORAGE_KEY).is_none());
    assert!(storage.value(TOKEN_KEY).is_none());
}

#[tokio::test]
async fn test_persistence_missing_token_forces_fresh_login() {
    let storage = Arc::new(RecordingStorage::new());
    let store = SessionStore::builder()
        .credentials(Arc::new(FixtureCredentials::for_testing()))
        .storage(storage.clone())
        .build();

    store
        .login(AccountFixtures::ADMIN_EMAIL, FIXTURE_PASSWORD)
        .await
        .expect("login should succeed");

    // Drop only the corroborating token; the projection alone must not
    // restore a session.
    let seeded = RecordingStorage::new().with_value(
        STORAGE_KEY,
        storage.value(STORAGE_KEY).expect("projection present"),
    );
    let restored = SessionStore::builder()
        .credentials(Arc::new(FixtureCredentials::for_testing()))
        .storage(Arc::new(seeded))
        .build();

    restored.check_auth().await.assert_signed_out();
    restored.snapshot().assert_signed_out();
}

#[tokio::test]
async fn test_persistence_unreadable_storage_resets_to_signed_out() {
    let store = SessionStore::builder()
        .credentials(Arc::new(FixtureCredentials::for_testing()))
        .storage(Arc::new(FailingStorage::new("disk gone")))
        .build();

    store.check_auth().await.assert_signed_out();
}

#[tokio::test]
async fn test_persistence_corrupt_projection_resets_to_signed_out() {
    let seeded = RecordingStorage::new()
        .with_value(STORAGE_KEY, "{not json")
        .with_value(TOKEN_KEY, "session-1-xyz");
    let store = SessionStore::builder()
        .credentials(Arc::new(FixtureCredentials::for_testing()))
        .storage(Arc::new(seeded))
        .build();

    store.check_auth().await.assert_signed_out();
}

// =============================================================================
// Cookie Bridge Tests
// =============================================================================

#[tokio::test]
async fn test_bridge_set_cookie_carries_session() {
    let store = fixture_store();
    store
        .login(AccountFixtures::ADMIN_EMAIL, FIXTURE_PASSWORD)
        .await
        .expect("login should succeed");

    let bridge = CookieBridge::new();
    let header = bridge.set_cookie(&store.snapshot());
    assert_cookie_sets_session(&header, bridge.name());

    // The value round-trips through the cookie codec.
    let value = header
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, v)| v.to_string())
        .expect("cookie pair");
    parse_cookie_value(&value).assert_signed_in(Role::Admin);
}

#[tokio::test]
async fn test_bridge_clear_cookie_expires_session() {
    let bridge = CookieBridge::new();
    assert_cookie_clears_session(&bridge.clear_cookie(), bridge.name());
}

#[tokio::test]
async fn test_bridge_custom_name_and_max_age() {
    let bridge = CookieBridge::new()
        .with_name("workshop-auth")
        .with_max_age_secs(60);

    let header = bridge.set_cookie(&SnapshotFixtures::authenticated(Role::Manager));
    assert!(header.starts_with("workshop-auth="));
    assert!(header.contains("Max-Age=60"));
}

// =============================================================================
// Cookie Classification Tests
// =============================================================================

#[test]
fn test_cookie_classification_of_fixture_values() {
    assert_eq!(
        classify_cookie_value(&CookieFixtures::authenticated(Role::Supervisor)),
        CookieAuth::Authenticated(Role::Supervisor)
    );
    assert_eq!(
        classify_cookie_value(&CookieFixtures::anonymous()),
        CookieAuth::Anonymous
    );
    assert_eq!(
        classify_cookie_value(&CookieFixtures::garbled()),
        CookieAuth::Anonymous
    );
    assert_eq!(
        classify_cookie_value(&CookieFixtures::wrong_shape()),
        CookieAuth::Anonymous
    );
    assert_eq!(
        classify_cookie_value(&CookieFixtures::unknown_role()),
        CookieAuth::Invalid
    );
}

#[test]
fn test_cookie_builder_claims_without_role_are_invalid() {
    let value = AuthCookieBuilder::new()
        .authenticated()
        .user_id("17")
        .build();
    assert_eq!(classify_cookie_value(&value), CookieAuth::Invalid);
}

#[test]
fn test_cookie_parse_fails_closed_on_inconsistent_claims() {
    // Authenticated flag with no user record parses to anonymous.
    let value = AuthCookieBuilder::new().authenticated().build();
    parse_cookie_value(&value).assert_signed_out();
}
