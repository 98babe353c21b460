// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Health and readiness endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::response::{ApiResponse, ComponentStatus, HealthResponse, ReadinessResponse};
use crate::state::AppState;

/// `GET /health`
///
/// Liveness only: answers as long as the process serves requests.
pub async fn health() -> ApiResponse<HealthResponse> {
    ApiResponse::success(HealthResponse::healthy())
}

/// `GET /ready`
///
/// Reports per-component status; 503 when any component is unhealthy.
pub async fn ready(State(state): State<AppState>) -> Response {
    let components = vec![
        ComponentStatus {
            name: "session_store".to_string(),
            healthy: true,
            message: state
                .store()
                .is_authenticated()
                .then(|| "session active".to_string()),
        },
        ComponentStatus {
            name: "credential_store".to_string(),
            healthy: !state.credentials().credential_listing().is_empty(),
            message: None,
        },
    ];

    let ready = components.iter().all(|c| c.healthy);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ReadinessResponse { ready, components })).into_response()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_version() {
        let response = health().await;
        let data = response.data.unwrap();
        assert_eq!(data.status, "ok");
        assert_eq!(data.version, crate::VERSION);
    }

    #[tokio::test]
    async fn test_ready_with_default_state() {
        let state = AppState::for_testing();
        let response = ready(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
