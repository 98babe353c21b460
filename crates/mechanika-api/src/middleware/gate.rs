// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request gate middleware.
//!
//! Wraps the router so every navigation request passes through
//! [`crate::gate::evaluate`] before any handler runs. Redirect verdicts
//! short-circuit with a 307 and the `Location` built by the gate; allowed
//! requests are forwarded with the parsed [`CurrentSnapshot`] installed in
//! request extensions so handlers never touch the cookie header themselves.
//!
//! A cookie that fails to parse is not an error: it degrades to anonymous
//! and the request is treated as signed-out.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{header, HeaderMap, Request};
use axum::response::{IntoResponse, Redirect, Response};
use tower::{Layer, Service};
use tracing::debug;

use mechanika_core::rbac::PermissionMatrix;
use mechanika_core::snapshot::{
    classify_cookie_value, parse_cookie_value, AuthSnapshot, CookieAuth,
};

use crate::extractors::CurrentSnapshot;
use crate::gate::{evaluate, GateOutcome};

// =============================================================================
// GateLayer
// =============================================================================

/// Layer installing the request gate.
#[derive(Debug, Clone)]
pub struct GateLayer {
    matrix: Arc<PermissionMatrix>,
    cookie_name: Arc<str>,
}

impl GateLayer {
    /// Creates a gate layer over the given matrix and cookie name.
    pub fn new(matrix: Arc<PermissionMatrix>, cookie_name: impl AsRef<str>) -> Self {
        Self {
            matrix,
            cookie_name: Arc::from(cookie_name.as_ref()),
        }
    }
}

impl<S> Layer<S> for GateLayer {
    type Service = GateMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GateMiddleware {
            inner,
            matrix: self.matrix.clone(),
            cookie_name: self.cookie_name.clone(),
        }
    }
}

// =============================================================================
// GateMiddleware
// =============================================================================

/// Middleware service produced by [`GateLayer`].
#[derive(Debug, Clone)]
pub struct GateMiddleware<S> {
    inner: S,
    matrix: Arc<PermissionMatrix>,
    cookie_name: Arc<str>,
}

impl<S> Service<Request<Body>> for GateMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let matrix = self.matrix.clone();
        let cookie_name = self.cookie_name.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let pathname = req.uri().path().to_owned();
            let query = req.uri().query().unwrap_or("").to_owned();

            let raw = cookie_value(req.headers(), &cookie_name);
            let auth = raw
                .as_deref()
                .map(classify_cookie_value)
                .unwrap_or(CookieAuth::Anonymous);

            match evaluate(&matrix, &pathname, &query, auth) {
                GateOutcome::Allow => {
                    let snapshot = raw
                        .as_deref()
                        .map(parse_cookie_value)
                        .unwrap_or_else(AuthSnapshot::anonymous);
                    req.extensions_mut().insert(CurrentSnapshot(snapshot));
                    inner.call(req).await
                }
                GateOutcome::Redirect { location, reason } => {
                    debug!(
                        pathname = %pathname,
                        location = %location,
                        reason = ?reason,
                        "gate redirect"
                    );
                    Ok(Redirect::temporary(&location).into_response())
                }
            }
        })
    }
}

/// Extracts the value of the named cookie from the request headers.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get_all(header::COOKIE).iter().find_map(|value| {
        let value = value.to_str().ok()?;
        value.split(';').find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
    })
}

// =============================================================================
// Tests
// =============================================================================
