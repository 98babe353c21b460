// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! HTTP request handlers.

pub mod auth;
pub mod health;
pub mod pages;

pub use auth::*;
pub use health::*;
pub use pages::*;
