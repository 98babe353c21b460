// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The `version` command: show component versions.

use crate::error::BinResult;

/// Prints version information for all workspace components.
pub async fn execute() -> BinResult<()> {
    println!("mymechanika {}", crate::VERSION);
    println!("  mechanika-core    {}", mechanika_core::VERSION);
    println!("  mechanika-session {}", mechanika_session::VERSION);
    println!("  mechanika-api     {}", mechanika_api::VERSION);
    Ok(())
}
