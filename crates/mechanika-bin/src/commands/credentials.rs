// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The `credentials` command: list the demo login accounts.

use mechanika_core::credentials::FixtureCredentials;

use crate::cli::{CredentialsArgs, OutputFormat};
use crate::error::{BinError, BinResult};

/// Prints the seeded fixture accounts.
pub async fn execute(args: &CredentialsArgs) -> BinResult<()> {
    let listing = FixtureCredentials::new().credential_listing();

    match args.format {
        OutputFormat::Text => {
            println!("Demo accounts ({}):", listing.len());
            for entry in &listing {
                println!(
                    "  {:<12} {:<32} {}",
                    entry.role.as_str(),
                    entry.email,
                    entry.password
                );
            }
        }
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(&listing)
                .map_err(|e| BinError::runtime(e.to_string()))?;
            println!("{}", rendered);
        }
    }

    Ok(())
}
