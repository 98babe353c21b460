// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Command implementations.

pub mod credentials;
pub mod run;
pub mod validate;
pub mod version;

use crate::cli::{Cli, Commands};
use crate::error::BinResult;

/// Executes the CLI's effective command.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Run(args) => run::execute(&cli, &args).await,
        Commands::Validate(args) => validate::execute(&cli, &args).await,
        Commands::Credentials(args) => credentials::execute(&args).await,
        Commands::Version => version::execute().await,
    }
}
