// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The `run` command: start the service.

use crate::cli::{Cli, RunArgs};
use crate::error::BinResult;
use crate::runtime::ServiceRuntime;

/// Builds the runtime from the CLI arguments and runs it to completion.
pub async fn execute(cli: &Cli, args: &RunArgs) -> BinResult<()> {
    let mut builder = ServiceRuntime::builder().config_path(&cli.config);

    if let Some(port) = args.port {
        builder = builder.port(port);
    }
    if let Some(state_file) = &args.state_file {
        builder = builder.state_file(state_file);
    }

    builder.dev(args.dev).build()?.run().await
}
