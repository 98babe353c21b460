// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The `validate` command: check a configuration file without running.

use serde_json::json;

use mechanika_api::{ConfigError, ServiceConfig};

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Loads and validates the configuration file, reporting warnings.
pub async fn execute(cli: &Cli, args: &ValidateArgs) -> BinResult<()> {
    let path = &cli.config;
    if !path.exists() {
        return Err(ConfigError::file_not_found(path).into());
    }

    // `load` validates; reaching past this line means the config is usable.
    let config = ServiceConfig::load(path)?;
    let warnings = config.warnings();

    match args.format {
        OutputFormat::Text => {
            println!("Configuration OK: {}", path.display());
            println!("  bind address:  {}", config.socket_addr());
            println!(
                "  auth cookie:   {} (max-age {}s)",
                config.cookie.name, config.cookie.max_age_secs
            );
            match &config.auth.state_file {
                Some(file) => println!("  session state: {}", file.display()),
                None => println!("  session state: in-memory"),
            }
            for warning in &warnings {
                println!("  warning: {}", warning);
            }
            if args.show_config {
                let rendered = serde_json::to_string_pretty(&config)
                    .map_err(|e| BinError::runtime(e.to_string()))?;
                println!("{}", rendered);
            }
        }
        OutputFormat::Json => {
            let report = json!({
                "path": path.display().to_string(),
                "valid": true,
                "warnings": warnings,
            });
            let rendered = serde_json::to_string_pretty(&report)
                .map_err(|e| BinError::runtime(e.to_string()))?;
            println!("{}", rendered);
        }
    }

    if args.strict && !warnings.is_empty() {
        return Err(ConfigError::validation(format!(
            "{} warning(s) in strict mode",
            warnings.len()
        ))
        .into());
    }

    Ok(())
}
