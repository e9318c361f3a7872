/*
[INPUT]:  Optional YAML file path, STAKE_LEDGER__* environment variables
[OUTPUT]: Effective LedgerConfig for the orchestrator
[POS]:    Configuration layer - file + environment merging for the binary
[UPDATE]: When config sources or the env prefix change
*/

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use stake_ledger::LedgerConfig;

pub const ENV_PREFIX: &str = "STAKE_LEDGER";

/// `<config dir>/stake-ledger/config.yaml`, read if present
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stake-ledger").join("config.yaml"))
}

/// Merge the YAML file (required when given explicitly) with environment overrides.
///
/// Nested keys use a double underscore, e.g.
/// `STAKE_LEDGER__LEDGER__COMPLETION_LATENCY_MS=500`.
pub fn load(path: Option<&Path>) -> Result<LedgerConfig> {
    let mut builder = Config::builder();

    match path {
        Some(path) => {
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml).required(true));
        }
        None => {
            if let Some(default_path) = default_config_path() {
                builder = builder.add_source(
                    File::from(default_path)
                        .format(FileFormat::Yaml)
                        .required(false),
                );
            }
        }
    }

    let config: LedgerConfig = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("build configuration")?
        .try_deserialize()
        .context("deserialize configuration")?;

    config.validate().context("validate configuration")?;
    Ok(config)
}
