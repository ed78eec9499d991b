// Copyright (c) The rerun-recorder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the rerun recorder.

use crate::errors::{ConfigParseError, ConfigParseErrorKind};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::Deserialize;

/// Run-wide settings for the rerun recorder.
///
/// Built up from the defaults shipped with this crate, an optional config file, and an optional
/// strictness override, in increasing order of priority.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RerunConfig {
    strict: bool,
    output: Utf8PathBuf,
}

impl RerunConfig {
    /// The default configuration, as TOML.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the config from the defaults, layering `config_file` and then `strict_override` on
    /// top if provided.
    pub fn from_sources(
        config_file: Option<&Utf8Path>,
        strict_override: Option<bool>,
    ) -> Result<Self, ConfigParseError> {
        let error = |kind| ConfigParseError::new(config_file.map(ToOwned::to_owned), kind);

        let mut builder = Self::make_default_config();
        if let Some(config_file) = config_file {
            builder = builder.add_source(File::new(config_file.as_str(), FileFormat::Toml));
        }
        let builder = builder
            .set_override_option("strict", strict_override)
            .map_err(|err| error(ConfigParseErrorKind::BuildError(Box::new(err))))?;

        Self::build_and_deserialize_config(&builder).map_err(error)
    }

    /// Returns true if pending and undefined results count as failures.
    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Returns the path rerun output is written to.
    pub fn output(&self) -> &Utf8Path {
        &self.output
    }

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<Self, ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|err| ConfigParseErrorKind::BuildError(Box::new(err)))?;

        serde_path_to_error::deserialize(config)
            .map_err(|err| ConfigParseErrorKind::DeserializeError(Box::new(err)))
    }
}
