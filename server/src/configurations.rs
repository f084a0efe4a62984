// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Layered configuration: a base file, an optional local override, and
//! `NIMBUS__`-prefixed environment variables.

use config::{Config, Environment, File, FileFormat};
use nimbusbackend::settings::Settings;

pub fn get_configuration(prefix: &str) -> Result<Settings, config::ConfigError> {
    Config::builder()
        .add_source(File::with_name(&format!("{prefix}configuration/base")).required(true))
        .add_source(File::with_name(&format!("{prefix}configuration/local")).required(false))
        .add_source(Environment::with_prefix("NIMBUS").separator("__"))
        .build()?
        .try_deserialize()
}

/// Builds the configuration from in-memory YAML, used by the test harness.
pub fn get_configuration_from_str(
    base: &str,
    local: &str,
) -> Result<Settings, config::ConfigError> {
    Config::builder()
        .add_source(File::from_str(base, FileFormat::Yaml))
        .add_source(File::from_str(local, FileFormat::Yaml))
        .build()?
        .try_deserialize()
}
