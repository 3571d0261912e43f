//! File sources: the optional global config file and an explicit override.

use crate::config::paths;
use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use std::path::Path;

/// Add `$XDG_CONFIG_HOME/xibe/config.toml` if it exists.
pub fn add_global(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match paths::global_config_file() {
        Ok(path) => builder.add_source(File::from(path).required(false)),
        Err(e) => {
            tracing::debug!(error = %e, "No global config location, skipping");
            builder
        }
    }
}

/// Add an explicitly requested config file. Missing is an error.
pub fn add_explicit(builder: ConfigBuilder<DefaultState>, path: &Path) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(path).required(true))
}
