//! Environment variable source: XIBE_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "XIBE";

/// Add environment variable overlay to builder.
///
/// `XIBE__CATALOG__TTL_SECS=60` sets `catalog.ttl_secs`, `XIBE__MODE=constrained`
/// sets `mode`.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}
