//! MergeService: orchestrates sources, applies precedence, deserializes to BridgeConfig.

use crate::config::sources::{environment, file};
use crate::config::BridgeConfig;
use crate::error::ApiError;
use config::Config;
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: serde defaults (lowest) -> global file -> explicit file -> environment (highest).
    pub fn load(explicit: Option<&Path>) -> Result<BridgeConfig, ApiError> {
        let builder = Config::builder();
        let builder = file::add_global(builder);
        let builder = match explicit {
            Some(path) => file::add_explicit(builder, path),
            None => builder,
        };
        let builder = environment::add_to_builder(builder);

        let config: BridgeConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Only the given file, no global file or environment overlay.
    pub fn load_file_only(path: &Path) -> Result<BridgeConfig, ApiError> {
        let builder = file::add_explicit(Config::builder(), path);
        let config: BridgeConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
