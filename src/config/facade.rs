//! Config loading facade: assembles sources in precedence order and
//! deserializes the result.

use crate::config::merge::builder_with_defaults;
use crate::config::sources::{environment, explicit_file, global_file};
use crate::config::FanoutConfig;
use config::ConfigError;
use std::path::{Path, PathBuf};

/// Loads [`FanoutConfig`] from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, global file, environment.
    pub fn load() -> Result<FanoutConfig, ConfigError> {
        Self::load_layers(global_file::global_config_path().as_deref(), None)
    }

    /// Defaults, global file, the given file, environment.
    pub fn load_from_file(path: &Path) -> Result<FanoutConfig, ConfigError> {
        Self::load_layers(global_file::global_config_path().as_deref(), Some(path))
    }

    /// Assemble an explicit set of layers. `None` skips that layer.
    pub fn load_layers(
        global: Option<&Path>,
        file: Option<&Path>,
    ) -> Result<FanoutConfig, ConfigError> {
        let mut builder = builder_with_defaults()?;
        builder = global_file::add_to_builder(builder, global)?;
        if let Some(path) = file {
            builder = explicit_file::add_to_builder(builder, path)?;
        }
        builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Location of the global config file on this platform.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
