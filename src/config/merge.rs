//! Merge rules: defaults, override order.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("sinks.log.enabled", true)?
        .set_default("sinks.log.level", "info")?
        .set_default("sinks.counter.enabled", true)?
        .set_default("sinks.memory.enabled", false)?
        .set_default("sinks.memory.capacity", 256)?
        .set_default("sinks.memory.overflow", "reject")?
        .set_default("sinks.queue.enabled", false)?
        .set_default("sinks.queue.capacity", 1024)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
