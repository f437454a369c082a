//! CLI route: single route table and run context.

use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_config_output, format_emit_report_json, format_emit_report_text, format_keys_json,
    format_keys_text, EmitReport,
};
use crate::config::{ConfigLoader, FanoutConfig};
use crate::error::ApiError;
use crate::telemetry::keys::{self, MetricKey};
use crate::telemetry::{InstalledSinks, MetricRegistry, MetricValue};

/// Command name string for log records (e.g. "emit", "keys").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Keys { .. } => "keys",
        Commands::Emit { .. } => "emit",
        Commands::Config { .. } => "config",
    }
}

/// Runtime context for CLI execution: the loaded configuration.
#[derive(Debug)]
pub struct RunContext {
    config: FanoutConfig,
    config_path: Option<PathBuf>,
}

impl RunContext {
    /// Load and validate configuration. Uses ConfigLoader only.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Self::from_config(config, config_path)
    }

    /// Build a context around an already-assembled configuration.
    pub fn from_config(
        config: FanoutConfig,
        config_path: Option<PathBuf>,
    ) -> Result<Self, ApiError> {
        if let Err(errors) = config.validate() {
            let joined = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ApiError::ConfigError(joined));
        }
        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn config(&self) -> &FanoutConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        debug!(
            command = command_name(command),
            config = ?self.config_path,
            "executing command"
        );
        match command {
            Commands::Keys { format } => match format.as_str() {
                "json" => format_keys_json(&keys::ALL),
                _ => Ok(format_keys_text(&keys::ALL)),
            },
            Commands::Emit {
                key,
                value,
                text,
                error_code,
                repeat,
                format,
            } => {
                let value = match (value, text.as_deref(), error_code) {
                    (Some(v), _, _) => MetricValue::Signed(*v),
                    (None, Some(t), _) => MetricValue::Text(t),
                    (None, None, Some(code)) => MetricValue::ErrorCode(*code),
                    (None, None, None) => MetricValue::None,
                };
                let report = self.handle_emit(key, value, *repeat)?;
                match format.as_str() {
                    "json" => format_emit_report_json(&report),
                    _ => Ok(format_emit_report_text(&report)),
                }
            }
            Commands::Config { format } => format_config_output(&self.config, format),
        }
    }

    fn handle_emit(
        &self,
        key: &str,
        value: MetricValue<'_>,
        repeat: u32,
    ) -> Result<EmitReport, ApiError> {
        if repeat == 0 {
            return Err(ApiError::InvalidArgument(
                "--repeat must be at least 1".to_string(),
            ));
        }
        let metric_key = resolve_key(key);

        let registry = MetricRegistry::new();
        let installed = InstalledSinks::install(&registry, &self.config.sinks)?;
        for _ in 0..repeat {
            registry.emit(metric_key, value);
        }

        let sinks = registry.sink_names();
        let counts = installed
            .counter()
            .map(|counter| counter.snapshot())
            .unwrap_or_default();
        let queue = installed.queue().cloned();
        installed.uninstall(&registry);
        // Read after uninstall so the queue has drained.
        let queue_dropped = queue.map(|q| q.dropped());
        let stats = registry.stats();
        info!(
            key = metric_key.as_str(),
            repeat,
            delivered = stats.delivered,
            "emit finished"
        );

        Ok(EmitReport {
            key: metric_key.to_string(),
            value: value.to_string(),
            repeat,
            sinks,
            counts,
            stats,
            queue_dropped,
        })
    }
}

/// Map a command-line key to a [`MetricKey`].
///
/// Well-known names resolve to their constants. Anything else is leaked to
/// obtain a `'static` label; the process emits once and exits.
fn resolve_key(name: &str) -> MetricKey {
    keys::lookup(name).unwrap_or_else(|| {
        warn!(key = name, "not a well-known metric key, emitting anyway");
        MetricKey::new(Box::leak(name.to_owned().into_boxed_str()))
    })
}
