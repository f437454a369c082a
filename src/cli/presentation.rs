//! CLI presentation: text and json formatters for keys, emit and config.

use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;

use crate::config::FanoutConfig;
use crate::error::ApiError;
use crate::telemetry::keys::MetricKey;
use crate::telemetry::registry::EmitStats;
use crate::telemetry::sinks::KeyCount;
use crate::telemetry::format_millis;

/// Format a section heading (bold, underlined).
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

pub fn format_keys_text(keys: &[MetricKey]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Metric keys")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Key"]);
    for (i, key) in keys.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), key.to_string()]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn format_keys_json(keys: &[MetricKey]) -> Result<String, ApiError> {
    let out = json!({ "keys": keys, "total": keys.len() });
    Ok(serde_json::to_string_pretty(&out)?)
}

/// What an `emit` run did, as seen by the configured sinks.
#[derive(Debug, Clone, Serialize)]
pub struct EmitReport {
    pub key: String,
    pub value: String,
    pub repeat: u32,
    pub sinks: Vec<&'static str>,
    pub counts: Vec<KeyCount>,
    pub stats: EmitStats,
    /// Events the log queue dropped, when the queue is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_dropped: Option<u64>,
}

pub fn format_emit_report_text(report: &EmitReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Emitted {} x{} (value: {})\n",
        report.key, report.repeat, report.value
    ));
    let sinks = if report.sinks.is_empty() {
        "(none)".to_string()
    } else {
        report.sinks.join(", ")
    };
    out.push_str(&format!("Sinks: {}\n\n", sinks));

    out.push_str(&format!("{}\n\n", format_section_heading("Counts")));
    if report.counts.is_empty() {
        out.push_str("Counter sink disabled or saw no events.\n\n");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Key", "Instant", "Begin", "End", "Last value", "Last seen"]);
        for row in &report.counts {
            table.add_row(vec![
                row.key.to_string(),
                row.instants.to_string(),
                row.begins.to_string(),
                row.ends.to_string(),
                row.last_value.to_string(),
                format_millis(row.last_timestamp_ms),
            ]);
        }
        out.push_str(&format!("{}\n\n", table));
    }

    out.push_str(&format!("{}\n\n", format_section_heading("Emit stats")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Counter", "Value"]);
    let stats = &report.stats;
    table.add_row(vec!["emitted".to_string(), stats.emitted.to_string()]);
    table.add_row(vec!["delivered".to_string(), stats.delivered.to_string()]);
    table.add_row(vec!["failed".to_string(), stats.failed.to_string()]);
    table.add_row(vec!["panicked".to_string(), stats.panicked.to_string()]);
    table.add_row(vec!["orphaned".to_string(), stats.orphaned.to_string()]);
    if let Some(dropped) = report.queue_dropped {
        table.add_row(vec!["queue dropped".to_string(), dropped.to_string()]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn format_emit_report_json(report: &EmitReport) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn format_config_output(config: &FanoutConfig, format: &str) -> Result<String, ApiError> {
    match format {
        "toml" => Ok(toml::to_string_pretty(config)?),
        "json" => Ok(serde_json::to_string_pretty(config)?),
        other => Err(ApiError::InvalidArgument(format!(
            "Unknown config format: {} (must be 'toml' or 'json')",
            other
        ))),
    }
}
