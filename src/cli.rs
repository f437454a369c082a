//! CLI domain: parse, route, output, and presentation only.
//! Command handlers build a registry from configuration and drive it.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_config_output, format_emit_report_json, format_emit_report_text,
    format_keys_json, format_keys_text, format_section_heading, EmitReport,
};
pub use route::{command_name, RunContext};
