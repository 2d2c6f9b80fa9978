//! Output formatting for resolution results
//!
//! This module provides:
//! - Text output for human-readable diagnostics
//! - JSON output for machine processing
//! - Tree rendering of the resolved dependency graph

mod json;
mod text;
mod tree;

pub use json::JsonFormatter;
pub use text::TextFormatter;
pub use tree::render_tree;

use crate::migration::MigrationPath;
use crate::orchestrator::ValidationReport;
use crate::resolver::ResolutionPlan;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Minimal output
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Detailed output with additional information
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Whether to use colors (when supported)
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: Verbosity::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// Creates a new output configuration
    pub fn new(format: OutputFormat, verbosity: Verbosity, color: bool) -> Self {
        Self {
            format,
            verbosity,
            color,
        }
    }

    /// Creates configuration from CLI flags
    pub fn from_cli(json: bool, verbose: bool, quiet: bool, no_color: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Self {
            format,
            verbosity,
            color: !no_color,
        }
    }
}

/// Trait for output formatters
pub trait ReportFormatter {
    /// Formats and writes a validation report
    fn format_validation(
        &self,
        report: &ValidationReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;

    /// Formats and writes the load order of a plan
    fn format_order(&self, plan: &ResolutionPlan, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Formats and writes a migration path
    fn format_migration(
        &self,
        skill: &str,
        path: &MigrationPath,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;
}

/// Creates an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn ReportFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::new(config.verbosity, config.color)),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
    }
}
