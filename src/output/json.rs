//! JSON output formatter for machine processing

use crate::migration::{MigrationPath, MigrationStep};
use crate::orchestrator::ValidationReport;
use crate::output::ReportFormatter;
use crate::resolver::ResolutionPlan;
use serde::Serialize;
use std::io::Write;

/// JSON formatter
#[derive(Debug, Default)]
pub struct JsonFormatter;

#[derive(Serialize)]
struct MigrationOutput<'a> {
    skill: &'a str,
    steps: &'a [MigrationStep],
}

impl JsonFormatter {
    /// Creates a new JSON formatter
    pub fn new() -> Self {
        Self
    }

    fn write_value<T: Serialize>(&self, value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, value)?;
        writeln!(writer)
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_validation(
        &self,
        report: &ValidationReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.write_value(report, writer)
    }

    fn format_order(&self, plan: &ResolutionPlan, writer: &mut dyn Write) -> std::io::Result<()> {
        self.write_value(&plan.entries, writer)
    }

    fn format_migration(
        &self,
        skill: &str,
        path: &MigrationPath,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.write_value(
            &MigrationOutput {
                skill,
                steps: &path.steps,
            },
            writer,
        )
    }
}
