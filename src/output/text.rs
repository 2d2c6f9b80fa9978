//! Text output formatter for human-readable diagnostics
//!
//! This module provides:
//! - Resolution summary with the chosen version per skill
//! - Dropped-optional warnings and health findings with colors
//! - Structured error rendering (conflicts name every requester)

use crate::migration::MigrationPath;
use crate::orchestrator::ValidationReport;
use crate::output::{ReportFormatter, Verbosity};
use crate::resolver::health::HealthStatus;
use crate::resolver::ResolutionPlan;
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Creates a new text formatter
    pub fn new(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn ok_marker(&self) -> String {
        if self.color {
            "ok".green().to_string()
        } else {
            "ok".to_string()
        }
    }

    fn error_label(&self, message: &str) -> String {
        if self.color {
            format!("{} {}", "error:".red().bold(), message)
        } else {
            format!("error: {}", message)
        }
    }

    fn warning_label(&self, message: &str) -> String {
        if self.color {
            format!("{} {}", "warning:".yellow(), message)
        } else {
            format!("warning: {}", message)
        }
    }

    fn format_plan_summary(
        &self,
        plan: &ResolutionPlan,
        skills: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        writeln!(
            writer,
            "resolved {} of {} skills [{}]",
            plan.entries.len(),
            skills,
            self.ok_marker()
        )?;

        if self.verbosity == Verbosity::Verbose {
            let width = plan
                .entries
                .iter()
                .map(|e| e.name.len())
                .max()
                .unwrap_or(0);
            for entry in &plan.entries {
                if self.color {
                    writeln!(
                        writer,
                        "  {:width$} {}",
                        entry.name,
                        entry.version.to_string().dimmed(),
                        width = width
                    )?;
                } else {
                    writeln!(writer, "  {:width$} {}", entry.name, entry.version, width = width)?;
                }
            }
        }
        Ok(())
    }
}

impl ReportFormatter for TextFormatter {
    fn format_validation(
        &self,
        report: &ValidationReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        for message in &report.load_errors {
            writeln!(writer, "{}", self.error_label(message))?;
        }

        if let Some(error) = &report.error {
            writeln!(writer, "{}", self.error_label(&error.to_string()))?;
            return Ok(());
        }

        let Some(plan) = &report.plan else {
            return Ok(());
        };

        if self.verbosity != Verbosity::Quiet {
            self.format_plan_summary(plan, report.skills, writer)?;
        }

        for warning in &plan.warnings {
            writeln!(
                writer,
                "{}",
                self.warning_label(&format!(
                    "optional dependency {} -> {} dropped: {}",
                    warning.depender, warning.name, warning.reason
                ))
            )?;
        }

        for entry in &report.health {
            match entry.status {
                HealthStatus::Satisfied => {
                    if self.verbosity == Verbosity::Verbose {
                        writeln!(writer, "  {} -> {}: {}", entry.depender, entry.name, entry.detail)?;
                    }
                }
                _ => {
                    writeln!(
                        writer,
                        "{}",
                        self.error_label(&format!(
                            "{} -> {}: {}",
                            entry.depender, entry.name, entry.detail
                        ))
                    )?;
                }
            }
        }
        Ok(())
    }

    fn format_order(&self, plan: &ResolutionPlan, writer: &mut dyn Write) -> std::io::Result<()> {
        for entry in &plan.entries {
            writeln!(writer, "{} {}", entry.name, entry.version)?;
        }
        Ok(())
    }

    fn format_migration(
        &self,
        skill: &str,
        path: &MigrationPath,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if path.is_empty() {
            writeln!(writer, "{}: already at the target version", skill)?;
            return Ok(());
        }
        writeln!(writer, "{}: {} step(s)", skill, path.len())?;
        for (index, step) in path.steps.iter().enumerate() {
            writeln!(writer, "  {}. {}", index + 1, step)?;
        }
        Ok(())
    }
}
