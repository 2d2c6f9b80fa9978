//! skilldep - Skill dependency and version resolution CLI tool
//!
//! Resolves a catalog of skill manifests into a deterministic load plan:
//! - `tree` renders the resolved dependency graph
//! - `validate` resolves and health-checks the catalog
//! - `order` prints the load order
//! - `migrate` plans a version migration path for one skill

use clap::Parser;
use colored::control::set_override;
use skilldep::cli::{CliArgs, Command};
use skilldep::orchestrator::Orchestrator;
use skilldep::output::{create_formatter, render_tree, OutputConfig, OutputFormat};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(&args);

    if args.no_color || args.json {
        set_override(false);
    }

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initializes tracing; RUST_LOG overrides the flag-derived default level
fn init_tracing(args: &CliArgs) {
    let default_level = if args.verbose {
        "skilldep=debug"
    } else if args.quiet {
        "skilldep=error"
    } else {
        "skilldep=warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.no_color);
    let formatter = create_formatter(config.clone());
    let mut stdout = io::stdout().lock();

    let orchestrator = Orchestrator::new(args.command.path(), args.command.roots().to_vec());

    let exit_code = match &args.command {
        Command::Validate { .. } => {
            let report = orchestrator.validate();
            formatter.format_validation(&report, &mut stdout)?;
            exit_code_for(report.resolution_ok(), report.has_load_errors())
        }
        Command::Order { .. } => {
            let report = orchestrator.validate();
            match &report.plan {
                Some(plan) => formatter.format_order(plan, &mut stdout)?,
                None => formatter.format_validation(&report, &mut stdout)?,
            }
            exit_code_for(report.error.is_none(), report.has_load_errors())
        }
        Command::Tree { .. } => {
            let report = orchestrator.validate();
            match &report.plan {
                Some(_) if config.format == OutputFormat::Json => {
                    formatter.format_validation(&report, &mut stdout)?;
                }
                Some(plan) => render_tree(plan, config.color, &mut stdout)?,
                None => formatter.format_validation(&report, &mut stdout)?,
            }
            exit_code_for(report.error.is_none(), report.has_load_errors())
        }
        Command::Migrate {
            skill, from, to, ..
        } => match orchestrator.plan_migration(skill, from, to) {
            Ok(path) => {
                formatter.format_migration(skill, &path, &mut stdout)?;
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
    };

    stdout.flush()?;
    Ok(exit_code)
}

/// Exit code policy: resolution failures beat load errors, which beat
/// success. 0 = ok, 1 = resolution/health failure, 2 = manifest load
/// errors with an otherwise valid resolution.
fn exit_code_for(resolution_ok: bool, has_load_errors: bool) -> ExitCode {
    if !resolution_ok {
        ExitCode::FAILURE
    } else if has_load_errors {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}
