//! data-organizer: filesystem scanning and reversible bulk file operations.
//!
//! The library walks directory trees into categorized, content-hashed
//! [`FileRecord`](scanner::FileRecord)s, groups identical content, and runs
//! move/delete/compress/tag actions with dry-run previews and rollback
//! records that can be journaled and replayed in a later process.
//!
//! The `data-organizer` binary is a thin layer over [`run_app`].

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod journal;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::actions::{ActionRequest, ExecutionResult, Executor, RequestParams};
use crate::cli::{Cli, Commands, ExecuteArgs, OutputFormat, RollbackArgs, ScanArgs, TreeArgs};
use crate::config::{Config, ConfigOverrides};
use crate::duplicates::find_duplicates_with_stats;
use crate::error::ExitCode;
use crate::journal::Journal;
use crate::output::{text, write_json, CsvOutput, DuplicateCsvOutput, DuplicatesReport};
use crate::progress::Progress;
use crate::scanner::{directory_tree, FileRecord, NullSink, ScanResult, Scanner};
use crate::signal::{install_handler, ShutdownHandler};

/// Run one CLI invocation and return the process exit code.
///
/// Per-item failures are reported in the output and turn the exit code
/// into [`ExitCode::PartialSuccess`]; only call-level failures (bad root,
/// unreadable config or journal) are returned as errors.
///
/// # Errors
///
/// Returns an error when the command cannot run at all.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }
    let shutdown = install_handler();
    let app = App {
        config_path: cli.config,
        quiet: cli.quiet,
        shutdown,
    };

    match cli.command {
        Commands::Scan(args) => app.scan(&args),
        Commands::Duplicates(args) => app.duplicates(&args),
        Commands::Tree(args) => app.tree(&args),
        Commands::Execute(args) => app.execute(&args),
        Commands::Rollback(args) => app.rollback(&args),
    }
}

struct App {
    config_path: Option<PathBuf>,
    quiet: bool,
    shutdown: ShutdownHandler,
}

impl App {
    fn load_config(&self, overrides: &ConfigOverrides) -> Result<Config> {
        Config::load(self.config_path.as_deref(), overrides).context("Invalid configuration")
    }

    fn progress(&self) -> Arc<Progress> {
        Arc::new(Progress::new(self.quiet))
    }

    fn run_scan(&self, args: &ScanArgs) -> Result<ScanResult> {
        let config = self.load_config(&args.overrides())?;
        let scanner = Scanner::new(config.to_scan_config())?
            .with_shutdown_flag(self.shutdown.get_flag())
            .with_progress(self.progress());
        Ok(scanner.scan(&args.path, &mut NullSink)?)
    }

    fn scan(&self, args: &ScanArgs) -> Result<ExitCode> {
        let result = self.run_scan(args)?;
        let mut out = io::stdout().lock();
        match args.output {
            OutputFormat::Text => write!(out, "{}", text::render_scan(&result))?,
            OutputFormat::Json => write_json(&mut out, &result, true)?,
            OutputFormat::Csv => CsvOutput::new(&result.files).write_to(&mut out)?,
        }
        Ok(outcome(result.interrupted, result.has_errors()))
    }

    fn duplicates(&self, args: &ScanArgs) -> Result<ExitCode> {
        let result = self.run_scan(args)?;
        let (groups, stats) = find_duplicates_with_stats(&result.files);
        let mut out = io::stdout().lock();
        match args.output {
            OutputFormat::Text => write!(out, "{}", text::render_duplicates(&groups, &stats))?,
            OutputFormat::Json => {
                write_json(&mut out, &DuplicatesReport::new(&groups, &stats), true)?;
            }
            OutputFormat::Csv => DuplicateCsvOutput::new(&groups).write_to(&mut out)?,
        }
        Ok(outcome(result.interrupted, result.has_errors()))
    }

    fn tree(&self, args: &TreeArgs) -> Result<ExitCode> {
        let config = self.load_config(&ConfigOverrides::default())?;
        let depth = args.depth.unwrap_or(config.max_depth);
        let include_hidden = args.include_hidden || config.include_hidden;
        let tree = directory_tree(&args.path, depth, include_hidden)?;

        let mut out = io::stdout().lock();
        match args.output {
            OutputFormat::Text => write!(out, "{}", text::render_tree(&tree))?,
            OutputFormat::Json => write_json(&mut out, &tree, true)?,
            OutputFormat::Csv => bail!("CSV output is not supported for trees"),
        }
        Ok(ExitCode::Success)
    }

    fn execute(&self, args: &ExecuteArgs) -> Result<ExitCode> {
        if args.output == OutputFormat::Csv {
            bail!("CSV output is not supported for executions");
        }
        let config = self.load_config(&ConfigOverrides {
            dry_run: args.dry_run_override(),
            ..Default::default()
        })?;

        let request = ActionRequest {
            action: args.action.clone(),
            params: RequestParams {
                destination_directory: args.destination.clone(),
                archive_name: args.archive_name.clone(),
                tags: args.tags.clone(),
            },
        };
        let targets: Vec<FileRecord> = args.files.iter().map(|p| target_record(p)).collect();

        // Rollback data only survives in the journal; check it before mutating
        if let (Some(path), false) = (&args.journal, config.dry_run) {
            Journal::ensure_writable(path)
                .with_context(|| format!("Cannot write journal {}", path.display()))?;
        }

        let executor = Executor::new()
            .with_capture_ceiling(config.delete_capture_ceiling)
            .with_shutdown_flag(self.shutdown.get_flag())
            .with_progress(self.progress());
        let result = executor.execute_request(&request, &targets, config.dry_run);

        let saved = match &args.journal {
            Some(path) => save_journal(path, &request, &result),
            None => Ok(()),
        };

        // Printed even when the journal failed, so the rollback records are not lost
        let mut out = io::stdout().lock();
        match args.output {
            OutputFormat::Json => write_json(&mut out, &result, true)?,
            _ => write!(out, "{}", text::render_execution(&result))?,
        }
        if saved.is_err() && args.output != OutputFormat::Json {
            let mut err = io::stderr().lock();
            writeln!(err, "Journal not written; rollback records of this run:")?;
            write_json(&mut err, &result, true)?;
        }
        saved?;

        if result.action.is_none() {
            return Ok(ExitCode::GeneralError);
        }
        Ok(outcome(result.interrupted, result.has_errors()))
    }

    fn rollback(&self, args: &RollbackArgs) -> Result<ExitCode> {
        if args.output == OutputFormat::Csv {
            bail!("CSV output is not supported for rollbacks");
        }
        let mut journal = Journal::load(&args.journal)
            .with_context(|| format!("Cannot read journal {}", args.journal.display()))?;
        journal.ensure_rollback_allowed()?;

        let executor = Executor::new()
            .with_shutdown_flag(self.shutdown.get_flag())
            .with_progress(self.progress());
        let result = executor.rollback(journal.rollback_records());

        let code = outcome(result.interrupted, !result.all_succeeded());
        if !result.interrupted {
            journal.mark_rolled_back(result.clone())?;
            journal.save(&args.journal)?;
        }

        let mut out = io::stdout().lock();
        match args.output {
            OutputFormat::Json => write_json(&mut out, &result, true)?,
            _ => write!(out, "{}", text::render_rollback(&result))?,
        }
        Ok(code)
    }
}

/// Record for a path named on the command line.
///
/// A path that cannot be stat'ed still becomes a record so the executor
/// reports it as a per-target failure.
fn target_record(path: &Path) -> FileRecord {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let metadata = fs::symlink_metadata(&path).ok();
    let size = metadata.as_ref().map_or(0, fs::Metadata::len);
    let mut record = FileRecord::from_path(path, size);
    if let Some(metadata) = metadata {
        record.is_directory = metadata.is_dir();
        record.is_symlink = metadata.file_type().is_symlink();
    }
    record
}

fn save_journal(path: &Path, request: &ActionRequest, result: &ExecutionResult) -> Result<()> {
    if result.dry_run {
        log::info!("Dry run: journal {} not written", path.display());
        return Ok(());
    }
    if result.action.is_none() {
        return Ok(());
    }
    let journal = Journal::new(request.to_action().ok(), result.clone());
    journal
        .save(path)
        .with_context(|| format!("Cannot write journal {}", path.display()))?;
    log::info!(
        "Journal with {} rollback record(s) written to {}",
        result.rollback_records.len(),
        path.display()
    );
    Ok(())
}

fn outcome(interrupted: bool, has_errors: bool) -> ExitCode {
    if interrupted {
        ExitCode::Interrupted
    } else if has_errors {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    }
}
