//! `clasif run` and `clasif validate`: reconcile report codes against the
//! reference classification.

use std::path::{Path, PathBuf};

use clasif_io::{discover_reports, write_report, XlsxSource};
use clasif_recon::engine::RunResult;
use clasif_recon::model::DictionaryStat;
use clasif_recon::{build_dictionary, run_with_dictionary, Dictionary, OutputFormat, ReconConfig};
use tracing::{info, warn};

use crate::exit_codes::{report_exit_code, EXIT_ERROR, EXIT_MISSING, EXIT_REFERENCE, EXIT_WRITE};
use crate::CliError;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "clasif.toml";

/// Flag overrides applied on top of the config file.
#[derive(Debug, Default)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub input_dir: Option<PathBuf>,
    pub reference: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub strict: bool,
    pub fail_on_missing: bool,
    pub json: bool,
}

fn reference_err(msg: impl Into<String>) -> CliError {
    CliError { code: EXIT_REFERENCE, message: msg.into(), hint: None }
}

/// Load the explicit config, else `clasif.toml` in the working directory,
/// else the built-in template layout.
pub fn load_config(explicit: Option<&Path>) -> Result<ReconConfig, CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !candidate.is_file() {
                return Ok(ReconConfig::default());
            }
            candidate
        }
    };

    let text = std::fs::read_to_string(&path).map_err(|e| {
        CliError::args(format!("cannot read config {}: {e}", path.display()))
    })?;
    let mut config = ReconConfig::from_toml(&text)
        .map_err(|e| reference_err(format!("{}: {e}", path.display())))?;

    // Resolve file paths relative to config file's directory
    if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        config.rebase(base);
    }
    info!(config = %path.display(), "loaded config");
    Ok(config)
}

fn load_dictionary(config: &ReconConfig) -> Result<Dictionary, CliError> {
    build_dictionary(&XlsxSource, &config.reference).map_err(|e| {
        reference_err(e.to_string()).with_hint("the reference workbook must follow the classification template")
    })
}

pub fn cmd_run(opts: RunOptions) -> Result<(), CliError> {
    let mut config = load_config(opts.config.as_deref())?;
    if let Some(dir) = opts.input_dir {
        config.input.dir = dir;
    }
    if let Some(reference) = opts.reference {
        config.reference.workbook = reference;
    }
    if let Some(output) = opts.output {
        config.output.path = output;
    }
    if opts.format.is_some() {
        config.output.format = opts.format;
    }
    config.strict |= opts.strict;

    if !config.input.dir.is_dir() {
        return Err(CliError::args(format!("input folder not found: {}", config.input.dir.display()))
            .with_hint("create ./files with the report workbooks, or pass --input-dir"));
    }
    let files = discover_reports(&config.input.dir).map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
    if files.is_empty() {
        warn!(dir = %config.input.dir.display(), "no report files found");
    }

    let dictionary = load_dictionary(&config)?;
    let result = run_with_dictionary(&dictionary, &config, &XlsxSource, &files).map_err(|e| {
        let err = CliError { code: report_exit_code(&e), message: e.to_string(), hint: None };
        if e.is_per_file() {
            err.with_hint("drop --strict to skip unreadable reports")
        } else {
            err
        }
    })?;

    let format = config.output.resolved_format();
    write_report(&result.records, &config.output.path, format)
        .map_err(|e| CliError { code: EXIT_WRITE, message: e.to_string(), hint: None })?;
    eprintln!("wrote {} ({format})", config.output.path.display());

    if opts.json {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError { code: EXIT_ERROR, message: format!("JSON serialization error: {e}"), hint: None })?;
        println!("{json_str}");
    }

    print_summary(&result);

    if opts.fail_on_missing && !result.records.is_empty() {
        return Err(CliError {
            code: EXIT_MISSING,
            message: format!("{} missing code(s) found", result.records.len()),
            hint: None,
        });
    }
    Ok(())
}

// Human summary to stderr
fn print_summary(result: &RunResult) {
    let s = &result.summary;
    eprintln!(
        "{} file(s): {} processed, {} skipped, {} missing code(s) across {} entit{}, {} warning(s)",
        s.files_total,
        s.files_processed,
        s.files_skipped,
        s.missing_codes,
        s.entities,
        if s.entities == 1 { "y" } else { "ies" },
        s.warnings,
    );
    for skipped in &result.skipped {
        eprintln!("  skipped {}: {}", skipped.file, skipped.error);
    }
}

pub fn cmd_validate(config: Option<PathBuf>, reference: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let mut config = load_config(config.as_deref())?;
    if let Some(reference) = reference {
        config.reference.workbook = reference;
    }

    let dictionary = load_dictionary(&config)?;
    let stats = dictionary.stats();

    if json {
        let json_str = serde_json::to_string_pretty(&stats)
            .map_err(|e| CliError { code: EXIT_ERROR, message: format!("JSON serialization error: {e}"), hint: None })?;
        println!("{json_str}");
    } else {
        for stat in &stats {
            eprintln!("  {:<16} {:<10} {:>6} code(s)", stat.indicator_type, stat.code_type, stat.codes);
        }
    }

    let empty: Vec<&DictionaryStat> = stats.iter().filter(|s| s.codes == 0).collect();
    if let Some(first) = empty.first() {
        return Err(reference_err(format!(
            "{} reference pair(s) have no codes (first: {} / {})",
            empty.len(),
            first.indicator_type,
            first.code_type
        )));
    }

    eprintln!(
        "valid: {} with {} sheet(s), {} code(s)",
        config.reference.workbook.display(),
        config.reference.sheets.len(),
        stats.iter().map(|s| s.codes).sum::<usize>(),
    );
    Ok(())
}
