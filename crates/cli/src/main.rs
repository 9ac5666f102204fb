// clasif CLI - reconcile budget report codes against the classification workbook

mod exit_codes;
mod logging;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use clasif_recon::OutputFormat;

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};
use logging::{init_logging, LogConfig, LogFormat};
use run::{cmd_run, cmd_validate, RunOptions};

#[derive(Parser)]
#[command(name = "clasif")]
#[command(about = "Report budget codes missing from the classification workbook")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Adjust log verbosity (-v for debug, -q for warnings only).
    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile every report in the input folder
    #[command(after_help = "\
Examples:
  clasif run
  clasif run --input-dir ./files --reference clasificatie.xlsx
  clasif run -o missing.csv
  clasif run --config clasif.toml --strict --fail-on-missing
  clasif run --json -o missing.json")]
    Run {
        /// TOML config file (defaults to ./clasif.toml when present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Folder holding the entity report workbooks
        #[arg(long, env = "CLASIF_INPUT_DIR")]
        input_dir: Option<PathBuf>,

        /// Reference classification workbook
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Output file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output format (inferred from the output extension when omitted)
        #[arg(long, short = 'f')]
        format: Option<FormatArg>,

        /// Abort on the first unreadable report instead of skipping it
        #[arg(long)]
        strict: bool,

        /// Exit with code 6 when any missing code is found
        #[arg(long)]
        fail_on_missing: bool,

        /// Print the full run result as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Build the classification dictionary and report per-category counts
    #[command(after_help = "\
Examples:
  clasif validate
  clasif validate --reference clasificatie.xlsx --json")]
    Validate {
        /// TOML config file (defaults to ./clasif.toml when present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Reference classification workbook
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Print counts as JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Xlsx,
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xlsx => OutputFormat::Xlsx,
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  clasif-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&LogConfig {
        level: cli.verbosity.tracing_level_filter(),
        format: cli.log_format,
        use_env_filter: !cli.verbosity.is_present(),
        ..LogConfig::default()
    });

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: clasif <command> [options]");
            eprintln!("       clasif --help for more information");
            Err(CliError { code: EXIT_USAGE, message: String::new(), hint: None })
        }
        Some(Commands::Run {
            config,
            input_dir,
            reference,
            output,
            format,
            strict,
            fail_on_missing,
            json,
        }) => cmd_run(RunOptions {
            config,
            input_dir,
            reference,
            output,
            format: format.map(OutputFormat::from),
            strict,
            fail_on_missing,
            json,
        }),
        Some(Commands::Validate { config, reference, json }) => cmd_validate(config, reference, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
