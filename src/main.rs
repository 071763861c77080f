//! CLI entry point for archcheck.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing::debug;

use archcheck::config::CheckConfig;
use archcheck::formatters::format_check_output;
use archcheck::operations::run_check;
use archcheck::project::GoModule;
use archcheck::report::{CheckPayload, DEFAULT_MAX_WARNINGS};

#[derive(Parser)]
#[command(name = "archcheck")]
#[command(version)]
#[command(about = "Check Go imports against declared architecture boundaries", long_about = None)]
struct Cli {
    /// Log orchestration details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the project against its arch file
    Check {
        /// Project root containing go.mod
        #[arg(long, default_value = ".")]
        project_path: PathBuf,
        /// Arch file to use instead of <project-path>/.archcheck.yml
        #[arg(long)]
        arch_file: Option<PathBuf>,
        /// Maximum number of warnings to report
        #[arg(long, default_value_t = DEFAULT_MAX_WARNINGS as u32,
              value_parser = clap::value_parser!(u32).range(1..=32768))]
        max_warnings: u32,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        /// Number of worker threads for checking files
        #[arg(long, short, default_value_t = 1,
              value_parser = clap::value_parser!(u32).range(1..))]
        jobs: u32,
    },
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check {
            project_path,
            arch_file,
            max_warnings,
            json,
            jobs,
        } => cmd_check(project_path, arch_file, max_warnings, json, jobs),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose {
        "archcheck=debug"
    } else {
        "archcheck=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

fn cmd_check(
    project_path: PathBuf,
    arch_file: Option<PathBuf>,
    max_warnings: u32,
    json: bool,
    jobs: u32,
) -> Result<()> {
    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    let config = CheckConfig::resolve(
        &project_path,
        arch_file.as_deref(),
        max_warnings as usize,
        jobs as usize,
        &GoModule,
    );

    let (payload, config) = match config {
        Ok(config) => (run_check(&config), Some(config)),
        Err(e) => {
            debug!("failed to resolve project: {}", e);
            (CheckPayload::from_error(e), None)
        }
    };

    if json {
        let out = serde_json::to_string_pretty(&payload).context("Failed to encode result")?;
        println!("{}", out);
    } else {
        println!("{}", format_check_output(&payload, config.as_ref()));
    }

    if !payload.is_ok() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "archcheck", &mut io::stdout());
    Ok(())
}
