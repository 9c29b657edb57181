//! single-regulon command-line entry point

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use single_regulon::config::{AnalysisConfig, DEFAULT_CONFIG};
use single_regulon::logging::{LogConfig, LogFormat, LogLevel, init_logging};
use single_regulon::pipeline::run_pipeline;

#[derive(Debug, Parser)]
#[command(
    name = "single-regulon",
    version,
    about = "Transcription factor regulon enrichment for reference gene sets"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run every configured enrichment analysis and write the reports
    Run {
        /// Analysis configuration (TOML)
        #[arg(short, long, env = "SINGLE_REGULON_CONFIG")]
        config: PathBuf,

        /// Override the output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Override the FDR threshold for significance and edge export
        #[arg(long)]
        fdr_threshold: Option<f64>,

        /// Override the number of TFs drawn per chart
        #[arg(long)]
        top_n: Option<usize>,

        /// Debug-level logging
        #[arg(short, long)]
        verbose: bool,

        #[arg(long, value_enum, default_value_t = LogFormat::Text, env = "SINGLE_REGULON_LOG_FORMAT")]
        log_format: LogFormat,
    },
    /// Print the default configuration
    DefaultConfig,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = execute(cli) {
        eprintln!("{}", failure_message(&e));
        process::exit(1);
    }
}

/// Single-line report of a failed command with its full context chain.
fn failure_message(err: &anyhow::Error) -> String {
    format!("Error: {err:#}")
}

fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::DefaultConfig => {
            print!("{DEFAULT_CONFIG}");
            Ok(())
        }
        Command::Run {
            config,
            output_dir,
            fdr_threshold,
            top_n,
            verbose,
            log_format,
        } => {
            let level = if verbose { LogLevel::Debug } else { LogLevel::Info };
            init_logging(&LogConfig {
                level,
                format: log_format,
            })?;

            let mut analysis = AnalysisConfig::from_file(&config)
                .with_context(|| format!("Failed to load config {}", config.display()))?;
            if let Some(dir) = output_dir {
                analysis.output.dir = dir;
            }
            if let Some(threshold) = fdr_threshold {
                analysis.analysis.fdr_threshold = threshold;
            }
            if let Some(n) = top_n {
                analysis.analysis.top_n = n;
            }

            let report = run_pipeline(&analysis).context("Regulon enrichment failed")?;
            for set in &report.gene_sets {
                println!(
                    "{}: {} TFs tested, {} significant at FDR < {}",
                    set.result.gene_set,
                    set.result.top(usize::MAX).len(),
                    set.significant_tfs,
                    analysis.analysis.fdr_threshold
                );
            }
            Ok(())
        }
    }
}
