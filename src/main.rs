//! cot-eval - batch CoT generation and rubric evaluation for NTSB accident reports

use clap::{Parser, Subcommand};
use cot_eval::config::PipelineConfig;
use cot_eval::pipeline::evaluate::EvalMode;
use cot_eval::pipeline::{evaluate, generate, process, report, respond};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "cot-eval", version, about = "CoT generation and rubric evaluation of aviation accident reports")]
struct Cli {
    /// Pipeline configuration file
    #[arg(short, long, global = true, default_value = "config/pipeline.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate chains of thought from accident narratives
    Generate {
        /// Narrative dataset (JSON array)
        #[arg(short, long)]
        input: PathBuf,
        /// Results file
        #[arg(short, long)]
        output: PathBuf,
        /// Failure file (defaults to the results file with a `_fail` suffix)
        #[arg(long)]
        failures: Option<PathBuf>,
    },
    /// Generate candidate-model answers for each configured respondent
    Respond {
        /// Narrative dataset (JSON array)
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Split raw model responses on `<think>` tags
    Process {
        /// Raw response file
        #[arg(short, long)]
        input: PathBuf,
        /// Processed output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Score generated records against the ground-truth narratives
    Evaluate {
        /// Rubric set and key shape
        #[arg(short, long, value_enum)]
        mode: EvalMode,
        /// Generated records to score
        #[arg(short, long)]
        generated: PathBuf,
        /// Ground-truth narrative dataset
        #[arg(short = 't', long)]
        ground_truth: PathBuf,
        /// Score results file
        #[arg(short, long)]
        output: PathBuf,
        /// Failure file (defaults to the results file with a `_fail` suffix)
        #[arg(long)]
        failures: Option<PathBuf>,
    },
    /// Print per-metric averages for every score file in a directory
    Report {
        /// Directory of score files
        #[arg(short, long)]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> cot_eval::Result<()> {
    match cli.command {
        Command::Generate {
            input,
            output,
            failures,
        } => {
            let config = PipelineConfig::load(&cli.config)?;
            let failures = failures.unwrap_or_else(|| respond::failure_path(&output));
            let summary = generate::run(&config, &input, &output, &failures).await?;
            info!(
                total = summary.total,
                succeeded = summary.succeeded,
                failed = summary.failed,
                "generation finished"
            );
        }
        Command::Respond { input } => {
            let config = PipelineConfig::load(&cli.config)?;
            for summary in respond::run(&config, &input).await? {
                info!(
                    total = summary.total,
                    succeeded = summary.succeeded,
                    failed = summary.failed,
                    "respondent finished"
                );
            }
        }
        Command::Process { input, output } => {
            process::run(&input, &output).await?;
        }
        Command::Evaluate {
            mode,
            generated,
            ground_truth,
            output,
            failures,
        } => {
            let config = PipelineConfig::load(&cli.config)?;
            let failures = failures.unwrap_or_else(|| respond::failure_path(&output));
            let summary = evaluate::run(
                &config,
                mode,
                &generated,
                &ground_truth,
                &output,
                &failures,
            )
            .await?;
            info!(
                total = summary.total,
                succeeded = summary.succeeded,
                failed = summary.failed,
                "evaluation finished"
            );
        }
        Command::Report { dir } => {
            report::run(&dir).await?;
        }
    }
    Ok(())
}
