//! jobrisk entrypoint: runs one pipeline stage (or all of them) from an explicit config file.
//! Logs go to stderr; each stage prints one JSON summary line to stdout.

use clap::{Parser, Subcommand};
use jobrisk::{
    config::PipelineConfig,
    ingest::write_executions,
    logging::{StageSummary, StructuredLogger},
    pipeline::Pipeline,
    synthetic::{self, SyntheticConfig},
    Error,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "jobrisk", version, about = "Anomaly scoring and risk reports for job executions")]
struct Cli {
    /// Pipeline configuration (JSON); defaults apply when the file is absent
    #[arg(long, env = "JOBRISK_CONFIG", default_value = "jobrisk.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Execution feed → feature file
    Features,
    /// Feature file → scaler and model artifacts
    Train,
    /// Feature file + artifacts → score file
    Score,
    /// Execution feed + score file → risk report
    Report,
    /// All stages in order
    Run,
    /// Write a seeded synthetic execution feed
    Simulate {
        #[arg(long, default_value_t = 90)]
        days: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Output path (defaults to the configured execution feed)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Features => "features",
            Command::Train => "train",
            Command::Score => "score",
            Command::Report => "report",
            Command::Run => "run",
            Command::Simulate { .. } => "simulate",
        }
    }
}

fn run_stage<'a>(pipeline: &Pipeline, command: &'a Command) -> Result<StageSummary<'a>, Error> {
    let paths = &pipeline.config().paths;
    let mut summary = StageSummary::ok(command.name());
    match command {
        Command::Features => {
            let table = pipeline.build_features()?;
            summary.rows = Some(table.len());
            summary.out = Some(paths.features.display().to_string());
        }
        Command::Train => {
            let run = pipeline.train()?;
            summary.rows = Some(run.rows);
            summary.columns = Some(run.trained.scaler.columns.len());
            summary.out = Some(paths.model_dir.display().to_string());
        }
        Command::Score => {
            let scores = pipeline.score()?;
            summary.rows = Some(scores.len());
            summary.out = Some(paths.scores.display().to_string());
        }
        Command::Report | Command::Run => {
            let report = if matches!(command, Command::Run) {
                pipeline.run()?
            } else {
                pipeline.report()?
            };
            summary = summary.with_report(&report);
            summary.out = Some(paths.report.display().to_string());
        }
        Command::Simulate { days, seed, out } => {
            let records = synthetic::generate(&SyntheticConfig {
                days: *days,
                seed: *seed,
                ..SyntheticConfig::default()
            });
            let path = out.clone().unwrap_or_else(|| paths.executions.clone());
            write_executions(&path, &records)?;
            summary.rows = Some(records.len());
            summary.out = Some(path.display().to_string());
        }
    }
    Ok(summary)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match PipelineConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            StructuredLogger::init(true, "info");
            error!(config = %cli.config.display(), error = %e, "config load failed");
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    StructuredLogger::init(config.log.json, &config.log.level);
    info!(stage = cli.command.name(), config = %cli.config.display(), "jobrisk starting");

    let pipeline = Pipeline::new(config);
    let mut stdout = std::io::stdout();
    match run_stage(&pipeline, &cli.command) {
        Ok(summary) => {
            StructuredLogger::emit_json(&summary, &mut stdout);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(stage = cli.command.name(), kind = ?e.kind(), error = %e, "stage failed");
            StructuredLogger::emit_json(&StageSummary::failed(cli.command.name(), &e), &mut stdout);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
