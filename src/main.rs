//! `ihtp-solve` — CLI entry point wiring the instance loader, the tabu
//! search engine, and the solution/action-log writers (`spec.md` §6,
//! "Driver CLI surface").

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;
use thiserror::Error;

use ihtp_solver::actionlog::ActionLog;
use ihtp_solver::instance::{self, InstanceModel};
use ihtp_solver::penalty::PenaltyEvaluator;
use ihtp_solver::search::TabuDriver;
use ihtp_solver::solution;
use ihtp_solver::state::EngineState;

/// Solve an Integrated Healthcare Timetabling Problem instance via tabu
/// search.
#[derive(Debug, Parser)]
#[command(name = "ihtp-solve", about, long_about = None)]
struct Cli {
    /// Path to the instance JSON file.
    instance: PathBuf,

    /// Maximum number of tabu-search iterations.
    #[arg(long, default_value_t = 1000)]
    max_iter: u32,

    /// Capacity of the FIFO tabu memory.
    #[arg(long, default_value_t = 100)]
    tabu_size: usize,

    /// Aspiration threshold multiplier applied to the incumbent penalty.
    #[arg(long, default_value_t = 1.0)]
    factor: f64,

    /// Where to write the solution JSON. Printed to stdout if omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Where to write the CSV action log. Not written if omitted.
    #[arg(long)]
    log: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("reading instance file {path}: {source}")]
    ReadInstance { path: PathBuf, source: std::io::Error },

    #[error("loading instance: {0}")]
    Instance(#[from] instance::InstanceError),

    #[error("opening action log {path}: {source}")]
    OpenActionLog { path: PathBuf, source: std::io::Error },

    #[error("writing action log: {0}")]
    ActionLog(#[from] ihtp_solver::actionlog::ActionLogError),

    #[error("rendering solution JSON: {0}")]
    Solution(#[from] serde_json::Error),

    #[error("writing solution to {path}: {source}")]
    WriteSolution { path: PathBuf, source: std::io::Error },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ihtp-solve: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&cli.instance).map_err(|source| CliError::ReadInstance {
        path: cli.instance.clone(),
        source,
    })?;
    let (model, indexer) = instance::load_from_str(&text)?;

    let mut engine = EngineState::new(&model, &indexer);
    let driver = TabuDriver::new(cli.tabu_size, cli.factor, cli.max_iter);

    let mut action_log = cli
        .log
        .as_ref()
        .map(|path| open_action_log(path))
        .transpose()?;

    let report = driver.run(&model, &mut engine, |index, penalty, mv| {
        if let Some(log) = action_log.as_mut() {
            if let Err(err) = log.record(index, penalty, mv) {
                log::warn!("failed to write action log row: {err}");
            }
        }
    });

    if let Some(log) = action_log.as_mut() {
        log.flush()?;
    }

    info!(
        "run finished: {} iterations, final penalty {}",
        report.iterations, report.final_penalty
    );
    report_mandatory_infeasibility(&model, &engine);

    emit_solution(&model, &indexer, &engine, cli.out.as_deref())
}

fn open_action_log(path: &std::path::Path) -> Result<ActionLog<BufWriter<File>>, CliError> {
    let file = File::create(path).map_err(|source| CliError::OpenActionLog {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ActionLog::new(BufWriter::new(file))?)
}

/// §7: a mandatory patient left unscheduled does not raise; it is only
/// reported via the `unscheduled_optional` log framing plus this warning.
fn report_mandatory_infeasibility(model: &InstanceModel, engine: &EngineState) {
    let unscheduled_mandatory = model.patients.iter().enumerate().filter(|(i, p)| {
        p.mandatory && !engine.pas.is_scheduled(model.occupant_count() + i)
    });
    for (_, patient) in unscheduled_mandatory {
        log::warn!(
            "mandatory patient {} could not be scheduled: result is infeasible",
            patient.id
        );
    }
    let (_, breakdown) = PenaltyEvaluator::new().evaluate(model, engine);
    log::debug!("final penalty breakdown: {breakdown:?}");
}

fn emit_solution(
    model: &InstanceModel,
    indexer: &ihtp_solver::instance::Indexer,
    engine: &EngineState,
    out: Option<&std::path::Path>,
) -> Result<(), CliError> {
    let json = solution::to_json_string(model, indexer, engine)?;
    match out {
        Some(path) => std::fs::write(path, json).map_err(|source| CliError::WriteSolution {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}
