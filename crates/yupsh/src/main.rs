mod logging;
mod stage;

use std::io;

use clap::{crate_version, Parser};
use yupsh_core::{status, ExecutionContext};

use stage::{parse_pipeline, StageError};

/// Command line options for the application's CLI.
#[derive(Parser)]
#[command(
    about = "Runs cat, sort and shuf as a streaming pipeline.",
    version = crate_version!()
)]
struct Opts {
    /// Seed for every random source in the run
    #[arg(long, env = "YUPSH_SEED")]
    seed: Option<u64>,

    /// Log level, used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Pipeline stages separated by "::", such as: sort -n :: cat -n
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pipeline: Vec<String>,
}

/// Entrypoint for the application.
pub fn main() {
    let opts = Opts::parse();
    logging::init(&opts.log_level);
    std::process::exit(run(opts));
}

/// Runs the pipeline on the process streams and returns an exit code.
fn run(opts: Opts) -> i32 {
    let pipeline = match parse_pipeline(&opts.pipeline) {
        Ok(pipeline) => pipeline,
        Err(error) => return exit_with_stage_error(error),
    };

    let mut context = ExecutionContext::new();
    if let Some(seed) = opts.seed {
        context = context.with_seed(seed);
    }

    let result = pipeline.execute(
        &context,
        Box::new(io::stdin()),
        Box::new(io::stdout()),
        Box::new(io::stderr()),
    );

    match result {
        Ok(()) => status::SUCCESS,
        Err(error) => {
            // Non-fatal errors have already been reported by the failing stage.
            if error.is_fatal() && !error.is_cancelled() {
                eprintln!("yupsh: {error}");
            }
            error.exit_code()
        }
    }
}

/// Prints a stage parse error and returns an exit code.
///
/// Clap returns help messages as errors, so requesting help for a stage is
/// not considered an error.
fn exit_with_stage_error(error: StageError) -> i32 {
    match error {
        StageError::Arguments(error) if !error.use_stderr() => {
            print!("{error}");
            status::SUCCESS
        }
        StageError::Arguments(error) => {
            eprint!("{error}");
            status::USAGE_ERROR
        }
        error => {
            eprintln!("yupsh: {error}");
            status::USAGE_ERROR
        }
    }
}
