use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use deolang::{Fault, Grid, Input, Interpreter, LoadError, RunConfig, Snapshot};
use rayon::prelude::*;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deolang", about = "Run Deolang programs laid out on a character grid")]
struct Cli {
    /// Program files to run.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Fixed input consumed one character per `I`. Without it, `I` prompts
    /// for a line on stdin.
    #[arg(long)]
    input: Option<String>,

    /// Max instructions per program (0 for no limit).
    #[arg(long, default_value_t = 1 << 16)]
    step_limit: usize,

    /// Print the stack and side stack after each run.
    #[arg(long)]
    stack: bool,

    /// Print each program grid as loaded, blanks shown as spaces.
    #[arg(long)]
    dump_grid: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

/// The outcome of running one program file.
struct Report {
    grid: String,
    snapshot: Snapshot,
    result: Result<usize, Fault>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Read one line from stdin for the `I` opcode; `None` at end of input.
fn stdin_line() -> Option<String> {
    eprint!("Input: ");
    let _ = io::stderr().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

fn run_file(path: &Path, cli: &Cli, config: &RunConfig) -> Result<Report, LoadError> {
    let grid = Grid::load_path(path)?;
    let (width, height) = grid.dimensions();
    info!(path = %path.display(), width, height, "running program");

    let input = match &cli.input {
        Some(text) => Input::fixed(text),
        None => Input::interactive(stdin_line),
    };
    let text = grid.to_text();
    let mut interp = Interpreter::new(grid, input);
    let result = interp.run(config);
    Ok(Report {
        grid: text,
        snapshot: interp.snapshot(),
        result,
    })
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = RunConfig {
        step_limit: (cli.step_limit > 0).then_some(cli.step_limit),
    };

    // Prompting on one terminal from several threads would interleave, so
    // interactive runs go one file at a time.
    let reports: Vec<Result<Report, LoadError>> = if cli.input.is_none() && cli.files.len() > 1 {
        cli.files.iter().map(|p| run_file(p, &cli, &config)).collect()
    } else {
        cli.files.par_iter().map(|p| run_file(p, &cli, &config)).collect()
    };
    debug!(count = reports.len(), "all programs finished");

    let multiple = cli.files.len() > 1;
    let mut failed = false;
    for (path, report) in cli.files.iter().zip(reports) {
        if multiple {
            println!("==> {} <==", path.display());
        }
        let report = match report {
            Ok(report) => report,
            Err(e) => {
                eprintln!("{e}");
                failed = true;
                continue;
            }
        };
        if cli.dump_grid {
            print!("{}", report.grid);
        }
        println!("{}", report.snapshot.output);
        if cli.stack {
            print!("{}", report.snapshot);
        }
        if let Err(fault) = report.result {
            eprintln!("{}: {fault}", path.display());
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
}
