use anyhow::{Context, Result, bail};
use bakers_game::{
    action::{Move, format_moves, moves_to_json},
    board::Board,
    solver::{SolveConfig, SolveResult, SolveStatus, solve},
};
use clap::Parser;
use std::io::{IsTerminal, Write, stderr};
use std::path::{Path, PathBuf};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Deal file to solve
    file: PathBuf,
    /// Stop once a solution of at most this many moves is found
    #[arg(short, long, value_name = "NUM")]
    target_length: Option<usize>,
    /// Stop after this many solutions have been found
    #[arg(short, long, value_name = "NUM", conflicts_with = "fast")]
    max_solutions: Option<usize>,
    /// Stop at the first solution
    #[arg(long)]
    fast: bool,
    /// Seed for tie-breaking between equally ranked moves
    #[arg(short, long)]
    seed: Option<u64>,
    /// Max moves to apply before giving up
    #[arg(long, value_name = "NUM")]
    max_states: Option<u64>,
    /// Max seconds to search before giving up
    #[arg(long, value_name = "SECS")]
    time_limit: Option<u64>,
    /// JSON file with solver settings, overridden by the flags above
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Write the solution to <DIR>/<deal>-solution-<length> instead of stdout
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,
    /// Render the solution as JSON
    #[arg(long)]
    json: bool,
    /// Print the deal before solving
    #[arg(short, long)]
    preview: bool,
}

impl Cli {
    fn solve_config(&self) -> Result<SolveConfig> {
        let mut config = match &self.config {
            Some(path) => SolveConfig::load(path)
                .with_context(|| format!("Failed to load config '{}'", path.display()))?,
            None => SolveConfig::default(),
        };
        if let Some(target_length) = self.target_length {
            config = config.with_target_length(target_length);
        }
        if let Some(max_solutions) = self.max_solutions {
            config = config.with_max_solutions(max_solutions);
        }
        if self.fast {
            config = config.with_max_solutions(1);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(max_states) = self.max_states {
            config = config.with_max_states(max_states);
        }
        if let Some(secs) = self.time_limit {
            config = config.with_time_limit(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let board = Board::load(&cli.file).context("Failed to load the deal")?;
    let config = cli.solve_config()?;

    if cli.preview {
        println!("===== STATE =====\n{}\n", board.pretty_print());
    }

    let moves = do_solve(board, config)?;
    let rendered = if cli.json {
        let mut json = moves_to_json(&moves)?;
        json.push('\n');
        json
    } else {
        format_moves(&moves)
    };

    match &cli.output {
        Some(dir) => {
            let path = solution_path(dir, &cli.file, moves.len());
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create '{}'", dir.display()))?;
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            eprintln!("Solution written to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(stderr)
        .init();
}

fn do_solve(board: Board, config: SolveConfig) -> Result<Vec<Move>> {
    let SolveResult {
        status,
        solution,
        solutions_found,
        states,
        skipped,
        elapsed,
    } = with_spinner("Solving the game...", move || solve(board, config))?;
    let elapsed = format_elapsed(elapsed);

    let Some(moves) = solution else {
        match status {
            SolveStatus::BudgetExhausted => bail!(
                "Gave up without a solution. Elapsed: {elapsed}, States: {states}"
            ),
            _ => bail!("The deal has no solution. Elapsed: {elapsed}, States: {states}"),
        }
    };

    let mark = if status == SolveStatus::Won { '✓' } else { '~' };
    eprintln!(
        "{mark} Solved the game. Steps: {}, Solutions: {solutions_found}, Elapsed: {elapsed}, States: {states}, Skipped: {skipped}",
        moves.len()
    );
    Ok(moves)
}

fn solution_path(dir: &Path, deal: &Path, length: usize) -> PathBuf {
    let name = deal
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_else(|| "deal".into());
    dir.join(format!("{name}-solution-{length}"))
}

fn with_spinner<T, F: FnOnce() -> T>(message: &str, f: F) -> T {
    if stderr().is_terminal() {
        let spinning = Arc::new(AtomicBool::new(true));
        let spinning_clone = Arc::clone(&spinning);
        let message = message.to_string();

        let handle = std::thread::spawn(move || {
            let spinner_chars = ['|', '/', '-', '\\'];
            let mut i = 0;
            let stderr = stderr();
            let mut handle = stderr.lock();

            let _ = write!(handle, "\x1b[?25l"); // hide cursor
            let _ = handle.flush();

            while spinning_clone.load(Ordering::Relaxed) {
                let spinner_char = spinner_chars[i % spinner_chars.len()];
                let _ = write!(handle, "\r{spinner_char} {message}");
                let _ = handle.flush();
                std::thread::sleep(Duration::from_millis(100));
                i += 1;
            }

            let _ = write!(handle, "\r\x1b[2K\r\x1b[?25h"); // clear line and show cursor
            let _ = handle.flush();
        });

        let result = f();
        spinning.store(false, Ordering::Relaxed);
        let _ = handle.join();
        result
    } else {
        f()
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 90 {
        let ms = elapsed.subsec_millis();
        format!("{secs}.{ms:03}s")
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
