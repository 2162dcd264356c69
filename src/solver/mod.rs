//! Backtracking search over board states.
//!
//! The solver walks the move tree depth first, always trying a board's
//! highest-ranked pending move next and backing up when a board runs out of
//! moves. Layouts already seen since the last restart are skipped. Each time
//! the game is won the solver remembers the shortest solution so far and, unless
//! its stopping policy is met, restarts from the initial deal to look for a
//! shorter one.

mod config;

pub use config::{DEFAULT_MAX_SOLUTIONS, DEFAULT_MAX_STATES, SolveConfig};

use crate::action::Move;
use crate::board::Board;
use crate::error::MoveError;

use rand::{SeedableRng, rngs::StdRng};
use rustc_hash::FxHashSet;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    Searching,
    /// A solution satisfying the stopping policy was found.
    Won,
    /// Every reachable layout was explored.
    Exhausted,
    /// The state or time budget ran out before the search finished.
    BudgetExhausted,
}

#[derive(Debug, Clone)]
pub struct SolveResult {
    pub status: SolveStatus,
    /// Shortest solution found, if any.
    pub solution: Option<Vec<Move>>,
    pub solutions_found: usize,
    /// Moves applied during the search.
    pub states: u64,
    /// Moves whose resulting layout had already been visited.
    pub skipped: u64,
    pub elapsed: Duration,
}

impl SolveResult {
    pub fn is_solved(&self) -> bool {
        self.solution.is_some()
    }
}

pub fn solve(board: Board, config: SolveConfig) -> Result<SolveResult, MoveError> {
    Solver::new(board, config).run()
}

#[derive(Debug)]
pub struct Solver {
    config: SolveConfig,
    rng: StdRng,
    initial_board: Board,
    current: Board,
    stack: Vec<Board>,
    visited: FxHashSet<String>,
    best: Option<Vec<Move>>,
    solutions_found: usize,
    states: u64,
    skipped: u64,
    status: SolveStatus,
}

impl Solver {
    pub fn new(board: Board, config: SolveConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut solver = Self {
            config,
            rng,
            current: Board::default(),
            initial_board: board,
            stack: vec![],
            visited: FxHashSet::default(),
            best: None,
            solutions_found: 0,
            states: 0,
            skipped: 0,
            status: SolveStatus::Searching,
        };

        if solver.initial_board.is_won() {
            solver.solutions_found = 1;
            solver.best = Some(vec![]);
            solver.status = SolveStatus::Won;
        }
        solver.restart();
        solver
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn current(&self) -> &Board {
        &self.current
    }

    /// Number of ancestors between the initial deal and the current board.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn best_solution(&self) -> Option<&[Move]> {
        self.best.as_deref()
    }

    pub fn solutions_found(&self) -> usize {
        self.solutions_found
    }

    pub fn states(&self) -> u64 {
        self.states
    }

    /// Runs the search until it is won, exhausted or out of budget.
    pub fn run(mut self) -> Result<SolveResult, MoveError> {
        let timer = Instant::now();
        info!(
            event = "solve_start",
            seed = ?self.config.seed,
            target_length = ?self.config.target_length,
            max_solutions = ?self.config.max_solutions
        );

        while self.status == SolveStatus::Searching {
            if self.budget_exhausted(timer.elapsed()) {
                debug!(states = self.states, "exploration budget exhausted");
                self.status = SolveStatus::BudgetExhausted;
                break;
            }
            self.step()?;
        }

        let elapsed = timer.elapsed();
        info!(
            event = "solve_end",
            status = ?self.status,
            solution_length = ?self.best.as_ref().map(Vec::len),
            solutions_found = self.solutions_found,
            states = self.states,
            skipped = self.skipped
        );

        Ok(SolveResult {
            status: self.status,
            solution: self.best,
            solutions_found: self.solutions_found,
            states: self.states,
            skipped: self.skipped,
            elapsed,
        })
    }

    fn budget_exhausted(&self, elapsed: Duration) -> bool {
        self.config.max_states.is_some_and(|max| self.states >= max)
            || self.config.time_limit().is_some_and(|limit| elapsed >= limit)
    }

    /// Applies one move: backtracks until some board on the path still has a
    /// pending move, plays it, and either records a win or advances onto the
    /// new layout if it has not been seen yet.
    pub fn step(&mut self) -> Result<SolveStatus, MoveError> {
        if self.status != SolveStatus::Searching {
            return Ok(self.status);
        }

        let mov = loop {
            if let Some(mov) = self.current.next_move() {
                break mov;
            }
            match self.stack.pop() {
                Some(parent) => self.current = parent,
                None => {
                    debug!(states = self.states, "search tree exhausted");
                    self.status = SolveStatus::Exhausted;
                    return Ok(self.status);
                }
            }
        };

        let mut board = self.current.apply_move(mov)?;
        self.states += 1;

        if board.is_won() {
            self.record_win(&board);
            return Ok(self.status);
        }

        if self.visited.insert(board.signature()) {
            board.compute_pending_moves(&mut self.rng);
            let parent = std::mem::replace(&mut self.current, board);
            self.stack.push(parent);
        } else {
            self.skipped += 1;
        }
        Ok(self.status)
    }

    fn record_win(&mut self, board: &Board) {
        let moves = board.history();
        self.solutions_found += 1;

        if self.best.as_ref().is_none_or(|best| moves.len() < best.len()) {
            info!(
                length = moves.len(),
                previous = ?self.best.as_ref().map(Vec::len),
                states = self.states,
                "found a shorter solution"
            );
            self.best = Some(moves.to_vec());
        }

        let best_len = self.best.as_ref().map_or(moves.len(), Vec::len);
        if self.config.is_satisfied(best_len, self.solutions_found) {
            self.status = SolveStatus::Won;
        } else {
            debug!(
                solutions_found = self.solutions_found,
                "restarting from the initial deal"
            );
            self.restart();
        }
    }

    fn restart(&mut self) {
        self.stack.clear();
        self.visited.clear();
        let mut board = self.initial_board.clone();
        board.compute_pending_moves(&mut self.rng);
        self.visited.insert(board.signature());
        self.current = board;
    }
}
