//! Heuristic backtracking solver for Baker's Game solitaire.

pub mod action;
pub mod board;
pub mod card;
pub mod error;
pub mod heuristics;
pub mod solver;

#[cfg(test)]
mod test_utils;
