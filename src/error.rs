use crate::action::Move;
use crate::card::{Card, Suit};

use std::path::PathBuf;
use thiserror::Error;

/// The deal document could not be turned into a playable board.
#[derive(Debug, Error)]
pub enum DealError {
    #[error("Failed to read deal file '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed deal document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid card token '{0}'")]
    InvalidCard(String),

    #[error("Reserve holds {0} cards, at most 4 are allowed")]
    ReserveOverflow(usize),

    #[error("Foundation pile for {suit:?} is out of order at card {card}")]
    FoundationOutOfOrder { suit: Suit, card: Card },

    #[error("Card {0} appears more than once")]
    DuplicateCard(Card),

    #[error("Deal is missing {0} cards")]
    MissingCards(usize),
}

/// A move that the board refused to apply. Only a defect in move generation
/// can produce one of these.
#[derive(Debug, Error)]
pub enum MoveError {
    #[error("Moved card is not at its source: {mov} (board {signature})")]
    CardNotAtSource { mov: Move, signature: String },

    #[error("Moved card cannot be placed at its target: {mov} (board {signature})")]
    IllegalTarget { mov: Move, signature: String },
}
