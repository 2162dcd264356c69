use crate::action::{Move, Position};
use crate::card::{Card, MAX_CARD, MAX_RANK, MAX_SUIT, Suit};
use crate::error::{DealError, MoveError};
use crate::heuristics;

use rand::{Rng, seq::SliceRandom};
use serde::Deserialize;
use smallvec::SmallVec;
use std::{cmp::Reverse, collections::BTreeMap, path::Path};

pub const TOTAL_FOUNDATIONS: usize = MAX_SUIT as usize;
pub const TOTAL_TABLEAUS: usize = 8;
pub const RESERVE_SIZE: usize = 4;

const TABLEAU_SIZE: usize = 20;

pub type Foundation = SmallVec<[Card; MAX_RANK as usize]>;
pub type Tableau = SmallVec<[Card; TABLEAU_SIZE]>;
pub type Reserve = SmallVec<[Card; RESERVE_SIZE]>;
pub type PendingMoves = SmallVec<[Move; 32]>;

#[derive(Debug, Deserialize)]
struct DealDocument {
    board: DealBoard,
}

#[derive(Debug, Deserialize)]
struct DealBoard {
    #[serde(default)]
    foundation: BTreeMap<Suit, Vec<Card>>,
    #[serde(default)]
    reserve: Vec<Card>,
    tableau: [Vec<Card>; TOTAL_TABLEAUS],
}

/// One snapshot of the layout plus the moves that led to it.
///
/// Every board owns its piles outright. Applying a move copies them into a
/// fresh child, so nothing a child does is ever visible through its parent.
#[derive(Debug, Clone, Default)]
pub struct Board {
    foundations: [Foundation; TOTAL_FOUNDATIONS],
    tableaus: [Tableau; TOTAL_TABLEAUS],
    reserve: Reserve,
    history: Vec<Move>,
    pending: PendingMoves,
}

impl Board {
    /// Builds a board from raw piles without checking that they form a deck.
    pub(crate) fn from_piles(
        foundations: [Foundation; TOTAL_FOUNDATIONS],
        reserve: Reserve,
        tableaus: [Tableau; TOTAL_TABLEAUS],
    ) -> Self {
        let mut board = Self {
            foundations,
            tableaus,
            reserve,
            ..Default::default()
        };
        board.reserve.sort();
        board
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DealError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DealError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, DealError> {
        let DealDocument { board: deal } = serde_json::from_str(content)?;

        if deal.reserve.len() > RESERVE_SIZE {
            return Err(DealError::ReserveOverflow(deal.reserve.len()));
        }

        let mut foundations: [Foundation; TOTAL_FOUNDATIONS] = Default::default();
        for (suit, cards) in deal.foundation {
            for (i, &card) in cards.iter().enumerate() {
                if card.suit() != suit || card.rank() as usize != i + 1 {
                    return Err(DealError::FoundationOutOfOrder { suit, card });
                }
            }
            foundations[suit.index()] = cards.into_iter().collect();
        }

        let tableaus = deal.tableau.map(|column| column.into_iter().collect());
        let board = Self::from_piles(foundations, deal.reserve.into_iter().collect(), tableaus);
        board.validate()?;
        Ok(board)
    }

    /// Checks that the piles hold each of the 52 cards exactly once.
    pub fn validate(&self) -> Result<(), DealError> {
        let mut seen = [false; MAX_CARD as usize];
        let mut count = 0;
        for &card in self.cards() {
            let id = card.id() as usize;
            if seen[id] {
                return Err(DealError::DuplicateCard(card));
            }
            seen[id] = true;
            count += 1;
        }
        match MAX_CARD as usize - count {
            0 => Ok(()),
            missing => Err(DealError::MissingCards(missing)),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.foundations
            .iter()
            .flatten()
            .chain(self.tableaus.iter().flatten())
            .chain(self.reserve.iter())
    }

    pub fn foundation(&self, suit: Suit) -> &[Card] {
        &self.foundations[suit.index()]
    }

    pub fn tableau(&self, idx: usize) -> &[Card] {
        &self.tableaus[idx]
    }

    pub fn tableaus(&self) -> &[Tableau; TOTAL_TABLEAUS] {
        &self.tableaus
    }

    pub fn reserve(&self) -> &[Card] {
        &self.reserve
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Remaining candidate moves, best first.
    pub fn pending_moves(&self) -> &[Move] {
        &self.pending
    }

    pub fn is_legal(&self, card: Card, target: Position) -> bool {
        match target {
            Position::Reserve => self.reserve.len() < RESERVE_SIZE,
            Position::Foundation => match self.foundations[card.suit().index()].last() {
                Some(top) => top.rank() + 1 == card.rank(),
                None => card.is_ace(),
            },
            Position::Tableau(idx) => match self.tableaus.get(idx as usize) {
                Some(column) => column.last().is_none_or(|top| top.is_followed_by(card)),
                None => false,
            },
        }
    }

    pub fn can_move_to_foundation(&self, card: Card) -> bool {
        self.is_legal(card, Position::Foundation)
    }

    pub fn is_won(&self) -> bool {
        self.reserve.is_empty() && self.tableaus.iter().all(|t| t.is_empty())
    }

    pub fn has_failed(&self) -> bool {
        self.pending.is_empty()
    }

    /// Takes the best remaining candidate off the pending list.
    pub fn next_move(&mut self) -> Option<Move> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }

    /// Derives the board that results from `mov`. The child starts with no
    /// pending moves; call [`Board::compute_pending_moves`] on it.
    pub fn apply_move(&self, mov: Move) -> Result<Board, MoveError> {
        let mut history = Vec::with_capacity(self.history.len() + 1);
        history.extend_from_slice(&self.history);
        history.push(mov);

        let mut board = Board {
            foundations: self.foundations.clone(),
            tableaus: self.tableaus.clone(),
            reserve: self.reserve.clone(),
            history,
            pending: PendingMoves::new(),
        };

        if !board.remove_card(mov.card, mov.from) {
            return Err(MoveError::CardNotAtSource {
                mov,
                signature: self.signature(),
            });
        }
        if !board.add_card(mov.card, mov.to) {
            return Err(MoveError::IllegalTarget {
                mov,
                signature: self.signature(),
            });
        }
        Ok(board)
    }

    fn remove_card(&mut self, card: Card, position: Position) -> bool {
        match position {
            Position::Reserve => match self.reserve.iter().position(|&c| c == card) {
                Some(idx) => {
                    self.reserve.remove(idx);
                    true
                }
                None => false,
            },
            Position::Tableau(idx) => match self.tableaus.get_mut(idx as usize) {
                Some(column) if column.last() == Some(&card) => {
                    column.pop();
                    true
                }
                _ => false,
            },
            Position::Foundation => false,
        }
    }

    fn add_card(&mut self, card: Card, position: Position) -> bool {
        if !self.is_legal(card, position) {
            return false;
        }
        match position {
            Position::Reserve => {
                self.reserve.push(card);
                self.reserve.sort();
            }
            Position::Foundation => self.foundations[card.suit().index()].push(card),
            Position::Tableau(idx) => self.tableaus[idx as usize].push(card),
        }
        true
    }

    /// Rebuilds the ranked list of candidate moves for this board.
    ///
    /// A card that can reach the foundation is always the only candidate,
    /// reserve cards before tableau cards. Otherwise every reserve-to-tableau,
    /// tableau-to-tableau and tableau-to-reserve move is weighted by the
    /// heuristics, shuffled, then stably sorted heaviest first.
    pub fn compute_pending_moves<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.pending.clear();

        let forced = self
            .reserve
            .iter()
            .copied()
            .find(|&card| self.can_move_to_foundation(card))
            .map(|card| Move::new(Position::Reserve, Position::Foundation, card))
            .or_else(|| {
                self.tableaus.iter().enumerate().find_map(|(idx, column)| {
                    let card = *column.last()?;
                    self.can_move_to_foundation(card)
                        .then(|| Move::new(Position::TABLEAU[idx], Position::Foundation, card))
                })
            });
        if let Some(mov) = forced {
            self.pending.push(mov);
            return;
        }

        let mut candidates = PendingMoves::new();

        for &card in &self.reserve {
            for target in Position::TABLEAU {
                if self.is_legal(card, target) {
                    candidates.push(Move::new(Position::Reserve, target, card));
                }
            }
        }

        for (idx, column) in self.tableaus.iter().enumerate() {
            let Some(&card) = column.last() else {
                continue;
            };
            let from = Position::TABLEAU[idx];
            for target in Position::TABLEAU {
                if target != from && self.is_legal(card, target) {
                    candidates.push(Move::new(from, target, card));
                }
            }
            if self.is_legal(card, Position::Reserve) {
                candidates.push(Move::new(from, Position::Reserve, card));
            }
        }

        for mov in candidates.iter_mut() {
            mov.weight = heuristics::evaluate(self, mov);
        }

        candidates.shuffle(rng);
        candidates.sort_by_key(|mov| Reverse(mov.weight));
        self.pending = candidates;
    }

    /// Canonical key of the layout. History and pending moves are excluded,
    /// so the same layout reached along different paths collides.
    pub fn signature(&self) -> String {
        let mut key = String::with_capacity(160);

        for pile in &self.foundations {
            if pile.is_empty() {
                key.push('B');
            }
            for card in pile {
                key.push_str(&card.to_string());
            }
        }
        key.push('|');

        for column in &self.tableaus {
            if column.is_empty() {
                key.push('B');
            }
            for card in column {
                key.push_str(&card.to_string());
            }
            key.push('|');
        }

        for card in &self.reserve {
            key.push_str(&card.to_string());
        }

        key
    }

    pub fn pretty_print(&self) -> String {
        let format_cards = |cards: &[Card]| -> String {
            cards
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        let mut lines = vec![];

        for suit in Suit::ALL {
            let pile = self.foundation(suit);
            if !pile.is_empty() {
                lines.push(format!("{suit:?}: {}", format_cards(pile)));
            }
        }

        if !self.reserve.is_empty() {
            lines.push(format!("Reserve: {}", format_cards(&self.reserve)));
        }

        for (i, column) in self.tableaus.iter().enumerate() {
            if !column.is_empty() {
                lines.push(format!("Tableau{}: {}", i + 1, format_cards(column)));
            }
        }

        lines.join("\n")
    }
}
