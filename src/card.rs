use crate::error::DealError;

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_RANK: u8 = 13;
pub const MAX_SUIT: u8 = 4;
pub const MAX_CARD: u8 = MAX_SUIT * MAX_RANK;

pub const ACE: u8 = 1;
pub const KING: u8 = MAX_RANK;

const RANKS: [&str; MAX_RANK as usize] = [
    "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Clubs,
    Hearts,
    Diamonds,
}

impl Suit {
    pub const ALL: [Suit; MAX_SUIT as usize] =
        [Suit::Spades, Suit::Clubs, Suit::Hearts, Suit::Diamonds];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn short_form(self) -> char {
        match self {
            Suit::Spades => 'S',
            Suit::Clubs => 'C',
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
        }
    }

    fn from_short_form(c: char) -> Option<Self> {
        Suit::ALL.into_iter().find(|s| s.short_form() == c)
    }
}

/// A playing card packed into one byte: `suit * 13 + (rank - 1)`.
///
/// The derived ordering on the packed id sorts by suit first, then by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card(u8);

impl Card {
    /// Returns `None` unless `rank` is between Ace (1) and King (13).
    pub fn new(suit: Suit, rank: u8) -> Option<Self> {
        (ACE..=KING)
            .contains(&rank)
            .then(|| Self(suit as u8 * MAX_RANK + rank - 1))
    }

    pub fn new_with_id(id: u8) -> Option<Self> {
        (id < MAX_CARD).then_some(Self(id))
    }

    pub fn id(&self) -> u8 {
        self.0
    }

    pub fn suit(&self) -> Suit {
        Suit::ALL[(self.0 / MAX_RANK) as usize]
    }

    /// Rank value, Ace = 1 through King = 13.
    pub fn rank(&self) -> u8 {
        self.0 % MAX_RANK + 1
    }

    pub fn is_ace(&self) -> bool {
        self.rank() == ACE
    }

    /// True when `other` is the same suit and exactly one rank below.
    pub fn is_followed_by(&self, other: Card) -> bool {
        self.suit() == other.suit() && self.rank() == other.rank() + 1
    }

    pub fn parse(token: &str) -> Result<Self, DealError> {
        let invalid = || DealError::InvalidCard(token.to_string());
        let mut chars = token.trim().chars();
        let suit = chars
            .next_back()
            .and_then(Suit::from_short_form)
            .ok_or_else(invalid)?;
        let rank = chars.as_str();
        let rank = RANKS
            .iter()
            .position(|&r| r == rank)
            .ok_or_else(invalid)?;
        Card::new(suit, rank as u8 + 1).ok_or_else(invalid)
    }

    /// Every card of a standard deck in suit-then-rank order.
    pub fn deck() -> impl Iterator<Item = Card> {
        (0..MAX_CARD).filter_map(Card::new_with_id)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            RANKS[(self.rank() - 1) as usize],
            self.suit().short_form()
        )
    }
}

impl TryFrom<String> for Card {
    type Error = DealError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Card::parse(&value)
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}
