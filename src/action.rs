use crate::board::TOTAL_TABLEAUS;
use crate::card::Card;

use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Position {
    Foundation,
    Reserve,
    Tableau(u8), // column index 0..8
}

impl Position {
    pub const TABLEAU: [Position; TOTAL_TABLEAUS] = [
        Position::Tableau(0),
        Position::Tableau(1),
        Position::Tableau(2),
        Position::Tableau(3),
        Position::Tableau(4),
        Position::Tableau(5),
        Position::Tableau(6),
        Position::Tableau(7),
    ];

    pub fn column(&self) -> Option<usize> {
        match self {
            Position::Tableau(idx) => Some(*idx as usize),
            _ => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Foundation => f.write_str("F"),
            Position::Reserve => f.write_str("R"),
            Position::Tableau(idx) => write!(f, "T{}", idx + 1),
        }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single card relocation. `weight` only ranks candidates while a board's
/// pending moves are built; it takes no part in equality.
#[derive(Debug, Copy, Clone, Serialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub card: Card,
    #[serde(skip)]
    pub weight: i32,
}

impl Move {
    pub fn new(from: Position, to: Position, card: Card) -> Self {
        Self {
            from,
            to,
            card,
            weight: 0,
        }
    }

    pub fn is_to_foundation(&self) -> bool {
        self.to == Position::Foundation
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to && self.card == other.card
    }
}

impl Eq for Move {}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}", self.from, self.to, self.card)
    }
}

pub fn format_moves(moves: &[Move]) -> String {
    let list: Vec<String> = moves.iter().map(|m| m.to_string()).collect();

    let mut output = String::new();
    let max_width = list.iter().map(|s| s.len()).max().unwrap_or_default() + 1;
    for chunk in list.chunks(10) {
        for cmd in chunk {
            output.push_str(&format!("{cmd:<width$}", width = max_width));
        }
        output.push('\n');
    }

    output
}

pub fn moves_to_json(moves: &[Move]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(moves)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(token: &str) -> Card {
        Card::parse(token).unwrap()
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::Foundation.to_string(), "F");
        assert_eq!(Position::Reserve.to_string(), "R");
        assert_eq!(Position::TABLEAU[0].to_string(), "T1");
        assert_eq!(Position::TABLEAU[7].to_string(), "T8");
        assert_eq!(Position::TABLEAU[3].column(), Some(3));
        assert_eq!(Position::Reserve.column(), None);
    }

    #[test]
    fn test_move_equality_ignores_weight() {
        let a = Move::new(Position::Tableau(2), Position::Reserve, card("7C"));
        let mut b = a;
        b.weight = 42;
        assert_eq!(a, b);
        assert_ne!(a, Move::new(Position::Tableau(3), Position::Reserve, card("7C")));
    }

    #[test]
    fn test_format_moves() {
        let moves = [
            Move::new(Position::Reserve, Position::Foundation, card("AS")),
            Move::new(Position::Tableau(0), Position::Tableau(4), card("10H")),
        ];
        assert_eq!(format_moves(&moves), "R:F AS    T1:T5 10H \n");
        assert_eq!(format_moves(&[]), "");

        let many = vec![moves[0]; 12];
        assert_eq!(format_moves(&many).lines().count(), 2);
    }

    #[test]
    fn test_moves_to_json() {
        let moves = [Move::new(Position::Tableau(6), Position::Foundation, card("KD"))];
        let json = moves_to_json(&moves).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{ "from": "T7", "to": "F", "card": "KD" }])
        );
    }
}
