//! Move-ranking rules. Each rule scores a candidate move against the board it
//! would be played on; the scores of all rules are summed into the move weight.

use crate::action::{Move, Position};
use crate::board::{Board, TOTAL_TABLEAUS};

pub type Heuristic = fn(&Board, &Move) -> i32;

pub const HEURISTICS: [Heuristic; 8] = [
    reserve_vacate,
    reserve_vacate_enables_follow_up,
    tableau_build_same_suit,
    tableau_buries_lower_same_suit,
    tableau_empties_column,
    tableau_reveals_same_suit_lower,
    tableau_reveals_movable_card,
    tableau_reveals_foundation_card,
];

pub fn evaluate(board: &Board, mov: &Move) -> i32 {
    HEURISTICS.iter().map(|heuristic| heuristic(board, mov)).sum()
}

/// Freeing a reserve slot is good.
pub fn reserve_vacate(_board: &Board, mov: &Move) -> i32 {
    match mov.from {
        Position::Reserve => 1,
        _ => 0,
    }
}

/// A reserve card dropped on the tableau is better when another column top
/// can follow it down, and better still when that empties the column.
pub fn reserve_vacate_enables_follow_up(board: &Board, mov: &Move) -> i32 {
    let (Position::Reserve, Some(to)) = (mov.from, mov.to.column()) else {
        return 0;
    };
    board
        .tableaus()
        .iter()
        .enumerate()
        .filter(|&(idx, _)| idx != to)
        .filter_map(|(_, column)| match column.last() {
            Some(&top) if mov.card.is_followed_by(top) => {
                Some(if column.len() == 1 { 2 } else { 1 })
            }
            _ => None,
        })
        .sum()
}

pub fn tableau_build_same_suit(board: &Board, mov: &Move) -> i32 {
    let Some(to) = mov.to.column() else {
        return 0;
    };
    match board.tableau(to).last() {
        Some(top) if top.is_followed_by(mov.card) => 2,
        _ => 0,
    }
}

/// Covering lower cards of the same suit blocks them from the foundation.
pub fn tableau_buries_lower_same_suit(board: &Board, mov: &Move) -> i32 {
    let Some(to) = mov.to.column() else {
        return 0;
    };
    board
        .tableau(to)
        .iter()
        .filter(|c| c.suit() == mov.card.suit() && c.rank() < mov.card.rank())
        .map(|&c| if board.can_move_to_foundation(c) { -2 } else { -1 })
        .sum()
}

/// Emptying a column only pays off when the card lands on another card.
pub fn tableau_empties_column(board: &Board, mov: &Move) -> i32 {
    let Some(from) = mov.from.column() else {
        return 0;
    };
    if board.tableau(from).len() != 1 {
        return 0;
    }
    match mov.to.column() {
        Some(to) if !board.tableau(to).is_empty() => 2,
        _ => -5,
    }
}

pub fn tableau_reveals_same_suit_lower(board: &Board, mov: &Move) -> i32 {
    let Some(from) = mov.from.column() else {
        return 0;
    };
    let column = board.tableau(from);
    column[..column.len().saturating_sub(1)]
        .iter()
        .filter(|c| c.suit() == mov.card.suit() && c.rank() < mov.card.rank())
        .map(|&c| if board.can_move_to_foundation(c) { 2 } else { 1 })
        .sum()
}

/// Scores the card left on top of the source column by how many other
/// columns it could move to next, plus one if it could follow the moved card.
pub fn tableau_reveals_movable_card(board: &Board, mov: &Move) -> i32 {
    let Some(from) = mov.from.column() else {
        return 0;
    };
    let column = board.tableau(from);
    if column.len() < 2 {
        return 0;
    }
    let uncovered = column[column.len() - 2];
    let to = mov.to.column();

    let mut weight = (0..TOTAL_TABLEAUS)
        .filter(|&idx| idx != from && Some(idx) != to)
        .filter(|&idx| board.is_legal(uncovered, Position::TABLEAU[idx]))
        .count() as i32;
    if to.is_some() && mov.card.is_followed_by(uncovered) {
        weight += 1;
    }
    weight
}

pub fn tableau_reveals_foundation_card(board: &Board, mov: &Move) -> i32 {
    let Some(from) = mov.from.column() else {
        return 0;
    };
    let column = board.tableau(from);
    match column.len() {
        0 | 1 => 0,
        len if board.can_move_to_foundation(column[len - 2]) => 2,
        _ => 0,
    }
}
