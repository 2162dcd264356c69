//! Board builders shared by the unit tests.

use crate::board::{Board, TOTAL_TABLEAUS};
use crate::card::{Card, Suit};

use serde_json::json;

/// A deal that needs roughly twenty moves: three suits are partly built and
/// the remaining fifteen cards are scattered over seven columns and the reserve.
pub const EASY_DEAL: &str = r#"{
  "board": {
    "foundation": {
      "Spades": ["AS", "2S", "3S", "4S", "5S", "6S", "7S", "8S"],
      "Clubs": ["AC", "2C", "3C", "4C", "5C", "6C", "7C", "8C", "9C"],
      "Hearts": ["AH", "2H", "3H", "4H", "5H", "6H", "7H", "8H", "9H", "10H"],
      "Diamonds": ["AD", "2D", "3D", "4D", "5D", "6D", "7D", "8D", "9D", "10D"]
    },
    "reserve": ["KH", "QC"],
    "tableau": [
      ["KS", "10S"],
      ["QS", "9S"],
      ["JS"],
      ["KC", "JH"],
      ["10C", "JC"],
      ["QH", "KD"],
      ["JD", "QD"],
      []
    ]
  }
}"#;

pub fn card_of(token: &str) -> Card {
    Card::parse(token).unwrap()
}

pub fn cards(tokens: &str) -> Vec<Card> {
    tokens.split_whitespace().map(card_of).collect()
}

/// Builds a board without requiring a full deck. `foundation` gives the
/// highest rank already played for each suit, in suit order.
pub fn layout(foundation: [u8; 4], reserve: &str, tableau: [&str; TOTAL_TABLEAUS]) -> Board {
    let foundations = std::array::from_fn(|i| {
        (1..=foundation[i])
            .filter_map(|rank| Card::new(Suit::ALL[i], rank))
            .collect()
    });
    let tableaus = tableau.map(|column| cards(column).into_iter().collect());
    Board::from_piles(foundations, cards(reserve).into_iter().collect(), tableaus)
}

pub fn deal_json(foundation: [u8; 4], reserve: &str, tableau: [&str; TOTAL_TABLEAUS]) -> String {
    let tokens = |cards: &[Card]| cards.iter().map(|c| c.to_string()).collect::<Vec<_>>();
    let board = layout(foundation, reserve, tableau);
    let foundation: serde_json::Map<_, _> = Suit::ALL
        .into_iter()
        .filter(|&suit| !board.foundation(suit).is_empty())
        .map(|suit| (format!("{suit:?}"), json!(tokens(board.foundation(suit)))))
        .collect();
    let tableau: Vec<_> = board
        .tableaus()
        .iter()
        .map(|column| tokens(column.as_slice()))
        .collect();
    json!({
        "board": {
            "foundation": foundation,
            "reserve": tokens(board.reserve()),
            "tableau": tableau,
        }
    })
    .to_string()
}

pub fn won_deal() -> String {
    deal_json([13, 13, 13, 13], "", [""; TOTAL_TABLEAUS])
}

/// Everything is home except the king of diamonds, which waits in the reserve.
pub fn one_move_deal() -> String {
    deal_json([13, 13, 13, 12], "KD", [""; TOTAL_TABLEAUS])
}

/// A full reserve of nines, kings and jacks on every column and the aces
/// buried: nothing can move.
pub fn blocked_deal() -> String {
    let tops = cards("KS KC KH KD JS JC JH JD");
    let reserve = cards("9S 9C 9H 9D");
    let rest: Vec<Card> = Card::deck()
        .filter(|c| !tops.contains(c) && !reserve.contains(c))
        .collect();
    let tableau: Vec<Vec<String>> = rest
        .chunks(5)
        .zip(&tops)
        .map(|(chunk, top)| chunk.iter().chain([top]).map(|c| c.to_string()).collect())
        .collect();
    let reserve: Vec<String> = reserve.iter().map(|c| c.to_string()).collect();
    json!({ "board": { "reserve": reserve, "tableau": tableau } }).to_string()
}
