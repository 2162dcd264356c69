use bakers_game::{
    board::Board,
    error::DealError,
    solver::{SolveConfig, SolveStatus, solve},
};
use std::io::Write;
use tempfile::NamedTempFile;

const DEAL: &str = r#"{
  "board": {
    "foundation": {
      "Spades": ["AS", "2S", "3S", "4S", "5S", "6S", "7S"],
      "Clubs": ["AC", "2C", "3C", "4C", "5C", "6C", "7C", "8C"],
      "Hearts": ["AH", "2H", "3H", "4H", "5H", "6H", "7H", "8H", "9H"],
      "Diamonds": ["AD", "2D", "3D", "4D", "5D", "6D", "7D", "8D", "9D"]
    },
    "reserve": ["JD", "9C"],
    "tableau": [
      ["KS", "8S"],
      ["QH", "10H"],
      ["KD", "JS"],
      ["QS", "10D"],
      ["KC", "JH", "10C"],
      ["QC", "9S"],
      ["KH", "QD", "JC"],
      ["10S"]
    ]
  }
}"#;

fn deal_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_solve_deal_from_file() {
    let file = deal_file(DEAL);
    let deal = Board::load(file.path()).unwrap();
    assert!(deal.is_valid());

    let config = SolveConfig::default().with_seed(5).with_max_solutions(3);
    let result = solve(deal.clone(), config).unwrap();
    assert_eq!(result.status, SolveStatus::Won);
    assert_eq!(result.solutions_found, 3);

    let moves = result.solution.unwrap();
    let end = moves
        .iter()
        .try_fold(deal, |board, &mov| board.apply_move(mov))
        .unwrap();
    assert!(end.is_won());
    assert_eq!(end.history(), moves.as_slice());
}

#[test]
fn test_reject_bad_deal_file() {
    let file = deal_file(r#"{ "board": { "tableau": [["AS"], [], [], [], [], [], [], []] } }"#);
    let err = Board::load(file.path()).unwrap_err();
    assert!(matches!(err, DealError::MissingCards(51)));

    let file = deal_file("not json");
    let err = Board::load(file.path()).unwrap_err();
    assert!(matches!(err, DealError::Json(_)));
}
