use std::fs;
use std::path::PathBuf;

use nba_workbench::fields::Counting;
use nba_workbench::odds_api::{OddsFormat, consensus_win_probability, parse_odds_history};
use nba_workbench::stats_api::parse_league_game_finder;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_league_game_finder_fixture() {
    let raw = read_fixture("leaguegamefinder.json");
    let games = parse_league_game_finder(&raw).expect("fixture should parse");
    assert_eq!(games.len(), 5);

    let lal = &games[0];
    assert_eq!(lal.team_id, 1610612747);
    assert_eq!(lal.season_id, "22019");
    assert_eq!(lal.game_id, "0021900050");
    assert_eq!(lal.matchup, "LAL vs. GSW");
    assert_eq!(lal.wl.as_deref(), Some("W"));
    assert_eq!(lal.count(Counting::Mp), Some(240.0));
    assert_eq!(lal.count(Counting::Pts), Some(115.0));
    assert_eq!(lal.plus_minus, Some(10.0));
    assert!(lal.missing().is_empty());
}

#[test]
fn null_cells_are_missing_counts() {
    let raw = read_fixture("leaguegamefinder.json");
    let games = parse_league_game_finder(&raw).expect("fixture should parse");
    let bos = games
        .iter()
        .find(|g| g.team_abbreviation == "BOS")
        .expect("boston row");
    assert_eq!(bos.missing(), vec![Counting::Oreb, Counting::Dreb]);
    assert_eq!(bos.count(Counting::Reb), Some(44.0));
}

#[test]
fn rejects_payload_without_result_sets() {
    assert!(parse_league_game_finder(r#"{"resource": "x"}"#).is_err());
    assert!(parse_league_game_finder("not json").is_err());
}

#[test]
fn parses_odds_history_fixture() {
    let raw = read_fixture("odds_history.json");
    let snapshot = parse_odds_history(&raw, OddsFormat::Decimal).expect("fixture should parse");
    assert_eq!(snapshot.timestamp.as_deref(), Some("2023-01-15T11:55:39Z"));
    assert_eq!(snapshot.previous_timestamp.as_deref(), Some("2023-01-15T11:45:39Z"));
    assert_eq!(snapshot.next_timestamp.as_deref(), Some("2023-01-15T12:05:39Z"));
    // 2 bookmakers x h2h + 1 spreads market; the second event has no books
    assert_eq!(snapshot.rows.len(), 6);

    let spread = snapshot
        .rows
        .iter()
        .find(|r| r.market == "spreads" && r.outcome == "Los Angeles Lakers")
        .expect("spread row");
    assert_eq!(spread.point, Some(-2.5));
    assert_eq!(spread.bookmaker, "draftkings");
    assert!(spread.commence_ts().is_some());
}

#[test]
fn consensus_is_median_across_books() {
    let raw = read_fixture("odds_history.json");
    let snapshot = parse_odds_history(&raw, OddsFormat::Decimal).expect("fixture should parse");
    let event = "e912304de2b2ce35b473ce2ecd3d1502";
    let home = consensus_win_probability(&snapshot.rows, event, "Los Angeles Lakers")
        .expect("home consensus");
    let want = (1.0 / 1.8 + 1.0 / 1.75) / 2.0;
    assert!((home - want).abs() < 1e-12);
    assert_eq!(consensus_win_probability(&snapshot.rows, event, "Boston Celtics"), None);
}
