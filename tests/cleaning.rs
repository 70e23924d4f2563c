use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use nba_workbench::box_score::RawTeamGame;
use nba_workbench::cleaning::{ImputationOverrides, clean_team_games, reference_url, split_matchup};
use nba_workbench::error::{CleaningError, ValidationError};
use nba_workbench::fields::Counting;
use nba_workbench::stats_api::parse_league_game_finder;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_games() -> Vec<RawTeamGame> {
    parse_league_game_finder(&read_fixture("leaguegamefinder.json")).expect("fixture should parse")
}

#[test]
fn cleans_sorts_and_reports_missing_cells() {
    let report = clean_team_games(&fixture_games(), &ImputationOverrides::new());
    assert_eq!(report.rows.len(), 4);
    assert!(report.rejected.is_empty());
    assert_eq!(report.unresolved.len(), 1);
    assert!(!report.is_complete());

    let dates = report.rows.iter().map(|r| r.game_date).collect::<Vec<_>>();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);

    let unresolved = &report.unresolved[0];
    assert_eq!(unresolved.team_id, 1610612738);
    assert_eq!(unresolved.missing, vec![Counting::Oreb, Counting::Dreb]);
    assert_eq!(
        unresolved.reference_url,
        "https://www.basketball-reference.com/boxscores/201910230NYK.html"
    );
}

#[test]
fn reference_url_points_at_the_home_team_page() {
    let day = NaiveDate::from_ymd_opt(2019, 10, 23).expect("date");
    let away = split_matchup("BOS @ NYK").expect("away matchup");
    let home = split_matchup("NYK vs. BOS").expect("home matchup");
    let want = "https://www.basketball-reference.com/boxscores/201910230NYK.html";
    assert_eq!(reference_url(day, &away), want);
    assert_eq!(reference_url(day, &home), want);
}

#[test]
fn derives_flags_abbreviations_and_rest_days() {
    let report = clean_team_games(&fixture_games(), &ImputationOverrides::new());
    let gsw = report
        .rows
        .iter()
        .filter(|r| r.team_id == 1610612744)
        .collect::<Vec<_>>();
    assert_eq!(gsw.len(), 2);

    assert_eq!(gsw[0].team_abbreviation, "GSW");
    assert_eq!(gsw[0].matchup, "GSW vs. LAL");
    assert!(gsw[0].home);
    assert!(gsw[0].win);
    assert_eq!(gsw[0].rest_days, None);
    assert_eq!(gsw[0].line.mp, 240.0);

    assert!(!gsw[1].home);
    assert!(!gsw[1].win);
    assert_eq!(gsw[1].opponent_abbreviation, "LAL");
    assert_eq!(gsw[1].rest_days, Some(8));
}

#[test]
fn overrides_complete_the_unresolved_game() {
    let mut overrides = ImputationOverrides::new();
    overrides.set(1610612738, "0021900010", Counting::Oreb, 10.0);
    overrides.set(1610612738, "0021900010", Counting::Dreb, 34.0);

    let report = clean_team_games(&fixture_games(), &overrides);
    assert!(report.is_complete());
    assert_eq!(report.rows.len(), 5);
    assert_eq!(report.imputed_cells, 2);
    let bos = report
        .rows
        .iter()
        .find(|r| r.team_id == 1610612738)
        .expect("boston row");
    assert_eq!(bos.line.oreb, 10.0);
    assert_eq!(bos.season(), Some(2019));
}

#[test]
fn rejects_free_throws_without_attempts() {
    let mut game = fixture_games().remove(0);
    game.counts.insert(Counting::Fta, 0.0);
    game.counts.insert(Counting::Ftm, 3.0);

    let report = clean_team_games(&[game], &ImputationOverrides::new());
    assert!(report.rows.is_empty());
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(
        report.rejected[0].reason,
        CleaningError::Invalid(ValidationError::FreeThrowsWithoutAttempts(3.0))
    );
}

#[test]
fn rejects_unparseable_matchup() {
    let mut game = fixture_games().remove(0);
    game.matchup = "LAL - GSW".to_string();
    let report = clean_team_games(&[game], &ImputationOverrides::new());
    assert!(matches!(
        report.rejected[0].reason,
        CleaningError::BadMatchup(_)
    ));
}
