use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use nba_workbench::aggregate::{Window, prior_aggregates, standings};
use nba_workbench::box_score::BoxScoreRow;
use nba_workbench::cleaning::{ImputationOverrides, clean_team_games};
use nba_workbench::pairing::pair_with_opponents;
use nba_workbench::stats::TEAM_STATS;
use nba_workbench::stats_api::parse_league_game_finder;
use nba_workbench::win_model::build_samples;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_rows() -> Vec<BoxScoreRow> {
    let raw = parse_league_game_finder(&read_fixture("leaguegamefinder.json")).expect("parse");
    clean_team_games(&raw, &ImputationOverrides::new()).rows
}

#[test]
fn first_game_has_no_prior_form() {
    let rows = fixture_rows();
    let priors = prior_aggregates(&rows, Window::Expanding, &TEAM_STATS).expect("priors");
    assert_eq!(priors.len(), rows.len());

    for (row, prior) in rows.iter().zip(&priors) {
        let opener = row.game_id == "0021900001";
        assert_eq!(prior.is_none(), opener, "{} {}", row.team_id, row.game_id);
    }

    let (idx, gsw_second) = rows
        .iter()
        .enumerate()
        .find(|(_, r)| r.team_id == 1610612744 && r.game_id == "0021900050")
        .expect("second gsw game");
    let opener = rows
        .iter()
        .find(|r| r.team_id == 1610612744 && r.game_id == "0021900001")
        .expect("gsw opener");
    let form = priors[idx].as_ref().expect("prior form");
    assert_eq!(form.games, 1);
    // the game itself never leaks into its own aggregate
    assert_eq!(form.totals, opener.line);
    assert_ne!(form.totals, gsw_second.line);
    assert_eq!(form.rates.get("eFG_PCT").copied(), Some((40.0 + 6.0) / 85.0));
}

#[test]
fn rolling_window_waits_for_enough_games() {
    let rows = fixture_rows();
    let priors = prior_aggregates(&rows, Window::Rolling(2), &TEAM_STATS).expect("priors");
    assert!(priors.iter().all(Option::is_none));

    let priors = prior_aggregates(&rows, Window::Rolling(1), &TEAM_STATS).expect("priors");
    assert_eq!(priors.iter().filter(|p| p.is_some()).count(), 2);
}

#[test]
fn standings_split_the_series() {
    let rows = fixture_rows();
    let table = standings(&rows, "22019", None);
    assert_eq!(table.len(), 2);
    for s in &table {
        assert_eq!((s.wins, s.losses), (1, 1));
        assert_eq!(s.games_behind, 0.0);
        assert_eq!(s.win_pct, 0.5);
    }

    let opening_night = NaiveDate::from_ymd_opt(2019, 10, 22).expect("date");
    let table = standings(&rows, "22019", Some(opening_night));
    assert_eq!(table[0].team_abbreviation, "GSW");
    assert_eq!(table[1].games_behind, 1.0);
}

#[test]
fn pairing_matches_both_sides_and_dedupes() {
    let mut rows = fixture_rows();
    rows.push(rows[0].clone());
    let pairing = pair_with_opponents(&rows);
    assert_eq!(pairing.pairs.len(), 4);
    assert!(pairing.unmatched.is_empty());
    for pair in &pairing.pairs {
        assert_eq!(pair.team.game_id, pair.opponent.game_id);
        assert_ne!(pair.team.team_id, pair.opponent.team_id);
        assert_ne!(pair.team.home, pair.opponent.home);
    }

    let lone = rows.into_iter().take(1).collect::<Vec<_>>();
    let pairing = pair_with_opponents(&lone);
    assert!(pairing.pairs.is_empty());
    assert_eq!(pairing.unmatched.len(), 1);
}

#[test]
fn win_samples_use_only_prior_games() {
    let rows = fixture_rows();
    let samples = build_samples(&rows, Window::Expanding, &TEAM_STATS).expect("samples");
    assert_eq!(samples.len(), 1);
    let sample = &samples[0];
    assert_eq!(sample.game_id, "0021900050");
    assert_eq!(sample.team_id, 1610612744);
    assert_eq!(sample.opponent_id, 1610612747);
    assert!(!sample.win);
    assert_eq!(sample.features[5], -1.0);
    assert!(sample.features.iter().all(|v| v.is_finite()));
}
