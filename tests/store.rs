use std::fs;
use std::path::PathBuf;

use nba_workbench::box_score::{BoxScoreRow, SeasonType};
use nba_workbench::cleaning::{ImputationOverrides, clean_team_games};
use nba_workbench::fields::Counting;
use nba_workbench::stats_api::parse_league_game_finder;
use nba_workbench::store::{Column, DataStore, Origin, Stage, Table, read_parquet, write_parquet};
use nba_workbench::teams;

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
fn team_games_path_follows_layout() {
    let store = DataStore::new("/data");
    let path = store.team_games_path(
        Origin::External,
        Stage::Interim,
        SeasonType::RegularSeason,
        None,
        1610612744,
    );
    assert_eq!(
        path,
        PathBuf::from("/data/external/interim/teams/games/RegularSeason/ALL/1610612744.parquet")
    );
    let path = store.team_games_path(
        Origin::Internal,
        Stage::Processed,
        SeasonType::PreSeason,
        Some("22019"),
        1,
    );
    assert_eq!(
        path,
        PathBuf::from("/data/internal/processed/teams/games/PreSeason/22019/1.parquet")
    );
    assert_eq!(
        store.imputation_path(),
        PathBuf::from("/data/internal/inputation/teams/games/imputation_map.json")
    );
    assert_eq!(
        store.unresolved_path(SeasonType::Playoffs, 1),
        PathBuf::from("/data/internal/inputation/teams/games/Playoffs/unresolved_1.json")
    );
}

#[test]
fn box_scores_survive_parquet() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    let store = DataStore::new(root);
    let rows = fixture_rows()
        .into_iter()
        .filter(|r| r.team_id == 1610612744)
        .collect::<Vec<_>>();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].rest_days, None);

    let path = store
        .save_team_games(
            Origin::External,
            Stage::Interim,
            SeasonType::RegularSeason,
            None,
            1610612744,
            &rows,
        )
        .expect("save");
    assert!(path.exists());
    assert!(!path.with_extension("parquet.tmp").exists());

    let loaded = store
        .load_team_games(
            Origin::External,
            Stage::Interim,
            SeasonType::RegularSeason,
            None,
            1610612744,
        )
        .expect("load")
        .expect("stored");
    assert_eq!(loaded, rows);

    assert_eq!(
        store
            .stored_team_ids(Origin::External, Stage::Interim, SeasonType::RegularSeason, None)
            .expect("list"),
        vec![1610612744]
    );

    drop(dir);
    assert!(!path.exists());
}

#[test]
fn missing_files_load_as_none() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    let store = DataStore::new(root);
    let loaded = store
        .load_team_games(
            Origin::External,
            Stage::Processed,
            SeasonType::Playoffs,
            Some("42019"),
            1,
        )
        .expect("missing is not an error");
    assert!(loaded.is_none());
    assert!(store.load_team_metadata().expect("no sidecar").is_none());
    assert!(store.load_imputation_overrides().expect("no sidecar").is_none());
    assert!(
        store
            .list_seasons(Origin::External, Stage::Processed, SeasonType::Playoffs)
            .expect("no dir")
            .is_empty()
    );
}

#[test]
fn json_sidecars_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    let store = DataStore::new(root);

    let all = teams::all_teams();
    store.save_team_metadata(&all).expect("save teams");
    assert_eq!(store.load_team_metadata().expect("load"), Some(all.clone()));

    store
        .save_team_id_map(&teams::team_id_map(&all))
        .expect("save id map");
    let ids = store.load_team_id_map().expect("load").expect("stored");
    assert_eq!(ids.get("Warriors"), Some(&1610612744));
    store
        .save_team_abbreviation_map(&teams::team_abbreviation_map(&all))
        .expect("save abbreviation map");
    let abbreviations = store.load_team_abbreviation_map().expect("load").expect("stored");
    assert_eq!(abbreviations.get(&1610612762).map(String::as_str), Some("UTA"));

    let mut overrides = ImputationOverrides::new();
    overrides.set(1610612738, "0021900010", Counting::Oreb, 10.0);
    store.save_imputation_overrides(&overrides).expect("save overrides");
    assert_eq!(
        store.load_imputation_overrides().expect("load"),
        Some(overrides)
    );
}

#[test]
fn raw_rows_keep_empty_cells_as_nan() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    let store = DataStore::new(root);
    let raw = parse_league_game_finder(&read_fixture("leaguegamefinder.json")).expect("parse");
    let path = store
        .save_raw_team_games(SeasonType::RegularSeason, None, 0, &raw)
        .expect("save raw");

    let table = read_parquet(&path).expect("read").expect("stored");
    assert_eq!(table.rows(), 5);
    let oreb = table.doubles("OREB").expect("OREB");
    assert!(oreb[2].is_nan());
    assert_eq!(table.doubles("MIN").expect("MIN")[0], 240.0);
    assert!(table.column("MP").is_none());
}

#[test]
fn table_rejects_ragged_columns() {
    let mut table = Table::new();
    table
        .push("A", Column::Int64(vec![1, 2]))
        .expect("first column");
    assert!(table.push("B", Column::Double(vec![1.0])).is_err());
    assert!(table.push("A", Column::Bool(vec![true, false])).is_err());

    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    assert!(write_parquet(&root.join("x.parquet"), &Table::new()).is_err());
}
