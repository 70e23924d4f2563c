use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use nba_workbench::box_score::SeasonType;
use nba_workbench::config::{self, WorkbenchConfig};
use nba_workbench::ingest::{IngestOptions, ingest_team_games};
use nba_workbench::logging;
use nba_workbench::stats_api::StatsApi;
use nba_workbench::store::DataStore;
use nba_workbench::teams;

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init();

    let mut cfg = WorkbenchConfig::from_env();
    if let Some(dir) = arg_value("--data-dir") {
        cfg.data_dir = PathBuf::from(dir);
    }
    let season_type = match arg_value("--season-type") {
        Some(raw) => SeasonType::parse(&raw).ok_or_else(|| anyhow!("unknown season type {raw}"))?,
        None => SeasonType::RegularSeason,
    };

    let store = DataStore::new(&cfg.data_dir);
    let franchises = match store.load_team_metadata()? {
        Some(cached) => cached,
        None => {
            let all = teams::all_teams();
            store.save_team_metadata(&all)?;
            store.save_team_id_map(&teams::team_id_map(&all))?;
            store.save_team_abbreviation_map(&teams::team_abbreviation_map(&all))?;
            all
        }
    };
    let team_ids = match arg_value("--teams") {
        Some(raw) => parse_team_ids(&raw),
        None => teams::team_ids(&franchises),
    };
    if team_ids.is_empty() {
        return Err(anyhow!("no team ids resolved for ingest"));
    }

    let overrides = store
        .load_imputation_overrides()
        .context("imputation overrides unreadable")?
        .unwrap_or_default();
    let api = StatsApi::from_config(&cfg)?;
    let summary = ingest_team_games(
        &api,
        &store,
        &team_ids,
        &overrides,
        IngestOptions {
            season_type,
            parallelism: cfg.fetch_parallelism,
            keep_raw: cfg.keep_raw,
        },
    );

    println!("Ingest complete ({})", season_type.api_name());
    println!("Data dir: {}", store.root().display());
    println!(
        "Teams: {}/{}",
        summary.teams.len(),
        summary.teams.len() + summary.failures.len()
    );
    println!("Rows: {}", summary.rows());
    for team in &summary.teams {
        println!(
            "  {}: fetched={} rows={} seasons={} imputed={} rejected={} unresolved={}",
            team.team_id,
            team.fetched,
            team.rows,
            team.seasons,
            team.imputed_cells,
            team.rejected,
            team.unresolved.len()
        );
    }
    if summary.unresolved() > 0 {
        println!(
            "Unresolved games: {} (fill {} and re-run)",
            summary.unresolved(),
            store.imputation_path().display()
        );
        for game in summary.teams.iter().flat_map(|t| &t.unresolved) {
            let missing = game.missing.iter().map(|c| c.column()).collect::<Vec<_>>();
            println!(
                "  {} {} {} missing {:?}",
                game.game_date, game.game_id, game.matchup, missing
            );
            println!("    {}", game.reference_url);
        }
    }
    for (team_id, err) in &summary.failures {
        println!("  FAILED {team_id}: {err}");
    }
    Ok(())
}

fn parse_team_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<i64>().ok())
        .collect()
}

fn arg_value(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
