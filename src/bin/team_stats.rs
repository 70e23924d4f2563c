use std::path::PathBuf;

use anyhow::{Result, anyhow};

use nba_workbench::aggregate::standings;
use nba_workbench::box_score::SeasonType;
use nba_workbench::config::{self, WorkbenchConfig};
use nba_workbench::ingest::{build_team_game_stats, load_all_team_games};
use nba_workbench::logging;
use nba_workbench::stats::TEAM_STATS;
use nba_workbench::store::DataStore;

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
    let catalogue = TEAM_STATS.with_params(cfg.stat_params);
    let stats = build_team_game_stats(&store, season_type, &catalogue, cfg.fetch_parallelism)?;

    println!("Team game stats ({})", season_type.api_name());
    println!("Rows: {}", stats.keys.len());
    println!("Columns: {}", stats.stats.len());
    println!("Output: {}", store.team_game_stats_path(season_type).display());

    let rows = load_all_team_games(&store, season_type, cfg.fetch_parallelism)?;
    let season = match arg_value("--season") {
        Some(season) => season,
        None => match rows.iter().map(|r| r.season_id.clone()).max() {
            Some(latest) => latest,
            None => return Ok(()),
        },
    };
    println!();
    println!("Standings {season}");
    for s in standings(&rows, &season, None) {
        println!(
            "  {:<4} {:>3}-{:<3} {:.3} {:>5.1}",
            s.team_abbreviation, s.wins, s.losses, s.win_pct, s.games_behind
        );
    }
    Ok(())
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
