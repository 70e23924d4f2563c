use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;

use nba_workbench::config::{self, WorkbenchConfig};
use nba_workbench::logging;
use nba_workbench::odds_api::{
    DEFAULT_BOOKMAKERS, DEFAULT_MARKETS, OddsApi, OddsFormat, consensus_win_probability,
    snapshot_time_for,
};
use nba_workbench::store::DataStore;

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init();

    let mut cfg = WorkbenchConfig::from_env();
    if let Some(dir) = arg_value("--data-dir") {
        cfg.data_dir = PathBuf::from(dir);
    }
    let raw_date = arg_value("--date").ok_or_else(|| anyhow!("--date YYYY-MM-DD is required"))?;
    let day = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d")
        .with_context(|| format!("invalid --date {raw_date}"))?;
    let format = match arg_value("--format") {
        Some(raw) => OddsFormat::parse(&raw).ok_or_else(|| anyhow!("unknown odds format {raw}"))?,
        None => OddsFormat::Decimal,
    };
    let markets = list_arg("--markets").unwrap_or_else(|| to_owned(DEFAULT_MARKETS));
    let bookmakers = list_arg("--bookmakers").unwrap_or_else(|| to_owned(DEFAULT_BOOKMAKERS));
    let markets = markets.iter().map(String::as_str).collect::<Vec<_>>();
    let bookmakers = bookmakers.iter().map(String::as_str).collect::<Vec<_>>();

    let api = OddsApi::from_config(&cfg)?;
    let at = snapshot_time_for(day);
    let snapshot = api.historical_odds(&at, &markets, &bookmakers, format)?;

    let store = DataStore::new(&cfg.data_dir);
    let path = store.save_odds(&at, &snapshot.rows)?;

    println!("Odds snapshot {at}");
    println!(
        "Timestamp: {} (prev {}, next {})",
        snapshot.timestamp.as_deref().unwrap_or("-"),
        snapshot.previous_timestamp.as_deref().unwrap_or("-"),
        snapshot.next_timestamp.as_deref().unwrap_or("-")
    );
    println!("Rows: {}", snapshot.rows.len());
    println!("Output: {}", path.display());

    let mut events = BTreeMap::new();
    for row in &snapshot.rows {
        events
            .entry(row.event_id.as_str())
            .or_insert((row.commence_time.as_str(), row.home_team.as_str(), row.away_team.as_str()));
    }
    for (event_id, (commence, home, away)) in events {
        let p_home = consensus_win_probability(&snapshot.rows, event_id, home);
        let p_away = consensus_win_probability(&snapshot.rows, event_id, away);
        println!(
            "  {commence} {away} @ {home}: home {} away {}",
            fmt_prob(p_home),
            fmt_prob(p_away)
        );
    }
    Ok(())
}

fn fmt_prob(p: Option<f64>) -> String {
    p.map(|p| format!("{:.1}%", p * 100.0))
        .unwrap_or_else(|| "-".to_string())
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn list_arg(name: &str) -> Option<Vec<String>> {
    let items = arg_value(name)?
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();
    (!items.is_empty()).then_some(items)
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
