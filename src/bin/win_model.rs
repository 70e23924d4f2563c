use std::path::PathBuf;

use anyhow::{Result, anyhow};

use nba_workbench::aggregate::Window;
use nba_workbench::box_score::SeasonType;
use nba_workbench::config::{self, WorkbenchConfig};
use nba_workbench::ingest::load_all_team_games;
use nba_workbench::logging;
use nba_workbench::stats::TEAM_STATS;
use nba_workbench::store::DataStore;
use nba_workbench::win_model::{
    FEATURE_NAMES, LogisticModel, Metrics, TrainConfig, build_samples, chronological_split,
};

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
    let window = match arg_value("--window").as_deref() {
        None | Some("expanding") => Window::Expanding,
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) if n > 0 => Window::Rolling(n),
            _ => return Err(anyhow!("--window must be 'expanding' or a positive game count")),
        },
    };
    let train_share = arg_value("--train-share")
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(0.8)
        .clamp(0.1, 0.95);
    let mut train_cfg = TrainConfig::default();
    if let Some(epochs) = arg_value("--epochs").and_then(|v| v.parse::<usize>().ok()) {
        train_cfg.epochs = epochs.clamp(1, 100_000);
    }
    if let Some(l2) = arg_value("--l2").and_then(|v| v.parse::<f64>().ok()) {
        train_cfg.l2 = l2.max(0.0);
    }

    let store = DataStore::new(&cfg.data_dir);
    let rows = load_all_team_games(&store, season_type, cfg.fetch_parallelism)?;
    if rows.is_empty() {
        return Err(anyhow!(
            "no stored games under {}; run ingest first",
            store.root().display()
        ));
    }
    let catalogue = TEAM_STATS.with_params(cfg.stat_params);
    let samples = build_samples(&rows, window, &catalogue)?;
    let (train, test) = chronological_split(&samples, train_share);
    if train.is_empty() {
        return Err(anyhow!("not enough games with prior data to fit"));
    }

    let model = LogisticModel::fit(train, train_cfg);

    println!("Win model ({}, {:?})", season_type.api_name(), window);
    println!("Games: {} samples: {}", rows.len(), samples.len());
    print_metrics("Train", model.evaluate(train));
    print_metrics("Test", model.evaluate(test));
    println!("Bias: {:.4}", model.bias);
    for (name, weight) in FEATURE_NAMES.iter().zip(model.weights) {
        println!("  {name:<18} {weight:>8.4}");
    }
    Ok(())
}

fn print_metrics(label: &str, m: Metrics) {
    println!(
        "{label}: n={} brier={:.4} logloss={:.4} acc={:.3}",
        m.samples, m.brier, m.log_loss, m.accuracy
    );
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
