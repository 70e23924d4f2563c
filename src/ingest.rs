use std::collections::BTreeMap;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::box_score::{BoxScoreRow, SeasonType};
use crate::cleaning::{ImputationOverrides, Unresolved, clean_team_games};
use crate::pairing::{TeamGameStats, compute_team_game_stats, pair_with_opponents};
use crate::stats::Catalogue;
use crate::stats_api::GameLogSource;
use crate::store::{DataStore, Origin, Stage};

#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub season_type: SeasonType,
    pub parallelism: usize,
    /// Also write the provider rows under the raw stage.
    pub keep_raw: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamIngest {
    pub team_id: i64,
    pub fetched: usize,
    pub rows: usize,
    pub seasons: usize,
    pub imputed_cells: usize,
    pub rejected: usize,
    pub unresolved: Vec<Unresolved>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestSummary {
    pub teams: Vec<TeamIngest>,
    /// Teams whose fetch or write failed, with the error chain.
    pub failures: Vec<(i64, String)>,
}

impl IngestSummary {
    pub fn rows(&self) -> usize {
        self.teams.iter().map(|t| t.rows).sum()
    }

    pub fn unresolved(&self) -> usize {
        self.teams.iter().map(|t| t.unresolved.len()).sum()
    }
}

fn with_fetch_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}

/// Fetches, cleans and stores every team's game log. One failing team does not
/// stop the others; it lands in [`IngestSummary::failures`].
pub fn ingest_team_games(
    source: &impl GameLogSource,
    store: &DataStore,
    team_ids: &[i64],
    overrides: &ImputationOverrides,
    opts: IngestOptions,
) -> IngestSummary {
    let results = with_fetch_pool(opts.parallelism, || {
        team_ids
            .par_iter()
            .map(|&team_id| (team_id, ingest_team(source, store, team_id, overrides, opts)))
            .collect::<Vec<_>>()
    });

    let mut summary = IngestSummary::default();
    for (team_id, result) in results {
        match result {
            Ok(team) => summary.teams.push(team),
            Err(err) => {
                let message = format!("{err:#}");
                warn!(team_id, error = %message, "team ingest failed");
                summary.failures.push((team_id, message));
            }
        }
    }
    info!(
        teams = summary.teams.len(),
        failures = summary.failures.len(),
        rows = summary.rows(),
        unresolved = summary.unresolved(),
        "ingest finished"
    );
    summary
}

fn ingest_team(
    source: &impl GameLogSource,
    store: &DataStore,
    team_id: i64,
    overrides: &ImputationOverrides,
    opts: IngestOptions,
) -> Result<TeamIngest> {
    let season_type = opts.season_type;
    let raw = source.team_games(team_id, season_type)?;
    if opts.keep_raw {
        store.save_raw_team_games(season_type, None, team_id, &raw)?;
    }

    let report = clean_team_games(&raw, overrides);
    store.save_team_games(
        Origin::External,
        Stage::Interim,
        season_type,
        None,
        team_id,
        &report.rows,
    )?;

    let mut by_season: BTreeMap<&str, Vec<BoxScoreRow>> = BTreeMap::new();
    for row in &report.rows {
        by_season
            .entry(row.season_id.as_str())
            .or_default()
            .push(row.clone());
    }
    for (season, rows) in &by_season {
        store.save_team_games(
            Origin::External,
            Stage::Processed,
            season_type,
            Some(season),
            team_id,
            rows,
        )?;
    }

    let unresolved_path = store.unresolved_path(season_type, team_id);
    if report.unresolved.is_empty() {
        if unresolved_path.exists() {
            std::fs::remove_file(&unresolved_path)
                .with_context(|| format!("remove {}", unresolved_path.display()))?;
        }
    } else {
        store.save_json(&unresolved_path, &report.unresolved)?;
    }

    Ok(TeamIngest {
        team_id,
        fetched: raw.len(),
        rows: report.rows.len(),
        seasons: by_season.len(),
        imputed_cells: report.imputed_cells,
        rejected: report.rejected.len(),
        unresolved: report.unresolved,
    })
}

/// Every stored cleaned row for a season type, across teams, in date order.
pub fn load_all_team_games(
    store: &DataStore,
    season_type: SeasonType,
    parallelism: usize,
) -> Result<Vec<BoxScoreRow>> {
    let team_ids = store.stored_team_ids(Origin::External, Stage::Interim, season_type, None)?;
    let loaded = with_fetch_pool(parallelism, || {
        team_ids
            .par_iter()
            .map(|&team_id| {
                store
                    .load_team_games(Origin::External, Stage::Interim, season_type, None, team_id)
                    .with_context(|| format!("load team {team_id}"))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    let mut rows = loaded.into_iter().flatten().flatten().collect::<Vec<_>>();
    rows.sort_by(|a, b| {
        a.game_date
            .cmp(&b.game_date)
            .then(a.game_id.cmp(&b.game_id))
            .then(a.team_id.cmp(&b.team_id))
    });
    Ok(rows)
}

/// Pairs stored rows with their opponents, runs the team catalogue and writes
/// the result next to the processed games.
pub fn build_team_game_stats(
    store: &DataStore,
    season_type: SeasonType,
    catalogue: &Catalogue,
    parallelism: usize,
) -> Result<TeamGameStats> {
    let rows = load_all_team_games(store, season_type, parallelism)?;
    let pairing = pair_with_opponents(&rows);
    if !pairing.unmatched.is_empty() {
        warn!(unmatched = pairing.unmatched.len(), "rows without an opponent row");
    }
    let stats = compute_team_game_stats(&pairing.pairs, catalogue)?;
    let path = store.save_team_game_stats(season_type, &stats)?;
    info!(rows = stats.keys.len(), path = %path.display(), "saved team game stats");
    Ok(stats)
}
