use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use reqwest::header::{ORIGIN, REFERER, USER_AGENT};
use serde_json::Value;
use tracing::{debug, info};

use crate::box_score::{RawTeamGame, SeasonType};
use crate::config::WorkbenchConfig;
use crate::fields::Counting;
use crate::http_client::{self, body_snippet};
use crate::memo::TtlCache;
use crate::retry::retry_fixed;

/// Where team game logs come from. Implemented over HTTP by [`StatsApi`] and
/// by in-memory fakes in tests.
pub trait GameLogSource: Sync {
    fn team_games(&self, team_id: i64, season_type: SeasonType) -> Result<Vec<RawTeamGame>>;
}

pub struct StatsApi {
    client: &'static Client,
    base_url: String,
    retries: u32,
    retry_delay: std::time::Duration,
    cache: TtlCache<(i64, SeasonType), Vec<RawTeamGame>>,
}

impl StatsApi {
    pub fn from_config(cfg: &WorkbenchConfig) -> Result<Self> {
        Ok(Self {
            client: http_client::http_client_with_timeout(cfg.http_timeout)?,
            base_url: cfg.stats_base_url.clone(),
            retries: cfg.fetch_retries,
            retry_delay: cfg.retry_delay,
            cache: TtlCache::new(cfg.cache_capacity, cfg.cache_ttl),
        })
    }

    fn fetch_team_games(&self, team_id: i64, season_type: SeasonType) -> Result<Vec<RawTeamGame>> {
        let url = format!("{}/leaguegamefinder", self.base_url);
        let team = team_id.to_string();
        let body = retry_fixed(self.retries, self.retry_delay, |attempt| {
            debug!(team_id, attempt, season_type = season_type.api_name(), "leaguegamefinder");
            let resp = self
                .client
                .get(&url)
                .query(&[
                    ("LeagueID", "00"),
                    ("PlayerOrTeam", "T"),
                    ("TeamID", team.as_str()),
                    ("SeasonTypeNullable", season_type.api_name()),
                ])
                .header(USER_AGENT, http_client::USER_AGENT)
                .header(REFERER, "https://www.nba.com/")
                .header(ORIGIN, "https://www.nba.com")
                .header("x-nba-stats-origin", "stats")
                .header("x-nba-stats-token", "true")
                .send()
                .context("stats request failed")?;
            let status = resp.status();
            let body = resp.text().context("failed reading stats body")?;
            if !status.is_success() {
                return Err(anyhow!("stats http {}: {}", status, body_snippet(&body)));
            }
            Ok(body)
        })
        .with_context(|| format!("team {team_id} {} games", season_type.api_name()))?;

        let games = parse_league_game_finder(&body)?;
        info!(team_id, games = games.len(), "fetched team games");
        Ok(games)
    }
}

impl GameLogSource for StatsApi {
    /// Memoized by (team, season type) for the configured TTL.
    fn team_games(&self, team_id: i64, season_type: SeasonType) -> Result<Vec<RawTeamGame>> {
        self.cache
            .get_or_try_insert_with(&(team_id, season_type), || {
                self.fetch_team_games(team_id, season_type)
            })
    }
}

/// Parses a `leaguegamefinder` payload (`resultSets[0]` headers + rowSet).
pub fn parse_league_game_finder(raw: &str) -> Result<Vec<RawTeamGame>> {
    let root: Value = serde_json::from_str(raw).context("invalid stats json")?;
    let set = root
        .get("resultSets")
        .and_then(|v| v.as_array())
        .and_then(|sets| sets.first())
        .ok_or_else(|| anyhow!("stats payload has no resultSets"))?;
    let headers = set
        .get("headers")
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow!("result set has no headers"))?
        .iter()
        .map(|h| h.as_str().unwrap_or_default().to_string())
        .collect::<Vec<_>>();
    let rows = set
        .get("rowSet")
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow!("result set has no rowSet"))?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(cells) = row.as_array() else {
            continue;
        };
        let record = headers
            .iter()
            .map(String::as_str)
            .zip(cells.iter())
            .collect::<BTreeMap<&str, &Value>>();
        out.push(raw_game_from_record(&record)?);
    }
    Ok(out)
}

fn raw_game_from_record(record: &BTreeMap<&str, &Value>) -> Result<RawTeamGame> {
    let text = |key: &str| {
        record
            .get(key)
            .and_then(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_default()
    };
    let number = |key: &str| record.get(key).and_then(|v| v.as_f64());

    let team_id = record
        .get("TEAM_ID")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| anyhow!("row without TEAM_ID"))?;

    let mut counts = BTreeMap::new();
    for stat in Counting::ALL {
        let column = match stat {
            Counting::Mp => "MIN",
            other => other.column(),
        };
        if let Some(value) = number(column) {
            counts.insert(stat, value);
        }
    }

    Ok(RawTeamGame {
        season_id: text("SEASON_ID"),
        team_id,
        team_abbreviation: text("TEAM_ABBREVIATION"),
        team_name: text("TEAM_NAME"),
        game_id: text("GAME_ID"),
        game_date: text("GAME_DATE"),
        matchup: text("MATCHUP"),
        wl: Some(text("WL")).filter(|s| !s.is_empty()),
        counts,
        plus_minus: number("PLUS_MINUS"),
    })
}
