use std::cmp::Ordering;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::WorkbenchConfig;
use crate::http_client::{self, body_snippet};
use crate::memo::TtlCache;
use crate::retry::retry_fixed;

const SPORT_KEY: &str = "basketball_nba";
pub const DEFAULT_MARKETS: &[&str] = &["h2h", "spreads", "totals"];
pub const DEFAULT_BOOKMAKERS: &[&str] = &["draftkings", "fanduel"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OddsFormat {
    Decimal,
    American,
}

impl OddsFormat {
    pub fn as_param(self) -> &'static str {
        match self {
            OddsFormat::Decimal => "decimal",
            OddsFormat::American => "american",
        }
    }

    pub fn parse(raw: &str) -> Option<OddsFormat> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "decimal" => Some(OddsFormat::Decimal),
            "american" => Some(OddsFormat::American),
            _ => None,
        }
    }

    /// Bookmaker price as a probability, vig included.
    pub fn implied_probability(self, price: f64) -> Option<f64> {
        let p = match self {
            OddsFormat::Decimal if price > 0.0 => 1.0 / price,
            OddsFormat::American if price > 0.0 => 100.0 / (price + 100.0),
            OddsFormat::American if price < 0.0 => -price / (-price + 100.0),
            _ => return None,
        };
        p.is_finite().then_some(p)
    }
}

/// One bookmaker outcome for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsRow {
    pub event_id: String,
    pub commence_time: String,
    pub home_team: String,
    pub away_team: String,
    pub bookmaker: String,
    pub last_update: Option<String>,
    pub market: String,
    pub outcome: String,
    pub price: f64,
    pub point: Option<f64>,
    pub implied_probability: Option<f64>,
}

impl OddsRow {
    pub fn commence_ts(&self) -> Option<i64> {
        parse_timestamp(&self.commence_time)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OddsSnapshot {
    pub timestamp: Option<String>,
    pub previous_timestamp: Option<String>,
    pub next_timestamp: Option<String>,
    pub rows: Vec<OddsRow>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    timestamp: Option<String>,
    previous_timestamp: Option<String>,
    next_timestamp: Option<String>,
    #[serde(default)]
    data: Vec<OddsEvent>,
}

#[derive(Debug, Deserialize)]
struct OddsEvent {
    id: String,
    commence_time: Option<String>,
    home_team: String,
    away_team: String,
    #[serde(default)]
    bookmakers: Vec<OddsBookmaker>,
}

#[derive(Debug, Deserialize)]
struct OddsBookmaker {
    key: String,
    last_update: Option<String>,
    #[serde(default)]
    markets: Vec<OddsMarket>,
}

#[derive(Debug, Deserialize)]
struct OddsMarket {
    key: String,
    #[serde(default)]
    outcomes: Vec<OddsOutcome>,
}

#[derive(Debug, Deserialize)]
struct OddsOutcome {
    name: String,
    price: f64,
    point: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct HistoryKey {
    date: String,
    markets: String,
    bookmakers: String,
    format: OddsFormat,
}

pub struct OddsApi {
    client: &'static Client,
    base_url: String,
    api_key: String,
    regions: String,
    retries: u32,
    retry_delay: std::time::Duration,
    cache: TtlCache<HistoryKey, OddsSnapshot>,
}

impl OddsApi {
    pub fn from_config(cfg: &WorkbenchConfig) -> Result<Self> {
        let Some(api_key) = cfg.odds_api_key.clone() else {
            return Err(anyhow!("ODDS_API_KEY missing"));
        };
        Ok(Self {
            client: http_client::http_client_with_timeout(cfg.http_timeout)?,
            base_url: cfg.odds_base_url.clone(),
            api_key,
            regions: "us".to_string(),
            retries: cfg.fetch_retries,
            retry_delay: cfg.retry_delay,
            cache: TtlCache::new(cfg.cache_capacity, cfg.cache_ttl),
        })
    }

    /// Snapshot of NBA odds as they stood at `date` (ISO-8601, UTC).
    pub fn historical_odds(
        &self,
        date: &str,
        markets: &[&str],
        bookmakers: &[&str],
        format: OddsFormat,
    ) -> Result<OddsSnapshot> {
        let key = HistoryKey {
            date: date.to_string(),
            markets: markets.join(","),
            bookmakers: bookmakers.join(","),
            format,
        };
        self.cache
            .get_or_try_insert_with(&key, || self.fetch_history(&key))
    }

    fn fetch_history(&self, key: &HistoryKey) -> Result<OddsSnapshot> {
        let url = format!("{}/sports/{SPORT_KEY}/odds-history/", self.base_url);
        let body = retry_fixed(self.retries, self.retry_delay, |attempt| {
            debug!(date = %key.date, attempt, "odds-history");
            let resp = self
                .client
                .get(&url)
                .query(&[
                    ("apiKey", self.api_key.as_str()),
                    ("regions", self.regions.as_str()),
                    ("markets", key.markets.as_str()),
                    ("bookmakers", key.bookmakers.as_str()),
                    ("oddsFormat", key.format.as_param()),
                    ("dateFormat", "iso"),
                    ("date", key.date.as_str()),
                ])
                .header(USER_AGENT, "nba-workbench/0.1")
                .send()
                .context("odds request failed")?;
            let status = resp.status();
            let body = resp.text().context("failed reading odds body")?;
            if !status.is_success() {
                return Err(anyhow!("odds http {}: {}", status, body_snippet(&body)));
            }
            Ok(body)
        })?;

        let snapshot = parse_odds_history(&body, key.format)?;
        info!(date = %key.date, rows = snapshot.rows.len(), "fetched odds snapshot");
        Ok(snapshot)
    }
}

/// Flattens an odds-history payload into one row per bookmaker outcome.
pub fn parse_odds_history(raw: &str, format: OddsFormat) -> Result<OddsSnapshot> {
    let parsed: HistoryResponse = serde_json::from_str(raw).context("invalid odds json")?;
    let mut rows = Vec::new();
    for event in &parsed.data {
        let commence_time = event.commence_time.clone().unwrap_or_default();
        for bookmaker in &event.bookmakers {
            for market in &bookmaker.markets {
                for outcome in &market.outcomes {
                    rows.push(OddsRow {
                        event_id: event.id.clone(),
                        commence_time: commence_time.clone(),
                        home_team: event.home_team.clone(),
                        away_team: event.away_team.clone(),
                        bookmaker: bookmaker.key.clone(),
                        last_update: bookmaker.last_update.clone(),
                        market: market.key.clone(),
                        outcome: outcome.name.clone(),
                        price: outcome.price,
                        point: outcome.point,
                        implied_probability: format.implied_probability(outcome.price),
                    });
                }
            }
        }
    }
    Ok(OddsSnapshot {
        timestamp: parsed.timestamp,
        previous_timestamp: parsed.previous_timestamp,
        next_timestamp: parsed.next_timestamp,
        rows,
    })
}

/// Median implied probability of `team` winning outright across bookmakers.
pub fn consensus_win_probability(rows: &[OddsRow], event_id: &str, team: &str) -> Option<f64> {
    let probs = rows
        .iter()
        .filter(|r| r.event_id == event_id && r.market == "h2h" && r.outcome == team)
        .filter_map(|r| r.implied_probability)
        .collect::<Vec<_>>();
    median_f64(&probs)
}

fn median_f64(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.timestamp());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(Utc.from_utc_datetime(&naive).timestamp());
        }
    }
    None
}

/// Snapshot time for a game day: noon UTC, before any tip-off.
pub fn snapshot_time_for(day: NaiveDate) -> String {
    let noon = day.and_hms_opt(12, 0, 0).unwrap_or_default();
    Utc.from_utc_datetime(&noon)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implied_probability_by_format() {
        let close = |a: Option<f64>, b: f64| a.is_some_and(|a| (a - b).abs() < 1e-12);
        assert!(close(OddsFormat::Decimal.implied_probability(2.0), 0.5));
        assert!(close(OddsFormat::American.implied_probability(150.0), 0.4));
        assert!(close(OddsFormat::American.implied_probability(-150.0), 0.6));
        assert_eq!(OddsFormat::Decimal.implied_probability(0.0), None);
    }

    #[test]
    fn snapshot_time_is_noon_utc() {
        let day = NaiveDate::from_ymd_opt(2023, 1, 15).expect("date");
        assert_eq!(snapshot_time_for(day), "2023-01-15T12:00:00Z");
        assert_eq!(parse_timestamp("2023-01-15T12:00:00Z"), Some(1_673_784_000));
    }

    #[test]
    fn median_of_even_count() {
        let mid = median_f64(&[0.4, 0.6, 0.5, 0.7]).expect("median");
        assert!((mid - 0.55).abs() < 1e-12);
        assert_eq!(median_f64(&[]), None);
    }
}
