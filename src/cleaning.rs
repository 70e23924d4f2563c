use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::box_score::{BoxScoreRow, RawTeamGame};
use crate::error::CleaningError;
use crate::fields::Counting;
use crate::stats::formulas::BoxLine;

const REFERENCE_BOXSCORE_URL: &str = "https://www.basketball-reference.com/boxscores";

/// Franchise codes that show up in old game logs under a different spelling.
const LEGACY_ABBREVIATIONS: [(&str, &str); 2] = [("GOS", "GSW"), ("UTH", "UTA")];

pub fn normalize_abbreviation(abbreviation: &str) -> String {
    let trimmed = abbreviation.trim();
    LEGACY_ABBREVIATIONS
        .iter()
        .find(|(old, _)| *old == trimmed)
        .map(|(_, new)| new.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matchup {
    pub team: String,
    pub opponent: String,
    pub home: bool,
}

/// `"LAL vs. BOS"` is a Lakers home game, `"LAL @ BOS"` an away game.
pub fn split_matchup(matchup: &str) -> Result<Matchup, CleaningError> {
    let (parts, home) = if let Some((team, opponent)) = matchup.split_once('@') {
        ((team, opponent), false)
    } else if let Some((team, opponent)) = matchup.split_once("vs.") {
        ((team, opponent), true)
    } else {
        return Err(CleaningError::BadMatchup(matchup.to_string()));
    };
    let team = normalize_abbreviation(parts.0);
    let opponent = normalize_abbreviation(parts.1);
    if team.is_empty() || opponent.is_empty() {
        return Err(CleaningError::BadMatchup(matchup.to_string()));
    }
    Ok(Matchup {
        team,
        opponent,
        home,
    })
}

pub fn parse_game_date(raw: &str) -> Result<NaiveDate, CleaningError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(ts.date());
    }
    NaiveDate::parse_from_str(raw, "%b %d, %Y")
        .map_err(|_| CleaningError::BadDate(raw.to_string()))
}

/// Hand-entered values for box-score cells the stats provider left empty,
/// keyed team id -> game id -> column -> value. Persisted as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImputationOverrides {
    teams: BTreeMap<i64, BTreeMap<String, BTreeMap<String, f64>>>,
}

impl ImputationOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn get(&self, team_id: i64, game_id: &str, stat: Counting) -> Option<f64> {
        self.teams
            .get(&team_id)
            .and_then(|games| games.get(game_id))
            .and_then(|cells| cells.get(stat.column()))
            .copied()
    }

    pub fn set(&mut self, team_id: i64, game_id: &str, stat: Counting, value: f64) {
        self.teams
            .entry(team_id)
            .or_default()
            .entry(game_id.to_string())
            .or_default()
            .insert(stat.column().to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.teams
            .values()
            .flat_map(|games| games.values())
            .map(|cells| cells.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fills only the cells that are missing; reported values always win.
    pub fn apply(&self, game: &mut RawTeamGame) -> usize {
        let mut filled = 0;
        for stat in game.missing() {
            if let Some(value) = self.get(game.team_id, &game.game_id, stat) {
                game.counts.insert(stat, value);
                filled += 1;
            }
        }
        filled
    }
}

/// A game that still lacks counting stats after overrides were applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unresolved {
    pub team_id: i64,
    pub team_name: String,
    pub game_id: String,
    pub game_date: String,
    pub matchup: String,
    pub missing: Vec<Counting>,
    /// Box score page where the values can be looked up.
    pub reference_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub team_id: i64,
    pub game_id: String,
    pub reason: CleaningError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanReport {
    pub rows: Vec<BoxScoreRow>,
    pub unresolved: Vec<Unresolved>,
    pub rejected: Vec<Rejected>,
    pub imputed_cells: usize,
}

impl CleanReport {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty() && self.rejected.is_empty()
    }

    fn reject(&mut self, game: &RawTeamGame, reason: CleaningError) {
        self.rejected.push(Rejected {
            team_id: game.team_id,
            game_id: game.game_id.clone(),
            reason,
        });
    }
}

/// Basketball-Reference keys box score pages by the home team only.
pub fn reference_url(game_date: NaiveDate, matchup: &Matchup) -> String {
    let home = if matchup.home { &matchup.team } else { &matchup.opponent };
    format!("{REFERENCE_BOXSCORE_URL}/{}0{home}.html", game_date.format("%Y%m%d"))
}

/// Turns raw game logs into validated rows: normalizes abbreviations, derives
/// home/win flags, fills gaps from `overrides`, sorts by date and computes
/// rest days. Rows that cannot be completed are reported, not dropped silently.
pub fn clean_team_games(raw: &[RawTeamGame], overrides: &ImputationOverrides) -> CleanReport {
    let mut report = CleanReport::default();

    for game in raw {
        let mut game = game.clone();
        let matchup_text = normalize_matchup(&game.matchup);
        let matchup = match split_matchup(&matchup_text) {
            Ok(m) => m,
            Err(reason) => {
                report.reject(&game, reason);
                continue;
            }
        };
        let game_date = match parse_game_date(&game.game_date) {
            Ok(d) => d,
            Err(reason) => {
                report.reject(&game, reason);
                continue;
            }
        };

        report.imputed_cells += overrides.apply(&mut game);
        let missing = game.missing();
        if !missing.is_empty() {
            debug!(
                team_id = game.team_id,
                game_id = %game.game_id,
                missing = missing.len(),
                "game still has empty cells"
            );
            report.unresolved.push(Unresolved {
                team_id: game.team_id,
                team_name: game.team_name.clone(),
                game_id: game.game_id.clone(),
                game_date: game.game_date.clone(),
                matchup: matchup_text,
                missing,
                reference_url: reference_url(game_date, &matchup),
            });
            continue;
        }

        let mut line = BoxLine::default();
        for stat in Counting::ALL {
            line.set(stat, game.count(stat).unwrap_or_default());
        }
        let row = BoxScoreRow {
            season_id: game.season_id.clone(),
            team_id: game.team_id,
            team_abbreviation: normalize_abbreviation(&game.team_abbreviation),
            team_name: game.team_name.clone(),
            game_id: game.game_id.clone(),
            game_date,
            matchup: matchup_text,
            opponent_abbreviation: matchup.opponent,
            home: matchup.home,
            win: game.wl.as_deref().map(str::trim) == Some("W"),
            rest_days: None,
            line,
        };
        if let Err(err) = row.validate() {
            report.reject(&game, err.into());
            continue;
        }
        report.rows.push(row);
    }

    report
        .rows
        .sort_by(|a, b| a.game_date.cmp(&b.game_date).then(a.game_id.cmp(&b.game_id)));
    assign_rest_days(&mut report.rows);

    if !report.rejected.is_empty() {
        warn!(rejected = report.rejected.len(), "dropped invalid game rows");
    }
    report
}

fn normalize_matchup(matchup: &str) -> String {
    let mut out = matchup.trim().to_string();
    for (old, new) in LEGACY_ABBREVIATIONS {
        out = out.replace(old, new);
    }
    out
}

/// Days since the same team's previous game in the same season; `None` for
/// its first game. Expects `rows` sorted by date.
pub fn assign_rest_days(rows: &mut [BoxScoreRow]) {
    let mut last_seen: HashMap<(i64, String), NaiveDate> = HashMap::new();
    for row in rows.iter_mut() {
        let key = (row.team_id, row.season_id.clone());
        row.rest_days = last_seen
            .get(&key)
            .map(|prev| (row.game_date - *prev).num_days());
        last_seen.insert(key, row.game_date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matchup_direction_sets_home_flag() {
        let home = split_matchup("LAL vs. BOS").expect("home");
        assert!(home.home);
        assert_eq!(home.opponent, "BOS");
        let away = split_matchup("GOS @ UTH").expect("away");
        assert!(!away.home);
        assert_eq!(away.team, "GSW");
        assert_eq!(away.opponent, "UTA");
        assert!(split_matchup("LAL - BOS").is_err());
    }

    #[test]
    fn game_dates_in_both_formats() {
        let want = NaiveDate::from_ymd_opt(2019, 10, 22).expect("date");
        assert_eq!(parse_game_date("2019-10-22").ok(), Some(want));
        assert_eq!(parse_game_date("OCT 22, 2019").ok(), Some(want));
        assert!(parse_game_date("yesterday").is_err());
    }

    #[test]
    fn overrides_fill_only_missing_cells() {
        let mut overrides = ImputationOverrides::new();
        overrides.set(1, "g1", Counting::Oreb, 11.0);
        overrides.set(1, "g1", Counting::Pts, 1.0);
        let mut game = RawTeamGame {
            team_id: 1,
            game_id: "g1".to_string(),
            ..RawTeamGame::default()
        };
        game.counts.insert(Counting::Pts, 101.0);
        let filled = overrides.apply(&mut game);
        assert_eq!(filled, 1);
        assert_eq!(game.count(Counting::Oreb), Some(11.0));
        assert_eq!(game.count(Counting::Pts), Some(101.0));
        assert_eq!(overrides.len(), 2);
    }

    #[test]
    fn overrides_round_trip_through_json() {
        let raw = r#"{"1610612744": {"0021900001": {"OREB": 9.0}}}"#;
        let overrides = ImputationOverrides::from_json(raw).expect("json");
        assert_eq!(overrides.get(1610612744, "0021900001", Counting::Oreb), Some(9.0));
    }
}
