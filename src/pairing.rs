use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::box_score::{BoxScoreRow, PlayerGameRow};
use crate::error::StatsError;
use crate::fields::{FieldMap, Side};
use crate::stats::Catalogue;

/// One team's row together with the row of the team it played.
#[derive(Debug, Clone, PartialEq)]
pub struct GamePair {
    pub team: BoxScoreRow,
    pub opponent: BoxScoreRow,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pairing {
    pub pairs: Vec<GamePair>,
    /// Rows whose game did not hold exactly two distinct teams.
    pub unmatched: Vec<BoxScoreRow>,
}

/// Matches every row to its opponent by (season, game id, date). Each game
/// yields two pairs, one from either side, in date order.
pub fn pair_with_opponents(rows: &[BoxScoreRow]) -> Pairing {
    let mut games: BTreeMap<(NaiveDate, String, String), Vec<&BoxScoreRow>> = BTreeMap::new();
    for row in rows {
        let key = (row.game_date, row.season_id.clone(), row.game_id.clone());
        let entry = games.entry(key).or_default();
        // the same game can arrive twice when team files overlap
        if !entry.iter().any(|r| r.team_id == row.team_id) {
            entry.push(row);
        }
    }

    let mut out = Pairing::default();
    for (_, sides) in games {
        match sides.as_slice() {
            [a, b] => {
                out.pairs.push(GamePair {
                    team: (*a).clone(),
                    opponent: (*b).clone(),
                });
                out.pairs.push(GamePair {
                    team: (*b).clone(),
                    opponent: (*a).clone(),
                });
            }
            other => out.unmatched.extend(other.iter().map(|r| (*r).clone())),
        }
    }
    out
}

pub fn team_and_opponent_fields(pairs: &[GamePair]) -> (FieldMap, FieldMap) {
    let team = pairs.iter().map(|p| p.team.clone()).collect::<Vec<_>>();
    let opponent = pairs.iter().map(|p| p.opponent.clone()).collect::<Vec<_>>();
    (FieldMap::from_rows(&team), FieldMap::from_rows(&opponent))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameKey {
    pub season_id: String,
    pub game_id: String,
    pub game_date: NaiveDate,
    pub team_id: i64,
    pub opponent_id: i64,
    pub home: bool,
    pub win: bool,
}

impl GameKey {
    fn from_pair(pair: &GamePair) -> Self {
        Self {
            season_id: pair.team.season_id.clone(),
            game_id: pair.team.game_id.clone(),
            game_date: pair.team.game_date,
            team_id: pair.team.team_id,
            opponent_id: pair.opponent.team_id,
            home: pair.team.home,
            win: pair.team.win,
        }
    }
}

/// Row-aligned identifiers and numeric columns (counting stats plus every
/// catalogue stat).
#[derive(Debug, Clone, PartialEq)]
pub struct TeamGameStats {
    pub keys: Vec<GameKey>,
    pub stats: FieldMap,
}

pub fn compute_team_game_stats(
    pairs: &[GamePair],
    catalogue: &Catalogue,
) -> Result<TeamGameStats, StatsError> {
    let (mut team, opponent) = team_and_opponent_fields(pairs);
    let derived = catalogue.compute_all(&team, Some(&opponent))?;
    team.extend(derived)?;
    Ok(TeamGameStats {
        keys: pairs.iter().map(GameKey::from_pair).collect(),
        stats: team,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerGameStats {
    pub players: Vec<(i64, String, String)>,
    pub stats: FieldMap,
    /// Player rows whose team/game was not among the pairs.
    pub skipped: usize,
}

/// Player catalogue over `players`, with team totals and opponent rows taken
/// from the matching pair.
pub fn compute_player_game_stats(
    players: &[PlayerGameRow],
    pairs: &[GamePair],
    catalogue: &Catalogue,
) -> Result<PlayerGameStats, StatsError> {
    let by_team_game: HashMap<(i64, &str), &GamePair> = pairs
        .iter()
        .map(|p| ((p.team.team_id, p.team.game_id.as_str()), p))
        .collect();

    let mut kept = Vec::new();
    let mut teams = Vec::new();
    let mut opponents = Vec::new();
    for player in players {
        let Some(pair) = by_team_game.get(&(player.team_id, player.game_id.as_str())) else {
            continue;
        };
        kept.push(player.clone());
        teams.push(pair.team.clone());
        opponents.push(pair.opponent.clone());
    }

    let mut fields = FieldMap::from_rows(&kept);
    fields.merge_prefixed(Side::Team.prefix(), &FieldMap::from_rows(&teams))?;
    let opponent = FieldMap::from_rows(&opponents);
    let derived = catalogue.compute_all(&fields, Some(&opponent))?;

    let mut stats = FieldMap::from_rows(&kept);
    stats.extend(derived)?;
    Ok(PlayerGameStats {
        players: kept
            .iter()
            .map(|p| (p.player_id, p.player_name.clone(), p.game_id.clone()))
            .collect(),
        stats,
        skipped: players.len() - kept.len(),
    })
}
