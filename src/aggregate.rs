use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::box_score::BoxScoreRow;
use crate::error::StatsError;
use crate::fields::FieldMap;
use crate::stats::Catalogue;
use crate::stats::formulas::BoxLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Every earlier game of the season.
    Expanding,
    /// The last `n` earlier games; nothing until `n` are available.
    Rolling(usize),
}

/// What a team looked like going into a game, from its earlier games only.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorForm {
    pub games: usize,
    pub totals: BoxLine,
    pub mean: BoxLine,
    /// Independent catalogue stats over `totals`, so rates are weighted by
    /// volume rather than averaged per game.
    pub rates: BTreeMap<String, f64>,
}

/// Per-row pre-game aggregates, aligned with `rows`. Games are grouped by
/// (season, team) and ordered by date inside each group; the game itself never
/// contributes to its own aggregate.
pub fn prior_aggregates(
    rows: &[BoxScoreRow],
    window: Window,
    catalogue: &Catalogue,
) -> Result<Vec<Option<PriorForm>>, StatsError> {
    let mut groups: HashMap<(&str, i64), Vec<usize>> = HashMap::new();
    for (idx, row) in rows.iter().enumerate() {
        groups
            .entry((row.season_id.as_str(), row.team_id))
            .or_default()
            .push(idx);
    }

    let mut partial: Vec<Option<(usize, BoxLine)>> = vec![None; rows.len()];
    for indices in groups.values_mut() {
        indices.sort_by_key(|&i| (rows[i].game_date, rows[i].game_id.clone()));
        for (pos, &idx) in indices.iter().enumerate() {
            let start = match window {
                Window::Expanding => 0,
                Window::Rolling(n) => {
                    if n == 0 || pos < n {
                        continue;
                    }
                    pos - n
                }
            };
            if pos == 0 {
                continue;
            }
            let totals = indices[start..pos]
                .iter()
                .fold(BoxLine::default(), |acc, &i| acc.add(&rows[i].line));
            partial[idx] = Some((pos - start, totals));
        }
    }

    let summed = partial.iter().flatten().map(|(_, t)| *t).collect::<Vec<_>>();
    let rates = catalogue.compute_independent(&FieldMap::from_rows(&summed))?;

    let mut next = 0;
    Ok(partial
        .into_iter()
        .map(|slot| {
            slot.map(|(games, totals)| {
                let row_rates = rates
                    .iter()
                    .map(|(name, values)| (name.to_string(), values[next]))
                    .collect();
                next += 1;
                PriorForm {
                    games,
                    totals,
                    mean: totals.scale(1.0 / games as f64),
                    rates: row_rates,
                }
            })
        })
        .collect())
}

/// Standard standings formula: half the sum of the win gap and the loss gap.
pub fn games_behind(team_wins: u32, team_losses: u32, leader_wins: u32, leader_losses: u32) -> f64 {
    ((leader_wins as f64 - team_wins as f64) + (team_losses as f64 - leader_losses as f64)) / 2.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub team_id: i64,
    pub team_abbreviation: String,
    pub wins: u32,
    pub losses: u32,
    pub win_pct: f64,
    pub games_behind: f64,
}

/// Standings for one season from cleaned rows, counting games played on or
/// before `through` when given.
pub fn standings(rows: &[BoxScoreRow], season_id: &str, through: Option<NaiveDate>) -> Vec<Standing> {
    let mut records: BTreeMap<i64, (String, u32, u32)> = BTreeMap::new();
    for row in rows {
        if row.season_id != season_id || through.is_some_and(|d| row.game_date > d) {
            continue;
        }
        let entry = records
            .entry(row.team_id)
            .or_insert_with(|| (row.team_abbreviation.clone(), 0, 0));
        if row.win {
            entry.1 += 1;
        } else {
            entry.2 += 1;
        }
    }

    let Some((leader_wins, leader_losses)) = records
        .values()
        .map(|(_, w, l)| (*w, *l))
        .max_by_key(|(w, l)| *w as i64 - *l as i64)
    else {
        return Vec::new();
    };

    let mut out = records
        .into_iter()
        .map(|(team_id, (team_abbreviation, wins, losses))| Standing {
            team_id,
            team_abbreviation,
            wins,
            losses,
            win_pct: crate::stats::formulas::ratio(wins as f64, (wins + losses) as f64),
            games_behind: games_behind(wins, losses, leader_wins, leader_losses),
        })
        .collect::<Vec<_>>();
    out.sort_by(|a, b| {
        a.games_behind
            .total_cmp(&b.games_behind)
            .then(b.win_pct.total_cmp(&a.win_pct))
    });
    out
}
