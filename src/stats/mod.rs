//! Box-score and advanced basketball statistics.
//!
//! `formulas` holds the pure arithmetic, `catalogue` the name -> formula table
//! machinery, and `team` / `player` the two concrete tables.

pub mod catalogue;
pub mod formulas;
pub mod player;
pub mod team;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub use catalogue::{Catalogue, Obs, StatDef, StatKind};

pub const DEFAULT_FREE_THROW_WEIGHT: f64 = 0.44;
// Morey: 13.91; Hollinger: 16.5
pub const DEFAULT_PYTHAGOREAN_EXPONENT: f64 = 13.91;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FourFactorWeights {
    pub shooting: f64,
    pub turnover: f64,
    pub rebounding: f64,
    pub free_throw: f64,
}

impl Default for FourFactorWeights {
    fn default() -> Self {
        Self {
            shooting: 0.40,
            turnover: 0.25,
            rebounding: 0.20,
            free_throw: 0.15,
        }
    }
}

impl FourFactorWeights {
    pub fn total(&self) -> f64 {
        self.shooting + self.turnover + self.rebounding + self.free_throw
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatParams {
    /// Share of free-throw attempts counted as one shot-equivalent possession.
    pub free_throw_weight: f64,
    pub pythagorean_exponent: f64,
    pub four_factors: FourFactorWeights,
}

impl Default for StatParams {
    fn default() -> Self {
        Self {
            free_throw_weight: DEFAULT_FREE_THROW_WEIGHT,
            pythagorean_exponent: DEFAULT_PYTHAGOREAN_EXPONENT,
            four_factors: FourFactorWeights::default(),
        }
    }
}

pub static TEAM_STATS: Lazy<Catalogue> = Lazy::new(|| team::catalogue(StatParams::default()));

pub static PLAYER_STATS: Lazy<Catalogue> =
    Lazy::new(|| player::catalogue(StatParams::default()));
