use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::fields::{Counting, CountingSource};
use crate::stats::formulas::BoxLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeasonType {
    PreSeason,
    RegularSeason,
    PlayIn,
    Playoffs,
}

impl SeasonType {
    pub const ALL: [SeasonType; 4] = [
        SeasonType::PreSeason,
        SeasonType::RegularSeason,
        SeasonType::PlayIn,
        SeasonType::Playoffs,
    ];

    /// Value of the stats API `SeasonTypeNullable` parameter.
    pub fn api_name(self) -> &'static str {
        match self {
            SeasonType::PreSeason => "Pre Season",
            SeasonType::RegularSeason => "Regular Season",
            SeasonType::PlayIn => "PlayIn",
            SeasonType::Playoffs => "Playoffs",
        }
    }

    /// Directory name: the API name without spaces.
    pub fn dir_name(self) -> String {
        self.api_name().replace(' ', "")
    }

    pub fn parse(raw: &str) -> Option<SeasonType> {
        let wanted = raw.trim().replace([' ', '-', '_'], "").to_ascii_lowercase();
        SeasonType::ALL
            .into_iter()
            .find(|t| t.dir_name().to_ascii_lowercase() == wanted)
    }
}

/// A team game log row exactly as the stats API hands it over: every counting
/// stat may be missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawTeamGame {
    pub season_id: String,
    pub team_id: i64,
    pub team_abbreviation: String,
    pub team_name: String,
    pub game_id: String,
    pub game_date: String,
    pub matchup: String,
    pub wl: Option<String>,
    pub counts: BTreeMap<Counting, f64>,
    pub plus_minus: Option<f64>,
}

impl RawTeamGame {
    pub fn count(&self, stat: Counting) -> Option<f64> {
        self.counts.get(&stat).copied().filter(|v| v.is_finite())
    }

    pub fn missing(&self) -> Vec<Counting> {
        Counting::ALL
            .into_iter()
            .filter(|stat| self.count(*stat).is_none())
            .collect()
    }
}

/// One team's side of one game after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxScoreRow {
    pub season_id: String,
    pub team_id: i64,
    pub team_abbreviation: String,
    pub team_name: String,
    pub game_id: String,
    pub game_date: NaiveDate,
    pub matchup: String,
    pub opponent_abbreviation: String,
    pub home: bool,
    pub win: bool,
    pub rest_days: Option<i64>,
    pub line: BoxLine,
}

impl BoxScoreRow {
    /// Season start year, taken from the trailing four digits of `SEASON_ID`
    /// (`22019` is the 2019-20 regular season).
    pub fn season(&self) -> Option<i32> {
        season_from_id(&self.season_id)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_line(&self.line)
    }
}

impl CountingSource for BoxScoreRow {
    fn counting(&self, stat: Counting) -> f64 {
        self.line.counting(stat)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerGameRow {
    pub player_id: i64,
    pub player_name: String,
    pub team_id: i64,
    pub game_id: String,
    pub line: BoxLine,
}

impl PlayerGameRow {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_line(&self.line)
    }
}

impl CountingSource for PlayerGameRow {
    fn counting(&self, stat: Counting) -> f64 {
        self.line.counting(stat)
    }
}

pub fn season_from_id(season_id: &str) -> Option<i32> {
    let digits = season_id.trim();
    if digits.len() < 4 {
        return None;
    }
    digits
        .get(digits.len() - 4..)
        .and_then(|tail| tail.parse::<i32>().ok())
}

/// `2019` -> `"2019-20"`.
pub fn season_label(start_year: i32) -> String {
    format!("{start_year}-{:02}", (start_year + 1).rem_euclid(100))
}

const MAKES_ATTEMPTS: [(Counting, Counting); 4] = [
    (Counting::Fgm, Counting::Fga),
    (Counting::Fg3m, Counting::Fg3a),
    (Counting::Ftm, Counting::Fta),
    (Counting::Fg3m, Counting::Fgm),
];

pub fn validate_line(line: &BoxLine) -> Result<(), ValidationError> {
    for stat in Counting::ALL {
        let value = line.counting(stat);
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidCount {
                field: stat.column(),
                value,
            });
        }
    }
    if line.fta == 0.0 && line.ftm > 0.0 {
        return Err(ValidationError::FreeThrowsWithoutAttempts(line.ftm));
    }
    for (makes, attempts) in MAKES_ATTEMPTS {
        let made = line.counting(makes);
        let attempted = line.counting(attempts);
        if made > attempted {
            return Err(ValidationError::MakesExceedAttempts {
                makes: makes.column(),
                attempts: attempts.column(),
                made,
                attempted,
            });
        }
    }
    if line.fg3a > line.fga {
        return Err(ValidationError::MakesExceedAttempts {
            makes: Counting::Fg3a.column(),
            attempts: Counting::Fga.column(),
            made: line.fg3a,
            attempted: line.fga,
        });
    }
    if (line.reb - (line.oreb + line.dreb)).abs() > 1e-6 {
        return Err(ValidationError::ReboundMismatch {
            reb: line.reb,
            oreb: line.oreb,
            dreb: line.dreb,
        });
    }
    if line.mp <= 0.0 {
        return Err(ValidationError::NonPositiveMinutes(line.mp));
    }
    Ok(())
}
