use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Raw box-score counting stats, named the way the NBA stats API names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Counting {
    Pts,
    Fgm,
    Fga,
    Fg3m,
    Fg3a,
    Ftm,
    Fta,
    Oreb,
    Dreb,
    Reb,
    Ast,
    Stl,
    Blk,
    Tov,
    Pf,
    Mp,
}

impl Counting {
    pub const ALL: [Counting; 16] = [
        Counting::Pts,
        Counting::Fgm,
        Counting::Fga,
        Counting::Fg3m,
        Counting::Fg3a,
        Counting::Ftm,
        Counting::Fta,
        Counting::Oreb,
        Counting::Dreb,
        Counting::Reb,
        Counting::Ast,
        Counting::Stl,
        Counting::Blk,
        Counting::Tov,
        Counting::Pf,
        Counting::Mp,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Counting::Pts => "PTS",
            Counting::Fgm => "FGM",
            Counting::Fga => "FGA",
            Counting::Fg3m => "FG3M",
            Counting::Fg3a => "FG3A",
            Counting::Ftm => "FTM",
            Counting::Fta => "FTA",
            Counting::Oreb => "OREB",
            Counting::Dreb => "DREB",
            Counting::Reb => "REB",
            Counting::Ast => "AST",
            Counting::Stl => "STL",
            Counting::Blk => "BLK",
            Counting::Tov => "TOV",
            Counting::Pf => "PF",
            Counting::Mp => "MP",
        }
    }

    pub fn from_column(name: &str) -> Option<Counting> {
        Counting::ALL.into_iter().find(|c| c.column() == name)
    }
}

/// Whose numbers a field refers to: the row itself, its team totals, or the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Own,
    Team,
    Opp,
}

impl Side {
    pub fn prefix(self) -> &'static str {
        match self {
            Side::Own => "",
            Side::Team => "TEAM_",
            Side::Opp => "OPP_",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Field {
    pub side: Side,
    pub stat: Counting,
}

impl Field {
    pub fn name(self) -> String {
        format!("{}{}", self.side.prefix(), self.stat.column())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.side.prefix(), self.stat.column())
    }
}

pub const fn own(stat: Counting) -> Field {
    Field {
        side: Side::Own,
        stat,
    }
}

pub const fn team(stat: Counting) -> Field {
    Field {
        side: Side::Team,
        stat,
    }
}

pub const fn opp(stat: Counting) -> Field {
    Field {
        side: Side::Opp,
        stat,
    }
}

/// Anything that can hand out box-score counting stats for one row.
pub trait CountingSource {
    fn counting(&self, stat: Counting) -> f64;
}

/// Columnar name -> values table. Every column has the same number of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    columns: BTreeMap<String, Vec<f64>>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-row map from name/value pairs.
    pub fn scalar<'a>(values: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let columns = values
            .into_iter()
            .map(|(name, value)| (name.to_string(), vec![value]))
            .collect();
        Self { columns }
    }

    pub fn from_rows<R: CountingSource>(rows: &[R]) -> Self {
        let mut columns = BTreeMap::new();
        for stat in Counting::ALL {
            let values = rows.iter().map(|r| r.counting(stat)).collect::<Vec<_>>();
            columns.insert(stat.column().to_string(), values);
        }
        Self { columns }
    }

    pub fn rows(&self) -> usize {
        self.columns.values().next().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<(), StatsError> {
        let name = name.into();
        if let Some(expected) = self.columns.values().next().map(|c| c.len()) {
            let replacing_only_column = self.columns.len() == 1 && self.columns.contains_key(&name);
            if values.len() != expected && !replacing_only_column {
                return Err(StatsError::RowCountMismatch {
                    field: name,
                    expected,
                    found: values.len(),
                });
            }
        }
        self.columns.insert(name, values);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|c| c.as_slice())
    }

    pub fn get_field(&self, field: Field) -> Option<&[f64]> {
        self.get(&field.name())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        self.columns.get(name).and_then(|c| c.get(row)).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Copies every column of `other` in under `prefix` (e.g. `OPP_FGA`).
    pub fn merge_prefixed(&mut self, prefix: &str, other: &FieldMap) -> Result<(), StatsError> {
        for (name, values) in &other.columns {
            self.insert(format!("{prefix}{name}"), values.clone())?;
        }
        Ok(())
    }

    pub fn extend(&mut self, other: FieldMap) -> Result<(), StatsError> {
        for (name, values) in other.columns {
            self.insert(name, values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Counting, FieldMap, opp, own, team};
    use crate::error::StatsError;

    #[test]
    fn field_names_carry_side_prefix() {
        assert_eq!(own(Counting::Fg3m).name(), "FG3M");
        assert_eq!(team(Counting::Mp).name(), "TEAM_MP");
        assert_eq!(opp(Counting::Dreb).name(), "OPP_DREB");
        assert_eq!(Counting::from_column("TOV"), Some(Counting::Tov));
        assert_eq!(Counting::from_column("PLUS_MINUS"), None);
    }

    #[test]
    fn insert_rejects_ragged_columns() {
        let mut map = FieldMap::new();
        map.insert("FGA", vec![20.0, 30.0]).expect("first column");
        let err = map.insert("FGM", vec![10.0]).expect_err("ragged");
        assert_eq!(
            err,
            StatsError::RowCountMismatch {
                field: "FGM".to_string(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn merge_prefixed_renames_columns() {
        let mut map = FieldMap::scalar([("FGA", 80.0)]);
        let other = FieldMap::scalar([("DREB", 33.0)]);
        map.merge_prefixed("OPP_", &other).expect("same rows");
        assert_eq!(map.value("OPP_DREB", 0), Some(33.0));
        assert_eq!(map.rows(), 1);
    }
}
