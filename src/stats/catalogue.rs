use std::collections::BTreeSet;

use crate::error::StatsError;
use crate::fields::{Counting, CountingSource, Field, FieldMap, Side};

use super::StatParams;
use super::formulas::BoxLine;

/// Independent stats read only the row's own box score; dependent stats also
/// need team totals and/or the opponent's row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    Independent,
    Dependent,
}

pub type Formula = fn(&StatParams, &Obs<'_>) -> f64;

#[derive(Clone)]
pub struct StatDef {
    pub name: &'static str,
    pub kind: StatKind,
    pub requires: Vec<Field>,
    pub formula: Formula,
}

impl std::fmt::Debug for StatDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("requires", &self.requires)
            .finish()
    }
}

impl StatDef {
    pub fn independent(name: &'static str, requires: &[Field], formula: Formula) -> Self {
        Self {
            name,
            kind: StatKind::Independent,
            requires: requires.to_vec(),
            formula,
        }
    }

    pub fn dependent(name: &'static str, requires: &[Field], formula: Formula) -> Self {
        Self {
            name,
            kind: StatKind::Dependent,
            requires: requires.to_vec(),
            formula,
        }
    }

    pub fn needs_opponent(&self) -> bool {
        self.requires.iter().any(|f| f.side == Side::Opp)
    }
}

/// One row of input as seen by a formula. Only the fields the stat declared
/// are visible; everything else reads as NaN.
pub struct Obs<'a> {
    columns: &'a [(Field, &'a [f64])],
    row: usize,
}

impl Obs<'_> {
    pub fn get(&self, field: Field) -> f64 {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, values)| values[self.row])
            .unwrap_or(f64::NAN)
    }

    pub fn own(&self, stat: Counting) -> f64 {
        self.get(Field {
            side: Side::Own,
            stat,
        })
    }

    pub fn team(&self, stat: Counting) -> f64 {
        self.get(Field {
            side: Side::Team,
            stat,
        })
    }

    pub fn opp(&self, stat: Counting) -> f64 {
        self.get(Field {
            side: Side::Opp,
            stat,
        })
    }

    pub fn line(&self, side: Side) -> BoxLine {
        BoxLine::from_source(&SideView { obs: self, side })
    }
}

struct SideView<'a, 'b> {
    obs: &'a Obs<'b>,
    side: Side,
}

impl CountingSource for SideView<'_, '_> {
    fn counting(&self, stat: Counting) -> f64 {
        self.obs.get(Field {
            side: self.side,
            stat,
        })
    }
}

/// A named table of statistics sharing one set of parameters.
#[derive(Debug, Clone)]
pub struct Catalogue {
    name: &'static str,
    params: StatParams,
    defs: Vec<StatDef>,
}

impl Catalogue {
    pub fn new(
        name: &'static str,
        params: StatParams,
        defs: Vec<StatDef>,
    ) -> Result<Self, StatsError> {
        validate(&defs)?;
        Ok(Self { name, params, defs })
    }

    /// Builds a table known to be well formed; [`Catalogue::validate`] is
    /// covered by tests for the built-in tables.
    pub(crate) fn from_table(name: &'static str, params: StatParams, defs: Vec<StatDef>) -> Self {
        Self { name, params, defs }
    }

    pub fn validate(&self) -> Result<(), StatsError> {
        validate(&self.defs)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn params(&self) -> &StatParams {
        &self.params
    }

    pub fn with_params(&self, params: StatParams) -> Self {
        Self {
            name: self.name,
            params,
            defs: self.defs.clone(),
        }
    }

    pub fn defs(&self) -> &[StatDef] {
        &self.defs
    }

    pub fn get(&self, name: &str) -> Option<&StatDef> {
        self.defs.iter().find(|d| d.name == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.defs.iter().map(|d| d.name).collect()
    }

    pub fn of_kind(&self, kind: StatKind) -> impl Iterator<Item = &StatDef> {
        self.defs.iter().filter(move |d| d.kind == kind)
    }

    /// Every input column any stat in the table reads.
    pub fn required_fields(&self) -> BTreeSet<String> {
        self.defs
            .iter()
            .flat_map(|d| d.requires.iter().map(|f| f.name()))
            .collect()
    }

    pub fn independent_required_fields(&self) -> BTreeSet<String> {
        self.of_kind(StatKind::Independent)
            .flat_map(|d| d.requires.iter().map(|f| f.name()))
            .collect()
    }

    pub fn compute_independent(&self, fields: &FieldMap) -> Result<FieldMap, StatsError> {
        let mut out = FieldMap::new();
        for def in self.of_kind(StatKind::Independent) {
            out.insert(def.name, self.evaluate(def, fields)?)?;
        }
        Ok(out)
    }

    /// Dependent stats for rows whose opponent counting stats are given
    /// row-aligned in `opponent`. Team totals (for player tables) are expected
    /// to be merged into `fields` under the `TEAM_` prefix already.
    pub fn compute_dependent(
        &self,
        fields: &FieldMap,
        opponent: Option<&FieldMap>,
    ) -> Result<FieldMap, StatsError> {
        let rows = fields.rows();
        let mut out = FieldMap::new();
        if rows == 0 {
            for def in self.of_kind(StatKind::Dependent) {
                out.insert(def.name, Vec::new())?;
            }
            return Ok(out);
        }

        let mut merged = fields.clone();
        match opponent {
            Some(opp) if opp.rows() == rows => {
                merged.merge_prefixed(Side::Opp.prefix(), opp)?;
            }
            Some(opp) => {
                return Err(StatsError::RowCountMismatch {
                    field: format!("{}*", Side::Opp.prefix()),
                    expected: rows,
                    found: opp.rows(),
                });
            }
            None => {
                if let Some(def) = self.of_kind(StatKind::Dependent).find(|d| d.needs_opponent())
                    && let Some(field) = def.requires.iter().find(|f| f.side == Side::Opp)
                {
                    return Err(StatsError::MissingField {
                        stat: def.name,
                        field: field.name(),
                    });
                }
            }
        }

        for def in self.of_kind(StatKind::Dependent) {
            out.insert(def.name, self.evaluate(def, &merged)?)?;
        }
        Ok(out)
    }

    pub fn compute_all(
        &self,
        fields: &FieldMap,
        opponent: Option<&FieldMap>,
    ) -> Result<FieldMap, StatsError> {
        let mut out = self.compute_independent(fields)?;
        out.extend(self.compute_dependent(fields, opponent)?)?;
        Ok(out)
    }

    /// Runs a single stat by name over `fields`.
    pub fn compute_one(&self, name: &str, fields: &FieldMap) -> Option<Result<Vec<f64>, StatsError>> {
        self.get(name).map(|def| self.evaluate(def, fields))
    }

    fn evaluate(&self, def: &StatDef, fields: &FieldMap) -> Result<Vec<f64>, StatsError> {
        let mut columns = Vec::with_capacity(def.requires.len());
        for field in &def.requires {
            let values = fields
                .get_field(*field)
                .ok_or_else(|| StatsError::MissingField {
                    stat: def.name,
                    field: field.name(),
                })?;
            columns.push((*field, values));
        }

        let rows = fields.rows();
        let mut out = Vec::with_capacity(rows);
        for row in 0..rows {
            let obs = Obs {
                columns: &columns,
                row,
            };
            out.push((def.formula)(&self.params, &obs));
        }
        Ok(out)
    }
}

fn validate(defs: &[StatDef]) -> Result<(), StatsError> {
    let mut seen = BTreeSet::new();
    for def in defs {
        if !seen.insert(def.name) {
            return Err(StatsError::InvalidCatalogue {
                stat: def.name,
                reason: "duplicate name".to_string(),
            });
        }
        if def.requires.is_empty() {
            return Err(StatsError::InvalidCatalogue {
                stat: def.name,
                reason: "declares no input fields".to_string(),
            });
        }
        if def.kind == StatKind::Independent
            && let Some(field) = def.requires.iter().find(|f| f.side != Side::Own)
        {
            return Err(StatsError::InvalidCatalogue {
                stat: def.name,
                reason: format!("independent stat reads {field}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Catalogue, StatDef, StatKind};
    use crate::error::StatsError;
    use crate::fields::{Counting, FieldMap, opp, own};
    use crate::stats::StatParams;

    fn tiny() -> Catalogue {
        Catalogue::new(
            "tiny",
            StatParams::default(),
            vec![
                StatDef::independent("MISSES", &[own(Counting::Fga), own(Counting::Fgm)], |_, o| {
                    o.own(Counting::Fga) - o.own(Counting::Fgm)
                }),
                StatDef::dependent("MARGIN", &[own(Counting::Pts), opp(Counting::Pts)], |_, o| {
                    o.own(Counting::Pts) - o.opp(Counting::Pts)
                }),
            ],
        )
        .expect("valid")
    }

    #[test]
    fn rejects_independent_stat_reading_opponent() {
        let err = Catalogue::new(
            "bad",
            StatParams::default(),
            vec![StatDef::independent("BAD", &[opp(Counting::Pts)], |_, o| {
                o.opp(Counting::Pts)
            })],
        )
        .expect_err("invalid");
        assert!(matches!(err, StatsError::InvalidCatalogue { stat: "BAD", .. }));
    }

    #[test]
    fn rejects_duplicate_names() {
        let def = StatDef::independent("X", &[own(Counting::Pts)], |_, o| o.own(Counting::Pts));
        let err = Catalogue::new("dup", StatParams::default(), vec![def.clone(), def])
            .expect_err("duplicate");
        assert!(matches!(err, StatsError::InvalidCatalogue { stat: "X", .. }));
    }

    #[test]
    fn dependent_without_opponent_names_missing_field() {
        let cat = tiny();
        let fields = FieldMap::scalar([("PTS", 100.0), ("FGA", 80.0), ("FGM", 40.0)]);
        let err = cat.compute_dependent(&fields, None).expect_err("no opponent");
        assert_eq!(
            err,
            StatsError::MissingField {
                stat: "MARGIN",
                field: "OPP_PTS".to_string()
            }
        );

        let opponent = FieldMap::scalar([("PTS", 92.0)]);
        let out = cat.compute_all(&fields, Some(&opponent)).expect("computed");
        assert_eq!(out.value("MARGIN", 0), Some(8.0));
        assert_eq!(out.value("MISSES", 0), Some(40.0));
        assert_eq!(cat.of_kind(StatKind::Dependent).count(), 1);
    }

    #[test]
    fn undeclared_fields_read_as_nan() {
        let cat = Catalogue::new(
            "leaky",
            StatParams::default(),
            vec![StatDef::independent("LEAK", &[own(Counting::Fga)], |_, o| {
                o.own(Counting::Fgm)
            })],
        )
        .expect("valid");
        let fields = FieldMap::scalar([("FGA", 80.0), ("FGM", 40.0)]);
        let out = cat.compute_independent(&fields).expect("computed");
        assert!(out.value("LEAK", 0).is_some_and(f64::is_nan));
    }
}
