use crate::fields::Counting::{Dreb, Fg3a, Fg3m, Fga, Fgm, Fta, Ftm, Mp, Oreb, Pts, Reb, Tov};
use crate::fields::{Field, Side, opp, own};

use super::catalogue::{Catalogue, StatDef};
use super::formulas as f;
use super::StatParams;

/// Shooting and possession stats shared by the team and player tables.
pub(super) fn box_score_defs() -> Vec<StatDef> {
    vec![
        StatDef::independent("FG_PCT", &[own(Fgm), own(Fga)], |_, o| {
            f::shooting_pct(o.own(Fgm), o.own(Fga))
        }),
        StatDef::independent("FT_PCT", &[own(Ftm), own(Fta)], |_, o| {
            f::shooting_pct(o.own(Ftm), o.own(Fta))
        }),
        StatDef::independent("FG2M", &[own(Fgm), own(Fg3m)], |_, o| {
            f::two_point_makes(o.own(Fgm), o.own(Fg3m))
        }),
        StatDef::independent("FG2A", &[own(Fga), own(Fg3a)], |_, o| {
            f::two_point_attempts(o.own(Fga), o.own(Fg3a))
        }),
        StatDef::independent(
            "FG2_PCT",
            &[own(Fgm), own(Fg3m), own(Fga), own(Fg3a)],
            |_, o| {
                f::shooting_pct(
                    f::two_point_makes(o.own(Fgm), o.own(Fg3m)),
                    f::two_point_attempts(o.own(Fga), o.own(Fg3a)),
                )
            },
        ),
        StatDef::independent("2PAr", &[own(Fga), own(Fg3a)], |_, o| {
            f::attempt_rate(f::two_point_attempts(o.own(Fga), o.own(Fg3a)), o.own(Fga))
        }),
        StatDef::independent("FG3_PCT", &[own(Fg3m), own(Fg3a)], |_, o| {
            f::shooting_pct(o.own(Fg3m), o.own(Fg3a))
        }),
        StatDef::independent("3PAr", &[own(Fg3a), own(Fga)], |_, o| {
            f::attempt_rate(o.own(Fg3a), o.own(Fga))
        }),
        StatDef::independent("eFG_PCT", &[own(Fgm), own(Fg3m), own(Fga)], |_, o| {
            f::effective_fg_pct(o.own(Fgm), o.own(Fg3m), o.own(Fga))
        }),
        StatDef::independent("TSA", &[own(Fga), own(Fta)], |p, o| {
            f::true_shooting_attempts(o.own(Fga), o.own(Fta), p.free_throw_weight)
        }),
        StatDef::independent("TS_PCT", &[own(Pts), own(Fga), own(Fta)], |p, o| {
            f::true_shooting_pct(o.own(Pts), o.own(Fga), o.own(Fta), p.free_throw_weight)
        }),
        StatDef::independent("MINOR_POSS", &[own(Fga), own(Fta), own(Tov)], |p, o| {
            f::minor_possessions(o.own(Fga), o.own(Fta), o.own(Tov), p.free_throw_weight)
        }),
        StatDef::independent(
            "MAJOR_POSS",
            &[own(Fga), own(Fta), own(Tov), own(Oreb)],
            |p, o| {
                f::major_possessions(
                    o.own(Fga),
                    o.own(Fta),
                    o.own(Tov),
                    o.own(Oreb),
                    p.free_throw_weight,
                )
            },
        ),
        StatDef::independent(
            "ESPN_POSS",
            &[own(Fga), own(Fta), own(Tov), own(Oreb)],
            |p, o| {
                f::espn_possessions(
                    o.own(Fga),
                    o.own(Fta),
                    o.own(Tov),
                    o.own(Oreb),
                    p.free_throw_weight,
                )
            },
        ),
    ]
}

const POSSESSION_FIELDS: [Field; 14] = [
    own(Fga),
    own(Fgm),
    own(Fta),
    own(Oreb),
    own(Dreb),
    own(Tov),
    own(Mp),
    opp(Fga),
    opp(Fgm),
    opp(Fta),
    opp(Oreb),
    opp(Dreb),
    opp(Tov),
    opp(Mp),
];

fn with_possessions(extra: &[Field]) -> Vec<Field> {
    let mut fields = POSSESSION_FIELDS.to_vec();
    fields.extend_from_slice(extra);
    fields
}

pub fn catalogue(params: StatParams) -> Catalogue {
    let mut defs = box_score_defs();
    defs.extend([
        StatDef::independent("TOV_PCT", &[own(Fga), own(Fta), own(Tov)], |p, o| {
            f::turnover_pct(o.own(Fga), o.own(Fta), o.own(Tov), p.free_throw_weight)
        }),
        StatDef::independent("SHOOTING_FACTOR", &[own(Fgm), own(Fg3m), own(Fga)], |_, o| {
            f::effective_fg_pct(o.own(Fgm), o.own(Fg3m), o.own(Fga))
        }),
        StatDef::independent("TOV_FACTOR", &[own(Fga), own(Fta), own(Tov)], |p, o| {
            f::turnover_pct(o.own(Fga), o.own(Fta), o.own(Tov), p.free_throw_weight)
        }),
        StatDef::independent("FT_FACTOR", &[own(Ftm), own(Fga)], |_, o| {
            f::free_throw_factor(o.own(Ftm), o.own(Fga))
        }),
        StatDef::dependent("PLUS_MINUS", &[own(Pts), opp(Pts)], |_, o| {
            o.own(Pts) - o.opp(Pts)
        }),
        StatDef::dependent("REB_PCT", &[own(Reb), opp(Reb)], |_, o| {
            f::share(o.own(Reb), o.opp(Reb))
        }),
        StatDef::dependent("DREB_PCT", &[own(Dreb), opp(Oreb)], |_, o| {
            f::share(o.own(Dreb), o.opp(Oreb))
        }),
        StatDef::dependent("OREB_PCT", &[own(Oreb), opp(Dreb)], |_, o| {
            f::share(o.own(Oreb), o.opp(Dreb))
        }),
        StatDef::dependent("PYTHAG_WINS", &[own(Pts), opp(Pts)], |p, o| {
            f::pythagorean_win_pct(o.own(Pts), o.opp(Pts), p.pythagorean_exponent)
        }),
        StatDef::dependent("REB_FACTOR", &[own(Reb), opp(Reb)], |_, o| {
            f::share(o.own(Reb), o.opp(Reb))
        }),
        StatDef::dependent(
            "FOUR_FACTOR_SCORE",
            &[
                own(Fgm),
                own(Fg3m),
                own(Fga),
                own(Fta),
                own(Ftm),
                own(Tov),
                own(Reb),
                opp(Reb),
            ],
            |p, o| {
                f::four_factor_score(
                    f::effective_fg_pct(o.own(Fgm), o.own(Fg3m), o.own(Fga)),
                    f::turnover_pct(o.own(Fga), o.own(Fta), o.own(Tov), p.free_throw_weight),
                    f::share(o.own(Reb), o.opp(Reb)),
                    f::free_throw_factor(o.own(Ftm), o.own(Fga)),
                    &p.four_factors,
                )
            },
        ),
        StatDef::dependent("TEAM_POSS", &POSSESSION_FIELDS, |p, o| {
            f::team_possessions(
                &o.line(Side::Own),
                &o.line(Side::Opp),
                p.free_throw_weight,
            )
        }),
        StatDef::dependent("POSS", &POSSESSION_FIELDS, |p, o| {
            f::game_possessions(
                &o.line(Side::Own),
                &o.line(Side::Opp),
                p.free_throw_weight,
            )
        }),
        StatDef::dependent("PACE", &POSSESSION_FIELDS, |p, o| {
            f::pace(&o.line(Side::Own), &o.line(Side::Opp), p.free_throw_weight)
        }),
        StatDef::dependent("OFF_RATING", &with_possessions(&[own(Pts)]), |p, o| {
            let poss = f::game_possessions(
                &o.line(Side::Own),
                &o.line(Side::Opp),
                p.free_throw_weight,
            );
            f::rating(o.own(Pts), poss)
        }),
        StatDef::dependent("DEF_RATING", &with_possessions(&[opp(Pts)]), |p, o| {
            let poss = f::game_possessions(
                &o.line(Side::Own),
                &o.line(Side::Opp),
                p.free_throw_weight,
            );
            f::rating(o.opp(Pts), poss)
        }),
    ]);
    Catalogue::from_table("team", params, defs)
}

#[cfg(test)]
mod tests {
    use super::catalogue;
    use crate::fields::FieldMap;
    use crate::stats::{StatKind, StatParams, TEAM_STATS};

    #[test]
    fn built_in_table_is_valid() {
        TEAM_STATS.validate().expect("valid team table");
        assert!(TEAM_STATS.get("PACE").is_some());
        assert_eq!(
            TEAM_STATS.get("OFF_RATING").map(|d| d.kind),
            Some(StatKind::Dependent)
        );
    }

    #[test]
    fn four_factor_weights_follow_params() {
        let mut params = StatParams::default();
        params.four_factors.shooting = 1.0;
        params.four_factors.turnover = 0.0;
        params.four_factors.rebounding = 0.0;
        params.four_factors.free_throw = 0.0;
        let cat = catalogue(params);
        let team = FieldMap::scalar([
            ("FGM", 10.0),
            ("FG3M", 2.0),
            ("FGA", 20.0),
            ("FTA", 10.0),
            ("FTM", 8.0),
            ("TOV", 5.0),
            ("REB", 40.0),
        ]);
        let opp = FieldMap::scalar([("REB", 40.0)]);
        let out = cat
            .compute_one("FOUR_FACTOR_SCORE", &{
                let mut merged = team.clone();
                merged.merge_prefixed("OPP_", &opp).expect("merge");
                merged
            })
            .expect("known stat")
            .expect("computed");
        assert!((out[0] - 0.55).abs() < 1e-12);
    }
}
