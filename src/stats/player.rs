use crate::fields::Counting::{
    Ast, Blk, Dreb, Fg3a, Fg3m, Fga, Fgm, Fta, Ftm, Mp, Oreb, Pf, Pts, Reb, Stl, Tov,
};
use crate::fields::{Field, Side, opp, own, team};

use super::StatParams;
use super::catalogue::{Catalogue, Obs, StatDef};
use super::formulas::{self as f, BoxLine};
use super::team::box_score_defs;

/// Everything the scoring-possession decomposition reads: the player's own
/// line, team totals and the opponent's rebounding.
const OFFENSE_FIELDS: [Field; 22] = [
    own(Pts),
    own(Fgm),
    own(Fga),
    own(Fg3m),
    own(Ftm),
    own(Fta),
    own(Oreb),
    own(Ast),
    own(Tov),
    own(Mp),
    team(Pts),
    team(Fgm),
    team(Fga),
    team(Fg3m),
    team(Ftm),
    team(Fta),
    team(Oreb),
    team(Ast),
    team(Tov),
    team(Mp),
    opp(Dreb),
    opp(Oreb),
];

fn sides(o: &Obs<'_>) -> (BoxLine, BoxLine, BoxLine) {
    (o.line(Side::Own), o.line(Side::Team), o.line(Side::Opp))
}

pub fn catalogue(params: StatParams) -> Catalogue {
    let mut defs = box_score_defs();
    defs.extend([
        StatDef::independent(
            "GAME_SCORE",
            &[
                own(Pts),
                own(Fgm),
                own(Fga),
                own(Fta),
                own(Ftm),
                own(Oreb),
                own(Dreb),
                own(Stl),
                own(Ast),
                own(Blk),
                own(Pf),
                own(Tov),
            ],
            |_, o| f::game_score(&o.line(Side::Own)),
        ),
        StatDef::dependent(
            "AST_PCT",
            &[own(Ast), own(Fgm), own(Mp), team(Fgm), team(Mp)],
            |_, o| {
                let (p, t, _) = sides(o);
                f::assist_pct(&p, &t)
            },
        ),
        StatDef::dependent(
            "DREB_PCT",
            &[own(Dreb), own(Mp), team(Dreb), team(Mp), opp(Oreb)],
            |_, o| {
                let (p, t, x) = sides(o);
                f::defensive_rebound_pct(&p, &t, &x)
            },
        ),
        StatDef::dependent(
            "OREB_PCT",
            &[own(Oreb), own(Mp), team(Oreb), team(Mp), opp(Dreb)],
            |_, o| {
                let (p, t, x) = sides(o);
                f::offensive_rebound_pct(&p, &t, &x)
            },
        ),
        StatDef::dependent(
            "REB_PCT",
            &[own(Reb), own(Mp), team(Reb), team(Mp), opp(Reb)],
            |_, o| {
                let (p, t, x) = sides(o);
                f::total_rebound_pct(&p, &t, &x)
            },
        ),
        StatDef::dependent(
            "BLK_PCT",
            &[own(Blk), own(Mp), team(Mp), opp(Fga), opp(Fg3a)],
            |_, o| {
                let (p, t, x) = sides(o);
                f::block_pct(&p, &t, &x)
            },
        ),
        StatDef::dependent(
            "STL_PCT",
            &[
                own(Stl),
                own(Mp),
                team(Fga),
                team(Fgm),
                team(Fta),
                team(Oreb),
                team(Dreb),
                team(Tov),
                team(Mp),
                opp(Fga),
                opp(Fgm),
                opp(Fta),
                opp(Oreb),
                opp(Dreb),
                opp(Tov),
            ],
            |p, o| {
                let (pl, t, x) = sides(o);
                f::steal_pct(&pl, &t, &x, p.free_throw_weight)
            },
        ),
        StatDef::dependent(
            "USG_PCT",
            &[
                own(Fga),
                own(Fta),
                own(Tov),
                own(Mp),
                team(Fga),
                team(Fta),
                team(Tov),
                team(Mp),
            ],
            |p, o| {
                let (pl, t, _) = sides(o);
                f::usage_rate(&pl, &t, p.free_throw_weight)
            },
        ),
        StatDef::dependent("SCORING_POSS", &OFFENSE_FIELDS, |p, o| {
            let (pl, t, x) = sides(o);
            f::scoring_possessions(&pl, &t, &x, p.free_throw_weight)
        }),
        StatDef::dependent("TOT_POSS", &OFFENSE_FIELDS, |p, o| {
            let (pl, t, x) = sides(o);
            f::total_possessions(&pl, &t, &x, p.free_throw_weight)
        }),
        StatDef::dependent("PPROD", &OFFENSE_FIELDS, |p, o| {
            let (pl, t, x) = sides(o);
            f::points_produced(&pl, &t, &x, p.free_throw_weight)
        }),
        StatDef::dependent("OFF_RATING", &OFFENSE_FIELDS, |p, o| {
            let (pl, t, x) = sides(o);
            f::individual_offensive_rating(&pl, &t, &x, p.free_throw_weight)
        }),
        StatDef::dependent("FLOOR_PCT", &OFFENSE_FIELDS, |p, o| {
            let (pl, t, x) = sides(o);
            f::floor_pct(&pl, &t, &x, p.free_throw_weight)
        }),
    ]);
    Catalogue::from_table("player", params, defs)
}

#[cfg(test)]
mod tests {
    use crate::stats::PLAYER_STATS;

    #[test]
    fn built_in_table_is_valid() {
        PLAYER_STATS.validate().expect("valid player table");
        assert!(PLAYER_STATS.get("GAME_SCORE").is_some());
        assert!(PLAYER_STATS.get("TOV_PCT").is_none());
        assert!(PLAYER_STATS.required_fields().contains("TEAM_MP"));
        assert!(!PLAYER_STATS.independent_required_fields().contains("TEAM_MP"));
    }
}
