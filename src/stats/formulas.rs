//! Pure box-score arithmetic. Every quotient goes through [`ratio`], so an
//! empty denominator yields 0.0 rather than NaN or infinity.

use serde::{Deserialize, Serialize};

use crate::fields::{Counting, CountingSource};

use super::FourFactorWeights;

/// Offensive-rebound discount used by both team and player possession estimates.
pub const OREB_POSSESSION_FACTOR: f64 = 1.07;
pub const FT_PART_WEIGHT: f64 = 0.4;

pub fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

/// One side's counting stats, pulled out of a row in one go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxLine {
    pub pts: f64,
    pub fgm: f64,
    pub fga: f64,
    pub fg3m: f64,
    pub fg3a: f64,
    pub ftm: f64,
    pub fta: f64,
    pub oreb: f64,
    pub dreb: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub tov: f64,
    pub pf: f64,
    pub mp: f64,
}

impl BoxLine {
    pub fn from_source(src: &impl CountingSource) -> Self {
        Self {
            pts: src.counting(Counting::Pts),
            fgm: src.counting(Counting::Fgm),
            fga: src.counting(Counting::Fga),
            fg3m: src.counting(Counting::Fg3m),
            fg3a: src.counting(Counting::Fg3a),
            ftm: src.counting(Counting::Ftm),
            fta: src.counting(Counting::Fta),
            oreb: src.counting(Counting::Oreb),
            dreb: src.counting(Counting::Dreb),
            reb: src.counting(Counting::Reb),
            ast: src.counting(Counting::Ast),
            stl: src.counting(Counting::Stl),
            blk: src.counting(Counting::Blk),
            tov: src.counting(Counting::Tov),
            pf: src.counting(Counting::Pf),
            mp: src.counting(Counting::Mp),
        }
    }

    pub fn set(&mut self, stat: Counting, value: f64) {
        let slot = match stat {
            Counting::Pts => &mut self.pts,
            Counting::Fgm => &mut self.fgm,
            Counting::Fga => &mut self.fga,
            Counting::Fg3m => &mut self.fg3m,
            Counting::Fg3a => &mut self.fg3a,
            Counting::Ftm => &mut self.ftm,
            Counting::Fta => &mut self.fta,
            Counting::Oreb => &mut self.oreb,
            Counting::Dreb => &mut self.dreb,
            Counting::Reb => &mut self.reb,
            Counting::Ast => &mut self.ast,
            Counting::Stl => &mut self.stl,
            Counting::Blk => &mut self.blk,
            Counting::Tov => &mut self.tov,
            Counting::Pf => &mut self.pf,
            Counting::Mp => &mut self.mp,
        };
        *slot = value;
    }

    /// Element-wise sum, used when folding several games into one line.
    pub fn add(&self, other: &BoxLine) -> BoxLine {
        let mut out = *self;
        for stat in Counting::ALL {
            out.set(stat, self.counting(stat) + other.counting(stat));
        }
        out
    }

    pub fn scale(&self, factor: f64) -> BoxLine {
        let mut out = *self;
        for stat in Counting::ALL {
            out.set(stat, self.counting(stat) * factor);
        }
        out
    }
}

impl CountingSource for BoxLine {
    fn counting(&self, stat: Counting) -> f64 {
        match stat {
            Counting::Pts => self.pts,
            Counting::Fgm => self.fgm,
            Counting::Fga => self.fga,
            Counting::Fg3m => self.fg3m,
            Counting::Fg3a => self.fg3a,
            Counting::Ftm => self.ftm,
            Counting::Fta => self.fta,
            Counting::Oreb => self.oreb,
            Counting::Dreb => self.dreb,
            Counting::Reb => self.reb,
            Counting::Ast => self.ast,
            Counting::Stl => self.stl,
            Counting::Blk => self.blk,
            Counting::Tov => self.tov,
            Counting::Pf => self.pf,
            Counting::Mp => self.mp,
        }
    }
}

// ---------------------------------------------------------------------------
// Shooting

pub fn two_point_makes(fgm: f64, fg3m: f64) -> f64 {
    fgm - fg3m
}

pub fn two_point_attempts(fga: f64, fg3a: f64) -> f64 {
    fga - fg3a
}

pub fn shooting_pct(made: f64, attempted: f64) -> f64 {
    ratio(made, attempted)
}

pub fn attempt_rate(part: f64, fga: f64) -> f64 {
    ratio(part, fga)
}

pub fn effective_fg_pct(fgm: f64, fg3m: f64, fga: f64) -> f64 {
    ratio(fgm + 0.5 * fg3m, fga)
}

pub fn true_shooting_attempts(fga: f64, fta: f64, ft_weight: f64) -> f64 {
    fga + ft_weight * fta
}

pub fn true_shooting_pct(pts: f64, fga: f64, fta: f64, ft_weight: f64) -> f64 {
    ratio(pts, 2.0 * true_shooting_attempts(fga, fta, ft_weight))
}

// ---------------------------------------------------------------------------
// Possessions

/// Shot attempts, weighted free-throw trips and turnovers.
pub fn minor_possessions(fga: f64, fta: f64, tov: f64, ft_weight: f64) -> f64 {
    fga + ft_weight * fta + tov
}

pub fn major_possessions(fga: f64, fta: f64, tov: f64, oreb: f64, ft_weight: f64) -> f64 {
    minor_possessions(fga, fta, tov, ft_weight) - oreb
}

pub fn espn_possessions(fga: f64, fta: f64, tov: f64, oreb: f64, ft_weight: f64) -> f64 {
    major_possessions(fga, fta, tov, oreb, ft_weight) / 2.0
}

pub fn turnover_pct(fga: f64, fta: f64, tov: f64, ft_weight: f64) -> f64 {
    ratio(tov, minor_possessions(fga, fta, tov, ft_weight))
}

pub fn free_throw_factor(ftm: f64, fga: f64) -> f64 {
    ratio(ftm, fga)
}

/// `ours / (ours + theirs)`, the shape of every rebounding share.
pub fn share(ours: f64, theirs: f64) -> f64 {
    ratio(ours, ours + theirs)
}

/// Basketball-Reference team possession estimate for one side of a game.
pub fn team_possessions(team: &BoxLine, opp: &BoxLine, ft_weight: f64) -> f64 {
    let oreb_pct = share(team.oreb, opp.dreb);
    team.fga + ft_weight * team.fta - OREB_POSSESSION_FACTOR * oreb_pct * (team.fga - team.fgm)
        + team.tov
}

pub fn game_possessions(team: &BoxLine, opp: &BoxLine, ft_weight: f64) -> f64 {
    0.5 * (team_possessions(team, opp, ft_weight) + team_possessions(opp, team, ft_weight))
}

pub fn pace(team: &BoxLine, opp: &BoxLine, ft_weight: f64) -> f64 {
    let both = team_possessions(team, opp, ft_weight) + team_possessions(opp, team, ft_weight);
    48.0 * ratio(both, 2.0 * (team.mp / 5.0))
}

pub fn rating(points: f64, possessions: f64) -> f64 {
    100.0 * ratio(points, possessions)
}

pub fn pythagorean_win_pct(pts: f64, opp_pts: f64, exponent: f64) -> f64 {
    let scored = pts.powf(exponent);
    ratio(scored, scored + opp_pts.powf(exponent))
}

pub fn four_factor_score(
    shooting: f64,
    turnover: f64,
    rebounding: f64,
    free_throw: f64,
    weights: &FourFactorWeights,
) -> f64 {
    weights.shooting * shooting
        + weights.turnover * turnover
        + weights.rebounding * rebounding
        + weights.free_throw * free_throw
}

// ---------------------------------------------------------------------------
// Player rates. `p` is the player, `t` the player's team totals, `o` the opponent totals.

pub fn game_score(p: &BoxLine) -> f64 {
    p.pts + 0.4 * p.fgm - 0.7 * p.fga - 0.4 * (p.fta - p.ftm) + 0.7 * p.oreb + 0.3 * p.dreb
        + p.stl
        + 0.7 * p.ast
        + 0.7 * p.blk
        - 0.4 * p.pf
        - p.tov
}

fn floor_share(p: &BoxLine, t: &BoxLine) -> f64 {
    ratio(p.mp, t.mp / 5.0)
}

pub fn assist_pct(p: &BoxLine, t: &BoxLine) -> f64 {
    100.0 * ratio(p.ast, floor_share(p, t) * t.fgm - p.fgm)
}

pub fn offensive_rebound_pct(p: &BoxLine, t: &BoxLine, o: &BoxLine) -> f64 {
    100.0 * ratio(p.oreb * (t.mp / 5.0), p.mp * (t.oreb + o.dreb))
}

pub fn defensive_rebound_pct(p: &BoxLine, t: &BoxLine, o: &BoxLine) -> f64 {
    100.0 * ratio(p.dreb * (t.mp / 5.0), p.mp * (t.dreb + o.oreb))
}

pub fn total_rebound_pct(p: &BoxLine, t: &BoxLine, o: &BoxLine) -> f64 {
    100.0 * ratio(p.reb * (t.mp / 5.0), p.mp * (t.reb + o.reb))
}

pub fn block_pct(p: &BoxLine, t: &BoxLine, o: &BoxLine) -> f64 {
    100.0 * ratio(p.blk * (t.mp / 5.0), p.mp * (o.fga - o.fg3a))
}

pub fn steal_pct(p: &BoxLine, t: &BoxLine, o: &BoxLine, ft_weight: f64) -> f64 {
    let opp_possessions = game_possessions(o, t, ft_weight);
    100.0 * ratio(p.stl * (t.mp / 5.0), p.mp * opp_possessions)
}

pub fn usage_rate(p: &BoxLine, t: &BoxLine, ft_weight: f64) -> f64 {
    let own = minor_possessions(p.fga, p.fta, p.tov, ft_weight);
    let team = minor_possessions(t.fga, t.fta, t.tov, ft_weight);
    100.0 * ratio(own * (t.mp / 5.0), p.mp * team)
}

// ---------------------------------------------------------------------------
// Individual offense (scoring possessions and points produced)

/// Share of a player's made shots that were assisted.
pub fn assisted_share(p: &BoxLine, t: &BoxLine) -> f64 {
    let on_floor = floor_share(p, t);
    let creation = 1.14 * ratio(t.ast - p.ast, t.fgm);
    let team_rate = ratio(t.ast * on_floor - p.ast, t.fgm * on_floor - p.fgm);
    on_floor * creation + (1.0 - on_floor) * team_rate
}

fn scoring_efficiency(p: &BoxLine) -> f64 {
    ratio(p.pts - p.ftm, 2.0 * p.fga)
}

fn teammates_scoring_efficiency(p: &BoxLine, t: &BoxLine) -> f64 {
    ratio((t.pts - t.ftm) - (p.pts - p.ftm), 2.0 * (t.fga - p.fga))
}

fn free_throw_trip_success(ftm: f64, fta: f64) -> f64 {
    1.0 - (1.0 - ratio(ftm, fta)).powi(2)
}

pub fn fg_part(p: &BoxLine, t: &BoxLine) -> f64 {
    p.fgm * (1.0 - 0.5 * scoring_efficiency(p) * assisted_share(p, t))
}

pub fn ast_part(p: &BoxLine, t: &BoxLine) -> f64 {
    0.5 * teammates_scoring_efficiency(p, t) * p.ast
}

pub fn ft_part(p: &BoxLine) -> f64 {
    free_throw_trip_success(p.ftm, p.fta) * FT_PART_WEIGHT * p.fta
}

pub fn team_scoring_possessions(t: &BoxLine, ft_weight: f64) -> f64 {
    t.fgm + free_throw_trip_success(t.ftm, t.fta) * ft_weight * t.fta
}

/// Fraction of team possessions that end in a score.
pub fn team_play_pct(t: &BoxLine, ft_weight: f64) -> f64 {
    ratio(
        team_scoring_possessions(t, ft_weight),
        minor_possessions(t.fga, t.fta, t.tov, ft_weight),
    )
}

pub fn team_oreb_weight(t: &BoxLine, o: &BoxLine, ft_weight: f64) -> f64 {
    let oreb_pct = share(t.oreb, o.dreb);
    let play = team_play_pct(t, ft_weight);
    let kept = (1.0 - oreb_pct) * play;
    ratio(kept, kept + oreb_pct * (1.0 - play))
}

pub fn oreb_part(p: &BoxLine, t: &BoxLine, o: &BoxLine, ft_weight: f64) -> f64 {
    p.oreb * team_oreb_weight(t, o, ft_weight) * team_play_pct(t, ft_weight)
}

/// Discount applied to a player's scoring credit for possessions the
/// team extended with offensive rebounds.
fn oreb_discount(t: &BoxLine, o: &BoxLine, ft_weight: f64) -> f64 {
    1.0 - ratio(t.oreb, team_scoring_possessions(t, ft_weight))
        * team_oreb_weight(t, o, ft_weight)
        * team_play_pct(t, ft_weight)
}

pub fn scoring_possessions(p: &BoxLine, t: &BoxLine, o: &BoxLine, ft_weight: f64) -> f64 {
    (fg_part(p, t) + ast_part(p, t) + ft_part(p)) * oreb_discount(t, o, ft_weight)
        + oreb_part(p, t, o, ft_weight)
}

pub fn missed_fg_possessions(p: &BoxLine, t: &BoxLine, o: &BoxLine) -> f64 {
    (p.fga - p.fgm) * (1.0 - OREB_POSSESSION_FACTOR * share(t.oreb, o.dreb))
}

pub fn missed_ft_possessions(p: &BoxLine, ft_weight: f64) -> f64 {
    (1.0 - ratio(p.ftm, p.fta)).powi(2) * ft_weight * p.fta
}

pub fn total_possessions(p: &BoxLine, t: &BoxLine, o: &BoxLine, ft_weight: f64) -> f64 {
    scoring_possessions(p, t, o, ft_weight)
        + missed_fg_possessions(p, t, o)
        + missed_ft_possessions(p, ft_weight)
        + p.tov
}

pub fn points_produced_fg(p: &BoxLine, t: &BoxLine) -> f64 {
    2.0 * (p.fgm + 0.5 * p.fg3m) * (1.0 - 0.5 * scoring_efficiency(p) * assisted_share(p, t))
}

pub fn points_produced_ast(p: &BoxLine, t: &BoxLine) -> f64 {
    let teammate_fgm = t.fgm - p.fgm;
    let teammate_value = ratio(teammate_fgm + 0.5 * (t.fg3m - p.fg3m), teammate_fgm);
    2.0 * teammate_value * 0.5 * teammates_scoring_efficiency(p, t) * p.ast
}

pub fn points_produced_oreb(p: &BoxLine, t: &BoxLine, o: &BoxLine, ft_weight: f64) -> f64 {
    oreb_part(p, t, o, ft_weight) * ratio(t.pts, team_scoring_possessions(t, ft_weight))
}

pub fn points_produced(p: &BoxLine, t: &BoxLine, o: &BoxLine, ft_weight: f64) -> f64 {
    (points_produced_fg(p, t) + points_produced_ast(p, t) + p.ftm) * oreb_discount(t, o, ft_weight)
        + points_produced_oreb(p, t, o, ft_weight)
}

pub fn individual_offensive_rating(p: &BoxLine, t: &BoxLine, o: &BoxLine, ft_weight: f64) -> f64 {
    rating(
        points_produced(p, t, o, ft_weight),
        total_possessions(p, t, o, ft_weight),
    )
}

pub fn floor_pct(p: &BoxLine, t: &BoxLine, o: &BoxLine, ft_weight: f64) -> f64 {
    ratio(
        scoring_possessions(p, t, o, ft_weight),
        total_possessions(p, t, o, ft_weight),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio(3.0, 0.0), 0.0);
        assert_eq!(shooting_pct(0.0, 0.0), 0.0);
        assert!(close(ratio(1.0, 4.0), 0.25));
    }

    #[test]
    fn effective_and_true_shooting() {
        // 10/20 with 2 threes
        assert!(close(effective_fg_pct(10.0, 2.0, 20.0), 0.55));
        assert!(close(true_shooting_attempts(20.0, 10.0, 0.44), 24.4));
        assert!(close(true_shooting_pct(24.4, 20.0, 10.0, 0.44), 0.5));
    }

    #[test]
    fn possessions_chain() {
        let minor = minor_possessions(80.0, 20.0, 12.0, 0.44);
        assert!(close(minor, 100.8));
        assert!(close(major_possessions(80.0, 20.0, 12.0, 10.8, 0.44), 90.0));
        assert!(close(espn_possessions(80.0, 20.0, 12.0, 10.8, 0.44), 45.0));
    }

    #[test]
    fn pythagorean_is_symmetric() {
        let a = pythagorean_win_pct(110.0, 100.0, 13.91);
        let b = pythagorean_win_pct(100.0, 110.0, 13.91);
        assert!(close(a + b, 1.0));
        assert!(close(pythagorean_win_pct(100.0, 100.0, 13.91), 0.5));
    }

    #[test]
    fn game_possessions_match_from_both_sides() {
        let home = BoxLine {
            fgm: 40.0,
            fga: 88.0,
            fta: 22.0,
            oreb: 10.0,
            dreb: 34.0,
            tov: 13.0,
            mp: 240.0,
            ..BoxLine::default()
        };
        let away = BoxLine {
            fgm: 38.0,
            fga: 85.0,
            fta: 18.0,
            oreb: 9.0,
            dreb: 36.0,
            tov: 15.0,
            mp: 240.0,
            ..BoxLine::default()
        };
        assert!(close(
            game_possessions(&home, &away, 0.44),
            game_possessions(&away, &home, 0.44)
        ));
        assert!(pace(&home, &away, 0.44) > 80.0);
    }

    #[test]
    fn free_throw_parts_vanish_without_attempts() {
        let p = BoxLine {
            fgm: 5.0,
            fga: 10.0,
            ..BoxLine::default()
        };
        assert_eq!(ft_part(&p), 0.0);
        assert_eq!(missed_ft_possessions(&p, 0.44), 0.0);
    }
}
