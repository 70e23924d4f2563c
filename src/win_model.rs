use std::collections::HashMap;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::aggregate::{PriorForm, Window, prior_aggregates};
use crate::box_score::BoxScoreRow;
use crate::error::StatsError;
use crate::stats::Catalogue;
use crate::stats::formulas::{ratio, rating};

pub const FEATURE_NAMES: [&str; 6] = [
    "EFG_DIFF",
    "TOV_DIFF",
    "OREB_SHARE_DIFF",
    "FT_FACTOR_DIFF",
    "NET_RATING_PROXY",
    "HOME",
];
pub const FEATURES: usize = FEATURE_NAMES.len();

/// One game seen from one side, described only by what both teams did before it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub game_date: NaiveDate,
    pub game_id: String,
    pub team_id: i64,
    pub opponent_id: i64,
    pub features: [f64; FEATURES],
    pub win: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Metrics {
    pub samples: usize,
    pub brier: f64,
    pub log_loss: f64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    pub learning_rate: f64,
    pub epochs: usize,
    pub l2: f64,
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            epochs: 500,
            l2: 1e-3,
            seed: 7,
        }
    }
}

/// Offense-only strengths a team carries into a game.
struct FormProfile {
    efg: f64,
    tov: f64,
    oreb_share: f64,
    ft_factor: f64,
    offense: f64,
}

fn profile(form: &PriorForm) -> Option<FormProfile> {
    let rate = |name: &str| form.rates.get(name).copied().filter(|v| v.is_finite());
    Some(FormProfile {
        efg: rate("eFG_PCT")?,
        tov: rate("TOV_PCT")?,
        oreb_share: ratio(form.totals.oreb, form.totals.reb),
        ft_factor: rate("FT_FACTOR")?,
        offense: rating(form.totals.pts, rate("MINOR_POSS")?),
    })
}

fn features(team: &FormProfile, opp: &FormProfile, home: bool) -> [f64; FEATURES] {
    [
        team.efg - opp.efg,
        team.tov - opp.tov,
        team.oreb_share - opp.oreb_share,
        team.ft_factor - opp.ft_factor,
        team.offense - opp.offense,
        if home { 1.0 } else { -1.0 },
    ]
}

/// One sample per game that both teams enter with prior data, taken from the
/// side with the lower team id. Returned in date order.
pub fn build_samples(
    rows: &[BoxScoreRow],
    window: Window,
    catalogue: &Catalogue,
) -> Result<Vec<Sample>, StatsError> {
    let priors = prior_aggregates(rows, window, catalogue)?;

    let mut games: HashMap<(&str, &str), Vec<usize>> = HashMap::new();
    for (idx, row) in rows.iter().enumerate() {
        games
            .entry((row.season_id.as_str(), row.game_id.as_str()))
            .or_default()
            .push(idx);
    }

    let mut out = Vec::new();
    for sides in games.values() {
        let &[a, b] = sides.as_slice() else {
            continue;
        };
        let (t, o) = if rows[a].team_id <= rows[b].team_id { (a, b) } else { (b, a) };
        if rows[t].team_id == rows[o].team_id {
            continue;
        }
        let (Some(team_form), Some(opp_form)) = (&priors[t], &priors[o]) else {
            continue;
        };
        let (Some(team), Some(opp)) = (profile(team_form), profile(opp_form)) else {
            continue;
        };
        out.push(Sample {
            game_date: rows[t].game_date,
            game_id: rows[t].game_id.clone(),
            team_id: rows[t].team_id,
            opponent_id: rows[o].team_id,
            features: features(&team, &opp, rows[t].home),
            win: rows[t].win,
        });
    }
    out.sort_by(|a, b| a.game_date.cmp(&b.game_date).then(a.game_id.cmp(&b.game_id)));
    Ok(out)
}

/// Splits date-ordered samples so every training game precedes every test
/// game. `train_share` is clamped to [0, 1].
pub fn chronological_split(samples: &[Sample], train_share: f64) -> (&[Sample], &[Sample]) {
    let cut = (samples.len() as f64 * train_share.clamp(0.0, 1.0)).round() as usize;
    samples.split_at(cut.min(samples.len()))
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Logistic regression over standardized features.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    pub weights: [f64; FEATURES],
    pub bias: f64,
    means: [f64; FEATURES],
    scales: [f64; FEATURES],
}

impl LogisticModel {
    /// Batch gradient descent on mean log loss plus `l2 * |w|^2 / 2`. The bias
    /// is not penalized.
    pub fn fit(samples: &[Sample], cfg: TrainConfig) -> Self {
        let (means, scales) = standardization(samples);
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let mut weights = [0.0; FEATURES];
        for w in weights.iter_mut() {
            *w = rng.gen_range(-0.01..0.01);
        }
        let mut model = Self {
            weights,
            bias: 0.0,
            means,
            scales,
        };
        if samples.is_empty() {
            return model;
        }

        let xs = samples
            .iter()
            .map(|s| model.standardize(&s.features))
            .collect::<Vec<_>>();
        let n = samples.len() as f64;
        for _ in 0..cfg.epochs {
            let mut grad = [0.0; FEATURES];
            let mut grad_bias = 0.0;
            for (x, sample) in xs.iter().zip(samples) {
                let y = if sample.win { 1.0 } else { 0.0 };
                let err = sigmoid(model.linear(x)) - y;
                for (g, xi) in grad.iter_mut().zip(x) {
                    *g += err * xi;
                }
                grad_bias += err;
            }
            for (w, g) in model.weights.iter_mut().zip(grad) {
                *w -= cfg.learning_rate * (g / n + cfg.l2 * *w);
            }
            model.bias -= cfg.learning_rate * grad_bias / n;
        }
        model
    }

    fn standardize(&self, features: &[f64; FEATURES]) -> [f64; FEATURES] {
        let mut out = [0.0; FEATURES];
        for i in 0..FEATURES {
            out[i] = ratio(features[i] - self.means[i], self.scales[i]);
        }
        out
    }

    fn linear(&self, x: &[f64; FEATURES]) -> f64 {
        self.bias + self.weights.iter().zip(x).map(|(w, xi)| w * xi).sum::<f64>()
    }

    /// Probability that the sample's team wins.
    pub fn predict(&self, features: &[f64; FEATURES]) -> f64 {
        sigmoid(self.linear(&self.standardize(features)))
    }

    pub fn evaluate(&self, samples: &[Sample]) -> Metrics {
        let probs = samples
            .iter()
            .map(|s| self.predict(&s.features))
            .collect::<Vec<_>>();
        let outcomes = samples.iter().map(|s| s.win).collect::<Vec<_>>();
        evaluate_probs(&probs, &outcomes)
    }
}

fn standardization(samples: &[Sample]) -> ([f64; FEATURES], [f64; FEATURES]) {
    let mut means = [0.0; FEATURES];
    let mut scales = [1.0; FEATURES];
    if samples.is_empty() {
        return (means, scales);
    }
    let n = samples.len() as f64;
    for i in 0..FEATURES {
        let mean = samples.iter().map(|s| s.features[i]).sum::<f64>() / n;
        let var = samples
            .iter()
            .map(|s| (s.features[i] - mean).powi(2))
            .sum::<f64>()
            / n;
        means[i] = mean;
        // a constant column stays unscaled and standardizes to 0
        scales[i] = if var > 0.0 { var.sqrt() } else { 0.0 };
    }
    (means, scales)
}

pub fn evaluate_probs(predictions: &[f64], outcomes: &[bool]) -> Metrics {
    if predictions.is_empty() || outcomes.is_empty() || predictions.len() != outcomes.len() {
        return Metrics {
            samples: 0,
            brier: 0.0,
            log_loss: 0.0,
            accuracy: 0.0,
        };
    }

    let mut brier_sum = 0.0_f64;
    let mut log_loss_sum = 0.0_f64;
    let mut correct = 0usize;

    for (p, won) in predictions.iter().zip(outcomes) {
        let y = if *won { 1.0 } else { 0.0 };
        brier_sum += (p - y).powi(2);

        let actual_prob = if *won { *p } else { 1.0 - p }.clamp(1e-12, 1.0);
        log_loss_sum += -actual_prob.ln();

        if (*p >= 0.5) == *won {
            correct += 1;
        }
    }

    let n = predictions.len() as f64;
    Metrics {
        samples: predictions.len(),
        brier: brier_sum / n,
        log_loss: log_loss_sum / n,
        accuracy: correct as f64 / n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(day: u32, edge: f64, win: bool) -> Sample {
        Sample {
            game_date: NaiveDate::from_ymd_opt(2020, 1, day).expect("date"),
            game_id: format!("g{day}"),
            team_id: 1,
            opponent_id: 2,
            features: [edge, 0.0, 0.0, 0.0, edge * 10.0, 1.0],
            win,
        }
    }

    #[test]
    fn coin_flip_metrics() {
        let m = evaluate_probs(&[0.5, 0.5], &[true, false]);
        assert_eq!(m.samples, 2);
        assert!((m.brier - 0.25).abs() < 1e-12);
        assert!((m.log_loss - std::f64::consts::LN_2).abs() < 1e-12);
        assert_eq!(m.accuracy, 0.5);
    }

    #[test]
    fn learns_a_separable_edge() {
        let samples = (1..=20)
            .map(|d| {
                let edge = if d % 2 == 0 { 0.05 } else { -0.05 };
                sample(d, edge, d % 2 == 0)
            })
            .collect::<Vec<_>>();
        let model = LogisticModel::fit(&samples, TrainConfig::default());
        assert!(model.predict(&sample(21, 0.05, true).features) > 0.7);
        assert!(model.predict(&sample(22, -0.05, false).features) < 0.3);
        assert_eq!(model.evaluate(&samples).accuracy, 1.0);
    }

    #[test]
    fn split_keeps_order() {
        let samples = (1..=10).map(|d| sample(d, 0.0, true)).collect::<Vec<_>>();
        let (train, test) = chronological_split(&samples, 0.8);
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);
        assert!(train.last().expect("train").game_date < test[0].game_date);
    }
}
