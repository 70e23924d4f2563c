use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use nba_workbench::aggregate::{Window, prior_aggregates};
use nba_workbench::box_score::BoxScoreRow;
use nba_workbench::cleaning::{ImputationOverrides, clean_team_games};
use nba_workbench::pairing::{compute_team_game_stats, pair_with_opponents};
use nba_workbench::stats::TEAM_STATS;
use nba_workbench::stats_api::parse_league_game_finder;

/// The fixture's two games replayed across a long season with shifted ids and dates.
fn season_rows(games: usize) -> Vec<BoxScoreRow> {
    let raw = parse_league_game_finder(LEAGUE_GAME_FINDER_JSON).expect("valid fixture json");
    let base = clean_team_games(&raw, &ImputationOverrides::new()).rows;
    let mut out = Vec::with_capacity(games * base.len());
    for round in 0..games {
        for row in &base {
            let mut row = row.clone();
            row.game_id = format!("{}_{round}", row.game_id);
            row.game_date += chrono::Duration::days(2 * round as i64);
            out.push(row);
        }
    }
    out
}

fn bench_game_finder_parse(c: &mut Criterion) {
    c.bench_function("league_game_finder_parse", |b| {
        b.iter(|| {
            let rows = parse_league_game_finder(black_box(LEAGUE_GAME_FINDER_JSON))
                .expect("valid fixture json");
            black_box(rows.len());
        })
    });
}

fn bench_team_catalogue(c: &mut Criterion) {
    let rows = season_rows(500);
    let pairs = pair_with_opponents(&rows).pairs;
    c.bench_function("team_catalogue_2000_rows", |b| {
        b.iter(|| {
            let stats = compute_team_game_stats(black_box(&pairs), &TEAM_STATS)
                .expect("paired rows compute");
            black_box(stats.keys.len());
        })
    });
}

fn bench_expanding_priors(c: &mut Criterion) {
    let rows = season_rows(82);
    c.bench_function("expanding_priors_season", |b| {
        b.iter(|| {
            let priors = prior_aggregates(black_box(&rows), Window::Expanding, &TEAM_STATS)
                .expect("priors compute");
            black_box(priors.len());
        })
    });
}

criterion_group!(
    perf,
    bench_game_finder_parse,
    bench_team_catalogue,
    bench_expanding_priors
);
criterion_main!(perf);

static LEAGUE_GAME_FINDER_JSON: &str = include_str!("../tests/fixtures/leaguegamefinder.json");
