use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use formcast::metrics::compute_metrics;
use formcast::open_data::{MatchRecord, parse_season_matches};
use formcast::predict::predict_outcome;
use formcast::rankings::compute_season_form;
use formcast::tally::aggregate_team;

static SEASON_JSON: &str = include_str!("../tests/fixtures/open_data_matches.json");

fn synthetic_season(teams: usize, rounds: usize) -> Vec<MatchRecord> {
    let names: Vec<String> = (0..teams).map(|i| format!("Team {i:02}")).collect();
    let mut out = Vec::new();
    let mut id = 1u64;
    for round in 0..rounds {
        for (i, home) in names.iter().enumerate() {
            for (j, away) in names.iter().enumerate() {
                if i == j {
                    continue;
                }
                out.push(MatchRecord {
                    match_id: id,
                    match_date: format!("2020-{:02}-{:02}", 1 + round % 12, 1 + id % 28),
                    competition_id: 9,
                    season_id: 27,
                    home_team: home.clone(),
                    away_team: away.clone(),
                    home_score: ((i + round) % 4) as u32,
                    away_score: ((j + round) % 3) as u32,
                });
                id += 1;
            }
        }
    }
    out
}

fn bench_season_parse(c: &mut Criterion) {
    c.bench_function("season_parse", |b| {
        b.iter(|| {
            let rows = parse_season_matches(black_box(SEASON_JSON), 9, 27).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let season = synthetic_season(20, 2);
    c.bench_function("aggregate_team", |b| {
        b.iter(|| {
            let split = aggregate_team(black_box(&season), black_box("Team 07"));
            black_box(split.matches());
        })
    });
}

fn bench_predict(c: &mut Criterion) {
    let season = synthetic_season(20, 2);
    let m1 = compute_metrics(&aggregate_team(&season, "Team 03"));
    let m2 = compute_metrics(&aggregate_team(&season, "Team 11"));
    c.bench_function("predict_outcome", |b| {
        b.iter(|| {
            let p = predict_outcome(black_box(&m1), black_box(&m2));
            black_box(p.is_some());
        })
    });
}

fn bench_season_form(c: &mut Criterion) {
    let season = synthetic_season(20, 2);
    c.bench_function("season_form", |b| {
        b.iter(|| {
            let rows = compute_season_form(black_box(&season));
            black_box(rows.len());
        })
    });
}

criterion_group!(
    perf,
    bench_season_parse,
    bench_aggregate,
    bench_predict,
    bench_season_form
);
criterion_main!(perf);
