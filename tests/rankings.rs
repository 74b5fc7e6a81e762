use formcast::open_data::MatchRecord;
use formcast::rankings::{RankMetric, compute_season_form, sort_rows};

fn rec(id: u64, home: &str, away: &str, home_score: u32, away_score: u32) -> MatchRecord {
    MatchRecord {
        match_id: id,
        match_date: String::new(),
        competition_id: 9,
        season_id: 27,
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_score,
        away_score,
    }
}

fn sample_season() -> Vec<MatchRecord> {
    vec![
        rec(1, "A", "B", 2, 0),
        rec(2, "B", "C", 1, 1),
        rec(3, "C", "A", 0, 3),
        rec(4, "B", "A", 0, 1),
        rec(5, "C", "B", 2, 2),
    ]
}

#[test]
fn one_row_per_team_with_consistent_totals() {
    let rows = compute_season_form(&sample_season());
    assert_eq!(rows.len(), 3);

    let total_played: u32 = rows.iter().map(|r| r.metrics.matches_played).sum();
    // Each match contributes two participations.
    assert_eq!(total_played, 10);

    let total_gd: i64 = rows.iter().map(|r| r.goal_difference()).sum();
    assert_eq!(total_gd, 0);
}

#[test]
fn default_order_is_win_rate_descending() {
    let rows = compute_season_form(&sample_season());
    assert_eq!(rows[0].team, "A");
    assert!(rows[0].metrics.win_rate >= rows[1].metrics.win_rate);
    assert!(rows[1].metrics.win_rate >= rows[2].metrics.win_rate);
}

#[test]
fn metric_cycle_reaches_every_sort_and_returns() {
    let mut metric = RankMetric::WinRate;
    let mut seen = vec![metric.label()];
    for _ in 0..3 {
        metric = metric.next();
        seen.push(metric.label());
    }
    assert_eq!(seen, vec!["WIN%", "GD", "GF", "PLAYED"]);
    assert_eq!(metric.next().label(), "WIN%");
}

#[test]
fn ties_break_alphabetically() {
    // Two teams with identical records.
    let season = vec![rec(1, "B", "Z", 1, 1), rec(2, "A", "Y", 2, 2)];
    let mut rows = compute_season_form(&season);
    sort_rows(&mut rows, RankMetric::Played);
    let names: Vec<&str> = rows.iter().map(|r| r.team.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "Y", "Z"]);
}
