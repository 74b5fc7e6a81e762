use formcast::metrics::{TeamMetrics, compute_metrics};
use formcast::open_data::MatchRecord;
use formcast::predict::predict_outcome;
use formcast::tally::aggregate_team;

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

#[test]
fn end_to_end_prediction_sums_to_100() {
    let season = vec![
        rec(1, "A", "B", 3, 0),
        rec(2, "B", "A", 1, 1),
        rec(3, "A", "C", 2, 1),
        rec(4, "C", "B", 0, 2),
    ];
    let m1 = compute_metrics(&aggregate_team(&season, "A"));
    let m2 = compute_metrics(&aggregate_team(&season, "B"));

    let p = predict_outcome(&m1, &m2).expect("both teams have history");
    assert!((p.p_team1 + p.p_draw + p.p_team2 - 100.0).abs() < 1e-9);
    assert!(p.p_team1 >= 0.0 && p.p_team1 <= 100.0);
    assert!(p.p_draw >= 0.0 && p.p_draw <= 100.0);
    assert!(p.p_team2 >= 0.0 && p.p_team2 <= 100.0);
    // A is unbeaten with the better goal record; it should be favored.
    assert!(p.p_team1 > p.p_team2);
}

#[test]
fn swap_symmetry_holds_on_real_aggregates() {
    let season = vec![
        rec(1, "A", "B", 2, 0),
        rec(2, "B", "C", 3, 1),
        rec(3, "C", "A", 1, 1),
    ];
    let a = compute_metrics(&aggregate_team(&season, "A"));
    let b = compute_metrics(&aggregate_team(&season, "B"));

    let ab = predict_outcome(&a, &b).unwrap();
    let ba = predict_outcome(&b, &a).unwrap();
    assert!((ab.p_team1 - ba.p_team2).abs() < 1e-9);
    assert!((ab.p_team2 - ba.p_team1).abs() < 1e-9);
    assert!((ab.p_draw - ba.p_draw).abs() < 1e-9);
}

#[test]
fn identical_inputs_split_exactly_three_ways() {
    let m = TeamMetrics {
        win_rate: 100.0 / 3.0,
        draw_rate: 100.0 / 3.0,
        loss_rate: 100.0 / 3.0,
        avg_goals_for: 1.5,
        avg_goals_against: 1.5,
        matches_played: 6,
    };
    let p = predict_outcome(&m, &m).unwrap();
    assert!((p.p_team1 - 100.0 / 3.0).abs() < 1e-9);
    assert!((p.p_draw - 100.0 / 3.0).abs() < 1e-9);
    assert!((p.p_team2 - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn two_unknown_teams_report_insufficient_data() {
    let season = vec![rec(1, "A", "B", 1, 0)];
    let m1 = compute_metrics(&aggregate_team(&season, "X"));
    let m2 = compute_metrics(&aggregate_team(&season, "Y"));
    assert_eq!(m1.matches_played, 0);
    assert_eq!(m2.matches_played, 0);
    assert!(predict_outcome(&m1, &m2).is_none());
}
