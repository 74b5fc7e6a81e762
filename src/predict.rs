use crate::metrics::TeamMetrics;

/// Three-way outcome estimate for a hypothetical match, in percent.
/// The three fields sum to exactly 100.0 by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeProbs {
    pub p_team1: f64,
    pub p_draw: f64,
    pub p_team2: f64,
}

/// Blend two teams' form into a three-way outcome distribution.
///
/// Each side's raw score mixes its own strength (win rate, scoring average)
/// with the opponent's weakness (loss rate, conceding average); the draw
/// score is the averaged draw tendency. Raw scores are floored at zero so a
/// hopeless goal differential contributes nothing rather than a negative
/// probability. When the floored total is zero (no usable history on either
/// side) there is nothing to normalize and the prediction is withheld.
pub fn predict_outcome(m1: &TeamMetrics, m2: &TeamMetrics) -> Option<OutcomeProbs> {
    let raw_team1 = (m1.win_rate + m2.loss_rate) / 2.0 + (m1.avg_goals_for - m2.avg_goals_against) / 2.0;
    let raw_team2 = (m2.win_rate + m1.loss_rate) / 2.0 + (m2.avg_goals_for - m1.avg_goals_against) / 2.0;
    let raw_draw = (m1.draw_rate + m2.draw_rate) / 2.0;

    let raw_team1 = raw_team1.max(0.0);
    let raw_team2 = raw_team2.max(0.0);
    let raw_draw = raw_draw.max(0.0);

    let total = raw_team1 + raw_team2 + raw_draw;
    if total <= 0.0 {
        return None;
    }

    let mut p_team1 = 100.0 * raw_team1 / total;
    let mut p_draw = 100.0 * raw_draw / total;
    let p_team2 = 100.0 * raw_team2 / total;

    // Fold any float residue into draw so the three always print as 100%.
    let residue = 100.0 - (p_team1 + p_draw + p_team2);
    p_draw += residue;
    if p_draw < 0.0 {
        p_team1 += p_draw;
        p_draw = 0.0;
    }

    Some(OutcomeProbs {
        p_team1,
        p_draw,
        p_team2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(win: f64, draw: f64, loss: f64, gf: f64, ga: f64) -> TeamMetrics {
        TeamMetrics {
            win_rate: win,
            draw_rate: draw,
            loss_rate: loss,
            avg_goals_for: gf,
            avg_goals_against: ga,
            matches_played: 10,
        }
    }

    #[test]
    fn probabilities_sum_to_100() {
        let m1 = metrics(50.0, 30.0, 20.0, 1.8, 0.9);
        let m2 = metrics(25.0, 25.0, 50.0, 1.1, 1.6);
        let p = predict_outcome(&m1, &m2).expect("history on both sides");
        assert!((p.p_team1 + p.p_draw + p.p_team2 - 100.0).abs() < 1e-9);
        assert!(p.p_team1 > p.p_team2);
    }

    #[test]
    fn swapping_inputs_swaps_sides() {
        let m1 = metrics(60.0, 20.0, 20.0, 2.1, 0.7);
        let m2 = metrics(30.0, 30.0, 40.0, 1.0, 1.4);
        let ab = predict_outcome(&m1, &m2).unwrap();
        let ba = predict_outcome(&m2, &m1).unwrap();
        assert!((ab.p_team1 - ba.p_team2).abs() < 1e-9);
        assert!((ab.p_team2 - ba.p_team1).abs() < 1e-9);
        assert!((ab.p_draw - ba.p_draw).abs() < 1e-9);
    }

    #[test]
    fn identical_form_is_an_even_split() {
        let m = metrics(100.0 / 3.0, 100.0 / 3.0, 100.0 / 3.0, 1.5, 1.5);
        let p = predict_outcome(&m, &m).unwrap();
        assert!((p.p_team1 - 100.0 / 3.0).abs() < 1e-9);
        assert!((p.p_draw - 100.0 / 3.0).abs() < 1e-9);
        assert!((p.p_team2 - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn no_history_on_either_side_is_withheld() {
        let zero = TeamMetrics::default();
        assert!(predict_outcome(&zero, &zero).is_none());
    }

    #[test]
    fn negative_raw_scores_are_floored_not_propagated() {
        // Two draw-only teams, one leaking goals: team 1's raw score is
        // (0 + 0)/2 + (0.0 - 5.0)/2 = -2.5 without the floor.
        let m1 = metrics(0.0, 100.0, 0.0, 0.0, 0.0);
        let m2 = metrics(0.0, 100.0, 0.0, 0.0, 5.0);
        let p = predict_outcome(&m1, &m2).unwrap();
        assert!((p.p_team1 - 0.0).abs() < 1e-9);
        assert!((p.p_draw - 100.0).abs() < 1e-9);
        assert!(p.p_team2 >= 0.0);
        assert!((p.p_team1 + p.p_draw + p.p_team2 - 100.0).abs() < 1e-9);
    }
}
