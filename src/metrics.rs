use crate::tally::TeamSplit;

/// Normalized form metrics for one team across both venue contexts.
///
/// Rates are percentages (0-100) and sum to 100 whenever the team played at
/// least one match; the goal averages are per-match. A team with no matches
/// gets the all-zero tuple by policy, never a division by zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeamMetrics {
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    pub matches_played: u32,
}

pub fn compute_metrics(split: &TeamSplit) -> TeamMetrics {
    let total = split.matches();
    if total == 0 {
        return TeamMetrics::default();
    }
    let total_f = total as f64;

    TeamMetrics {
        win_rate: 100.0 * (split.home.wins + split.away.wins) as f64 / total_f,
        draw_rate: 100.0 * (split.home.draws + split.away.draws) as f64 / total_f,
        loss_rate: 100.0 * (split.home.losses + split.away.losses) as f64 / total_f,
        avg_goals_for: (split.home.goals_for + split.away.goals_for) as f64 / total_f,
        avg_goals_against: (split.home.goals_against + split.away.goals_against) as f64 / total_f,
        matches_played: total,
    }
}
