use rayon::prelude::*;

use crate::metrics::{TeamMetrics, compute_metrics};
use crate::open_data::{MatchRecord, team_names};
use crate::tally::{TeamSplit, aggregate_team};

/// One row of the season form table.
#[derive(Debug, Clone)]
pub struct TeamFormRow {
    pub team: String,
    pub split: TeamSplit,
    pub metrics: TeamMetrics,
}

impl TeamFormRow {
    pub fn goal_difference(&self) -> i64 {
        let scored = (self.split.home.goals_for + self.split.away.goals_for) as i64;
        let conceded = (self.split.home.goals_against + self.split.away.goals_against) as i64;
        scored - conceded
    }

    pub fn goals_scored(&self) -> u32 {
        self.split.home.goals_for + self.split.away.goals_for
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMetric {
    WinRate,
    GoalDifference,
    GoalsScored,
    Played,
}

impl RankMetric {
    pub fn next(self) -> Self {
        match self {
            RankMetric::WinRate => RankMetric::GoalDifference,
            RankMetric::GoalDifference => RankMetric::GoalsScored,
            RankMetric::GoalsScored => RankMetric::Played,
            RankMetric::Played => RankMetric::WinRate,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RankMetric::WinRate => "WIN%",
            RankMetric::GoalDifference => "GD",
            RankMetric::GoalsScored => "GF",
            RankMetric::Played => "PLAYED",
        }
    }
}

/// Aggregate every team in the season. Each team's pass over the match list
/// is independent, so the fan-out is a plain parallel map.
pub fn compute_season_form(matches: &[MatchRecord]) -> Vec<TeamFormRow> {
    let teams = team_names(matches);
    let mut rows: Vec<TeamFormRow> = teams
        .par_iter()
        .map(|team| {
            let split = aggregate_team(matches, team);
            TeamFormRow {
                team: team.clone(),
                metrics: compute_metrics(&split),
                split,
            }
        })
        .collect();
    sort_rows(&mut rows, RankMetric::WinRate);
    rows
}

/// Sort descending by the chosen metric; ties break on team name so the
/// table is stable across recomputes.
pub fn sort_rows(rows: &mut [TeamFormRow], metric: RankMetric) {
    rows.sort_by(|a, b| {
        let ord = match metric {
            RankMetric::WinRate => b
                .metrics
                .win_rate
                .partial_cmp(&a.metrics.win_rate)
                .unwrap_or(std::cmp::Ordering::Equal),
            RankMetric::GoalDifference => b.goal_difference().cmp(&a.goal_difference()),
            RankMetric::GoalsScored => b.goals_scored().cmp(&a.goals_scored()),
            RankMetric::Played => b
                .metrics
                .matches_played
                .cmp(&a.metrics.matches_played),
        };
        ord.then_with(|| a.team.cmp(&b.team))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(home: &str, away: &str, hs: u32, a: u32) -> MatchRecord {
        MatchRecord {
            match_id: 0,
            match_date: String::new(),
            competition_id: 1,
            season_id: 1,
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_score: hs,
            away_score: a,
        }
    }

    #[test]
    fn every_team_gets_a_row() {
        let season = vec![rec("A", "B", 2, 0), rec("C", "A", 1, 1)];
        let rows = compute_season_form(&season);
        assert_eq!(rows.len(), 3);
        // A: one win one draw, tops the win-rate order.
        assert_eq!(rows[0].team, "A");
        assert_eq!(rows[0].metrics.matches_played, 2);
    }

    #[test]
    fn gd_sort_puts_heavy_scorers_first() {
        let season = vec![rec("A", "B", 4, 0), rec("B", "C", 1, 0)];
        let mut rows = compute_season_form(&season);
        sort_rows(&mut rows, RankMetric::GoalDifference);
        assert_eq!(rows[0].team, "A");
        assert_eq!(rows[0].goal_difference(), 4);
    }
}
