use crate::open_data::MatchRecord;

/// Running result counts for one team in one venue context (home or away).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VenueTally {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl VenueTally {
    pub fn matches(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    fn record(&mut self, scored: u32, conceded: u32) {
        self.goals_for += scored;
        self.goals_against += conceded;
        if scored > conceded {
            self.wins += 1;
        } else if scored < conceded {
            self.losses += 1;
        } else {
            self.draws += 1;
        }
    }
}

/// One team's season, split by venue context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamSplit {
    pub home: VenueTally,
    pub away: VenueTally,
}

impl TeamSplit {
    pub fn matches(&self) -> u32 {
        self.home.matches() + self.away.matches()
    }
}

/// Scan a season once and tally the given team's results by venue.
///
/// Team names are compared with exact string equality; records where the
/// team is neither participant are skipped. An empty or non-matching season
/// yields zero tallies, which is the ordinary "team played zero matches"
/// answer rather than an error.
pub fn aggregate_team(matches: &[MatchRecord], team_name: &str) -> TeamSplit {
    let mut split = TeamSplit::default();
    for m in matches {
        if m.home_team == team_name {
            split.home.record(m.home_score, m.away_score);
        } else if m.away_team == team_name {
            split.away.record(m.away_score, m.home_score);
        }
    }
    split
}
