use std::collections::VecDeque;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::match_store;
use crate::metrics::{TeamMetrics, compute_metrics};
use crate::open_data::{self, MatchRecord};
use crate::predict::{OutcomeProbs, predict_outcome};
use crate::rankings::{RankMetric, TeamFormRow, compute_season_form, sort_rows};
use crate::tally::{TeamSplit, aggregate_team};

const LOG_CAPACITY: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Setup,
    Dashboard,
    Rankings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickSlot {
    Team1,
    Team2,
}

/// Everything the dashboard shows for one hypothetical matchup. Derived
/// wholesale from the loaded season; recomputed, never mutated in place.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub team1: String,
    pub team2: String,
    pub split1: TeamSplit,
    pub split2: TeamSplit,
    pub metrics1: TeamMetrics,
    pub metrics2: TeamMetrics,
    pub outcome: Option<OutcomeProbs>,
}

pub fn build_comparison(matches: &[MatchRecord], team1: &str, team2: &str) -> Comparison {
    let split1 = aggregate_team(matches, team1);
    let split2 = aggregate_team(matches, team2);
    let metrics1 = compute_metrics(&split1);
    let metrics2 = compute_metrics(&split2);
    let outcome = predict_outcome(&metrics1, &metrics2);
    Comparison {
        team1: team1.to_string(),
        team2: team2.to_string(),
        split1,
        split2,
        metrics1,
        metrics2,
        outcome,
    }
}

/// Mutable UI state. The core transforms stay parameter-only; this struct is
/// owned by the terminal loop and is the single place selections live.
pub struct AppState {
    pub screen: Screen,
    pub data_dir: PathBuf,
    pub competition_id: u32,
    pub season_id: u32,
    pub season_label: String,
    pub matches: Vec<MatchRecord>,
    pub teams: Vec<String>,
    pub pick_slot: PickSlot,
    pub team1_selected: usize,
    pub team2_selected: usize,
    pub comparison: Option<Comparison>,
    pub rankings: Vec<TeamFormRow>,
    pub rankings_selected: usize,
    pub rankings_metric: RankMetric,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub last_export: Option<PathBuf>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let competition_id = parse_env_or_default("FORMCAST_COMPETITION_ID", 9);
        let season_id = parse_env_or_default("FORMCAST_SEASON_ID", 27);
        Self {
            screen: Screen::Setup,
            data_dir: open_data::default_data_dir().to_path_buf(),
            competition_id,
            season_id,
            season_label: String::new(),
            matches: Vec::new(),
            teams: Vec::new(),
            pick_slot: PickSlot::Team1,
            team1_selected: 0,
            team2_selected: 0,
            comparison: None,
            rankings: Vec::new(),
            rankings_selected: 0,
            rankings_metric: RankMetric::WinRate,
            logs: VecDeque::with_capacity(LOG_CAPACITY),
            help_overlay: false,
            last_export: None,
        }
    }

    /// Load the configured season, preferring the open-data files and
    /// falling back to the sqlite store when the files are unavailable.
    pub fn load_season(&mut self) -> Result<()> {
        let matches = match open_data::load_season_matches(
            &self.data_dir,
            self.competition_id,
            self.season_id,
        ) {
            Ok(rows) => rows,
            Err(file_err) => self
                .load_season_from_store()
                .with_context(|| format!("open-data load failed: {file_err:#}"))?,
        };
        self.replace_matches(matches);
        self.refresh_season_label();
        Ok(())
    }

    fn load_season_from_store(&self) -> Result<Vec<MatchRecord>> {
        let db_path = match_store::default_db_path().context("no sqlite store path resolvable")?;
        let conn = match_store::open_db(&db_path)?;
        let rows = match_store::load_season(&conn, self.competition_id, self.season_id)?;
        if rows.is_empty() {
            anyhow::bail!(
                "sqlite store has no matches for competition {} season {}",
                self.competition_id,
                self.season_id
            );
        }
        Ok(rows)
    }

    /// Install a match sequence and rebuild everything derived from it.
    pub fn replace_matches(&mut self, matches: Vec<MatchRecord>) {
        self.matches = matches;
        self.teams = open_data::team_names(&self.matches);
        self.rankings = compute_season_form(&self.matches);
        sort_rows(&mut self.rankings, self.rankings_metric);
        self.rankings_selected = 0;
        self.team1_selected = 0;
        self.team2_selected = if self.teams.len() > 1 { 1 } else { 0 };
        self.pick_slot = PickSlot::Team1;
        self.recompute_comparison();
    }

    fn refresh_season_label(&mut self) {
        self.season_label = match open_data::list_competitions(&self.data_dir) {
            Ok(list) => list
                .iter()
                .find(|c| c.competition_id == self.competition_id && c.season_id == self.season_id)
                .map(|c| format!("{} {}", c.competition_name, c.season_name))
                .unwrap_or_default(),
            Err(_) => String::new(),
        };
        if self.season_label.is_empty() {
            self.season_label = format!(
                "competition {} / season {}",
                self.competition_id, self.season_id
            );
        }
    }

    pub fn team1(&self) -> Option<&str> {
        self.teams.get(self.team1_selected).map(String::as_str)
    }

    pub fn team2(&self) -> Option<&str> {
        self.teams.get(self.team2_selected).map(String::as_str)
    }

    pub fn recompute_comparison(&mut self) {
        self.comparison = match (self.team1(), self.team2()) {
            (Some(t1), Some(t2)) => Some(build_comparison(&self.matches, t1, t2)),
            _ => None,
        };
    }

    pub fn select_next(&mut self) {
        match self.screen {
            Screen::Setup => {
                let len = self.teams.len();
                if len == 0 {
                    return;
                }
                let slot = self.pick_slot_index_mut();
                *slot = (*slot + 1) % len;
            }
            Screen::Rankings => {
                if !self.rankings.is_empty() {
                    self.rankings_selected =
                        (self.rankings_selected + 1).min(self.rankings.len() - 1);
                }
            }
            Screen::Dashboard => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.screen {
            Screen::Setup => {
                let len = self.teams.len();
                if len == 0 {
                    return;
                }
                let slot = self.pick_slot_index_mut();
                *slot = if *slot == 0 { len - 1 } else { *slot - 1 };
            }
            Screen::Rankings => {
                self.rankings_selected = self.rankings_selected.saturating_sub(1);
            }
            Screen::Dashboard => {}
        }
    }

    fn pick_slot_index_mut(&mut self) -> &mut usize {
        match self.pick_slot {
            PickSlot::Team1 => &mut self.team1_selected,
            PickSlot::Team2 => &mut self.team2_selected,
        }
    }

    pub fn toggle_pick_slot(&mut self) {
        self.pick_slot = match self.pick_slot {
            PickSlot::Team1 => PickSlot::Team2,
            PickSlot::Team2 => PickSlot::Team1,
        };
    }

    pub fn confirm_matchup(&mut self) {
        if self.teams.is_empty() {
            self.push_log("[INFO] No teams loaded; nothing to compare");
            return;
        }
        self.recompute_comparison();
        self.screen = Screen::Dashboard;
        if let Some(cmp) = &self.comparison {
            if cmp.outcome.is_none() {
                self.push_log("[WARN] Insufficient data for a prediction");
            }
        }
    }

    pub fn cycle_rank_metric(&mut self) {
        self.rankings_metric = self.rankings_metric.next();
        sort_rows(&mut self.rankings, self.rankings_metric);
        self.rankings_selected = 0;
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.logs.len() >= LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(line.into());
    }
}

fn parse_env_or_default(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .unwrap_or(default)
}
