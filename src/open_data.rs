use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde_json::Value;

/// One played match as the core consumes it. Read-only downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub match_id: u64,
    pub match_date: String,
    pub competition_id: u32,
    pub season_id: u32,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionSeason {
    pub competition_id: u32,
    pub season_id: u32,
    pub competition_name: String,
    pub season_name: String,
}

static DEFAULT_DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    if let Ok(dir) = std::env::var("FORMCAST_DATA_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    PathBuf::from("open-data/data")
});

pub fn default_data_dir() -> &'static Path {
    DEFAULT_DATA_DIR.as_path()
}

/// Load one season's matches from `<data_dir>/matches/<competition>/<season>.json`.
pub fn load_season_matches(
    data_dir: &Path,
    competition_id: u32,
    season_id: u32,
) -> Result<Vec<MatchRecord>> {
    let path = season_file_path(data_dir, competition_id, season_id);
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("read season file {}", path.display()))?;
    parse_season_matches(&raw, competition_id, season_id)
        .with_context(|| format!("decode season file {}", path.display()))
}

pub fn season_file_path(data_dir: &Path, competition_id: u32, season_id: u32) -> PathBuf {
    data_dir
        .join("matches")
        .join(competition_id.to_string())
        .join(format!("{season_id}.json"))
}

/// Decode an open-data season payload. Records missing the match id, either
/// team name or either score are skipped; the id keys the sqlite store, so
/// an id-less record has no stable identity there. Payload shapes drift
/// between dumps, so this walks `Value`s instead of deriving a rigid struct.
pub fn parse_season_matches(
    raw: &str,
    fallback_competition_id: u32,
    fallback_season_id: u32,
) -> Result<Vec<MatchRecord>> {
    let value = serde_json::from_str::<Value>(raw.trim()).context("invalid season json")?;
    let Some(items) = value.as_array() else {
        // "null" or an object payload means no matches, not a hard failure.
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if let Some(record) = parse_match_record(item, fallback_competition_id, fallback_season_id)
        {
            out.push(record);
        }
    }
    Ok(out)
}

fn parse_match_record(v: &Value, fallback_competition_id: u32, fallback_season_id: u32) -> Option<MatchRecord> {
    let home_team = nested_name(v, "home_team", "home_team_name")?;
    let away_team = nested_name(v, "away_team", "away_team_name")?;
    if home_team.is_empty() || away_team.is_empty() {
        return None;
    }

    let home_score = v.get("home_score").and_then(as_u32_any)?;
    let away_score = v.get("away_score").and_then(as_u32_any)?;

    let match_id = v.get("match_id").and_then(as_u64_any)?;
    let match_date = v
        .get("match_date")
        .and_then(|x| x.as_str())
        .unwrap_or_default()
        .to_string();
    let competition_id = v
        .get("competition")
        .and_then(|c| c.get("competition_id"))
        .and_then(as_u32_any)
        .unwrap_or(fallback_competition_id);
    let season_id = v
        .get("season")
        .and_then(|s| s.get("season_id"))
        .and_then(as_u32_any)
        .unwrap_or(fallback_season_id);

    Some(MatchRecord {
        match_id,
        match_date,
        competition_id,
        season_id,
        home_team,
        away_team,
        home_score,
        away_score,
    })
}

fn nested_name(v: &Value, outer: &str, inner: &str) -> Option<String> {
    let node = v.get(outer)?;
    // Some dumps flatten the team object into a bare string.
    if let Some(s) = node.as_str() {
        return Some(s.to_string());
    }
    node.get(inner)?.as_str().map(|s| s.to_string())
}

/// List the competition/season pairs in `<data_dir>/competitions.json`.
pub fn list_competitions(data_dir: &Path) -> Result<Vec<CompetitionSeason>> {
    let path = data_dir.join("competitions.json");
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("read competitions file {}", path.display()))?;
    parse_competitions(&raw)
}

pub fn parse_competitions(raw: &str) -> Result<Vec<CompetitionSeason>> {
    let value = serde_json::from_str::<Value>(raw.trim()).context("invalid competitions json")?;
    let Some(items) = value.as_array() else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let Some(competition_id) = item.get("competition_id").and_then(as_u32_any) else {
            continue;
        };
        let Some(season_id) = item.get("season_id").and_then(as_u32_any) else {
            continue;
        };
        let competition_name = item
            .get("competition_name")
            .and_then(|x| x.as_str())
            .unwrap_or_default()
            .to_string();
        let season_name = item
            .get("season_name")
            .and_then(|x| x.as_str())
            .unwrap_or_default()
            .to_string();
        out.push(CompetitionSeason {
            competition_id,
            season_id,
            competition_name,
            season_name,
        });
    }
    Ok(out)
}

/// Every distinct team in a season, sorted for stable selection widgets.
pub fn team_names(matches: &[MatchRecord]) -> Vec<String> {
    let mut set = BTreeSet::new();
    for m in matches {
        set.insert(m.home_team.clone());
        set.insert(m.away_team.clone());
    }
    set.into_iter().collect()
}

fn as_u64_any(v: &Value) -> Option<u64> {
    if let Some(n) = v.as_u64() {
        return Some(n);
    }
    v.as_str()?.trim().parse::<u64>().ok()
}

fn as_u32_any(v: &Value) -> Option<u32> {
    let n = as_u64_any(v)?;
    u32::try_from(n).ok()
}
