use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use formcast::match_store;
use formcast::open_data;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let data_dir = parse_path_arg("--data-dir")
        .unwrap_or_else(|| open_data::default_data_dir().to_path_buf());

    let seasons = resolve_seasons(&data_dir)?;
    if seasons.is_empty() {
        return Err(anyhow!("no competition/season pairs resolved for ingest"));
    }

    let db_path = parse_path_arg("--db")
        .or_else(match_store::default_db_path)
        .context("unable to resolve sqlite path")?;

    let mut conn = match_store::open_db(&db_path)?;
    let summary = match_store::ingest_seasons(&mut conn, db_path.clone(), &data_dir, &seasons)?;

    println!("Open-data ingest complete");
    println!("DB: {}", summary.db_path.display());
    println!(
        "Seasons: {}/{}",
        summary.seasons_succeeded, summary.seasons_total
    );
    println!("Matches upserted: {}", summary.matches_upserted);

    for item in &summary.per_season {
        println!(
            "competition {} season {}: matches={} latest={}",
            item.competition_id,
            item.season_id,
            item.matches_upserted,
            item.latest_match_date.as_deref().unwrap_or("n/a")
        );
    }
    if !summary.errors.is_empty() {
        println!("errors: {}", summary.errors.len());
        for err in summary.errors.iter().take(6) {
            println!(" - {err}");
        }
    }

    Ok(())
}

/// With `--competition N` alone, every season listed for that competition in
/// competitions.json is ingested; `--seasons` narrows it down. With neither
/// flag, everything in competitions.json goes in.
fn resolve_seasons(data_dir: &std::path::Path) -> Result<Vec<(u32, u32)>> {
    let competition = parse_u32_arg("--competition");
    let season_ids = parse_ids_arg("--seasons");

    if let (Some(competition), Some(season_ids)) = (competition, &season_ids) {
        return Ok(season_ids.iter().map(|s| (competition, *s)).collect());
    }

    let listed = open_data::list_competitions(data_dir)
        .context("list competitions (pass --competition/--seasons to skip)")?;
    let mut out = Vec::new();
    for entry in &listed {
        if let Some(competition) = competition {
            if entry.competition_id != competition {
                continue;
            }
        }
        if let Some(season_ids) = &season_ids {
            if !season_ids.contains(&entry.season_id) {
                continue;
            }
        }
        out.push((entry.competition_id, entry.season_id));
    }
    Ok(out)
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    parse_value_arg(flag).map(PathBuf::from)
}

fn parse_u32_arg(flag: &str) -> Option<u32> {
    parse_value_arg(flag)?.trim().parse::<u32>().ok()
}

fn parse_ids_arg(flag: &str) -> Option<Vec<u32>> {
    let raw = parse_value_arg(flag)?;
    let ids = raw
        .split([',', ';', ' '])
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .collect::<Vec<_>>();
    if ids.is_empty() { None } else { Some(ids) }
}

fn parse_value_arg(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
