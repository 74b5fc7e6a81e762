use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use rusqlite::{Connection, params};

use crate::open_data::{self, MatchRecord};

#[derive(Debug, Clone)]
pub struct SeasonIngestSummary {
    pub competition_id: u32,
    pub season_id: u32,
    pub matches_upserted: usize,
    pub latest_match_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub db_path: PathBuf,
    pub seasons_total: usize,
    pub seasons_succeeded: usize,
    pub matches_upserted: usize,
    pub per_season: Vec<SeasonIngestSummary>,
    pub errors: Vec<String>,
}

pub fn default_db_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join("formcast").join("matches.sqlite"));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join("formcast")
            .join("matches.sqlite"),
    )
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS matches (
            match_id INTEGER PRIMARY KEY,
            competition_id INTEGER NOT NULL,
            season_id INTEGER NOT NULL,
            match_date TEXT NOT NULL,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,
            home_score INTEGER NOT NULL,
            away_score INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_matches_season ON matches(competition_id, season_id);
        CREATE INDEX IF NOT EXISTS idx_matches_date ON matches(match_date);

        CREATE TABLE IF NOT EXISTS ingest_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            finished_at TEXT NULL,
            seasons_total INTEGER NOT NULL,
            seasons_succeeded INTEGER NOT NULL,
            matches_upserted INTEGER NOT NULL,
            errors_json TEXT NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Ingest the given competition/season pairs from open-data files into the
/// store. A season that fails to load is recorded and skipped; the run only
/// fails outright when no seasons were requested.
pub fn ingest_seasons(
    conn: &mut Connection,
    db_path: PathBuf,
    data_dir: &Path,
    seasons: &[(u32, u32)],
) -> Result<IngestSummary> {
    if seasons.is_empty() {
        return Err(anyhow!("no competition/season pairs passed to ingest"));
    }

    let started_at = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO ingest_runs(started_at, finished_at, seasons_total, seasons_succeeded, matches_upserted, errors_json)
         VALUES (?1, NULL, ?2, 0, 0, '[]')",
        params![started_at, seasons.len() as i64],
    )
    .context("insert ingest run")?;
    let run_id = conn.last_insert_rowid();

    let mut seasons_succeeded = 0usize;
    let mut matches_upserted = 0usize;
    let mut per_season = Vec::new();
    let mut errors: Vec<String> = Vec::new();

    for &(competition_id, season_id) in seasons {
        match open_data::load_season_matches(data_dir, competition_id, season_id) {
            Ok(rows) => {
                let tx = conn.transaction().context("begin ingest transaction")?;
                for row in &rows {
                    upsert_match(&tx, row)?;
                }
                tx.commit().context("commit ingest transaction")?;
                matches_upserted += rows.len();
                seasons_succeeded += 1;

                let latest_match_date = latest_match_date(conn, competition_id, season_id)?;
                per_season.push(SeasonIngestSummary {
                    competition_id,
                    season_id,
                    matches_upserted: rows.len(),
                    latest_match_date,
                });
            }
            Err(err) => {
                errors.push(format!("competition {competition_id} season {season_id}: {err}"));
            }
        }
    }

    let finished_at = Utc::now().to_rfc3339();
    let errors_json = serde_json::to_string(&errors).unwrap_or_else(|_| "[]".to_string());
    conn.execute(
        "UPDATE ingest_runs
         SET finished_at = ?1, seasons_succeeded = ?2, matches_upserted = ?3, errors_json = ?4
         WHERE run_id = ?5",
        params![
            finished_at,
            seasons_succeeded as i64,
            matches_upserted as i64,
            errors_json,
            run_id
        ],
    )
    .context("update ingest run")?;

    Ok(IngestSummary {
        db_path,
        seasons_total: seasons.len(),
        seasons_succeeded,
        matches_upserted,
        per_season,
        errors,
    })
}

pub fn load_season(
    conn: &Connection,
    competition_id: u32,
    season_id: u32,
) -> Result<Vec<MatchRecord>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT match_id, competition_id, season_id, match_date,
                   home_team, away_team, home_score, away_score
            FROM matches
            WHERE competition_id = ?1 AND season_id = ?2
            ORDER BY match_date ASC, match_id ASC
            "#,
        )
        .context("prepare load season query")?;

    let rows = stmt
        .query_map(params![competition_id as i64, season_id as i64], |row| {
            Ok(MatchRecord {
                match_id: row.get::<_, u64>(0)?,
                competition_id: row.get::<_, u32>(1)?,
                season_id: row.get::<_, u32>(2)?,
                match_date: row.get(3)?,
                home_team: row.get(4)?,
                away_team: row.get(5)?,
                home_score: row.get::<_, u32>(6)?,
                away_score: row.get::<_, u32>(7)?,
            })
        })
        .context("query load season")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode match row")?);
    }
    Ok(out)
}

pub fn upsert_match(tx: &rusqlite::Transaction<'_>, m: &MatchRecord) -> Result<()> {
    tx.execute(
        r#"
        INSERT INTO matches (
            match_id, competition_id, season_id, match_date,
            home_team, away_team, home_score, away_score, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(match_id) DO UPDATE SET
            competition_id = excluded.competition_id,
            season_id = excluded.season_id,
            match_date = excluded.match_date,
            home_team = excluded.home_team,
            away_team = excluded.away_team,
            home_score = excluded.home_score,
            away_score = excluded.away_score,
            updated_at = excluded.updated_at
        "#,
        params![
            m.match_id as i64,
            m.competition_id as i64,
            m.season_id as i64,
            m.match_date,
            m.home_team,
            m.away_team,
            m.home_score as i64,
            m.away_score as i64,
            Utc::now().to_rfc3339(),
        ],
    )
    .context("upsert match")?;
    Ok(())
}

fn latest_match_date(
    conn: &Connection,
    competition_id: u32,
    season_id: u32,
) -> Result<Option<String>> {
    conn.query_row(
        "SELECT MAX(match_date) FROM matches WHERE competition_id = ?1 AND season_id = ?2",
        params![competition_id as i64, season_id as i64],
        |row| row.get::<_, Option<String>>(0),
    )
    .context("query latest match_date")
}
