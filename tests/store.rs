use std::path::PathBuf;

use rusqlite::Connection;

use formcast::match_store::{ingest_seasons, init_schema, load_season, upsert_match};
use formcast::open_data::MatchRecord;

fn rec(id: u64, date: &str, home: &str, away: &str, home_score: u32, away_score: u32) -> MatchRecord {
    MatchRecord {
        match_id: id,
        match_date: date.to_string(),
        competition_id: 9,
        season_id: 27,
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_score,
        away_score,
    }
}

fn open_memory_db() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory sqlite");
    init_schema(&conn).expect("schema should apply");
    conn
}

#[test]
fn round_trips_a_season_ordered_by_date() {
    let mut conn = open_memory_db();

    let tx = conn.transaction().unwrap();
    upsert_match(&tx, &rec(2, "2020-09-19", "A", "C", 0, 0)).unwrap();
    upsert_match(&tx, &rec(1, "2020-09-12", "A", "B", 3, 1)).unwrap();
    tx.commit().unwrap();

    let rows = load_season(&conn, 9, 27).expect("load season");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].match_id, 1);
    assert_eq!(rows[0].match_date, "2020-09-12");
    assert_eq!(rows[1].home_team, "A");
    assert_eq!(rows[1].away_team, "C");
}

#[test]
fn upsert_replaces_on_match_id() {
    let mut conn = open_memory_db();

    let tx = conn.transaction().unwrap();
    upsert_match(&tx, &rec(1, "2020-09-12", "A", "B", 0, 0)).unwrap();
    upsert_match(&tx, &rec(1, "2020-09-12", "A", "B", 3, 1)).unwrap();
    tx.commit().unwrap();

    let rows = load_season(&conn, 9, 27).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].home_score, 3);
    assert_eq!(rows[0].away_score, 1);
}

#[test]
fn other_seasons_are_not_returned() {
    let mut conn = open_memory_db();

    let tx = conn.transaction().unwrap();
    upsert_match(&tx, &rec(1, "2020-09-12", "A", "B", 1, 0)).unwrap();
    let mut other = rec(2, "2019-09-12", "A", "B", 2, 2);
    other.season_id = 90;
    upsert_match(&tx, &other).unwrap();
    tx.commit().unwrap();

    assert_eq!(load_season(&conn, 9, 27).unwrap().len(), 1);
    assert_eq!(load_season(&conn, 9, 90).unwrap().len(), 1);
    assert!(load_season(&conn, 43, 3).unwrap().is_empty());
}

#[test]
fn ingest_keeps_one_row_per_played_match() {
    // Id-less records must not collapse into a single primary-key slot;
    // the loader drops them before they reach the store.
    let data_dir = std::env::temp_dir().join("formcast_store_ingest_test");
    let season_dir = data_dir.join("matches").join("9");
    std::fs::create_dir_all(&season_dir).expect("create season dir");
    std::fs::write(
        season_dir.join("27.json"),
        r#"[
            {"match_id": 1, "match_date": "2020-09-12",
             "home_team": "A", "away_team": "B", "home_score": 3, "away_score": 1},
            {"home_team": "A", "away_team": "C", "home_score": 1, "away_score": 1},
            {"home_team": "B", "away_team": "C", "home_score": 0, "away_score": 2},
            {"match_id": 2, "match_date": "2020-09-19",
             "home_team": "C", "away_team": "A", "home_score": 0, "away_score": 0}
        ]"#,
    )
    .expect("write season file");

    let mut conn = open_memory_db();
    let summary = ingest_seasons(&mut conn, PathBuf::from(":memory:"), &data_dir, &[(9, 27)])
        .expect("ingest should succeed");
    assert_eq!(summary.seasons_succeeded, 1);
    assert_eq!(summary.matches_upserted, 2);

    let rows = load_season(&conn, 9, 27).expect("load season");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].match_id, 1);
    assert_eq!(rows[1].match_id, 2);

    let _ = std::fs::remove_dir_all(&data_dir);
}
