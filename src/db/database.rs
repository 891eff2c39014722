// src/db/database.rs

use rusqlite::{params, Connection, OptionalExtension, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Mutex;

/// One processed shot as stored in the history table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotRecord {
    pub id: i64,
    pub received_at: String,
    pub source: String,
    pub shot_name: String,
    pub shot_rank: String,
    pub carry_distance_meters: Option<f64>,
    pub offline_distance_meters: Option<f64>,
    pub total_distance_meters: Option<f64>,
    pub result: Value,
}

/// Fields needed to insert a new shot.
pub struct NewShot<'a> {
    pub received_at: &'a str,
    pub source: &'a str,
    pub shot_name: &'a str,
    pub shot_rank: &'a str,
    pub carry_distance_meters: Option<f64>,
    pub offline_distance_meters: Option<f64>,
    pub total_distance_meters: Option<f64>,
    pub result: &'a Value,
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens (or creates) the history database at `path`. `":memory:"` gives
    /// a private in-memory store.
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(include_str!("schema.sql"))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    //---  FETCH METHODS

    pub fn recent_shots(&self, limit: u32) -> Result<Vec<ShotRecord>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, received_at, source, shot_name, shot_rank,
                    carry_distance_meters, offline_distance_meters, total_distance_meters,
                    result_json
             FROM shots
             ORDER BY id DESC
             LIMIT ?1",
        )?;

        let shots = stmt.query_map([limit], |row| {
            let result_json: String = row.get(8)?;
            Ok(ShotRecord {
                id: row.get(0)?,
                received_at: row.get(1)?,
                source: row.get(2)?,
                shot_name: row.get(3)?,
                shot_rank: row.get(4)?,
                carry_distance_meters: row.get(5)?,
                offline_distance_meters: row.get(6)?,
                total_distance_meters: row.get(7)?,
                result: serde_json::from_str(&result_json).unwrap_or(Value::Null),
            })
        })?;

        shots.collect()
    }

    pub fn shot_count(&self) -> Result<i64> {
        let conn = self.lock();
        conn.query_row("SELECT COUNT(*) FROM shots", [], |row| row.get(0))
    }

    pub fn last_received_at(&self) -> Result<Option<String>> {
        let conn = self.lock();
        conn.query_row(
            "SELECT received_at FROM shots ORDER BY id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
    }

    //---  UPDATE METHODS

    pub fn record_shot(&self, shot: &NewShot<'_>) -> Result<i64> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO shots (received_at, source, shot_name, shot_rank,
                                carry_distance_meters, offline_distance_meters,
                                total_distance_meters, result_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                shot.received_at,
                shot.source,
                shot.shot_name,
                shot.shot_rank,
                shot.carry_distance_meters,
                shot.offline_distance_meters,
                shot.total_distance_meters,
                shot.result.to_string(),
            ],
        )?;

        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(id)
    }

    pub fn clear(&self) -> Result<usize> {
        let conn = self.lock();
        conn.execute("DELETE FROM shots", [])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn insert(db: &Database, name: &str, carry: f64) -> i64 {
        let result = json!({ "shot_name": name });
        db.record_shot(&NewShot {
            received_at: "2026-01-01T00:00:00Z",
            source: "native",
            shot_name: name,
            shot_rank: "A",
            carry_distance_meters: Some(carry),
            offline_distance_meters: Some(1.0),
            total_distance_meters: None,
            result: &result,
        })
        .unwrap()
    }

    #[test]
    fn records_and_lists_newest_first() {
        let db = Database::new(":memory:").unwrap();
        insert(&db, "Straight", 200.0);
        insert(&db, "Push Draw", 190.0);

        let shots = db.recent_shots(10).unwrap();
        assert_eq!(shots.len(), 2);
        assert_eq!(shots[0].shot_name, "Push Draw");
        assert_eq!(shots[1].carry_distance_meters, Some(200.0));
        assert_eq!(shots[0].total_distance_meters, None);
        assert_eq!(shots[0].result["shot_name"], json!("Push Draw"));
        assert_eq!(db.shot_count().unwrap(), 2);
    }

    #[test]
    fn limit_and_clear() {
        let db = Database::new(":memory:").unwrap();
        for i in 0..5 {
            insert(&db, "Straight", 100.0 + i as f64);
        }
        assert_eq!(db.recent_shots(3).unwrap().len(), 3);
        assert_eq!(db.clear().unwrap(), 5);
        assert_eq!(db.shot_count().unwrap(), 0);
        assert_eq!(db.last_received_at().unwrap(), None);
    }

    #[test]
    fn persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shots.db");
        let path = path.to_str().unwrap();
        {
            let db = Database::new(path).unwrap();
            insert(&db, "Fade", 180.0);
        }
        let reopened = Database::new(path).unwrap();
        assert_eq!(reopened.shot_count().unwrap(), 1);
        assert_eq!(
            reopened.last_received_at().unwrap().as_deref(),
            Some("2026-01-01T00:00:00Z")
        );
    }
}
