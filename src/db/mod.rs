use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub mod models;
use models::*;

use crate::error::{Error, Result};

/// Thread-safe SQLite snapshot store (single connection with mutex).
///
/// Snapshots are append-only: one `snapshots` row plus its `participants`
/// rows per capture, never updated or deleted. "Latest" is the row with
/// the maximum `created_at` (id breaks ties among equal timestamps).
#[derive(Clone)]
pub struct SnapshotStore {
    conn: Arc<Mutex<Connection>>,
}

impl SnapshotStore {
    /// Open (or create) the SQLite database at the given path
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let store = SnapshotStore {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.run_migrations()?;
        Ok(store)
    }

    /// Run schema migrations (idempotent)
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    /// Timestamp of the most recent snapshot, or `None` if the store is
    /// empty. Split from `read_latest` so the freshness check never loads
    /// the participant list.
    pub fn latest_timestamp(&self) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn.lock().unwrap();
        let row = conn.query_row(
            "SELECT created_at FROM snapshots ORDER BY created_at DESC, id DESC LIMIT 1",
            [],
            |row| row.get(0),
        );
        match row {
            Ok(ts) => Ok(Some(ts)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Read the most recent snapshot with its full participant list.
    pub fn read_latest(&self) -> Result<Snapshot> {
        let conn = self.conn.lock().unwrap();
        let (snapshot_id, timestamp): (i64, DateTime<Utc>) = match conn.query_row(
            "SELECT id, created_at FROM snapshots ORDER BY created_at DESC, id DESC LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        ) {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Err(Error::NotFound),
            Err(e) => return Err(e.into()),
        };

        let mut stmt = conn.prepare(
            "SELECT participant_id, name, stars FROM participants
             WHERE snapshot_id = ?1 ORDER BY idx",
        )?;
        let participants = stmt
            .query_map(params![snapshot_id], map_participant)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Snapshot {
            timestamp,
            participants,
        })
    }

    /// Persist a new snapshot stamped with the current time and return it.
    ///
    /// The snapshot row and all participant rows commit as one
    /// transaction: a concurrent reader sees the previous snapshot in
    /// full or the new one in full, never a partial participant list.
    pub fn append(&self, participants: &[Participant]) -> Result<Snapshot> {
        let timestamp = Utc::now();
        let mut conn = self.conn.lock().unwrap();

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO snapshots (created_at) VALUES (?1)",
            params![timestamp],
        )?;
        let snapshot_id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO participants (snapshot_id, idx, participant_id, name, stars)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (idx, p) in participants.iter().enumerate() {
                stmt.execute(params![snapshot_id, idx as i64, p.id, p.name, p.stars])?;
            }
        }
        tx.commit()?;

        Ok(Snapshot {
            timestamp,
            participants: participants.to_vec(),
        })
    }
}

// ── SQL helpers ────────────────────────────────────────────────────────────────

fn map_participant(row: &rusqlite::Row) -> rusqlite::Result<Participant> {
    Ok(Participant {
        id: row.get(0)?,
        name: row.get(1)?,
        stars: row.get(2)?,
    })
}

/// SQLite schema (idempotent CREATE IF NOT EXISTS)
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS snapshots (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS participants (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    snapshot_id    INTEGER NOT NULL,
    idx            INTEGER NOT NULL,
    participant_id INTEGER NOT NULL,
    name           TEXT    NOT NULL,
    stars          INTEGER NOT NULL,
    FOREIGN KEY (snapshot_id) REFERENCES snapshots(id)
);

CREATE INDEX IF NOT EXISTS idx_snapshots_created ON snapshots(created_at);
CREATE INDEX IF NOT EXISTS idx_participants_snapshot ON participants(snapshot_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn make_participants(n: u32) -> Vec<Participant> {
        (0..n)
            .map(|i| Participant {
                id: i as i64 + 1,
                name: format!("player-{}", i + 1),
                stars: i * 2,
            })
            .collect()
    }

    #[test]
    fn test_empty_store() {
        let store = SnapshotStore::open(":memory:").unwrap();
        assert_eq!(store.latest_timestamp().unwrap(), None);
        assert!(matches!(store.read_latest(), Err(Error::NotFound)));
    }

    #[test]
    fn test_append_then_read_roundtrip() {
        let store = SnapshotStore::open(":memory:").unwrap();
        let participants = make_participants(3);

        let written = store.append(&participants).unwrap();
        assert_eq!(written.participants, participants);

        let read = store.read_latest().unwrap();
        assert_eq!(read.timestamp, written.timestamp);
        assert_eq!(read.participants, participants);
        assert_eq!(store.latest_timestamp().unwrap(), Some(written.timestamp));
    }

    #[test]
    fn test_latest_resolves_to_newest_snapshot() {
        let store = SnapshotStore::open(":memory:").unwrap();
        let s1 = store.append(&make_participants(1)).unwrap();
        let s2 = store.append(&make_participants(2)).unwrap();
        let s3 = store.append(&make_participants(3)).unwrap();

        assert!(s1.timestamp <= s2.timestamp && s2.timestamp <= s3.timestamp);
        assert_eq!(store.latest_timestamp().unwrap(), Some(s3.timestamp));

        let latest = store.read_latest().unwrap();
        assert_eq!(latest.timestamp, s3.timestamp);
        assert_eq!(latest.participants.len(), 3);
    }

    /// The store must hand back participants in exactly the order they
    /// were appended, not sorted by id or score.
    #[test]
    fn test_append_preserves_participant_order() {
        let store = SnapshotStore::open(":memory:").unwrap();
        let participants = vec![
            Participant {
                id: 42,
                name: "Zed".to_string(),
                stars: 5,
            },
            Participant {
                id: 7,
                name: "Al".to_string(),
                stars: 50,
            },
            Participant {
                id: 99,
                name: "Mia".to_string(),
                stars: 0,
            },
        ];

        store.append(&participants).unwrap();
        let read = store.read_latest().unwrap();
        assert_eq!(read.participants, participants);
    }

    /// A reader racing concurrent appends must observe complete snapshots
    /// only: every `read_latest` returns all N participants of whichever
    /// snapshot it lands on, never a partially written list.
    #[test]
    fn test_reader_never_observes_partial_snapshot() {
        let store = SnapshotStore::open(":memory:").unwrap();
        let per_snapshot = 50;
        store.append(&make_participants(per_snapshot)).unwrap();

        let writer_store = store.clone();
        let writer = std::thread::spawn(move || {
            for _ in 0..20 {
                writer_store
                    .append(&make_participants(per_snapshot))
                    .unwrap();
            }
        });

        for _ in 0..200 {
            let snapshot = store.read_latest().unwrap();
            assert_eq!(snapshot.participants.len(), per_snapshot as usize);
        }
        writer.join().unwrap();
    }

    #[test]
    fn test_empty_participant_list_is_a_valid_snapshot() {
        let store = SnapshotStore::open(":memory:").unwrap();
        let written = store.append(&[]).unwrap();

        let read = store.read_latest().unwrap();
        assert_eq!(read.timestamp, written.timestamp);
        assert!(read.participants.is_empty());
    }
}
