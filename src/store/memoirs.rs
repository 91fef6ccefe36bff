//! `MemoirStore`: the `memoirs` SQLite table.
//!
//! All I/O is synchronous (blocking). Async callers go through
//! [`MemoirHandle`](super::MemoirHandle), which dispatches each call to
//! `spawn_blocking`. A fresh connection is opened per operation so the store
//! is `Send + Sync` without a lock.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info};

use super::StoreError;
use super::types::{Memoir, MemoirSummary, NewMemoir, word_count};

const SCHEMA_VERSION: i64 = 1;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_LIST_LIMIT: usize = 50;
pub const MAX_LIST_LIMIT: usize = 100;

const MEMOIR_COLUMNS: &str = "id, title, content, theme, style, word_count, conversation_data, \
                              created_at, updated_at, user_id, is_public, views";

#[derive(Debug, Clone)]
pub struct MemoirStore {
    db_path: PathBuf,
}

impl MemoirStore {
    /// Open (creating if needed) the database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::Io(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let store = Self {
            db_path: db_path.to_path_buf(),
        };
        store.init_db()?;
        info!(db_path = %store.db_path.display(), "memoir store ready");
        Ok(store)
    }

    /// Validate and insert a new memoir. Nothing is written when a required
    /// field is missing.
    pub fn insert(&self, new: NewMemoir) -> Result<Memoir, StoreError> {
        let valid = new.validate()?;

        let now = now_iso8601();
        let memoir = Memoir {
            id: uuid::Uuid::now_v7().to_string(),
            word_count: word_count(&valid.content),
            title: valid.title,
            content: valid.content,
            theme: valid.theme,
            style: valid.style,
            conversation_data: valid.conversation_data,
            created_at: now.clone(),
            updated_at: now,
            user_id: valid.user_id,
            is_public: valid.is_public,
            views: 0,
        };

        let conversation_json = serde_json::to_string(&memoir.conversation_data)
            .map_err(|e| StoreError::Database(format!("serialize conversation_data: {e}")))?;

        let conn = self.open_conn()?;
        conn.execute(
            "INSERT INTO memoirs (id, title, content, theme, style, word_count, conversation_data, \
             created_at, updated_at, user_id, is_public, views) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                memoir.id,
                memoir.title,
                memoir.content,
                memoir.theme,
                memoir.style,
                memoir.word_count,
                conversation_json,
                memoir.created_at,
                memoir.updated_at,
                memoir.user_id,
                memoir.is_public,
                memoir.views,
            ],
        )
        .map_err(|e| StoreError::Database(format!("insert memoir: {e}")))?;

        debug!(memoir_id = %memoir.id, word_count = memoir.word_count, "memoir inserted");
        Ok(memoir)
    }

    /// Read a memoir and count the read. Returns the row with `views`
    /// already incremented, or `None` for an unknown id.
    pub fn get_and_count_view(&self, id: &str) -> Result<Option<Memoir>, StoreError> {
        let mut conn = self.open_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(format!("begin tx: {e}")))?;

        let updated = tx
            .execute("UPDATE memoirs SET views = views + 1 WHERE id = ?1", params![id])
            .map_err(|e| StoreError::Database(format!("increment views for {id}: {e}")))?;
        if updated == 0 {
            return Ok(None);
        }

        let memoir = tx
            .query_row(
                &format!("SELECT {MEMOIR_COLUMNS} FROM memoirs WHERE id = ?1"),
                params![id],
                row_to_memoir,
            )
            .map_err(|e| StoreError::Database(format!("get memoir {id}: {e}")))?;

        tx.commit()
            .map_err(|e| StoreError::Database(format!("commit view for {id}: {e}")))?;
        Ok(Some(memoir))
    }

    /// Read a memoir without touching its view counter.
    #[cfg(test)]
    fn find(&self, id: &str) -> Result<Option<Memoir>, StoreError> {
        let conn = self.open_conn()?;
        conn.query_row(
            &format!("SELECT {MEMOIR_COLUMNS} FROM memoirs WHERE id = ?1"),
            params![id],
            row_to_memoir,
        )
        .optional()
        .map_err(|e| StoreError::Database(format!("find memoir {id}: {e}")))
    }

    /// Summaries for one user, newest first. `limit` is clamped to
    /// `1..=MAX_LIST_LIMIT`.
    pub fn list_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<MemoirSummary>, StoreError> {
        let limit = limit.clamp(1, MAX_LIST_LIMIT) as i64;
        let conn = self.open_conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, title, theme, style, word_count, created_at, user_id, views \
                 FROM memoirs WHERE user_id = ?1 \
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
            )
            .map_err(|e| StoreError::Database(format!("prepare list_by_user: {e}")))?;

        let rows = stmt
            .query_map(params![user_id, limit], |row| {
                Ok(MemoirSummary {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    theme: row.get(2)?,
                    style: row.get(3)?,
                    word_count: row.get(4)?,
                    created_at: row.get(5)?,
                    user_id: row.get(6)?,
                    views: row.get(7)?,
                })
            })
            .map_err(|e| StoreError::Database(format!("query list_by_user: {e}")))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| StoreError::Database(format!("map list_by_user row: {e}")))?);
        }
        Ok(out)
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.open_conn()?;
        conn.query_row("SELECT COUNT(*) FROM memoirs", [], |row| row.get::<_, i64>(0))
            .map(|n| n as u64)
            .map_err(|e| StoreError::Database(format!("count memoirs: {e}")))
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn open_conn(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.db_path).map_err(|e| {
            StoreError::Database(format!("open {}: {e}", self.db_path.display()))
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| StoreError::Database(format!("set busy_timeout: {e}")))?;
        Ok(conn)
    }

    fn init_db(&self) -> Result<(), StoreError> {
        let conn = self.open_conn()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS memoirs (
                id                TEXT PRIMARY KEY,
                title             TEXT NOT NULL,
                content           TEXT NOT NULL,
                theme             TEXT NOT NULL,
                style             TEXT NOT NULL,
                word_count        INTEGER NOT NULL DEFAULT 0,
                conversation_data TEXT NOT NULL DEFAULT '[]',
                created_at        TEXT NOT NULL,
                updated_at        TEXT NOT NULL,
                user_id           TEXT NOT NULL DEFAULT 'anonymous',
                is_public         INTEGER NOT NULL DEFAULT 0,
                views             INTEGER NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_memoirs_user ON memoirs(user_id, created_at DESC);",
        )
        .map_err(|e| StoreError::Database(format!("init schema: {e}")))?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(|e| StoreError::Database(format!("set user_version: {e}")))?;
        Ok(())
    }
}

fn row_to_memoir(row: &Row<'_>) -> rusqlite::Result<Memoir> {
    let conversation_json: String = row.get(6)?;
    Ok(Memoir {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        theme: row.get(3)?,
        style: row.get(4)?,
        word_count: row.get(5)?,
        conversation_data: serde_json::from_str(&conversation_json)
            .unwrap_or_else(|_| serde_json::Value::Array(Vec::new())),
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
        user_id: row.get(9)?,
        is_public: row.get(10)?,
        views: row.get(11)?,
    })
}

fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_tmp() -> (TempDir, MemoirStore) {
        let tmp = TempDir::new().unwrap();
        let store = MemoirStore::open(&tmp.path().join("nested").join("memoirs.db")).unwrap();
        (tmp, store)
    }

    #[test]
    fn open_creates_parent_dirs() {
        let (tmp, store) = open_tmp();
        assert!(tmp.path().join("nested").join("memoirs.db").exists());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn reopen_keeps_rows() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("memoirs.db");
        MemoirStore::open(&path)
            .unwrap()
            .insert(NewMemoir::new("t", "c", "童年时光", "warm"))
            .unwrap();
        assert_eq!(MemoirStore::open(&path).unwrap().count().unwrap(), 1);
    }

    #[test]
    fn insert_rejects_missing_fields_without_writing() {
        let (_tmp, store) = open_tmp();
        let err = store
            .insert(NewMemoir {
                title: Some("t".into()),
                content: Some("c".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn unknown_id_returns_none() {
        let (_tmp, store) = open_tmp();
        assert!(store.get_and_count_view("missing").unwrap().is_none());
        assert!(store.find("missing").unwrap().is_none());
    }

    #[test]
    fn corrupt_conversation_json_reads_as_empty() {
        let (_tmp, store) = open_tmp();
        let m = store.insert(NewMemoir::new("t", "c", "童年时光", "warm")).unwrap();
        store
            .open_conn()
            .unwrap()
            .execute(
                "UPDATE memoirs SET conversation_data = 'not json' WHERE id = ?1",
                params![m.id],
            )
            .unwrap();
        let found = store.find(&m.id).unwrap().unwrap();
        assert_eq!(found.conversation_data, serde_json::json!([]));
    }
}
