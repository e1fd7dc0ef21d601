use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use std::sync::{Mutex, MutexGuard};

use super::Exhibition;
use crate::artwork::Artwork;

/// SQLite-backed exhibition. Artworks are stored as JSON keyed by id.
pub struct SqliteExhibition {
    conn: Mutex<Connection>,
}

impl SqliteExhibition {
    /// Open or create the exhibition table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open exhibition database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS exhibition (
                position INTEGER PRIMARY KEY AUTOINCREMENT,
                id       TEXT NOT NULL UNIQUE,
                added_at TEXT NOT NULL DEFAULT (datetime('now')),
                artwork  TEXT NOT NULL
            )",
        )
        .context("failed to create exhibition table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("exhibition connection poisoned"))
    }
}

#[async_trait]
impl Exhibition for SqliteExhibition {
    async fn add(&self, artwork: Artwork) -> Result<bool> {
        let json = serde_json::to_string(&artwork)?;
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO exhibition (id, artwork) VALUES (?1, ?2)",
            [&artwork.id, &json],
        )?;
        Ok(inserted == 1)
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM exhibition WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    async fn clear(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM exhibition", [])?;
        Ok(())
    }

    async fn contains(&self, id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let found = conn
            .query_row("SELECT 1 FROM exhibition WHERE id = ?1", [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    async fn size(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM exhibition", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    async fn artworks(&self) -> Result<Vec<Artwork>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT artwork FROM exhibition ORDER BY position ASC")?;
        let jsons = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        let artworks = jsons
            .iter()
            .map(|json| serde_json::from_str(json))
            .collect::<Result<Vec<_>, _>>()
            .context("corrupt artwork in exhibition")?;
        Ok(artworks)
    }
}
