use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::error::Result;

/// Persistent set of item URLs that have already been published.
///
/// The table only grows: URLs are inserted after a confirmed publish and
/// never updated or removed.
pub struct SeenStore {
    conn: Connection,
}

impl SeenStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Creates the backing table if absent. Safe to call on every run.
    pub fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                url TEXT PRIMARY KEY
            );
            "#,
        )?;

        Ok(())
    }

    pub fn exists(&self, url: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM articles WHERE url = ?1",
                params![url],
                |_| Ok(()),
            )
            .optional()?;

        Ok(found.is_some())
    }

    pub fn add(&self, url: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO articles (url) VALUES (?1)",
            params![url],
        )?;
        Ok(())
    }

    /// Records a batch of URLs atomically.
    pub fn add_all<'a, I>(&mut self, urls: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare("INSERT OR IGNORE INTO articles (url) VALUES (?1)")?;
            for url in urls {
                inserted += stmt.execute(params![url])?;
            }
        }
        tx.commit()?;

        Ok(inserted)
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
