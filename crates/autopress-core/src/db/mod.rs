//! Direct SQLite database access for autopress.
//!
//! The file location is resolved by the caller; see the server config.

pub mod migrations;
pub mod types;

pub use types::*;

use crate::error::{Error, Result};
use crate::generation::formatter::make_excerpt;
use crate::store::ArticleStore;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Database connection wrapper.
///
/// Thread-safe via internal Mutex. All database operations acquire the lock.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open database at specific path, running migrations
    pub fn open_path(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(Error::Database)?;
        migrations::run_migrations(&conn)?;
        debug!(path = %path.display(), "Article database opened");
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(Error::Database)?;
        migrations::run_migrations(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Check database connectivity
    pub fn ping(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(|_| Error::LockPoisoned)?;
        conn.execute_batch("SELECT 1").map_err(Error::Database)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Article Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert an article. A blank excerpt is derived from the content.
    pub fn create_article(&self, draft: &ArticleDraft) -> Result<Article> {
        let conn = self.conn.lock().map_err(|_| Error::LockPoisoned)?;
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp_millis();

        let excerpt = if draft.excerpt.trim().is_empty() {
            make_excerpt(&draft.content)
        } else {
            draft.excerpt.clone()
        };

        conn.execute(
            "INSERT INTO article (id, title, content, excerpt, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![id, draft.title, draft.content, excerpt, now],
        )?;

        Ok(Article {
            id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            excerpt,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get article by ID
    pub fn get_article(&self, article_id: &str) -> Result<Option<Article>> {
        let conn = self.conn.lock().map_err(|_| Error::LockPoisoned)?;
        let mut stmt = conn.prepare(
            "SELECT id, title, content, excerpt, created_at, updated_at
             FROM article WHERE id = ?1",
        )?;

        Ok(stmt
            .query_row(params![article_id], Self::map_article)
            .optional()?)
    }

    /// Count all stored articles
    pub fn count_articles(&self) -> Result<u64> {
        let conn = self.conn.lock().map_err(|_| Error::LockPoisoned)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM article", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn map_article(row: &rusqlite::Row) -> rusqlite::Result<Article> {
        Ok(Article {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            excerpt: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl ArticleStore for Database {
    fn create(&self, draft: &ArticleDraft) -> Result<Article> {
        self.create_article(draft)
    }

    fn count(&self) -> Result<u64> {
        self.count_articles()
    }
}
