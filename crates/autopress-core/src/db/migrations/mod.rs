//! Article store database migrations
//!
//! SQL migrations are embedded as strings and executed when the database is opened.

use rusqlite::Connection;

use crate::error::Result;

/// Article table SQL (001)
pub const ARTICLE_TABLES_SQL: &str = include_str!("001_articles.sql");

/// Run all article store migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(ARTICLE_TABLES_SQL)?;
    Ok(())
}
