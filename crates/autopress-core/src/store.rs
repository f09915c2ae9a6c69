//! Article store trait defining the persistence surface used by generation.

use crate::db::{Article, ArticleDraft};
use crate::error::Result;

/// Insert-only view of the article store.
///
/// Implementations handle the actual storage backend (SQLite, in-memory, etc.).
/// Generation never reads back or revises an article once created.
pub trait ArticleStore: Send + Sync {
    /// Persist a draft, assigning its id and timestamps.
    fn create(&self, draft: &ArticleDraft) -> Result<Article>;

    /// Number of persisted articles.
    fn count(&self) -> Result<u64>;
}
