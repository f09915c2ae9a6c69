//! autopress-core - Core library for Autopress
//!
//! This crate provides the article pipeline shared by the server binary:
//!
//! - **db**: Direct SQLite article storage
//! - **store**: The insert-only store interface generation writes through
//! - **generation**: Prompt selection, the generation service client,
//!   formatting, fallback content and the per-attempt decision table

pub mod db;
pub mod error;
pub mod generation;
pub mod store;

// Re-export commonly used types
pub use db::{Article, ArticleDraft, Database};
pub use error::{Error, Result};
pub use generation::{ArticleGenerator, GenerationOutcome, TextGenerator};
pub use store::ArticleStore;
