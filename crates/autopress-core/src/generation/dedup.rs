//! Process-lifetime title registry.
//!
//! Titles are only tracked in memory, so uniqueness holds within a single
//! process and is forgotten on restart.

use std::collections::HashSet;

use super::catalog::FallbackCatalog;

/// Marker appended, in parentheses, to a title that has already been registered.
pub const DISAMBIGUATION_MARKER: &str = "Fresh Take";

/// Set of every title handed out so far. Insert-only.
#[derive(Debug, Default)]
pub struct TitleRegistry {
    titles: HashSet<String>,
}

impl TitleRegistry {
    /// Registry seeded with every fallback catalog title.
    pub fn seeded(catalog: &FallbackCatalog) -> Self {
        Self {
            titles: catalog.titles().map(String::from).collect(),
        }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    /// Register `title`, returning it unchanged if unseen or with
    /// [`DISAMBIGUATION_MARKER`] appended (plus a counter on repeat
    /// collisions) otherwise. The returned title is always new to the registry.
    pub fn register(&mut self, title: &str) -> String {
        let mut candidate = title.to_string();
        if self.titles.contains(&candidate) {
            candidate = format!("{title} ({DISAMBIGUATION_MARKER})");
            let mut n = 2;
            while self.titles.contains(&candidate) {
                candidate = format!("{title} ({DISAMBIGUATION_MARKER} {n})");
                n += 1;
            }
        }

        self.titles.insert(candidate.clone());
        candidate
    }
}
