//! Pre-authored articles used when live generation is unavailable.

use crate::db::ArticleDraft;

/// A pre-authored article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackEntry {
    pub title: &'static str,
    pub content: &'static str,
    pub excerpt: &'static str,
}

impl FallbackEntry {
    pub fn to_draft(&self) -> ArticleDraft {
        ArticleDraft::new(self.title, self.content, self.excerpt)
    }
}

const DEFAULT_ENTRIES: &[FallbackEntry] = &[
    FallbackEntry {
        title: "The Future of Technology",
        content: "Technology continues to evolve at an unprecedented pace, shaping the way we live, work, and interact with the world around us. From artificial intelligence to renewable energy, innovations are transforming every aspect of our daily lives.

In recent years, we've witnessed remarkable advances in computing power, connectivity, and automation. These developments promise to solve complex challenges while also raising important questions about ethics, privacy, and the future of human employment.

As we move forward, it's crucial to balance technological progress with thoughtful consideration of its implications. The key to harnessing technology's full potential lies in understanding both its capabilities and its limitations.

Whether you're a developer, entrepreneur, or simply someone curious about the future, staying informed about technological trends is more important than ever.",
        excerpt: "Technology continues to evolve at an unprecedented pace, shaping the way we live, work, and interact...",
    },
    FallbackEntry {
        title: "Understanding Modern Web Development",
        content: "Web development has come a long way since the early days of static HTML pages. Today's web applications are complex, interactive, and capable of delivering experiences that rival native applications.

Modern frameworks and tools have democratized web development, making it accessible to developers of all skill levels. React, Vue, and Angular have revolutionized how we build user interfaces, while Node.js has unified JavaScript across both client and server.

The rise of cloud computing and containerization has also transformed deployment practices. Docker and Kubernetes have made it easier than ever to build, ship, and scale applications reliably.

Looking ahead, we can expect even more exciting developments in web technology, from improved performance to new capabilities in areas like WebAssembly and progressive web apps.",
        excerpt: "Web development has come a long way since the early days of static HTML pages. Today's web applications...",
    },
    FallbackEntry {
        title: "The Importance of Sustainable Practices",
        content: "Sustainability is no longer a niche concern but a critical imperative for businesses, communities, and individuals worldwide. As we face the realities of climate change and resource depletion, adopting sustainable practices has become essential.

From reducing carbon footprints to implementing circular economy principles, there are countless ways organizations and individuals can contribute to a more sustainable future. Renewable energy, waste reduction, and ethical sourcing are just a few areas where meaningful progress can be made.

Technology plays a crucial role in enabling sustainability. Smart grids, energy-efficient systems, and data analytics help optimize resource usage and identify opportunities for improvement.

Ultimately, sustainability is about creating systems that can thrive long-term without depleting the resources future generations will need. It's a challenge that requires collaboration, innovation, and commitment from all sectors of society.",
        excerpt: "Sustainability is no longer a niche concern but a critical imperative for businesses, communities...",
    },
];

/// Fixed, ordered sequence of fallback articles.
///
/// Degraded-mode selection always returns the final entry.
#[derive(Debug, Clone, Copy)]
pub struct FallbackCatalog {
    entries: &'static [FallbackEntry],
}

impl Default for FallbackCatalog {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ENTRIES,
        }
    }
}

impl FallbackCatalog {
    /// Catalog over a custom entry list. Returns `None` for an empty list.
    pub fn new(entries: &'static [FallbackEntry]) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    pub fn entries(&self) -> &'static [FallbackEntry] {
        self.entries
    }

    pub fn titles(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.title)
    }

    /// The entry used for every degraded-mode attempt.
    pub fn last(&self) -> &'static FallbackEntry {
        // Non-empty by construction
        &self.entries[self.entries.len() - 1]
    }
}
