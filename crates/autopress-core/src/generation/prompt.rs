//! Topic prompt selection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Topic prompts used when an attempt has no explicit topic.
pub const TOPIC_PROMPTS: &[&str] = &[
    "The future of technology in everyday life",
    "Understanding artificial intelligence and machine learning",
    "Sustainable living and environmental conservation",
    "The impact of social media on society",
    "Remote work culture and productivity",
    "Innovations in healthcare technology",
    "The evolution of programming languages",
    "Cybersecurity best practices for individuals",
    "The rise of electric vehicles",
    "Mental health awareness in the digital age",
    "Open source software and community",
    "Renewable energy solutions",
    "Data privacy in the modern world",
    "The art of effective communication",
    "Entrepreneurship and startup culture",
];

/// Supplies the prompt for each generation attempt.
///
/// The random source is owned by the selector so tests can seed it and
/// assert exact prompt sequences.
pub struct PromptSelector {
    rng: Mutex<StdRng>,
    prompts: &'static [&'static str],
}

impl Default for PromptSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptSelector {
    /// Selector seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic selector for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            prompts: TOPIC_PROMPTS,
        }
    }

    /// Return `topic` unchanged when it is non-empty, otherwise a uniformly
    /// chosen catalog prompt.
    pub fn next_prompt(&self, topic: Option<&str>) -> String {
        if let Some(topic) = topic.filter(|t| !t.is_empty()) {
            return topic.to_string();
        }

        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let index = rng.gen_range(0..self.prompts.len());
        self.prompts[index].to_string()
    }
}
