//! Article generation pipeline.
//!
//! One attempt flows through these pieces:
//!
//! - **prompt**: picks the topic prompt for an attempt
//! - **client**: calls the external text generation service
//! - **formatter**: turns raw generated text into an article draft
//! - **dedup**: keeps generated titles distinct within the process
//! - **catalog**: pre-authored articles used in degraded mode
//! - **orchestrator**: the decision table tying the above together

pub mod catalog;
pub mod client;
pub mod dedup;
pub mod formatter;
pub mod orchestrator;
pub mod prompt;

pub use catalog::{FallbackCatalog, FallbackEntry};
pub use client::{ClientOptions, GenerationParams, HuggingFaceClient, TextGenerator};
pub use dedup::TitleRegistry;
pub use formatter::format_article;
pub use orchestrator::{decide, ArticleGenerator, Decision, DraftSource, FallbackReason};
pub use prompt::PromptSelector;

/// Result of a single call to the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The service returned text for `prompt`.
    Success { text: String, prompt: String },
    /// The model is loading or temporarily unavailable.
    ServiceDegraded,
    /// Transport, authorization or malformed-response failure.
    Failure(String),
    /// No credential was configured, so no call was made.
    Unconfigured,
}

impl GenerationOutcome {
    pub fn success(text: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::Success {
            text: text.into(),
            prompt: prompt.into(),
        }
    }

    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::ServiceDegraded => "service_degraded",
            Self::Failure(_) => "failure",
            Self::Unconfigured => "unconfigured",
        }
    }
}
