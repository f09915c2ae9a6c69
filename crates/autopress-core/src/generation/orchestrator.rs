//! One generation attempt, from prompt to persisted article.
//!
//! The branch table lives in [`decide`], a pure function over the
//! [`GenerationOutcome`]. [`ArticleGenerator`] wraps it with prompt selection,
//! the service call and persistence.

use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

use super::catalog::FallbackCatalog;
use super::client::TextGenerator;
use super::dedup::TitleRegistry;
use super::formatter::format_article;
use super::prompt::PromptSelector;
use super::GenerationOutcome;
use crate::db::{Article, ArticleDraft};
use crate::error::Result;
use crate::store::ArticleStore;

/// Title of the article recorded when the service call fails outright.
pub const DIAGNOSTIC_TITLE: &str = "AI Service Offline or Unauthorized";

/// Excerpt of the diagnostic article.
pub const DIAGNOSTIC_EXCERPT: &str = "Generation failed.";

/// Why the fallback catalog was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    Unconfigured,
    ServiceDegraded,
}

/// Where a draft came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftSource {
    Generated,
    Fallback(FallbackReason),
    Diagnostic,
}

impl fmt::Display for DraftSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftSource::Generated => write!(f, "generated"),
            DraftSource::Fallback(FallbackReason::Unconfigured) => write!(f, "fallback:unconfigured"),
            DraftSource::Fallback(FallbackReason::ServiceDegraded) => write!(f, "fallback:degraded"),
            DraftSource::Diagnostic => write!(f, "diagnostic"),
        }
    }
}

/// The draft chosen for an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub draft: ArticleDraft,
    pub source: DraftSource,
}

/// Resolve a generation outcome into the draft to persist.
///
/// Only generated titles pass through `titles`; fallback entries are used
/// verbatim.
pub fn decide(
    outcome: GenerationOutcome,
    catalog: &FallbackCatalog,
    titles: &mut TitleRegistry,
) -> Decision {
    match outcome {
        GenerationOutcome::Unconfigured => Decision {
            draft: catalog.last().to_draft(),
            source: DraftSource::Fallback(FallbackReason::Unconfigured),
        },
        GenerationOutcome::ServiceDegraded => Decision {
            draft: catalog.last().to_draft(),
            source: DraftSource::Fallback(FallbackReason::ServiceDegraded),
        },
        GenerationOutcome::Success { text, prompt } => {
            let mut draft = format_article(&text, &prompt);
            draft.title = titles.register(&draft.title);
            Decision {
                draft,
                source: DraftSource::Generated,
            }
        }
        GenerationOutcome::Failure(detail) => Decision {
            draft: diagnostic_draft(&detail),
            source: DraftSource::Diagnostic,
        },
    }
}

/// Visible record of a failed service call.
pub fn diagnostic_draft(detail: &str) -> ArticleDraft {
    ArticleDraft::new(
        DIAGNOSTIC_TITLE,
        format!(
            "Article generation failed due to a fatal error ({}). Check API key and network status.",
            detail
        ),
        DIAGNOSTIC_EXCERPT,
    )
}

/// Runs generation attempts and persists the result.
///
/// Attempts are serialized: manual triggers and scheduled runs never have
/// more than one service call in flight.
pub struct ArticleGenerator {
    store: Arc<dyn ArticleStore>,
    client: Option<Arc<dyn TextGenerator>>,
    prompts: PromptSelector,
    catalog: FallbackCatalog,
    titles: Mutex<TitleRegistry>,
    attempt_lock: tokio::sync::Mutex<()>,
}

impl ArticleGenerator {
    /// Create a generator. `client` is `None` when no credential is configured.
    pub fn new(store: Arc<dyn ArticleStore>, client: Option<Arc<dyn TextGenerator>>) -> Self {
        Self::with_parts(store, client, PromptSelector::new(), FallbackCatalog::default())
    }

    pub fn with_parts(
        store: Arc<dyn ArticleStore>,
        client: Option<Arc<dyn TextGenerator>>,
        prompts: PromptSelector,
        catalog: FallbackCatalog,
    ) -> Self {
        if client.is_none() {
            warn!("No generation credential configured; fallback articles will be used");
        }

        Self {
            store,
            client,
            prompts,
            titles: Mutex::new(TitleRegistry::seeded(&catalog)),
            catalog,
            attempt_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn catalog(&self) -> &FallbackCatalog {
        &self.catalog
    }

    /// Produce the draft for one attempt without persisting it.
    pub async fn draft(&self, topic: Option<&str>) -> Decision {
        let outcome = match &self.client {
            None => GenerationOutcome::Unconfigured,
            Some(client) => {
                let prompt = self.prompts.next_prompt(topic);
                info!(prompt = %prompt, "Generating article");
                client.generate(&prompt).await
            }
        };

        match &outcome {
            GenerationOutcome::ServiceDegraded => {
                warn!("Generation service is loading; using fallback article")
            }
            GenerationOutcome::Failure(detail) => {
                error!(error = %detail, "Generation failed; recording diagnostic article")
            }
            _ => {}
        }

        let mut titles = self.titles.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        decide(outcome, &self.catalog, &mut titles)
    }

    /// Run one attempt and persist the chosen draft.
    ///
    /// Store failures propagate to the caller.
    pub async fn generate_and_save(&self, topic: Option<&str>) -> Result<Article> {
        let _guard = self.attempt_lock.lock().await;

        let decision = self.draft(topic).await;
        let article = self.store.create(&decision.draft)?;

        info!(
            article_id = %article.id,
            title = %article.title,
            source = %decision.source,
            "Article saved"
        );
        Ok(article)
    }
}
