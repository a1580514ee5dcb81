pub mod prompt;

use crate::config::RagConfig;
use crate::db::KnowledgeStore;
use crate::error::{AppError, Result};
use crate::models::{AnswerPayload, Confidence, KnowledgeStatus, SourceRef};
use crate::services::context_budget::select_within_budget;
use crate::services::llm::{AnswerGenerator, Embedder};
use crate::services::tokens::TokenCounter;
use std::sync::Arc;
use uuid::Uuid;

use prompt::Prompt;

/// Runs one retrieval-augmented question-answering turn against an
/// itinerary's knowledge base.
///
/// Preconditions (itinerary exists, chunks exist) are checked first and fail
/// with client errors before any retrieval cost is incurred. Everything after
/// that is external work; its failures surface as `Internal`. No retries.
pub struct RagOrchestrator {
    store: Arc<dyn KnowledgeStore>,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn AnswerGenerator>,
    tokens: Arc<TokenCounter>,
    config: RagConfig,
}

impl RagOrchestrator {
    pub fn new(
        store: Arc<dyn KnowledgeStore>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn AnswerGenerator>,
        tokens: Arc<TokenCounter>,
        config: RagConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            generator,
            tokens,
            config,
        }
    }

    pub async fn ask(&self, question: &str, itinerary_id: Uuid) -> Result<AnswerPayload> {
        if !self.store.itinerary_exists(itinerary_id).await? {
            return Err(AppError::NotFound(format!(
                "Itinerary {} not found",
                itinerary_id
            )));
        }

        let chunk_count = self.store.count_chunks(itinerary_id).await?;
        if chunk_count == 0 {
            return Err(AppError::NotReady(
                "No knowledge has been generated for this itinerary yet. \
                 Generate embeddings for the itinerary and try again."
                    .to_string(),
            ));
        }

        tracing::info!(
            itinerary_id = %itinerary_id,
            chunk_count,
            "Answering itinerary question"
        );

        self.answer(question, itinerary_id).await
    }

    async fn answer(&self, question: &str, itinerary_id: Uuid) -> Result<AnswerPayload> {
        let breakdown = self
            .store
            .type_breakdown(itinerary_id)
            .await
            .map_err(|e| e.into_internal("knowledge breakdown"))?;
        tracing::debug!(itinerary_id = %itinerary_id, ?breakdown, "Knowledge base composition");

        let embedding = self
            .embedder
            .embed(question)
            .await
            .map_err(|e| e.into_internal("question embedding"))?;

        let ranked = self
            .store
            .retrieve_similar(&embedding, itinerary_id, self.config.retrieval_limit)
            .await
            .map_err(|e| e.into_internal("similarity retrieval"))?;

        let window = select_within_budget(&self.tokens, &ranked, self.config.context_token_budget)
            .map_err(|e| e.into_internal("context assembly"))?;

        tracing::debug!(
            retrieved = ranked.len(),
            used = window.len(),
            context_tokens = window.total_tokens,
            over_budget = window.over_budget(),
            "Context selected"
        );

        let stale_warning = self
            .store
            .stale_warning(itinerary_id)
            .await
            .map_err(|e| e.into_internal("staleness check"))?;

        let prompt = Prompt::build(question, window.chunks, stale_warning.as_deref());

        let answer = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| e.into_internal("answer generation"))?;

        let sources: Vec<SourceRef> = window.chunks.iter().map(SourceRef::from).collect();
        let confidence = Confidence::from_sources(&sources);

        tracing::info!(
            itinerary_id = %itinerary_id,
            sources = sources.len(),
            confidence = ?confidence,
            stale = stale_warning.is_some(),
            "Question answered"
        );

        Ok(AnswerPayload {
            answer,
            sources,
            confidence,
            stale_warning,
        })
    }

    /// Readiness of the itinerary's knowledge base, without answering anything.
    pub async fn status(&self, itinerary_id: Uuid) -> Result<KnowledgeStatus> {
        if !self.store.itinerary_exists(itinerary_id).await? {
            return Err(AppError::NotFound(format!(
                "Itinerary {} not found",
                itinerary_id
            )));
        }

        let chunk_count = self.store.count_chunks(itinerary_id).await?;
        let (breakdown, stale_warning) = if chunk_count > 0 {
            futures::try_join!(
                self.store.type_breakdown(itinerary_id),
                self.store.stale_warning(itinerary_id),
            )?
        } else {
            (Vec::new(), None)
        };

        Ok(KnowledgeStatus {
            itinerary_id,
            ready: chunk_count > 0,
            chunk_count,
            breakdown,
            stale_warning,
        })
    }
}
