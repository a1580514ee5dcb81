use crate::error::Result;
use crate::models::{ChunkType, ChunkTypeCount, KnowledgeChunk};
use async_trait::async_trait;
use uuid::Uuid;

const STALE_EMBEDDINGS_WARNING: &str = "This itinerary was changed after its knowledge base \
was generated, so some answers may be out of date. Regenerate the knowledge base to refresh them.";

// ---------------------------------------------------------------------------
// Shared row-to-chunk conversion
// ---------------------------------------------------------------------------

/// Raw chunk fields extracted from a database row, before validation.
pub(super) struct RawChunkRow {
    pub id: Uuid,
    pub itinerary_id: Uuid,
    pub chunk_type: String,
    pub content: String,
    pub token_count: i32,
    pub similarity: f64,
}

impl RawChunkRow {
    pub fn into_chunk(self) -> KnowledgeChunk {
        let chunk_type = self.chunk_type.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid chunk type '{}' for chunk {}, defaulting to knowledge_base",
                self.chunk_type,
                self.id
            );
            ChunkType::KnowledgeBase
        });

        let token_count = usize::try_from(self.token_count).unwrap_or_else(|_| {
            tracing::warn!(
                "Negative token count {} for chunk {}, using 0",
                self.token_count,
                self.id
            );
            0
        });

        KnowledgeChunk {
            id: self.id,
            itinerary_id: self.itinerary_id,
            chunk_type,
            content: self.content,
            token_count,
            similarity: self.similarity,
        }
    }
}

/// Read-only access to itinerary knowledge, as needed by question answering.
///
/// Implementations must not mutate anything; every call may be repeated.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    async fn itinerary_exists(&self, itinerary_id: Uuid) -> Result<bool>;

    async fn count_chunks(&self, itinerary_id: Uuid) -> Result<i64>;

    async fn type_breakdown(&self, itinerary_id: Uuid) -> Result<Vec<ChunkTypeCount>>;

    /// Up to `limit` chunks of the itinerary, most similar to `embedding` first.
    async fn retrieve_similar(
        &self,
        embedding: &[f32],
        itinerary_id: Uuid,
        limit: usize,
    ) -> Result<Vec<KnowledgeChunk>>;

    /// Warning text when the itinerary changed after its chunks were embedded.
    async fn stale_warning(&self, itinerary_id: Uuid) -> Result<Option<String>>;
}

pub struct PgKnowledgeStore {
    pool: sqlx::PgPool,
}

impl PgKnowledgeStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KnowledgeStore for PgKnowledgeStore {
    async fn itinerary_exists(&self, itinerary_id: Uuid) -> Result<bool> {
        Ok(super::knowledge_queries::itinerary_exists(&self.pool, itinerary_id).await?)
    }

    async fn count_chunks(&self, itinerary_id: Uuid) -> Result<i64> {
        Ok(super::knowledge_queries::count_chunks(&self.pool, itinerary_id).await?)
    }

    async fn type_breakdown(&self, itinerary_id: Uuid) -> Result<Vec<ChunkTypeCount>> {
        let rows = super::knowledge_queries::chunk_type_counts(&self.pool, itinerary_id).await?;
        Ok(rows
            .into_iter()
            .filter_map(|(chunk_type, count)| match chunk_type.parse() {
                Ok(chunk_type) => Some(ChunkTypeCount { chunk_type, count }),
                Err(e) => {
                    tracing::warn!("Skipping unknown chunk type in breakdown: {}", e);
                    None
                }
            })
            .collect())
    }

    async fn retrieve_similar(
        &self,
        embedding: &[f32],
        itinerary_id: Uuid,
        limit: usize,
    ) -> Result<Vec<KnowledgeChunk>> {
        let rows = super::knowledge_queries::find_similar_chunks(
            &self.pool,
            embedding,
            itinerary_id,
            limit as i64,
        )
        .await?;
        Ok(rows.into_iter().map(RawChunkRow::into_chunk).collect())
    }

    async fn stale_warning(&self, itinerary_id: Uuid) -> Result<Option<String>> {
        let outdated =
            super::knowledge_queries::embeddings_outdated(&self.pool, itinerary_id).await?;
        Ok(match outdated {
            Some(true) => Some(STALE_EMBEDDINGS_WARNING.to_string()),
            _ => None,
        })
    }
}
