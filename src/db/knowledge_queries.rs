use sqlx::PgPool;
use uuid::Uuid;

use super::knowledge_store::RawChunkRow;

pub async fn itinerary_exists(pool: &PgPool, itinerary_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM itineraries WHERE id = $1)")
        .bind(itinerary_id)
        .fetch_one(pool)
        .await
}

pub async fn count_chunks(pool: &PgPool, itinerary_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM knowledge_chunks WHERE itinerary_id = $1")
        .bind(itinerary_id)
        .fetch_one(pool)
        .await
}

pub async fn chunk_type_counts(
    pool: &PgPool,
    itinerary_id: Uuid,
) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT chunk_type, COUNT(*)
         FROM knowledge_chunks
         WHERE itinerary_id = $1
         GROUP BY chunk_type
         ORDER BY chunk_type",
    )
    .bind(itinerary_id)
    .fetch_all(pool)
    .await
}

/// Most similar chunks first, by pgvector cosine distance.
pub async fn find_similar_chunks(
    pool: &PgPool,
    embedding: &[f32],
    itinerary_id: Uuid,
    limit: i64,
) -> Result<Vec<RawChunkRow>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ChunkRow>(
        "SELECT id, itinerary_id, chunk_type, content, token_count,
                (1 - (embedding <=> $1::vector))::float8 AS similarity
         FROM knowledge_chunks
         WHERE itinerary_id = $2
         ORDER BY embedding <=> $1::vector
         LIMIT $3",
    )
    .bind(vector_literal(embedding))
    .bind(itinerary_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ChunkRow::into_raw).collect())
}

/// Whether the itinerary was edited after its newest chunk was embedded.
/// `None` when there are no chunks to compare against.
pub async fn embeddings_outdated(
    pool: &PgPool,
    itinerary_id: Uuid,
) -> Result<Option<bool>, sqlx::Error> {
    let outdated: Option<Option<bool>> = sqlx::query_scalar(
        "SELECT i.updated_at > MAX(k.created_at)
         FROM itineraries i
         JOIN knowledge_chunks k ON k.itinerary_id = i.id
         WHERE i.id = $1
         GROUP BY i.updated_at",
    )
    .bind(itinerary_id)
    .fetch_optional(pool)
    .await?;

    Ok(outdated.flatten())
}

/// pgvector text form: `[0.1,0.2,...]`
fn vector_literal(embedding: &[f32]) -> String {
    let parts: Vec<String> = embedding.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(","))
}

#[derive(sqlx::FromRow)]
struct ChunkRow {
    id: Uuid,
    itinerary_id: Uuid,
    chunk_type: String,
    content: String,
    token_count: i32,
    similarity: f64,
}

impl ChunkRow {
    fn into_raw(self) -> RawChunkRow {
        RawChunkRow {
            id: self.id,
            itinerary_id: self.itinerary_id,
            chunk_type: self.chunk_type,
            content: self.content,
            token_count: self.token_count,
            similarity: self.similarity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_literal() {
        assert_eq!(vector_literal(&[0.5, -1.0, 0.25]), "[0.5,-1,0.25]");
        assert_eq!(vector_literal(&[]), "[]");
    }
}
