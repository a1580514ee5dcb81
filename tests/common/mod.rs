use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tripwise::config::{BalancerConfig, RagConfig};
use tripwise::db::KnowledgeStore;
use tripwise::error::{AppError, Result};
use tripwise::models::{
    Activity, ChunkType, ChunkTypeCount, Coordinates, DayCluster, KnowledgeChunk,
};
use tripwise::services::day_balancer::DayBalancer;
use tripwise::services::day_planner::DayPlanner;
use tripwise::services::llm::{AnswerGenerator, Embedder};
use tripwise::services::rag::prompt::Prompt;
use tripwise::services::rag::RagOrchestrator;
use tripwise::services::tokens::TokenCounter;
use tripwise::AppState;
use uuid::Uuid;

/// In-memory knowledge store that records which collaborator calls were made.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeStore {
    pub exists: bool,
    pub chunks: Vec<KnowledgeChunk>,
    pub stale: Option<String>,
    pub fail_retrieval: bool,
    pub calls: Mutex<Vec<&'static str>>,
}

#[allow(dead_code)]
impl FakeStore {
    pub fn with_chunks(chunks: Vec<KnowledgeChunk>) -> Self {
        FakeStore {
            exists: true,
            chunks,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl KnowledgeStore for FakeStore {
    async fn itinerary_exists(&self, _itinerary_id: Uuid) -> Result<bool> {
        self.record("itinerary_exists");
        Ok(self.exists)
    }

    async fn count_chunks(&self, _itinerary_id: Uuid) -> Result<i64> {
        self.record("count_chunks");
        Ok(self.chunks.len() as i64)
    }

    async fn type_breakdown(&self, _itinerary_id: Uuid) -> Result<Vec<ChunkTypeCount>> {
        self.record("type_breakdown");
        let itinerary = self
            .chunks
            .iter()
            .filter(|c| c.chunk_type == ChunkType::Itinerary)
            .count() as i64;
        Ok(vec![
            ChunkTypeCount {
                chunk_type: ChunkType::Itinerary,
                count: itinerary,
            },
            ChunkTypeCount {
                chunk_type: ChunkType::KnowledgeBase,
                count: self.chunks.len() as i64 - itinerary,
            },
        ])
    }

    async fn retrieve_similar(
        &self,
        _embedding: &[f32],
        _itinerary_id: Uuid,
        limit: usize,
    ) -> Result<Vec<KnowledgeChunk>> {
        self.record("retrieve_similar");
        if self.fail_retrieval {
            return Err(AppError::Internal("vector index unavailable".to_string()));
        }
        Ok(self.chunks.iter().take(limit).cloned().collect())
    }

    async fn stale_warning(&self, _itinerary_id: Uuid) -> Result<Option<String>> {
        self.record("stale_warning");
        Ok(self.stale.clone())
    }
}

#[allow(dead_code)]
#[derive(Default)]
pub struct FakeEmbedder {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0.1, 0.2, 0.3])
    }
}

/// Returns a fixed answer (or fails) and keeps the last prompt it saw.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeGenerator {
    pub fail: bool,
    pub calls: AtomicUsize,
    pub last_prompt: Mutex<Option<Prompt>>,
}

#[async_trait]
impl AnswerGenerator for FakeGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.clone());
        if self.fail {
            return Err(AppError::Llm("HTTP 503: upstream overloaded".to_string()));
        }
        Ok("Your first stop is the Colosseum at 9am.".to_string())
    }
}

/// Wired orchestrator plus handles on the fakes for assertions.
#[allow(dead_code)]
pub struct Harness {
    pub store: Arc<FakeStore>,
    pub embedder: Arc<FakeEmbedder>,
    pub generator: Arc<FakeGenerator>,
    pub rag: RagOrchestrator,
}

#[allow(dead_code)]
pub fn harness(store: FakeStore, generator: FakeGenerator, config: RagConfig) -> Harness {
    let store = Arc::new(store);
    let embedder = Arc::new(FakeEmbedder::default());
    let generator = Arc::new(generator);
    let rag = RagOrchestrator::new(
        store.clone(),
        embedder.clone(),
        generator.clone(),
        Arc::new(TokenCounter::default()),
        config,
    );
    Harness {
        store,
        embedder,
        generator,
        rag,
    }
}

#[allow(dead_code)]
pub fn create_test_app(store: FakeStore) -> axum::Router {
    let h = harness(store, FakeGenerator::default(), RagConfig::default());
    let state = Arc::new(AppState {
        planner: DayPlanner::new(DayBalancer::new(BalancerConfig::default())),
        rag: h.rag,
        tokens: Arc::new(TokenCounter::default()),
    });
    tripwise::routes::create_router(state)
}

#[allow(dead_code)]
pub fn create_test_chunk(content: &str, chunk_type: ChunkType, similarity: f64) -> KnowledgeChunk {
    KnowledgeChunk {
        id: Uuid::new_v4(),
        itinerary_id: Uuid::nil(),
        chunk_type,
        content: content.to_string(),
        token_count: 0,
        similarity,
    }
}

/// `n` tokens of text under cl100k_base.
#[allow(dead_code)]
pub fn text_of_tokens(n: usize) -> String {
    format!("stop{}", " stop".repeat(n.saturating_sub(1)))
}

#[allow(dead_code)]
pub fn create_test_activity(id: &str, lat: f64, lng: f64) -> Activity {
    Activity::new(id, format!("Test place {}", id), Coordinates::new(lat, lng).unwrap())
        .with_category("sight")
        .with_duration(60)
}

/// A day of `n` activities clustered around (`lat`, `lng`).
#[allow(dead_code)]
pub fn create_test_day(prefix: &str, n: usize, lat: f64, lng: f64) -> DayCluster {
    DayCluster::new(
        (0..n)
            .map(|i| {
                create_test_activity(
                    &format!("{}-{}", prefix, i),
                    lat + i as f64 * 0.001,
                    lng - i as f64 * 0.001,
                )
            })
            .collect(),
    )
}

#[allow(dead_code)]
pub fn rome() -> Coordinates {
    Coordinates::new(41.9028, 12.4964).unwrap()
}
