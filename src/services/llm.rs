use crate::config::LlmConfig;
use crate::constants::DEFAULT_EMBEDDING_CACHE_MAX_ENTRIES;
use crate::error::{AppError, Result};
use crate::services::rag::prompt::Prompt;
use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Turns text into an embedding vector comparable with the stored chunk vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Produces the answer text for a fully built prompt.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String>;
}

/// Client for an OpenAI-compatible API (`/embeddings`, `/chat/completions`).
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
    embeddings: Cache<String, Arc<Vec<f32>>>,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Llm(format!("Failed to create HTTP client: {}", e)))?;

        let embeddings = Cache::builder()
            .time_to_live(Duration::from_secs(config.embedding_cache_ttl_secs))
            .max_capacity(DEFAULT_EMBEDDING_CACHE_MAX_ENTRIES)
            .build();

        Ok(LlmClient {
            client,
            config,
            embeddings,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                path,
                "LLM API HTTP error {}: {}",
                status, error_text
            );
            return Err(AppError::Llm(format!("HTTP {}: {}", status, error_text)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl Embedder for LlmClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(cached) = self.embeddings.get(text).await {
            tracing::debug!("Embedding cache hit");
            return Ok((*cached).clone());
        }

        let request = EmbeddingRequest {
            model: &self.config.embedding_model,
            input: text,
        };
        let response: EmbeddingApiResponse = self.post("embeddings", &request).await?;

        let vector = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AppError::Llm("Embedding response contained no vectors".to_string()))?;

        tracing::debug!(dimensions = vector.len(), "Embedded question");
        self.embeddings
            .insert(text.to_string(), Arc::new(vector.clone()))
            .await;
        Ok(vector)
    }
}

#[async_trait]
impl AnswerGenerator for LlmClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.chat_model,
            temperature: self.config.temperature,
            max_tokens: self.config.max_answer_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };

        let response: ChatApiResponse = self.post("chat/completions", &request).await?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Llm("Completion contained no answer".to_string()))?;

        tracing::debug!(chars = answer.len(), "Answer generated");
        Ok(answer)
    }
}

// OpenAI-compatible wire types

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingApiResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatApiResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
