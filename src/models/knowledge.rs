use crate::constants::{
    CONFIDENCE_HIGH_SIMILARITY, CONFIDENCE_MEDIUM_SIMILARITY, MAX_QUESTION_CHARS,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    /// Text derived from the itinerary itself (days, places, notes)
    Itinerary,
    /// General travel knowledge attached to the itinerary
    KnowledgeBase,
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChunkType::Itinerary => "itinerary",
            ChunkType::KnowledgeBase => "knowledge_base",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ChunkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "itinerary" => Ok(ChunkType::Itinerary),
            "knowledge_base" | "knowledge" => Ok(ChunkType::KnowledgeBase),
            _ => Err(format!("Invalid chunk type: {}", s)),
        }
    }
}

/// A retrievable unit of itinerary-scoped text, as ranked by the similarity search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeChunk {
    pub id: Uuid,
    pub itinerary_id: Uuid,
    pub chunk_type: ChunkType,
    pub content: String,
    /// Token count recorded when the chunk was embedded
    pub token_count: usize,
    /// Cosine similarity to the question, higher is more relevant
    pub similarity: f64,
}

impl AsRef<str> for KnowledgeChunk {
    fn as_ref(&self) -> &str {
        &self.content
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkTypeCount {
    pub chunk_type: ChunkType,
    pub count: i64,
}

/// Reference to a chunk that was actually placed in the context window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceRef {
    pub chunk_id: Uuid,
    pub chunk_type: ChunkType,
    pub similarity: f64,
}

impl From<&KnowledgeChunk> for SourceRef {
    fn from(chunk: &KnowledgeChunk) -> Self {
        SourceRef {
            chunk_id: chunk.id,
            chunk_type: chunk.chunk_type,
            similarity: chunk.similarity,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Grade by the best similarity among the chunks the answer was grounded on.
    pub fn from_sources(sources: &[SourceRef]) -> Self {
        let best = sources
            .iter()
            .map(|s| s.similarity)
            .fold(f64::NEG_INFINITY, f64::max);

        if best >= CONFIDENCE_HIGH_SIMILARITY {
            Confidence::High
        } else if best >= CONFIDENCE_MEDIUM_SIMILARITY {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerPayload {
    pub answer: String,
    pub sources: Vec<SourceRef>,
    pub confidence: Confidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stale_warning: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

impl AskRequest {
    pub fn validate(&self) -> Result<(), String> {
        let trimmed = self.question.trim();
        if trimmed.is_empty() {
            return Err("question must not be empty".to_string());
        }
        if trimmed.chars().count() > MAX_QUESTION_CHARS {
            return Err(format!(
                "question must be at most {} characters",
                MAX_QUESTION_CHARS
            ));
        }
        Ok(())
    }
}

/// Readiness of an itinerary's knowledge base for question answering.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KnowledgeStatus {
    pub itinerary_id: Uuid,
    pub ready: bool,
    pub chunk_count: i64,
    pub breakdown: Vec<ChunkTypeCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stale_warning: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(similarity: f64) -> SourceRef {
        SourceRef {
            chunk_id: Uuid::new_v4(),
            chunk_type: ChunkType::Itinerary,
            similarity,
        }
    }

    #[test]
    fn test_chunk_type_parsing() {
        assert_eq!("itinerary".parse::<ChunkType>().unwrap(), ChunkType::Itinerary);
        assert_eq!(
            "KNOWLEDGE_BASE".parse::<ChunkType>().unwrap(),
            ChunkType::KnowledgeBase
        );
        assert!("weather".parse::<ChunkType>().is_err());
        assert_eq!(ChunkType::KnowledgeBase.to_string(), "knowledge_base");
    }

    #[test]
    fn test_confidence_grades() {
        assert_eq!(Confidence::from_sources(&[source(0.91)]), Confidence::High);
        assert_eq!(
            Confidence::from_sources(&[source(0.2), source(0.65)]),
            Confidence::Medium
        );
        assert_eq!(Confidence::from_sources(&[source(0.4)]), Confidence::Low);
        assert_eq!(Confidence::from_sources(&[]), Confidence::Low);
    }

    #[test]
    fn test_ask_request_validation() {
        assert!(AskRequest { question: "Where do we eat on day 2?".into() }
            .validate()
            .is_ok());
        assert!(AskRequest { question: "   ".into() }.validate().is_err());
        assert!(AskRequest { question: "x".repeat(MAX_QUESTION_CHARS + 1) }
            .validate()
            .is_err());
    }
}
