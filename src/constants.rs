//! Stable application-wide constants.
//!
//! Values here are structural invariants, algorithm coefficients, and default
//! fallbacks for env-var-based configuration. They should rarely change.
//! For tuning knobs that are read at startup, see
//! [`BalancerConfig`](crate::config::BalancerConfig) and
//! [`RagConfig`](crate::config::RagConfig) instead.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Geo ---

/// Earth's mean radius in meters, used by the haversine distance.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// --- Day balancing defaults ---
// A day must hold at least `max(floor, target - under_slack)` activities and at
// most `target + over_slack`, where `target = total / days` (integer division).

/// Absolute minimum number of activities per day, regardless of the target.
pub const DEFAULT_MIN_ACTIVITIES_PER_DAY: usize = 3;
/// How far below the per-day target a day may fall.
pub const DEFAULT_UNDER_TARGET_SLACK: usize = 1;
/// How far above the per-day target a day may rise.
pub const DEFAULT_OVER_TARGET_SLACK: usize = 2;
/// Hard ceiling on balancing iterations. Guarantees termination on degenerate input.
pub const DEFAULT_BALANCER_MAX_ITERATIONS: usize = 30;

// --- Day planning (upstream clustering) ---

/// Refinement rounds for the proximity clustering that precedes balancing.
pub const DAY_PLANNER_REFINEMENT_ROUNDS: usize = 10;
/// Upper bound on trip length accepted over HTTP.
pub const MAX_TRIP_DAYS: usize = 60;

// --- Retrieval-augmented answering ---

/// Token budget for retrieved context handed to the answer model.
pub const DEFAULT_RAG_CONTEXT_TOKEN_BUDGET: usize = 6_000;
/// Number of most-similar chunks requested from the vector search.
pub const DEFAULT_RAG_RETRIEVAL_LIMIT: usize = 10;
/// Tokenizer encoding used for budgeting.
pub const DEFAULT_TOKEN_ENCODING: &str = "cl100k_base";
/// Appended to text cut short by [`TokenCounter::truncate`](crate::services::tokens::TokenCounter::truncate).
pub const TRUNCATION_MARKER: &str = "...";
/// Longest question accepted from clients, in characters.
pub const MAX_QUESTION_CHARS: usize = 2_000;

// --- Confidence thresholds (cosine similarity of the best chunk used) ---

/// At or above this similarity the answer is reported with high confidence.
pub const CONFIDENCE_HIGH_SIMILARITY: f64 = 0.80;
/// At or above this similarity the answer is reported with medium confidence.
pub const CONFIDENCE_MEDIUM_SIMILARITY: f64 = 0.60;

// --- LLM API defaults ---

/// OpenAI-compatible API root.
pub const DEFAULT_LLM_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LLM_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_LLM_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_LLM_MAX_ANSWER_TOKENS: u32 = 800;
pub const DEFAULT_LLM_TIMEOUT_SECONDS: u64 = 30;
/// Question embeddings are cached for 1 hour. Overridden by `LLM_EMBEDDING_CACHE_TTL`.
pub const DEFAULT_EMBEDDING_CACHE_TTL_SECONDS: u64 = 3_600;
/// Maximum cached question embeddings.
pub const DEFAULT_EMBEDDING_CACHE_MAX_ENTRIES: u64 = 1_000;
