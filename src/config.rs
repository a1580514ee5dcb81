use crate::constants::*;
use crate::services::tokens::TokenEncoding;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub balancer: BalancerConfig,
    pub rag: RagConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalancerConfig {
    /// Absolute minimum activities per day (lower bound never drops below this)
    pub min_activities_floor: usize,

    /// Lower bound is `target - under_target_slack`, clamped to the floor
    pub under_target_slack: usize,

    /// Upper bound is `target + over_target_slack`
    pub over_target_slack: usize,

    /// Hard iteration ceiling for the balancing loop
    pub max_iterations: usize,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            min_activities_floor: DEFAULT_MIN_ACTIVITIES_PER_DAY,
            under_target_slack: DEFAULT_UNDER_TARGET_SLACK,
            over_target_slack: DEFAULT_OVER_TARGET_SLACK,
            max_iterations: DEFAULT_BALANCER_MAX_ITERATIONS,
        }
    }
}

impl BalancerConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            min_activities_floor: env::var("BALANCER_MIN_ACTIVITIES_FLOOR")
                .unwrap_or_else(|_| defaults.min_activities_floor.to_string())
                .parse()
                .map_err(|_| "Invalid BALANCER_MIN_ACTIVITIES_FLOOR")?,

            under_target_slack: env::var("BALANCER_UNDER_TARGET_SLACK")
                .unwrap_or_else(|_| defaults.under_target_slack.to_string())
                .parse()
                .map_err(|_| "Invalid BALANCER_UNDER_TARGET_SLACK")?,

            over_target_slack: env::var("BALANCER_OVER_TARGET_SLACK")
                .unwrap_or_else(|_| defaults.over_target_slack.to_string())
                .parse()
                .map_err(|_| "Invalid BALANCER_OVER_TARGET_SLACK")?,

            max_iterations: env::var("BALANCER_MAX_ITERATIONS")
                .unwrap_or_else(|_| defaults.max_iterations.to_string())
                .parse()
                .map_err(|_| "Invalid BALANCER_MAX_ITERATIONS")?,
        };

        if config.max_iterations == 0 {
            return Err("BALANCER_MAX_ITERATIONS must be at least 1".to_string());
        }

        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RagConfig {
    /// Maximum tokens of retrieved context passed to the answer model
    pub context_token_budget: usize,

    /// Top-K chunks requested from the similarity search
    pub retrieval_limit: usize,

    /// Tokenizer encoding used for budgeting
    pub token_encoding: TokenEncoding,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            context_token_budget: DEFAULT_RAG_CONTEXT_TOKEN_BUDGET,
            retrieval_limit: DEFAULT_RAG_RETRIEVAL_LIMIT,
            token_encoding: TokenEncoding::default(),
        }
    }
}

impl RagConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            context_token_budget: env::var("RAG_CONTEXT_TOKEN_BUDGET")
                .unwrap_or_else(|_| defaults.context_token_budget.to_string())
                .parse()
                .map_err(|_| "Invalid RAG_CONTEXT_TOKEN_BUDGET")?,

            retrieval_limit: env::var("RAG_RETRIEVAL_LIMIT")
                .unwrap_or_else(|_| defaults.retrieval_limit.to_string())
                .parse()
                .map_err(|_| "Invalid RAG_RETRIEVAL_LIMIT")?,

            token_encoding: env::var("RAG_TOKEN_ENCODING")
                .unwrap_or_else(|_| DEFAULT_TOKEN_ENCODING.to_string())
                .parse()?,
        };

        if config.retrieval_limit == 0 {
            return Err("RAG_RETRIEVAL_LIMIT must be at least 1".to_string());
        }

        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_base_url: String,
    pub api_key: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: f32,
    pub max_answer_tokens: u32,
    pub request_timeout_secs: u64,
    pub embedding_cache_ttl_secs: u64,
}

impl LlmConfig {
    pub fn from_env() -> Result<Self, String> {
        let temperature: f32 = env::var("LLM_TEMPERATURE")
            .unwrap_or_else(|_| DEFAULT_LLM_TEMPERATURE.to_string())
            .parse()
            .map_err(|_| "Invalid LLM_TEMPERATURE")?;

        if !(0.0..=2.0).contains(&temperature) {
            return Err("LLM_TEMPERATURE must be between 0 and 2".to_string());
        }

        Ok(Self {
            api_base_url: env::var("LLM_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_API_BASE_URL.to_string()),
            api_key: env::var("LLM_API_KEY").map_err(|_| "LLM_API_KEY must be set")?,
            chat_model: env::var("LLM_CHAT_MODEL")
                .unwrap_or_else(|_| DEFAULT_LLM_CHAT_MODEL.to_string()),
            embedding_model: env::var("LLM_EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_LLM_EMBEDDING_MODEL.to_string()),
            temperature,
            max_answer_tokens: env::var("LLM_MAX_ANSWER_TOKENS")
                .unwrap_or_else(|_| DEFAULT_LLM_MAX_ANSWER_TOKENS.to_string())
                .parse()
                .map_err(|_| "Invalid LLM_MAX_ANSWER_TOKENS")?,
            request_timeout_secs: env::var("LLM_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| DEFAULT_LLM_TIMEOUT_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid LLM_TIMEOUT_SECONDS")?,
            embedding_cache_ttl_secs: env::var("LLM_EMBEDDING_CACHE_TTL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_CACHE_TTL_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid LLM_EMBEDDING_CACHE_TTL")?,
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            database_url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            balancer: BalancerConfig::from_env()?,
            rag: RagConfig::from_env()?,
            llm: LlmConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "BALANCER_MIN_ACTIVITIES_FLOOR",
            "BALANCER_UNDER_TARGET_SLACK",
            "BALANCER_OVER_TARGET_SLACK",
            "BALANCER_MAX_ITERATIONS",
            "RAG_CONTEXT_TOKEN_BUDGET",
            "RAG_RETRIEVAL_LIMIT",
            "RAG_TOKEN_ENCODING",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_balancer_defaults() {
        clear_env();
        let config = BalancerConfig::from_env().unwrap();
        assert_eq!(config, BalancerConfig::default());
        assert_eq!(config.min_activities_floor, 3);
        assert_eq!(config.max_iterations, 30);
    }

    #[test]
    #[serial]
    fn test_balancer_overrides_and_validation() {
        clear_env();
        env::set_var("BALANCER_MAX_ITERATIONS", "12");
        assert_eq!(BalancerConfig::from_env().unwrap().max_iterations, 12);

        env::set_var("BALANCER_MAX_ITERATIONS", "0");
        assert!(BalancerConfig::from_env().is_err());

        env::set_var("BALANCER_MAX_ITERATIONS", "lots");
        assert!(BalancerConfig::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_rag_defaults() {
        clear_env();
        let config = RagConfig::from_env().unwrap();
        assert_eq!(config.context_token_budget, 6000);
        assert_eq!(config.token_encoding, TokenEncoding::Cl100kBase);
    }

    #[test]
    #[serial]
    fn test_rag_rejects_unknown_encoding() {
        clear_env();
        env::set_var("RAG_TOKEN_ENCODING", "gpt2-ish");
        assert!(RagConfig::from_env().is_err());
        env::set_var("RAG_TOKEN_ENCODING", "o200k_base");
        assert_eq!(
            RagConfig::from_env().unwrap().token_encoding,
            TokenEncoding::O200kBase
        );
        clear_env();
    }
}
