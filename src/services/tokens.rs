use crate::constants::TRUNCATION_MARKER;
use crate::error::{AppError, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tiktoken_rs::CoreBPE;

/// Byte-pair encodings the counter can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenEncoding {
    #[default]
    Cl100kBase,
    O200kBase,
    P50kBase,
    R50kBase,
}

impl fmt::Display for TokenEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenEncoding::Cl100kBase => "cl100k_base",
            TokenEncoding::O200kBase => "o200k_base",
            TokenEncoding::P50kBase => "p50k_base",
            TokenEncoding::R50kBase => "r50k_base",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TokenEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cl100k_base" => Ok(TokenEncoding::Cl100kBase),
            "o200k_base" => Ok(TokenEncoding::O200kBase),
            "p50k_base" => Ok(TokenEncoding::P50kBase),
            "r50k_base" => Ok(TokenEncoding::R50kBase),
            _ => Err(format!(
                "Invalid token encoding: {}. Use cl100k_base, o200k_base, p50k_base or r50k_base",
                s
            )),
        }
    }
}

impl TokenEncoding {
    fn load(self) -> std::result::Result<CoreBPE, String> {
        let loaded = match self {
            TokenEncoding::Cl100kBase => tiktoken_rs::cl100k_base(),
            TokenEncoding::O200kBase => tiktoken_rs::o200k_base(),
            TokenEncoding::P50kBase => tiktoken_rs::p50k_base(),
            TokenEncoding::R50kBase => tiktoken_rs::r50k_base(),
        };
        loaded.map_err(|e| format!("failed to load {} encoder: {}", self, e))
    }
}

/// Counts, and truncates by, model tokens.
///
/// The encoder is loaded on first use and shared read-only afterwards, so one
/// counter (usually behind an `Arc`) serves all concurrent requests. A failed
/// load is remembered and reported on every call.
pub struct TokenCounter {
    encoding: TokenEncoding,
    bpe: OnceLock<std::result::Result<CoreBPE, String>>,
}

impl TokenCounter {
    pub fn new(encoding: TokenEncoding) -> Self {
        Self {
            encoding,
            bpe: OnceLock::new(),
        }
    }

    pub fn encoding(&self) -> TokenEncoding {
        self.encoding
    }

    fn bpe(&self) -> Result<&CoreBPE> {
        self.bpe
            .get_or_init(|| {
                tracing::debug!(encoding = %self.encoding, "Loading tokenizer");
                self.encoding.load()
            })
            .as_ref()
            .map_err(|e| AppError::Tokenizer(e.clone()))
    }

    /// Number of tokens in `text`; zero for empty text.
    pub fn count(&self, text: &str) -> Result<usize> {
        if text.is_empty() {
            return Ok(0);
        }
        Ok(self.bpe()?.encode_ordinary(text).len())
    }

    pub fn exceeds(&self, text: &str, max_tokens: usize) -> Result<bool> {
        Ok(self.count(text)? > max_tokens)
    }

    /// Keep the first `max_tokens` tokens and append `...`.
    /// Text already within the limit is returned unchanged.
    pub fn truncate(&self, text: &str, max_tokens: usize) -> Result<String> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let bpe = self.bpe()?;
        let tokens = bpe.encode_ordinary(text);
        if tokens.len() <= max_tokens {
            return Ok(text.to_string());
        }

        // A cut can land inside a multi-byte character; back off until the
        // prefix decodes.
        let mut keep = max_tokens;
        loop {
            match bpe.decode(tokens[..keep].to_vec()) {
                Ok(prefix) => return Ok(format!("{}{}", prefix, TRUNCATION_MARKER)),
                Err(e) if keep == 0 => {
                    return Err(AppError::Tokenizer(format!("decode failed: {}", e)))
                }
                Err(_) => keep -= 1,
            }
        }
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new(TokenEncoding::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_parsing() {
        assert_eq!(
            "CL100K_BASE".parse::<TokenEncoding>().unwrap(),
            TokenEncoding::Cl100kBase
        );
        assert!("bert".parse::<TokenEncoding>().is_err());
        assert_eq!(TokenEncoding::O200kBase.to_string(), "o200k_base");
    }

    #[test]
    fn test_count_empty_is_zero() {
        let counter = TokenCounter::default();
        assert_eq!(counter.count("").unwrap(), 0);
    }

    #[test]
    fn test_count_and_exceeds() {
        let counter = TokenCounter::default();
        let text = "The Louvre opens at nine in the morning.";
        let n = counter.count(text).unwrap();
        assert!(n > 0);
        assert!(n < text.len());
        assert!(!counter.exceeds(text, n).unwrap());
        assert!(counter.exceeds(text, n - 1).unwrap());
    }

    #[test]
    fn test_truncate_within_limit_is_unchanged() {
        let counter = TokenCounter::default();
        let text = "Day two: Montmartre and Sacre-Coeur.";
        let n = counter.count(text).unwrap();
        assert_eq!(counter.truncate(text, n).unwrap(), text);
        assert_eq!(counter.truncate(text, n + 10).unwrap(), text);
    }

    #[test]
    fn test_truncate_cuts_and_marks() {
        let counter = TokenCounter::default();
        let text = "museum ".repeat(200);
        let out = counter.truncate(&text, 10).unwrap();
        assert!(out.ends_with(TRUNCATION_MARKER));
        let body = out.trim_end_matches(TRUNCATION_MARKER);
        assert!(text.starts_with(body));
        assert!(counter.count(body).unwrap() <= 10);
    }

    #[test]
    fn test_truncate_multibyte_text_decodes() {
        let counter = TokenCounter::default();
        let text = "東京タワーと浅草寺を訪れる。".repeat(20);
        let out = counter.truncate(&text, 7).unwrap();
        assert!(out.ends_with(TRUNCATION_MARKER));
        assert!(out.len() < text.len());
    }

    #[test]
    fn test_shared_across_threads() {
        let counter = std::sync::Arc::new(TokenCounter::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = counter.clone();
                std::thread::spawn(move || counter.count("hello world").unwrap())
            })
            .collect();
        let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(counts.windows(2).all(|w| w[0] == w[1]));
    }
}
