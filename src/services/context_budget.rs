use crate::error::Result;
use crate::services::tokens::TokenCounter;

/// Prefix of a relevance-ranked chunk list that fits the token budget.
#[derive(Debug, PartialEq)]
pub struct ContextWindow<'a, T> {
    pub chunks: &'a [T],
    pub total_tokens: usize,
    pub budget: usize,
}

impl<'a, T> ContextWindow<'a, T> {
    /// True only when a single leading chunk was admitted despite being larger
    /// than the whole budget.
    pub fn over_budget(&self) -> bool {
        self.total_tokens > self.budget
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Greedily take chunks in their given order while the running token total
/// stays within `max_tokens`. Stops at the first chunk that does not fit.
///
/// A first chunk that alone exceeds the budget is still taken (and selection
/// stops there), so a non-empty input always yields a non-empty window.
pub fn select_within_budget<'a, T: AsRef<str>>(
    counter: &TokenCounter,
    chunks: &'a [T],
    max_tokens: usize,
) -> Result<ContextWindow<'a, T>> {
    let mut total = 0;
    let mut taken = 0;

    for chunk in chunks {
        let tokens = counter.count(chunk.as_ref())?;

        if total + tokens > max_tokens {
            if taken == 0 {
                tracing::warn!(
                    tokens,
                    budget = max_tokens,
                    "Leading context chunk exceeds the whole budget, using it alone"
                );
                total = tokens;
                taken = 1;
            }
            break;
        }

        total += tokens;
        taken += 1;
    }

    tracing::debug!(
        selected = taken,
        available = chunks.len(),
        total_tokens = total,
        budget = max_tokens,
        "Context window assembled"
    );

    Ok(ContextWindow {
        chunks: &chunks[..taken],
        total_tokens: total,
        budget: max_tokens,
    })
}
