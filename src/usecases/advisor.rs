//! Portfolio Advisor - Rate-limited Portfolio Commentary
//!
//! Builds a prompt from the session's balances and valuation, forwards
//! it to the TextGenerator port and returns the model's answer.
//! User text is sanitized before it reaches the prompt.

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::domain::balances::BalanceSnapshot;
use crate::domain::pricing::PriceTable;
use crate::domain::prompt::{DEFAULT_QUESTION, build_prompt, sanitize_question};
use crate::domain::valuation::valuate;
use crate::ports::text_generator::TextGenerator;

/// Why the assistant could not answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisorError {
  #[error("Please connect your wallet first to get portfolio insights.")]
  PortfolioUnavailable,
  #[error("Please enter a question.")]
  EmptyQuestion,
  #[error("Too many requests. Please wait a moment and try again.")]
  RateLimited,
  #[error("Sorry, I couldn't generate insights right now: {0}")]
  GenerationFailed(String),
}

/// Answers portfolio questions through the text generator.
pub struct PortfolioAdvisor<G: TextGenerator> {
  generator: Arc<G>,
  /// Prices used for the valuation embedded in the prompt.
  prices: PriceTable,
  limiter: DefaultDirectRateLimiter,
}

impl<G: TextGenerator> PortfolioAdvisor<G> {
  /// Create an advisor allowing `per_minute` requests per minute.
  pub fn new(generator: Arc<G>, prices: PriceTable, per_minute: NonZeroU32) -> Self {
    Self {
      generator,
      prices,
      limiter: RateLimiter::direct(Quota::per_minute(per_minute)),
    }
  }

  /// General portfolio review.
  pub async fn analyze(&self, balances: &BalanceSnapshot) -> Result<String, AdvisorError> {
    self.ask(balances, DEFAULT_QUESTION).await
  }

  /// Answer `user_text` about the portfolio in `balances`.
  #[instrument(skip_all, fields(question_len = user_text.len()))]
  pub async fn ask(
    &self,
    balances: &BalanceSnapshot,
    user_text: &str,
  ) -> Result<String, AdvisorError> {
    if balances.is_empty() {
      return Err(AdvisorError::PortfolioUnavailable);
    }

    let question = sanitize_question(user_text);
    if question.is_empty() {
      return Err(AdvisorError::EmptyQuestion);
    }

    if self.limiter.check().is_err() {
      warn!("Assistant rate limit reached");
      return Err(AdvisorError::RateLimited);
    }

    let valuation = valuate(balances, &self.prices);
    let prompt = build_prompt(balances, &valuation, &self.prices, &question);
    debug!(prompt_len = prompt.len(), "Prompt assembled");

    self.generator.generate(&prompt).await.map_err(|e| {
      warn!(error = %e, "Text generation failed");
      AdvisorError::GenerationFailed(e.to_string())
    })
  }
}
