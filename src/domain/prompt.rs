//! Prompt assembly for the portfolio assistant.
//!
//! The assistant ("Aya") sees a one-line portfolio summary, the
//! valuation computed from the static price table, and the user's
//! question after sanitization.

use super::amount::format_amount;
use super::balances::BalanceSnapshot;
use super::pricing::PriceTable;
use super::token::TokenSymbol;
use super::valuation::Valuation;

/// Maximum characters of user text forwarded to the model.
pub const MAX_QUESTION_CHARS: usize = 500;

/// Question used when the user asks for a general review.
pub const DEFAULT_QUESTION: &str = "Can you analyze my portfolio?";

/// Strip angle brackets, trim, and cap at `MAX_QUESTION_CHARS` characters.
pub fn sanitize_question(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    stripped.trim().chars().take(MAX_QUESTION_CHARS).collect()
}

/// `"ETH: 1.0000, WETH: 0.0000, DAI: 1000.0000, USDC: 0.0000"`.
pub fn portfolio_summary(balances: &BalanceSnapshot) -> String {
    TokenSymbol::ALL
        .into_iter()
        .map(|symbol| format!("{symbol}: {}", format_amount(balances.get(symbol))))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the full prompt sent to the text-generation service.
pub fn build_prompt(
    balances: &BalanceSnapshot,
    valuation: &Valuation,
    prices: &PriceTable,
    question: &str,
) -> String {
    let question = if question.is_empty() { DEFAULT_QUESTION } else { question };

    let price_list = prices
        .iter()
        .map(|(symbol, price)| format!("{symbol}=${price}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a helpful crypto trading assistant named Aya.\n\
         The user's wallet portfolio contains: {summary}.\n\
         Approximate total value: ${total:.2} (diversity: {diversity}).\n\
         The user's question is: \"{question}\"\n\
         \n\
         Analyze the user's portfolio and provide a helpful, concise insight.\n\
         1. Identify their largest holding in terms of approximate USD value (use these prices: {price_list}).\n\
         2. If they have a significant holding in a volatile asset like ETH, suggest a hypothetical \
         diversification strategy, like swapping a small portion for a stablecoin (DAI or USDC) to hedge against volatility.\n\
         3. If their portfolio is already diversified, compliment them on their strategy.\n\
         4. If the user asks a specific question, answer it based on their portfolio.\n\
         5. IMPORTANT: Do NOT give financial advice. Use words like \"you could consider\" or \
         \"one common strategy is\". Keep your tone friendly and encouraging.",
        summary = portfolio_summary(balances),
        total = valuation.total_value,
        diversity = valuation.diversity,
    )
}
