//! Domain layer - Core quote, swap and valuation logic.
//!
//! Pure logic for the swap dashboard: token registry, decimal amounts,
//! the static price table, quotes with provenance, slippage floors,
//! the capped swap log and portfolio valuation. No I/O here
//! (hexagonal architecture inner ring); everything is testable in isolation.

pub mod amount;
pub mod balances;
pub mod pricing;
pub mod prompt;
pub mod quote;
pub mod session;
pub mod slippage;
pub mod swap;
pub mod token;
pub mod valuation;

// Re-export core types for convenience
pub use balances::BalanceSnapshot;
pub use pricing::{PriceTable, SimulatedPriceSource};
pub use quote::{Quote, QuoteSource, RequestId};
pub use session::{SessionMode, SessionState, StatusMessage, TradeInput};
pub use slippage::SlippageTolerance;
pub use swap::{SwapError, SwapLog, SwapRecord};
pub use token::{Token, TokenSymbol};
pub use valuation::{DiversityClass, Valuation, valuate};
