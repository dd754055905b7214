//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the dashboard's workflows. Each use case is a self-contained
//! business operation.
//!
//! Use cases:
//! - `QuoteEngine`: Debounced, versioned quotes with simulated fallback
//! - `SwapExecutor`: Ordered preconditions, demo and on-chain execution
//! - `WalletManager`: Per-token balance refresh
//! - `PortfolioAdvisor`: Rate-limited portfolio commentary
//! - `Dashboard`: Session owner tying the above together

pub mod advisor;
pub mod dashboard;
pub mod quote_engine;
pub mod swap_executor;
pub mod wallet_manager;
