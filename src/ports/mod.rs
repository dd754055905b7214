//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `PriceOracle`: Live router quotes (`getAmountsOut`)
//! - `SwapSigner`: Account identity and transaction submission
//! - `BalanceSource`: Per-token account balances
//! - `TextGenerator`: Portfolio commentary

pub mod balance_source;
pub mod price_oracle;
pub mod signer;
pub mod text_generator;
