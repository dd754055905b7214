//! Token registry.
//!
//! The dashboard trades a fixed set of four Sepolia tokens. The registry
//! is the single source of truth for symbols, contract addresses,
//! decimals and display metadata; entries never change after startup.
//!
//! The native asset (ETH) has no contract. Router paths substitute the
//! wrapped token (WETH) for it.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, address};
use serde::{Deserialize, Serialize};

/// Symbol of a registered token. Identity of a token is its symbol.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TokenSymbol {
    /// Native Sepolia ether
    ETH,
    /// Wrapped ether (router path stand-in for ETH)
    WETH,
    /// DAI stablecoin
    DAI,
    /// USDC stablecoin (6 decimals)
    USDC,
}

impl TokenSymbol {
    /// Every registered symbol, in display order.
    pub const ALL: [Self; 4] = [Self::ETH, Self::WETH, Self::DAI, Self::USDC];

    /// The symbol of the chain's native asset.
    pub const NATIVE: Self = Self::ETH;

    /// Registry entry for this symbol.
    pub fn token(self) -> &'static Token {
        match self {
            Self::ETH => &REGISTRY[0],
            Self::WETH => &REGISTRY[1],
            Self::DAI => &REGISTRY[2],
            Self::USDC => &REGISTRY[3],
        }
    }

    /// Whether this is the native (non-contract) asset.
    pub fn is_native(self) -> bool {
        self == Self::NATIVE
    }

    /// Address used for this token inside a router path.
    ///
    /// ETH is routed through WETH; every other token uses its own contract.
    pub fn path_address(self) -> Address {
        if self.is_native() {
            Self::WETH.token().address
        } else {
            self.token().address
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ETH => "ETH",
            Self::WETH => "WETH",
            Self::DAI => "DAI",
            Self::USDC => "USDC",
        }
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a registered token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown token symbol: {0}")]
pub struct UnknownToken(pub String);

impl FromStr for TokenSymbol {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ETH" => Ok(Self::ETH),
            "WETH" => Ok(Self::WETH),
            "DAI" => Ok(Self::DAI),
            "USDC" => Ok(Self::USDC),
            _ => Err(UnknownToken(s.to_string())),
        }
    }
}

/// Immutable token descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub symbol: TokenSymbol,
    /// ERC-20 contract (placeholder `0xeeee…` for the native asset)
    pub address: Address,
    /// Base-unit decimals
    pub decimals: u8,
    /// Logo URL shown next to the symbol
    pub logo_url: &'static str,
}

/// The fixed Sepolia token registry.
pub static REGISTRY: [Token; 4] = [
    Token {
        symbol: TokenSymbol::ETH,
        address: address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"),
        decimals: 18,
        logo_url: "https://s2.coinmarketcap.com/static/img/coins/64x64/1027.png",
    },
    Token {
        symbol: TokenSymbol::WETH,
        address: address!("7b79995e5f793a07bc00c21412e50eaae098e7f9"),
        decimals: 18,
        logo_url: "https://s2.coinmarketcap.com/static/img/coins/64x64/1027.png",
    },
    Token {
        symbol: TokenSymbol::DAI,
        address: address!("68194a729c2450ad26072b3d33adacbcef39d574"),
        decimals: 18,
        logo_url: "https://s2.coinmarketcap.com/static/img/coins/64x64/4943.png",
    },
    Token {
        symbol: TokenSymbol::USDC,
        address: address!("1c7d4b196cb0c7b01d743fbc6116a902379c7a90"),
        decimals: 6,
        logo_url: "https://s2.coinmarketcap.com/static/img/coins/64x64/3408.png",
    },
];
