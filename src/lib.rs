pub mod amounts;
pub mod chain;
pub mod config;
pub mod dex;
pub mod error;
pub mod services;
pub mod tokens;

pub use chain::{ ChainClient, EvmChainClient };
pub use config::Config;
pub use error::{ AppError, Result };
pub use services::{ PendingTrade, TradeService, TradeStatus };
pub use tokens::TokenInfo;
