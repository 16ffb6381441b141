use std::collections::HashMap;
use std::env;

use lazy_static::lazy_static;

use crate::error::{ AppError, Result };

/// Connection settings resolved from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub private_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let rpc_url = env::var("RPC_URL").map_err(|_|
            AppError::Config("RPC_URL must be set".to_string())
        )?;
        let private_key = env::var("PRIVATE_KEY").map_err(|_|
            AppError::Config("PRIVATE_KEY must be set".to_string())
        )?;

        Ok(Config { rpc_url, private_key })
    }
}

lazy_static! {
    /// Network name -> deployed swap router contract.
    ///
    /// The Uniswap V2 Router02 deployment shares one address across the
    /// Ethereum networks; BSC routes through PancakeSwap V2.
    pub static ref UNISWAP_ROUTERS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("mainnet", "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D");
        m.insert("rinkeby", "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D");
        m.insert("goerli", "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D");
        m.insert("bsc", "0x10ED43C718714eb63d5aA57B78B54704E256024E");
        m
    };
}

/// Map a chain id to the network name used to key the router table.
pub fn network_name(chain_id: u64) -> String {
    match chain_id {
        1 => "mainnet".to_string(),
        3 => "ropsten".to_string(),
        4 => "rinkeby".to_string(),
        5 => "goerli".to_string(),
        56 => "bsc".to_string(),
        other => format!("chain-{}", other),
    }
}

/// Router address for a network, or `None` when the network has no
/// configured router. Callers treat `None` as a hard failure for swaps.
pub fn router_for_network(network: &str) -> Option<&'static str> {
    UNISWAP_ROUTERS.get(network).copied()
}
