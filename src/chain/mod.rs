use async_trait::async_trait;
use ethers::types::{ Address, TxHash, U256 };

use crate::error::Result;
use crate::tokens::TokenInfo;

mod evm;
pub use evm::EvmChainClient;

/// Minimal wallet/chain capability surface the orchestration layer depends
/// on. Production code plugs in [`EvmChainClient`]; tests substitute an
/// in-memory double.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Request access to the wallet. Idempotent.
    async fn enable(&self) -> Result<()>;

    /// Name of the connected network.
    async fn network(&self) -> Result<String>;

    /// Address the signer authorizes transactions for.
    async fn wallet_address(&self) -> Result<Address>;

    /// Resolve ERC-20 metadata for a token address.
    async fn token_info(&self, address: &str) -> Result<TokenInfo>;

    /// Current on-chain allowance for (token, owner, spender).
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256>;

    /// Set the spender's allowance on a token. Returns once the approval is
    /// accepted for submission, not once it is mined.
    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<()>;

    /// Swap router deployed on the connected network.
    async fn router_address(&self) -> Result<Address>;

    /// Submit an exact-input swap along the direct [sell, buy] pair to the
    /// signer's own address. Returns the pending transaction hash.
    async fn submit_swap(&self, sell: Address, buy: Address, amount_in: U256) -> Result<TxHash>;

    /// Wait until the transaction is mined.
    async fn await_mined(&self, tx: TxHash) -> Result<()>;
}
