use std::sync::Arc;

use async_trait::async_trait;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{ Http, Middleware, PendingTransaction, Provider };
use ethers::signers::{ LocalWallet, Signer };
use ethers::types::{ Address, TxHash, U256 };

use super::ChainClient;
use crate::config::{ self, Config };
use crate::dex::uniswap;
use crate::error::{ AppError, Result };
use crate::tokens::{ self, TokenInfo };

type EvmSigner = SignerMiddleware<Arc<Provider<Http>>, LocalWallet>;

/// Chain client over an HTTP JSON-RPC endpoint and a local signing key —
/// the headless counterpart of a browser-injected wallet.
#[derive(Clone)]
pub struct EvmChainClient {
    provider: Arc<Provider<Http>>,
    wallet: LocalWallet,
}

impl EvmChainClient {
    pub fn new(rpc_url: &str, private_key: &str) -> Result<Self> {
        let provider = Provider::<Http>
            ::try_from(rpc_url)
            .map_err(|e| AppError::Rpc(format!("Failed to create provider: {}", e)))?;
        let wallet: LocalWallet = private_key
            .parse()
            .map_err(|_| AppError::Wallet("Invalid private key".to_string()))?;

        Ok(Self { provider: Arc::new(provider), wallet })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.rpc_url, &config.private_key)
    }

    async fn chain_id(&self) -> Result<u64> {
        let id = self.provider
            .get_chainid().await
            .map_err(|e| AppError::Rpc(format!("Failed to read chain id: {}", e)))?;
        Ok(id.as_u64())
    }

    async fn signer(&self) -> Result<Arc<EvmSigner>> {
        let chain_id = self.chain_id().await?;
        let wallet = self.wallet.clone().with_chain_id(chain_id);
        Ok(Arc::new(SignerMiddleware::new(self.provider.clone(), wallet)))
    }
}

#[async_trait]
impl ChainClient for EvmChainClient {
    async fn enable(&self) -> Result<()> {
        // A local key needs no access grant; reaching the node is the
        // closest analogue of the injected wallet's enable() call.
        self.chain_id().await.map(|_| ())
    }

    async fn network(&self) -> Result<String> {
        Ok(config::network_name(self.chain_id().await?))
    }

    async fn wallet_address(&self) -> Result<Address> {
        Ok(self.wallet.address())
    }

    async fn token_info(&self, address: &str) -> Result<TokenInfo> {
        tokens::load_token_info(self.provider.clone(), address).await
    }

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        tokens::load_token_allowance(self.provider.clone(), token, owner, spender).await
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<()> {
        let signer = self.signer().await?;
        tokens::set_allowance(signer, token, spender, amount).await
    }

    async fn router_address(&self) -> Result<Address> {
        uniswap::resolve_router(self.provider.as_ref()).await
    }

    async fn submit_swap(&self, sell: Address, buy: Address, amount_in: U256) -> Result<TxHash> {
        let signer = self.signer().await?;
        uniswap::submit_swap(signer, sell, buy, amount_in).await
    }

    async fn await_mined(&self, tx: TxHash) -> Result<()> {
        let receipt = PendingTransaction::new(tx, self.provider.as_ref()).await.map_err(|e|
            AppError::Mining(e.to_string())
        )?;

        match receipt {
            Some(receipt) if receipt.status != Some(0u64.into()) => Ok(()),
            Some(_) => Err(AppError::Mining(format!("Transaction {:?} reverted", tx))),
            None => Err(AppError::Mining(format!("Transaction {:?} was dropped", tx))),
        }
    }
}
