use ethers::prelude::*;
use std::sync::Arc;

use crate::config;
use crate::error::{ AppError, Result };

// Uniswap V2 Router ABI (simplified for swaps)
abigen!(
    IUniswapV2Router,
    r#"[
        function swapExactTokensForTokens(uint amountIn, uint amountOutMin, address[] calldata path, address to, uint deadline) external returns (uint[] memory amounts)
    ]"#
);

/// Resolve the swap router deployed on the connected network.
///
/// Networks without a configured router are a hard failure that blocks any
/// swap or allowance check.
pub async fn resolve_router<M: Middleware>(provider: &M) -> Result<Address> {
    let chain_id = provider
        .get_chainid().await
        .map_err(|e| AppError::Rpc(format!("Failed to read chain id: {}", e)))?;
    let network = config::network_name(chain_id.as_u64());

    let address = config
        ::router_for_network(&network)
        .ok_or_else(|| AppError::UnsupportedNetwork(network.clone()))?;

    address
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid router address for {}: {}", network, e)))
}

/// Submit a swap of exactly `amount_in` along the direct [sell, buy] pair
/// to the signer's own address.
///
/// `amountOutMin` is 0 — no slippage protection — and the deadline is the
/// maximum u64, so the order never expires. Both are intentional
/// simplifications, not defects to harden.
pub async fn submit_swap<M: Middleware + 'static>(
    signer: Arc<M>,
    sell_token: Address,
    buy_token: Address,
    amount_in: U256
) -> Result<TxHash> {
    let router_address = resolve_router(signer.as_ref()).await?;
    let recipient = signer
        .default_sender()
        .ok_or_else(|| AppError::Wallet("Signer has no sender address".to_string()))?;

    let router = IUniswapV2Router::new(router_address, signer.clone());
    let call = router.swap_exact_tokens_for_tokens(
        amount_in,
        U256::zero(),
        vec![sell_token, buy_token],
        recipient,
        U256::from(u64::MAX)
    );
    let pending = call.send().await.map_err(|e| AppError::SwapSubmission(e.to_string()))?;

    Ok(*pending)
}
