use ethers::prelude::*;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{ AppError, Result };

// Fixed ERC-20 surface: every substitute token on every target chain must
// match these signatures exactly.
abigen!(
    Erc20,
    r#"[
        function approve(address spender, uint256 value) external returns (bool)
        function allowance(address owner, address spender) external view returns (uint256)
        function decimals() external view returns (uint8)
        function name() external view returns (string)
        function symbol() external view returns (string)
    ]"#
);

/// On-chain metadata of an ERC-20 token. Immutable once loaded; callers
/// re-fetch whenever the entered address changes rather than caching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub address: String,
    pub decimals: u8,
    pub name: String,
    pub symbol: String,
}

/// Read symbol, name and decimals for a token address.
///
/// A single failed read surfaces immediately; there are no retries. The
/// returned `address` field echoes the input address.
pub async fn load_token_info<M: Middleware + 'static>(
    provider: Arc<M>,
    address: &str
) -> Result<TokenInfo> {
    let trimmed = address.trim();
    let token: Address = trimmed.parse().map_err(|_|
        AppError::TokenResolution(format!("'{}' is not a contract address", trimmed))
    )?;

    let contract = Erc20::new(token, provider);
    let decimals = contract
        .decimals()
        .call().await
        .map_err(|e| AppError::TokenResolution(e.to_string()))?;
    let name = contract
        .name()
        .call().await
        .map_err(|e| AppError::TokenResolution(e.to_string()))?;
    let symbol = contract
        .symbol()
        .call().await
        .map_err(|e| AppError::TokenResolution(e.to_string()))?;

    Ok(TokenInfo {
        address: trimmed.to_string(),
        decimals,
        name,
        symbol,
    })
}

/// Current allowance granted by `owner` to `spender` on `token`.
pub async fn load_token_allowance<M: Middleware + 'static>(
    provider: Arc<M>,
    token: Address,
    owner: Address,
    spender: Address
) -> Result<U256> {
    let contract = Erc20::new(token, provider);
    contract
        .allowance(owner, spender)
        .call().await
        .map_err(|e| AppError::AllowanceCheck(e.to_string()))
}

/// Submit an approval setting `spender`'s allowance on `token` to `amount`.
///
/// Completes once the transaction is accepted for submission, not once it
/// is mined: an allowance read issued right after may still observe the old
/// value. Known limitation, intentionally left unresolved.
pub async fn set_allowance<M: Middleware + 'static>(
    signer: Arc<M>,
    token: Address,
    spender: Address,
    amount: U256
) -> Result<()> {
    let contract = Erc20::new(token, signer);
    let call = contract.approve(spender, amount);
    // Deliberately not awaited to mining.
    let _pending = call.send().await.map_err(|e| AppError::Approval(e.to_string()))?;
    Ok(())
}
