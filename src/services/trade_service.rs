use std::sync::{ Arc, Mutex, MutexGuard };

use ethers::types::{ Address, U256 };
use serde::Serialize;

use crate::amounts;
use crate::chain::ChainClient;
use crate::error::{ AppError, Result };
use crate::tokens::TokenInfo;

/// Raw field contents as the user typed them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InputFields {
    pub sell_token: Option<String>,
    pub buy_token: Option<String>,
    pub token_amount: Option<String>,
}

/// Per-field validation failure messages, parallel to [`InputFields`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors {
    pub sell_token: Option<String>,
    pub buy_token: Option<String>,
    pub token_amount: Option<String>,
}

/// Outcome of the last applied validation run.
///
/// `token_amount` is the entered amount scaled by the *sell* token's
/// decimals; it is only ever set once that token has resolved.
/// `needs_approve` is unset whenever the allowance could not be checked.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidatedInputs {
    pub sell_token: Option<TokenInfo>,
    pub buy_token: Option<TokenInfo>,
    pub token_amount: Option<U256>,
    pub needs_approve: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TradeStatus {
    Signing,
    Mining,
}

/// The single in-flight trade. Exists only while a swap transaction is
/// outstanding; cleared unconditionally once it settles or errors.
#[derive(Debug, Clone, Serialize)]
pub struct PendingTrade {
    pub description: String,
    pub status: TradeStatus,
}

#[derive(Default)]
struct SessionState {
    inputs: InputFields,
    errors: ValidationErrors,
    validated: ValidatedInputs,
    pending_trade: Option<PendingTrade>,
    // Bumped on every edit; validation outcomes carrying an older value
    // are discarded rather than overwriting newer state.
    input_seq: u64,
}

/// Orchestrates the token/approval/swap lifecycle for one user session.
///
/// All session state lives behind the internal mutex; the lock is never
/// held across a chain call.
pub struct TradeService<C: ChainClient> {
    chain: Arc<C>,
    state: Mutex<SessionState>,
}

impl<C: ChainClient> TradeService<C> {
    pub fn new(chain: Arc<C>) -> Self {
        Self { chain, state: Mutex::new(SessionState::default()) }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("trade session state poisoned")
    }

    pub async fn update_sell_token(&self, value: &str) {
        {
            let mut state = self.state();
            state.inputs.sell_token = Some(value.to_string());
            state.input_seq += 1;
        }
        self.validate().await;
    }

    pub async fn update_buy_token(&self, value: &str) {
        {
            let mut state = self.state();
            state.inputs.buy_token = Some(value.to_string());
            state.input_seq += 1;
        }
        self.validate().await;
    }

    pub async fn update_token_amount(&self, value: &str) {
        {
            let mut state = self.state();
            state.inputs.token_amount = Some(value.to_string());
            state.input_seq += 1;
        }
        self.validate().await;
    }

    /// Re-run validation over the current inputs in full (no diffing).
    /// A run that finishes after the inputs changed underneath it is
    /// discarded.
    pub async fn validate(&self) {
        let (snapshot, seq) = {
            let state = self.state();
            (state.inputs.clone(), state.input_seq)
        };

        let (errors, validated) = self.run_validation(&snapshot).await;

        let mut state = self.state();
        if state.input_seq != seq {
            tracing::debug!("Discarding stale validation result ({} != {})", seq, state.input_seq);
            return;
        }
        state.errors = errors;
        state.validated = validated;
    }

    async fn run_validation(&self, inputs: &InputFields) -> (ValidationErrors, ValidatedInputs) {
        let mut errors = ValidationErrors::default();

        // Sell and buy resolve independently; one field failing never
        // blocks the other.
        let sell_token = match non_empty(&inputs.sell_token) {
            Some(address) => match self.chain.token_info(address).await {
                Ok(info) => Some(info),
                Err(e) => {
                    errors.sell_token = Some(e.to_string());
                    None
                }
            },
            None => None,
        };

        let buy_token = match non_empty(&inputs.buy_token) {
            Some(address) => match self.chain.token_info(address).await {
                Ok(info) => Some(info),
                Err(e) => {
                    errors.buy_token = Some(e.to_string());
                    None
                }
            },
            None => None,
        };

        let token_amount = match non_empty(&inputs.token_amount) {
            Some(raw) => match &sell_token {
                Some(sell) => match amounts::parse_token_amount(raw, sell.decimals) {
                    Ok(amount) => Some(amount),
                    Err(e) => {
                        errors.token_amount = Some(e.to_string());
                        None
                    }
                },
                // Without the sell token's decimals the amount cannot be
                // scaled yet; still report a malformed string, but never
                // fall back to zero decimals.
                None => {
                    if let Err(e) = amounts::validate_decimal(raw) {
                        errors.token_amount = Some(e.to_string());
                    }
                    None
                }
            },
            None => None,
        };

        let mut needs_approve = None;
        if let (Some(sell), Some(amount)) = (&sell_token, token_amount) {
            match self.check_needs_approve(sell, amount).await {
                Ok(required) => {
                    needs_approve = Some(required);
                }
                // Never blocks editing; the check reruns on the next edit.
                Err(e) => tracing::warn!("Allowance check failed: {}", e),
            }
        }

        (errors, ValidatedInputs { sell_token, buy_token, token_amount, needs_approve })
    }

    async fn check_needs_approve(&self, sell: &TokenInfo, amount: U256) -> Result<bool> {
        self.chain.enable().await?;
        let owner = self.chain.wallet_address().await?;
        let router = self.chain.router_address().await?;
        let token = parse_address(&sell.address)?;
        let allowance = self.chain.allowance(token, owner, router).await?;
        Ok(amount > allowance)
    }

    /// Whether the Approve action is enabled.
    pub fn can_approve(&self) -> bool {
        self.state().validated.needs_approve == Some(true)
    }

    /// Whether the Trade action is enabled: no trade pending and both
    /// tokens plus the amount resolved.
    pub fn can_trade(&self) -> bool {
        let state = self.state();
        state.pending_trade.is_none() &&
            state.validated.sell_token.is_some() &&
            state.validated.buy_token.is_some() &&
            state.validated.token_amount.is_some()
    }

    /// Submit an approval granting the router the parsed amount.
    ///
    /// Returns once the transaction is accepted for submission; the
    /// `needs_approve` view stays stale until validation reruns, so a check
    /// issued before the approval mines may still demand approval. Failures
    /// are logged and otherwise dropped — they never break the flow.
    pub async fn approve(&self) {
        if let Err(e) = self.try_approve().await {
            tracing::error!("Approve failed: {}", e);
        }
    }

    async fn try_approve(&self) -> Result<()> {
        let (sell, amount) = {
            let state = self.state();
            if state.validated.needs_approve != Some(true) {
                return Ok(());
            }
            match (&state.validated.sell_token, state.validated.token_amount) {
                (Some(sell), Some(amount)) => (sell.clone(), amount),
                _ => {
                    return Ok(());
                }
            }
        };

        let router = self.chain.router_address().await?;
        let token = parse_address(&sell.address)?;
        self.chain.approve(token, router, amount).await
    }

    /// Run the full trade lifecycle: occupy the pending slot (Signing),
    /// submit the swap (Mining), wait for it to mine, then clear the slot
    /// unconditionally. A no-op while another trade holds the slot or any
    /// input is unresolved. Errors are logged, not surfaced; to the caller
    /// a failed trade is indistinguishable from a settled one beyond the
    /// cleared slot.
    pub async fn trade(&self) {
        let (sell, buy, amount) = {
            let mut state = self.state();
            if state.pending_trade.is_some() {
                return;
            }
            let (sell, buy, amount) = match (
                &state.validated.sell_token,
                &state.validated.buy_token,
                state.validated.token_amount,
            ) {
                (Some(sell), Some(buy), Some(amount)) => (sell.clone(), buy.clone(), amount),
                _ => {
                    return;
                }
            };

            let description = format!(
                "Swapping {} {} for {}",
                amounts::format_token_amount(amount, sell.decimals),
                sell.symbol,
                buy.symbol
            );
            state.pending_trade = Some(PendingTrade {
                description,
                status: TradeStatus::Signing,
            });
            (sell, buy, amount)
        };

        if let Err(e) = self.run_trade(&sell, &buy, amount).await {
            tracing::error!("Trade failed: {}", e);
        }
        self.state().pending_trade = None;
    }

    async fn run_trade(&self, sell: &TokenInfo, buy: &TokenInfo, amount: U256) -> Result<()> {
        let sell_address = parse_address(&sell.address)?;
        let buy_address = parse_address(&buy.address)?;

        let tx = self.chain.submit_swap(sell_address, buy_address, amount).await?;
        if let Some(trade) = self.state().pending_trade.as_mut() {
            trade.status = TradeStatus::Mining;
        }

        self.chain.await_mined(tx).await
    }

    pub fn inputs(&self) -> InputFields {
        self.state().inputs.clone()
    }

    pub fn errors(&self) -> ValidationErrors {
        self.state().errors.clone()
    }

    pub fn validated(&self) -> ValidatedInputs {
        self.state().validated.clone()
    }

    pub fn pending_trade(&self) -> Option<PendingTrade> {
        self.state().pending_trade.clone()
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_address(address: &str) -> Result<Address> {
    address.parse().map_err(|_| AppError::InvalidAddress(address.to_string()))
}
