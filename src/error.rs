use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Token resolution failed: {0}")] TokenResolution(String),

    #[error("Invalid amount: {0}")] AmountParse(String),

    #[error("Allowance check failed: {0}")] AllowanceCheck(String),

    #[error("Approval rejected: {0}")] Approval(String),

    #[error("Swap submission rejected: {0}")] SwapSubmission(String),

    #[error("Transaction failed to confirm: {0}")] Mining(String),

    #[error("No swap router configured for network '{0}'")] UnsupportedNetwork(String),

    #[error("Wallet error: {0}")] Wallet(String),

    #[error("Rpc error: {0}")] Rpc(String),

    #[error("Invalid address: {0}")] InvalidAddress(String),

    #[error("Configuration error: {0}")] Config(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
