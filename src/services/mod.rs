pub mod trade_service;

pub use trade_service::{
    InputFields,
    PendingTrade,
    TradeService,
    TradeStatus,
    ValidatedInputs,
    ValidationErrors,
};
