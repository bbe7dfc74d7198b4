use anchor_lang::prelude::*;

#[error_code]
pub enum AtelierError {
    #[msg("Unauthorized: caller does not hold the required capability")]
    Unauthorized,

    #[msg("Engine is paused")]
    Paused,

    #[msg("Operation requires the engine to be paused")]
    NotPaused,

    #[msg("Arithmetic overflow in ledger accounting")]
    MathOverflow,

    #[msg("Invalid parameter")]
    InvalidParameter,

    #[msg("Payout address does not match the configured destination")]
    InvalidPayoutAddress,
}
