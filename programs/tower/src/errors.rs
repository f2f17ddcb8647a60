use anchor_lang::prelude::*;

#[error_code]
pub enum TowerError {
    #[msg("We are not live yet.")]
    GameNotStarted,
    #[msg("Amount must be greater than zero.")]
    ZeroAmount,
    #[msg("Deposit would exceed the maximum credits per tower.")]
    MaxCreditsExceeded,
    #[msg("Need to max out the previous tier first.")]
    PrerequisiteNotMet,
    #[msg("Tier is already at its maximum sub-level.")]
    MaxSubLevel,
    #[msg("Not enough credits.")]
    InsufficientCredits,
    #[msg("User is not registered.")]
    NotRegistered,
    #[msg("Token already claimed for user.")]
    AlreadyClaimed,
    #[msg("All tiers must be fully built to claim.")]
    ClaimForbidden,
    #[msg("Reinvest would exceed the maximum credits per tower.")]
    CreditCapExceeded,
    #[msg("Liquidity has already been provisioned.")]
    AlreadyProvisioned,
    #[msg("Liquidity provisioning window has not been reached.")]
    ProvisionWindowNotReached,
    #[msg("Reentrant call.")]
    Reentrancy,
    #[msg("Liquidity venue call failed.")]
    ExternalVenue,
    #[msg("Tier out of range.")]
    InvalidTier,
    #[msg("Reserve is empty.")]
    ReserveEmpty,
    #[msg("Not enough tokens left in the token vault.")]
    TokenReserveExhausted,
    #[msg("Quoted liquidity is below the requested minimum.")]
    SlippageExceeded,
    #[msg("Referral upline accounts are missing or out of order.")]
    InvalidUpline,
    #[msg("Invalid parameter.")]
    InvalidParam,
    #[msg("Account does not match the expected key.")]
    InvalidAccount,
    #[msg("Arithmetic overflow.")]
    MathOverflow,
}
