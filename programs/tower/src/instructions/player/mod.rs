// tower/instructions/player/mod.rs

use anchor_lang::prelude::*;

pub mod claim_referral_earnings;
pub mod claim_token;
pub mod collect;
pub mod deposit;
pub mod reinvest;
pub mod upgrade_tower;
pub mod withdraw;

pub use claim_token::ClaimToken;
pub(crate) use claim_token::__client_accounts_claim_token;
pub use deposit::Deposit;
pub(crate) use deposit::__client_accounts_deposit;
pub use withdraw::Withdraw;
pub(crate) use withdraw::__client_accounts_withdraw;

use crate::state::{Global, Tower, GLOBAL_SEED, TOWER_SEED};

cfg_if::cfg_if! {
    if #[cfg(feature = "cpi")] {
        pub(crate) use claim_token::__cpi_client_accounts_claim_token;
        pub(crate) use deposit::__cpi_client_accounts_deposit;
        pub(crate) use withdraw::__cpi_client_accounts_withdraw;
    }
}

/// Accounts for the instructions that only touch the caller's tower.
#[derive(Accounts)]
pub struct PlayerAction<'info> {
    pub player: Signer<'info>,

    #[account(
        seeds = [GLOBAL_SEED],
        bump = global_account.bump,
    )]
    pub global_account: Account<'info, Global>,

    #[account(
        mut,
        seeds = [TOWER_SEED, player.key().as_ref()],
        bump = tower_account.bump,
    )]
    pub tower_account: Account<'info, Tower>,
}
