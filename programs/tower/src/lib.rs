// tower/lib.rs - top-level program file

pub mod catalog;
pub mod constants;
pub mod controller;
pub mod errors;
pub mod instructions;
pub mod liquidity;
pub mod state;
pub mod utils;

use anchor_lang::prelude::*;

use instructions::*;

declare_id!("9NRSp4qk5bQjcw5MtEnTnxuwEPnpKwqPQYHxcDWrA6HD");

#[program]
pub mod tower {
    use super::*;

    // Admin instructions

    pub fn initialize(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
        instructions::admin::initialize::handler(ctx, params)
    }

    // Player instructions

    pub fn deposit<'info>(
        ctx: Context<'_, '_, '_, 'info, Deposit<'info>>,
        amount: u64,
        referrer: Option<Pubkey>,
    ) -> Result<()> {
        instructions::player::deposit::handler(ctx, amount, referrer)
    }

    pub fn upgrade_tower(ctx: Context<PlayerAction>, tier: u8) -> Result<()> {
        instructions::player::upgrade_tower::handler(ctx, tier)
    }

    pub fn collect(ctx: Context<PlayerAction>) -> Result<()> {
        instructions::player::collect::handler(ctx)
    }

    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        instructions::player::withdraw::handler(ctx)
    }

    pub fn reinvest(ctx: Context<PlayerAction>) -> Result<()> {
        instructions::player::reinvest::handler(ctx)
    }

    pub fn claim_referral_earnings(ctx: Context<PlayerAction>) -> Result<()> {
        instructions::player::claim_referral_earnings::handler(ctx)
    }

    pub fn claim_token<'info>(
        ctx: Context<'_, '_, '_, 'info, ClaimToken<'info>>,
        min_reserve: u64,
        min_token: u64,
    ) -> Result<()> {
        instructions::player::claim_token::handler(ctx, min_reserve, min_token)
    }

    // Open instructions

    pub fn force_add_liquidity<'info>(
        ctx: Context<'_, '_, '_, 'info, ForceAddLiquidity<'info>>,
    ) -> Result<()> {
        instructions::open::force_add_liquidity::handler(ctx)
    }
}
