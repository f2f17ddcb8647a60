// tower/instructions/admin/initialize.rs

// external dependencies
use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

// local dependencies
use crate::{
    constants::{
        ANCHOR_DISCRIMINATOR_SIZE, MAX_ACCRUAL_HOURS_LIMIT, ONE_HUNDRED_PERCENT, REFERRAL_LEVELS,
        WEIGHT_ONE,
    },
    errors::TowerError,
    state::{
        Global, LiquidityGate, ReferralPayout, Tower, VenueConfig, VenueKind, GLOBAL_SEED,
        RESERVE_AUTHORITY_SEED, TOWER_SEED,
    },
    utils::token::has_transfer_fee,
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct InitializeParams {
    pub manager: Pubkey,
    pub start_time: i64,
    pub payment_to_credit_rate: u64,
    pub earnings_per_credit: u64,
    pub fee_bps: u64,
    pub referral_bps: [u64; REFERRAL_LEVELS],
    pub referral_payout: ReferralPayout,
    pub max_credits_per_tower: u64,
    pub max_accrual_hours: u64,
    pub tokens_per_claim: u64,
    pub liquidity_tokens_per_provision: u64,
    pub liquidity_unlock_time: i64,
    pub venue: VenueConfig,
}

impl InitializeParams {
    pub fn validate(&self) -> Result<()> {
        if self.manager == Pubkey::default() || self.venue.program == Pubkey::default() {
            return err!(TowerError::InvalidParam);
        }

        if self.start_time <= 0 || self.liquidity_unlock_time < self.start_time {
            return err!(TowerError::InvalidParam);
        }

        if self.payment_to_credit_rate == 0
            || self.earnings_per_credit == 0
            || self.max_credits_per_tower == 0
            || self.tokens_per_claim == 0
            || self.liquidity_tokens_per_provision == 0
        {
            return err!(TowerError::InvalidParam);
        }

        let over_one_hundred = |bps: &u64| *bps > ONE_HUNDRED_PERCENT;
        if over_one_hundred(&self.fee_bps)
            || self.referral_bps.iter().any(over_one_hundred)
            || over_one_hundred(&self.venue.slippage_bps)
        {
            return err!(TowerError::InvalidParam);
        }

        if self.max_accrual_hours == 0 || self.max_accrual_hours > MAX_ACCRUAL_HOURS_LIMIT {
            return err!(TowerError::InvalidParam);
        }

        if self.venue.kind == VenueKind::WeightedVault {
            let [payment_weight, token_weight] = self.venue.weights;
            if payment_weight == 0 || payment_weight.checked_add(token_weight) != Some(WEIGHT_ONE) {
                return err!(TowerError::InvalidParam);
            }
        }

        Ok(())
    }
}

#[derive(Accounts)]
#[instruction(params: InitializeParams)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = admin,
        space = ANCHOR_DISCRIMINATOR_SIZE + Global::INIT_SPACE,
        seeds = [GLOBAL_SEED],
        bump
    )]
    pub global_account: Box<Account<'info, Global>>,

    #[account(
        init,
        payer = admin,
        space = ANCHOR_DISCRIMINATOR_SIZE + Tower::INIT_SPACE,
        seeds = [TOWER_SEED, params.manager.as_ref()],
        bump
    )]
    pub manager_tower_account: Box<Account<'info, Tower>>,

    /// CHECK: This account is validated by the seed, it stores no data
    #[account(
        seeds = [RESERVE_AUTHORITY_SEED],
        bump
    )]
    pub reserve_authority: AccountInfo<'info>,

    #[account(mint::token_program = token_program)]
    pub payment_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mint::token_program = token_program,
        constraint = token_mint.key() != payment_mint.key() @ TowerError::InvalidParam,
    )]
    pub token_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = admin,
        associated_token::mint = payment_mint,
        associated_token::authority = reserve_authority,
        associated_token::token_program = token_program,
    )]
    pub reserve_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        payer = admin,
        associated_token::mint = token_mint,
        associated_token::authority = reserve_authority,
        associated_token::token_program = token_program,
    )]
    pub token_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub associated_token_program: Program<'info, AssociatedToken>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
    params.validate()?;

    if has_transfer_fee(&ctx.accounts.payment_mint) {
        return err!(TowerError::InvalidParam);
    }

    let payment_unit = 10u64
        .checked_pow(ctx.accounts.payment_mint.decimals as u32)
        .ok_or_else(|| error!(TowerError::InvalidParam))?;

    ctx.accounts.global_account.set_inner(Global {
        manager: params.manager,
        payment_mint: ctx.accounts.payment_mint.key(),
        token_mint: ctx.accounts.token_mint.key(),
        reserve_vault: ctx.accounts.reserve_vault.key(),
        token_vault: ctx.accounts.token_vault.key(),
        start_time: params.start_time,
        payment_to_credit_rate: params.payment_to_credit_rate,
        payment_unit,
        earnings_per_credit: params.earnings_per_credit,
        fee_bps: params.fee_bps,
        referral_bps: params.referral_bps,
        referral_payout: params.referral_payout,
        max_credits_per_tower: params.max_credits_per_tower,
        max_accrual_hours: params.max_accrual_hours,
        tokens_per_claim: params.tokens_per_claim,
        liquidity_tokens_per_provision: params.liquidity_tokens_per_provision,
        venue: params.venue,
        total_towers: 0,
        total_invested: 0,
        reserve_balance: 0,
        liquidity: LiquidityGate {
            unlock_time: params.liquidity_unlock_time,
            ..Default::default()
        },
        locked: false,
        bump: ctx.bumps.global_account,
        reserve_authority_bump: ctx.bumps.reserve_authority,
    });

    // Fallback referrer, unregistered until the manager deposits
    ctx.accounts.manager_tower_account.set_inner(Tower {
        owner: params.manager,
        bump: ctx.bumps.manager_tower_account,
        ..Default::default()
    });

    Ok(())
}
