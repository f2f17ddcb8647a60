// tower/instructions/player/withdraw.rs

// external dependencies
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

// local dependencies
use crate::{
    controller,
    state::{Global, Tower, GLOBAL_SEED, RESERVE_AUTHORITY_SEED, TOWER_SEED},
    utils::host::{AccountCheckpoint, PaymentHost, Vault},
};

#[derive(Accounts)]
pub struct Withdraw<'info> {
    pub player: Signer<'info>,

    #[account(
        mut,
        seeds = [GLOBAL_SEED],
        bump = global_account.bump,
        has_one = payment_mint,
        has_one = reserve_vault,
    )]
    pub global_account: Box<Account<'info, Global>>,

    #[account(
        mut,
        seeds = [TOWER_SEED, player.key().as_ref()],
        bump = tower_account.bump,
    )]
    pub tower_account: Box<Account<'info, Tower>>,

    pub payment_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = payment_mint,
        token::authority = player,
        token::token_program = token_program,
    )]
    pub player_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: This account is validated by the seed, it stores no data
    #[account(
        seeds = [RESERVE_AUTHORITY_SEED],
        bump = global_account.reserve_authority_bump,
    )]
    pub reserve_authority: AccountInfo<'info>,

    #[account(mut)]
    pub reserve_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<Withdraw>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let accounts = ctx.accounts;

    let mut host = PaymentHost {
        checkpoint: AccountCheckpoint {
            global: accounts.global_account.to_account_info(),
            towers: vec![accounts.tower_account.to_account_info()],
        },
        reserve: Vault {
            account: &accounts.reserve_vault,
            mint: &accounts.payment_mint,
            authority: accounts.reserve_authority.to_account_info(),
            authority_bump: accounts.global_account.reserve_authority_bump,
            token_program: &accounts.token_program,
        },
        player: accounts.player.to_account_info(),
        player_token_account: &accounts.player_token_account,
        manager_token_account: None,
    };

    let receipt = controller::withdraw(
        &mut host,
        &mut accounts.global_account,
        &mut accounts.tower_account,
        now,
    )?;

    emit!(EarningsWithdrawn {
        owner: accounts.player.key(),
        owed: receipt.payout.owed,
        paid: receipt.payout.paid,
        earnings_spent: receipt.payout.earnings_spent,
        remaining: receipt.remaining,
        reserve_balance: accounts.global_account.reserve_balance,
    });

    Ok(())
}

#[event]
pub struct EarningsWithdrawn {
    pub owner: Pubkey,
    pub owed: u64,
    pub paid: u64,
    pub earnings_spent: u64,
    pub remaining: u64,
    pub reserve_balance: u64,
}
