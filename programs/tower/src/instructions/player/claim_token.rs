// tower/instructions/player/claim_token.rs

// external dependencies
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

// local dependencies
use crate::{
    controller,
    errors::TowerError,
    instructions::open::force_add_liquidity::LiquidityProvisioned,
    liquidity::{venue_for, VenueAccounts},
    state::{Global, Tower, GLOBAL_SEED, RESERVE_AUTHORITY_SEED, TOWER_SEED},
    utils::host::{AccountCheckpoint, ClaimHost, Vault},
};

#[derive(Accounts)]
pub struct ClaimToken<'info> {
    pub player: Signer<'info>,

    #[account(
        mut,
        seeds = [GLOBAL_SEED],
        bump = global_account.bump,
        has_one = payment_mint,
        has_one = token_mint,
        has_one = reserve_vault,
        has_one = token_vault,
    )]
    pub global_account: Box<Account<'info, Global>>,

    #[account(
        mut,
        seeds = [TOWER_SEED, player.key().as_ref()],
        bump = tower_account.bump,
    )]
    pub tower_account: Box<Account<'info, Tower>>,

    pub payment_mint: Box<InterfaceAccount<'info, Mint>>,

    pub token_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = token_mint,
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

    #[account(mut)]
    pub token_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: Pinned to the configured venue program
    #[account(
        executable,
        address = global_account.venue.program @ TowerError::InvalidAccount,
    )]
    pub venue_program: AccountInfo<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Remaining accounts: whatever the venue program expects for the pool.
pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, ClaimToken<'info>>,
    min_reserve: u64,
    min_token: u64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let accounts = ctx.accounts;
    let authority_bump = accounts.global_account.reserve_authority_bump;

    let mut venue = venue_for(
        &accounts.global_account.venue,
        VenueAccounts {
            program: accounts.venue_program.to_account_info(),
            authority: accounts.reserve_authority.to_account_info(),
            authority_bump,
            reserve_vault: accounts.reserve_vault.to_account_info(),
            token_vault: accounts.token_vault.to_account_info(),
            payment_mint: accounts.payment_mint.to_account_info(),
            token_mint: accounts.token_mint.to_account_info(),
            token_program: accounts.token_program.to_account_info(),
            extra: ctx.remaining_accounts,
        },
    );

    let mut host = ClaimHost {
        checkpoint: AccountCheckpoint {
            global: accounts.global_account.to_account_info(),
            towers: vec![accounts.tower_account.to_account_info()],
        },
        vault: Vault {
            account: &accounts.token_vault,
            mint: &accounts.token_mint,
            authority: accounts.reserve_authority.to_account_info(),
            authority_bump,
            token_program: &accounts.token_program,
        },
        recipient: Some(&accounts.player_token_account),
    };

    let receipt = controller::claim_token(
        &mut host,
        venue.as_mut(),
        &mut accounts.global_account,
        &mut accounts.tower_account,
        min_reserve,
        min_token,
        now,
    )?;

    emit!(TokenClaimed {
        owner: accounts.player.key(),
        amount: receipt.tokens,
    });

    if let Some(liquidity) = receipt.liquidity {
        emit!(LiquidityProvisioned {
            pool: liquidity.pool,
            reserve_used: liquidity.reserve_used,
            token_used: liquidity.token_used,
            shares: liquidity.shares,
            seeded: liquidity.seeded,
            forced: false,
        });
    }

    Ok(())
}

#[event]
pub struct TokenClaimed {
    pub owner: Pubkey,
    pub amount: u64,
}
