// tower/instructions/player/deposit.rs

// external dependencies
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

// local dependencies
use super::claim_referral_earnings::ReferralRealized;
use crate::{
    constants::ANCHOR_DISCRIMINATOR_SIZE,
    controller,
    state::{Global, ReferralPayout, Tower, GLOBAL_SEED, RESERVE_AUTHORITY_SEED, TOWER_SEED},
    utils::{
        account::{load_upline, persist},
        host::{AccountCheckpoint, PaymentHost, Vault},
    },
};

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut)]
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
        init_if_needed,
        payer = player,
        space = ANCHOR_DISCRIMINATOR_SIZE + Tower::INIT_SPACE,
        seeds = [TOWER_SEED, player.key().as_ref()],
        bump
    )]
    pub tower_account: Box<Account<'info, Tower>>,

    #[account(mint::token_program = token_program)]
    pub payment_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = payment_mint,
        token::authority = player,
        token::token_program = token_program,
    )]
    pub player_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = payment_mint,
        token::authority = global_account.manager,
        token::token_program = token_program,
    )]
    pub manager_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: This account is validated by the seed, it stores no data
    #[account(
        seeds = [RESERVE_AUTHORITY_SEED],
        bump = global_account.reserve_authority_bump,
    )]
    pub reserve_authority: AccountInfo<'info>,

    #[account(mut)]
    pub reserve_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Remaining accounts: the upline towers, direct referrer first.
pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, Deposit<'info>>,
    amount: u64,
    referrer: Option<Pubkey>,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let (upline_infos, mut upline): (Vec<_>, Vec<_>) =
        load_upline(ctx.remaining_accounts)?.into_iter().unzip();

    let accounts = ctx.accounts;
    accounts.tower_account.bump = ctx.bumps.tower_account;

    let mut tower_infos = vec![accounts.tower_account.to_account_info()];
    tower_infos.extend(upline_infos.iter().cloned());

    let mut host = PaymentHost {
        checkpoint: AccountCheckpoint {
            global: accounts.global_account.to_account_info(),
            towers: tower_infos,
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
        manager_token_account: Some(&accounts.manager_token_account),
    };

    let receipt = controller::deposit(
        &mut host,
        &mut accounts.global_account,
        &mut accounts.tower_account,
        &mut upline,
        accounts.player.key(),
        referrer,
        amount,
        now,
    )?;

    for (info, tower) in upline_infos.iter().zip(upline.iter()) {
        persist(info, tower)?;
    }

    if accounts.global_account.referral_payout == ReferralPayout::Withdrawable {
        for credit in receipt.referrals.iter() {
            emit!(ReferralRealized {
                referrer: credit.referrer,
                amount: credit.amount,
            });
        }
    }

    emit!(TowerDeposit {
        owner: accounts.player.key(),
        amount,
        credits: receipt.credits,
        fee: receipt.fee,
        referrer: receipt.referrer,
        first_deposit: receipt.first_deposit,
        total_towers: accounts.global_account.total_towers,
    });

    Ok(())
}

#[event]
pub struct TowerDeposit {
    pub owner: Pubkey,
    pub amount: u64,
    pub credits: u64,
    pub fee: u64,
    pub referrer: Option<Pubkey>,
    pub first_deposit: bool,
    pub total_towers: u64,
}
