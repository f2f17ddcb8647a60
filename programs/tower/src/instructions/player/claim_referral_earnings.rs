// tower/instructions/player/claim_referral_earnings.rs

use anchor_lang::prelude::*;

use super::PlayerAction;
use crate::controller;

pub fn handler(ctx: Context<PlayerAction>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let accounts = ctx.accounts;

    let amount = controller::claim_referral_earnings(
        &mut accounts.global_account,
        &mut accounts.tower_account,
        now,
    )?;

    emit!(ReferralRealized {
        referrer: accounts.player.key(),
        amount,
    });

    Ok(())
}

/// Referral earnings that became withdrawable.
#[event]
pub struct ReferralRealized {
    pub referrer: Pubkey,
    pub amount: u64,
}
