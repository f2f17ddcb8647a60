// tower/instructions/player/collect.rs

use anchor_lang::prelude::*;

use super::PlayerAction;
use crate::controller;

pub fn handler(ctx: Context<PlayerAction>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let accounts = ctx.accounts;

    let collected = controller::collect(
        &mut accounts.global_account,
        &mut accounts.tower_account,
        now,
    )?;

    emit!(EarningsCollected {
        owner: accounts.player.key(),
        amount: collected,
        withdrawable: accounts.tower_account.withdrawable_earnings,
        ts: now,
    });

    Ok(())
}

#[event]
pub struct EarningsCollected {
    pub owner: Pubkey,
    pub amount: u64,
    pub withdrawable: u64,
    pub ts: i64,
}
