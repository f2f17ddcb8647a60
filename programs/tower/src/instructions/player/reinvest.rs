// tower/instructions/player/reinvest.rs

use anchor_lang::prelude::*;

use super::PlayerAction;
use crate::controller;

pub fn handler(ctx: Context<PlayerAction>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let accounts = ctx.accounts;

    let receipt = controller::reinvest(
        &mut accounts.global_account,
        &mut accounts.tower_account,
        now,
    )?;

    emit!(EarningsReinvested {
        owner: accounts.player.key(),
        earnings: receipt.earnings,
        credits: receipt.credits,
    });

    Ok(())
}

#[event]
pub struct EarningsReinvested {
    pub owner: Pubkey,
    pub earnings: u64,
    pub credits: u64,
}
