// tower/instructions/player/upgrade_tower.rs

use anchor_lang::prelude::*;

use super::PlayerAction;
use crate::controller;

pub fn handler(ctx: Context<PlayerAction>, tier: u8) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let accounts = ctx.accounts;

    let receipt = controller::upgrade_tower(
        &mut accounts.global_account,
        &mut accounts.tower_account,
        tier,
        now,
    )?;

    emit!(TowerUpgraded {
        owner: accounts.player.key(),
        tier: receipt.tier,
        level: receipt.level,
        cost: receipt.cost,
        yield_rate: receipt.yield_rate,
    });

    Ok(())
}

#[event]
pub struct TowerUpgraded {
    pub owner: Pubkey,
    pub tier: u8,
    pub level: u8,
    pub cost: u64,
    pub yield_rate: u64,
}
