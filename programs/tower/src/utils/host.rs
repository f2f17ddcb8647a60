// tower/utils/host.rs
//
// On-chain side of the controller traits: account buffers for checkpoints,
// token CPIs for payments and allocations.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::{
    controller::{Checkpoint, PaymentRail, TokenLedger},
    errors::TowerError,
    state::{Global, Tower, RESERVE_AUTHORITY_SEED},
    utils::{
        account::persist,
        token::{transfer_tokens, transfer_tokens_from_program},
    },
};

/// Global and tower account buffers, in the order the controller hands them over.
pub struct AccountCheckpoint<'info> {
    pub global: AccountInfo<'info>,
    pub towers: Vec<AccountInfo<'info>>,
}

impl<'info> Checkpoint for AccountCheckpoint<'info> {
    fn commit(&mut self, global: &Global, towers: &[&Tower]) -> Result<()> {
        if towers.len() > self.towers.len() {
            return err!(TowerError::InvalidAccount);
        }

        persist(&self.global, global)?;
        for (info, tower) in self.towers.iter().zip(towers) {
            persist(info, *tower)?;
        }

        Ok(())
    }
}

pub struct Vault<'a, 'info> {
    pub account: &'a InterfaceAccount<'info, TokenAccount>,
    pub mint: &'a InterfaceAccount<'info, Mint>,
    pub authority: AccountInfo<'info>,
    pub authority_bump: u8,
    pub token_program: &'a Interface<'info, TokenInterface>,
}

impl<'a, 'info> Vault<'a, 'info> {
    fn send(&self, to: &InterfaceAccount<'info, TokenAccount>, amount: u64) -> Result<()> {
        transfer_tokens_from_program(
            self.account,
            to,
            amount,
            self.mint,
            &self.authority,
            &[&[RESERVE_AUTHORITY_SEED, &[self.authority_bump]]],
            self.token_program,
        )
    }
}

pub struct PaymentHost<'a, 'info> {
    pub checkpoint: AccountCheckpoint<'info>,
    pub reserve: Vault<'a, 'info>,
    pub player: AccountInfo<'info>,
    pub player_token_account: &'a InterfaceAccount<'info, TokenAccount>,
    pub manager_token_account: Option<&'a InterfaceAccount<'info, TokenAccount>>,
}

impl<'a, 'info> Checkpoint for PaymentHost<'a, 'info> {
    fn commit(&mut self, global: &Global, towers: &[&Tower]) -> Result<()> {
        self.checkpoint.commit(global, towers)
    }
}

impl<'a, 'info> PaymentRail for PaymentHost<'a, 'info> {
    fn receive(&mut self, amount: u64, fee: u64) -> Result<()> {
        if fee > 0 {
            let manager_token_account = self
                .manager_token_account
                .ok_or_else(|| error!(TowerError::InvalidAccount))?;
            transfer_tokens(
                self.player_token_account,
                manager_token_account,
                fee,
                self.reserve.mint,
                &self.player,
                self.reserve.token_program,
            )?;
        }

        let to_reserve = amount
            .checked_sub(fee)
            .ok_or_else(|| error!(TowerError::MathOverflow))?;
        if to_reserve > 0 {
            transfer_tokens(
                self.player_token_account,
                self.reserve.account,
                to_reserve,
                self.reserve.mint,
                &self.player,
                self.reserve.token_program,
            )?;
        }

        Ok(())
    }

    fn pay(&mut self, amount: u64) -> Result<()> {
        self.reserve.send(self.player_token_account, amount)
    }
}

pub struct ClaimHost<'a, 'info> {
    pub checkpoint: AccountCheckpoint<'info>,
    pub vault: Vault<'a, 'info>,
    pub recipient: Option<&'a InterfaceAccount<'info, TokenAccount>>,
}

impl<'a, 'info> Checkpoint for ClaimHost<'a, 'info> {
    fn commit(&mut self, global: &Global, towers: &[&Tower]) -> Result<()> {
        self.checkpoint.commit(global, towers)
    }
}

impl<'a, 'info> TokenLedger for ClaimHost<'a, 'info> {
    fn available(&self) -> u64 {
        self.vault.account.amount
    }

    fn allocate(&mut self, amount: u64) -> Result<()> {
        let recipient = self
            .recipient
            .ok_or_else(|| error!(TowerError::InvalidAccount))?;
        self.vault.send(recipient, amount)
    }
}
