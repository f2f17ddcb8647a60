// Achievement Interface - read-only view of a player's tower for collectibles

use anchor_lang::prelude::*;

static IDS: [Pubkey; 1] = [tower::ID];

use std::ops::Deref;

pub use tower::state::{GLOBAL_SEED, TOWER_SEED};

#[derive(Clone)]
pub struct TowerProgram;

impl anchor_lang::Ids for TowerProgram {
    fn ids() -> &'static [Pubkey] {
        &IDS
    }
}

#[derive(Clone)]
pub struct TowerAccount(tower::state::Tower);

impl TowerAccount {
    /// True once every tier is at its last sub-level.
    pub fn is_fully_built(&self) -> bool {
        self.0.is_fully_built()
    }
}

impl anchor_lang::AccountDeserialize for TowerAccount {
    fn try_deserialize_unchecked(buf: &mut &[u8]) -> anchor_lang::Result<Self> {
        let tower = tower::state::Tower::try_deserialize(buf)?;
        Ok(TowerAccount(tower))
    }
}

impl anchor_lang::AccountSerialize for TowerAccount {}

impl anchor_lang::Owners for TowerAccount {
    fn owners() -> &'static [Pubkey] {
        &IDS
    }
}

impl Deref for TowerAccount {
    type Target = tower::state::Tower;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Tower PDA of `owner`.
pub fn tower_address(owner: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[TOWER_SEED, owner.as_ref()], &tower::ID).0
}
