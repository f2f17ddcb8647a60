// tower/utils/account.rs

use anchor_lang::prelude::*;

use crate::{
    errors::TowerError,
    state::{Tower, TOWER_SEED},
};

/// Writes `value` (discriminator included) into the account buffer so that
/// anything invoked afterwards observes it.
pub fn persist<T: AccountSerialize>(info: &AccountInfo, value: &T) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data;
    value.try_serialize(&mut writer)
}

/// Loads the referral chain passed as remaining accounts. Each entry must be
/// a distinct writable tower sitting at its owner's address.
pub fn load_upline<'info>(
    infos: &[AccountInfo<'info>],
) -> Result<Vec<(AccountInfo<'info>, Tower)>> {
    infos
        .iter()
        .enumerate()
        .map(|(i, info)| {
            let repeated = infos[..i].iter().any(|prev| prev.key == info.key);
            if repeated || !info.is_writable || info.owner != &crate::ID {
                return err!(TowerError::InvalidUpline);
            }

            let tower = Tower::try_deserialize(&mut &info.try_borrow_data()?[..])?;
            let expected = Pubkey::create_program_address(
                &[TOWER_SEED, tower.owner.as_ref(), &[tower.bump]],
                &crate::ID,
            )
            .map_err(|_| error!(TowerError::InvalidUpline))?;
            if expected != info.key() {
                return err!(TowerError::InvalidUpline);
            }

            Ok((info.clone(), tower))
        })
        .collect()
}
