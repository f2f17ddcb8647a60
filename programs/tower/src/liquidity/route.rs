// tower/liquidity/route.rs

use anchor_lang::prelude::*;
use solana_program::{
    hash::hash,
    instruction::{AccountMeta, Instruction},
    program::{get_return_data, invoke_signed},
};

use crate::{errors::TowerError, liquidity::PoolDepth, state::RESERVE_AUTHORITY_SEED};

/// First 8 bytes of `sha256("global:<name>")`, the Anchor instruction discriminator.
pub fn sighash(name: &str) -> [u8; 8] {
    let preimage = format!("global:{}", name);
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..8]);
    discriminator
}

/// Accounts handed to every venue instruction. The reserve authority signs;
/// `extra` carries whatever pool accounts the venue program expects.
pub struct VenueAccounts<'a, 'info> {
    pub program: AccountInfo<'info>,
    pub authority: AccountInfo<'info>,
    pub authority_bump: u8,
    pub reserve_vault: AccountInfo<'info>,
    pub token_vault: AccountInfo<'info>,
    pub payment_mint: AccountInfo<'info>,
    pub token_mint: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    pub extra: &'a [AccountInfo<'info>],
}

impl<'a, 'info> VenueAccounts<'a, 'info> {
    fn metas(&self) -> Vec<AccountMeta> {
        let mut metas = vec![
            AccountMeta::new_readonly(self.authority.key(), true),
            AccountMeta::new(self.reserve_vault.key(), false),
            AccountMeta::new(self.token_vault.key(), false),
            AccountMeta::new_readonly(self.payment_mint.key(), false),
            AccountMeta::new_readonly(self.token_mint.key(), false),
            AccountMeta::new_readonly(self.token_program.key(), false),
        ];

        metas.extend(self.extra.iter().map(|info| {
            if info.is_writable {
                AccountMeta::new(info.key(), info.is_signer)
            } else {
                AccountMeta::new_readonly(info.key(), info.is_signer)
            }
        }));

        metas
    }

    fn infos(&self) -> Vec<AccountInfo<'info>> {
        let mut infos = vec![
            self.authority.clone(),
            self.reserve_vault.clone(),
            self.token_vault.clone(),
            self.payment_mint.clone(),
            self.token_mint.clone(),
            self.token_program.clone(),
        ];
        infos.extend(self.extra.iter().cloned());
        infos.push(self.program.clone());
        infos
    }

    /// Invokes `name` on the venue program and decodes its return data.
    pub fn call<A, R>(&self, name: &str, args: &A) -> Result<R>
    where
        A: AnchorSerialize,
        R: AnchorDeserialize,
    {
        let mut data = sighash(name).to_vec();
        args.serialize(&mut data)
            .map_err(|_| error!(TowerError::ExternalVenue))?;

        let ix = Instruction {
            program_id: self.program.key(),
            accounts: self.metas(),
            data,
        };

        invoke_signed(
            &ix,
            &self.infos(),
            &[&[RESERVE_AUTHORITY_SEED, &[self.authority_bump]]],
        )
        .map_err(|e| {
            msg!("venue {} failed: {}", name, e);
            error!(TowerError::ExternalVenue)
        })?;

        let (program_id, returned) =
            get_return_data().ok_or_else(|| error!(TowerError::ExternalVenue))?;
        if program_id != self.program.key() {
            return err!(TowerError::ExternalVenue);
        }

        R::try_from_slice(&returned).map_err(|_| error!(TowerError::ExternalVenue))
    }

    pub fn depth(&self, pool: Pubkey) -> Result<PoolDepth> {
        self.call("get_pool_depth", &pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sighash_matches_the_anchor_discriminator() {
        // sha256("global:initialize")[..8]
        assert_eq!(sighash("initialize"), [175, 175, 109, 31, 13, 152, 155, 237]);
    }
}
