// tower/liquidity/weighted_vault.rs

use anchor_lang::prelude::*;

use super::{
    less_slippage, matched_amounts, LiquidityQuote, LiquidityVenue, PoolDepth, Provisioned,
    VenueAccounts,
};
use crate::utils::math::mul_div;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterWeightedPoolArgs {
    pub tokens: [Pubkey; 2],
    pub weights: [u64; 2], // normalized to WEIGHT_ONE
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoinArgs {
    pub pool_id: Pubkey,
    pub max_amounts_in: [u64; 2],
    pub min_share_out: u64,
}

/// The first join sets the balances. Later joins are proportional, so the
/// share floor is derived from the payment side.
pub fn quote(
    reserve: u64,
    token_budget: u64,
    depth: Option<&PoolDepth>,
    slippage_bps: u64,
) -> Result<LiquidityQuote> {
    let (reserve_amount, token_amount, expected_shares) = match depth {
        None => (reserve, token_budget, 0),
        Some(depth) => {
            let (r, t) = matched_amounts(reserve, token_budget, depth)?;
            (r, t, mul_div(r, depth.shares, depth.reserve)?)
        }
    };

    Ok(LiquidityQuote {
        reserve_amount,
        token_amount,
        min_reserve: reserve_amount,
        min_token: token_amount,
        min_shares: less_slippage(expected_shares, slippage_bps)?,
    })
}

/// Vault-style venue: a pool is registered by token pair and weights, then joined.
pub struct WeightedVault<'a, 'info> {
    pub accounts: VenueAccounts<'a, 'info>,
    pub weights: [u64; 2],
    pub slippage_bps: u64,
}

impl<'a, 'info> LiquidityVenue for WeightedVault<'a, 'info> {
    fn quote(&self, reserve: u64, token_budget: u64, pool: Option<Pubkey>) -> Result<LiquidityQuote> {
        let depth = pool.map(|pool| self.accounts.depth(pool)).transpose()?;
        quote(reserve, token_budget, depth.as_ref(), self.slippage_bps)
    }

    fn provision(&mut self, quote: &LiquidityQuote, pool: Option<Pubkey>) -> Result<Provisioned> {
        let pool_id = match pool {
            Some(pool) => pool,
            None => {
                let pool_id: Pubkey = self.accounts.call(
                    "register_weighted_pool",
                    &RegisterWeightedPoolArgs {
                        tokens: [
                            self.accounts.payment_mint.key(),
                            self.accounts.token_mint.key(),
                        ],
                        weights: self.weights,
                    },
                )?;
                msg!("Registered weighted pool {}", pool_id);
                pool_id
            }
        };

        let (reserve_used, token_used, shares): (u64, u64, u64) = self.accounts.call(
            "join",
            &JoinArgs {
                pool_id,
                max_amounts_in: [quote.reserve_amount, quote.token_amount],
                min_share_out: quote.min_shares,
            },
        )?;

        Ok(Provisioned {
            pool: pool_id,
            reserve_used,
            token_used,
            shares,
        })
    }
}
