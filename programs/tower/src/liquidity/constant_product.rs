// tower/liquidity/constant_product.rs

use anchor_lang::prelude::*;

use super::{
    less_slippage, matched_amounts, LiquidityQuote, LiquidityVenue, PoolDepth, Provisioned,
    VenueAccounts,
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreatePoolArgs {
    pub token_a: Pubkey,
    pub token_b: Pubkey,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddLiquidityArgs {
    pub pool: Pubkey,
    pub amount_a_desired: u64,
    pub amount_b_desired: u64,
    pub amount_a_min: u64,
    pub amount_b_min: u64,
}

/// A new pool takes both budgets as they are; top-ups follow the pool ratio.
pub fn quote(
    reserve: u64,
    token_budget: u64,
    depth: Option<&PoolDepth>,
    slippage_bps: u64,
) -> Result<LiquidityQuote> {
    let (reserve_amount, token_amount) = match depth {
        None => (reserve, token_budget),
        Some(depth) => matched_amounts(reserve, token_budget, depth)?,
    };

    Ok(LiquidityQuote {
        reserve_amount,
        token_amount,
        min_reserve: less_slippage(reserve_amount, slippage_bps)?,
        min_token: less_slippage(token_amount, slippage_bps)?,
        min_shares: 0,
    })
}

/// Router-style venue: `create_pool` once, then `add_liquidity`.
pub struct ConstantProductRouter<'a, 'info> {
    pub accounts: VenueAccounts<'a, 'info>,
    pub slippage_bps: u64,
}

impl<'a, 'info> LiquidityVenue for ConstantProductRouter<'a, 'info> {
    fn quote(&self, reserve: u64, token_budget: u64, pool: Option<Pubkey>) -> Result<LiquidityQuote> {
        let depth = pool.map(|pool| self.accounts.depth(pool)).transpose()?;
        quote(reserve, token_budget, depth.as_ref(), self.slippage_bps)
    }

    fn provision(&mut self, quote: &LiquidityQuote, pool: Option<Pubkey>) -> Result<Provisioned> {
        let pool = match pool {
            Some(pool) => pool,
            None => {
                let pool: Pubkey = self.accounts.call(
                    "create_pool",
                    &CreatePoolArgs {
                        token_a: self.accounts.payment_mint.key(),
                        token_b: self.accounts.token_mint.key(),
                    },
                )?;
                msg!("Created pool {}", pool);
                pool
            }
        };

        let (reserve_used, token_used, shares): (u64, u64, u64) = self.accounts.call(
            "add_liquidity",
            &AddLiquidityArgs {
                pool,
                amount_a_desired: quote.reserve_amount,
                amount_b_desired: quote.token_amount,
                amount_a_min: quote.min_reserve,
                amount_b_min: quote.min_token,
            },
        )?;

        Ok(Provisioned {
            pool,
            reserve_used,
            token_used,
            shares,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_takes_both_budgets() {
        let q = quote(1_000, 5_000, None, 100).unwrap();
        assert_eq!((q.reserve_amount, q.token_amount), (1_000, 5_000));
        assert_eq!((q.min_reserve, q.min_token), (990, 4_950));
    }

    #[test]
    fn top_up_follows_the_pool_ratio() {
        let depth = PoolDepth {
            reserve: 2_000,
            token: 1_000,
            shares: 1_414,
        };
        let q = quote(1_000, 5_000, Some(&depth), 0).unwrap();
        assert_eq!((q.reserve_amount, q.token_amount), (1_000, 500));
    }
}
