// tower/liquidity/mod.rs

use anchor_lang::prelude::*;

use crate::{
    constants::ONE_HUNDRED_PERCENT,
    errors::TowerError,
    state::{VenueConfig, VenueKind},
    utils::math::mul_div,
};

pub mod constant_product;
pub mod route;
pub mod weighted_vault;

pub use constant_product::ConstantProductRouter;
pub use route::VenueAccounts;
pub use weighted_vault::WeightedVault;

/// Current holdings of an existing pool.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolDepth {
    pub reserve: u64, // payment side
    pub token: u64,
    pub shares: u64, // outstanding pool shares
}

/// Matched amounts the venue is asked to take, with the minimums it must honor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiquidityQuote {
    pub reserve_amount: u64,
    pub token_amount: u64,
    pub min_reserve: u64,
    pub min_token: u64,
    pub min_shares: u64,
}

impl LiquidityQuote {
    pub fn is_empty(&self) -> bool {
        self.reserve_amount == 0 || self.token_amount == 0
    }
}

/// What the venue reports back after taking liquidity.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Provisioned {
    pub pool: Pubkey,
    pub reserve_used: u64,
    pub token_used: u64,
    pub shares: u64,
}

pub trait LiquidityVenue {
    /// Matches `reserve` against `token_budget`. `pool` is `None` for a new pool.
    fn quote(&self, reserve: u64, token_budget: u64, pool: Option<Pubkey>) -> Result<LiquidityQuote>;

    /// Creates the pool when `pool` is `None`, then adds the quoted liquidity.
    fn provision(&mut self, quote: &LiquidityQuote, pool: Option<Pubkey>) -> Result<Provisioned>;
}

/// Builds the venue configured in `Global.venue` over the given accounts.
pub fn venue_for<'a, 'info: 'a>(
    config: &VenueConfig,
    accounts: VenueAccounts<'a, 'info>,
) -> Box<dyn LiquidityVenue + 'a> {
    match config.kind {
        VenueKind::ConstantProduct => Box::new(ConstantProductRouter {
            accounts,
            slippage_bps: config.slippage_bps,
        }),
        VenueKind::WeightedVault => Box::new(WeightedVault {
            accounts,
            weights: config.weights,
            slippage_bps: config.slippage_bps,
        }),
    }
}

/// Largest (reserve, token) pair within both budgets that keeps the pool ratio.
pub fn matched_amounts(reserve: u64, token_budget: u64, depth: &PoolDepth) -> Result<(u64, u64)> {
    if depth.reserve == 0 || depth.token == 0 {
        return err!(TowerError::ExternalVenue);
    }

    let token_optimal = mul_div(reserve, depth.token, depth.reserve)?;
    if token_optimal <= token_budget {
        return Ok((reserve, token_optimal));
    }

    let reserve_optimal = mul_div(token_budget, depth.reserve, depth.token)?;
    Ok((reserve_optimal.min(reserve), token_budget))
}

pub fn less_slippage(amount: u64, slippage_bps: u64) -> Result<u64> {
    mul_div(amount, ONE_HUNDRED_PERCENT - slippage_bps.min(ONE_HUNDRED_PERCENT), ONE_HUNDRED_PERCENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_respects_both_budgets() {
        let depth = PoolDepth {
            reserve: 1_000,
            token: 4_000,
            shares: 2_000,
        };
        assert_eq!(matched_amounts(100, 1_000, &depth).unwrap(), (100, 400));
        assert_eq!(matched_amounts(100, 200, &depth).unwrap(), (50, 200));
    }

    #[test]
    fn an_empty_pool_cannot_be_matched() {
        let depth = PoolDepth {
            reserve: 0,
            token: 4_000,
            shares: 0,
        };
        assert_eq!(
            matched_amounts(100, 200, &depth).unwrap_err(),
            TowerError::ExternalVenue.into()
        );
    }

    #[test]
    fn slippage_floors() {
        assert_eq!(less_slippage(10_000, 100).unwrap(), 9_900);
        assert_eq!(less_slippage(10_000, 20_000).unwrap(), 0);
    }
}
