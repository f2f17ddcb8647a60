// tower/state/global.rs

use anchor_lang::prelude::*;

use crate::{
    constants::{ONE_HUNDRED_PERCENT, REFERRAL_LEVELS},
    errors::TowerError,
    utils::math::{mul_div, mul_div_ceil},
};

#[constant]
pub const GLOBAL_SEED: &[u8] = b"global";

#[constant]
pub const RESERVE_AUTHORITY_SEED: &[u8] = b"reserve_authority";

/// Where referral rewards land once credited to a referrer.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub enum ReferralPayout {
    /// Folded straight into the referrer's withdrawable earnings.
    #[default]
    Withdrawable,
    /// Held as unclaimed until the referrer calls `claim_referral_earnings`.
    OnClaim,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub enum VenueKind {
    #[default]
    ConstantProduct,
    WeightedVault,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct VenueConfig {
    pub kind: VenueKind,
    pub program: Pubkey,
    pub weights: [u64; 2], // [payment side, token side], weighted vault only
    pub slippage_bps: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub enum LiquidityState {
    #[default]
    NotProvisioned,
    Provisioning,
    Provisioned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProvisionPlan {
    Seed,
    TopUp(Pubkey),
}

impl ProvisionPlan {
    pub fn pool(&self) -> Option<Pubkey> {
        match self {
            ProvisionPlan::Seed => None,
            ProvisionPlan::TopUp(pool) => Some(*pool),
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct LiquidityGate {
    pub state: LiquidityState,
    pub pool: Option<Pubkey>,
    pub unlock_time: i64,
}

impl LiquidityGate {
    pub fn is_provisioned(&self) -> bool {
        self.state != LiquidityState::NotProvisioned
    }

    /// Permissionless provisioning is allowed once, after the unlock time.
    pub fn ensure_force_window(&self, now: i64) -> Result<()> {
        if self.is_provisioned() {
            return err!(TowerError::AlreadyProvisioned);
        }
        if now < self.unlock_time {
            return err!(TowerError::ProvisionWindowNotReached);
        }

        Ok(())
    }

    pub fn begin(&mut self) -> Result<ProvisionPlan> {
        match self.state {
            LiquidityState::NotProvisioned => {
                self.state = LiquidityState::Provisioning;
                Ok(ProvisionPlan::Seed)
            }
            LiquidityState::Provisioned => match self.pool {
                Some(pool) => Ok(ProvisionPlan::TopUp(pool)),
                None => err!(TowerError::ExternalVenue),
            },
            LiquidityState::Provisioning => err!(TowerError::Reentrancy),
        }
    }

    /// Must run before the venue is called.
    pub fn seal(&mut self) {
        self.state = LiquidityState::Provisioned;
    }

    pub fn record_pool(&mut self, plan: ProvisionPlan, pool: Pubkey) -> Result<()> {
        match plan {
            ProvisionPlan::Seed => self.pool = Some(pool),
            ProvisionPlan::TopUp(expected) if expected == pool => {}
            ProvisionPlan::TopUp(_) => return err!(TowerError::ExternalVenue),
        }

        Ok(())
    }
}

#[account]
#[derive(InitSpace, Debug, Default, PartialEq)]
pub struct Global {
    pub manager: Pubkey,       // receives deposit fees, default referrer
    pub payment_mint: Pubkey,  // asset deposited and withdrawn
    pub token_mint: Pubkey,    // asset allocated on claim
    pub reserve_vault: Pubkey, // payment token account owned by the reserve authority
    pub token_vault: Pubkey,   // game token account owned by the reserve authority
    pub start_time: i64,
    pub payment_to_credit_rate: u64, // credits per whole payment unit
    pub payment_unit: u64,           // 10^decimals of the payment mint
    pub earnings_per_credit: u64,
    pub fee_bps: u64,
    pub referral_bps: [u64; REFERRAL_LEVELS],
    pub referral_payout: ReferralPayout,
    pub max_credits_per_tower: u64,
    pub max_accrual_hours: u64,
    pub tokens_per_claim: u64,
    pub liquidity_tokens_per_provision: u64,
    pub venue: VenueConfig,
    pub total_towers: u64,
    pub total_invested: u64,   // payment base units ever deposited
    pub reserve_balance: u64,  // payment base units backing withdrawals
    pub liquidity: LiquidityGate,
    pub locked: bool,
    pub bump: u8,
    pub reserve_authority_bump: u8,
}

impl Global {
    pub fn ensure_started(&self, now: i64) -> Result<()> {
        if now < self.start_time {
            return err!(TowerError::GameNotStarted);
        }

        Ok(())
    }

    /// Returns a working copy that holds the operation-in-flight flag.
    pub fn enter(&self) -> Result<Global> {
        if self.locked {
            return err!(TowerError::Reentrancy);
        }

        let mut working = self.clone();
        working.locked = true;
        Ok(working)
    }

    pub fn leave(&mut self) {
        self.locked = false;
    }

    pub fn credits_for_payment(&self, amount: u64) -> Result<u64> {
        mul_div(amount, self.payment_to_credit_rate, self.payment_unit)
    }

    pub fn payment_for_earnings(&self, earnings: u64) -> Result<u64> {
        let credits_per_unit = self
            .payment_to_credit_rate
            .checked_mul(self.earnings_per_credit)
            .ok_or_else(|| error!(TowerError::MathOverflow))?;
        mul_div(earnings, self.payment_unit, credits_per_unit)
    }

    /// Earnings consumed by paying out `payment`, rounded against the player.
    pub fn earnings_for_payment(&self, payment: u64) -> Result<u64> {
        let credits_per_unit = self
            .payment_to_credit_rate
            .checked_mul(self.earnings_per_credit)
            .ok_or_else(|| error!(TowerError::MathOverflow))?;
        mul_div_ceil(payment, credits_per_unit, self.payment_unit)
    }

    pub fn fee_for(&self, amount: u64) -> Result<u64> {
        mul_div(amount, self.fee_bps, ONE_HUNDRED_PERCENT)
    }

    /// Earnings owed to the referrer `level` hops above a deposit of `credits`.
    pub fn referral_reward(&self, credits: u64, level: usize) -> Result<u64> {
        let bonus_credits = mul_div(credits, self.referral_bps[level], ONE_HUNDRED_PERCENT)?;
        bonus_credits
            .checked_mul(self.earnings_per_credit)
            .ok_or_else(|| error!(TowerError::MathOverflow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global() -> Global {
        Global {
            payment_to_credit_rate: 1_000_000,
            payment_unit: 1_000_000_000,
            earnings_per_credit: 1,
            fee_bps: 1_000,
            referral_bps: [500, 300, 200],
            ..Default::default()
        }
    }

    #[test]
    fn conversions_follow_the_rate() {
        let g = global();
        assert_eq!(g.credits_for_payment(1_000_000_000).unwrap(), 1_000_000);
        assert_eq!(g.payment_for_earnings(11_208).unwrap(), 11_208_000);
        assert_eq!(g.fee_for(1_000_000_000).unwrap(), 100_000_000);
        assert_eq!(g.referral_reward(1_000_000, 0).unwrap(), 50_000);
        assert_eq!(g.referral_reward(1_000_000, 2).unwrap(), 20_000);
    }

    #[test]
    fn earnings_for_payment_rounds_up() {
        let g = Global {
            payment_to_credit_rate: 3,
            payment_unit: 10,
            earnings_per_credit: 1,
            ..Default::default()
        };
        // 7 earnings are worth 23.33 base units
        assert_eq!(g.payment_for_earnings(7).unwrap(), 23);
        assert_eq!(g.earnings_for_payment(23).unwrap(), 7);
        assert_eq!(g.earnings_for_payment(10).unwrap(), 3);
    }

    #[test]
    fn enter_refuses_a_locked_state() {
        let g = global();
        let mut working = g.enter().unwrap();
        assert!(working.locked);
        assert!(!g.locked);
        assert_eq!(working.enter().unwrap_err(), TowerError::Reentrancy.into());
        working.leave();
        assert!(working.enter().is_ok());
    }

    #[test]
    fn gate_transitions() {
        let mut gate = LiquidityGate {
            unlock_time: 100,
            ..Default::default()
        };
        assert_eq!(
            gate.ensure_force_window(99).unwrap_err(),
            TowerError::ProvisionWindowNotReached.into()
        );
        gate.ensure_force_window(100).unwrap();

        let plan = gate.begin().unwrap();
        assert_eq!(plan, ProvisionPlan::Seed);
        assert_eq!(gate.state, LiquidityState::Provisioning);
        assert_eq!(gate.begin().unwrap_err(), TowerError::Reentrancy.into());

        gate.seal();
        let pool = Pubkey::new_unique();
        gate.record_pool(plan, pool).unwrap();
        assert_eq!(
            gate.ensure_force_window(200).unwrap_err(),
            TowerError::AlreadyProvisioned.into()
        );

        let top_up = gate.begin().unwrap();
        assert_eq!(top_up, ProvisionPlan::TopUp(pool));
        assert_eq!(
            gate.record_pool(top_up, Pubkey::new_unique()).unwrap_err(),
            TowerError::ExternalVenue.into()
        );
        gate.record_pool(top_up, pool).unwrap();
    }
}
