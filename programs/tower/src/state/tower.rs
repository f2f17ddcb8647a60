// tower/state/tower.rs

use anchor_lang::prelude::*;

use crate::{
    catalog::{upgrade_entry, UpgradeEntry},
    constants::{MAX_SUB_LEVEL, REFERRAL_LEVELS, SECONDS_PER_HOUR, TIER_COUNT},
    errors::TowerError,
    utils::math::{checked_add, checked_sub},
};

#[constant]
pub const TOWER_SEED: &[u8] = b"tower";

#[account]
#[derive(InitSpace, Debug, Default, PartialEq)]
pub struct Tower {
    pub owner: Pubkey,
    pub registered: bool,
    pub credit_balance: u64,
    pub yield_rate: u64, // earnings per hour
    pub last_accrual_ts: i64,
    pub pending_earnings: u64,
    pub withdrawable_earnings: u64,
    pub levels: [u8; TIER_COUNT],
    pub referrer: Option<Pubkey>,
    pub referral_earnings: [u64; REFERRAL_LEVELS], // cumulative, per upline level
    pub unclaimed_referral: u64,
    pub total_deposited: u64,
    pub total_withdrawn: u64,
    pub has_claimed: bool,
    pub bump: u8,
}

impl Tower {
    pub fn ensure_registered(&self) -> Result<()> {
        if !self.registered {
            return err!(TowerError::NotRegistered);
        }

        Ok(())
    }

    /// Whole hours elapsed since the last accrual, or zero if the clock went backwards.
    pub fn elapsed_hours(&self, now: i64) -> u64 {
        let elapsed = now.saturating_sub(self.last_accrual_ts);
        if elapsed <= 0 {
            return 0;
        }
        (elapsed / SECONDS_PER_HOUR) as u64
    }

    /// Yield that `accrue` would add at `now`, without mutating.
    pub fn pending_yield(&self, now: i64, max_hours: u64) -> Result<u64> {
        let hours = self.elapsed_hours(now).min(max_hours);
        self.yield_rate
            .checked_mul(hours)
            .ok_or_else(|| error!(TowerError::MathOverflow))
    }

    /// Moves accrued yield into pending earnings. Hours past `max_hours` are
    /// dropped, the sub-hour remainder stays on the clock.
    pub fn accrue(&mut self, now: i64, max_hours: u64) -> Result<u64> {
        let hours = self.elapsed_hours(now);
        if hours == 0 {
            return Ok(0);
        }

        let earned = self.pending_yield(now, max_hours)?;
        self.pending_earnings = checked_add(self.pending_earnings, earned)?;

        let advance = (hours as i64)
            .checked_mul(SECONDS_PER_HOUR)
            .ok_or_else(|| error!(TowerError::MathOverflow))?;
        self.last_accrual_ts = self
            .last_accrual_ts
            .checked_add(advance)
            .ok_or_else(|| error!(TowerError::MathOverflow))?;

        Ok(earned)
    }

    /// Validates ordering and returns the catalog entry for the next sub-level of `tier`.
    pub fn next_upgrade(&self, tier: u8) -> Result<UpgradeEntry> {
        let index = tier as usize;
        if index >= TIER_COUNT {
            return err!(TowerError::InvalidTier);
        }

        let level = self.levels[index];
        if level >= MAX_SUB_LEVEL {
            return err!(TowerError::MaxSubLevel);
        }
        if index > 0 && self.levels[index - 1] < MAX_SUB_LEVEL {
            return err!(TowerError::PrerequisiteNotMet);
        }

        upgrade_entry(tier, level + 1)
    }

    pub fn apply_upgrade(&mut self, tier: u8, entry: UpgradeEntry) -> Result<()> {
        if self.credit_balance < entry.cost {
            return err!(TowerError::InsufficientCredits);
        }

        self.credit_balance = checked_sub(self.credit_balance, entry.cost)?;
        self.yield_rate = checked_add(self.yield_rate, entry.yield_increment)?;
        self.levels[tier as usize] += 1;

        Ok(())
    }

    pub fn is_fully_built(&self) -> bool {
        self.levels.iter().all(|level| *level == MAX_SUB_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{tier_yield, FULL_BUILD_YIELD};

    fn tower() -> Tower {
        Tower {
            registered: true,
            last_accrual_ts: 1_000,
            ..Default::default()
        }
    }

    #[test]
    fn accrual_credits_whole_hours_and_keeps_the_remainder() {
        let mut t = tower();
        t.yield_rate = 467;

        // 2h 30m
        assert_eq!(t.accrue(1_000 + 9_000, 24).unwrap(), 934);
        assert_eq!(t.pending_earnings, 934);
        assert_eq!(t.last_accrual_ts, 1_000 + 7_200);

        // the half hour is still on the clock
        assert_eq!(t.accrue(1_000 + 10_800, 24).unwrap(), 467);
        assert_eq!(t.last_accrual_ts, 1_000 + 10_800);
    }

    #[test]
    fn accrual_is_capped_and_excess_is_forfeited() {
        let mut t = tower();
        t.yield_rate = 10;

        let now = 1_000 + 30 * SECONDS_PER_HOUR;
        assert_eq!(t.accrue(now, 24).unwrap(), 240);
        assert_eq!(t.last_accrual_ts, now);
        assert_eq!(t.accrue(now, 24).unwrap(), 0);
        assert_eq!(t.pending_earnings, 240);
    }

    #[test]
    fn accrual_ignores_a_clock_behind_the_stamp() {
        let mut t = tower();
        t.yield_rate = 10;
        assert_eq!(t.accrue(500, 24).unwrap(), 0);
        assert_eq!(t.last_accrual_ts, 1_000);
    }

    #[test]
    fn upgrades_are_ordered() {
        let mut t = tower();
        t.credit_balance = u64::MAX / 2;

        assert_eq!(t.next_upgrade(1).unwrap_err(), TowerError::PrerequisiteNotMet.into());
        assert_eq!(t.next_upgrade(8).unwrap_err(), TowerError::InvalidTier.into());

        for _ in 0..MAX_SUB_LEVEL {
            let e = t.next_upgrade(0).unwrap();
            t.apply_upgrade(0, e).unwrap();
        }
        assert_eq!(t.next_upgrade(0).unwrap_err(), TowerError::MaxSubLevel.into());
        assert_eq!(t.yield_rate, tier_yield(0, MAX_SUB_LEVEL));
        assert!(t.next_upgrade(1).is_ok());
    }

    #[test]
    fn upgrade_needs_credits() {
        let mut t = tower();
        t.credit_balance = 13;
        let e = t.next_upgrade(0).unwrap();
        assert_eq!(t.apply_upgrade(0, e).unwrap_err(), TowerError::InsufficientCredits.into());
        assert_eq!(t.levels[0], 0);
        assert_eq!(t.credit_balance, 13);
    }

    #[test]
    fn full_build_reaches_the_catalog_yield() {
        let mut t = tower();
        t.credit_balance = u64::MAX / 2;
        for tier in 0..TIER_COUNT as u8 {
            assert!(!t.is_fully_built());
            for _ in 0..MAX_SUB_LEVEL {
                let e = t.next_upgrade(tier).unwrap();
                t.apply_upgrade(tier, e).unwrap();
            }
        }
        assert!(t.is_fully_built());
        assert_eq!(t.yield_rate, FULL_BUILD_YIELD);
    }
}
