// tower/controller/treasury.rs

use anchor_lang::prelude::*;

use crate::{errors::TowerError, state::Global};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payout {
    pub owed: u64,           // payment units the withdrawable balance is worth
    pub paid: u64,           // payment units leaving the reserve
    pub earnings_spent: u64, // withdrawable earnings consumed
}

impl Payout {
    pub fn is_partial(&self) -> bool {
        self.paid < self.owed
    }
}

/// Pays what the reserve can cover. A full payout consumes the whole balance,
/// sub-unit dust included. A partial payout consumes the earnings equivalent
/// of what was paid, rounded up, and leaves the rest withdrawable.
pub fn plan_withdrawal(global: &Global, withdrawable: u64) -> Result<Payout> {
    let owed = global.payment_for_earnings(withdrawable)?;
    if owed == 0 {
        return err!(TowerError::ZeroAmount);
    }

    let paid = owed.min(global.reserve_balance);
    let earnings_spent = if paid == owed {
        withdrawable
    } else {
        global.earnings_for_payment(paid)?.min(withdrawable)
    };

    Ok(Payout {
        owed,
        paid,
        earnings_spent,
    })
}

/// Credits bought back with `withdrawable` at the deposit rate.
pub fn reinvest_credits(global: &Global, withdrawable: u64) -> Result<u64> {
    let payment = global.payment_for_earnings(withdrawable)?;
    global.credits_for_payment(payment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(reserve_balance: u64) -> Global {
        Global {
            payment_to_credit_rate: 1_000_000,
            payment_unit: 1_000_000_000,
            earnings_per_credit: 1,
            reserve_balance,
            ..Default::default()
        }
    }

    #[test]
    fn full_payout_spends_everything() {
        let p = plan_withdrawal(&global(u64::MAX), 11_208).unwrap();
        assert_eq!(p.owed, 11_208_000);
        assert_eq!(p.paid, 11_208_000);
        assert_eq!(p.earnings_spent, 11_208);
        assert!(!p.is_partial());
    }

    #[test]
    fn partial_payout_keeps_the_remainder() {
        let p = plan_withdrawal(&global(5_000_500), 11_208).unwrap();
        assert_eq!(p.paid, 5_000_500);
        // 5_000.5 earnings, rounded up
        assert_eq!(p.earnings_spent, 5_001);
        assert!(p.is_partial());
    }

    #[test]
    fn empty_reserve_pays_nothing() {
        let p = plan_withdrawal(&global(0), 11_208).unwrap();
        assert_eq!(p.paid, 0);
        assert_eq!(p.earnings_spent, 0);
    }

    #[test]
    fn dust_below_one_unit_is_rejected() {
        let g = Global {
            payment_to_credit_rate: 1_000,
            payment_unit: 1,
            earnings_per_credit: 1,
            reserve_balance: 100,
            ..Default::default()
        };
        assert_eq!(plan_withdrawal(&g, 999).unwrap_err(), TowerError::ZeroAmount.into());
    }

    #[test]
    fn reinvest_uses_the_deposit_rate() {
        assert_eq!(reinvest_credits(&global(0), 11_208).unwrap(), 11_208);
    }
}
