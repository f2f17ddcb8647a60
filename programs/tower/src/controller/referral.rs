// tower/controller/referral.rs

use anchor_lang::prelude::*;

use crate::{
    constants::REFERRAL_LEVELS,
    errors::TowerError,
    state::{Global, ReferralPayout, Tower},
    utils::math::checked_add,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferralCredit {
    pub referrer: Pubkey,
    pub level: u8,
    pub amount: u64, // earnings
}

/// Referrer bound on a first deposit. Unset, self and the default key fall
/// back to the manager; the manager itself has no referrer.
pub fn resolve_referrer(
    payer: &Pubkey,
    requested: Option<Pubkey>,
    manager: &Pubkey,
) -> Option<Pubkey> {
    match requested {
        Some(key) if key != *payer && key != Pubkey::default() => Some(key),
        _ if payer != manager => Some(*manager),
        _ => None,
    }
}

/// Walks the chain above `payer` starting at `first` and credits each level.
/// `upline[i]` must be the tower `i` hops up. The walk stops at an unbound
/// referrer, at the payer, or at a tower already visited.
pub fn credit_upline(
    global: &Global,
    payer: &Pubkey,
    first: Option<Pubkey>,
    upline: &mut [Tower],
    credits: u64,
) -> Result<Vec<ReferralCredit>> {
    let mut credited = Vec::with_capacity(REFERRAL_LEVELS);
    let mut visited = vec![*payer];
    let mut next = first;

    for level in 0..REFERRAL_LEVELS {
        let Some(key) = next else { break };
        if visited.contains(&key) {
            break;
        }

        let tower = upline
            .get_mut(level)
            .filter(|tower| tower.owner == key)
            .ok_or_else(|| error!(TowerError::InvalidUpline))?;

        let amount = global.referral_reward(credits, level)?;
        if amount > 0 {
            tower.referral_earnings[level] = checked_add(tower.referral_earnings[level], amount)?;
            match global.referral_payout {
                ReferralPayout::Withdrawable => {
                    tower.withdrawable_earnings = checked_add(tower.withdrawable_earnings, amount)?;
                }
                ReferralPayout::OnClaim => {
                    tower.unclaimed_referral = checked_add(tower.unclaimed_referral, amount)?;
                }
            }
            credited.push(ReferralCredit {
                referrer: key,
                level: level as u8,
                amount,
            });
        }

        visited.push(key);
        next = tower.referrer;
    }

    Ok(credited)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(payout: ReferralPayout) -> Global {
        Global {
            earnings_per_credit: 1,
            referral_bps: [500, 300, 200],
            referral_payout: payout,
            ..Default::default()
        }
    }

    fn tower(owner: Pubkey, referrer: Option<Pubkey>) -> Tower {
        Tower {
            owner,
            referrer,
            registered: true,
            ..Default::default()
        }
    }

    #[test]
    fn fallback_goes_to_the_manager() {
        let payer = Pubkey::new_unique();
        let manager = Pubkey::new_unique();
        let other = Pubkey::new_unique();

        assert_eq!(resolve_referrer(&payer, Some(other), &manager), Some(other));
        assert_eq!(resolve_referrer(&payer, None, &manager), Some(manager));
        assert_eq!(resolve_referrer(&payer, Some(payer), &manager), Some(manager));
        assert_eq!(resolve_referrer(&payer, Some(Pubkey::default()), &manager), Some(manager));
        assert_eq!(resolve_referrer(&manager, None, &manager), None);
    }

    #[test]
    fn three_levels_are_credited() {
        let (payer, a, b, c, d) = (
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        );
        let mut upline = vec![tower(a, Some(b)), tower(b, Some(c)), tower(c, Some(d))];

        let credited = credit_upline(
            &global(ReferralPayout::Withdrawable),
            &payer,
            Some(a),
            &mut upline,
            10_000,
        )
        .unwrap();

        assert_eq!(credited.len(), 3);
        assert_eq!(upline[0].withdrawable_earnings, 500);
        assert_eq!(upline[1].withdrawable_earnings, 300);
        assert_eq!(upline[2].withdrawable_earnings, 200);
        assert_eq!(upline[2].referral_earnings, [0, 0, 200]);
    }

    #[test]
    fn on_claim_accumulates_unclaimed() {
        let payer = Pubkey::new_unique();
        let a = Pubkey::new_unique();
        let mut upline = vec![tower(a, None)];

        credit_upline(&global(ReferralPayout::OnClaim), &payer, Some(a), &mut upline, 10_000)
            .unwrap();

        assert_eq!(upline[0].unclaimed_referral, 500);
        assert_eq!(upline[0].withdrawable_earnings, 0);
    }

    #[test]
    fn walk_stops_at_a_cycle() {
        let payer = Pubkey::new_unique();
        let a = Pubkey::new_unique();
        // a was referred by the payer
        let mut upline = vec![tower(a, Some(payer))];

        let credited = credit_upline(
            &global(ReferralPayout::Withdrawable),
            &payer,
            Some(a),
            &mut upline,
            10_000,
        )
        .unwrap();
        assert_eq!(credited.len(), 1);
    }

    #[test]
    fn missing_or_misordered_upline_is_rejected() {
        let payer = Pubkey::new_unique();
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let g = global(ReferralPayout::Withdrawable);

        let mut short = vec![tower(a, Some(b))];
        assert_eq!(
            credit_upline(&g, &payer, Some(a), &mut short, 10_000).unwrap_err(),
            TowerError::InvalidUpline.into()
        );

        let mut swapped = vec![tower(b, None), tower(a, Some(b))];
        assert_eq!(
            credit_upline(&g, &payer, Some(a), &mut swapped, 10_000).unwrap_err(),
            TowerError::InvalidUpline.into()
        );
    }
}
