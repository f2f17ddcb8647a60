// tower/catalog.rs

use anchor_lang::prelude::*;

use crate::{
    constants::{MAX_SUB_LEVEL, TIER_COUNT},
    errors::TowerError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeEntry {
    pub cost: u64,
    pub yield_increment: u64, // per hour
}

const fn entry(cost: u64, yield_increment: u64) -> UpgradeEntry {
    UpgradeEntry {
        cost,
        yield_increment,
    }
}

/// Cost and hourly yield of every (tier, sub-level) upgrade.
/// Row `t` holds sub-levels 1..=5 of tier `t`.
pub const CATALOG: [[UpgradeEntry; MAX_SUB_LEVEL as usize]; TIER_COUNT] = [
    [
        entry(14, 467),
        entry(21, 700),
        entry(42, 1_401),
        entry(70, 2_335),
        entry(105, 3_502),
    ],
    [
        entry(210, 6_510),
        entry(315, 9_765),
        entry(630, 19_530),
        entry(1_050, 32_550),
        entry(1_575, 48_825),
    ],
    [
        entry(1_050, 30_450),
        entry(1_575, 45_675),
        entry(3_150, 91_350),
        entry(5_250, 152_250),
        entry(7_875, 228_375),
    ],
    [
        entry(5_250, 141_750),
        entry(7_875, 212_625),
        entry(15_750, 425_250),
        entry(26_250, 708_750),
        entry(39_375, 1_063_125),
    ],
    [
        entry(26_250, 656_250),
        entry(39_375, 984_375),
        entry(78_750, 1_968_750),
        entry(131_250, 3_281_250),
        entry(196_875, 4_921_875),
    ],
    [
        entry(131_250, 3_018_750),
        entry(196_875, 4_528_125),
        entry(393_750, 9_056_250),
        entry(656_250, 15_093_750),
        entry(984_375, 22_640_625),
    ],
    [
        entry(656_250, 13_781_250),
        entry(984_375, 20_671_875),
        entry(1_968_750, 41_343_750),
        entry(3_281_250, 68_906_250),
        entry(4_921_875, 103_359_375),
    ],
    [
        entry(3_281_250, 62_343_750),
        entry(4_921_875, 93_515_625),
        entry(9_843_750, 187_031_250),
        entry(16_406_250, 311_718_750),
        entry(24_609_375, 467_578_125),
    ],
];

/// Credits needed to buy every upgrade in the catalog.
pub const FULL_BUILD_COST: u64 = sum_catalog(false);

/// Hourly yield of a fully built tower.
pub const FULL_BUILD_YIELD: u64 = sum_catalog(true);

const fn sum_catalog(yields: bool) -> u64 {
    let mut total = 0;
    let mut tier = 0;
    while tier < TIER_COUNT {
        let mut level = 0;
        while level < MAX_SUB_LEVEL as usize {
            let e = CATALOG[tier][level];
            total += if yields { e.yield_increment } else { e.cost };
            level += 1;
        }
        tier += 1;
    }
    total
}

/// Looks up the upgrade for `tier` (0-based) at `sub_level` (1-based).
pub fn upgrade_entry(tier: u8, sub_level: u8) -> Result<UpgradeEntry> {
    if tier as usize >= TIER_COUNT {
        return err!(TowerError::InvalidTier);
    }
    if sub_level == 0 || sub_level > MAX_SUB_LEVEL {
        return err!(TowerError::MaxSubLevel);
    }

    Ok(CATALOG[tier as usize][sub_level as usize - 1])
}

/// Sum of the yield increments of the first `level` sub-levels of `tier`.
pub fn tier_yield(tier: usize, level: u8) -> u64 {
    CATALOG[tier]
        .iter()
        .take(level as usize)
        .map(|e| e.yield_increment)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn costs_and_yields_strictly_increase_within_a_tier() {
        for row in CATALOG.iter() {
            for pair in row.windows(2) {
                assert!(pair[0].cost < pair[1].cost);
                assert!(pair[0].yield_increment < pair[1].yield_increment);
            }
        }
    }

    #[test]
    fn first_upgrade_matches_the_published_table() {
        let first = upgrade_entry(0, 1).unwrap();
        assert_eq!(first.cost, 14);
        assert_eq!(first.yield_increment, 467);
    }

    #[test]
    fn lookup_rejects_out_of_range_keys() {
        assert_eq!(upgrade_entry(8, 1).unwrap_err(), TowerError::InvalidTier.into());
        assert_eq!(upgrade_entry(0, 0).unwrap_err(), TowerError::MaxSubLevel.into());
        assert_eq!(upgrade_entry(0, 6).unwrap_err(), TowerError::MaxSubLevel.into());
    }

    #[test]
    fn totals_match_a_manual_sum() {
        let cost: u64 = CATALOG.iter().flatten().map(|e| e.cost).sum();
        let yields: u64 = (0..TIER_COUNT).map(|t| tier_yield(t, MAX_SUB_LEVEL)).sum();
        assert_eq!(FULL_BUILD_COST, cost);
        assert_eq!(FULL_BUILD_YIELD, yields);
        assert_eq!(FULL_BUILD_COST, 73_827_432);
    }
}
