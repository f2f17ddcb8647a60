// tower/constants.rs

pub const ANCHOR_DISCRIMINATOR_SIZE: usize = 8;

pub const ONE_HUNDRED_PERCENT: u64 = 100_00; // 1e4

pub const SECONDS_PER_HOUR: i64 = 3_600;

// Accrual beyond this many hours between two collects is forfeited
pub const DEFAULT_MAX_ACCRUAL_HOURS: u64 = 24;
pub const MAX_ACCRUAL_HOURS_LIMIT: u64 = 48;

pub const TIER_COUNT: usize = 8;
pub const MAX_SUB_LEVEL: u8 = 5;

pub const REFERRAL_LEVELS: usize = 3;

// Normalized weights of the weighted vault venue (1e18 = 100%)
pub const WEIGHT_ONE: u64 = 1_000_000_000_000_000_000;
