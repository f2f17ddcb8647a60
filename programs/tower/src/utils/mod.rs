// tower/utils/mod.rs

pub mod account;
pub mod host;
pub mod math;
pub mod token;
