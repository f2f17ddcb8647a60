// tower/instructions/open/mod.rs

pub mod force_add_liquidity;

pub use force_add_liquidity::ForceAddLiquidity;
pub(crate) use force_add_liquidity::__client_accounts_force_add_liquidity;

cfg_if::cfg_if! {
    if #[cfg(feature = "cpi")] {
        pub(crate) use force_add_liquidity::__cpi_client_accounts_force_add_liquidity;
    }
}
