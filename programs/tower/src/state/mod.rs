// tower/state/mod.rs

pub mod global;
pub mod tower;

pub use global::*;
pub use tower::*;
