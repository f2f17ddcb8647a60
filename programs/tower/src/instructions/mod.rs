// tower/instructions/mod.rs

pub mod admin;
pub mod open;
pub mod player;

pub use admin::*;
pub use open::*;
pub use player::*;
