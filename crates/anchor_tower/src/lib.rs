// anchor_tower - interface crate for programs that read tower state

pub mod achievement_interface;

pub use achievement_interface::*;
