// sheetload/src/commands/mod.rs

pub mod export;
pub mod inspect;
