// src/infrastructure/mod.rs
pub mod fixtures;
pub mod ledger;
