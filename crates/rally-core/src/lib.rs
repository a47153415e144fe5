// Library root: match records, roster, stats engine, rankings, storage and
// configuration for the club ledger.

pub mod config;
pub mod model;
pub mod ranking;
pub mod roster;
pub mod stats;
pub mod store;
