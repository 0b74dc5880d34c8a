//! Vote ledger.

pub mod ledger;

pub use ledger::VoteLedger;
