pub mod ledger;
pub mod settlement;
pub mod transition;
