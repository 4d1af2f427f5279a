pub mod amount;
pub mod budget;
pub mod dashboard;
pub mod date_range;
pub mod expense;
pub mod goal;
pub mod ledger;
pub mod report;
pub mod validation;
