use serde::{Deserialize, Serialize};

use super::budget::Budget;
use super::expense::Expense;
use super::goal::Goal;
use super::report::ReportDownloadLog;

/// Every record of every user. This is what the in-memory store holds and
/// what gets serialized, encrypted, and written to a snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    #[serde(default)]
    pub expenses: Vec<Expense>,

    #[serde(default)]
    pub budgets: Vec<Budget>,

    #[serde(default)]
    pub goals: Vec<Goal>,

    /// Append-only download audit trail
    #[serde(default)]
    pub report_logs: Vec<ReportDownloadLog>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
            && self.budgets.is_empty()
            && self.goals.is_empty()
            && self.report_logs.is_empty()
    }
}
