use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;
use super::amount::deserialize_amount;
use super::date_range::DateRange;
use super::validation::{ensure_max_len, ensure_non_negative, Validate};

/// Maximum length of budget notes.
pub const MAX_NOTES_LEN: usize = 1000;

/// Length of a budget's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    /// Monday 00:00 through Sunday 23:59:59.999
    Weekly,
    /// First through last day of a calendar month
    Monthly,
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetPeriod::Weekly => write!(f, "weekly"),
            BudgetPeriod::Monthly => write!(f, "monthly"),
        }
    }
}

/// Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Active,
    Expired,
}

/// A spending budget for one weekly or monthly window.
///
/// `start_date` / `end_date` are always derived from the period strategy at
/// creation (or when the period changes); callers never set them directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,

    pub user_id: String,

    pub period: BudgetPeriod,

    /// Stored amount; unparsable values read back as 0
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_budget: f64,

    #[serde(default)]
    pub notes: String,

    pub start_date: NaiveDateTime,

    pub end_date: NaiveDateTime,
}

impl Budget {
    pub fn new(
        user_id: impl Into<String>,
        period: BudgetPeriod,
        total_budget: f64,
        notes: impl Into<String>,
        window: DateRange,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            period,
            total_budget,
            notes: notes.into(),
            start_date: window.start,
            end_date: window.end,
        }
    }

    /// `Active` while the window has not ended yet.
    pub fn status(&self, now: NaiveDateTime) -> BudgetStatus {
        if self.end_date >= now {
            BudgetStatus::Active
        } else {
            BudgetStatus::Expired
        }
    }

    pub fn window(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    /// Any temporal overlap with `range` qualifies the budget for a report.
    pub fn overlaps(&self, range: &DateRange) -> bool {
        range.overlaps(self.start_date, Some(self.end_date))
    }
}

/// A budget together with its derived status, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetView {
    #[serde(flatten)]
    pub budget: Budget,
    pub status: BudgetStatus,
}

impl BudgetView {
    pub fn new(budget: Budget, now: NaiveDateTime) -> Self {
        let status = budget.status(now);
        Self { budget, status }
    }
}

/// Payload for creating a budget.
///
/// `reference_date` picks which week/month the budget covers; defaults to today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub period: BudgetPeriod,
    pub total_budget: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

impl NewBudget {
    pub fn new(period: BudgetPeriod, total_budget: f64) -> Self {
        Self {
            period,
            total_budget,
            notes: String::new(),
            reference_date: None,
        }
    }

    pub fn starting(mut self, reference_date: NaiveDate) -> Self {
        self.reference_date = Some(reference_date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

impl Validate for NewBudget {
    fn validate(&self) -> Result<(), CoreError> {
        ensure_non_negative("totalBudget", self.total_budget)?;
        ensure_max_len("notes", &self.notes, MAX_NOTES_LEN)
    }
}

/// Partial update of a budget. Changing `period` or `reference_date`
/// recomputes the window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    #[serde(default)]
    pub period: Option<BudgetPeriod>,
    #[serde(default)]
    pub total_budget: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

impl BudgetUpdate {
    pub fn changes_window(&self) -> bool {
        self.period.is_some() || self.reference_date.is_some()
    }
}

impl Validate for BudgetUpdate {
    fn validate(&self) -> Result<(), CoreError> {
        if let Some(total) = self.total_budget {
            ensure_non_negative("totalBudget", total)?;
        }
        if let Some(notes) = &self.notes {
            ensure_max_len("notes", notes, MAX_NOTES_LEN)?;
        }
        Ok(())
    }
}
