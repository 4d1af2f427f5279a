use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;
use super::amount::deserialize_amount;
use super::date_range::DAY_MILLIS;
use super::validation::{ensure_non_negative, ensure_not_blank, ensure_positive, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Expired,
}

/// A savings goal with a target amount and a deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub target: f64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub current: f64,
    pub deadline: NaiveDateTime,
}

impl Goal {
    pub fn new(user_id: impl Into<String>, request: NewGoal) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            name: request.name.trim().to_string(),
            target: request.target,
            current: request.current.unwrap_or(0.0),
            deadline: request.deadline,
        }
    }

    /// Whole days left until the deadline, rounded up. Negative once past.
    pub fn days_remaining(&self, now: NaiveDateTime) -> i64 {
        let millis = (self.deadline - now).num_milliseconds();
        (millis as f64 / DAY_MILLIS as f64).ceil() as i64
    }

    pub fn status(&self, now: NaiveDateTime) -> GoalStatus {
        if now <= self.deadline {
            GoalStatus::Active
        } else {
            GoalStatus::Expired
        }
    }

    /// `current / target` as a percentage; 0 when the target is 0.
    pub fn progress_pct(&self) -> f64 {
        if self.target > 0.0 {
            (self.current / self.target) * 100.0
        } else {
            0.0
        }
    }

    pub fn apply(&mut self, update: GoalUpdate) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(target) = update.target {
            self.target = target;
        }
        if let Some(current) = update.current {
            self.current = current;
        }
        if let Some(deadline) = update.deadline {
            self.deadline = deadline;
        }
    }
}

/// A goal plus its derived attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    pub days_remaining: i64,
    pub status: GoalStatus,
    pub progress_pct: f64,
}

impl GoalView {
    pub fn new(goal: Goal, now: NaiveDateTime) -> Self {
        Self {
            days_remaining: goal.days_remaining(now),
            status: goal.status(now),
            progress_pct: goal.progress_pct(),
            goal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    pub target: f64,
    #[serde(default)]
    pub current: Option<f64>,
    pub deadline: NaiveDateTime,
}

impl NewGoal {
    pub fn new(name: impl Into<String>, target: f64, deadline: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            target,
            current: None,
            deadline,
        }
    }

    /// The deadline must not already be in the past when the goal is created.
    pub fn ensure_deadline_after(&self, now: NaiveDateTime) -> Result<(), CoreError> {
        if self.deadline < now {
            return Err(CoreError::Validation(format!(
                "deadline ({}) must not be in the past",
                self.deadline
            )));
        }
        Ok(())
    }
}

impl Validate for NewGoal {
    fn validate(&self) -> Result<(), CoreError> {
        ensure_not_blank("name", &self.name)?;
        ensure_non_negative("target", self.target)?;
        if let Some(current) = self.current {
            ensure_non_negative("current", current)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub deadline: Option<NaiveDateTime>,
}

impl Validate for GoalUpdate {
    fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.name {
            ensure_not_blank("name", name)?;
        }
        if let Some(target) = self.target {
            ensure_non_negative("target", target)?;
        }
        if let Some(current) = self.current {
            ensure_non_negative("current", current)?;
        }
        Ok(())
    }
}

/// A deposit towards a goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub amount: f64,
}

impl Validate for Contribution {
    fn validate(&self) -> Result<(), CoreError> {
        ensure_positive("amount", self.amount)
    }
}
