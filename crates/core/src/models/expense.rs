use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;
use super::amount::deserialize_amount;
use super::validation::{ensure_max_len, ensure_positive, Validate};

/// Maximum length of an expense description.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Fixed set of spending categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transportation,
    Housing,
    Utilities,
    Entertainment,
    Healthcare,
    Shopping,
    Education,
    Personal,
    Travel,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Food,
        Category::Transportation,
        Category::Housing,
        Category::Utilities,
        Category::Entertainment,
        Category::Healthcare,
        Category::Shopping,
        Category::Education,
        Category::Personal,
        Category::Travel,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Housing => "Housing",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Shopping => "Shopping",
            Category::Education => "Education",
            Category::Personal => "Personal",
            Category::Travel => "Travel",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CoreError;

    /// Case-insensitive lookup by name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .copied()
            .ok_or_else(|| CoreError::Validation(format!("Unknown expense category '{s}'")))
    }
}

/// Stored categories that are missing, null or unknown fall back to `Other`.
fn deserialize_category<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| s.parse::<Category>().ok())
        .unwrap_or_default())
}

/// Records without a date sort as the Unix epoch.
fn epoch() -> NaiveDateTime {
    NaiveDate::default().and_time(NaiveTime::MIN)
}

/// A single expense owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,

    pub user_id: String,

    /// Budget this expense was booked against, if any
    #[serde(default)]
    pub budget_id: Option<Uuid>,

    #[serde(default, deserialize_with = "deserialize_category")]
    pub category: Category,

    /// Stored amount; unparsable values read back as 0
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,

    #[serde(default = "epoch")]
    pub date: NaiveDateTime,

    #[serde(default)]
    pub description: String,
}

impl Expense {
    pub fn new(user_id: impl Into<String>, request: NewExpense) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            budget_id: request.budget_id,
            category: request.category,
            amount: request.amount,
            date: request.date,
            description: request.description.trim().to_string(),
        }
    }

    /// Apply a partial update in place. Call `ExpenseUpdate::validate` first.
    pub fn apply(&mut self, update: ExpenseUpdate) {
        if let Some(budget_id) = update.budget_id {
            self.budget_id = budget_id;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(description) = update.description {
            self.description = description.trim().to_string();
        }
    }
}

/// Payload for creating an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    #[serde(default)]
    pub budget_id: Option<Uuid>,
    pub category: Category,
    pub amount: f64,
    pub date: NaiveDateTime,
    #[serde(default)]
    pub description: String,
}

impl NewExpense {
    pub fn new(category: Category, amount: f64, date: NaiveDateTime) -> Self {
        Self {
            budget_id: None,
            category,
            amount,
            date,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_budget(mut self, budget_id: Uuid) -> Self {
        self.budget_id = Some(budget_id);
        self
    }
}

impl Validate for NewExpense {
    fn validate(&self) -> Result<(), CoreError> {
        ensure_positive("amount", self.amount)?;
        ensure_max_len("description", &self.description, MAX_DESCRIPTION_LEN)
    }
}

/// Partial update of an expense. `budget_id: Some(None)` detaches the budget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    #[serde(default)]
    pub budget_id: Option<Option<Uuid>>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for ExpenseUpdate {
    fn validate(&self) -> Result<(), CoreError> {
        if let Some(amount) = self.amount {
            ensure_positive("amount", amount)?;
        }
        if let Some(description) = &self.description {
            ensure_max_len("description", description, MAX_DESCRIPTION_LEN)?;
        }
        Ok(())
    }
}
