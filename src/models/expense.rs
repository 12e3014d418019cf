use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A persisted expense record.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct Expense {
    /// Backend-assigned identifier, unique within the backend.
    pub id: i64,
    /// Chat id the expense belongs to. Immutable; every read and delete is
    /// filtered by it.
    pub owner_id: i64,
    /// Label of one of the fixed categories.
    pub category: String,
    pub description: String,
    /// Positive amount, rounded to 2 fractional digits.
    pub amount: f64,
    /// Calendar date the expense applies to.
    pub date: NaiveDate,
    /// Creation instant, used for tie-breaking and "most recent" queries.
    pub created_at: DateTime<Utc>,
}

/// Data collected by the entry flow to create one expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
}
