use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Cents, TourId, UserId, generate_id, money};

pub type ExpenseId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Transport,
    Hotel,
    Food,
    Guide,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 5] = [
        ExpenseCategory::Transport,
        ExpenseCategory::Hotel,
        ExpenseCategory::Food,
        ExpenseCategory::Guide,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Hotel => "Hotel",
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Guide => "Guide",
            ExpenseCategory::Other => "Other",
        }
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpenseCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown expense category '{}'", s))
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Money spent running a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub tour_id: TourId,
    pub user_id: UserId,
    pub category: ExpenseCategory,
    #[serde(with = "money::lenient", default)]
    pub amount: Cents,
    #[serde(default)]
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        tour_id: impl Into<TourId>,
        user_id: impl Into<UserId>,
        category: ExpenseCategory,
        amount: Cents,
    ) -> Self {
        Self {
            id: generate_id("exp"),
            tour_id: tour_id.into(),
            user_id: user_id.into(),
            category,
            amount,
            note: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}
