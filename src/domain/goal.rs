use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{string_enum, Identifiable, NamedEntity};
use crate::currency::CurrencyCode;

string_enum! {
    pub enum GoalCategory("goal category") {
        Savings => "savings",
        Purchase => "purchase",
        Debt => "debt",
        Investment => "investment",
        Emergency => "emergency",
        Other => "other",
    }
}

/// A savings target. `completed` is a one-way latch set once the target is reached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialGoal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub currency: CurrencyCode,
    pub deadline: DateTime<Utc>,
    pub category: GoalCategory,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
}

impl FinancialGoal {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        target_amount: f64,
        currency: CurrencyCode,
        deadline: DateTime<Utc>,
        category: GoalCategory,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            currency,
            deadline,
            category,
            created_at,
            completed: false,
        }
    }

    /// Adds `amount` and latches `completed` once the target is met.
    pub fn contribute(&mut self, amount: f64) {
        self.current_amount += amount;
        if self.current_amount >= self.target_amount {
            self.completed = true;
        }
    }

    /// Percentage of the target reached, clamped to 100.
    pub fn progress(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 100.0;
        }
        (self.current_amount / self.target_amount * 100.0).clamp(0.0, 100.0)
    }

    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }
}

impl Identifiable for FinancialGoal {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for FinancialGoal {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(target: f64) -> FinancialGoal {
        FinancialGoal::new(
            "g1",
            "Bike",
            target,
            "USD".into(),
            Utc::now(),
            GoalCategory::Purchase,
            Utc::now(),
        )
    }

    #[test]
    fn completion_latches() {
        let mut goal = goal(100.0);
        goal.contribute(60.0);
        assert!(!goal.completed);
        goal.contribute(40.0);
        assert!(goal.completed);
        goal.contribute(-50.0);
        assert!(goal.completed, "completion never reverts");
        assert_eq!(goal.current_amount, 50.0);
    }

    #[test]
    fn progress_is_clamped() {
        let mut goal = goal(200.0);
        goal.contribute(50.0);
        assert_eq!(goal.progress(), 25.0);
        assert_eq!(goal.remaining(), 150.0);
        goal.contribute(500.0);
        assert_eq!(goal.progress(), 100.0);
        assert_eq!(goal.remaining(), 0.0);
    }
}
