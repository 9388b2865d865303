use crate::domain::FinancialGoal;
use crate::errors::{OperationError, OperationResult};
use crate::repository::Repository;

/// Display figures for a goal's progress bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    /// Percentage reached, clamped to 100.
    pub percentage: f64,
    pub remaining: f64,
    pub completed: bool,
}

pub struct GoalService;

impl GoalService {
    /// Adds `amount` to the goal's current amount and returns the updated goal.
    /// Reaching the target latches `completed`; it never reverts.
    pub fn add_to_goal(repo: &Repository, goal_id: &str, amount: f64) -> OperationResult<FinancialGoal> {
        let goal = repo.goals().modify(|goals| {
            let goal = goals
                .iter_mut()
                .find(|goal| goal.id == goal_id)
                .ok_or_else(|| OperationError::GoalNotFound(goal_id.to_string()))?;
            let was_completed = goal.completed;
            goal.contribute(amount);
            if goal.completed && !was_completed {
                tracing::info!(goal_id, "goal reached its target");
            }
            Ok::<_, OperationError>(goal.clone())
        })?;
        tracing::info!(goal_id, amount, current = goal.current_amount, "added funds to goal");
        Ok(goal)
    }

    pub fn progress(goal: &FinancialGoal) -> GoalProgress {
        GoalProgress {
            percentage: goal.progress(),
            remaining: goal.remaining(),
            completed: goal.completed,
        }
    }
}
