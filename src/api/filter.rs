//! List filtering and overdue annotation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Goal, GoalStatus, GoalType, OVERDUE_MESSAGE};

/// Query parameters for listing goals. Empty values mean "no filter".
#[derive(Debug, Default, Deserialize)]
pub struct ListGoalsQuery {
    #[serde(rename = "type")]
    pub goal_type: Option<String>,
    pub status: Option<String>,
}

/// Parsed list filters. `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalFilter {
    pub goal_type: Option<GoalType>,
    pub status: Option<GoalStatus>,
}

impl GoalFilter {
    /// Parse raw filter values, rejecting tokens that name no type or status.
    pub fn parse(goal_type: Option<&str>, status: Option<&str>) -> Result<Self, String> {
        let goal_type = match goal_type.filter(|t| !t.is_empty()) {
            None => None,
            Some(t) => Some(
                GoalType::from_str(t).ok_or_else(|| format!("Unknown goal type: {}", t))?,
            ),
        };
        let status = match status.filter(|s| !s.is_empty()) {
            None => None,
            Some(s) => Some(
                GoalStatus::from_str(s).ok_or_else(|| format!("Unknown goal status: {}", s))?,
            ),
        };
        Ok(Self { goal_type, status })
    }

    pub fn matches(&self, goal: &Goal) -> bool {
        self.goal_type.map_or(true, |t| goal.goal_type == t)
            && self.status.map_or(true, |s| goal.status == s)
    }
}

impl TryFrom<&ListGoalsQuery> for GoalFilter {
    type Error = String;

    fn try_from(query: &ListGoalsQuery) -> Result<Self, Self::Error> {
        Self::parse(query.goal_type.as_deref(), query.status.as_deref())
    }
}

/// Filtered goals plus overdue alerts keyed by goal id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalList {
    pub goals: Vec<Goal>,
    pub alerts: BTreeMap<Uuid, String>,
}

/// Keep the goals matching `filter` (in order) and flag the overdue ones.
pub fn build_goal_list(goals: Vec<Goal>, filter: GoalFilter, today: NaiveDate) -> GoalList {
    let goals: Vec<Goal> = goals.into_iter().filter(|g| filter.matches(g)).collect();
    let alerts = goals
        .iter()
        .filter(|g| g.is_overdue(today))
        .map(|g| (g.id, OVERDUE_MESSAGE.to_string()))
        .collect();
    GoalList { goals, alerts }
}
