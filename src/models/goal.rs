use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message attached to active goals whose target date has passed.
pub const OVERDUE_MESSAGE: &str = "Target date passed!";

/// A personal objective with a target date and progress.
///
/// `id` and `created_date` are assigned once when the goal is created and
/// never change afterwards. Everything else is replaced wholesale on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub target_date: NaiveDate,
    /// Always within `0..=100`.
    pub progress_percent: u8,
    pub created_date: DateTime<Utc>,
    pub status: GoalStatus,
}

impl Goal {
    /// Build a fresh goal from validated input, assigning its id and creation time.
    pub fn new(input: GoalInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            goal_type: input.goal_type,
            target_date: input.target_date,
            progress_percent: input.progress_percent,
            created_date: Utc::now(),
            status: input.status,
        }
    }

    /// Build the replacement for an existing goal, keyed on `id`.
    ///
    /// `created_date` is a placeholder here; the store keeps the original.
    pub fn with_id(id: Uuid, input: GoalInput) -> Self {
        Self {
            id,
            ..Self::new(input)
        }
    }

    /// An active goal is overdue once `today` is past its target date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == GoalStatus::Active && self.target_date < today
    }
}

/// The time horizon of a goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GoalType {
    ShortTerm,
    LongTerm,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortTerm => "ShortTerm",
            Self::LongTerm => "LongTerm",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ShortTerm" => Some(Self::ShortTerm),
            "LongTerm" => Some(Self::LongTerm),
            _ => None,
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a goal is still being worked on.
///
/// - `Active`: In progress (the default)
/// - `Completed`: Done; forced whenever progress reaches 100
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(Self::Active),
            "Completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated field values for creating or editing a goal.
///
/// Produced by [`GoalForm::validate`](crate::models::GoalForm::validate), so
/// every constraint on [`Goal`] already holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalInput {
    pub title: String,
    pub description: Option<String>,
    pub goal_type: GoalType,
    pub target_date: NaiveDate,
    pub progress_percent: u8,
    pub status: GoalStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> GoalInput {
        GoalInput {
            title: "Learn Rust".to_string(),
            description: None,
            goal_type: GoalType::ShortTerm,
            target_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            progress_percent: 0,
            status: GoalStatus::Active,
        }
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let goal = Goal::new(input());
        let json = serde_json::to_value(&goal).unwrap();

        assert_eq!(json["type"], "ShortTerm");
        assert_eq!(json["targetDate"], "2024-01-01");
        assert_eq!(json["progressPercent"], 0);
        assert_eq!(json["status"], "Active");
        assert!(json["description"].is_null());
        assert!(json["createdDate"].is_string());
    }

    #[test]
    fn enum_tokens_are_case_sensitive() {
        assert_eq!(GoalType::from_str("LongTerm"), Some(GoalType::LongTerm));
        assert_eq!(GoalType::from_str("longterm"), None);
        assert_eq!(GoalStatus::from_str("Completed"), Some(GoalStatus::Completed));
        assert_eq!(GoalStatus::from_str("completed"), None);
    }

    #[test]
    fn overdue_only_when_active_and_past_target() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let mut goal = Goal::new(input());
        assert!(goal.is_overdue(today));

        goal.status = GoalStatus::Completed;
        assert!(!goal.is_overdue(today));

        goal.status = GoalStatus::Active;
        goal.target_date = today;
        assert!(!goal.is_overdue(today));
    }

    #[test]
    fn with_id_keeps_the_given_id() {
        let id = Uuid::new_v4();
        assert_eq!(Goal::with_id(id, input()).id, id);
    }
}
