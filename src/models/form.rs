use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{GoalInput, GoalStatus, GoalType};

pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// A goal as submitted from the create or edit form.
///
/// Every field is kept as raw text so that a bad value can be reported next
/// to its field instead of rejecting the whole request. Unknown form fields
/// (such as the `_csrf` token) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalForm {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub goal_type: Option<String>,
    pub target_date: Option<String>,
    pub progress_percent: Option<String>,
    pub status: Option<String>,
}

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`, empty if the field is valid.
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Treat missing and blank values the same way.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl GoalForm {
    /// Check every field against the goal constraints.
    ///
    /// All fields are checked, so the error set lists every problem at once.
    pub fn validate(&self) -> Result<GoalInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        // Blank and length checks ignore surrounding whitespace; the title
        // is kept as submitted.
        let title = match (non_blank(&self.title), self.title.as_deref()) {
            (None, _) | (_, None) => {
                errors.add("title", "Title is required.");
                None
            }
            (Some(t), _) if t.chars().count() > TITLE_MAX_LEN => {
                errors.add(
                    "title",
                    format!("Title must be at most {} characters.", TITLE_MAX_LEN),
                );
                None
            }
            (Some(_), Some(raw)) => Some(raw.to_string()),
        };

        let description = match self.description.as_deref().filter(|d| !d.is_empty()) {
            Some(d) if d.chars().count() > DESCRIPTION_MAX_LEN => {
                errors.add(
                    "description",
                    format!(
                        "Description must be at most {} characters.",
                        DESCRIPTION_MAX_LEN
                    ),
                );
                None
            }
            other => other.map(str::to_string),
        };

        let goal_type = match non_blank(&self.goal_type) {
            None => {
                errors.add("type", "Type is required.");
                None
            }
            Some(t) => {
                let parsed = GoalType::from_str(t);
                if parsed.is_none() {
                    errors.add("type", "Type must be ShortTerm or LongTerm.");
                }
                parsed
            }
        };

        let target_date = match non_blank(&self.target_date) {
            None => {
                errors.add("targetDate", "Target date is required.");
                None
            }
            Some(d) => match NaiveDate::parse_from_str(d, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add("targetDate", "Target date must be a date (YYYY-MM-DD).");
                    None
                }
            },
        };

        let progress_percent = match non_blank(&self.progress_percent) {
            None => Some(0),
            Some(p) => match p.parse::<i64>() {
                Ok(n) if (0..=100).contains(&n) => Some(n as u8),
                Ok(_) => {
                    errors.add("progressPercent", "Progress must be between 0 and 100.");
                    None
                }
                Err(_) => {
                    errors.add("progressPercent", "Progress must be a whole number.");
                    None
                }
            },
        };

        let status = match non_blank(&self.status) {
            None => Some(GoalStatus::default()),
            Some(s) => {
                let parsed = GoalStatus::from_str(s);
                if parsed.is_none() {
                    errors.add("status", "Status must be Active or Completed.");
                }
                parsed
            }
        };

        match (title, goal_type, target_date, progress_percent, status) {
            (Some(title), Some(goal_type), Some(target_date), Some(progress_percent), Some(status))
                if errors.is_empty() =>
            {
                Ok(GoalInput {
                    title,
                    description,
                    goal_type,
                    target_date,
                    progress_percent,
                    status,
                })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> GoalForm {
        GoalForm {
            title: Some("Learn Rust".to_string()),
            description: Some("Finish the book".to_string()),
            goal_type: Some("ShortTerm".to_string()),
            target_date: Some("2024-01-01".to_string()),
            progress_percent: Some("25".to_string()),
            status: Some("Active".to_string()),
        }
    }

    #[test]
    fn accepts_a_complete_form() {
        let input = valid_form().validate().unwrap();

        assert_eq!(input.title, "Learn Rust");
        assert_eq!(input.description.as_deref(), Some("Finish the book"));
        assert_eq!(input.goal_type, GoalType::ShortTerm);
        assert_eq!(input.target_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(input.progress_percent, 25);
        assert_eq!(input.status, GoalStatus::Active);
    }

    #[test]
    fn defaults_progress_and_status() {
        let form = GoalForm {
            progress_percent: None,
            status: Some(String::new()),
            description: Some(String::new()),
            ..valid_form()
        };
        let input = form.validate().unwrap();

        assert_eq!(input.progress_percent, 0);
        assert_eq!(input.status, GoalStatus::Active);
        assert_eq!(input.description, None);
    }

    #[test]
    fn keeps_the_title_as_submitted() {
        let form = GoalForm {
            title: Some("  Learn Rust ".to_string()),
            ..valid_form()
        };
        assert_eq!(form.validate().unwrap().title, "  Learn Rust ");
    }

    #[test]
    fn rejects_blank_title() {
        let form = GoalForm {
            title: Some("   ".to_string()),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();

        assert_eq!(errors.field("title"), ["Title is required."]);
        assert_eq!(errors.fields().count(), 1);
    }

    #[test]
    fn enforces_length_limits() {
        let form = GoalForm {
            title: Some("x".repeat(101)),
            description: Some("y".repeat(501)),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();

        assert_eq!(errors.field("title").len(), 1);
        assert_eq!(errors.field("description").len(), 1);

        let at_limit = GoalForm {
            title: Some("x".repeat(100)),
            description: Some("y".repeat(500)),
            ..valid_form()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn reports_every_bad_field() {
        let form = GoalForm {
            title: None,
            description: None,
            goal_type: Some("Someday".to_string()),
            target_date: Some("next week".to_string()),
            progress_percent: Some("101".to_string()),
            status: Some("Paused".to_string()),
        };
        let errors = form.validate().unwrap_err();

        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(
            fields,
            ["progressPercent", "status", "targetDate", "title", "type"]
        );
    }

    #[test]
    fn rejects_non_numeric_progress() {
        let form = GoalForm {
            progress_percent: Some("half".to_string()),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field("progressPercent"), ["Progress must be a whole number."]);
    }

    #[test]
    fn requires_type_and_target_date() {
        let form = GoalForm {
            goal_type: None,
            target_date: None,
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();

        assert_eq!(errors.field("type"), ["Type is required."]);
        assert_eq!(errors.field("targetDate"), ["Target date is required."]);
    }
}
