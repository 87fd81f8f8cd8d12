//! Plain-text rendering of goal lists for the terminal.

use crate::api::GoalList;
use crate::models::{Goal, GoalStatus, GoalType};

const ACTIVE: char = '○';
const COMPLETED: char = '●';
const OVERDUE: char = '!';

/// Get the status symbol for a goal status.
fn status_symbol(status: GoalStatus) -> char {
    match status {
        GoalStatus::Active => ACTIVE,
        GoalStatus::Completed => COMPLETED,
    }
}

/// Render the list grouped by type, one goal per line.
///
/// Example output:
/// ```text
/// Short term
/// ├── ● Run a 10k (100%, due 2024-03-01)
/// └── ○ Learn Rust (40%, due 2024-01-01) ! Target date passed!
/// Long term
/// └── ○ Write a book (5%, due 2027-12-31)
/// ```
pub fn render_goal_list(list: &GoalList) -> String {
    let mut output = String::new();
    for (heading, goal_type) in [
        ("Short term", GoalType::ShortTerm),
        ("Long term", GoalType::LongTerm),
    ] {
        let group: Vec<&Goal> = list
            .goals
            .iter()
            .filter(|g| g.goal_type == goal_type)
            .collect();
        if group.is_empty() {
            continue;
        }

        output.push_str(heading);
        output.push('\n');
        for (i, goal) in group.iter().enumerate() {
            let branch = if i == group.len() - 1 { "└── " } else { "├── " };
            output.push_str(branch);
            output.push(status_symbol(goal.status));
            output.push(' ');
            output.push_str(&format!(
                "{} ({}%, due {})",
                goal.title, goal.progress_percent, goal.target_date
            ));
            if let Some(alert) = list.alerts.get(&goal.id) {
                output.push(' ');
                output.push(OVERDUE);
                output.push(' ');
                output.push_str(alert);
            }
            output.push('\n');
        }
    }

    if output.is_empty() {
        output.push_str("No goals.\n");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{build_goal_list, GoalFilter};
    use crate::models::GoalInput;
    use chrono::NaiveDate;

    fn make_goal(title: &str, goal_type: GoalType, progress: u8, target: (i32, u32, u32)) -> Goal {
        Goal::new(GoalInput {
            title: title.to_string(),
            description: None,
            goal_type,
            target_date: NaiveDate::from_ymd_opt(target.0, target.1, target.2).unwrap(),
            progress_percent: progress,
            status: if progress == 100 {
                GoalStatus::Completed
            } else {
                GoalStatus::Active
            },
        })
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_empty_list() {
        let list = build_goal_list(vec![], GoalFilter::default(), today());
        assert_eq!(render_goal_list(&list), "No goals.\n");
    }

    #[test]
    fn test_groups_by_type_with_alerts() {
        let goals = vec![
            make_goal("Run a 10k", GoalType::ShortTerm, 100, (2024, 3, 1)),
            make_goal("Write a book", GoalType::LongTerm, 5, (2027, 12, 31)),
            make_goal("Learn Rust", GoalType::ShortTerm, 40, (2024, 1, 1)),
        ];
        let list = build_goal_list(goals, GoalFilter::default(), today());

        let expected = "Short term\n├── ● Run a 10k (100%, due 2024-03-01)\n└── ○ Learn Rust (40%, due 2024-01-01) ! Target date passed!\nLong term\n└── ○ Write a book (5%, due 2027-12-31)\n";
        assert_eq!(render_goal_list(&list), expected);
    }

    #[test]
    fn test_skips_empty_groups() {
        let goals = vec![make_goal("Write a book", GoalType::LongTerm, 5, (2027, 12, 31))];
        let list = build_goal_list(goals, GoalFilter::default(), today());
        assert_eq!(
            render_goal_list(&list),
            "Long term\n└── ○ Write a book (5%, due 2027-12-31)\n"
        );
    }
}
