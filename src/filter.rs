use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Priority, Task};

/// User-configured predicates narrowing the displayed tasks.
///
/// Every set field is an additional AND; an unset field imposes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Inclusive lower bound on the task date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the task date.
    pub to: Option<NaiveDate>,
    pub priority: Option<Priority>,
    /// Case-insensitive substring of the project.
    pub project: Option<String>,
    /// Case-insensitive substring of the owner.
    pub owner: Option<String>,
    /// Only tasks without a date.
    pub nodate: bool,
    /// Only tasks dated strictly before today.
    pub overdue: bool,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        *self == FilterState::default()
    }

    /// Number of active predicates, for the filter button label.
    pub fn active_count(&self) -> usize {
        [
            self.from.is_some(),
            self.to.is_some(),
            self.priority.is_some(),
            self.project.is_some(),
            self.owner.is_some(),
            self.nodate,
            self.overdue,
        ]
        .iter()
        .filter(|on| **on)
        .count()
    }
}

/// Today's date on the host clock, used by the overdue predicate.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Returns the tasks that pass the search text, the active category and every
/// predicate in `filter`, in their original order.
///
/// Pure: `today` is passed in rather than read from the clock.
pub fn visible<'a>(
    tasks: &'a [Task],
    search: &str,
    active_category: Option<&str>,
    filter: &FilterState,
    today: NaiveDate,
) -> Vec<&'a Task> {
    let query = search.trim().to_lowercase();
    tasks
        .iter()
        .filter(|t| matches_search(t, &query))
        .filter(|t| active_category.map_or(true, |cat| t.category_id.as_deref() == Some(cat)))
        .filter(|t| matches_filter(t, filter, today))
        .collect()
}

fn matches_search(task: &Task, query: &str) -> bool {
    query.is_empty()
        || task.title.to_lowercase().contains(query)
        || task.description.to_lowercase().contains(query)
}

/// Applies the [`FilterState`] predicates to a single task.
pub fn matches_filter(task: &Task, filter: &FilterState, today: NaiveDate) -> bool {
    // An undated task fails any date bound that is set.
    if let Some(from) = filter.from {
        if !task.date.is_some_and(|d| d >= from) {
            return false;
        }
    }
    if let Some(to) = filter.to {
        if !task.date.is_some_and(|d| d <= to) {
            return false;
        }
    }
    if let Some(p) = filter.priority {
        if task.priority != p {
            return false;
        }
    }
    if let Some(project) = &filter.project {
        if !contains_ci(&task.project, project) {
            return false;
        }
    }
    if let Some(owner) = &filter.owner {
        if !contains_ci(&task.owner, owner) {
            return false;
        }
    }
    if filter.nodate && task.date.is_some() {
        return false;
    }
    if filter.overdue && !task.date.is_some_and(|d| d < today) {
        return false;
    }
    true
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
