//! View-models for the three task presentations.
//!
//! Everything here is pure: it takes the filtered task list, the full
//! snapshot and the category list and produces plain data that the CLI
//! and TUI adapters draw. No terminal types leak in.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Category, Priority, Task};

/// Swatch color for cards whose task has no category.
pub const NEUTRAL_COLOR: &str = "#cccccc";

pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// The three mutually exclusive presentations of the filtered tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Cards,
    Calendar,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::List, ViewMode::Cards, ViewMode::Calendar];

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::List => "List",
            ViewMode::Cards => "Cards",
            ViewMode::Calendar => "Calendar",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "list" => Ok(ViewMode::List),
            "cards" => Ok(ViewMode::Cards),
            "calendar" => Ok(ViewMode::Calendar),
            other => Err(format!("unknown view '{}'", other)),
        }
    }
}

/// Style class for a priority badge.
pub fn priority_class(p: Priority) -> &'static str {
    match p {
        Priority::High => "priority-high",
        Priority::Medium => "priority-medium",
        Priority::Low => "priority-low",
    }
}

/// Event chip color used when the task has no category.
pub fn priority_color(p: Priority) -> &'static str {
    match p {
        Priority::High => "#ff6b6b",
        Priority::Medium => "#ffb86b",
        Priority::Low => "#6bcf6b",
    }
}

/// Parses `#rrggbb` or `#rgb` into its components.
pub fn hex_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().trim_start_matches('#');
    match hex.len() {
        6 => {
            let v = u32::from_str_radix(hex, 16).ok()?;
            Some(((v >> 16) as u8, (v >> 8) as u8, v as u8))
        }
        3 => {
            let mut parts = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some((parts.next()??, parts.next()??, parts.next()??))
        }
        _ => None,
    }
}

fn lookup<'a>(categories: &'a [Category], id: Option<&str>) -> Option<&'a Category> {
    let id = id?;
    categories.iter().find(|c| c.id == id)
}

fn date_text(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// Colored category label in the list view.
#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub task_id: String,
    pub title: String,
    pub project: String,
    pub priority: Priority,
    pub priority_class: &'static str,
    pub date: String,
    pub owner: String,
    /// `None` when the task has no category or it no longer exists.
    pub category: Option<Badge>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub task_id: String,
    pub title: String,
    pub swatch: String,
    pub description: String,
    pub priority: Priority,
    /// "project • priority • date"
    pub meta: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventChip {
    pub task_id: String,
    pub title: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub day: u32,
    pub events: Vec<EventChip>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    /// e.g. "March 2024"
    pub title: String,
    pub leading_blanks: usize,
    pub days: Vec<DayCell>,
}

impl MonthGrid {
    /// Grid cells in display order, `None` for the leading blanks.
    pub fn cells(&self) -> impl Iterator<Item = Option<&DayCell>> {
        std::iter::repeat(None)
            .take(self.leading_blanks)
            .chain(self.days.iter().map(Some))
    }

    /// Cells chunked into Monday-first weeks; the last week is padded with `None`.
    pub fn weeks(&self) -> Vec<[Option<&DayCell>; 7]> {
        let cells: Vec<Option<&DayCell>> = self.cells().collect();
        cells
            .chunks(7)
            .map(|chunk| {
                let mut week = [None; 7];
                week[..chunk.len()].copy_from_slice(chunk);
                week
            })
            .collect()
    }
}

/// What the tasks pane shows for the current view mode.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    List(Vec<ListRow>),
    Cards(Vec<Card>),
    Calendar(MonthGrid),
}

/// The month the calendar is showing. `month` is one-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCursor {
    pub year: i32,
    pub month: u32,
}

impl CalendarCursor {
    /// Returns `None` unless `month` is 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| CalendarCursor { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        CalendarCursor { year: date.year(), month: date.month() }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            CalendarCursor { year: self.year - 1, month: 12 }
        } else {
            CalendarCursor { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            CalendarCursor { year: self.year + 1, month: 1 }
        } else {
            CalendarCursor { year: self.year, month: self.month + 1 }
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.next().first_day();
        (next - Duration::days(1)).day()
    }

    /// Full English month name followed by the year.
    pub fn title(&self) -> String {
        format!("{} {}", self.first_day().format("%B"), self.year)
    }

    /// Blank cells before day 1 in a Monday-first week.
    pub fn leading_blanks(&self) -> usize {
        self.first_day().weekday().num_days_from_monday() as usize
    }
}

pub fn list_rows(tasks: &[&Task], categories: &[Category]) -> Vec<ListRow> {
    tasks
        .iter()
        .map(|t| ListRow {
            task_id: t.id.clone(),
            title: t.title.clone(),
            project: t.project.clone(),
            priority: t.priority,
            priority_class: priority_class(t.priority),
            date: date_text(t.date),
            owner: t.owner.clone(),
            category: lookup(categories, t.category_id.as_deref())
                .map(|c| Badge { name: c.name.clone(), color: c.color.clone() }),
        })
        .collect()
}

pub fn cards(tasks: &[&Task], categories: &[Category]) -> Vec<Card> {
    tasks
        .iter()
        .map(|t| {
            let swatch = lookup(categories, t.category_id.as_deref())
                .map(|c| c.color.clone())
                .unwrap_or_else(|| NEUTRAL_COLOR.to_string());
            Card {
                task_id: t.id.clone(),
                title: t.title.clone(),
                swatch,
                description: t.description.clone(),
                priority: t.priority,
                meta: format!("{} • {} • {}", t.project, t.priority, date_text(t.date)),
            }
        })
        .collect()
}

/// Builds the month grid. Events are placed from `all_tasks`, the unfiltered
/// snapshot; search and filters do not apply to the calendar.
pub fn month_grid(cursor: CalendarCursor, all_tasks: &[Task], categories: &[Category]) -> MonthGrid {
    let first = cursor.first_day();
    let days = (0..cursor.days_in_month())
        .map(|offset| {
            let date = first + Duration::days(offset as i64);
            let events = all_tasks
                .iter()
                .filter(|t| t.date == Some(date))
                .map(|t| EventChip {
                    task_id: t.id.clone(),
                    title: t.title.clone(),
                    color: lookup(categories, t.category_id.as_deref())
                        .map(|c| c.color.clone())
                        .unwrap_or_else(|| priority_color(t.priority).to_string()),
                })
                .collect();
            DayCell { date, day: date.day(), events }
        })
        .collect();
    MonthGrid { title: cursor.title(), leading_blanks: cursor.leading_blanks(), days }
}

/// Selects the render strategy for `mode`.
pub fn render(
    mode: ViewMode,
    filtered: &[&Task],
    all_tasks: &[Task],
    categories: &[Category],
    cursor: CalendarCursor,
) -> Rendered {
    match mode {
        ViewMode::List => Rendered::List(list_rows(filtered, categories)),
        ViewMode::Cards => Rendered::Cards(cards(filtered, categories)),
        ViewMode::Calendar => Rendered::Calendar(month_grid(cursor, all_tasks, categories)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, date: Option<&str>, priority: Priority, cat: Option<&str>) -> Task {
        Task {
            id: id.into(),
            title: format!("task {}", id),
            description: String::new(),
            project: "Web".into(),
            priority,
            owner: String::new(),
            category_id: cat.map(String::from),
            date: date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
        }
    }

    fn work() -> Category {
        Category { id: "c1".into(), name: "Work".into(), color: "#112233".into() }
    }

    #[test]
    fn wednesday_start_has_two_blanks() {
        // 1 May 2024 is a Wednesday.
        let cursor = CalendarCursor::new(2024, 5).unwrap();
        assert_eq!(cursor.leading_blanks(), 2);
        let grid = month_grid(cursor, &[], &[]);
        assert_eq!(grid.leading_blanks, 2);
        assert_eq!(grid.days.len(), 31);
        assert_eq!(grid.title, "May 2024");
    }

    #[test]
    fn sunday_start_has_six_blanks() {
        // 1 September 2024 is a Sunday.
        let cursor = CalendarCursor::new(2024, 9).unwrap();
        assert_eq!(cursor.leading_blanks(), 6);
        // 1 January 2024 is a Monday.
        assert_eq!(CalendarCursor::new(2024, 1).unwrap().leading_blanks(), 0);
    }

    #[test]
    fn cursor_wraps_years() {
        let jan = CalendarCursor::new(2024, 1).unwrap();
        assert_eq!(jan.prev(), CalendarCursor { year: 2023, month: 12 });
        assert_eq!(jan.prev().next(), jan);
        assert_eq!(CalendarCursor::new(2024, 2).unwrap().days_in_month(), 29);
        assert!(CalendarCursor::new(2024, 13).is_none());
    }

    #[test]
    fn chips_use_category_color_then_priority_fallback() {
        let tasks = vec![
            task("a", Some("2024-03-05"), Priority::High, Some("c1")),
            task("b", Some("2024-03-05"), Priority::High, None),
            task("c", Some("2024-03-05"), Priority::Medium, Some("gone")),
            task("d", None, Priority::Low, None),
        ];
        let grid = month_grid(CalendarCursor::new(2024, 3).unwrap(), &tasks, &[work()]);
        let fifth = &grid.days[4];
        assert_eq!(fifth.day, 5);
        let colors: Vec<&str> = fifth.events.iter().map(|e| e.color.as_str()).collect();
        assert_eq!(colors, vec!["#112233", "#ff6b6b", "#ffb86b"]);
        let total: usize = grid.days.iter().map(|d| d.events.len()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn weeks_are_padded_to_seven() {
        let grid = month_grid(CalendarCursor::new(2024, 5).unwrap(), &[], &[]);
        let weeks = grid.weeks();
        assert_eq!(weeks.len(), 5);
        assert!(weeks[0][0].is_none() && weeks[0][1].is_none());
        assert_eq!(weeks[0][2].map(|d| d.day), Some(1));
        assert_eq!(weeks[4][4].map(|d| d.day), Some(31));
        assert!(weeks[4][5].is_none());
    }

    #[test]
    fn list_row_blank_category_when_missing() {
        let t = task("a", None, Priority::Low, Some("gone"));
        let rows = list_rows(&[&t], &[work()]);
        assert_eq!(rows[0].category, None);
        assert_eq!(rows[0].priority_class, "priority-low");
        assert_eq!(rows[0].date, "");

        let t = task("b", Some("2024-03-05"), Priority::High, Some("c1"));
        let rows = list_rows(&[&t], &[work()]);
        assert_eq!(rows[0].category, Some(Badge { name: "Work".into(), color: "#112233".into() }));
    }

    #[test]
    fn card_meta_and_neutral_swatch() {
        let t = task("a", Some("2024-03-05"), Priority::Medium, None);
        let c = cards(&[&t], &[]);
        assert_eq!(c[0].swatch, NEUTRAL_COLOR);
        assert_eq!(c[0].meta, "Web • Medium • 2024-03-05");
    }

    #[test]
    fn hex_colors() {
        assert_eq!(hex_rgb("#ff7f2a"), Some((255, 127, 42)));
        assert_eq!(hex_rgb("#ccc"), Some((204, 204, 204)));
        assert_eq!(hex_rgb("red"), None);
    }
}
