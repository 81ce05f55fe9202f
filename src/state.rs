use chrono::NaiveDate;

use crate::filter::{self, FilterState};
use crate::models::{Category, Task};
use crate::view::{self, CalendarCursor, Rendered, ViewMode};

/// Calendar navigation controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarNav {
    Prev,
    Next,
    Today,
}

/// Everything that decides which tasks are shown and how.
///
/// Only changed through the transition methods below; rendering reads it and
/// the data snapshot and never mutates either.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub view: ViewMode,
    pub active_category: Option<String>,
    pub cursor: CalendarCursor,
    pub search: String,
    pub filter: FilterState,
}

impl ViewState {
    pub fn new(view: ViewMode, today: NaiveDate) -> Self {
        ViewState {
            view,
            active_category: None,
            cursor: CalendarCursor::containing(today),
            search: String::new(),
            filter: FilterState::default(),
        }
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    /// Selecting the already-active category clears it; any other selects it.
    pub fn toggle_category(&mut self, id: &str) {
        if self.active_category.as_deref() == Some(id) {
            self.active_category = None;
        } else {
            self.active_category = Some(id.to_string());
        }
    }

    pub fn navigate(&mut self, nav: CalendarNav, today: NaiveDate) {
        self.cursor = match nav {
            CalendarNav::Prev => self.cursor.prev(),
            CalendarNav::Next => self.cursor.next(),
            CalendarNav::Today => CalendarCursor::containing(today),
        };
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
    }

    pub fn apply_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    pub fn clear_filter(&mut self) {
        self.filter = FilterState::default();
    }

    /// The filtered task list for list and cards views.
    pub fn visible<'a>(&self, tasks: &'a [Task], today: NaiveDate) -> Vec<&'a Task> {
        filter::visible(tasks, &self.search, self.active_category.as_deref(), &self.filter, today)
    }

    pub fn render(&self, tasks: &[Task], categories: &[Category], today: NaiveDate) -> Rendered {
        let filtered = self.visible(tasks, today);
        view::render(self.view, &filtered, tasks, categories, self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn category_toggle_sets_then_clears() {
        let mut s = ViewState::new(ViewMode::List, today());
        s.toggle_category("a");
        assert_eq!(s.active_category.as_deref(), Some("a"));
        s.toggle_category("b");
        assert_eq!(s.active_category.as_deref(), Some("b"));
        s.toggle_category("b");
        assert_eq!(s.active_category, None);
    }

    #[test]
    fn calendar_navigation() {
        let mut s = ViewState::new(ViewMode::Calendar, today());
        s.navigate(CalendarNav::Prev, today());
        s.navigate(CalendarNav::Prev, today());
        s.navigate(CalendarNav::Prev, today());
        assert_eq!(s.cursor, CalendarCursor { year: 2023, month: 12 });
        s.navigate(CalendarNav::Next, today());
        assert_eq!(s.cursor, CalendarCursor { year: 2024, month: 1 });
        s.navigate(CalendarNav::Today, today());
        assert_eq!(s.cursor, CalendarCursor { year: 2024, month: 3 });
    }

    #[test]
    fn render_follows_view_mode() {
        let mut s = ViewState::new(ViewMode::Cards, today());
        assert!(matches!(s.render(&[], &[], today()), Rendered::Cards(_)));
        s.set_view(ViewMode::Calendar);
        match s.render(&[], &[], today()) {
            Rendered::Calendar(grid) => assert_eq!(grid.title, "March 2024"),
            other => panic!("expected calendar, got {:?}", other),
        }
    }
}
