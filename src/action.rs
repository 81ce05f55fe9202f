use chrono::NaiveDate;

use crate::state::CalendarNav;
use crate::view::ViewMode;

/// Everything a user can ask for, independent of where they clicked or which key they pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NewTask,
    EditTask(String),
    DeleteTask(String),
    CalendarNav(CalendarNav),
    /// Day cell: new task pre-filled with that date.
    OpenDay(NaiveDate),
    /// Event chip: edit that task.
    OpenEvent(String),
    NewCategory,
    EditCategory(String),
    /// Toggles the active category.
    SelectCategory(String),
    OpenFilter,
    SetView(ViewMode),
    Search(String),
}

/// A clickable element in a rendered container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region {
    DeleteButton(String),
    EditButton(String),
    CalendarPrev,
    CalendarNext,
    CalendarToday,
    DayCell(NaiveDate),
    EventChip(String),
    /// A row or card body; not an action by itself.
    TaskItem(String),
    CategoryItem(String),
    /// The edit icon inside a category item.
    CategoryEdit,
}

/// Resolves a click in the tasks container.
///
/// `path` starts at the clicked element and lists its enclosing elements
/// outward. Precedence: delete, edit, prev, next, today (on the clicked
/// element itself), then the nearest day cell, then the nearest event chip.
pub fn route_tasks(path: &[Region]) -> Option<Action> {
    let origin = path.first()?;
    let direct = match origin {
        Region::DeleteButton(id) => Some(Action::DeleteTask(id.clone())),
        Region::EditButton(id) => Some(Action::EditTask(id.clone())),
        Region::CalendarPrev => Some(Action::CalendarNav(CalendarNav::Prev)),
        Region::CalendarNext => Some(Action::CalendarNav(CalendarNav::Next)),
        Region::CalendarToday => Some(Action::CalendarNav(CalendarNav::Today)),
        _ => None,
    };
    if direct.is_some() {
        return direct;
    }
    if let Some(date) = path.iter().find_map(|r| match r {
        Region::DayCell(d) => Some(*d),
        _ => None,
    }) {
        return Some(Action::OpenDay(date));
    }
    path.iter().find_map(|r| match r {
        Region::EventChip(id) => Some(Action::OpenEvent(id.clone())),
        _ => None,
    })
}

/// Resolves a click in the categories list: the edit icon edits, anywhere
/// else on the item toggles the active category.
pub fn route_categories(path: &[Region]) -> Option<Action> {
    let id = path.iter().find_map(|r| match r {
        Region::CategoryItem(id) => Some(id.clone()),
        _ => None,
    })?;
    match path.first() {
        Some(Region::CategoryEdit) => Some(Action::EditCategory(id)),
        _ => Some(Action::SelectCategory(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn buttons_win_over_enclosing_items() {
        let path = [Region::DeleteButton("7".into()), Region::TaskItem("7".into())];
        assert_eq!(route_tasks(&path), Some(Action::DeleteTask("7".into())));
        let path = [Region::EditButton("7".into()), Region::TaskItem("7".into())];
        assert_eq!(route_tasks(&path), Some(Action::EditTask("7".into())));
    }

    #[test]
    fn calendar_controls() {
        assert_eq!(route_tasks(&[Region::CalendarPrev]), Some(Action::CalendarNav(CalendarNav::Prev)));
        assert_eq!(route_tasks(&[Region::CalendarNext]), Some(Action::CalendarNav(CalendarNav::Next)));
        assert_eq!(route_tasks(&[Region::CalendarToday]), Some(Action::CalendarNav(CalendarNav::Today)));
    }

    #[test]
    fn day_cell_precedes_event_chip() {
        assert_eq!(route_tasks(&[Region::DayCell(day())]), Some(Action::OpenDay(day())));
        assert_eq!(route_tasks(&[Region::EventChip("3".into())]), Some(Action::OpenEvent("3".into())));
        let nested = [Region::EventChip("3".into()), Region::DayCell(day())];
        assert_eq!(route_tasks(&nested), Some(Action::OpenDay(day())));
    }

    #[test]
    fn plain_items_do_nothing() {
        assert_eq!(route_tasks(&[Region::TaskItem("1".into())]), None);
        assert_eq!(route_tasks(&[]), None);
    }

    #[test]
    fn category_clicks() {
        let edit = [Region::CategoryEdit, Region::CategoryItem("c".into())];
        assert_eq!(route_categories(&edit), Some(Action::EditCategory("c".into())));
        let body = [Region::CategoryItem("c".into())];
        assert_eq!(route_categories(&body), Some(Action::SelectCategory("c".into())));
        assert_eq!(route_categories(&[Region::CategoryEdit]), None);
    }
}
