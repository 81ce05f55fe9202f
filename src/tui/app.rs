use chrono::{Datelike, Duration, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::action::{self, Action, Region};
use crate::api::Backend;
use crate::controller::Controller;
use crate::modal::{FieldInput, FieldKind, Modal};
use crate::state::CalendarNav;
use crate::view::{Rendered, ViewMode};

/// Which pane receives navigation keys when no dialog is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Categories,
    Tasks,
    Search,
}

/// Where a click landed, as recorded while drawing.
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    /// Path inside the tasks container, innermost first.
    Tasks(Vec<Region>),
    /// Path inside the categories container, innermost first.
    Categories(Vec<Region>),
    /// A toolbar button with a fixed action.
    Button(Action),
}

/// Clickable areas of the last frame. Later entries sit on top of earlier ones.
#[derive(Debug, Default)]
pub struct HitMap {
    entries: Vec<(Rect, HitTarget)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn push(&mut self, area: Rect, target: HitTarget) {
        if area.width > 0 && area.height > 0 {
            self.entries.push((area, target));
        }
    }

    pub fn at(&self, x: u16, y: u16) -> Option<&HitTarget> {
        self.entries
            .iter()
            .rev()
            .find(|(r, _)| x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height)
            .map(|(_, t)| t)
    }
}

pub struct App<B> {
    pub ctl: Controller<B>,
    pub focus: Focus,
    /// Highlighted row in the categories pane.
    pub category_index: usize,
    /// Highlighted row (list) or card (cards).
    pub task_index: usize,
    /// Highlighted day in the calendar, kept inside the shown month.
    pub selected_day: u32,
    /// Which event chip of the highlighted day `e` opens.
    pub event_index: usize,
    pub hits: HitMap,
    pub should_quit: bool,
}

impl<B: Backend> App<B> {
    pub fn new(ctl: Controller<B>) -> Self {
        let selected_day = ctl.today().day();
        App {
            ctl,
            focus: Focus::Tasks,
            category_index: 0,
            task_index: 0,
            selected_day,
            event_index: 0,
            hits: HitMap::default(),
            should_quit: false,
        }
    }

    /// Task ids in display order for list and cards views.
    fn shown_task_ids(&self) -> Vec<String> {
        self.ctl.visible().iter().map(|t| t.id.clone()).collect()
    }

    fn selected_task_id(&self) -> Option<String> {
        self.shown_task_ids().get(self.task_index).cloned()
    }

    fn selected_category_id(&self) -> Option<String> {
        self.ctl.store.categories().get(self.category_index).map(|c| c.id.clone())
    }

    pub fn selected_date(&self) -> NaiveDate {
        let cursor = self.ctl.state.cursor;
        let day = self.selected_day.clamp(1, cursor.days_in_month());
        cursor.first_day() + Duration::days(day as i64 - 1)
    }

    fn selected_event_id(&self) -> Option<String> {
        let date = self.selected_date();
        let events: Vec<String> = self
            .ctl
            .store
            .tasks()
            .iter()
            .filter(|t| t.date == Some(date))
            .map(|t| t.id.clone())
            .collect();
        if events.is_empty() {
            None
        } else {
            events.get(self.event_index % events.len()).cloned()
        }
    }

    /// Keeps highlighted indices inside the current data after any change.
    pub fn clamp_selection(&mut self) {
        let tasks = self.shown_task_ids().len();
        self.task_index = self.task_index.min(tasks.saturating_sub(1));
        let cats = self.ctl.store.categories().len();
        self.category_index = self.category_index.min(cats.saturating_sub(1));
        self.selected_day = self.selected_day.clamp(1, self.ctl.state.cursor.days_in_month());
    }

    async fn run(&mut self, action: Action) {
        let nav = matches!(action, Action::CalendarNav(CalendarNav::Today));
        self.ctl.dispatch(action).await;
        if nav {
            self.selected_day = self.ctl.today().day();
        }
        self.clamp_selection();
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if self.ctl.notice.is_some() {
            self.ctl.dismiss_notice();
            return;
        }
        if self.ctl.confirm.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.ctl.answer_confirm(true).await,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.ctl.answer_confirm(false).await,
                _ => {}
            }
            self.clamp_selection();
            return;
        }
        if self.ctl.is_modal_open() {
            self.handle_modal_key(key).await;
            self.clamp_selection();
            return;
        }
        if self.focus == Focus::Search {
            self.handle_search_key(key).await;
            return;
        }

        let action = match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Categories => Focus::Tasks,
                    _ => Focus::Categories,
                };
                None
            }
            KeyCode::Char('/') => {
                self.focus = Focus::Search;
                None
            }
            KeyCode::Char('1') => Some(Action::SetView(ViewMode::List)),
            KeyCode::Char('2') => Some(Action::SetView(ViewMode::Cards)),
            KeyCode::Char('3') => Some(Action::SetView(ViewMode::Calendar)),
            KeyCode::Char('a') => Some(Action::NewTask),
            KeyCode::Char('A') => Some(Action::NewCategory),
            KeyCode::Char('f') => Some(Action::OpenFilter),
            _ => match self.focus {
                Focus::Categories => self.category_key(key),
                _ if self.ctl.state.view == ViewMode::Calendar => self.calendar_key(key),
                _ => self.task_key(key),
            },
        };
        if let Some(action) = action {
            self.run(action).await;
        }
    }

    fn category_key(&mut self, key: KeyEvent) -> Option<Action> {
        let count = self.ctl.store.categories().len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') if count > 0 => {
                self.category_index = (self.category_index + 1) % count;
                None
            }
            KeyCode::Up | KeyCode::Char('k') if count > 0 => {
                self.category_index = (self.category_index + count - 1) % count;
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.selected_category_id().map(Action::SelectCategory),
            KeyCode::Char('e') => self.selected_category_id().map(Action::EditCategory),
            _ => None,
        }
    }

    fn task_key(&mut self, key: KeyEvent) -> Option<Action> {
        let count = self.shown_task_ids().len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') if count > 0 => {
                self.task_index = (self.task_index + 1) % count;
                None
            }
            KeyCode::Up | KeyCode::Char('k') if count > 0 => {
                self.task_index = (self.task_index + count - 1) % count;
                None
            }
            KeyCode::Enter | KeyCode::Char('e') => self.selected_task_id().map(Action::EditTask),
            KeyCode::Char('d') | KeyCode::Delete => self.selected_task_id().map(Action::DeleteTask),
            _ => None,
        }
    }

    fn calendar_key(&mut self, key: KeyEvent) -> Option<Action> {
        let delta: i64 = match key.code {
            KeyCode::Left | KeyCode::Char('h') => -1,
            KeyCode::Right | KeyCode::Char('l') => 1,
            KeyCode::Up | KeyCode::Char('k') => -7,
            KeyCode::Down | KeyCode::Char('j') => 7,
            _ => 0,
        };
        if delta != 0 {
            let days = self.ctl.state.cursor.days_in_month() as i64;
            self.selected_day = (self.selected_day as i64 + delta).clamp(1, days) as u32;
            self.event_index = 0;
            return None;
        }
        match key.code {
            KeyCode::Char('[') => Some(Action::CalendarNav(CalendarNav::Prev)),
            KeyCode::Char(']') => Some(Action::CalendarNav(CalendarNav::Next)),
            KeyCode::Char('t') => Some(Action::CalendarNav(CalendarNav::Today)),
            KeyCode::Char(' ') => {
                self.event_index += 1;
                None
            }
            KeyCode::Enter => Some(Action::OpenDay(self.selected_date())),
            KeyCode::Char('e') => self.selected_event_id().map(Action::OpenEvent),
            _ => None,
        }
    }

    async fn handle_search_key(&mut self, key: KeyEvent) {
        let mut text = self.ctl.state.search.clone();
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => {
                self.focus = Focus::Tasks;
                return;
            }
            KeyCode::Char(c) => text.push(c),
            KeyCode::Backspace => {
                text.pop();
            }
            _ => return,
        }
        self.run(Action::Search(text)).await;
    }

    async fn handle_modal_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let Some(open) = self.ctl.modal.as_mut() else { return };
        let focused_kind = open.fields().get(open.focus).map(|f| f.kind);
        match key.code {
            KeyCode::Esc => self.ctl.cancel(),
            KeyCode::Enter => self.ctl.save().await,
            KeyCode::Char('d') if ctrl => {
                if matches!(open.modal, Modal::Category(_)) {
                    self.ctl.request_category_delete();
                }
            }
            KeyCode::Char('l') if ctrl => self.ctl.clear_filter(),
            KeyCode::Tab | KeyCode::Down => open.focus_next(),
            KeyCode::BackTab | KeyCode::Up => open.focus_prev(),
            KeyCode::Left | KeyCode::Right => open.input(FieldInput::Cycle),
            KeyCode::Char(' ') if focused_kind != Some(FieldKind::Text) => open.input(FieldInput::Cycle),
            KeyCode::Char(c) if !ctrl => open.input(FieldInput::Char(c)),
            KeyCode::Backspace => open.input(FieldInput::Backspace),
            _ => {}
        }
    }

    pub async fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if self.ctl.notice.is_some() {
            self.ctl.dismiss_notice();
            return;
        }
        if self.ctl.confirm.is_some() || self.ctl.is_modal_open() {
            return;
        }
        let action = match self.hits.at(mouse.column, mouse.row).cloned() {
            Some(HitTarget::Tasks(path)) => {
                self.focus = Focus::Tasks;
                self.sync_selection(&path);
                action::route_tasks(&path)
            }
            Some(HitTarget::Categories(path)) => {
                self.focus = Focus::Categories;
                action::route_categories(&path)
            }
            Some(HitTarget::Button(action)) => Some(action),
            None => None,
        };
        if let Some(action) = action {
            self.run(action).await;
        }
    }

    /// Moves the keyboard highlight to whatever was clicked.
    fn sync_selection(&mut self, path: &[Region]) {
        for region in path {
            match region {
                Region::TaskItem(id) | Region::EditButton(id) | Region::DeleteButton(id) => {
                    if let Some(i) = self.shown_task_ids().iter().position(|t| t == id) {
                        self.task_index = i;
                    }
                }
                Region::DayCell(date) => self.selected_day = date.day(),
                _ => {}
            }
        }
    }

    /// The current tasks pane content.
    pub fn rendered(&self) -> Rendered {
        self.ctl.rendered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::models::{Category, CategoryDraft, Priority, Task, TaskDraft};
    use async_trait::async_trait;

    /// Serves one dated task and accepts no writes.
    struct OneTask;

    #[async_trait]
    impl Backend for OneTask {
        async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
            Ok(Vec::new())
        }
        async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
            Ok(vec![Task {
                id: "7".into(),
                title: "Ship".into(),
                description: String::new(),
                project: String::new(),
                priority: Priority::High,
                owner: String::new(),
                category_id: None,
                date: Some(day()),
            }])
        }
        async fn create_category(&self, _: &CategoryDraft) -> Result<(), ApiError> {
            Err(ApiError::Rejected("read only".into()))
        }
        async fn update_category(&self, _: &str, _: &CategoryDraft) -> Result<(), ApiError> {
            Err(ApiError::Rejected("read only".into()))
        }
        async fn delete_category(&self, _: &str) -> Result<(), ApiError> {
            Err(ApiError::Rejected("read only".into()))
        }
        async fn create_task(&self, _: &TaskDraft) -> Result<(), ApiError> {
            Err(ApiError::Rejected("read only".into()))
        }
        async fn update_task(&self, _: &str, _: &TaskDraft) -> Result<(), ApiError> {
            Err(ApiError::Rejected("read only".into()))
        }
        async fn delete_task(&self, _: &str) -> Result<(), ApiError> {
            Err(ApiError::Rejected("read only".into()))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    /// A day cell at (0,0) 10x4 with one chip on its second row.
    fn calendar_hits() -> HitMap {
        let mut hits = HitMap::default();
        hits.push(Rect::new(0, 0, 10, 4), HitTarget::Tasks(vec![Region::DayCell(day())]));
        hits.push(Rect::new(1, 1, 8, 1), HitTarget::Tasks(vec![Region::EventChip("7".into())]));
        hits
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn later_hits_sit_on_top() {
        let hits = calendar_hits();
        assert_eq!(hits.at(2, 1), Some(&HitTarget::Tasks(vec![Region::EventChip("7".into())])));
        assert_eq!(hits.at(2, 3), Some(&HitTarget::Tasks(vec![Region::DayCell(day())])));
        assert_eq!(hits.at(0, 1), Some(&HitTarget::Tasks(vec![Region::DayCell(day())])));
        assert_eq!(hits.at(10, 0), None);
    }

    #[test]
    fn empty_areas_are_not_recorded() {
        let mut hits = HitMap::default();
        hits.push(Rect::new(0, 0, 0, 5), HitTarget::Button(Action::NewTask));
        assert_eq!(hits.at(0, 0), None);
    }

    #[tokio::test]
    async fn clicks_on_chip_and_day_open_the_right_dialog() {
        let mut ctl = Controller::with_clock(OneTask, ViewMode::Calendar, today);
        ctl.boot().await;
        let mut app = App::new(ctl);
        app.hits = calendar_hits();

        app.handle_mouse(click(2, 1)).await;
        match app.ctl.modal.as_ref().map(|m| &m.modal) {
            Some(Modal::Task(form)) => assert_eq!(form.edit_id.as_deref(), Some("7")),
            other => panic!("expected task editor, got {:?}", other),
        }

        app.ctl.cancel();
        app.handle_mouse(click(2, 3)).await;
        match app.ctl.modal.as_ref().map(|m| &m.modal) {
            Some(Modal::Task(form)) => {
                assert_eq!(form.edit_id, None);
                assert_eq!(form.date, "2024-03-20");
            }
            other => panic!("expected new task dialog, got {:?}", other),
        }
        assert_eq!(app.selected_day, 20);
        assert_eq!(app.focus, Focus::Tasks);
    }

    #[tokio::test]
    async fn clicks_are_ignored_while_a_dialog_is_open() {
        let mut ctl = Controller::with_clock(OneTask, ViewMode::Calendar, today);
        ctl.boot().await;
        let mut app = App::new(ctl);
        app.hits = calendar_hits();
        app.run(Action::NewTask).await;

        app.handle_mouse(click(2, 1)).await;
        match app.ctl.modal.as_ref().map(|m| &m.modal) {
            Some(Modal::Task(form)) => assert_eq!(form.edit_id, None),
            other => panic!("expected the first dialog to stay, got {:?}", other),
        }
    }
}
