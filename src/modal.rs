//! The three editor dialogs: category, task and filter.
//!
//! Each form is plain data. Opening populates it from an entity, `collect`
//! validates it back into something the store or the view state accepts.
//! Focus and per-field editing live here too so the TUI only maps keys.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::filter::FilterState;
use crate::models::{parse_date, Category, CategoryDraft, Priority, Task, TaskDraft};

/// Color preset for a new category.
pub const NEW_CATEGORY_COLOR: &str = "#ff7f2a";

const NONE_OPTION_LABEL: &str = "— none —";
const ANY_OPTION_LABEL: &str = "(any)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Choice,
    Toggle,
}

/// One row of a form as the UI shows it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
}

/// Editing input for the focused field. `Cycle` steps a choice or flips a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldInput {
    Char(char),
    Backspace,
    Cycle,
}

fn edit_text(buf: &mut String, input: FieldInput) {
    match input {
        FieldInput::Char(c) => buf.push(c),
        FieldInput::Backspace => {
            buf.pop();
        }
        FieldInput::Cycle => {}
    }
}

fn text(label: &'static str, value: &str) -> FieldView {
    FieldView { label, value: value.to_string(), kind: FieldKind::Text }
}

fn parse_opt_date(raw: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    parse_date(raw).map(Some).map_err(|_| ValidationError::BadDate(raw.to_string()))
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ---- Category ----

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryForm {
    /// Set when editing an existing category.
    pub edit_id: Option<String>,
    pub name: String,
    pub color: String,
}

impl CategoryForm {
    pub fn new() -> Self {
        CategoryForm { edit_id: None, name: String::new(), color: NEW_CATEGORY_COLOR.to_string() }
    }

    pub fn edit(cat: &Category) -> Self {
        CategoryForm { edit_id: Some(cat.id.clone()), name: cat.name.clone(), color: cat.color.clone() }
    }

    pub fn title(&self) -> &'static str {
        if self.edit_id.is_some() { "Edit Category" } else { "New Category" }
    }

    /// Delete is only offered for an existing category.
    pub fn can_delete(&self) -> bool {
        self.edit_id.is_some()
    }

    pub fn collect(&self) -> Result<CategoryDraft, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(CategoryDraft { name: name.to_string(), color: self.color.trim().to_string() })
    }

    fn fields(&self) -> Vec<FieldView> {
        vec![text("Name", &self.name), text("Color", &self.color)]
    }

    fn input(&mut self, field: usize, input: FieldInput) {
        match field {
            0 => edit_text(&mut self.name, input),
            1 => edit_text(&mut self.color, input),
            _ => {}
        }
    }
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self::new()
    }
}

// ---- Task ----

#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub edit_id: Option<String>,
    pub title: String,
    pub project: String,
    pub priority: Priority,
    pub owner: String,
    /// Selected category id; `None` is the "none" option.
    pub category: Option<String>,
    /// Raw `YYYY-MM-DD` text, empty for no date.
    pub date: String,
    pub description: String,
    /// (id, name) pairs offered by the category selector.
    pub category_options: Vec<(String, String)>,
}

impl TaskForm {
    /// Blank form. `preset_date` comes from a calendar day click.
    pub fn new(preset_date: Option<NaiveDate>, categories: &[Category]) -> Self {
        let mut form = TaskForm {
            edit_id: None,
            title: String::new(),
            project: String::new(),
            priority: Priority::Low,
            owner: String::new(),
            category: None,
            date: String::new(),
            description: String::new(),
            category_options: Vec::new(),
        };
        form.set_category_options(categories);
        if let Some(d) = preset_date {
            form.date = d.format("%Y-%m-%d").to_string();
        }
        form
    }

    pub fn edit(task: &Task, categories: &[Category]) -> Self {
        let mut form = TaskForm::new(task.date, categories);
        form.edit_id = Some(task.id.clone());
        form.title = task.title.clone();
        form.project = task.project.clone();
        form.priority = task.priority;
        form.owner = task.owner.clone();
        form.category = task.category_id.clone();
        form.description = task.description.clone();
        form.set_category_options(categories);
        form
    }

    pub fn title_text(&self) -> &'static str {
        if self.edit_id.is_some() { "Edit Task" } else { "New Task" }
    }

    /// Refreshes the selector after a reload. A selection that no longer
    /// exists falls back to none.
    pub fn set_category_options(&mut self, categories: &[Category]) {
        self.category_options = categories.iter().map(|c| (c.id.clone(), c.name.clone())).collect();
        if let Some(sel) = &self.category {
            if !self.category_options.iter().any(|(id, _)| id == sel) {
                self.category = None;
            }
        }
    }

    /// Back to the blank/Low state so the next "new task" starts clean.
    pub fn reset(&mut self) {
        self.edit_id = None;
        self.title.clear();
        self.project.clear();
        self.priority = Priority::Low;
        self.owner.clear();
        self.category = None;
        self.date.clear();
        self.description.clear();
    }

    pub fn collect(&self) -> Result<TaskDraft, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(TaskDraft {
            title: title.to_string(),
            project: self.project.trim().to_string(),
            priority: self.priority,
            owner: self.owner.trim().to_string(),
            category_id: self.category.clone().filter(|c| !c.is_empty()),
            date: parse_opt_date(&self.date)?,
            description: self.description.trim().to_string(),
        })
    }

    fn category_label(&self) -> String {
        self.category
            .as_ref()
            .and_then(|sel| self.category_options.iter().find(|(id, _)| id == sel))
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| NONE_OPTION_LABEL.to_string())
    }

    fn cycle_category(&mut self) {
        let pos = self
            .category
            .as_ref()
            .and_then(|sel| self.category_options.iter().position(|(id, _)| id == sel));
        self.category = match pos {
            None => self.category_options.first().map(|(id, _)| id.clone()),
            Some(i) => self.category_options.get(i + 1).map(|(id, _)| id.clone()),
        };
    }

    fn fields(&self) -> Vec<FieldView> {
        vec![
            text("Title", &self.title),
            text("Project", &self.project),
            FieldView { label: "Priority", value: self.priority.to_string(), kind: FieldKind::Choice },
            text("Owner", &self.owner),
            FieldView { label: "Category", value: self.category_label(), kind: FieldKind::Choice },
            text("Date", &self.date),
            text("Description", &self.description),
        ]
    }

    fn input(&mut self, field: usize, input: FieldInput) {
        match field {
            0 => edit_text(&mut self.title, input),
            1 => edit_text(&mut self.project, input),
            2 => {
                if input == FieldInput::Cycle {
                    self.priority = self.priority.next();
                }
            }
            3 => edit_text(&mut self.owner, input),
            4 => {
                if input == FieldInput::Cycle {
                    self.cycle_category();
                }
            }
            5 => edit_text(&mut self.date, input),
            6 => edit_text(&mut self.description, input),
            _ => {}
        }
    }
}

// ---- Filter ----

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterForm {
    pub from: String,
    pub to: String,
    pub priority: Option<Priority>,
    pub project: String,
    pub owner: String,
    pub nodate: bool,
    pub overdue: bool,
}

impl FilterForm {
    pub fn from_state(state: &FilterState) -> Self {
        let date = |d: Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
        FilterForm {
            from: date(state.from),
            to: date(state.to),
            priority: state.priority,
            project: state.project.clone().unwrap_or_default(),
            owner: state.owner.clone().unwrap_or_default(),
            nodate: state.nodate,
            overdue: state.overdue,
        }
    }

    /// Empty text becomes unset; project and owner are trimmed.
    pub fn collect(&self) -> Result<FilterState, ValidationError> {
        Ok(FilterState {
            from: parse_opt_date(&self.from)?,
            to: parse_opt_date(&self.to)?,
            priority: self.priority,
            project: non_empty(&self.project),
            owner: non_empty(&self.owner),
            nodate: self.nodate,
            overdue: self.overdue,
        })
    }

    fn fields(&self) -> Vec<FieldView> {
        let flag = |on: bool| if on { "[x]" } else { "[ ]" }.to_string();
        vec![
            text("From", &self.from),
            text("To", &self.to),
            FieldView {
                label: "Priority",
                value: self.priority.map(|p| p.to_string()).unwrap_or_else(|| ANY_OPTION_LABEL.to_string()),
                kind: FieldKind::Choice,
            },
            text("Project", &self.project),
            text("Owner", &self.owner),
            FieldView { label: "No date", value: flag(self.nodate), kind: FieldKind::Toggle },
            FieldView { label: "Overdue", value: flag(self.overdue), kind: FieldKind::Toggle },
        ]
    }

    fn input(&mut self, field: usize, input: FieldInput) {
        let cycle = input == FieldInput::Cycle;
        match field {
            0 => edit_text(&mut self.from, input),
            1 => edit_text(&mut self.to, input),
            2 if cycle => {
                self.priority = match self.priority {
                    None => Some(Priority::High),
                    Some(Priority::Low) => None,
                    Some(p) => Some(p.next()),
                }
            }
            3 => edit_text(&mut self.project, input),
            4 => edit_text(&mut self.owner, input),
            5 if cycle => self.nodate = !self.nodate,
            6 if cycle => self.overdue = !self.overdue,
            _ => {}
        }
    }
}

// ---- Open/close state ----

#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Category(CategoryForm),
    Task(TaskForm),
    Filter(FilterForm),
}

/// An open dialog and its focused field. Closed is simply the absence of one.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenModal {
    pub modal: Modal,
    pub focus: usize,
}

impl OpenModal {
    pub fn new(modal: Modal) -> Self {
        OpenModal { modal, focus: 0 }
    }

    pub fn title(&self) -> &'static str {
        match &self.modal {
            Modal::Category(f) => f.title(),
            Modal::Task(f) => f.title_text(),
            Modal::Filter(_) => "Filter",
        }
    }

    pub fn fields(&self) -> Vec<FieldView> {
        match &self.modal {
            Modal::Category(f) => f.fields(),
            Modal::Task(f) => f.fields(),
            Modal::Filter(f) => f.fields(),
        }
    }

    pub fn focus_next(&mut self) {
        let n = self.fields().len();
        self.focus = (self.focus + 1) % n;
    }

    pub fn focus_prev(&mut self) {
        let n = self.fields().len();
        self.focus = (self.focus + n - 1) % n;
    }

    pub fn input(&mut self, input: FieldInput) {
        let focus = self.focus;
        match &mut self.modal {
            Modal::Category(f) => f.input(focus, input),
            Modal::Task(f) => f.input(focus, input),
            Modal::Filter(f) => f.input(focus, input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats() -> Vec<Category> {
        vec![
            Category { id: "1".into(), name: "Work".into(), color: "#111111".into() },
            Category { id: "2".into(), name: "Home".into(), color: "#222222".into() },
        ]
    }

    #[test]
    fn category_name_is_required_and_trimmed() {
        let mut f = CategoryForm::new();
        f.name = "   ".into();
        assert_eq!(f.collect(), Err(ValidationError::EmptyName));
        f.name = "  Work ".into();
        assert_eq!(f.collect().unwrap().name, "Work");
        assert_eq!(f.collect().unwrap().color, NEW_CATEGORY_COLOR);
        assert!(!f.can_delete());
        assert!(CategoryForm::edit(&cats()[0]).can_delete());
    }

    #[test]
    fn task_form_defaults_and_preset_date() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let f = TaskForm::new(Some(day), &cats());
        assert_eq!(f.priority, Priority::Low);
        assert_eq!(f.date, "2024-03-09");
        assert_eq!(f.title_text(), "New Task");
        assert_eq!(f.collect(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn task_form_collects_draft() {
        let mut f = TaskForm::new(None, &cats());
        for c in "  Ship release ".chars() {
            f.input(0, FieldInput::Char(c));
        }
        f.input(4, FieldInput::Cycle);
        let draft = f.collect().unwrap();
        assert_eq!(draft.title, "Ship release");
        assert_eq!(draft.category_id.as_deref(), Some("1"));
        assert_eq!(draft.date, None);
        assert_eq!(draft.priority, Priority::Low);

        f.date = "2024-02-30".into();
        assert_eq!(f.collect(), Err(ValidationError::BadDate("2024-02-30".into())));
    }

    #[test]
    fn category_choice_cycles_through_none() {
        let mut f = TaskForm::new(None, &cats());
        f.input(4, FieldInput::Cycle);
        f.input(4, FieldInput::Cycle);
        assert_eq!(f.category.as_deref(), Some("2"));
        f.input(4, FieldInput::Cycle);
        assert_eq!(f.category, None);
        assert_eq!(f.fields()[4].value, NONE_OPTION_LABEL);
    }

    #[test]
    fn reset_returns_to_blank_low() {
        let task = Task {
            id: "9".into(),
            title: "Old".into(),
            description: "d".into(),
            project: "p".into(),
            priority: Priority::High,
            owner: "o".into(),
            category_id: Some("2".into()),
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
        };
        let mut f = TaskForm::edit(&task, &cats());
        assert_eq!(f.title_text(), "Edit Task");
        f.reset();
        let blank = TaskForm::new(None, &cats());
        assert_eq!(f, blank);
    }

    #[test]
    fn stale_category_selection_falls_back_to_none() {
        let mut f = TaskForm::new(None, &cats());
        f.category = Some("2".into());
        f.set_category_options(&cats()[..1]);
        assert_eq!(f.category, None);
    }

    #[test]
    fn editing_a_task_with_a_deleted_category_submits_none() {
        let mut task = Task {
            id: "9".into(),
            title: "Orphan".into(),
            description: String::new(),
            project: String::new(),
            priority: Priority::Low,
            owner: String::new(),
            category_id: Some("gone".into()),
            date: None,
        };
        let f = TaskForm::edit(&task, &cats());
        assert_eq!(f.category, None);
        let shown = f.fields().into_iter().find(|v| v.label == "Category").map(|v| v.value);
        assert_eq!(shown.as_deref(), Some(NONE_OPTION_LABEL));
        assert_eq!(f.collect().unwrap().category_id, None);

        task.category_id = Some("2".into());
        let f = TaskForm::edit(&task, &cats());
        assert_eq!(f.collect().unwrap().category_id.as_deref(), Some("2"));
    }

    #[test]
    fn filter_form_round_trip_is_identity() {
        let state = FilterState {
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            to: None,
            priority: Some(Priority::Medium),
            project: Some("web".into()),
            owner: None,
            nodate: false,
            overdue: true,
        };
        assert_eq!(FilterForm::from_state(&state).collect().unwrap(), state);
        let empty = FilterState::default();
        assert_eq!(FilterForm::from_state(&empty).collect().unwrap(), empty);
    }

    #[test]
    fn filter_form_coerces_blank_text() {
        let form = FilterForm { project: "   ".into(), owner: " ana ".into(), ..Default::default() };
        let state = form.collect().unwrap();
        assert_eq!(state.project, None);
        assert_eq!(state.owner.as_deref(), Some("ana"));
    }

    #[test]
    fn focus_wraps() {
        let mut m = OpenModal::new(Modal::Category(CategoryForm::new()));
        m.focus_prev();
        assert_eq!(m.focus, 1);
        m.focus_next();
        assert_eq!(m.focus, 0);
        assert_eq!(m.title(), "New Category");
    }
}
