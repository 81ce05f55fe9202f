use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::action::Action;
use crate::api::Backend;
use crate::filter;
use crate::modal::{CategoryForm, FilterForm, Modal, OpenModal, TaskForm};
use crate::models::Task;
use crate::state::ViewState;
use crate::store::DataStore;
use crate::view::{Rendered, ViewMode};

/// A destructive action waiting for the user's yes/no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    DeleteTask(String),
    DeleteCategory(String),
}

impl Confirm {
    pub fn prompt(&self) -> &'static str {
        match self {
            Confirm::DeleteTask(_) => "Delete task?",
            Confirm::DeleteCategory(_) => "Delete category? Tasks will be detached.",
        }
    }
}

/// Owns the data snapshot, the view state and the dialogs, and turns
/// [`Action`]s into state transitions and backend writes.
pub struct Controller<B> {
    pub store: DataStore<B>,
    pub state: ViewState,
    /// The open dialog, if any.
    pub modal: Option<OpenModal>,
    pub confirm: Option<Confirm>,
    /// Blocking message for the user (validation or failed write).
    pub notice: Option<String>,
    clock: fn() -> NaiveDate,
}

impl<B: Backend> Controller<B> {
    pub fn new(backend: B, view: ViewMode) -> Self {
        Self::with_clock(backend, view, filter::today)
    }

    pub fn with_clock(backend: B, view: ViewMode, clock: fn() -> NaiveDate) -> Self {
        Controller {
            store: DataStore::new(backend),
            state: ViewState::new(view, clock()),
            modal: None,
            confirm: None,
            notice: None,
            clock,
        }
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Initial load. A failure leaves empty collections and a log entry only.
    pub async fn boot(&mut self) {
        let _ = self.store.load().await;
    }

    pub fn visible(&self) -> Vec<&Task> {
        self.state.visible(self.store.tasks(), self.today())
    }

    pub fn rendered(&self) -> Rendered {
        self.state.render(self.store.tasks(), self.store.categories(), self.today())
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    pub async fn dispatch(&mut self, action: Action) {
        debug!("dispatch {:?}", action);
        match action {
            Action::NewTask => self.open_task(None, None),
            Action::OpenDay(date) => self.open_task(None, Some(date)),
            Action::EditTask(id) | Action::OpenEvent(id) => {
                if let Some(task) = self.store.task(&id).cloned() {
                    self.open_task(Some(&task), None);
                }
            }
            Action::DeleteTask(id) => self.confirm = Some(Confirm::DeleteTask(id)),
            Action::CalendarNav(nav) => {
                let today = self.today();
                self.state.navigate(nav, today);
            }
            Action::NewCategory => self.open(Modal::Category(CategoryForm::new())),
            Action::EditCategory(id) => {
                if let Some(cat) = self.store.category(&id) {
                    let form = CategoryForm::edit(cat);
                    self.open(Modal::Category(form));
                }
            }
            Action::SelectCategory(id) => self.state.toggle_category(&id),
            Action::OpenFilter => {
                let form = FilterForm::from_state(&self.state.filter);
                self.open(Modal::Filter(form));
            }
            Action::SetView(view) => self.state.set_view(view),
            Action::Search(text) => self.state.set_search(&text),
        }
    }

    fn open(&mut self, modal: Modal) {
        self.modal = Some(OpenModal::new(modal));
    }

    fn open_task(&mut self, task: Option<&Task>, preset: Option<NaiveDate>) {
        let categories = self.store.categories();
        let form = match task {
            Some(t) => TaskForm::edit(t, categories),
            None => TaskForm::new(preset, categories),
        };
        self.open(Modal::Task(form));
    }

    /// Closes the open dialog without writing anything.
    pub fn cancel(&mut self) {
        self.modal = None;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Save (category, task) or apply (filter) the open dialog.
    ///
    /// Validation failures and backend failures keep the dialog open and set
    /// [`Controller::notice`]; nothing is retried.
    pub async fn save(&mut self) {
        let Some(open) = self.modal.as_mut() else { return };
        match &mut open.modal {
            Modal::Category(form) => {
                let draft = match form.collect() {
                    Ok(d) => d,
                    Err(e) => {
                        self.notice = Some(e.to_string());
                        return;
                    }
                };
                let result = match form.edit_id.clone() {
                    None => self.store.create_category(&draft).await,
                    Some(id) => self.store.update_category(&id, &draft).await,
                };
                match result {
                    Ok(()) => self.modal = None,
                    Err(e) => {
                        warn!("Saving category failed: {}", e);
                        self.notice = Some("Error saving category".to_string());
                    }
                }
            }
            Modal::Task(form) => {
                let draft = match form.collect() {
                    Ok(d) => d,
                    Err(e) => {
                        self.notice = Some(e.to_string());
                        return;
                    }
                };
                let result = match form.edit_id.clone() {
                    None => self.store.create_task(&draft).await,
                    Some(id) => self.store.update_task(&id, &draft).await,
                };
                match result {
                    Ok(()) => {
                        if let Some(OpenModal { modal: Modal::Task(form), .. }) = self.modal.as_mut() {
                            form.reset();
                        }
                        self.modal = None;
                    }
                    Err(e) => {
                        warn!("Saving task failed: {}", e);
                        self.notice = Some("Error saving task".to_string());
                    }
                }
            }
            Modal::Filter(form) => match form.collect() {
                Ok(filter) => {
                    self.state.apply_filter(filter);
                    self.modal = None;
                }
                Err(e) => self.notice = Some(e.to_string()),
            },
        }
    }

    /// Filter dialog "clear": reset every predicate and close.
    pub fn clear_filter(&mut self) {
        if let Some(OpenModal { modal: Modal::Filter(_), .. }) = &self.modal {
            self.state.clear_filter();
            self.modal = None;
        }
    }

    /// Category dialog "delete": only for an existing category, asks first.
    pub fn request_category_delete(&mut self) {
        if let Some(OpenModal { modal: Modal::Category(form), .. }) = &self.modal {
            if let Some(id) = &form.edit_id {
                self.confirm = Some(Confirm::DeleteCategory(id.clone()));
            }
        }
    }

    /// Resolves the pending confirmation. "No" drops it without side effects.
    pub async fn answer_confirm(&mut self, yes: bool) {
        let Some(pending) = self.confirm.take() else { return };
        if !yes {
            return;
        }
        match pending {
            Confirm::DeleteTask(id) => {
                if let Err(e) = self.store.delete_task(&id).await {
                    warn!("Deleting task {} failed: {}", id, e);
                    self.notice = Some("Error deleting".to_string());
                }
            }
            Confirm::DeleteCategory(id) => match self.store.delete_category(&id).await {
                Ok(()) => self.modal = None,
                Err(e) => {
                    warn!("Deleting category {} failed: {}", id, e);
                    self.notice = Some("Error deleting category".to_string());
                }
            },
        }
    }
}
