use tracing::{error, info};

use crate::api::Backend;
use crate::error::ApiError;
use crate::models::{Category, CategoryDraft, Task, TaskDraft};

/// The last snapshot fetched from the backend.
///
/// The snapshot is only ever replaced wholesale. Every mutation goes to the
/// backend first and is followed by a fresh [`DataStore::load`]; nothing is
/// patched locally.
pub struct DataStore<B> {
    backend: B,
    categories: Vec<Category>,
    tasks: Vec<Task>,
}

impl<B: Backend> DataStore<B> {
    pub fn new(backend: B) -> Self {
        DataStore { backend, categories: Vec::new(), tasks: Vec::new() }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Fetches categories and tasks concurrently and swaps both in at once.
    ///
    /// On any failure both collections are emptied and the error is logged;
    /// the error is also returned for callers that want to stop on it.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let fetched = tokio::try_join!(self.backend.list_categories(), self.backend.list_tasks());
        match fetched {
            Ok((categories, tasks)) => {
                info!("Loaded {} categories and {} tasks.", categories.len(), tasks.len());
                self.categories = categories;
                self.tasks = tasks;
                Ok(())
            }
            Err(e) => {
                error!("Failed to load data: {}", e);
                self.categories.clear();
                self.tasks.clear();
                Err(e)
            }
        }
    }

    /// Reload after a successful write. A failed reload is already logged by `load`.
    async fn refresh(&mut self) {
        let _ = self.load().await;
    }

    pub async fn create_category(&mut self, draft: &CategoryDraft) -> Result<(), ApiError> {
        self.backend.create_category(draft).await?;
        info!("Category '{}' created.", draft.name);
        self.refresh().await;
        Ok(())
    }

    pub async fn update_category(&mut self, id: &str, draft: &CategoryDraft) -> Result<(), ApiError> {
        self.backend.update_category(id, draft).await?;
        info!("Category {} updated.", id);
        self.refresh().await;
        Ok(())
    }

    pub async fn delete_category(&mut self, id: &str) -> Result<(), ApiError> {
        self.backend.delete_category(id).await?;
        info!("Category {} deleted.", id);
        self.refresh().await;
        Ok(())
    }

    pub async fn create_task(&mut self, draft: &TaskDraft) -> Result<(), ApiError> {
        self.backend.create_task(draft).await?;
        info!("Task '{}' created.", draft.title);
        self.refresh().await;
        Ok(())
    }

    pub async fn update_task(&mut self, id: &str, draft: &TaskDraft) -> Result<(), ApiError> {
        self.backend.update_task(id, draft).await?;
        info!("Task {} updated.", id);
        self.refresh().await;
        Ok(())
    }

    pub async fn delete_task(&mut self, id: &str) -> Result<(), ApiError> {
        self.backend.delete_task(id).await?;
        info!("Task {} deleted.", id);
        self.refresh().await;
        Ok(())
    }
}
