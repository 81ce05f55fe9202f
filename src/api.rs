use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;
use crate::models::{Category, CategoryDraft, Task, TaskDraft};

/// The REST contract the client consumes. Persistence belongs to the backend.
///
/// Deleting a category detaches the tasks that referenced it; that is done
/// server-side and the client only observes it on the next load.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;

    async fn create_category(&self, draft: &CategoryDraft) -> Result<(), ApiError>;
    async fn update_category(&self, id: &str, draft: &CategoryDraft) -> Result<(), ApiError>;
    async fn delete_category(&self, id: &str) -> Result<(), ApiError>;

    async fn create_task(&self, draft: &TaskDraft) -> Result<(), ApiError>;
    async fn update_task(&self, id: &str, draft: &TaskDraft) -> Result<(), ApiError>;
    async fn delete_task(&self, id: &str) -> Result<(), ApiError>;
}

/// [`Backend`] over HTTP with form-encoded writes.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("taskboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::Transport { path: base_url.to_string(), source })?;
        Ok(HttpBackend {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send("GET", path, self.client.get(self.url(path))).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| ApiError::Decode { path: path.to_string(), source })
    }

    async fn send(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        debug!("{} {}", method, path);
        let response = request
            .send()
            .await
            .map_err(|source| ApiError::Transport { path: path.to_string(), source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { method, path: path.to_string(), status: status.as_u16() });
        }
        Ok(response)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.fetch("/api/categories").await
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.fetch("/api/tasks").await
    }

    async fn create_category(&self, draft: &CategoryDraft) -> Result<(), ApiError> {
        let path = "/api/categories";
        let req = self.client.post(self.url(path)).form(&draft.form_fields());
        self.send("POST", path, req).await.map(|_| ())
    }

    async fn update_category(&self, id: &str, draft: &CategoryDraft) -> Result<(), ApiError> {
        let path = format!("/api/categories/{}", id);
        let req = self.client.put(self.url(&path)).form(&draft.form_fields());
        self.send("PUT", &path, req).await.map(|_| ())
    }

    async fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/api/categories/{}", id);
        let req = self.client.delete(self.url(&path));
        self.send("DELETE", &path, req).await.map(|_| ())
    }

    async fn create_task(&self, draft: &TaskDraft) -> Result<(), ApiError> {
        let path = "/api/tasks";
        let req = self.client.post(self.url(path)).form(&draft.form_fields());
        self.send("POST", path, req).await.map(|_| ())
    }

    async fn update_task(&self, id: &str, draft: &TaskDraft) -> Result<(), ApiError> {
        let path = format!("/api/tasks/{}", id);
        let req = self.client.put(self.url(&path)).form(&draft.form_fields());
        self.send("PUT", &path, req).await.map(|_| ())
    }

    async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/api/tasks/{}", id);
        let req = self.client.delete(self.url(&path));
        self.send("DELETE", &path, req).await.map(|_| ())
    }
}
