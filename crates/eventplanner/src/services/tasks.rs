use std::sync::Arc;

use async_trait::async_trait;

use eventplanner_core::event::{generate_random_id, validate_task, Task};
use eventplanner_core::service::{Result, TaskService};
use eventplanner_core::storage::{KeyValueStore, SortKeyMode};

use super::children::ChildItems;

/// Task service over the single-table store.
#[derive(Clone)]
pub struct StoreTaskService {
    items: ChildItems,
}

impl StoreTaskService {
    pub fn new(store: Arc<dyn KeyValueStore>, mode: SortKeyMode) -> Self {
        Self {
            items: ChildItems::new(store, mode),
        }
    }
}

#[async_trait]
impl TaskService for StoreTaskService {
    async fn get(&self, event_id: &str, id: &str) -> Result<Option<Task>> {
        self.items.get(event_id, id).await
    }

    async fn list(&self, event_id: &str) -> Result<Vec<Task>> {
        self.items.list(event_id).await
    }

    async fn create_or_update(&self, event_id: &str, mut task: Task) -> Result<Task> {
        validate_task(&task)?;
        if task.id.is_empty() {
            task.id = generate_random_id();
        }
        self.items.put(event_id, task).await
    }

    async fn delete(&self, event_id: &str, id: &str) -> Result<()> {
        self.items.delete::<Task>(event_id, id).await
    }
}
