use std::sync::Arc;

use async_trait::async_trait;

use eventplanner_core::event::{
    assign_expense_ids, expense_category_id, total_amount_paid, validate_expense_category,
    ExpenseCategory,
};
use eventplanner_core::service::{ExpenseCategoryService, Result};
use eventplanner_core::storage::{KeyValueStore, SortKeyMode};

use super::children::ChildItems;

/// Expense category service over the single-table store.
#[derive(Clone)]
pub struct StoreExpenseCategoryService {
    items: ChildItems,
}

impl StoreExpenseCategoryService {
    pub fn new(store: Arc<dyn KeyValueStore>, mode: SortKeyMode) -> Self {
        Self {
            items: ChildItems::new(store, mode),
        }
    }
}

#[async_trait]
impl ExpenseCategoryService for StoreExpenseCategoryService {
    async fn get(&self, event_id: &str, id: &str) -> Result<Option<ExpenseCategory>> {
        self.items.get(event_id, id).await
    }

    async fn list(&self, event_id: &str) -> Result<Vec<ExpenseCategory>> {
        self.items.list(event_id).await
    }

    async fn create_or_update(
        &self,
        event_id: &str,
        mut category: ExpenseCategory,
    ) -> Result<ExpenseCategory> {
        validate_expense_category(&category)?;
        if category.id.is_empty() {
            category.id = expense_category_id(&category);
        }
        assign_expense_ids(&mut category.expenses);
        category.amount_paid = total_amount_paid(&category.expenses);

        self.items.put(event_id, category).await
    }

    async fn delete(&self, event_id: &str, id: &str) -> Result<()> {
        self.items.delete::<ExpenseCategory>(event_id, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventplanner_core::event::{generate_id, Expense, ValidationError, MAX_EXPENSES_PER_CATEGORY};
    use eventplanner_core::service::ServiceError;

    use crate::storage::InMemoryStore;

    fn service(store: &InMemoryStore) -> StoreExpenseCategoryService {
        StoreExpenseCategoryService::new(Arc::new(store.clone()), SortKeyMode::Prefixed)
    }

    fn category_with(count: usize) -> ExpenseCategory {
        (0..count).fold(ExpenseCategory::new("Food"), |category, i| {
            category.with_expense(Expense::new(format!("payer-{i}"), 1.5))
        })
    }

    #[tokio::test]
    async fn test_create_sums_and_assigns_ids() {
        let store = InMemoryStore::new();
        let categories = service(&store);
        let category = ExpenseCategory::new("Food")
            .with_projected(100.0)
            .with_expense(Expense::new("Ana", 20.0))
            .with_expense(Expense::new("Bob", 12.5));

        let created = categories.create_or_update("e1", category).await.unwrap();

        assert_eq!(created.id, generate_id("Food"));
        assert_eq!(created.amount_paid, 32.5);
        assert!(created.expenses.iter().all(|e| !e.id.is_empty()));
        let fetched = categories.get("e1", &created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_existing_expense_ids_are_kept() {
        let store = InMemoryStore::new();
        let categories = service(&store);
        let mut expense = Expense::new("Ana", 5.0);
        expense.id = "fixed".to_string();

        let created = categories
            .create_or_update("e1", ExpenseCategory::new("Music").with_expense(expense))
            .await
            .unwrap();

        assert_eq!(created.expenses[0].id, "fixed");
    }

    #[tokio::test]
    async fn test_update_keeps_created_and_refreshes_updated() {
        let store = InMemoryStore::new();
        let categories = service(&store);
        let created = categories
            .create_or_update("e1", ExpenseCategory::new("Food").with_projected(50.0))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let mut edit = created.clone();
        edit.amount_projected = 80.0;
        edit.time_created_on = None;
        let updated = categories.create_or_update("e1", edit).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.time_created_on, created.time_created_on);
        assert!(updated.time_updated_on > created.time_updated_on);

        let stored = categories.get("e1", &created.id).await.unwrap().unwrap();
        assert_eq!(stored.amount_projected, 80.0);
        assert_eq!(stored.time_created_on, created.time_created_on);
        assert_eq!(categories.list("e1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_caller_amount_paid_is_recomputed() {
        let store = InMemoryStore::new();
        let categories = service(&store);
        let mut category = ExpenseCategory::new("Food").with_expense(Expense::new("Ana", 7.0));
        category.amount_paid = 1_000.0;

        let created = categories.create_or_update("e1", category).await.unwrap();

        assert_eq!(created.amount_paid, 7.0);
    }

    #[tokio::test]
    async fn test_expense_cap() {
        let store = InMemoryStore::new();
        let categories = service(&store);

        let rejected = categories
            .create_or_update("e1", category_with(MAX_EXPENSES_PER_CATEGORY + 1))
            .await;
        assert_eq!(
            rejected,
            Err(ServiceError::Validation(ValidationError::TooManyExpenses {
                count: 81,
                max: 80,
            }))
        );
        assert!(store.is_empty().await);

        let accepted = categories
            .create_or_update("e1", category_with(MAX_EXPENSES_PER_CATEGORY))
            .await
            .unwrap();
        assert_eq!(accepted.expenses.len(), 80);
        assert_eq!(accepted.amount_paid, 120.0);
    }

    #[tokio::test]
    async fn test_expense_without_payer_rejected() {
        let store = InMemoryStore::new();
        let categories = service(&store);

        let result = categories
            .create_or_update(
                "e1",
                ExpenseCategory::new("Food").with_expense(Expense::new("", 3.0)),
            )
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::Validation(ValidationError::MissingField { .. }))
        ));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let store = InMemoryStore::new();
        let categories = service(&store);
        let food = categories
            .create_or_update("e1", ExpenseCategory::new("Food"))
            .await
            .unwrap();
        categories
            .create_or_update("e1", ExpenseCategory::new("Music"))
            .await
            .unwrap();

        categories.delete("e1", &food.id).await.unwrap();

        let listed = categories.list("e1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category, "Music");
    }
}
