//! Class repository.

use std::sync::Arc;

use crate::entities::{Class, class};
use litblogs_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

/// Class repository for database operations.
#[derive(Clone)]
pub struct ClassRepository {
    db: Arc<DatabaseConnection>,
}

impl ClassRepository {
    /// Create a new class repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a class by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<class::Model>> {
        Class::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a class by ID, failing if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<class::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ClassNotFound(id.to_string()))
    }

    /// Find a class by its access code.
    pub async fn find_by_access_code(&self, code: &str) -> AppResult<Option<class::Model>> {
        Class::find()
            .filter(class::Column::AccessCode.eq(code))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether an access code is already taken.
    pub async fn access_code_exists(&self, code: &str) -> AppResult<bool> {
        Ok(self.find_by_access_code(code).await?.is_some())
    }

    /// List classes owned by a teacher record, filtered by status.
    pub async fn find_by_teacher(
        &self,
        teacher_id: &str,
        status: class::ClassStatus,
    ) -> AppResult<Vec<class::Model>> {
        Class::find()
            .filter(class::Column::TeacherId.eq(teacher_id))
            .filter(class::Column::Status.eq(status))
            .order_by_desc(class::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all classes with a given status (admin view).
    pub async fn find_by_status(&self, status: class::ClassStatus) -> AppResult<Vec<class::Model>> {
        Class::find()
            .filter(class::Column::Status.eq(status))
            .order_by_desc(class::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new class.
    pub async fn create(&self, model: class::ActiveModel) -> AppResult<class::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a class.
    pub async fn update(&self, model: class::ActiveModel) -> AppResult<class::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a class. Posts and enrollments cascade at the store.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let class = self.find_by_id(id).await?;
        if let Some(c) = class {
            c.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_class(id: &str, teacher_id: &str, code: &str) -> class::Model {
        class::Model {
            id: id.to_string(),
            name: "Literature 101".to_string(),
            description: None,
            access_code: code.to_string(),
            status: class::ClassStatus::Active,
            teacher_id: teacher_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_access_code() {
        let class = create_test_class("c1", "t1", "AB12CD");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[class]])
                .into_connection(),
        );

        let repo = ClassRepository::new(db);
        let result = repo.find_by_access_code("AB12CD").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "c1");
    }

    #[tokio::test]
    async fn test_access_code_exists_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<class::Model>::new()])
                .into_connection(),
        );

        let repo = ClassRepository::new(db);
        assert!(!repo.access_code_exists("ZZZZZZ").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<class::Model>::new()])
                .into_connection(),
        );

        let repo = ClassRepository::new(db);
        match repo.get_by_id("missing").await {
            Err(AppError::ClassNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected ClassNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_find_by_teacher() {
        let c1 = create_test_class("c1", "t1", "AAAAAA");
        let c2 = create_test_class("c2", "t1", "BBBBBB");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c1, c2]])
                .into_connection(),
        );

        let repo = ClassRepository::new(db);
        let result = repo
            .find_by_teacher("t1", class::ClassStatus::Active)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
    }
}
