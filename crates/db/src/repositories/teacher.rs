//! Teacher repository.

use std::sync::Arc;

use crate::entities::{Teacher, teacher};
use litblogs_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Teacher repository for database operations.
#[derive(Clone)]
pub struct TeacherRepository {
    db: Arc<DatabaseConnection>,
}

impl TeacherRepository {
    /// Create a new teacher repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a teacher record by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<teacher::Model>> {
        Teacher::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a teacher record by ID, failing if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<teacher::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Teacher {id}")))
    }

    /// Find a teacher record by the backing user account.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<teacher::Model>> {
        Teacher::find()
            .filter(teacher::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a teacher record by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<teacher::Model>> {
        Teacher::find()
            .filter(teacher::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new teacher record.
    pub async fn create(&self, model: teacher::ActiveModel) -> AppResult<teacher::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
