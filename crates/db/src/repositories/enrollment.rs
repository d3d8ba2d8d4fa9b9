//! Enrollment repository.

use std::sync::Arc;

use crate::entities::{Enrollment, enrollment};
use litblogs_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr,
};

/// Enrollment repository for database operations.
#[derive(Clone)]
pub struct EnrollmentRepository {
    db: Arc<DatabaseConnection>,
}

impl EnrollmentRepository {
    /// Create a new enrollment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the enrollment joining a student to a class.
    pub async fn find_by_student_and_class(
        &self,
        student_id: &str,
        class_id: &str,
    ) -> AppResult<Option<enrollment::Model>> {
        Enrollment::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .filter(enrollment::Column::ClassId.eq(class_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a student is enrolled in a class.
    pub async fn is_enrolled(&self, student_id: &str, class_id: &str) -> AppResult<bool> {
        Ok(self
            .find_by_student_and_class(student_id, class_id)
            .await?
            .is_some())
    }

    /// List enrollments for a class.
    pub async fn find_by_class(&self, class_id: &str) -> AppResult<Vec<enrollment::Model>> {
        Enrollment::find()
            .filter(enrollment::Column::ClassId.eq(class_id))
            .order_by_asc(enrollment::Column::EnrolledAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List enrollments for a student.
    pub async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<enrollment::Model>> {
        Enrollment::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .order_by_asc(enrollment::Column::EnrolledAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count enrollments for a class.
    pub async fn count_by_class(&self, class_id: &str) -> AppResult<u64> {
        Enrollment::find()
            .filter(enrollment::Column::ClassId.eq(class_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new enrollment.
    ///
    /// The (student, class) unique index enforces at-most-one membership;
    /// a concurrent duplicate insert surfaces as `Conflict`.
    pub async fn create(&self, model: enrollment::ActiveModel) -> AppResult<enrollment::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AppError::Conflict("Already enrolled in this class".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Delete the enrollment joining a student to a class (unenroll).
    pub async fn delete_by_student_and_class(
        &self,
        student_id: &str,
        class_id: &str,
    ) -> AppResult<()> {
        let enrollment = self
            .find_by_student_and_class(student_id, class_id)
            .await?;
        if let Some(e) = enrollment {
            e.delete(self.db.as_ref())
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

    fn create_test_enrollment(id: &str, student_id: &str, class_id: &str) -> enrollment::Model {
        enrollment::Model {
            id: id.to_string(),
            student_id: student_id.to_string(),
            class_id: class_id.to_string(),
            enrolled_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_is_enrolled_true() {
        let enrollment = create_test_enrollment("e1", "u1", "c1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[enrollment]])
                .into_connection(),
        );

        let repo = EnrollmentRepository::new(db);
        assert!(repo.is_enrolled("u1", "c1").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_enrolled_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<enrollment::Model>::new()])
                .into_connection(),
        );

        let repo = EnrollmentRepository::new(db);
        assert!(!repo.is_enrolled("u1", "c1").await.unwrap());
    }

    #[tokio::test]
    async fn test_count_by_class() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let repo = EnrollmentRepository::new(db);
        assert_eq!(repo.count_by_class("c1").await.unwrap(), 3);
    }
}
