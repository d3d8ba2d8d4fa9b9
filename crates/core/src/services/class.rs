//! Class service: class lifecycle, enrollment, and rosters.

use chrono::Utc;
use litblogs_common::{generate_access_code, AppError, AppResult, IdGenerator};
use litblogs_db::entities::{class, enrollment, teacher, user};
use litblogs_db::repositories::{
    ClassRepository, EnrollmentRepository, PostRepository, TeacherRepository, UserRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::access::AccessService;

/// Attempts at drawing an unused access code before giving up.
const ACCESS_CODE_ATTEMPTS: u32 = 8;

/// Input for creating a class.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Input for updating a class.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Class as listed in teacher and student dashboards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub access_code: String,
    pub status: class::ClassStatus,
    pub teacher_name: Option<String>,
    pub enrollment_count: u64,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

/// Full class detail view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDetails {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub access_code: String,
    pub status: class::ClassStatus,
    pub teacher_name: Option<String>,
    pub enrollment_count: u64,
    pub post_count: u64,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

/// Roster entry for a class.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: String,
    pub post_count: u64,
}

/// Class service for business logic.
#[derive(Clone)]
pub struct ClassService {
    class_repo: ClassRepository,
    teacher_repo: TeacherRepository,
    enrollment_repo: EnrollmentRepository,
    post_repo: PostRepository,
    user_repo: UserRepository,
    access: AccessService,
    id_gen: IdGenerator,
}

impl ClassService {
    /// Create a new class service.
    #[must_use]
    pub const fn new(
        class_repo: ClassRepository,
        teacher_repo: TeacherRepository,
        enrollment_repo: EnrollmentRepository,
        post_repo: PostRepository,
        user_repo: UserRepository,
        access: AccessService,
    ) -> Self {
        Self {
            class_repo,
            teacher_repo,
            enrollment_repo,
            post_repo,
            user_repo,
            access,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a class owned by the calling teacher.
    ///
    /// The teacher record is created on first use; the access code is
    /// redrawn until it does not collide with an existing class.
    pub async fn create(
        &self,
        caller: &user::Model,
        input: CreateClassInput,
    ) -> AppResult<ClassSummary> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if caller.role != user::UserRole::Teacher {
            return Err(AppError::Forbidden(
                "Only teachers can create classes".to_string(),
            ));
        }

        let teacher = self.find_or_create_teacher(caller).await?;
        let access_code = self.allocate_access_code().await?;

        let model = class::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            description: Set(input.description),
            access_code: Set(access_code),
            status: Set(class::ClassStatus::Active),
            teacher_id: Set(teacher.id),
            created_at: Set(Utc::now().into()),
        };

        let created = self.class_repo.create(model).await?;
        tracing::info!(class_id = %created.id, "Class created");

        Ok(ClassSummary {
            id: created.id,
            name: created.name,
            description: created.description,
            access_code: created.access_code,
            status: created.status,
            teacher_name: Some(teacher.name),
            enrollment_count: 0,
            created_at: created.created_at,
        })
    }

    /// Get the detail view of a class the caller may see.
    pub async fn get_details(&self, class_id: &str, caller: &user::Model) -> AppResult<ClassDetails> {
        let class = self.class_repo.get_by_id(class_id).await?;
        self.access.require_view_class(caller, &class).await?;

        let teacher = self.teacher_repo.find_by_id(&class.teacher_id).await?;
        let enrollment_count = self.enrollment_repo.count_by_class(&class.id).await?;
        let post_count = self.post_repo.count_by_class(&class.id).await?;

        Ok(ClassDetails {
            id: class.id,
            name: class.name,
            description: class.description,
            access_code: class.access_code,
            status: class.status,
            teacher_name: teacher.map(|t| t.name),
            enrollment_count,
            post_count,
            created_at: class.created_at,
        })
    }

    /// Update a class's name or description. Owner only.
    pub async fn update(
        &self,
        class_id: &str,
        caller: &user::Model,
        input: UpdateClassInput,
    ) -> AppResult<class::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let class = self.class_repo.get_by_id(class_id).await?;
        self.access.require_manage_class(caller, &class).await?;

        let mut active: class::ActiveModel = class.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }

        self.class_repo.update(active).await
    }

    /// Archive a class. Owner only; content stays readable.
    pub async fn archive(&self, class_id: &str, caller: &user::Model) -> AppResult<class::Model> {
        self.set_status(class_id, caller, class::ClassStatus::Archived)
            .await
    }

    /// Restore an archived class to active. Owner only.
    pub async fn restore(&self, class_id: &str, caller: &user::Model) -> AppResult<class::Model> {
        self.set_status(class_id, caller, class::ClassStatus::Active)
            .await
    }

    /// Delete a class. Owner only; posts and enrollments cascade.
    pub async fn delete(&self, class_id: &str, caller: &user::Model) -> AppResult<()> {
        let class = self.class_repo.get_by_id(class_id).await?;
        self.access.require_manage_class(caller, &class).await?;

        self.class_repo.delete(class_id).await?;
        tracing::info!(class_id = %class_id, "Class deleted");
        Ok(())
    }

    /// Enroll the calling student into the class behind an access code.
    pub async fn join(&self, caller: &user::Model, access_code: &str) -> AppResult<ClassSummary> {
        if caller.role != user::UserRole::Student {
            return Err(AppError::Forbidden(
                "Only students can join classes".to_string(),
            ));
        }

        let class = self
            .class_repo
            .find_by_access_code(access_code)
            .await?
            .ok_or_else(|| AppError::ClassNotFound(access_code.to_string()))?;

        if class.status != class::ClassStatus::Active {
            return Err(AppError::BadRequest(
                "This class is not accepting enrollments".to_string(),
            ));
        }

        let model = enrollment::ActiveModel {
            id: Set(self.id_gen.generate()),
            student_id: Set(caller.id.clone()),
            class_id: Set(class.id.clone()),
            enrolled_at: Set(Utc::now().into()),
        };

        // The unique index handles concurrent double-joins; both paths
        // end up reporting the same failure.
        match self.enrollment_repo.create(model).await {
            Ok(_) => {}
            Err(AppError::Conflict(msg)) => return Err(AppError::BadRequest(msg)),
            Err(e) => return Err(e),
        }

        tracing::info!(class_id = %class.id, student_id = %caller.id, "Student enrolled");

        let teacher = self.teacher_repo.find_by_id(&class.teacher_id).await?;
        let enrollment_count = self.enrollment_repo.count_by_class(&class.id).await?;

        Ok(ClassSummary {
            id: class.id,
            name: class.name,
            description: class.description,
            access_code: class.access_code,
            status: class.status,
            teacher_name: teacher.map(|t| t.name),
            enrollment_count,
            created_at: class.created_at,
        })
    }

    /// List the caller's classes filtered by status.
    ///
    /// Teachers get the classes their teacher record owns, students the
    /// classes they are enrolled in, admins everything.
    pub async fn list_for_user(
        &self,
        caller: &user::Model,
        status: class::ClassStatus,
    ) -> AppResult<Vec<ClassSummary>> {
        let classes = match caller.role {
            user::UserRole::Admin => self.class_repo.find_by_status(status).await?,
            user::UserRole::Teacher => {
                match self.teacher_repo.find_by_user_id(&caller.id).await? {
                    Some(teacher) => self.class_repo.find_by_teacher(&teacher.id, status).await?,
                    None => Vec::new(),
                }
            }
            user::UserRole::Student => {
                let enrollments = self.enrollment_repo.find_by_student(&caller.id).await?;
                let mut classes = Vec::with_capacity(enrollments.len());
                for enrollment in enrollments {
                    if let Some(class) = self.class_repo.find_by_id(&enrollment.class_id).await? {
                        if class.status == status {
                            classes.push(class);
                        }
                    }
                }
                classes
            }
        };

        let mut summaries = Vec::with_capacity(classes.len());
        for class in classes {
            let teacher = self.teacher_repo.find_by_id(&class.teacher_id).await?;
            let enrollment_count = self.enrollment_repo.count_by_class(&class.id).await?;
            summaries.push(ClassSummary {
                id: class.id,
                name: class.name,
                description: class.description,
                access_code: class.access_code,
                status: class.status,
                teacher_name: teacher.map(|t| t.name),
                enrollment_count,
                created_at: class.created_at,
            });
        }

        Ok(summaries)
    }

    /// List the enrolled students of a class the caller may see.
    pub async fn list_students(
        &self,
        class_id: &str,
        caller: &user::Model,
    ) -> AppResult<Vec<StudentSummary>> {
        let class = self.class_repo.get_by_id(class_id).await?;
        self.access.require_view_class(caller, &class).await?;

        let enrollments = self.enrollment_repo.find_by_class(&class.id).await?;

        let mut students = Vec::with_capacity(enrollments.len());
        for enrollment in enrollments {
            let Some(student) = self.user_repo.find_by_id(&enrollment.student_id).await? else {
                tracing::warn!(
                    student_id = %enrollment.student_id,
                    "Enrollment points at a missing user, skipping"
                );
                continue;
            };
            let post_count = self
                .post_repo
                .count_by_owner_in_class(&student.id, &class.id)
                .await?;
            students.push(StudentSummary {
                display_name: student.display_name(),
                id: student.id,
                username: student.username,
                email: student.email,
                first_name: student.first_name,
                last_name: student.last_name,
                post_count,
            });
        }

        Ok(students)
    }

    /// Unenroll the calling student from a class.
    pub async fn leave(&self, class_id: &str, caller: &user::Model) -> AppResult<()> {
        let class = self.class_repo.get_by_id(class_id).await?;

        if !self.enrollment_repo.is_enrolled(&caller.id, &class.id).await? {
            return Err(AppError::BadRequest(
                "Not enrolled in this class".to_string(),
            ));
        }

        self.enrollment_repo
            .delete_by_student_and_class(&caller.id, &class.id)
            .await?;
        tracing::info!(class_id = %class.id, student_id = %caller.id, "Student unenrolled");
        Ok(())
    }

    async fn set_status(
        &self,
        class_id: &str,
        caller: &user::Model,
        status: class::ClassStatus,
    ) -> AppResult<class::Model> {
        let class = self.class_repo.get_by_id(class_id).await?;
        self.access.require_manage_class(caller, &class).await?;

        let mut active: class::ActiveModel = class.into();
        active.status = Set(status);
        let updated = self.class_repo.update(active).await?;
        tracing::info!(class_id = %class_id, status = ?status, "Class status changed");
        Ok(updated)
    }

    async fn find_or_create_teacher(&self, caller: &user::Model) -> AppResult<teacher::Model> {
        if let Some(teacher) = self.teacher_repo.find_by_user_id(&caller.id).await? {
            return Ok(teacher);
        }

        let model = teacher::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(caller.display_name()),
            email: Set(caller.email.clone()),
            user_id: Set(caller.id.clone()),
            created_at: Set(Utc::now().into()),
        };
        self.teacher_repo.create(model).await
    }

    async fn allocate_access_code(&self) -> AppResult<String> {
        for _ in 0..ACCESS_CODE_ATTEMPTS {
            let code = generate_access_code();
            if !self.class_repo.access_code_exists(&code).await? {
                return Ok(code);
            }
        }
        Err(AppError::Internal(
            "Could not allocate a unique access code".to_string(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn create_test_user(id: &str, role: user::UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user-{id}"),
            email: format!("{id}@example.com"),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            role,
            is_admin: false,
            bio: None,
            profile_image: None,
            token: None,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_teacher(id: &str, user_id: &str) -> teacher::Model {
        teacher::Model {
            id: id.to_string(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_class(id: &str, teacher_id: &str, status: class::ClassStatus) -> class::Model {
        class::Model {
            id: id.to_string(),
            name: "Literature 101".to_string(),
            description: None,
            access_code: "AB12CD".to_string(),
            status,
            teacher_id: teacher_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn count_row(n: i64) -> BTreeMap<&'static str, sea_orm::Value> {
        maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(n))
        }
    }

    fn empty_db() -> MockDatabase {
        MockDatabase::new(DatabaseBackend::Postgres)
    }

    #[allow(clippy::needless_pass_by_value)]
    fn service(
        class_db: MockDatabase,
        teacher_db: MockDatabase,
        enrollment_db: MockDatabase,
        post_db: MockDatabase,
        user_db: MockDatabase,
        access_teacher_db: MockDatabase,
        access_enrollment_db: MockDatabase,
    ) -> ClassService {
        let access = AccessService::new(
            TeacherRepository::new(Arc::new(access_teacher_db.into_connection())),
            EnrollmentRepository::new(Arc::new(access_enrollment_db.into_connection())),
        );
        ClassService::new(
            ClassRepository::new(Arc::new(class_db.into_connection())),
            TeacherRepository::new(Arc::new(teacher_db.into_connection())),
            EnrollmentRepository::new(Arc::new(enrollment_db.into_connection())),
            PostRepository::new(Arc::new(post_db.into_connection())),
            UserRepository::new(Arc::new(user_db.into_connection())),
            access,
        )
    }

    #[tokio::test]
    async fn test_create_forbidden_for_students() {
        let svc = service(
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
        );

        let student = create_test_user("u1", user::UserRole::Student);
        let input = CreateClassInput {
            name: "Literature 101".to_string(),
            description: None,
        };

        match svc.create(&student, input).await {
            Err(AppError::Forbidden(_)) => {}
            _ => panic!("Expected Forbidden error"),
        }
    }

    #[tokio::test]
    async fn test_create_with_existing_teacher_record() {
        let teacher_user = create_test_user("u1", user::UserRole::Teacher);
        let created = create_test_class("c1", "t1", class::ClassStatus::Active);

        let class_db = empty_db()
            // access code is free
            .append_query_results([Vec::<class::Model>::new()])
            // insert returns the row
            .append_query_results([[created]]);
        let teacher_db = empty_db().append_query_results([[create_test_teacher("t1", "u1")]]);

        let svc = service(
            class_db,
            teacher_db,
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
        );

        let input = CreateClassInput {
            name: "Literature 101".to_string(),
            description: None,
        };
        let summary = svc.create(&teacher_user, input).await.unwrap();

        assert_eq!(summary.id, "c1");
        assert_eq!(summary.enrollment_count, 0);
        assert_eq!(summary.teacher_name.as_deref(), Some("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_join_unknown_code() {
        let class_db = empty_db().append_query_results([Vec::<class::Model>::new()]);

        let svc = service(
            class_db,
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
        );

        let student = create_test_user("u1", user::UserRole::Student);
        match svc.join(&student, "NOCODE").await {
            Err(AppError::ClassNotFound(_)) => {}
            _ => panic!("Expected ClassNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_join_archived_class_rejected() {
        let class_db = empty_db()
            .append_query_results([[create_test_class("c1", "t1", class::ClassStatus::Archived)]]);

        let svc = service(
            class_db,
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
        );

        let student = create_test_user("u1", user::UserRole::Student);
        match svc.join(&student, "AB12CD").await {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("not accepting")),
            _ => panic!("Expected BadRequest error"),
        }
    }

    #[tokio::test]
    async fn test_join_forbidden_for_teachers() {
        let svc = service(
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
        );

        let teacher = create_test_user("u1", user::UserRole::Teacher);
        match svc.join(&teacher, "AB12CD").await {
            Err(AppError::Forbidden(_)) => {}
            _ => panic!("Expected Forbidden error"),
        }
    }

    #[tokio::test]
    async fn test_list_for_teacher_without_record_is_empty() {
        let teacher_db = empty_db().append_query_results([Vec::<teacher::Model>::new()]);

        let svc = service(
            empty_db(),
            teacher_db,
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
        );

        let teacher = create_test_user("u1", user::UserRole::Teacher);
        let result = svc
            .list_for_user(&teacher, class::ClassStatus::Active)
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_list_for_student_filters_status() {
        let active = create_test_class("c1", "t1", class::ClassStatus::Active);
        let archived = create_test_class("c2", "t1", class::ClassStatus::Archived);

        let e1 = enrollment::Model {
            id: "e1".to_string(),
            student_id: "u1".to_string(),
            class_id: "c1".to_string(),
            enrolled_at: Utc::now().into(),
        };
        let e2 = enrollment::Model {
            id: "e2".to_string(),
            student_id: "u1".to_string(),
            class_id: "c2".to_string(),
            enrolled_at: Utc::now().into(),
        };

        let class_db = empty_db()
            .append_query_results([[active]])
            .append_query_results([[archived]]);
        let enrollment_db = empty_db()
            .append_query_results([[e1, e2]])
            // enrollment count for the surviving class
            .append_query_results([[count_row(12)]]);
        let teacher_db = empty_db().append_query_results([[create_test_teacher("t1", "u9")]]);

        let svc = service(
            class_db,
            teacher_db,
            enrollment_db,
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
        );

        let student = create_test_user("u1", user::UserRole::Student);
        let result = svc
            .list_for_user(&student, class::ClassStatus::Active)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "c1");
        assert_eq!(result[0].enrollment_count, 12);
    }

    #[tokio::test]
    async fn test_archive_requires_ownership() {
        let class_db =
            empty_db().append_query_results([[create_test_class("c1", "t1", class::ClassStatus::Active)]]);
        // Caller's teacher record owns a different class
        let access_teacher_db =
            empty_db().append_query_results([[create_test_teacher("t-other", "u1")]]);

        let svc = service(
            class_db,
            empty_db(),
            empty_db(),
            empty_db(),
            empty_db(),
            access_teacher_db,
            empty_db(),
        );

        let teacher = create_test_user("u1", user::UserRole::Teacher);
        match svc.archive("c1", &teacher).await {
            Err(AppError::Forbidden(_)) => {}
            _ => panic!("Expected Forbidden error"),
        }
    }
}
