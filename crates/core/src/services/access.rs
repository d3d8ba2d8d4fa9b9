//! Access policy for classes and posts.
//!
//! Every content route funnels through these checks:
//!
//! - admins see every class
//! - teachers see the classes their teacher record owns
//! - students see the classes they are enrolled in
//!
//! Post mutation is stricter than viewing: only the owning author may
//! edit or delete a post, regardless of role.

use litblogs_common::{AppError, AppResult};
use litblogs_db::entities::{class, post, user};
use litblogs_db::repositories::{EnrollmentRepository, TeacherRepository};

/// Service answering "may this user touch this resource" questions.
#[derive(Clone)]
pub struct AccessService {
    teacher_repo: TeacherRepository,
    enrollment_repo: EnrollmentRepository,
}

impl AccessService {
    /// Create a new access service.
    #[must_use]
    pub const fn new(teacher_repo: TeacherRepository, enrollment_repo: EnrollmentRepository) -> Self {
        Self {
            teacher_repo,
            enrollment_repo,
        }
    }

    /// Whether the user's teacher record owns the class.
    async fn owns_class(&self, user: &user::Model, class: &class::Model) -> AppResult<bool> {
        let teacher = self.teacher_repo.find_by_user_id(&user.id).await?;
        Ok(teacher.is_some_and(|t| t.id == class.teacher_id))
    }

    /// Whether the user may view the class and its content.
    pub async fn can_view_class(
        &self,
        user: &user::Model,
        class: &class::Model,
    ) -> AppResult<bool> {
        match user.role {
            user::UserRole::Admin => Ok(true),
            user::UserRole::Teacher => self.owns_class(user, class).await,
            user::UserRole::Student => self.enrollment_repo.is_enrolled(&user.id, &class.id).await,
        }
    }

    /// Require view access, failing with `Forbidden` otherwise.
    pub async fn require_view_class(
        &self,
        user: &user::Model,
        class: &class::Model,
    ) -> AppResult<()> {
        if self.can_view_class(user, class).await? {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Not authorized to view this class".to_string(),
            ))
        }
    }

    /// Whether the user may create posts in the class.
    ///
    /// Same rules as viewing; a student must be enrolled before posting.
    pub async fn can_post_in_class(
        &self,
        user: &user::Model,
        class: &class::Model,
    ) -> AppResult<bool> {
        self.can_view_class(user, class).await
    }

    /// Require posting access, failing with `Forbidden` otherwise.
    pub async fn require_post_in_class(
        &self,
        user: &user::Model,
        class: &class::Model,
    ) -> AppResult<()> {
        if self.can_post_in_class(user, class).await? {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Not enrolled in this class".to_string(),
            ))
        }
    }

    /// Whether the user may edit or delete the post. Owner only; there
    /// is no teacher or admin override for authored content.
    #[must_use]
    pub fn can_mutate_post(user: &user::Model, post: &post::Model) -> bool {
        user.id == post.user_id
    }

    /// Whether the user may manage (archive, restore, delete) the class.
    pub async fn can_manage_class(
        &self,
        user: &user::Model,
        class: &class::Model,
    ) -> AppResult<bool> {
        if user.role != user::UserRole::Teacher {
            return Ok(false);
        }
        self.owns_class(user, class).await
    }

    /// Require management access, failing with `Forbidden` otherwise.
    pub async fn require_manage_class(
        &self,
        user: &user::Model,
        class: &class::Model,
    ) -> AppResult<()> {
        if self.can_manage_class(user, class).await? {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "You can only manage your own classes".to_string(),
            ))
        }
    }
}
