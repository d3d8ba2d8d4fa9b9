//! User service: authentication lookup and account administration.

use litblogs_common::{AppError, AppResult};
use litblogs_db::entities::user;
use litblogs_db::repositories::UserRepository;
use serde::Serialize;

/// Profile view of a user account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: String,
    pub role: user::UserRole,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
}

impl From<user::Model> for UserProfile {
    fn from(user: user::Model) -> Self {
        Self {
            display_name: user.display_name(),
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            bio: user.bio,
            profile_image: user.profile_image,
        }
    }
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Resolve an API token to the account behind it.
    ///
    /// Tokens are opaque values issued by the external auth layer; a
    /// token that matches no account is an authentication failure, not
    /// a missing resource.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Get a user's profile.
    pub async fn get_profile(&self, user_id: &str) -> AppResult<UserProfile> {
        Ok(self.user_repo.get_by_id(user_id).await?.into())
    }

    /// Change a user's role. Site admins only.
    pub async fn update_role(
        &self,
        caller: &user::Model,
        user_id: &str,
        role: user::UserRole,
    ) -> AppResult<UserProfile> {
        if !caller.is_admin {
            return Err(AppError::Forbidden(
                "Not authorized to change roles".to_string(),
            ));
        }

        let updated = self.user_repo.update_role(user_id, role).await?;
        tracing::info!(user_id = %user_id, role = ?role, "User role changed");
        Ok(updated.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, role: user::UserRole, is_admin: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user-{id}"),
            email: format!("{id}@example.com"),
            first_name: None,
            last_name: None,
            role,
            is_admin,
            bio: None,
            profile_image: None,
            token: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_authenticate_unknown_token() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let svc = UserService::new(UserRepository::new(db));
        match svc.authenticate_by_token("bogus").await {
            Err(AppError::Unauthorized) => {}
            _ => panic!("Expected Unauthorized error"),
        }
    }

    #[tokio::test]
    async fn test_authenticate_known_token() {
        let mut user = create_test_user("u1", user::UserRole::Teacher, false);
        user.token = Some("tok".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let svc = UserService::new(UserRepository::new(db));
        let resolved = svc.authenticate_by_token("tok").await.unwrap();
        assert_eq!(resolved.id, "u1");
    }

    #[tokio::test]
    async fn test_update_role_requires_admin() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let svc = UserService::new(UserRepository::new(db));

        let caller = create_test_user("u1", user::UserRole::Teacher, false);
        match svc
            .update_role(&caller, "u2", user::UserRole::Teacher)
            .await
        {
            Err(AppError::Forbidden(_)) => {}
            _ => panic!("Expected Forbidden error"),
        }
    }

    #[tokio::test]
    async fn test_get_profile_display_name() {
        let mut user = create_test_user("u1", user::UserRole::Student, false);
        user.first_name = Some("Ada".to_string());
        user.last_name = Some("Lovelace".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let svc = UserService::new(UserRepository::new(db));
        let profile = svc.get_profile("u1").await.unwrap();
        assert_eq!(profile.display_name, "Ada Lovelace");
    }
}
