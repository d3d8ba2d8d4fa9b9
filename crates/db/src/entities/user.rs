//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "teacher")]
    Teacher,
    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique, indexed)]
    pub username: String,

    #[sea_orm(unique, indexed)]
    pub email: String,

    #[sea_orm(nullable)]
    pub first_name: Option<String>,

    #[sea_orm(nullable)]
    pub last_name: Option<String>,

    pub role: UserRole,

    /// Site-wide admin flag (distinct from the admin role)
    #[sea_orm(default_value = false)]
    pub is_admin: bool,

    #[sea_orm(nullable)]
    pub bio: Option<String>,

    #[sea_orm(nullable)]
    pub profile_image: Option<String>,

    /// Opaque API token (issued by the external auth layer)
    #[sea_orm(nullable)]
    pub token: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Display name for author summaries ("First Last", falling back to
    /// the username when no name is set).
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,

    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollment,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with_names(first: Option<&str>, last: Option<&str>, username: &str) -> Model {
        Model {
            id: "u1".to_string(),
            username: username.to_string(),
            email: "u@example.com".to_string(),
            first_name: first.map(ToString::to_string),
            last_name: last.map(ToString::to_string),
            role: UserRole::Student,
            is_admin: false,
            bio: None,
            profile_image: None,
            token: None,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_display_name_full() {
        let user = user_with_names(Some("Ada"), Some("Lovelace"), "ada");
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_display_name_partial() {
        let user = user_with_names(Some("Ada"), None, "ada");
        assert_eq!(user.display_name(), "Ada");
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let user = user_with_names(None, None, "ada");
        assert_eq!(user.display_name(), "ada");
    }
}
