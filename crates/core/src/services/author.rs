//! Author summaries attached to posts and comments.

use litblogs_db::entities::user;
use serde::Serialize;

/// Author details embedded in post and comment views.
///
/// When the author row is gone (deleted account with surviving content)
/// the summary degrades to a placeholder instead of failing the whole
/// listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image: Option<String>,
    pub display_name: String,
}

impl AuthorSummary {
    /// Build a summary from a user row.
    #[must_use]
    pub fn from_user(user: &user::Model) -> Self {
        Self {
            id: user.id.clone(),
            username: Some(user.username.clone()),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile_image: user.profile_image.clone(),
            display_name: user.display_name(),
        }
    }

    /// Placeholder for a dangling author reference.
    #[must_use]
    pub fn unknown(user_id: &str) -> Self {
        Self {
            id: user_id.to_string(),
            username: None,
            first_name: None,
            last_name: None,
            profile_image: None,
            display_name: "Unknown Author".to_string(),
        }
    }
}
