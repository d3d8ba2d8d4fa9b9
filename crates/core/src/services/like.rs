//! Like service: toggle-style engagement on posts and comments.
//!
//! A like is a (user, target) row guarded by a unique index. Toggling
//! reads the current state and flips it; when two toggles race, the
//! index arbitrates and the loser's outcome is folded into "liked"
//! rather than surfaced as an error.
//!
//! Likes are class-scoped engagement: the target's class is resolved
//! and the caller must be able to view it before the toggle runs.

use chrono::Utc;
use litblogs_common::{AppError, AppResult, IdGenerator};
use litblogs_db::entities::{comment_like, post_like, user};
use litblogs_db::repositories::{
    ClassRepository, CommentLikeRepository, CommentRepository, PostLikeRepository, PostRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::services::access::AccessService;

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeAction {
    Liked,
    Unliked,
}

/// Kind of likeable target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeTarget {
    Post,
    Comment,
}

/// Outcome of a toggle, with the fresh count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResult {
    pub action: LikeAction,
    pub target: LikeTarget,
    pub target_id: String,
    pub like_count: u64,
}

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    post_repo: PostRepository,
    comment_repo: CommentRepository,
    class_repo: ClassRepository,
    post_like_repo: PostLikeRepository,
    comment_like_repo: CommentLikeRepository,
    access: AccessService,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        comment_repo: CommentRepository,
        class_repo: ClassRepository,
        post_like_repo: PostLikeRepository,
        comment_like_repo: CommentLikeRepository,
        access: AccessService,
    ) -> Self {
        Self {
            post_repo,
            comment_repo,
            class_repo,
            post_like_repo,
            comment_like_repo,
            access,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle a like on a post or a comment.
    pub async fn toggle(
        &self,
        target: LikeTarget,
        target_id: &str,
        caller: &user::Model,
    ) -> AppResult<ToggleResult> {
        match target {
            LikeTarget::Post => self.toggle_post(target_id, caller).await,
            LikeTarget::Comment => self.toggle_comment(target_id, caller).await,
        }
    }

    async fn require_class_view(&self, class_id: &str, caller: &user::Model) -> AppResult<()> {
        let class = self.class_repo.get_by_id(class_id).await?;
        self.access.require_view_class(caller, &class).await
    }

    async fn toggle_post(&self, post_id: &str, caller: &user::Model) -> AppResult<ToggleResult> {
        let post = self.post_repo.get_by_id(post_id).await?;
        self.require_class_view(&post.class_id, caller).await?;

        let action = if self
            .post_like_repo
            .find_by_user_and_post(&caller.id, post_id)
            .await?
            .is_some()
        {
            self.post_like_repo
                .delete_by_user_and_post(&caller.id, post_id)
                .await?;
            LikeAction::Unliked
        } else {
            let model = post_like::ActiveModel {
                id: Set(self.id_gen.generate()),
                post_id: Set(post_id.to_string()),
                user_id: Set(caller.id.clone()),
                created_at: Set(Utc::now().into()),
            };
            resolve_insert(self.post_like_repo.create(model).await.map(|_| ()))?
        };

        let like_count = self.post_like_repo.count_by_post(post_id).await?;

        Ok(ToggleResult {
            action,
            target: LikeTarget::Post,
            target_id: post_id.to_string(),
            like_count,
        })
    }

    async fn toggle_comment(
        &self,
        comment_id: &str,
        caller: &user::Model,
    ) -> AppResult<ToggleResult> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;
        let post = self.post_repo.get_by_id(&comment.post_id).await?;
        self.require_class_view(&post.class_id, caller).await?;

        let action = if self
            .comment_like_repo
            .find_by_user_and_comment(&caller.id, comment_id)
            .await?
            .is_some()
        {
            self.comment_like_repo
                .delete_by_user_and_comment(&caller.id, comment_id)
                .await?;
            LikeAction::Unliked
        } else {
            let model = comment_like::ActiveModel {
                id: Set(self.id_gen.generate()),
                comment_id: Set(comment_id.to_string()),
                user_id: Set(caller.id.clone()),
                created_at: Set(Utc::now().into()),
            };
            resolve_insert(self.comment_like_repo.create(model).await.map(|_| ()))?
        };

        let like_count = self.comment_like_repo.count_by_comment(comment_id).await?;

        Ok(ToggleResult {
            action,
            target: LikeTarget::Comment,
            target_id: comment_id.to_string(),
            like_count,
        })
    }
}

/// Fold a racing insert into a consistent outcome.
///
/// When two toggles race the unique index, the losing insert comes
/// back as `Conflict`; both callers then agree the state is "liked".
fn resolve_insert(result: AppResult<()>) -> AppResult<LikeAction> {
    match result {
        Ok(()) => Ok(LikeAction::Liked),
        Err(AppError::Conflict(_)) => {
            tracing::debug!("Concurrent like insert lost the race, treating as liked");
            Ok(LikeAction::Liked)
        }
        Err(e) => Err(e),
    }
}
