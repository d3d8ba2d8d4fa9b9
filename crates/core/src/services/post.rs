//! Post service: class-scoped blog posts.
//!
//! Post bodies are rich-text HTML and are sanitized on every write;
//! see [`crate::sanitize`]. Views carry the engagement counts and the
//! author summary the feed renders from.

use chrono::Utc;
use litblogs_common::{AppError, AppResult, IdGenerator};
use litblogs_db::entities::{post, user};
use litblogs_db::repositories::{
    ClassRepository, CommentRepository, PostLikeRepository, PostRepository, UserRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::sanitize::clean_html;
use crate::services::access::AccessService;
use crate::services::author::AuthorSummary;

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
}

/// Input for updating a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
}

/// Post as rendered in feeds and detail pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub class_id: String,
    pub author: AuthorSummary,
    pub like_count: u64,
    pub comment_count: u64,
    pub user_liked: bool,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub updated_at: Option<chrono::DateTime<chrono::FixedOffset>>,
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    class_repo: ClassRepository,
    user_repo: UserRepository,
    comment_repo: CommentRepository,
    post_like_repo: PostLikeRepository,
    access: AccessService,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        class_repo: ClassRepository,
        user_repo: UserRepository,
        comment_repo: CommentRepository,
        post_like_repo: PostLikeRepository,
        access: AccessService,
    ) -> Self {
        Self {
            post_repo,
            class_repo,
            user_repo,
            comment_repo,
            post_like_repo,
            access,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a post in a class the caller may post in.
    pub async fn create(
        &self,
        class_id: &str,
        caller: &user::Model,
        input: CreatePostInput,
    ) -> AppResult<PostView> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let class = self.class_repo.get_by_id(class_id).await?;
        self.access.require_post_in_class(caller, &class).await?;

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            content: Set(clean_html(&input.content)),
            user_id: Set(caller.id.clone()),
            class_id: Set(class.id.clone()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.post_repo.create(model).await?;
        tracing::info!(post_id = %created.id, class_id = %class_id, "Post created");

        Ok(PostView {
            id: created.id,
            title: created.title,
            content: created.content,
            class_id: created.class_id,
            author: AuthorSummary::from_user(caller),
            like_count: 0,
            comment_count: 0,
            user_liked: false,
            created_at: created.created_at,
            updated_at: created.updated_at,
        })
    }

    /// List the posts of a class the caller may view, newest first.
    pub async fn list(&self, class_id: &str, caller: &user::Model) -> AppResult<Vec<PostView>> {
        let class = self.class_repo.get_by_id(class_id).await?;
        self.access.require_view_class(caller, &class).await?;

        let posts = self.post_repo.find_by_class(&class.id).await?;

        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            views.push(self.build_view(post, &caller.id).await?);
        }
        Ok(views)
    }

    /// Get one post within a class the caller may view.
    pub async fn get(
        &self,
        class_id: &str,
        post_id: &str,
        caller: &user::Model,
    ) -> AppResult<PostView> {
        let class = self.class_repo.get_by_id(class_id).await?;
        self.access.require_view_class(caller, &class).await?;

        let post = self.post_repo.get_in_class(post_id, &class.id).await?;
        self.build_view(post, &caller.id).await
    }

    /// Update a post. Owner only.
    pub async fn update(
        &self,
        class_id: &str,
        post_id: &str,
        caller: &user::Model,
        input: UpdatePostInput,
    ) -> AppResult<PostView> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let post = self.post_repo.get_in_class(post_id, class_id).await?;
        if !AccessService::can_mutate_post(caller, &post) {
            return Err(AppError::Forbidden(
                "Not authorized to edit this post".to_string(),
            ));
        }

        let mut active: post::ActiveModel = post.into();
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(content) = input.content {
            active.content = Set(clean_html(&content));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.post_repo.update(active).await?;
        self.build_view(updated, &caller.id).await
    }

    /// Delete a post. Owner only; comments and likes cascade.
    pub async fn delete(
        &self,
        class_id: &str,
        post_id: &str,
        caller: &user::Model,
    ) -> AppResult<()> {
        let post = self.post_repo.get_in_class(post_id, class_id).await?;
        if !AccessService::can_mutate_post(caller, &post) {
            return Err(AppError::Forbidden(
                "Not authorized to delete this post".to_string(),
            ));
        }

        self.post_repo.delete(post_id).await?;
        tracing::info!(post_id = %post_id, "Post deleted");
        Ok(())
    }

    async fn build_view(&self, post: post::Model, viewer_id: &str) -> AppResult<PostView> {
        let author = match self.user_repo.find_by_id(&post.user_id).await? {
            Some(user) => AuthorSummary::from_user(&user),
            None => {
                tracing::warn!(user_id = %post.user_id, "Post author missing, using placeholder");
                AuthorSummary::unknown(&post.user_id)
            }
        };
        let like_count = self.post_like_repo.count_by_post(&post.id).await?;
        let comment_count = self.comment_repo.count_by_post(&post.id).await?;
        let user_liked = self.post_like_repo.has_liked(viewer_id, &post.id).await?;

        Ok(PostView {
            id: post.id,
            title: post.title,
            content: post.content,
            class_id: post.class_id,
            author,
            like_count,
            comment_count,
            user_liked,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
    }
}
