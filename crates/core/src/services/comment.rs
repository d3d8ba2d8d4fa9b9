//! Comment service: threaded comment trees on posts.
//!
//! Comments form a forest under each post. Roots are paginated newest
//! first; replies under each root are expanded oldest first down to a
//! depth bound, so one page request never explodes into an unbounded
//! tree walk. Deeper replies are summarized by a count and fetched on
//! demand through [`CommentService::get_replies`].
//!
//! Every operation resolves the post's class and consults the access
//! policy first: discussion is only visible to users who can view the
//! class, and only they may write to it.

use std::future::Future;
use std::pin::Pin;

use chrono::Utc;
use litblogs_common::{AppError, AppResult, IdGenerator};
use litblogs_db::entities::{comment, user};
use litblogs_db::repositories::{
    ClassRepository, CommentLikeRepository, CommentRepository, PostRepository, UserRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::access::AccessService;
use crate::services::author::AuthorSummary;

/// How many reply levels are expanded inline under each root comment.
/// The root itself is depth 0.
pub const DEFAULT_MAX_DEPTH: u64 = 3;

/// Input for creating a comment or a reply.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
    pub parent_id: Option<String>,
}

/// One comment in an expanded tree.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentNode {
    pub id: String,
    pub content: String,
    pub parent_id: Option<String>,
    pub author: AuthorSummary,
    pub like_count: u64,
    pub user_liked: bool,
    /// Direct children expanded inline (empty at the depth bound).
    pub replies: Vec<CommentNode>,
    /// True count of direct children, even when none are expanded.
    pub reply_count: u64,
    /// Whether children exist beyond what `replies` carries.
    pub has_more_replies: bool,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub updated_at: Option<chrono::DateTime<chrono::FixedOffset>>,
}

/// One page of root comments with their expanded subtrees.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentTreePage {
    pub comments: Vec<CommentNode>,
    /// Total number of root comments on the post.
    pub total: u64,
    pub has_more: bool,
}

/// One reply in a flat reply page (children are not expanded).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyNode {
    pub id: String,
    pub content: String,
    pub parent_id: Option<String>,
    pub author: AuthorSummary,
    pub like_count: u64,
    pub user_liked: bool,
    pub reply_count: u64,
    pub has_replies: bool,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub updated_at: Option<chrono::DateTime<chrono::FixedOffset>>,
}

/// One page of direct replies under a comment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyPage {
    pub replies: Vec<ReplyNode>,
    pub total: u64,
    pub has_more: bool,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    class_repo: ClassRepository,
    user_repo: UserRepository,
    comment_like_repo: CommentLikeRepository,
    access: AccessService,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        post_repo: PostRepository,
        class_repo: ClassRepository,
        user_repo: UserRepository,
        comment_like_repo: CommentLikeRepository,
        access: AccessService,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
            class_repo,
            user_repo,
            comment_like_repo,
            access,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get one page of the comment tree for a post.
    ///
    /// The caller must be able to view the post's class. Roots come
    /// back newest first; each root carries its reply subtree expanded
    /// down to `max_depth` levels. `total` and `has_more` describe the
    /// root page only.
    pub async fn get_comment_tree(
        &self,
        post_id: &str,
        caller: &user::Model,
        skip: u64,
        limit: u64,
        max_depth: u64,
    ) -> AppResult<CommentTreePage> {
        let post = self.post_repo.get_by_id(post_id).await?;
        let class = self.class_repo.get_by_id(&post.class_id).await?;
        self.access.require_view_class(caller, &class).await?;

        let roots = self.comment_repo.find_root_page(post_id, skip, limit).await?;

        let mut comments = Vec::with_capacity(roots.len());
        for root in roots {
            comments.push(self.build_node(root, &caller.id, 0, max_depth).await?);
        }

        let total = self.comment_repo.count_roots(post_id).await?;

        Ok(CommentTreePage {
            comments,
            total,
            has_more: total > skip + limit,
        })
    }

    /// Get one page of direct replies under a comment, oldest first.
    ///
    /// Used to expand branches the depth bound left summarized; gated
    /// by view access on the enclosing class like the tree itself.
    pub async fn get_replies(
        &self,
        comment_id: &str,
        caller: &user::Model,
        skip: u64,
        limit: u64,
    ) -> AppResult<ReplyPage> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;
        let post = self.post_repo.get_by_id(&comment.post_id).await?;
        let class = self.class_repo.get_by_id(&post.class_id).await?;
        self.access.require_view_class(caller, &class).await?;

        let children = self
            .comment_repo
            .find_children_page(comment_id, skip, limit)
            .await?;

        let mut replies = Vec::with_capacity(children.len());
        for child in children {
            replies.push(self.build_reply_node(child, &caller.id).await?);
        }

        let total = self.comment_repo.count_children(comment_id).await?;

        Ok(ReplyPage {
            replies,
            total,
            has_more: total > skip + limit,
        })
    }

    /// Create a comment on a post, optionally as a reply.
    ///
    /// The caller must be allowed to post in the class (students must
    /// be enrolled). A reply's parent must exist and belong to the
    /// same post; a parent id pointing into another post reads as
    /// missing.
    pub async fn create_comment(
        &self,
        post_id: &str,
        caller: &user::Model,
        input: CreateCommentInput,
    ) -> AppResult<CommentNode> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if input.content.trim().is_empty() {
            return Err(AppError::Validation(
                "Comment content cannot be empty".to_string(),
            ));
        }

        let post = self.post_repo.get_by_id(post_id).await?;
        let class = self.class_repo.get_by_id(&post.class_id).await?;
        self.access.require_post_in_class(caller, &class).await?;

        if let Some(ref parent_id) = input.parent_id {
            self.comment_repo
                .find_in_post(parent_id, post_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Parent comment not found".to_string()))?;
        }

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            content: Set(input.content),
            user_id: Set(caller.id.clone()),
            post_id: Set(post_id.to_string()),
            parent_id: Set(input.parent_id),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.comment_repo.create(model).await?;
        tracing::debug!(comment_id = %created.id, post_id = %post_id, "Comment created");

        Ok(CommentNode {
            id: created.id,
            content: created.content,
            parent_id: created.parent_id,
            author: AuthorSummary::from_user(caller),
            like_count: 0,
            user_liked: false,
            replies: Vec::new(),
            reply_count: 0,
            has_more_replies: false,
            created_at: created.created_at,
            updated_at: created.updated_at,
        })
    }

    /// Delete a comment. Only the comment author may delete it; the
    /// reply subtree goes with it.
    pub async fn delete_comment(&self, comment_id: &str, caller: &user::Model) -> AppResult<()> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;

        if comment.user_id != caller.id {
            return Err(AppError::Forbidden(
                "Not authorized to delete this comment".to_string(),
            ));
        }

        self.comment_repo.delete(comment_id).await?;
        tracing::debug!(comment_id = %comment_id, "Comment deleted");
        Ok(())
    }

    async fn author_summary(&self, user_id: &str) -> AppResult<AuthorSummary> {
        match self.user_repo.find_by_id(user_id).await? {
            Some(user) => Ok(AuthorSummary::from_user(&user)),
            None => {
                tracing::warn!(user_id = %user_id, "Comment author missing, using placeholder");
                Ok(AuthorSummary::unknown(user_id))
            }
        }
    }

    /// Recursively expand a comment into a tree node.
    ///
    /// Expansion stops at `max_depth`: nodes at the bound keep their
    /// true `reply_count` but carry no inline replies, and
    /// `has_more_replies` flags the cut branch.
    fn build_node<'a>(
        &'a self,
        comment: comment::Model,
        viewer_id: &'a str,
        depth: u64,
        max_depth: u64,
    ) -> Pin<Box<dyn Future<Output = AppResult<CommentNode>> + Send + 'a>> {
        Box::pin(async move {
            let author = self.author_summary(&comment.user_id).await?;
            let like_count = self.comment_like_repo.count_by_comment(&comment.id).await?;
            let user_liked = self
                .comment_like_repo
                .has_liked(viewer_id, &comment.id)
                .await?;
            let reply_count = self.comment_repo.count_children(&comment.id).await?;

            let mut replies = Vec::new();
            if depth < max_depth && reply_count > 0 {
                let children = self.comment_repo.find_children(&comment.id).await?;
                replies.reserve(children.len());
                for child in children {
                    replies.push(
                        self.build_node(child, viewer_id, depth + 1, max_depth)
                            .await?,
                    );
                }
            }

            let has_more_replies = reply_count > replies.len() as u64;

            Ok(CommentNode {
                id: comment.id,
                content: comment.content,
                parent_id: comment.parent_id,
                author,
                like_count,
                user_liked,
                replies,
                reply_count,
                has_more_replies,
                created_at: comment.created_at,
                updated_at: comment.updated_at,
            })
        })
    }

    async fn build_reply_node(
        &self,
        comment: comment::Model,
        viewer_id: &str,
    ) -> AppResult<ReplyNode> {
        let author = self.author_summary(&comment.user_id).await?;
        let like_count = self.comment_like_repo.count_by_comment(&comment.id).await?;
        let user_liked = self
            .comment_like_repo
            .has_liked(viewer_id, &comment.id)
            .await?;
        let reply_count = self.comment_repo.count_children(&comment.id).await?;

        Ok(ReplyNode {
            id: comment.id,
            content: comment.content,
            parent_id: comment.parent_id,
            author,
            like_count,
            user_liked,
            reply_count,
            has_replies: reply_count > 0,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        })
    }
}
