//! Business logic services.

pub mod access;
pub mod author;
pub mod class;
pub mod comment;
pub mod like;
pub mod post;
pub mod user;

pub use access::AccessService;
pub use author::AuthorSummary;
pub use class::{
    ClassDetails, ClassService, ClassSummary, CreateClassInput, StudentSummary, UpdateClassInput,
};
pub use comment::{
    CommentNode, CommentService, CommentTreePage, CreateCommentInput, ReplyNode, ReplyPage,
    DEFAULT_MAX_DEPTH,
};
pub use like::{LikeAction, LikeService, LikeTarget, ToggleResult};
pub use post::{CreatePostInput, PostService, PostView, UpdatePostInput};
pub use user::{UserProfile, UserService};
