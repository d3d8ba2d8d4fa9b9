//! Database entities.

pub mod class;
pub mod comment;
pub mod comment_like;
pub mod enrollment;
pub mod post;
pub mod post_like;
pub mod teacher;
pub mod user;

pub use class::Entity as Class;
pub use comment::Entity as Comment;
pub use comment_like::Entity as CommentLike;
pub use enrollment::Entity as Enrollment;
pub use post::Entity as Post;
pub use post_like::Entity as PostLike;
pub use teacher::Entity as Teacher;
pub use user::Entity as User;
