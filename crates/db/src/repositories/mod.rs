//! Database repositories.

pub mod class;
pub mod comment;
pub mod comment_like;
pub mod enrollment;
pub mod post;
pub mod post_like;
pub mod teacher;
pub mod user;

pub use class::ClassRepository;
pub use comment::CommentRepository;
pub use comment_like::CommentLikeRepository;
pub use enrollment::EnrollmentRepository;
pub use post::PostRepository;
pub use post_like::PostLikeRepository;
pub use teacher::TeacherRepository;
pub use user::UserRepository;
