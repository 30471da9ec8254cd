pub mod comment_repository;
pub mod line_comment_repository;

pub use comment_repository::CommentRepository;
pub use line_comment_repository::LineCommentRepository;
