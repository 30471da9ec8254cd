pub mod comment;
pub mod line_comment_count;

pub use comment::Comment;
pub use line_comment_count::LineCommentCount;
