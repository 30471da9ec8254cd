pub mod comment_event;

pub use comment_event::{CommentEvent, CommentEventType};
