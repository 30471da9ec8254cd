//! 应用层
//!
//! 编排权威评论存储上的变更：审核门禁、全量重算计数、事件发布。

pub mod clock;
pub mod error;
pub mod moderation;
pub mod publisher;
pub mod services;

pub use clock::{Clock, SystemClock};
pub use error::ApplicationError;
pub use moderation::ModerationGate;
pub use publisher::CommentEventPublisher;
pub use services::{CommentService, CommentServiceDependencies, CreateCommentRequest};
