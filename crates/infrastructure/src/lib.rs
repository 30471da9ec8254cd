//! 基础设施层实现。
//!
//! 提供 Kafka 事件管道、行级计数缓存的 PostgreSQL 仓储、
//! 审核服务 HTTP 客户端等适配器，实现应用/领域层定义的接口。

pub mod config;
pub mod kafka;
pub mod migrations;
pub mod moderation;
pub mod repository;

pub use config::{KafkaConfig, MessagingConfig, ModerationConfig};
pub use kafka::{CommentEventHandler, KafkaCommentConsumer, KafkaCommentProducer};
pub use migrations::MIGRATOR;
pub use moderation::HttpModerationGate;
pub use repository::{create_pg_pool, PgLineCommentRepository};
