//! Kafka 消息队列模块
//!
//! 提供基于文档分区的评论事件生产者和消费者实现。

pub mod consumer;
pub mod error;
pub mod producer;

// 重新导出
pub use consumer::{CommentEventHandler, KafkaCommentConsumer};
pub use error::{KafkaError, KafkaResult};
pub use producer::KafkaCommentProducer;
