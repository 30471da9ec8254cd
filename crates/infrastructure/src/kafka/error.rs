//! Kafka 事件管道错误类型

use thiserror::Error;

/// 事件管道各阶段的错误
///
/// `MalformedEvent` 和 `CacheWrite` 属于单条消息的局部失败，消费循环
/// 记日志后跳过；其余变体出现在创建或订阅阶段，属于启动致命错误。
#[derive(Error, Debug)]
pub enum KafkaError {
    /// 创建生产者或消费者客户端失败
    #[error("创建 Kafka 客户端失败: {message}")]
    ClientCreation { message: String },

    /// 订阅主题失败
    #[error("订阅主题 {topic} 失败: {message}")]
    Subscription { topic: String, message: String },

    /// 生产者缓冲区刷新失败
    #[error("刷新生产者缓冲区失败: {message}")]
    Flush { message: String },

    /// 消息负载缺失或无法解析为评论事件
    #[error("评论事件格式错误: {message}")]
    MalformedEvent { message: String },

    /// 事件应用到计数缓存失败
    #[error("写入行级计数缓存失败: {message}")]
    CacheWrite { message: String },
}

/// Kafka 结果类型
pub type KafkaResult<T> = Result<T, KafkaError>;

impl From<serde_json::Error> for KafkaError {
    fn from(err: serde_json::Error) -> Self {
        KafkaError::MalformedEvent {
            message: err.to_string(),
        }
    }
}
