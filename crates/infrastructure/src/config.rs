//! 基础设施配置
//!
//! 定义 Kafka 和审核服务的连接配置。

use ::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;

/// Kafka 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaConfig {
    /// Kafka 服务器地址列表
    pub brokers: Vec<String>,
    /// 评论事件主题名称
    pub comment_events_topic: String,
    /// 消费者组ID
    pub consumer_group_id: String,
    /// 消息发送超时时间（毫秒）
    pub send_timeout_ms: u32,
    /// 确认模式（all, 1, 0）
    pub acks: String,
    /// 偏移量自动提交间隔（毫秒）
    pub auto_commit_interval_ms: u32,
    /// 无已提交偏移量时的起始位置
    pub auto_offset_reset: String,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: vec!["localhost:9092".to_string()],
            comment_events_topic: "dockey-comments".to_string(),
            consumer_group_id: "docs-service-group".to_string(),
            send_timeout_ms: 5000,
            acks: "all".to_string(),
            auto_commit_interval_ms: 1000,
            auto_offset_reset: "earliest".to_string(),
        }
    }
}

/// 审核服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// 审核服务地址
    pub endpoint: String,
    /// 单次调用的硬性截止时间（秒），不重试
    pub timeout_secs: u64,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:50051/check".to_string(),
            timeout_secs: 5,
        }
    }
}

/// 消息架构配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MessagingConfig {
    /// Kafka 配置
    pub kafka: KafkaConfig,
    /// 审核服务配置
    pub moderation: ModerationConfig,
}

impl MessagingConfig {
    /// 从环境变量创建配置，未设置的项使用默认值
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(brokers) = env::var("KAFKA_BOOTSTRAP_SERVERS") {
            config.kafka.brokers = brokers
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(topic) = env::var("COMMENT_EVENTS_TOPIC") {
            config.kafka.comment_events_topic = topic;
        }
        if let Ok(group) = env::var("KAFKA_CONSUMER_GROUP") {
            config.kafka.consumer_group_id = group;
        }
        if let Ok(endpoint) = env::var("MODERATION_URL") {
            config.moderation.endpoint = endpoint;
        }
        if let Some(timeout) = env::var("MODERATION_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.moderation.timeout_secs = timeout;
        }

        config
    }

    /// 验证配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kafka.brokers.is_empty() {
            return Err(ConfigError::InvalidKafkaConfig(
                "Kafka brokers 不能为空".to_string(),
            ));
        }
        if self.kafka.comment_events_topic.is_empty() {
            return Err(ConfigError::InvalidKafkaConfig(
                "评论事件主题不能为空".to_string(),
            ));
        }
        if self.kafka.consumer_group_id.is_empty() {
            return Err(ConfigError::InvalidKafkaConfig(
                "消费者组ID不能为空".to_string(),
            ));
        }
        if self.moderation.endpoint.is_empty() {
            return Err(ConfigError::InvalidModerationConfig(
                "审核服务地址不能为空".to_string(),
            ));
        }
        if self.moderation.timeout_secs == 0 {
            return Err(ConfigError::InvalidModerationConfig(
                "审核超时必须大于 0".to_string(),
            ));
        }
        Ok(())
    }
}
