//! Kafka 评论事件生产者
//!
//! 使用 doc_id 作为分区键，确保同一文档事件的有序性。发布在调用方的
//! 请求任务上立即返回：实际发送在独立任务中完成，结果仅用于日志。
//! 变更已在权威存储提交，事件发送失败不回滚、不上抛。

use crate::config::KafkaConfig;
use crate::kafka::{KafkaError, KafkaResult};
use application::CommentEventPublisher;
use async_trait::async_trait;
use domain::CommentEvent;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use std::time::Duration;
use tracing::{error, info};

/// Kafka 评论事件生产者
pub struct KafkaCommentProducer {
    producer: FutureProducer,
    topic: String,
    send_timeout: Duration,
}

impl KafkaCommentProducer {
    /// 创建新的 Kafka 生产者
    pub fn new(config: &KafkaConfig) -> KafkaResult<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", config.brokers.join(","))
            .set("message.timeout.ms", config.send_timeout_ms.to_string())
            .set("acks", &config.acks)
            .set("enable.idempotence", "true")
            .set("max.in.flight.requests.per.connection", "5")
            .create()
            .map_err(|e| KafkaError::ClientCreation {
                message: format!("创建 Kafka 生产者失败: {}", e),
            })?;

        info!(
            brokers = %config.brokers.join(","),
            topic = %config.comment_events_topic,
            "Kafka 评论事件生产者创建成功"
        );

        Ok(Self {
            producer,
            topic: config.comment_events_topic.clone(),
            send_timeout: Duration::from_millis(config.send_timeout_ms as u64),
        })
    }

    /// 刷新生产者缓冲区，关闭前调用
    pub fn flush(&self) -> KafkaResult<()> {
        self.producer
            .flush(Timeout::After(Duration::from_secs(10)))
            .map_err(|e| KafkaError::Flush {
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl CommentEventPublisher for KafkaCommentProducer {
    async fn publish(&self, event: CommentEvent) {
        let payload = match serde_json::to_string(&event) {
            Ok(payload) => payload,
            Err(e) => {
                error!(
                    event_type = event.event_type.as_str(),
                    doc_id = %event.doc_id,
                    error = %e,
                    "序列化评论事件失败，事件被丢弃"
                );
                return;
            }
        };

        let key = event.partition_key().to_string();
        let event_type = event.event_type.as_str();
        let doc_id = event.doc_id.clone();
        let line_number = event.line_number;
        let producer = self.producer.clone();
        let topic = self.topic.clone();
        let timeout = self.send_timeout;

        tokio::spawn(async move {
            let record = FutureRecord::to(&topic).payload(&payload).key(&key);
            match producer.send(record, Timeout::After(timeout)).await {
                Ok(_) => {
                    info!(
                        event_type,
                        doc_id = %doc_id,
                        line_number,
                        "评论事件已发送"
                    );
                }
                Err((e, _)) => {
                    error!(
                        event_type,
                        doc_id = %doc_id,
                        line_number,
                        error = %e,
                        "评论事件发送失败，已忽略"
                    );
                }
            }
        });
    }
}
