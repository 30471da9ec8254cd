//! Kafka 评论事件消费者
//!
//! 行级计数缓存的唯一写入方。后台任务轮询消息，每条消息在本地失败
//! 边界内处理：坏消息记日志后跳过，偏移量照常自动提交，一条毒消息
//! 不会阻塞分区以及分区后面的其他文档。

use crate::config::KafkaConfig;
use crate::kafka::{KafkaError, KafkaResult};
use domain::{CommentEvent, CommentEventType, LineCommentRepository};
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::{BorrowedMessage, Message};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// 评论事件应用器
///
/// 把事件应用到计数缓存。ADDED/DELETED 按事件中的绝对计数做幂等
/// upsert：计数大于 0 更新行，等于 0（或缺失）删除行。重复投递是
/// 正确性上的无操作；乱序投递表现为 last-applied-wins，这是设计上
/// 接受并测试过的行为，不做时序纠正。
pub struct CommentEventHandler {
    repository: Arc<dyn LineCommentRepository>,
}

impl CommentEventHandler {
    pub fn new(repository: Arc<dyn LineCommentRepository>) -> Self {
        Self { repository }
    }

    /// 解析并应用一条消息负载
    pub async fn handle_payload(&self, payload: &[u8]) -> KafkaResult<()> {
        let event: CommentEvent = serde_json::from_slice(payload)?;
        self.apply(&event).await
    }

    /// 应用一条事件到缓存
    pub async fn apply(&self, event: &CommentEvent) -> KafkaResult<()> {
        match event.event_type {
            CommentEventType::Added | CommentEventType::Deleted => {
                match event.new_comment_count {
                    Some(count) if count > 0 => {
                        self.repository
                            .upsert(&event.doc_id, event.line_number, count)
                            .await
                            .map_err(|e| KafkaError::CacheWrite {
                                message: format!("更新行级计数失败: {}", e),
                            })?;
                        info!(
                            doc_id = %event.doc_id,
                            line_number = event.line_number,
                            count,
                            "行级计数已更新"
                        );
                    }
                    // 计数归零时删除缓存行，不保留零值墓碑；行不存在是无操作
                    _ => {
                        self.repository
                            .delete(&event.doc_id, event.line_number)
                            .await
                            .map_err(|e| KafkaError::CacheWrite {
                                message: format!("删除行级计数失败: {}", e),
                            })?;
                        info!(
                            doc_id = %event.doc_id,
                            line_number = event.line_number,
                            "行级计数行已删除"
                        );
                    }
                }
            }
            CommentEventType::Liked | CommentEventType::Unliked => {
                // 点赞状态归属评论存储，不影响计数缓存
                debug!(
                    event_type = event.event_type.as_str(),
                    doc_id = %event.doc_id,
                    "事件不影响行级计数，忽略"
                );
            }
            CommentEventType::Unknown => {
                warn!(
                    doc_id = %event.doc_id,
                    line_number = event.line_number,
                    "未知事件类型，已忽略"
                );
            }
        }
        Ok(())
    }
}

/// Kafka 评论事件消费者
///
/// 作为消费者组成员，利用 Kafka 自动分区重平衡机制。
pub struct KafkaCommentConsumer {
    consumer: StreamConsumer,
    topic: String,
    group_id: String,
}

impl KafkaCommentConsumer {
    /// 创建新的 Kafka 消费者
    pub fn new(config: &KafkaConfig) -> KafkaResult<Self> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("group.id", &config.consumer_group_id)
            .set("bootstrap.servers", config.brokers.join(","))
            .set("enable.partition.eof", "false")
            .set("session.timeout.ms", "10000")
            .set("heartbeat.interval.ms", "3000")
            .set("enable.auto.commit", "true")
            .set(
                "auto.commit.interval.ms",
                config.auto_commit_interval_ms.to_string(),
            )
            .set("auto.offset.reset", &config.auto_offset_reset)
            .create()
            .map_err(|e| KafkaError::ClientCreation {
                message: format!("创建 Kafka 消费者失败: {}", e),
            })?;

        Ok(Self {
            consumer,
            topic: config.comment_events_topic.clone(),
            group_id: config.consumer_group_id.clone(),
        })
    }

    /// 订阅主题
    ///
    /// 启动时订阅失败是致命错误，向上传播而不是吞掉。
    pub fn subscribe(&self) -> KafkaResult<()> {
        self.consumer
            .subscribe(&[&self.topic])
            .map_err(|e| KafkaError::Subscription {
                topic: self.topic.clone(),
                message: e.to_string(),
            })?;

        info!(topic = %self.topic, group = %self.group_id, "已订阅评论事件主题");
        Ok(())
    }

    /// 消费循环
    ///
    /// 在独立后台任务中运行。取消令牌在迭代边界被观察到，在途消息
    /// 处理完成后退出，上层用超时限定排空时间。轮询级错误退避后重试，
    /// 消费者不因此崩溃。
    pub async fn run(self, handler: CommentEventHandler, shutdown: CancellationToken) {
        let mut poll_failures: u32 = 0;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                result = self.consumer.recv() => match result {
                    Ok(message) => {
                        poll_failures = 0;
                        if let Err(e) = Self::process_message(&handler, &message).await {
                            warn!(
                                partition = message.partition(),
                                offset = message.offset(),
                                error = %e,
                                "消息处理失败，已跳过"
                            );
                        }
                    }
                    Err(e) => {
                        poll_failures = (poll_failures + 1).min(5);
                        let delay = Duration::from_millis(1000 * 2u64.pow(poll_failures - 1));
                        error!(
                            error = %e,
                            retry_in_ms = delay.as_millis() as u64,
                            "轮询消息失败"
                        );
                        tokio::select! {
                            _ = shutdown.cancelled() => break,
                            _ = sleep(delay) => {}
                        }
                    }
                }
            }
        }

        info!(topic = %self.topic, "消费循环已停止");
    }

    /// 处理单条消息
    async fn process_message(
        handler: &CommentEventHandler,
        message: &BorrowedMessage<'_>,
    ) -> KafkaResult<()> {
        let payload = message
            .payload()
            .ok_or_else(|| KafkaError::MalformedEvent {
                message: "消息负载为空".to_string(),
            })?;

        debug!(
            partition = message.partition(),
            offset = message.offset(),
            "收到评论事件消息"
        );

        handler.handle_payload(payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::{DomainResult, LineCommentRepository};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 内存版计数缓存，模拟按唯一键的原子 upsert
    #[derive(Default)]
    struct InMemoryLineCommentRepository {
        rows: Mutex<HashMap<(String, i32), i32>>,
    }

    impl InMemoryLineCommentRepository {
        fn count(&self, document_id: &str, line_number: i32) -> Option<i32> {
            self.rows
                .lock()
                .unwrap()
                .get(&(document_id.to_string(), line_number))
                .copied()
        }
    }

    #[async_trait::async_trait]
    impl LineCommentRepository for InMemoryLineCommentRepository {
        async fn upsert(
            &self,
            document_id: &str,
            line_number: i32,
            comment_count: i32,
        ) -> DomainResult<()> {
            self.rows
                .lock()
                .unwrap()
                .insert((document_id.to_string(), line_number), comment_count);
            Ok(())
        }

        async fn delete(&self, document_id: &str, line_number: i32) -> DomainResult<()> {
            self.rows
                .lock()
                .unwrap()
                .remove(&(document_id.to_string(), line_number));
            Ok(())
        }

        async fn get_counts(&self, document_id: &str) -> DomainResult<HashMap<i32, i32>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|((doc, _), _)| doc == document_id)
                .map(|((_, line), count)| (*line, *count))
                .collect())
        }

        async fn delete_all_for_document(&self, document_id: &str) -> DomainResult<u64> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|(doc, _), _| doc != document_id);
            Ok((before - rows.len()) as u64)
        }
    }

    fn setup() -> (CommentEventHandler, Arc<InMemoryLineCommentRepository>) {
        let repository = Arc::new(InMemoryLineCommentRepository::default());
        (CommentEventHandler::new(repository.clone()), repository)
    }

    fn added(doc_id: &str, line_number: i32, count: i32) -> CommentEvent {
        CommentEvent::added("c-1", doc_id, line_number, "user-1", count, Utc::now())
    }

    fn deleted(doc_id: &str, line_number: i32, count: i32) -> CommentEvent {
        CommentEvent::deleted("c-1", doc_id, line_number, "user-1", count, Utc::now())
    }

    #[tokio::test]
    async fn test_apply_is_idempotent() {
        let (handler, repository) = setup();
        let event = added("D1", 3, 5);

        handler.apply(&event).await.unwrap();
        handler.apply(&event).await.unwrap();

        assert_eq!(repository.count("D1", 3), Some(5));
    }

    #[tokio::test]
    async fn test_zero_count_deletes_row() {
        let (handler, repository) = setup();

        handler.apply(&added("D1", 3, 2)).await.unwrap();
        handler.apply(&deleted("D1", 3, 0)).await.unwrap();

        assert_eq!(repository.count("D1", 3), None);
        assert!(repository.get_counts("D1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_delete_on_absent_row_is_noop() {
        let (handler, repository) = setup();

        handler.apply(&deleted("D1", 7, 0)).await.unwrap();
        assert_eq!(repository.count("D1", 7), None);
    }

    #[tokio::test]
    async fn test_duplicate_delivery_100_times() {
        let (handler, repository) = setup();
        let event = added("D1", 3, 5);

        for _ in 0..100 {
            handler.apply(&event).await.unwrap();
        }

        assert_eq!(repository.count("D1", 3), Some(5));
        assert_eq!(repository.get_counts("D1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_last_applied_wins_in_both_orders() {
        let (handler, repository) = setup();

        handler.apply(&added("D1", 3, 3)).await.unwrap();
        handler.apply(&added("D1", 3, 4)).await.unwrap();
        assert_eq!(repository.count("D1", 3), Some(4));

        // 乱序应用时缓存反映最后应用的值，而不是最后产生的值
        handler.apply(&added("D1", 3, 4)).await.unwrap();
        handler.apply(&added("D1", 3, 3)).await.unwrap();
        assert_eq!(repository.count("D1", 3), Some(3));
    }

    #[tokio::test]
    async fn test_like_events_do_not_touch_cache() {
        let (handler, repository) = setup();

        handler.apply(&added("D1", 3, 2)).await.unwrap();
        handler
            .apply(&CommentEvent::liked("c-1", "D1", 3, "user-2", Utc::now()))
            .await
            .unwrap();
        handler
            .apply(&CommentEvent::unliked("c-1", "D1", 3, "user-2", Utc::now()))
            .await
            .unwrap();

        assert_eq!(repository.count("D1", 3), Some(2));
    }

    #[tokio::test]
    async fn test_missing_count_on_added_deletes_row() {
        let (handler, repository) = setup();

        handler.apply(&added("D1", 3, 2)).await.unwrap();

        let mut event = added("D1", 3, 2);
        event.new_comment_count = None;
        handler.apply(&event).await.unwrap();

        assert_eq!(repository.count("D1", 3), None);
    }

    #[tokio::test]
    async fn test_unknown_event_type_is_ignored() {
        let (handler, repository) = setup();

        handler.apply(&added("D1", 3, 2)).await.unwrap();

        let payload = br#"{
            "eventType": "COMMENT_PINNED",
            "commentId": "c-9",
            "docId": "D1",
            "lineNumber": 3,
            "userId": "user-1",
            "timestamp": "2024-06-01T12:00:00Z"
        }"#;
        handler.handle_payload(payload).await.unwrap();

        assert_eq!(repository.count("D1", 3), Some(2));
    }

    #[tokio::test]
    async fn test_poison_message_does_not_block_later_messages() {
        let (handler, repository) = setup();

        // D2 的坏消息解析失败
        let poison = handler.handle_payload(b"not valid json at all").await;
        assert!(poison.is_err());

        // 后续 D1 的合法消息照常应用
        let payload = serde_json::to_vec(&added("D1", 3, 5)).unwrap();
        handler.handle_payload(&payload).await.unwrap();

        assert_eq!(repository.count("D1", 3), Some(5));
    }
}
