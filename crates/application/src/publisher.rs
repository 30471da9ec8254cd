//! 评论事件发布接口
//!
//! 在变更已持久化之后调用。发布必须立即返回且永不失败调用方：
//! 变更本身已是事实来源，事件丢失只造成可观测的一致性滞后，
//! 不构成回滚理由。发送结果仅用于日志。

use async_trait::async_trait;
use domain::CommentEvent;

#[async_trait]
pub trait CommentEventPublisher: Send + Sync {
    /// 发布评论事件，不阻塞、不返回错误
    async fn publish(&self, event: CommentEvent);
}
