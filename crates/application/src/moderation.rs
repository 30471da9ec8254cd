//! 审核门禁
//!
//! 评论写入前的同步文本检查。实现方必须故障开放：依赖不可用、超时或
//! 任何意外错误都判定为通过，评论创建路径在审核服务降级时保持可用。

use async_trait::async_trait;

#[async_trait]
pub trait ModerationGate: Send + Sync {
    /// 检查文本是否可接受
    ///
    /// 只有审核服务明确标记为不当内容时返回 false，其余情况一律返回 true。
    /// 该调用从不返回错误，也从不向调用方传播失败。
    async fn check_text(&self, text: &str) -> bool;
}
