//! 行级评论计数缓存接口
//!
//! 文档服务侧的非规范化缓存。唯一写入方是事件消费者，
//! 请求处理路径只读，读取必须反映最新的已提交写入。

use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::DomainResult;

#[async_trait]
pub trait LineCommentRepository: Send + Sync {
    /// 按唯一键 (document_id, line_number) 原子插入或更新计数
    async fn upsert(
        &self,
        document_id: &str,
        line_number: i32,
        comment_count: i32,
    ) -> DomainResult<()>;

    /// 删除计数行，行不存在时是无操作
    async fn delete(&self, document_id: &str, line_number: i32) -> DomainResult<()>;

    /// 查询文档所有行的计数，行号 -> 计数
    async fn get_counts(&self, document_id: &str) -> DomainResult<HashMap<i32, i32>>;

    /// 删除文档的所有计数行（文档删除时的清理），返回删除行数
    async fn delete_all_for_document(&self, document_id: &str) -> DomainResult<u64>;
}
