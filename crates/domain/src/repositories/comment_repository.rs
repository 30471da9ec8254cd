//! 权威评论存储接口
//!
//! 评论服务侧的存储边界。具体实现由外部协作方提供，本仓库只依赖接口。

use async_trait::async_trait;

use crate::entities::Comment;
use crate::errors::DomainResult;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: Comment) -> DomainResult<Comment>;

    async fn update(&self, comment: Comment) -> DomainResult<Comment>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Comment>>;

    /// 按文档查询未删除评论，按行号、创建时间升序
    async fn find_by_doc(&self, doc_id: &str) -> DomainResult<Vec<Comment>>;

    /// 按文档和行号查询未删除评论，按创建时间升序
    async fn find_by_doc_and_line(
        &self,
        doc_id: &str,
        line_number: i32,
    ) -> DomainResult<Vec<Comment>>;

    /// 全量统计该行未删除评论数
    ///
    /// 事件中绝对计数语义的来源：每次变更后重新统计，而不是增量计数，
    /// 这样重复投递或乱序投递不会造成计数漂移。
    async fn count_for_line(&self, doc_id: &str, line_number: i32) -> DomainResult<i32>;
}
