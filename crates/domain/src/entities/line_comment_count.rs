//! 行级评论计数
//!
//! 文档服务侧的非规范化缓存行，仅由事件消费者写入。
//! 行不存在即计数为 0，计数归零时删除行，不保留零值墓碑。

/// 某文档某一行的未删除评论总数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCommentCount {
    pub document_id: String,
    pub line_number: i32,
    pub comment_count: i32,
}
