//! 评论实体
//!
//! 权威评论存储中的评论记录，支持软删除和点赞。删除只做标记，
//! 行级计数统计时排除已删除评论。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// 单条行级评论
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub doc_id: String,
    pub line_number: i32,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub liked_by_user_ids: Vec<String>,
    pub like_count: i32,
    pub is_deleted: bool,
}

impl Comment {
    /// 评论内容最大长度（字符数）
    pub const MAX_CONTENT_LENGTH: usize = 4096;

    /// 创建新评论
    ///
    /// 行号必须为正整数，内容非空且不超过最大长度。
    pub fn new(
        doc_id: impl Into<String>,
        line_number: i32,
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let doc_id = doc_id.into();
        let content = content.into();

        if doc_id.trim().is_empty() {
            return Err(DomainError::validation_error("doc_id", "文档ID不能为空"));
        }
        if line_number < 1 {
            return Err(DomainError::validation_error(
                "line_number",
                "行号必须为正整数",
            ));
        }
        if content.trim().is_empty() {
            return Err(DomainError::validation_error("content", "评论内容不能为空"));
        }
        if content.chars().count() > Self::MAX_CONTENT_LENGTH {
            return Err(DomainError::validation_error(
                "content",
                "评论内容超出最大长度",
            ));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            doc_id,
            line_number,
            user_id: user_id.into(),
            user_name: user_name.into(),
            content,
            created_at: now,
            updated_at: now,
            liked_by_user_ids: Vec::new(),
            like_count: 0,
            is_deleted: false,
        })
    }

    /// 点赞。重复点赞是无操作，返回 false。
    pub fn like(&mut self, user_id: &str, now: DateTime<Utc>) -> bool {
        if self.liked_by_user_ids.iter().any(|id| id == user_id) {
            return false;
        }
        self.liked_by_user_ids.push(user_id.to_string());
        self.like_count += 1;
        self.updated_at = now;
        true
    }

    /// 取消点赞。未点赞时是无操作，返回 false。
    pub fn unlike(&mut self, user_id: &str, now: DateTime<Utc>) -> bool {
        let before = self.liked_by_user_ids.len();
        self.liked_by_user_ids.retain(|id| id != user_id);
        if self.liked_by_user_ids.len() == before {
            return false;
        }
        self.like_count -= 1;
        self.updated_at = now;
        true
    }

    /// 软删除。重复删除是无操作，返回 false。
    pub fn mark_deleted(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_deleted {
            return false;
        }
        self.is_deleted = true;
        self.updated_at = now;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_comment(line_number: i32, content: &str) -> DomainResult<Comment> {
        Comment::new("doc-1", line_number, "user-1", "tester", content, Utc::now())
    }

    #[test]
    fn test_new_comment_valid() {
        let comment = new_comment(3, "看起来不错").unwrap();
        assert_eq!(comment.doc_id, "doc-1");
        assert_eq!(comment.line_number, 3);
        assert_eq!(comment.like_count, 0);
        assert!(!comment.is_deleted);
        assert!(!comment.id.is_empty());
    }

    #[test]
    fn test_new_comment_rejects_invalid_line_number() {
        assert!(new_comment(0, "内容").is_err());
        assert!(new_comment(-1, "内容").is_err());
    }

    #[test]
    fn test_new_comment_rejects_empty_content() {
        assert!(new_comment(1, "").is_err());
        assert!(new_comment(1, "   ").is_err());
    }

    #[test]
    fn test_like_idempotent() {
        let mut comment = new_comment(1, "内容").unwrap();
        assert!(comment.like("user-2", Utc::now()));
        assert!(!comment.like("user-2", Utc::now()));
        assert_eq!(comment.like_count, 1);
    }

    #[test]
    fn test_unlike_without_like_is_noop() {
        let mut comment = new_comment(1, "内容").unwrap();
        assert!(!comment.unlike("user-2", Utc::now()));
        assert_eq!(comment.like_count, 0);

        comment.like("user-2", Utc::now());
        assert!(comment.unlike("user-2", Utc::now()));
        assert_eq!(comment.like_count, 0);
    }

    #[test]
    fn test_mark_deleted_idempotent() {
        let mut comment = new_comment(1, "内容").unwrap();
        assert!(comment.mark_deleted(Utc::now()));
        assert!(!comment.mark_deleted(Utc::now()));
        assert!(comment.is_deleted);
    }
}
