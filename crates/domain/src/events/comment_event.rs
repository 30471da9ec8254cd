//! 评论事件
//!
//! 评论存储变更在 Kafka 上的通知格式。`new_comment_count` 是该行当前
//! 未删除评论总数的绝对值，不是增量，消费者无需任何先前状态即可应用。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 评论事件类型
///
/// 未识别的类型反序列化为 `Unknown`，由消费端记录后忽略，而不是解析失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentEventType {
    #[serde(rename = "COMMENT_ADDED")]
    Added,
    #[serde(rename = "COMMENT_DELETED")]
    Deleted,
    #[serde(rename = "COMMENT_LIKED")]
    Liked,
    #[serde(rename = "COMMENT_UNLIKED")]
    Unliked,
    #[serde(other, rename = "UNKNOWN")]
    Unknown,
}

impl CommentEventType {
    /// 获取事件类型名称
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentEventType::Added => "COMMENT_ADDED",
            CommentEventType::Deleted => "COMMENT_DELETED",
            CommentEventType::Liked => "COMMENT_LIKED",
            CommentEventType::Unliked => "COMMENT_UNLIKED",
            CommentEventType::Unknown => "UNKNOWN",
        }
    }
}

/// 评论计数相关的变更通知
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentEvent {
    pub event_type: CommentEventType,
    pub comment_id: String,
    pub doc_id: String,
    pub line_number: i32,
    pub user_id: String,
    /// 仅 ADDED/DELETED 事件携带
    #[serde(default)]
    pub new_comment_count: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

impl CommentEvent {
    fn new(
        event_type: CommentEventType,
        comment_id: impl Into<String>,
        doc_id: impl Into<String>,
        line_number: i32,
        user_id: impl Into<String>,
        new_comment_count: Option<i32>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type,
            comment_id: comment_id.into(),
            doc_id: doc_id.into(),
            line_number,
            user_id: user_id.into(),
            new_comment_count,
            timestamp,
        }
    }

    /// 创建评论新增事件
    pub fn added(
        comment_id: impl Into<String>,
        doc_id: impl Into<String>,
        line_number: i32,
        user_id: impl Into<String>,
        new_comment_count: i32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(
            CommentEventType::Added,
            comment_id,
            doc_id,
            line_number,
            user_id,
            Some(new_comment_count),
            timestamp,
        )
    }

    /// 创建评论删除事件
    pub fn deleted(
        comment_id: impl Into<String>,
        doc_id: impl Into<String>,
        line_number: i32,
        user_id: impl Into<String>,
        new_comment_count: i32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(
            CommentEventType::Deleted,
            comment_id,
            doc_id,
            line_number,
            user_id,
            Some(new_comment_count),
            timestamp,
        )
    }

    /// 创建评论点赞事件
    pub fn liked(
        comment_id: impl Into<String>,
        doc_id: impl Into<String>,
        line_number: i32,
        user_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(
            CommentEventType::Liked,
            comment_id,
            doc_id,
            line_number,
            user_id,
            None,
            timestamp,
        )
    }

    /// 创建取消点赞事件
    pub fn unliked(
        comment_id: impl Into<String>,
        doc_id: impl Into<String>,
        line_number: i32,
        user_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(
            CommentEventType::Unliked,
            comment_id,
            doc_id,
            line_number,
            user_id,
            None,
            timestamp,
        )
    }

    /// 分区键，同一文档的事件落在同一分区以保证顺序
    pub fn partition_key(&self) -> &str {
        &self.doc_id
    }

    /// 事件是否影响行级计数缓存
    pub fn affects_line_counts(&self) -> bool {
        matches!(
            self.event_type,
            CommentEventType::Added | CommentEventType::Deleted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_event_wire_format() {
        let event = CommentEvent::added("c-1", "doc-42", 7, "user-1", 5, Utc::now());
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["eventType"], "COMMENT_ADDED");
        assert_eq!(json["commentId"], "c-1");
        assert_eq!(json["docId"], "doc-42");
        assert_eq!(json["lineNumber"], 7);
        assert_eq!(json["userId"], "user-1");
        assert_eq!(json["newCommentCount"], 5);
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_liked_event_carries_no_count() {
        let event = CommentEvent::liked("c-1", "doc-42", 7, "user-1", Utc::now());
        assert_eq!(event.new_comment_count, None);
        assert!(!event.affects_line_counts());

        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["eventType"], "COMMENT_LIKED");
        assert!(json["newCommentCount"].is_null());
    }

    #[test]
    fn test_round_trip() {
        let event = CommentEvent::deleted("c-2", "doc-1", 3, "user-9", 0, Utc::now());
        let payload = serde_json::to_string(&event).unwrap();
        let parsed: CommentEvent = serde_json::from_str(&payload).unwrap();

        assert_eq!(parsed.event_type, CommentEventType::Deleted);
        assert_eq!(parsed.new_comment_count, Some(0));
        assert_eq!(parsed.partition_key(), "doc-1");
    }

    #[test]
    fn test_unknown_event_type_is_tolerated() {
        let payload = r#"{
            "eventType": "COMMENT_PINNED",
            "commentId": "c-3",
            "docId": "doc-1",
            "lineNumber": 1,
            "userId": "user-1",
            "newCommentCount": null,
            "timestamp": "2024-06-01T12:00:00Z"
        }"#;

        let parsed: CommentEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.event_type, CommentEventType::Unknown);
        assert!(!parsed.affects_line_counts());
    }

    #[test]
    fn test_missing_count_defaults_to_none() {
        let payload = r#"{
            "eventType": "COMMENT_LIKED",
            "commentId": "c-4",
            "docId": "doc-1",
            "lineNumber": 2,
            "userId": "user-1",
            "timestamp": "2024-06-01T12:00:00Z"
        }"#;

        let parsed: CommentEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.new_comment_count, None);
    }
}
