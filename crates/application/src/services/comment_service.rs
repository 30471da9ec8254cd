//! 评论服务
//!
//! 权威评论存储上的变更编排。每次影响计数的变更之后，对该行做一次
//! 全量重算并把绝对计数放进事件，而不是发送增量：全量重算在并发写入、
//! 重复投递和乱序投递下都不会漂移。事件发布失败从不影响调用方的结果。

use std::collections::HashMap;
use std::sync::Arc;

use domain::{Comment, CommentEvent, CommentRepository, DomainError};
use tracing::{info, warn};

use crate::clock::Clock;
use crate::error::{ApplicationError, ApplicationResult};
use crate::moderation::ModerationGate;
use crate::publisher::CommentEventPublisher;

#[derive(Debug, Clone)]
pub struct CreateCommentRequest {
    pub doc_id: String,
    pub line_number: i32,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
}

pub struct CommentServiceDependencies {
    pub comment_repository: Arc<dyn CommentRepository>,
    pub moderation_gate: Arc<dyn ModerationGate>,
    pub event_publisher: Arc<dyn CommentEventPublisher>,
    pub clock: Arc<dyn Clock>,
}

pub struct CommentService {
    deps: CommentServiceDependencies,
}

impl CommentService {
    pub fn new(deps: CommentServiceDependencies) -> Self {
        Self { deps }
    }

    /// 创建评论
    ///
    /// 先过审核门禁（被标记则拒绝），再写入权威存储，最后重算该行计数
    /// 并发布 ADDED 事件。
    pub async fn create_comment(&self, request: CreateCommentRequest) -> ApplicationResult<Comment> {
        if !self.deps.moderation_gate.check_text(&request.content).await {
            warn!(
                doc_id = %request.doc_id,
                line_number = request.line_number,
                user_id = %request.user_id,
                "评论内容被审核服务标记，已拒绝"
            );
            return Err(ApplicationError::CommentRejected);
        }

        let now = self.deps.clock.now();
        let comment = Comment::new(
            request.doc_id,
            request.line_number,
            request.user_id,
            request.user_name,
            request.content,
            now,
        )?;
        let comment = self.deps.comment_repository.insert(comment).await?;

        let count = self
            .deps
            .comment_repository
            .count_for_line(&comment.doc_id, comment.line_number)
            .await?;

        self.deps
            .event_publisher
            .publish(CommentEvent::added(
                comment.id.clone(),
                comment.doc_id.clone(),
                comment.line_number,
                comment.user_id.clone(),
                count,
                now,
            ))
            .await;

        info!(
            comment_id = %comment.id,
            doc_id = %comment.doc_id,
            line_number = comment.line_number,
            new_count = count,
            "评论已创建"
        );

        Ok(comment)
    }

    /// 软删除评论
    ///
    /// 评论不存在或已删除时返回 Ok(false)。删除后重算该行计数并发布
    /// DELETED 事件，计数可能为 0（消费者据此删除缓存行）。
    pub async fn delete_comment(&self, comment_id: &str) -> ApplicationResult<bool> {
        let Some(mut comment) = self.deps.comment_repository.find_by_id(comment_id).await? else {
            return Ok(false);
        };

        let now = self.deps.clock.now();
        if !comment.mark_deleted(now) {
            return Ok(false);
        }
        let comment = self.deps.comment_repository.update(comment).await?;

        let count = self
            .deps
            .comment_repository
            .count_for_line(&comment.doc_id, comment.line_number)
            .await?;

        self.deps
            .event_publisher
            .publish(CommentEvent::deleted(
                comment.id.clone(),
                comment.doc_id.clone(),
                comment.line_number,
                comment.user_id.clone(),
                count,
                now,
            ))
            .await;

        info!(
            comment_id = %comment.id,
            doc_id = %comment.doc_id,
            line_number = comment.line_number,
            new_count = count,
            "评论已软删除"
        );

        Ok(true)
    }

    /// 点赞评论。重复点赞直接返回当前状态，不发布事件。
    pub async fn like_comment(
        &self,
        comment_id: &str,
        user_id: &str,
    ) -> ApplicationResult<Comment> {
        let mut comment = self
            .deps
            .comment_repository
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| DomainError::resource_not_found("comment", comment_id))?;

        let now = self.deps.clock.now();
        if !comment.like(user_id, now) {
            return Ok(comment);
        }
        let comment = self.deps.comment_repository.update(comment).await?;

        self.deps
            .event_publisher
            .publish(CommentEvent::liked(
                comment.id.clone(),
                comment.doc_id.clone(),
                comment.line_number,
                user_id,
                now,
            ))
            .await;

        Ok(comment)
    }

    /// 取消点赞。未点赞时直接返回当前状态，不发布事件。
    pub async fn unlike_comment(
        &self,
        comment_id: &str,
        user_id: &str,
    ) -> ApplicationResult<Comment> {
        let mut comment = self
            .deps
            .comment_repository
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| DomainError::resource_not_found("comment", comment_id))?;

        let now = self.deps.clock.now();
        if !comment.unlike(user_id, now) {
            return Ok(comment);
        }
        let comment = self.deps.comment_repository.update(comment).await?;

        self.deps
            .event_publisher
            .publish(CommentEvent::unliked(
                comment.id.clone(),
                comment.doc_id.clone(),
                comment.line_number,
                user_id,
                now,
            ))
            .await;

        Ok(comment)
    }

    /// 查询文档的全部未删除评论
    pub async fn comments_by_doc(&self, doc_id: &str) -> ApplicationResult<Vec<Comment>> {
        Ok(self.deps.comment_repository.find_by_doc(doc_id).await?)
    }

    /// 查询文档某一行的未删除评论
    pub async fn comments_by_doc_and_line(
        &self,
        doc_id: &str,
        line_number: i32,
    ) -> ApplicationResult<Vec<Comment>> {
        Ok(self
            .deps
            .comment_repository
            .find_by_doc_and_line(doc_id, line_number)
            .await?)
    }

    /// 从权威存储统计文档各行的评论数，行号 -> 计数
    pub async fn line_comment_counts(
        &self,
        doc_id: &str,
    ) -> ApplicationResult<HashMap<i32, i32>> {
        let comments = self.deps.comment_repository.find_by_doc(doc_id).await?;
        let mut counts = HashMap::new();
        for comment in comments {
            *counts.entry(comment.line_number).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
