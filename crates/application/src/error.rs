//! 应用层错误定义

use domain::DomainError;
use thiserror::Error;

/// 应用层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplicationError {
    /// 评论内容被审核服务标记
    #[error("评论内容未通过审核")]
    CommentRejected,

    /// 领域层错误
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// 应用层结果类型
pub type ApplicationResult<T> = Result<T, ApplicationError>;
