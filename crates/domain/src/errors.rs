//! 领域错误定义

use thiserror::Error;

/// 领域层错误
///
/// 验证失败和资源缺失来自业务规则本身；存储错误由仓储实现映射进来，
/// 保持领域层不依赖具体数据库驱动的错误类型。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 字段验证失败
    #[error("验证失败: {field}: {message}")]
    ValidationError { field: String, message: String },

    /// 资源不存在
    #[error("资源不存在: {resource_type} ID {resource_id}")]
    ResourceNotFound {
        resource_type: String,
        resource_id: String,
    },

    /// 存储层错误
    #[error("数据库错误: {message}")]
    DatabaseError { message: String },
}

impl DomainError {
    /// 创建验证错误
    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 创建资源不存在错误
    pub fn resource_not_found(
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }

    /// 创建数据库错误
    pub fn database_error(message: impl Into<String>) -> Self {
        Self::DatabaseError {
            message: message.into(),
        }
    }
}

/// 领域结果类型
pub type DomainResult<T> = Result<T, DomainError>;
