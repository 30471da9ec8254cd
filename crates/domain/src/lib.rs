//! 文档行级评论系统核心领域模型
//!
//! 包含评论实体、行级评论计数、评论事件等核心类型，以及两侧存储的仓储接口定义。

pub mod entities;
pub mod errors;
pub mod events;
pub mod repositories;

// 重新导出常用类型
pub use entities::*;
pub use errors::*;
pub use events::*;
pub use repositories::*;
