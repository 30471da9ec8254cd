//! 数据库迁移

/// 工作区根目录 migrations/ 下的迁移集合
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
