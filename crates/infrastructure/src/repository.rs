//! 行级计数缓存的 PostgreSQL 实现
//!
//! 写入方只有事件消费者。upsert 靠唯一键上的单条
//! `INSERT ... ON CONFLICT DO UPDATE` 保证原子性，重复或乱序投递的
//! 竞争在存储层以 last-write-wins 收敛，应用层不需要额外加锁。
//! 读取直接走 SQL，不经过任何中间缓存。

use std::collections::HashMap;

use async_trait::async_trait;
use domain::{DomainError, DomainResult, LineCommentRepository};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

fn map_sqlx_err(err: sqlx::Error) -> DomainError {
    DomainError::database_error(err.to_string())
}

/// 创建 PostgreSQL 连接池
pub async fn create_pg_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// 行级计数缓存仓储
pub struct PgLineCommentRepository {
    pool: PgPool,
}

impl PgLineCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LineCommentRepository for PgLineCommentRepository {
    async fn upsert(
        &self,
        document_id: &str,
        line_number: i32,
        comment_count: i32,
    ) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO document_line_comments (document_id, line_number, comment_count, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (document_id, line_number)
            DO UPDATE SET comment_count = EXCLUDED.comment_count, updated_at = NOW()
            "#,
        )
        .bind(document_id)
        .bind(line_number)
        .bind(comment_count)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn delete(&self, document_id: &str, line_number: i32) -> DomainResult<()> {
        sqlx::query(
            "DELETE FROM document_line_comments WHERE document_id = $1 AND line_number = $2",
        )
        .bind(document_id)
        .bind(line_number)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn get_counts(&self, document_id: &str) -> DomainResult<HashMap<i32, i32>> {
        let rows = sqlx::query(
            "SELECT line_number, comment_count FROM document_line_comments WHERE document_id = $1",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    row.get::<i32, _>("line_number"),
                    row.get::<i32, _>("comment_count"),
                )
            })
            .collect())
    }

    async fn delete_all_for_document(&self, document_id: &str) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM document_line_comments WHERE document_id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }
}
