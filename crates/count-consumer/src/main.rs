//! Count Consumer 服务
//!
//! 订阅 dockey-comments 主题，把评论事件幂等地应用到行级计数缓存。
//! 每个进程一个专用的后台消费任务，是计数缓存的唯一写入方。

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use config::AppConfig;
use domain::LineCommentRepository;
use infrastructure::{
    create_pg_pool, CommentEventHandler, KafkaCommentConsumer, MessagingConfig,
    PgLineCommentRepository, MIGRATOR,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!("Count Consumer 启动中...");

    // 加载配置
    let app_config = AppConfig::from_env_with_defaults();
    app_config.validate().context("配置验证失败")?;

    let messaging_config = MessagingConfig::from_env();
    messaging_config.validate().context("消息配置验证失败")?;

    // 创建数据库连接池并运行迁移
    let pg_pool = create_pg_pool(
        &app_config.database.url,
        app_config.database.max_connections,
    )
    .await?;
    MIGRATOR.run(&pg_pool).await?;

    // 计数缓存仓储
    let repository: Arc<dyn LineCommentRepository> =
        Arc::new(PgLineCommentRepository::new(pg_pool));

    // 创建消费者并订阅，初始订阅失败是启动失败
    let consumer = KafkaCommentConsumer::new(&messaging_config.kafka)?;
    consumer.subscribe()?;

    let handler = CommentEventHandler::new(repository);
    let shutdown = CancellationToken::new();
    let consumer_task = tokio::spawn(consumer.run(handler, shutdown.clone()));

    info!("Count Consumer 启动完成，开始处理事件...");

    // 等待关闭信号，协作式关闭：取消令牌在迭代边界被观察到
    tokio::signal::ctrl_c().await?;
    info!("收到关闭信号，开始排空在途消息...");
    shutdown.cancel();

    let drain_timeout = Duration::from_secs(app_config.consumer.drain_timeout_secs);
    match tokio::time::timeout(drain_timeout, consumer_task).await {
        Ok(result) => {
            result?;
            info!("消费者已正常关闭");
        }
        Err(_) => {
            warn!(
                timeout_secs = app_config.consumer.drain_timeout_secs,
                "排空超时，强制关闭消费者"
            );
        }
    }

    Ok(())
}
