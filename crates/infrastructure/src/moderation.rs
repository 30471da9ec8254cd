//! 审核服务 HTTP 客户端
//!
//! 对外部文本分类服务的一元调用，携带每次调用的硬性截止时间
//! （默认 5 秒），不做重试。故障开放：超时、连接失败、非 2xx 响应、
//! 响应体异常等任何错误都判定为通过并记警告，评论创建路径在审核
//! 依赖降级时保持可用。只有服务明确返回 flagged 才拒绝。

use std::time::Duration;

use application::ModerationGate;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ModerationConfig;

#[derive(Debug, Deserialize)]
struct CheckResponse {
    result: String,
}

/// 审核服务客户端
pub struct HttpModerationGate {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpModerationGate {
    /// 创建审核客户端，超时配置在 HTTP 客户端层面生效
    pub fn new(config: &ModerationConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    async fn classify(&self, text: &str) -> Result<CheckResponse, reqwest::Error> {
        self.client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?
            .error_for_status()?
            .json::<CheckResponse>()
            .await
    }
}

#[async_trait]
impl ModerationGate for HttpModerationGate {
    async fn check_text(&self, text: &str) -> bool {
        match self.classify(text).await {
            Ok(response) => {
                let accepted = response.result != "flagged";
                debug!(result = %response.result, accepted, "审核服务返回分类结果");
                accepted
            }
            Err(e) => {
                warn!(error = %e, "审核服务调用失败，按通过处理（故障开放）");
                true
            }
        }
    }
}
