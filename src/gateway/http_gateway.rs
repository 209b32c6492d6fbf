// ==========================================
// 铁路施工封锁申请 - HTTP 优化服务网关
// ==========================================
// 协议: POST JSON 数组 (FlatRecord) → JSON 数组 (FlatRecord + 标注)
// ==========================================

use crate::domain::FlatRecord;
use crate::gateway::error::{GatewayError, GatewayResult};
use crate::gateway::optimizer_gateway::OptimizerGateway;
use async_trait::async_trait;
use std::time::Duration;

/// 响应体截断长度 (仅用于错误信息)
const ERROR_BODY_LIMIT: usize = 512;

pub struct HttpOptimizerGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpOptimizerGateway {
    /// 创建网关
    ///
    /// # 参数
    /// - endpoint: 优化服务 URL
    /// - timeout: 单次请求超时
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> GatewayResult<Self> {
        let endpoint = endpoint.into().trim().to_string();
        if endpoint.is_empty() {
            return Err(GatewayError::EndpointNotConfigured);
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl OptimizerGateway for HttpOptimizerGateway {
    async fn optimise(&self, records: Vec<FlatRecord>) -> GatewayResult<Vec<FlatRecord>> {
        tracing::info!(
            "调用优化服务: endpoint={}, 记录数={}",
            self.endpoint,
            records.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&records)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > ERROR_BODY_LIMIT {
                let cut = (0..=ERROR_BODY_LIMIT)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            tracing::warn!("优化服务返回异常状态: {}", status);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let optimised: Vec<FlatRecord> = serde_json::from_slice(&bytes)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        tracing::info!("优化服务返回 {} 条记录", optimised.len());
        Ok(optimised)
    }
}
