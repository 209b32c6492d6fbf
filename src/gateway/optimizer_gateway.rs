// ==========================================
// 铁路施工封锁申请 - 优化服务网关接口
// ==========================================
// 职责: 展平记录进, 带优化标注的展平记录出
// 说明: 外部服务不透明; 不校验返回记录与输入一一对应
// ==========================================

use crate::domain::FlatRecord;
use crate::gateway::error::GatewayResult;
use async_trait::async_trait;

// ==========================================
// OptimizerGateway Trait
// ==========================================
// 实现者: HttpOptimizerGateway (远程服务), IdentityOptimizer (原样返回)
#[async_trait]
pub trait OptimizerGateway: Send + Sync {
    /// 提交一批展平记录, 返回优化后的展平记录
    async fn optimise(&self, records: Vec<FlatRecord>) -> GatewayResult<Vec<FlatRecord>>;
}

/// 原样返回的优化器 (演练/测试用)
#[derive(Debug, Clone, Default)]
pub struct IdentityOptimizer;

#[async_trait]
impl OptimizerGateway for IdentityOptimizer {
    async fn optimise(&self, records: Vec<FlatRecord>) -> GatewayResult<Vec<FlatRecord>> {
        tracing::debug!("IdentityOptimizer: 原样返回 {} 条记录", records.len());
        Ok(records)
    }
}
