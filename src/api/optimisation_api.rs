// ==========================================
// 铁路施工封锁申请 - 优化 API
// ==========================================
// 职责: 请求入口; 角色校验 + 参数校验 + 错误翻译
// 说明: 认证由外部完成, 这里只消费当前用户与角色
// 注意: 每次优化往返都会清空安全/作业字段, 时刻只保留到分钟
// ==========================================

use std::sync::Arc;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{CurrentUser, FlatRecord};
use crate::engine::orchestrator::{OptimisationOrchestrator, OptimisationRunSummary};

// ==========================================
// OptimisationApi - 优化 API
// ==========================================

/// 优化API
///
/// 职责：
/// 1. 角色校验 (仅 MANAGER / ADMIN)
/// 2. 申请 id 列表校验
/// 3. 调用编排器并翻译错误
pub struct OptimisationApi {
    orchestrator: Arc<OptimisationOrchestrator>,
}

impl OptimisationApi {
    pub fn new(orchestrator: Arc<OptimisationOrchestrator>) -> Self {
        Self { orchestrator }
    }

    fn authorize(user: &CurrentUser, action: &str) -> ApiResult<()> {
        if user.role.can_optimise() {
            return Ok(());
        }
        warn!(user_id = %user.user_id, role = %user.role, action, "拒绝无权限操作");
        Err(ApiError::PermissionDenied {
            user_id: user.user_id.clone(),
            role: user.role.to_string(),
            action: action.to_string(),
        })
    }

    /// 规范化 id 列表: 去空白、去重 (保留首次出现顺序)
    fn normalize_ids(ids: Option<Vec<String>>) -> ApiResult<Option<Vec<String>>> {
        let Some(ids) = ids else {
            return Ok(None);
        };

        let mut seen = std::collections::HashSet::new();
        let cleaned: Vec<String> = ids
            .into_iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .filter(|id| seen.insert(id.clone()))
            .collect();

        if cleaned.is_empty() {
            return Err(ApiError::InvalidInput("申请ID列表不能为空".to_string()));
        }
        Ok(Some(cleaned))
    }

    /// 执行一次优化往返
    ///
    /// # 参数
    /// - user: 当前用户
    /// - ids: 指定申请; None 表示全部
    ///
    /// # 返回
    /// - Ok(OptimisationRunSummary): 运行摘要
    /// - Err(ApiError): 权限/数据/外部服务错误
    pub async fn run_optimisation(
        &self,
        user: &CurrentUser,
        ids: Option<Vec<String>>,
    ) -> ApiResult<OptimisationRunSummary> {
        Self::authorize(user, "run_optimisation")?;
        let ids = Self::normalize_ids(ids)?;

        info!(user_id = %user.user_id, scope = ?ids.as_ref().map(Vec::len), "发起优化");
        let summary = self.orchestrator.run(ids.as_deref()).await?;
        Ok(summary)
    }

    /// 预览展平结果 (不调用优化服务, 不回写)
    pub async fn preview_flatten(
        &self,
        user: &CurrentUser,
        ids: Option<Vec<String>>,
    ) -> ApiResult<Vec<FlatRecord>> {
        Self::authorize(user, "preview_flatten")?;
        let ids = Self::normalize_ids(ids)?;
        Ok(self.orchestrator.preview(ids.as_deref()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ids_dedupes_and_trims() {
        let ids = OptimisationApi::normalize_ids(Some(vec![
            " r1 ".to_string(),
            "r2".to_string(),
            "r1".to_string(),
            "".to_string(),
        ]))
        .unwrap();
        assert_eq!(ids, Some(vec!["r1".to_string(), "r2".to_string()]));
    }

    #[test]
    fn test_normalize_ids_rejects_blank_list() {
        let result = OptimisationApi::normalize_ids(Some(vec!["  ".to_string()]));
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
        assert_eq!(OptimisationApi::normalize_ids(None).unwrap(), None);
    }
}
