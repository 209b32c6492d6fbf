// ==========================================
// 铁路施工封锁申请 - 优化标注
// ==========================================
// 仅在优化服务返回后才有值; 原始记录与展平记录共用
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimisationAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimised_time_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimised_time_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// 优化服务透传载荷, 不解析
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Value>>,
}

impl OptimisationAnnotation {
    /// 是否有任一标注字段
    pub fn is_set(&self) -> bool {
        self.optimised_time_from.is_some()
            || self.optimised_time_to.is_some()
            || self.duration.is_some()
            || self.push.is_some()
            || self.comments.is_some()
    }

    /// 非空的批注列表
    pub fn non_empty_comments(&self) -> Option<&[Value]> {
        self.comments.as_deref().filter(|c| !c.is_empty())
    }
}
