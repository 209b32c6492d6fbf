// ==========================================
// 铁路施工封锁申请 - 展平记录
// ==========================================
// 优化服务输入/输出契约: 每个受影响区段一行
// 注意: id 在展平列表中不唯一 (多区段申请共享 id)
// ==========================================

use crate::domain::annotation::OptimisationAnnotation;
use crate::domain::types::{GroupKey, LineSection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRecord {
    pub id: String,
    /// 仅当原始申请区段数 > 1 时非空
    #[serde(default)]
    pub combination_id: Option<String>,

    pub date: String,             // yyyy-MM-dd
    pub demand_time_from: String, // HH:mm
    pub demand_time_to: String,   // HH:mm

    #[serde(default)]
    pub selected_department: String,
    #[serde(default)]
    pub selected_section: String,
    #[serde(default)]
    pub selected_depo: String,
    #[serde(default)]
    pub selected_line: Option<String>,
    #[serde(default)]
    pub other_affected_line: Option<String>,
    #[serde(default)]
    pub selected_stream: Option<String>,
    #[serde(default)]
    pub mission_block: String,

    #[serde(flatten)]
    pub annotation: OptimisationAnnotation,
}

impl FlatRecord {
    /// 重建分组键: combinationId ?? id
    pub fn group_key(&self) -> GroupKey {
        GroupKey::of(&self.id, self.combination_id.as_deref())
    }

    /// 与区段解码使用同一判定规则
    pub fn has_line(&self) -> bool {
        self.selected_line
            .as_deref()
            .map(LineSection::is_line_name)
            .unwrap_or(false)
    }
}
