// ==========================================
// 铁路施工封锁申请 - 原始记录
// ==========================================
// 后端存储的封锁申请实体 (嵌套结构, 含区段列表)
// 红线: 时间字段保留原始字符串, 解析在 Flattener 中完成
// ==========================================

use crate::domain::annotation::OptimisationAnnotation;
use crate::domain::types::LineSection;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ==========================================
// BlockRequest - 封锁申请
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRequest {
    // ===== 标识 =====
    pub id: String, // 后端分配, 稳定

    // ===== 时间 (原始字符串) =====
    pub date: String,             // 施工日期
    pub demand_time_from: String, // 申请开始时刻 (只有时分有意义)
    pub demand_time_to: String,   // 申请结束时刻

    // ===== 分类 =====
    #[serde(default)]
    pub selected_department: String,
    #[serde(default)]
    pub selected_section: String,
    #[serde(default)]
    pub selected_depo: String,
    #[serde(default)]
    pub mission_block: String, // 无区段时的兜底区段标识
    #[serde(default)]
    pub work_type: String,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub corridor_type: String,

    // ===== 结构 =====
    #[serde(default)]
    pub processed_line_sections: Vec<LineSection>,

    // ===== 安全/作业透传字段 =====
    #[serde(flatten)]
    pub safety: SafetyRequirements,

    #[serde(default)]
    pub user: Map<String, Value>,

    // ===== 优化标注 =====
    #[serde(flatten)]
    pub annotation: OptimisationAnnotation,
}

// ==========================================
// SafetyRequirements - 安全/作业要求
// ==========================================
// 不参与变换; 往返后一律为 Default (false / "" / null)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafetyRequirements {
    // 限速
    pub caution_required: bool,
    pub caution_speed: String,
    pub caution_location_from: String,
    pub caution_location_to: String,
    pub caution_time_from: Option<String>,
    pub caution_time_to: Option<String>,
    pub fresh_caution_required: bool,
    pub fresh_caution_speed: Option<f64>,

    // 停电
    pub power_block_required: bool,
    pub power_block_requirements: String,
    pub elementary_section: String,

    // 信号/电务
    pub sig_disconnection: bool,
    pub sig_response: String,
    pub snt_disconnection_required: bool,
    pub snt_disconnection_requirements: String,
    pub snt_disconnection_line_from: String,
    pub snt_disconnection_line_to: String,

    #[serde(rename = "requestremarks")]
    pub request_remarks: String,
}

impl BlockRequest {
    /// 展平后将产生的记录数 (无区段时为 1)
    pub fn flat_len(&self) -> usize {
        self.processed_line_sections.len().max(1)
    }
}
