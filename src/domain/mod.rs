// ==========================================
// 铁路施工封锁申请 - 领域模型层
// ==========================================
// 职责: 原始记录 / 展平记录 / 区段 / 优化标注
// 红线: 不含数据访问逻辑, 不含变换逻辑
// ==========================================

pub mod annotation;
pub mod block_request;
pub mod flat_record;
pub mod types;

// 重导出核心类型
pub use annotation::OptimisationAnnotation;
pub use block_request::{BlockRequest, SafetyRequirements};
pub use flat_record::FlatRecord;
pub use types::{CurrentUser, GroupKey, LineSection, LineSectionWire, Role};
