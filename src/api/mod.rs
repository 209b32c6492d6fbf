// ==========================================
// 铁路施工封锁申请 - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供请求处理代码调用
// ==========================================

pub mod error;
pub mod optimisation_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use optimisation_api::OptimisationApi;
