// ==========================================
// 铁路施工封锁申请 - 引擎层
// ==========================================
// 职责: 展平/重建变换与优化管线编排
// 红线: 变换为纯函数, 不做 I/O; I/O 只出现在编排器
// ==========================================

pub mod error;
pub mod flattener;
pub mod orchestrator;
pub mod reconstructor;
pub mod time_format;

// 重导出核心引擎
pub use error::{ConsistencyIssue, TransformError, TransformResult};
pub use flattener::{flatten, Flattener};
pub use orchestrator::{OptimisationOrchestrator, OptimisationRunSummary, OrchestratorError};
pub use reconstructor::{reconstruct, ReconstructOptions, ReconstructReport, Reconstructor};
pub use time_format::TimeReference;
