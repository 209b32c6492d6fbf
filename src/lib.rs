// ==========================================
// 铁路施工封锁申请优化 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + HTTP 优化服务
// 系统定位: 封锁申请 ⇄ 优化服务 之间的展平/重建管线
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 展平/重建/编排
pub mod engine;

// 网关层 - 外部优化服务
pub mod gateway;

// 数据仓储层 - 后端 CRUD
pub mod repository;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 请求入口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    BlockRequest, CurrentUser, FlatRecord, LineSection, OptimisationAnnotation, Role,
    SafetyRequirements,
};

pub use engine::{
    flatten, reconstruct, ConsistencyIssue, Flattener, OptimisationOrchestrator,
    OptimisationRunSummary, ReconstructOptions, Reconstructor, TimeReference, TransformError,
};

pub use gateway::{HttpOptimizerGateway, IdentityOptimizer, OptimizerGateway};

pub use repository::{BlockRequestRepository, SqliteBlockRequestRepository};

pub use config::{ConfigManager, PipelineConfig};

pub use api::{ApiError, OptimisationApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "铁路施工封锁申请优化";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
