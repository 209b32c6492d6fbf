// ==========================================
// 铁路施工封锁申请 - 配置层
// ==========================================
// 职责: 优化管线配置, 支持 config_kv 覆写与环境变量覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod pipeline_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use pipeline_config::PipelineConfig;
