// ==========================================
// 铁路施工封锁申请 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 后端 CRUD, 屏蔽存储细节
// 约束: 所有查询使用参数化, 防止 SQL 注入
// ==========================================

pub mod block_request_repo;
pub mod block_request_repo_impl;
pub mod error;

// 重导出核心仓储
pub use block_request_repo::BlockRequestRepository;
pub use block_request_repo_impl::SqliteBlockRequestRepository;
pub use error::{RepositoryError, RepositoryResult};
