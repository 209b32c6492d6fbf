// ==========================================
// 铁路施工封锁申请 - 封锁申请 Repository Trait
// ==========================================
// 职责: 后端 CRUD 接口 (按 id 读取/回写原始记录)
// 红线: Repository 不含业务规则, 只做数据 CRUD
// ==========================================

use crate::domain::BlockRequest;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// BlockRequestRepository Trait
// ==========================================
// 实现者: SqliteBlockRequestRepository (本地替身, 使用 rusqlite)
#[async_trait]
pub trait BlockRequestRepository: Send + Sync {
    /// 按 id 批量读取, 结果顺序与 ids 一致
    ///
    /// # 返回
    /// - Err(NotFound): 任一 id 不存在
    async fn find_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<BlockRequest>>;

    /// 读取全部申请 (按首次写入顺序)
    async fn list_all(&self) -> RepositoryResult<Vec<BlockRequest>>;

    /// 批量写入 (事务化, 失败整体回滚)
    ///
    /// # 返回
    /// - Ok(usize): 写入条数
    async fn upsert_batch(&self, records: &[BlockRequest]) -> RepositoryResult<usize>;

    async fn count(&self) -> RepositoryResult<usize>;
}
