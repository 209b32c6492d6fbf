// ==========================================
// 铁路施工封锁申请 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 写入均为 ON CONFLICT 覆盖, 不存在唯一约束冲突
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    // ===== 载荷错误 =====
    #[error("封锁申请载荷无法编解码 (id={id}): {message}")]
    SerializationError { id: String, message: String },
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::DatabaseQueryError(msg),
            other => RepositoryError::DatabaseQueryError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_failure_keeps_message() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err: RepositoryError = conn
            .execute("INSERT INTO missing_table (id) VALUES (1)", [])
            .unwrap_err()
            .into();
        match err {
            RepositoryError::DatabaseQueryError(msg) => assert!(msg.contains("missing_table")),
            other => panic!("意外错误: {:?}", other),
        }
    }
}
