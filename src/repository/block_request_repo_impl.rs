// ==========================================
// 铁路施工封锁申请 - 封锁申请 Repository 实现
// ==========================================
// 存储: block_request 表 (id + JSON payload)
// 说明: 作为 REST 后端的本地替身, 记录按原样序列化
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::BlockRequest;
use crate::repository::block_request_repo::BlockRequestRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

const UPSERT_SQL: &str = r#"
    INSERT INTO block_request (id, payload, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(id) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at
"#;

pub struct SqliteBlockRequestRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBlockRequestRepository {
    /// 打开数据库并建表
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn encode(record: &BlockRequest) -> RepositoryResult<String> {
        serde_json::to_string(record).map_err(|e| RepositoryError::SerializationError {
            id: record.id.clone(),
            message: e.to_string(),
        })
    }

    fn decode(id: &str, payload: &str) -> RepositoryResult<BlockRequest> {
        serde_json::from_str(payload).map_err(|e| RepositoryError::SerializationError {
            id: id.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl BlockRequestRepository for SqliteBlockRequestRepository {
    async fn find_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<BlockRequest>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT payload FROM block_request WHERE id = ?1")?;

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            let payload: Option<String> = stmt
                .query_row(params![id], |row| row.get(0))
                .optional()?;
            let payload = payload.ok_or_else(|| RepositoryError::NotFound {
                entity: "BlockRequest".to_string(),
                id: id.clone(),
            })?;
            records.push(Self::decode(id, &payload)?);
        }
        Ok(records)
    }

    async fn list_all(&self) -> RepositoryResult<Vec<BlockRequest>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, payload FROM block_request ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, payload) = row?;
            records.push(Self::decode(&id, &payload)?);
        }
        Ok(records)
    }

    async fn upsert_batch(&self, records: &[BlockRequest]) -> RepositoryResult<usize> {
        let payloads = records
            .iter()
            .map(|r| Self::encode(r).map(|p| (r.id.as_str(), p)))
            .collect::<RepositoryResult<Vec<_>>>()?;

        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let now = Utc::now().to_rfc3339();
        let mut count = 0;
        {
            let mut stmt = tx.prepare(UPSERT_SQL)?;
            for (id, payload) in &payloads {
                stmt.execute(params![id, payload, now])?;
                count += 1;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        tracing::debug!("批量写入封锁申请 {} 条", count);
        Ok(count)
    }

    async fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM block_request", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}
