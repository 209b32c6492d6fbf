// ==========================================
// 铁路施工封锁申请 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::pipeline_config::{parse_flag, PipelineConfig};
use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 并建表 (幂等)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值 (存在则覆盖)
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照 (JSON)
    ///
    /// # 用途
    /// - 每次优化运行时记入日志, 便于事后追溯
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&config_map).map_err(|e| RepositoryError::SerializationError {
            id: "config_kv".to_string(),
            message: e.to_string(),
        })
    }

    /// 加载优化管线配置
    ///
    /// 缺失或格式错误的键回退默认值 (记 warn), 不阻断运行
    pub fn load_pipeline_config(&self) -> RepositoryResult<PipelineConfig> {
        let defaults = PipelineConfig::default();

        let strict_consistency = self.read_parsed(
            config_keys::STRICT_CONSISTENCY,
            defaults.strict_consistency,
            parse_flag,
        )?;
        let reference_date = self.read_parsed(
            config_keys::REFERENCE_DATE,
            defaults.reference_date,
            |v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok(),
        )?;
        let reference_utc_offset_minutes = self.read_parsed(
            config_keys::REFERENCE_UTC_OFFSET_MINUTES,
            defaults.reference_utc_offset_minutes,
            |v| v.trim().parse::<i32>().ok(),
        )?;
        let optimizer_endpoint = self
            .get_global_config_value(config_keys::OPTIMIZER_ENDPOINT)?
            .map(|v| v.trim().to_string())
            .unwrap_or(defaults.optimizer_endpoint);
        let optimizer_timeout_secs = self.read_parsed(
            config_keys::OPTIMIZER_TIMEOUT_SECS,
            defaults.optimizer_timeout_secs,
            |v| v.trim().parse::<u64>().ok(),
        )?;

        Ok(PipelineConfig {
            strict_consistency,
            reference_date,
            reference_utc_offset_minutes,
            optimizer_endpoint,
            optimizer_timeout_secs,
        })
    }

    fn read_parsed<T, F>(&self, key: &str, default: T, parse: F) -> RepositoryResult<T>
    where
        F: Fn(&str) -> Option<T>,
    {
        let Some(raw) = self.get_global_config_value(key)? else {
            return Ok(default);
        };
        Ok(parse(&raw).unwrap_or_else(|| {
            tracing::warn!(config_key = key, raw_value = %raw, "配置格式错误，使用默认值");
            default
        }))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 重建一致性
    pub const STRICT_CONSISTENCY: &str = "reconstruct_strict_consistency";

    // 重建时间参考
    pub const REFERENCE_DATE: &str = "reconstruct_reference_date";
    pub const REFERENCE_UTC_OFFSET_MINUTES: &str = "reconstruct_reference_utc_offset_minutes";

    // 优化服务
    pub const OPTIMIZER_ENDPOINT: &str = "optimizer_endpoint";
    pub const OPTIMIZER_TIMEOUT_SECS: &str = "optimizer_timeout_secs";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_empty_table_gives_defaults() {
        let config = manager().load_pipeline_config().unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_overrides_are_read() {
        let mgr = manager();
        mgr.set_global_config_value(config_keys::STRICT_CONSISTENCY, "true")
            .unwrap();
        mgr.set_global_config_value(config_keys::REFERENCE_DATE, "2024-01-01")
            .unwrap();
        mgr.set_global_config_value(config_keys::REFERENCE_UTC_OFFSET_MINUTES, "330")
            .unwrap();
        mgr.set_global_config_value(config_keys::OPTIMIZER_ENDPOINT, " http://opt/run ")
            .unwrap();

        let config = mgr.load_pipeline_config().unwrap();
        assert!(config.strict_consistency);
        assert_eq!(
            config.reference_date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(config.reference_utc_offset_minutes, 330);
        assert_eq!(config.optimizer_endpoint, "http://opt/run");
    }

    #[test]
    fn test_malformed_value_falls_back() {
        let mgr = manager();
        mgr.set_global_config_value(config_keys::OPTIMIZER_TIMEOUT_SECS, "soon")
            .unwrap();
        mgr.set_global_config_value(config_keys::REFERENCE_DATE, "01/01/2024")
            .unwrap();

        let config = mgr.load_pipeline_config().unwrap();
        assert_eq!(config.optimizer_timeout_secs, 60);
        assert_eq!(config.reference_date, PipelineConfig::default().reference_date);
    }

    #[test]
    fn test_snapshot_is_sorted_json() {
        let mgr = manager();
        mgr.set_global_config_value("b_key", "2").unwrap();
        mgr.set_global_config_value("a_key", "1").unwrap();
        mgr.set_global_config_value("a_key", "3").unwrap();

        let snapshot = mgr.get_config_snapshot().unwrap();
        assert_eq!(snapshot, r#"{"a_key":"3","b_key":"2"}"#);
    }
}
