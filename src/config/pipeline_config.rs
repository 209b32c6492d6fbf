// ==========================================
// 铁路施工封锁申请 - 优化管线配置
// ==========================================
// 来源优先级: 环境变量 > config_kv 表 > 默认值
// ==========================================

use crate::engine::reconstructor::ReconstructOptions;
use crate::engine::time_format::TimeReference;
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_OPTIMIZER_URL: &str = "RAILWAY_BLOCK_APS_OPTIMIZER_URL";
pub const ENV_OPTIMIZER_TIMEOUT_SECS: &str = "RAILWAY_BLOCK_APS_OPTIMIZER_TIMEOUT_SECS";
pub const ENV_STRICT_CONSISTENCY: &str = "RAILWAY_BLOCK_APS_STRICT";

pub const DEFAULT_OPTIMIZER_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 重建时是否拒绝违反组合ID不变量的输入
    pub strict_consistency: bool,
    /// HH:mm 重建锚定日期
    pub reference_date: NaiveDate,
    /// 重建输出时间戳的 UTC 偏移 (分钟)
    pub reference_utc_offset_minutes: i32,
    /// 优化服务地址 (空 = 未配置)
    pub optimizer_endpoint: String,
    pub optimizer_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strict_consistency: false,
            reference_date: TimeReference::default_date(),
            reference_utc_offset_minutes: 0,
            optimizer_endpoint: String::new(),
            optimizer_timeout_secs: DEFAULT_OPTIMIZER_TIMEOUT_SECS,
        }
    }
}

impl PipelineConfig {
    /// 参考时区; 偏移越界时回退 UTC
    pub fn reference_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.reference_utc_offset_minutes.saturating_mul(60)).unwrap_or_else(
            || {
                tracing::warn!(
                    offset_minutes = self.reference_utc_offset_minutes,
                    "参考时区偏移越界，使用 UTC"
                );
                Utc.fix()
            },
        )
    }

    pub fn reconstruct_options(&self) -> ReconstructOptions {
        ReconstructOptions {
            strict: self.strict_consistency,
            reference: TimeReference::new(self.reference_date, self.reference_offset()),
        }
    }

    pub fn optimizer_timeout(&self) -> Duration {
        Duration::from_secs(self.optimizer_timeout_secs.max(1))
    }

    /// 应用环境变量覆写
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_OPTIMIZER_URL) {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                self.optimizer_endpoint = trimmed.to_string();
            }
        }
        if let Some(secs) = std::env::var(ENV_OPTIMIZER_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.optimizer_timeout_secs = secs;
        }
        if let Ok(v) = std::env::var(ENV_STRICT_CONSISTENCY) {
            self.strict_consistency = parse_flag(&v).unwrap_or(self.strict_consistency);
        }
    }
}

/// 解析布尔开关
pub fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reconstruct_options() {
        let options = PipelineConfig::default().reconstruct_options();
        assert!(!options.strict);
        assert_eq!(options.reference, TimeReference::default());
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        let config = PipelineConfig {
            reference_utc_offset_minutes: 24 * 60,
            ..Default::default()
        };
        assert_eq!(config.reference_offset(), Utc.fix());

        let ist = PipelineConfig {
            reference_utc_offset_minutes: 330,
            ..Default::default()
        };
        assert_eq!(ist.reference_offset().local_minus_utc(), 330 * 60);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(" YES "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
