// ==========================================
// 铁路施工封锁申请 - 时间格式规范化
// ==========================================
// 展平: 时间戳 → yyyy-MM-dd / HH:mm (有损, 单向)
// 重建: yyyy-MM-dd → 参考时区的零点
//       HH:mm      → 参考日期 + 参考时区
// 红线: 取时间戳书写时自身偏移下的墙上时间, 不做 UTC 换算
// ==========================================

use crate::engine::error::{TransformError, TransformResult};
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, SecondsFormat, TimeZone,
    Utc,
};

pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";
pub const CANONICAL_TIME_FORMAT: &str = "%H:%M";

const DATE_EXPECTED: &str = "yyyy-MM-dd";
const TIME_EXPECTED: &str = "HH:mm";
const TIMESTAMP_EXPECTED: &str = "ISO-8601 时间戳";

/// 重建时使用的参考日期与时区
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeReference {
    /// HH:mm 锚定到的日期
    pub date: NaiveDate,
    /// 输出时间戳的偏移
    pub offset: FixedOffset,
}

impl TimeReference {
    pub fn new(date: NaiveDate, offset: FixedOffset) -> Self {
        Self { date, offset }
    }

    /// 默认参考日期 2000-01-01
    pub fn default_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
    }
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            date: Self::default_date(),
            offset: Utc.fix(),
        }
    }
}

/// 解析后端时间戳, 返回书写偏移下的墙上时间
fn parse_wall_clock(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// 日期字段 → yyyy-MM-dd (丢弃时分)
pub fn to_canonical_date(id: &str, field: &'static str, value: &str) -> TransformResult<String> {
    let date = parse_wall_clock(value)
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(value.trim(), CANONICAL_DATE_FORMAT).ok())
        .ok_or_else(|| TransformError::FormatError {
            id: id.to_string(),
            field,
            expected: TIMESTAMP_EXPECTED,
            value: value.to_string(),
        })?;
    Ok(date.format(CANONICAL_DATE_FORMAT).to_string())
}

/// 时刻字段 → HH:mm (丢弃秒、偏移与日期)
pub fn to_canonical_time(id: &str, field: &'static str, value: &str) -> TransformResult<String> {
    let dt = parse_wall_clock(value).ok_or_else(|| TransformError::FormatError {
        id: id.to_string(),
        field,
        expected: TIMESTAMP_EXPECTED,
        value: value.to_string(),
    })?;
    Ok(dt.format(CANONICAL_TIME_FORMAT).to_string())
}

fn render(
    id: &str,
    field: &'static str,
    expected: &'static str,
    value: &str,
    naive: NaiveDateTime,
    offset: FixedOffset,
) -> TransformResult<String> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .ok_or_else(|| TransformError::FormatError {
            id: id.to_string(),
            field,
            expected,
            value: value.to_string(),
        })
}

/// yyyy-MM-dd → 参考时区零点时间戳
pub fn expand_date(
    id: &str,
    field: &'static str,
    value: &str,
    reference: &TimeReference,
) -> TransformResult<String> {
    let date = NaiveDate::parse_from_str(value.trim(), CANONICAL_DATE_FORMAT).map_err(|_| {
        TransformError::FormatError {
            id: id.to_string(),
            field,
            expected: DATE_EXPECTED,
            value: value.to_string(),
        }
    })?;
    render(
        id,
        field,
        DATE_EXPECTED,
        value,
        date.and_time(NaiveTime::MIN),
        reference.offset,
    )
}

/// HH:mm → 参考日期 + 参考时区时间戳
pub fn expand_time(
    id: &str,
    field: &'static str,
    value: &str,
    reference: &TimeReference,
) -> TransformResult<String> {
    let time = NaiveTime::parse_from_str(value.trim(), CANONICAL_TIME_FORMAT).map_err(|_| {
        TransformError::FormatError {
            id: id.to_string(),
            field,
            expected: TIME_EXPECTED,
            value: value.to_string(),
        }
    })?;
    render(
        id,
        field,
        TIME_EXPECTED,
        value,
        reference.date.and_time(time),
        reference.offset,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_date_from_rfc3339() {
        assert_eq!(
            to_canonical_date("r1", "date", "2024-03-10T00:00:00Z").unwrap(),
            "2024-03-10"
        );
        // 非 UTC 偏移不换算, 日期不漂移
        assert_eq!(
            to_canonical_date("r1", "date", "2024-03-10T00:30:00+05:30").unwrap(),
            "2024-03-10"
        );
        assert_eq!(
            to_canonical_date("r1", "date", "2024-03-10").unwrap(),
            "2024-03-10"
        );
    }

    #[test]
    fn test_canonical_time_keeps_wall_clock() {
        assert_eq!(
            to_canonical_time("r1", "demandTimeFrom", "2024-03-10T06:15:42Z").unwrap(),
            "06:15"
        );
        assert_eq!(
            to_canonical_time("r1", "demandTimeFrom", "2024-03-10T21:05:00+05:30").unwrap(),
            "21:05"
        );
        assert_eq!(
            to_canonical_time("r1", "demandTimeTo", "2024-03-10 07:45:00").unwrap(),
            "07:45"
        );
    }

    #[test]
    fn test_canonical_time_rejects_garbage() {
        let err = to_canonical_time("r9", "demandTimeFrom", "not-a-date").unwrap_err();
        match err {
            TransformError::FormatError { id, field, value, .. } => {
                assert_eq!(id, "r9");
                assert_eq!(field, "demandTimeFrom");
                assert_eq!(value, "not-a-date");
            }
            other => panic!("意外错误: {:?}", other),
        }
        // 纯日期不能当作时刻
        assert!(to_canonical_time("r9", "demandTimeTo", "2024-03-10").is_err());
    }

    #[test]
    fn test_expand_uses_reference() {
        let reference = TimeReference::default();
        assert_eq!(
            expand_date("r1", "date", "2024-03-10", &reference).unwrap(),
            "2024-03-10T00:00:00Z"
        );
        assert_eq!(
            expand_time("r1", "demandTimeFrom", "06:15", &reference).unwrap(),
            "2000-01-01T06:15:00Z"
        );

        let ist = TimeReference::new(
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            FixedOffset::east_opt(5 * 3600 + 1800).unwrap(),
        );
        assert_eq!(
            expand_time("r1", "demandTimeFrom", "06:15", &ist).unwrap(),
            "2024-03-10T06:15:00+05:30"
        );
    }

    #[test]
    fn test_expand_rejects_non_canonical() {
        let reference = TimeReference::default();
        assert!(expand_date("r1", "date", "10/03/2024", &reference).is_err());
        assert!(expand_time("r1", "demandTimeFrom", "6.15am", &reference).is_err());
    }
}
