// ==========================================
// 铁路施工封锁申请 - 变换错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 变换为纯函数, 失败即整批失败 (不做部分输出)
// ==========================================

use thiserror::Error;

/// 展平/重建错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("日期格式错误 (记录 {id}, 字段 {field}): 期望 {expected}，实际 {value}")]
    FormatError {
        id: String,
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("分组一致性错误: {0}")]
    Consistency(ConsistencyIssue),
}

/// 重建输入违反组合ID不变量的情形
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyIssue {
    /// combinationId 只对应一条展平记录
    OrphanCombination { combination_id: String, id: String },
    /// 多条 combinationId 为空的记录共享同一 id
    AmbiguousRecord { id: String, members: usize },
    /// 同一 id 分散在多个分组中 (如部分成员丢失 combinationId)
    SplitRecord { id: String, groups: usize },
}

impl std::fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsistencyIssue::OrphanCombination { combination_id, id } => write!(
                f,
                "组合ID {} 仅有一条记录 (id={})",
                combination_id, id
            ),
            ConsistencyIssue::AmbiguousRecord { id, members } => write!(
                f,
                "无组合ID的记录 id={} 出现 {} 次",
                id, members
            ),
            ConsistencyIssue::SplitRecord { id, groups } => {
                write!(f, "记录 id={} 分散在 {} 个分组中", id, groups)
            }
        }
    }
}

/// Result 类型别名
pub type TransformResult<T> = Result<T, TransformError>;
