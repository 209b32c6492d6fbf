// ==========================================
// 铁路施工封锁申请 - 领域类型定义
// ==========================================
// 职责: 线路/股道区段、分组键、角色
// 红线: 线路与股道的区分只允许出现在 LineSection 一处
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 区段 (LineSection)
// ==========================================
// 一个封锁申请涉及的一条线路或一条站场股道
// 线上 JSON 形状保持后端的全字段结构, 见 LineSectionWire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LineSectionWire", into = "LineSectionWire")]
pub enum LineSection {
    /// 区间线路
    Line {
        block: String,
        line_name: String,
        other_lines: Option<String>,
    },
    /// 站场股道
    Yard {
        block: String,
        stream: Option<String>,
        road: Option<String>,
        other_roads: Option<String>,
    },
}

impl LineSection {
    /// 线路判定: lineName / selectedLine 非空白即为线路
    pub fn is_line_name(name: &str) -> bool {
        !name.trim().is_empty()
    }

    /// 区段/站场标识
    pub fn block(&self) -> &str {
        match self {
            LineSection::Line { block, .. } | LineSection::Yard { block, .. } => block,
        }
    }

    /// 线路名 (股道返回 None)
    pub fn line_name(&self) -> Option<&str> {
        match self {
            LineSection::Line { line_name, .. } => Some(line_name),
            LineSection::Yard { .. } => None,
        }
    }

    /// 其他受影响线路/股道 (逗号分隔)
    pub fn other_affected(&self) -> Option<&str> {
        match self {
            LineSection::Line { other_lines, .. } => other_lines.as_deref(),
            LineSection::Yard { other_roads, .. } => other_roads.as_deref(),
        }
    }

    /// 股道所属车场 (线路返回 None)
    pub fn stream(&self) -> Option<&str> {
        match self {
            LineSection::Line { .. } => None,
            LineSection::Yard { stream, .. } => stream.as_deref(),
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, LineSection::Line { .. })
    }
}

/// 后端 JSON 中的区段形状 (全部字段可选)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSectionWire {
    #[serde(default)]
    pub block: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub section_type: Option<String>,
    #[serde(default)]
    pub line_name: Option<String>,
    #[serde(default)]
    pub other_lines: Option<String>,
    #[serde(default)]
    pub stream: Option<String>,
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub other_roads: Option<String>,
}

pub const SECTION_TYPE_LINE: &str = "line";
pub const SECTION_TYPE_YARD: &str = "yard";

impl From<LineSectionWire> for LineSection {
    fn from(wire: LineSectionWire) -> Self {
        match wire.line_name {
            Some(name) if LineSection::is_line_name(&name) => LineSection::Line {
                block: wire.block,
                line_name: name,
                other_lines: wire.other_lines,
            },
            _ => LineSection::Yard {
                block: wire.block,
                stream: wire.stream,
                road: wire.road,
                other_roads: wire.other_roads,
            },
        }
    }
}

impl From<LineSection> for LineSectionWire {
    fn from(section: LineSection) -> Self {
        match section {
            LineSection::Line {
                block,
                line_name,
                other_lines,
            } => LineSectionWire {
                block,
                section_type: Some(SECTION_TYPE_LINE.to_string()),
                line_name: Some(line_name),
                other_lines: Some(other_lines.unwrap_or_default()),
                stream: Some(String::new()),
                road: Some(String::new()),
                other_roads: Some(String::new()),
            },
            LineSection::Yard {
                block,
                stream,
                road,
                other_roads,
            } => LineSectionWire {
                block,
                section_type: Some(SECTION_TYPE_YARD.to_string()),
                line_name: Some(String::new()),
                other_lines: Some(String::new()),
                stream: Some(stream.unwrap_or_default()),
                road: Some(road.unwrap_or_default()),
                other_roads: Some(other_roads.unwrap_or_default()),
            },
        }
    }
}

// ==========================================
// 重建分组键 (Group Key)
// ==========================================
// 组合ID与记录ID分属不同命名空间, 类型层面不会相撞
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Combination(String),
    Record(String),
}

impl GroupKey {
    /// combinationId ?? id
    pub fn of(id: &str, combination_id: Option<&str>) -> Self {
        match combination_id {
            Some(combo) => GroupKey::Combination(combo.to_string()),
            None => GroupKey::Record(id.to_string()),
        }
    }

    pub fn is_combination(&self) -> bool {
        matches!(self, GroupKey::Combination(_))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Combination(id) => write!(f, "combination:{}", id),
            GroupKey::Record(id) => write!(f, "record:{}", id),
        }
    }
}

// ==========================================
// 用户角色 (Role)
// ==========================================
// 认证由外部完成, 这里只消费 "当前用户 + 角色"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,    // 普通申请人
    Manager, // 调度/审批
    Admin,   // 管理员
}

impl Role {
    /// 是否允许发起优化
    pub fn can_optimise(&self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "USER"),
            Role::Manager => write!(f, "MANAGER"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

/// 当前登录用户
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}
