// ==========================================
// 铁路施工封锁申请 - API层错误类型
// ==========================================
// 职责: 把各层技术错误转换为面向用户的错误消息
// 说明: 所有错误信息必须包含显式原因
// ==========================================

use crate::engine::error::TransformError;
use crate::engine::orchestrator::OrchestratorError;
use crate::gateway::error::GatewayError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 权限
    // ==========================================
    #[error("无权限: user={user_id}, role={role}, 操作={action}")]
    PermissionDenied {
        user_id: String,
        role: String,
        action: String,
    },

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 外部服务
    // ==========================================
    #[error("优化服务不可用: {0}")]
    OptimizerUnavailable(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::SerializationError { id, message } => {
                ApiError::ValidationError(format!("记录 {} 无法解析: {}", id, message))
            }
        }
    }
}

// ==========================================
// 从 TransformError 转换
// ==========================================
// 格式错误说明上游数据有问题, 对用户表现为 "请求数据无效"
impl From<TransformError> for ApiError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::FormatError { .. } => {
                ApiError::InvalidInput(format!("请求数据无效: {}", err))
            }
            TransformError::Consistency(issue) => {
                ApiError::ValidationError(format!("优化结果分组不一致: {}", issue))
            }
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::EndpointNotConfigured => ApiError::InternalError(err.to_string()),
            other => ApiError::OptimizerUnavailable(other.to_string()),
        }
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::Repository(e) => e.into(),
            OrchestratorError::Transform(e) => e.into(),
            OrchestratorError::Gateway(e) => e.into(),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::ConsistencyIssue;

    #[test]
    fn test_format_error_becomes_invalid_input() {
        let err: ApiError = TransformError::FormatError {
            id: "r1".to_string(),
            field: "date",
            expected: "yyyy-MM-dd",
            value: "bad".to_string(),
        }
        .into();

        match err {
            ApiError::InvalidInput(msg) => {
                assert!(msg.starts_with("请求数据无效"));
                assert!(msg.contains("r1"));
            }
            other => panic!("意外错误: {:?}", other),
        }
    }

    #[test]
    fn test_consistency_error_becomes_validation_error() {
        let err: ApiError = OrchestratorError::Transform(TransformError::Consistency(
            ConsistencyIssue::AmbiguousRecord {
                id: "r1".to_string(),
                members: 2,
            },
        ))
        .into();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[test]
    fn test_gateway_errors() {
        let err: ApiError = GatewayError::Status {
            status: 503,
            body: "busy".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::OptimizerUnavailable(_)));

        let err: ApiError = GatewayError::EndpointNotConfigured.into();
        assert!(matches!(err, ApiError::InternalError(_)));
    }

    #[test]
    fn test_not_found_message() {
        let err: ApiError = RepositoryError::NotFound {
            entity: "BlockRequest".to_string(),
            id: "r404".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "资源未找到: BlockRequest(id=r404)不存在");
    }
}
