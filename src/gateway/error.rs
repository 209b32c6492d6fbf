// ==========================================
// 铁路施工封锁申请 - 优化服务网关错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 超时/重试策略属于外部服务, 这里只做错误归类
// ==========================================

use thiserror::Error;

/// 优化服务调用错误
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("优化服务地址未配置")]
    EndpointNotConfigured,

    #[error("优化服务请求失败: {0}")]
    RequestFailed(String),

    #[error("优化服务请求超时: {0}")]
    Timeout(String),

    #[error("优化服务返回异常状态: status={status}, body={body}")]
    Status { status: u16, body: String },

    #[error("优化服务响应解析失败: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout(err.to_string())
        } else if err.is_decode() {
            GatewayError::InvalidResponse(err.to_string())
        } else {
            GatewayError::RequestFailed(err.to_string())
        }
    }
}

/// Result 类型别名
pub type GatewayResult<T> = Result<T, GatewayError>;
