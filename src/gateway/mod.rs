// ==========================================
// 铁路施工封锁申请 - 优化服务网关层
// ==========================================
// 职责: 对接外部时间窗优化服务
// ==========================================

pub mod error;
pub mod http_gateway;
pub mod optimizer_gateway;

pub use error::{GatewayError, GatewayResult};
pub use http_gateway::HttpOptimizerGateway;
pub use optimizer_gateway::{IdentityOptimizer, OptimizerGateway};
