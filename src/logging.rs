// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 支持环境变量配置日志级别与 JSON 输出
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// JSON 日志开关
pub const ENV_LOG_JSON: &str = "RAILWAY_BLOCK_APS_LOG_JSON";

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=railway_block_aps=trace
/// - RAILWAY_BLOCK_APS_LOG_JSON=1: 输出 JSON 行日志（便于采集）
///
/// # 示例
/// ```no_run
/// use railway_block_aps::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var(ENV_LOG_JSON)
        .ok()
        .and_then(|v| crate::config::pipeline_config::parse_flag(&v))
        .unwrap_or(false);

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    // 重复初始化 (测试/嵌入场景) 时忽略错误
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，便于调试
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
