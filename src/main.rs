// ==========================================
// 铁路施工封锁申请优化 - 命令行入口
// ==========================================
// 用法:
//   railway-block-aps import <records.json>      导入后端导出的申请 (JSON 数组)
//   railway-block-aps flatten [id...]            打印展平结果
//   railway-block-aps optimise [--dry-run] [id...]  --dry-run: 原样往返, 不回写
// 数据库: RAILWAY_BLOCK_APS_DB_PATH 或用户数据目录
// ==========================================

use anyhow::{bail, Context};
use railway_block_aps::config::ConfigManager;
use railway_block_aps::db::default_db_path;
use railway_block_aps::domain::BlockRequest;
use railway_block_aps::engine::OptimisationOrchestrator;
use railway_block_aps::gateway::{HttpOptimizerGateway, IdentityOptimizer, OptimizerGateway};
use railway_block_aps::repository::{BlockRequestRepository, SqliteBlockRequestRepository};
use std::sync::Arc;

const USAGE: &str = "用法: railway-block-aps <import <file>|flatten [id...]|optimise [--dry-run] [id...]>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    railway_block_aps::logging::init();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_default();
    let rest: Vec<String> = args.collect();

    let db_path = default_db_path();
    tracing::info!("铁路施工封锁申请优化 v{} - 数据库: {}", railway_block_aps::VERSION, db_path);

    let repository = Arc::new(
        SqliteBlockRequestRepository::new(&db_path).context("打开封锁申请库失败")?,
    );
    let config_manager = ConfigManager::new(&db_path).context("打开配置表失败")?;
    let mut config = config_manager.load_pipeline_config()?;
    config.apply_env_overrides();
    tracing::debug!("配置快照: {}", config_manager.get_config_snapshot()?);

    match command.as_str() {
        "import" => {
            let Some(file) = rest.first() else {
                bail!("{}", USAGE);
            };
            let raw = std::fs::read_to_string(file).with_context(|| format!("读取 {} 失败", file))?;
            let records: Vec<BlockRequest> =
                serde_json::from_str(&raw).with_context(|| format!("解析 {} 失败", file))?;
            let count = repository.upsert_batch(&records).await?;
            println!("imported={}", count);
        }
        "flatten" | "optimise" => {
            let dry_run = rest.iter().any(|a| a == "--dry-run");
            let ids: Vec<String> = rest.into_iter().filter(|a| !a.starts_with("--")).collect();
            let ids = if ids.is_empty() { None } else { Some(ids) };

            let gateway: Arc<dyn OptimizerGateway> = if dry_run || command == "flatten" {
                Arc::new(IdentityOptimizer)
            } else {
                Arc::new(HttpOptimizerGateway::new(
                    config.optimizer_endpoint.clone(),
                    config.optimizer_timeout(),
                )?)
            };

            let orchestrator =
                OptimisationOrchestrator::new(repository, gateway, config.reconstruct_options());

            if command == "flatten" {
                let flat = orchestrator.preview(ids.as_deref()).await?;
                println!("{}", serde_json::to_string_pretty(&flat)?);
            } else {
                let summary = if dry_run {
                    orchestrator.dry_run(ids.as_deref()).await?
                } else {
                    orchestrator.run(ids.as_deref()).await?
                };
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
        }
        _ => bail!("{}", USAGE),
    }

    Ok(())
}
