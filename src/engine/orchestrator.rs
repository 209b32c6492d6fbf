// ==========================================
// 铁路施工封锁申请 - 优化管线编排器
// ==========================================
// 流程: 读取申请 → 展平 → 优化服务 → 重建 → 回写
// 红线:
// - 任一步失败即中止, 回写之前不产生任何写入
// - 演练 (dry_run) 不回写
// - 往返有损: 安全/作业字段被清空, 时刻只保留 HH:mm
// ==========================================

use crate::domain::{BlockRequest, FlatRecord};
use crate::engine::error::{ConsistencyIssue, TransformError};
use crate::engine::flattener::Flattener;
use crate::engine::reconstructor::{ReconstructOptions, Reconstructor};
use crate::gateway::{GatewayError, OptimizerGateway};
use crate::repository::{BlockRequestRepository, RepositoryError};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use uuid::Uuid;

/// 管线错误 (按失败阶段归类)
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("读取/回写封锁申请失败: {0}")]
    Repository(#[from] RepositoryError),

    #[error("记录变换失败: {0}")]
    Transform(#[from] TransformError),

    #[error("优化服务调用失败: {0}")]
    Gateway(#[from] GatewayError),
}

/// 单次优化运行摘要
#[derive(Debug, Clone, Serialize)]
pub struct OptimisationRunSummary {
    pub run_id: String,
    pub source_count: usize,
    pub flat_count: usize,
    pub optimised_count: usize,
    pub submitted_count: usize,
    #[serde(skip)]
    pub warnings: Vec<ConsistencyIssue>,
    pub warning_messages: Vec<String>,
    pub elapsed_ms: u128,
}

pub struct OptimisationOrchestrator {
    repository: Arc<dyn BlockRequestRepository>,
    gateway: Arc<dyn OptimizerGateway>,
    flattener: Flattener,
    reconstructor: Reconstructor,
}

impl OptimisationOrchestrator {
    pub fn new(
        repository: Arc<dyn BlockRequestRepository>,
        gateway: Arc<dyn OptimizerGateway>,
        options: ReconstructOptions,
    ) -> Self {
        Self {
            repository,
            gateway,
            flattener: Flattener::default(),
            reconstructor: Reconstructor::new(options),
        }
    }

    /// 替换展平器 (自定义组合ID生成)
    pub fn with_flattener(mut self, flattener: Flattener) -> Self {
        self.flattener = flattener;
        self
    }

    /// 读取待优化申请: ids 为 None 时取全部
    async fn fetch(&self, ids: Option<&[String]>) -> Result<Vec<BlockRequest>, RepositoryError> {
        match ids {
            Some(ids) => self.repository.find_by_ids(ids).await,
            None => self.repository.list_all().await,
        }
    }

    /// 仅展平, 不调用优化服务 (预览用)
    pub async fn preview(
        &self,
        ids: Option<&[String]>,
    ) -> Result<Vec<FlatRecord>, OrchestratorError> {
        let records = self.fetch(ids).await?;
        Ok(self.flattener.flatten(&records)?)
    }

    /// 执行一次完整的优化往返并回写
    pub async fn run(
        &self,
        ids: Option<&[String]>,
    ) -> Result<OptimisationRunSummary, OrchestratorError> {
        self.execute(ids, true).await
    }

    /// 演练: 完整往返但不回写, submitted_count 恒为 0
    pub async fn dry_run(
        &self,
        ids: Option<&[String]>,
    ) -> Result<OptimisationRunSummary, OrchestratorError> {
        self.execute(ids, false).await
    }

    async fn execute(
        &self,
        ids: Option<&[String]>,
        submit: bool,
    ) -> Result<OptimisationRunSummary, OrchestratorError> {
        let started = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        tracing::info!(run_id = %run_id, submit, "开始优化运行");

        let records = self.fetch(ids).await?;
        if records.is_empty() {
            tracing::info!(run_id = %run_id, "无待优化申请，跳过优化服务调用");
            return Ok(OptimisationRunSummary {
                run_id,
                source_count: 0,
                flat_count: 0,
                optimised_count: 0,
                submitted_count: 0,
                warnings: Vec::new(),
                warning_messages: Vec::new(),
                elapsed_ms: started.elapsed().as_millis(),
            });
        }

        let flat = self.flattener.flatten(&records)?;
        let flat_count = flat.len();
        tracing::info!(
            run_id = %run_id,
            source_count = records.len(),
            flat_count,
            "展平完成 (安全/作业字段不随往返保留)"
        );

        let optimised = self.gateway.optimise(flat).await?;
        let optimised_count = optimised.len();
        if optimised_count != flat_count {
            tracing::warn!(
                run_id = %run_id,
                flat_count,
                optimised_count,
                "优化服务返回记录数与提交数不一致"
            );
        }

        let report = self.reconstructor.reconstruct_with_report(optimised)?;
        let submitted_count = if submit {
            self.repository.upsert_batch(&report.records).await?
        } else {
            tracing::info!(run_id = %run_id, records = report.records.len(), "演练模式，跳过回写");
            0
        };

        let warning_messages = report.warnings.iter().map(ToString::to_string).collect();
        let summary = OptimisationRunSummary {
            run_id,
            source_count: records.len(),
            flat_count,
            optimised_count,
            submitted_count,
            warnings: report.warnings,
            warning_messages,
            elapsed_ms: started.elapsed().as_millis(),
        };

        tracing::info!(
            run_id = %summary.run_id,
            submitted_count = summary.submitted_count,
            warnings = summary.warnings.len(),
            elapsed_ms = summary.elapsed_ms as u64,
            "优化运行完成"
        );
        Ok(summary)
    }
}
