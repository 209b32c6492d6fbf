// ==========================================
// 优化 API 集成测试
// ==========================================
// 测试范围: 角色校验、参数校验、错误翻译
// ==========================================


use railway_block_aps::api::{ApiError, OptimisationApi};
use railway_block_aps::domain::{CurrentUser, Role};
use railway_block_aps::engine::{OptimisationOrchestrator, ReconstructOptions};
use railway_block_aps::gateway::OptimizerGateway;
use railway_block_aps::repository::{BlockRequestRepository, SqliteBlockRequestRepository};
use std::sync::Arc;
use tempfile::NamedTempFile;
use test_helpers::{
    create_test_db, line, AnnotatingOptimizer, BlockRequestBuilder, FailingOptimizer,
};

async fn build_api(gateway: Arc<dyn OptimizerGateway>) -> (NamedTempFile, OptimisationApi) {
    let (tmp, db_path) = create_test_db();
    let repo = Arc::new(SqliteBlockRequestRepository::new(&db_path).unwrap());
    repo.upsert_batch(&[
        BlockRequestBuilder::new("r1")
            .section(line("A", "UP", ""))
            .section(line("B", "DN", ""))
            .build(),
        BlockRequestBuilder::new("bad")
            .window("2024-03-10T06:15:00Z", "07:45")
            .build(),
    ])
    .await
    .unwrap();

    let orch = OptimisationOrchestrator::new(repo, gateway, ReconstructOptions::default());
    (tmp, OptimisationApi::new(Arc::new(orch)))
}

fn manager() -> CurrentUser {
    CurrentUser::new("u-manager", Role::Manager)
}

#[tokio::test]
async fn test_plain_user_is_denied() {
    let optimizer = Arc::new(AnnotatingOptimizer::new());
    let (_tmp, api) = build_api(optimizer.clone()).await;

    let user = CurrentUser::new("u-1", Role::User);
    let err = api
        .run_optimisation(&user, Some(vec!["r1".to_string()]))
        .await
        .unwrap_err();

    match err {
        ApiError::PermissionDenied { user_id, role, .. } => {
            assert_eq!(user_id, "u-1");
            assert_eq!(role, "USER");
        }
        other => panic!("意外错误: {:?}", other),
    }
    assert_eq!(optimizer.call_count(), 0);
}

#[tokio::test]
async fn test_manager_and_admin_can_run() {
    let (_tmp, api) = build_api(Arc::new(AnnotatingOptimizer::new())).await;

    let summary = api
        .run_optimisation(&manager(), Some(vec![" r1 ".to_string(), "r1".to_string()]))
        .await
        .unwrap();
    assert_eq!(summary.source_count, 1);
    assert_eq!(summary.flat_count, 2);
    assert_eq!(summary.submitted_count, 1);

    let admin = CurrentUser::new("u-admin", Role::Admin);
    let flat = api
        .preview_flatten(&admin, Some(vec!["r1".to_string()]))
        .await
        .unwrap();
    assert_eq!(flat.len(), 2);
}

#[tokio::test]
async fn test_malformed_time_is_invalid_input() {
    let (_tmp, api) = build_api(Arc::new(AnnotatingOptimizer::new())).await;

    let err = api
        .run_optimisation(&manager(), Some(vec!["bad".to_string()]))
        .await
        .unwrap_err();
    match err {
        ApiError::InvalidInput(msg) => {
            assert!(msg.starts_with("请求数据无效"));
            assert!(msg.contains("bad"));
        }
        other => panic!("意外错误: {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let (_tmp, api) = build_api(Arc::new(AnnotatingOptimizer::new())).await;

    let err = api
        .run_optimisation(&manager(), Some(vec!["r404".to_string()]))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_blank_id_list_is_rejected() {
    let (_tmp, api) = build_api(Arc::new(AnnotatingOptimizer::new())).await;

    let err = api
        .run_optimisation(&manager(), Some(vec!["   ".to_string()]))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_optimizer_failure_is_reported() {
    let (_tmp, api) = build_api(Arc::new(FailingOptimizer)).await;

    let err = api
        .run_optimisation(&manager(), Some(vec!["r1".to_string()]))
        .await
        .unwrap_err();
    match err {
        ApiError::OptimizerUnavailable(msg) => assert!(msg.contains("503")),
        other => panic!("意外错误: {:?}", other),
    }
}
