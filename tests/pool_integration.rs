//! Integration tests for the dispatch pool.
//!
//! Each test builds a real pool (built-in math module or a stub loader),
//! drives it through the public API, and checks the correlation contract:
//! every caller gets exactly the result of its own task.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::timeout;

use compute_pool::config::PoolConfig;
use compute_pool::error::{Error, ModuleError, PoolError};
use compute_pool::module::builtin::MATH_MODULE;
use compute_pool::module::{
    ComputeModule, FnOperation, ModuleLoader, ModuleRegistry, StaticModule,
};
use compute_pool::pool::Pool;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

async fn math_pool(workers: usize) -> Pool {
    let pool = Pool::new(PoolConfig::with_workers(workers));
    pool.initialize(MATH_MODULE).await.unwrap();
    pool
}

#[tokio::test]
async fn concurrent_adds_resolve_to_their_own_sums() {
    init_tracing();
    let pool = Arc::new(math_pool(2).await);

    let small = {
        let pool = Arc::clone(&pool);
        tokio::spawn(async move { pool.run("add", vec![json!(1), json!(2)]).await })
    };
    let large = {
        let pool = Arc::clone(&pool);
        tokio::spawn(async move { pool.run("add", vec![json!(10), json!(20)]).await })
    };

    let small = timeout(TEST_TIMEOUT, small).await.unwrap().unwrap().unwrap();
    let large = timeout(TEST_TIMEOUT, large).await.unwrap().unwrap().unwrap();
    assert_eq!(small, json!(3.0));
    assert_eq!(large, json!(30.0));

    pool.shutdown().await;
}

#[tokio::test]
async fn no_cross_talk_across_many_concurrent_callers() {
    init_tracing();
    let pool = Arc::new(math_pool(4).await);

    let calls: Vec<_> = (0..32)
        .map(|x| {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { (x, pool.run("identity", vec![json!(x)]).await) })
        })
        .collect();

    let results = timeout(TEST_TIMEOUT, futures::future::join_all(calls))
        .await
        .unwrap();
    for joined in results {
        let (x, result) = joined.unwrap();
        assert_eq!(result.unwrap(), json!(x), "caller {x} got a foreign result");
    }

    assert_eq!(pool.pending_count().await, 0);
    pool.shutdown().await;
}

#[tokio::test]
async fn single_worker_processes_sequentially_in_order() {
    init_tracing();
    let pool = math_pool(1).await;

    let mut results = Vec::new();
    for x in [1, 2, 3] {
        results.push(pool.run("identity", vec![json!(x)]).await.unwrap());
    }
    assert_eq!(results, vec![json!(1), json!(2), json!(3)]);

    pool.shutdown().await;
}

#[tokio::test]
async fn missing_operation_names_the_operation_and_pool_survives() {
    init_tracing();
    let pool = math_pool(2).await;

    let err = pool.run("missingFn", vec![]).await.unwrap_err();
    assert!(err.to_string().contains("missingFn"));

    // Failure is local to that one call.
    let result = pool.run("add", vec![json!(2), json!(2)]).await.unwrap();
    assert_eq!(result, json!(4.0));

    pool.shutdown().await;
}

#[tokio::test]
async fn run_before_initialize_touches_no_worker() {
    init_tracing();
    let pool = Pool::new(PoolConfig::default());

    let err = pool.run("add", vec![json!(1), json!(2)]).await.unwrap_err();
    assert!(matches!(err, Error::Pool(PoolError::NotInitialized)));
    assert_eq!(pool.worker_count().await, 0);
    assert_eq!(pool.pending_count().await, 0);
}

#[tokio::test]
async fn aggregate_operations_end_to_end() {
    init_tracing();
    let pool = math_pool(2).await;

    let mean = pool.run("mean", vec![json!([1, 2, 3, 4])]).await.unwrap();
    assert_eq!(mean, json!(2.5));

    let median = pool
        .run("median", vec![json!([4.0, 1.0, 3.0, 2.0])])
        .await
        .unwrap();
    assert_eq!(median, json!(2.5));

    let dot = pool
        .run("dot", vec![json!([1, 2]), json!([3, 4])])
        .await
        .unwrap();
    assert_eq!(dot, json!(11.0));

    pool.shutdown().await;
}

// ── stub module collaborator ────────────────────────────────────────

/// Stub loader counting loads, standing in for an expensive module.
struct CountingLoader {
    loads: Arc<AtomicUsize>,
}

#[async_trait]
impl ModuleLoader for CountingLoader {
    async fn load(&self) -> Result<Arc<dyn ComputeModule>, ModuleError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(StaticModule::new("stub").register(
            FnOperation::new("echo", |args: &[Value]| {
                Ok(args.first().cloned().unwrap_or(Value::Null))
            }),
        )))
    }
}

#[tokio::test]
async fn module_loads_at_most_once_per_worker() {
    init_tracing();
    let loads = Arc::new(AtomicUsize::new(0));

    let registry = ModuleRegistry::new();
    registry
        .register(
            "stub",
            Arc::new(CountingLoader {
                loads: Arc::clone(&loads),
            }),
        )
        .await;

    let pool = Pool::with_registry(PoolConfig::with_workers(2), Arc::new(registry));
    pool.initialize("stub").await.unwrap();

    for x in 0..16 {
        let result = pool.run("echo", vec![json!(x)]).await.unwrap();
        assert_eq!(result, json!(x));
    }

    let observed = loads.load(Ordering::SeqCst);
    assert!(
        (1..=2).contains(&observed),
        "expected one lazy load per used worker, saw {observed}"
    );

    pool.shutdown().await;
}

#[tokio::test]
async fn unknown_module_reference_fails_at_initialize() {
    init_tracing();
    let pool = Pool::new(PoolConfig::default());
    let err = pool.initialize("not-a-module").await.unwrap_err();
    assert!(matches!(err, Error::Module(ModuleError::NotFound { .. })));
    assert!(err.to_string().contains("not-a-module"));
}
