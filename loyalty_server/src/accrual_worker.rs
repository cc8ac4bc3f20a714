use accrual_client::AccrualApi;
use log::*;
use loyalty_engine::{AccrualReconciler, ReconcilerConfig, SqliteDatabase};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Starts the accrual reconciler. The worker runs until `shutdown` is cancelled; await the returned JoinHandle after
/// cancelling to let an in-progress round wind down.
pub fn start_accrual_worker(
    db: SqliteDatabase,
    oracle: AccrualApi,
    config: ReconcilerConfig,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("🔄️ Accrual worker polling {}", oracle.config().base_url);
        let reconciler = AccrualReconciler::new(db, oracle, config);
        reconciler.run(shutdown).await;
    })
}
