use futures_util::future::BoxFuture;
use sqlx::{MySqlConnection, MySqlPool};

use crate::core::Result;

/// Run `work` as one all-or-nothing unit against a fresh transaction.
///
/// The closure receives the transaction's connection; every write issued through it
/// commits together when the closure returns `Ok`, and is rolled back when it returns
/// `Err` (or when the future is dropped before completion).
///
/// ```ignore
/// let sale = in_transaction(&pool, move |conn| {
///     Box::pin(async move {
///         let batches = StockRepository::lock_available(conn).await?;
///         // ...
///         Ok(sale)
///     })
/// })
/// .await?;
/// ```
pub async fn in_transaction<T, F>(pool: &MySqlPool, work: F) -> Result<T>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut MySqlConnection) -> BoxFuture<'c, Result<T>> + Send,
{
    let mut tx = pool.begin().await?;

    match work(&mut *tx).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "Failed to roll back transaction");
            }
            tracing::debug!(error = %err, "Unit of work rolled back");
            Err(err)
        }
    }
}
