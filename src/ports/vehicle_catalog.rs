//! Vehicle catalog port.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::catalog::Vehicle;

/// Port for reading the current stock snapshot.
///
/// `snapshot` is infallible by contract: implementations refresh stale
/// data when they can and serve the previous (possibly empty) snapshot
/// when the source is unreachable. Stock problems must never surface as
/// conversation errors.
#[async_trait]
pub trait VehicleCatalog: Send + Sync {
    /// Current snapshot of the stock, refreshed when stale.
    async fn snapshot(&self) -> Arc<Vec<Vehicle>>;
}
