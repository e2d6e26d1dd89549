//! TTL cache over a stock source, implementing the catalog port.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::catalog::Vehicle;
use crate::ports::VehicleCatalog;

use super::remote::VehicleSource;

struct CacheState {
    vehicles: Arc<Vec<Vehicle>>,
    refreshed_at: Option<Instant>,
}

/// Caches the stock for a fixed TTL and refetches synchronously when the
/// cache is cold, empty or stale. A failed refresh keeps serving the
/// previous snapshot; stock trouble never reaches the customer.
pub struct CachedCatalog<S> {
    source: S,
    ttl: Duration,
    state: RwLock<CacheState>,
}

impl<S: VehicleSource> CachedCatalog<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            state: RwLock::new(CacheState {
                vehicles: Arc::new(Vec::new()),
                refreshed_at: None,
            }),
        }
    }

    fn is_stale(state: &CacheState, ttl: Duration) -> bool {
        if state.vehicles.is_empty() {
            return true;
        }
        match state.refreshed_at {
            Some(at) => at.elapsed() > ttl,
            None => true,
        }
    }
}

#[async_trait]
impl<S: VehicleSource> VehicleCatalog for CachedCatalog<S> {
    async fn snapshot(&self) -> Arc<Vec<Vehicle>> {
        {
            let state = self.state.read().await;
            if !Self::is_stale(&state, self.ttl) {
                return Arc::clone(&state.vehicles);
            }
        }

        let mut state = self.state.write().await;
        // Another task may have refreshed while we waited for the lock.
        if Self::is_stale(&state, self.ttl) {
            match self.source.fetch().await {
                Ok(vehicles) => {
                    state.vehicles = Arc::new(vehicles);
                    state.refreshed_at = Some(Instant::now());
                }
                Err(err) => {
                    debug!(error = %err, "stock refresh failed, serving previous snapshot");
                }
            }
        }
        Arc::clone(&state.vehicles)
    }
}
