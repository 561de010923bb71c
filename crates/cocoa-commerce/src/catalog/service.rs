//! Owned, injectable catalog service.
//!
//! The catalog cache has an explicit lifecycle (`init`, `refresh`,
//! `current`) instead of living in module-global state, so tests can own
//! their own instance and nothing leaks between them. The source behind
//! the service is a trait; production injects the HTTP source, tests and
//! native development inject a static one.

use crate::catalog::PricingCatalog;
use crate::error::CommerceError;
use std::sync::{Arc, Mutex};

/// Where pricing catalogs come from.
///
/// Selecting an implementation is an explicit configuration choice made at
/// wiring time; there is no runtime probing.
pub trait CatalogSource {
    /// Fetch a complete catalog.
    fn fetch(&self) -> Result<PricingCatalog, CommerceError>;
}

/// A source that serves a fixed catalog. Used for tests and native
/// development, and as the explicit stand-in when no live endpoint is
/// configured.
pub struct StaticCatalogSource {
    catalog: PricingCatalog,
}

impl StaticCatalogSource {
    /// Create a source serving the given catalog.
    pub fn new(catalog: PricingCatalog) -> Self {
        Self { catalog }
    }
}

impl Default for StaticCatalogSource {
    fn default() -> Self {
        Self::new(PricingCatalog::fallback())
    }
}

impl CatalogSource for StaticCatalogSource {
    fn fetch(&self) -> Result<PricingCatalog, CommerceError> {
        Ok(self.catalog.clone())
    }
}

/// Whether the served catalog came from the live source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CatalogState {
    /// Initial load hasn't been attempted yet; serving the fallback.
    Pending,
    /// Initial load failed; serving the built-in fallback.
    Fallback,
    /// Serving a catalog the source produced.
    Live,
}

struct Inner {
    catalog: Arc<PricingCatalog>,
    state: CatalogState,
    loading: bool,
}

/// Caches the pricing catalog for the process lifetime.
///
/// The snapshot is an `Arc`, replaced wholesale on a successful load and
/// never partially mutated; readers holding an old snapshot keep a
/// consistent catalog. While a load is in flight, concurrent callers share
/// it rather than issuing duplicate fetches, and read the previous
/// snapshot in the meantime.
pub struct CatalogService<S> {
    source: S,
    inner: Mutex<Inner>,
}

impl<S: CatalogSource> CatalogService<S> {
    /// Create a service over the given source. Serves the built-in
    /// fallback until [`init`](Self::init) runs.
    pub fn new(source: S) -> Self {
        Self {
            source,
            inner: Mutex::new(Inner {
                catalog: Arc::new(PricingCatalog::fallback()),
                state: CatalogState::Pending,
                loading: false,
            }),
        }
    }

    /// Perform the one startup load.
    ///
    /// On failure the built-in fallback stays in place and the failure is
    /// only logged; the configurator keeps working with fallback prices.
    /// Calling `init` again after the first attempt is a no-op snapshot
    /// read, as is calling it while another caller's load is in flight.
    pub fn init(&self) -> Arc<PricingCatalog> {
        {
            let mut inner = self.lock();
            if inner.state != CatalogState::Pending || inner.loading {
                return Arc::clone(&inner.catalog);
            }
            inner.loading = true;
        }

        match self.source.fetch() {
            Ok(catalog) => {
                let mut inner = self.lock();
                inner.catalog = Arc::new(catalog);
                inner.state = CatalogState::Live;
                inner.loading = false;
                Arc::clone(&inner.catalog)
            }
            Err(e) => {
                tracing::warn!(error = %e, "catalog load failed, serving built-in fallback");
                let mut inner = self.lock();
                inner.state = CatalogState::Fallback;
                inner.loading = false;
                Arc::clone(&inner.catalog)
            }
        }
    }

    /// Re-fetch the catalog and swap it in wholesale.
    ///
    /// On success the new snapshot transparently replaces whatever was
    /// being served, fallback included. On failure the current snapshot
    /// stays and the error is surfaced to the caller driving the retry.
    pub fn refresh(&self) -> Result<Arc<PricingCatalog>, CommerceError> {
        {
            let mut inner = self.lock();
            if inner.loading {
                return Ok(Arc::clone(&inner.catalog));
            }
            inner.loading = true;
        }

        let result = self.source.fetch();
        let mut inner = self.lock();
        inner.loading = false;
        match result {
            Ok(catalog) => {
                inner.catalog = Arc::new(catalog);
                inner.state = CatalogState::Live;
                Ok(Arc::clone(&inner.catalog))
            }
            Err(e) => {
                tracing::warn!(error = %e, "catalog refresh failed, keeping current snapshot");
                Err(e)
            }
        }
    }

    /// The current catalog snapshot. Never blocks on a fetch.
    pub fn current(&self) -> Arc<PricingCatalog> {
        Arc::clone(&self.lock().catalog)
    }

    /// Whether the served catalog came from the live source.
    pub fn is_live(&self) -> bool {
        self.lock().state == CatalogState::Live
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means a panic mid-swap; the catalog value itself
        // is always whole, so keep serving it.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Source that fails until `succeed_after` fetches have been attempted.
    struct FlakySource {
        fetches: AtomicU32,
        succeed_after: u32,
    }

    impl FlakySource {
        fn new(succeed_after: u32) -> Self {
            Self {
                fetches: AtomicU32::new(0),
                succeed_after,
            }
        }

        fn fetch_count(&self) -> u32 {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl CatalogSource for FlakySource {
        fn fetch(&self) -> Result<PricingCatalog, CommerceError> {
            let attempt = self.fetches.fetch_add(1, Ordering::SeqCst);
            if attempt < self.succeed_after {
                Err(CommerceError::CatalogUnavailable(
                    "connection refused".to_string(),
                ))
            } else {
                let mut catalog = PricingCatalog::fallback();
                catalog
                    .base_materials
                    .insert("ruby", Money::new(899, Currency::USD));
                Ok(catalog)
            }
        }
    }

    #[test]
    fn test_init_loads_live_catalog() {
        let service = CatalogService::new(FlakySource::new(0));
        let catalog = service.init();
        assert!(service.is_live());
        assert_eq!(catalog.base_price("ruby").amount_cents, 899);
    }

    #[test]
    fn test_init_fetch_failure_serves_fallback() {
        let service = CatalogService::new(FlakySource::new(1));
        let catalog = service.init();
        assert!(!service.is_live());
        // Fallback prices, and the live-only key is absent (prices as zero)
        assert_eq!(catalog.base_price("dark").amount_cents, 699);
        assert!(catalog.base_price("ruby").is_zero());
    }

    #[test]
    fn test_init_fetches_only_once() {
        let source = FlakySource::new(0);
        let service = CatalogService::new(source);
        service.init();
        service.init();
        service.init();
        assert_eq!(service.source.fetch_count(), 1);
    }

    #[test]
    fn test_refresh_replaces_fallback_transparently() {
        let service = CatalogService::new(FlakySource::new(1));
        service.init();
        assert!(!service.is_live());

        let refreshed = service.refresh().unwrap();
        assert!(service.is_live());
        assert_eq!(refreshed.base_price("ruby").amount_cents, 899);
        // Readers asking again see the new snapshot
        assert_eq!(service.current().base_price("ruby").amount_cents, 899);
    }

    #[test]
    fn test_refresh_failure_keeps_current_snapshot() {
        let service = CatalogService::new(FlakySource::new(2));
        service.init();
        let before = service.current();

        let result = service.refresh();
        assert!(matches!(result, Err(CommerceError::CatalogUnavailable(_))));
        assert_eq!(service.current(), before);
    }

    #[test]
    fn test_current_before_init_is_fallback() {
        let service = CatalogService::new(FlakySource::new(0));
        let catalog = service.current();
        assert_eq!(catalog.base_price("milk").amount_cents, 599);
        assert_eq!(service.source.fetch_count(), 0);
    }
}
