//! Safe instantiation wrapper
//!
//! [`InstantiationEngine::instantiate`] is the containment boundary of the
//! whole system: it derives the cache key, resolves through the memoizing
//! cache, and converts every failure (including panics in user-authored
//! construction logic) into an [`InstantiationResult`] value. It never
//! fails, which is what lets a dashboard of N units render N-1 healthy ones
//! when one specification is broken.

use crate::cache::InstanceCache;
use crate::config::EngineConfig;
use crate::error::ResolveError;
use crate::face::textual_face;
use crate::instance::{Instance, InstantiationResult};
use crate::resolver::Resolver;
use kiln_spec::{CacheKey, Principal, SpecValue};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

/// The instantiation engine
///
/// Cheap to clone; clones share the cache and resolver.
#[derive(Debug, Clone)]
pub struct InstantiationEngine {
    /// Configuration
    config: EngineConfig,
    /// Specification interpreter
    resolver: Arc<dyn Resolver>,
    /// Memoized instances
    cache: InstanceCache,
}

impl InstantiationEngine {
    /// Create an engine with default configuration
    #[inline]
    #[must_use]
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self::with_config(resolver, EngineConfig::default())
    }

    /// Create an engine with specific configuration
    #[must_use]
    pub fn with_config(resolver: Arc<dyn Resolver>, config: EngineConfig) -> Self {
        Self {
            config,
            resolver,
            cache: InstanceCache::with_ttl(config.cache_capacity, config.entry_ttl()),
        }
    }

    /// Engine configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The underlying instance cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &InstanceCache {
        &self.cache
    }

    /// Instantiate a specification for its owner
    ///
    /// Infallible: every specification- or resolver-driven failure comes
    /// back as [`InstantiationResult::Failure`]. A cached instance returns
    /// immediately; otherwise the resolution runs single-flight and the
    /// success is memoized for subsequent requests.
    pub async fn instantiate(
        &self,
        principal: &Principal,
        spec: &SpecValue,
    ) -> InstantiationResult {
        let key = CacheKey::derive(principal, spec);

        if let Some(object) = self.cache.get(&key).await {
            tracing::debug!("instance cache hit: {}", key.short());
            return Self::success(object);
        }

        tracing::debug!("resolving {} for {principal}", key.short());
        match self.resolve_detached(key, principal.clone(), spec.clone()).await {
            Ok(object) => Self::success(object),
            Err(error) => {
                tracing::warn!("instantiation of {} failed: {error}", key.short());
                InstantiationResult::Failure {
                    message: error.to_string(),
                }
            }
        }
    }

    /// Package a resolved object for presentation
    fn success(object: Arc<dyn Instance>) -> InstantiationResult {
        let face = textual_face(&object.to_string());
        let type_name = object.type_name().to_string();
        InstantiationResult::Success {
            object,
            face,
            type_name,
        }
    }

    /// Run the single-flight resolution on a detached task
    ///
    /// The caller awaits a `JoinHandle`, so a caller that abandons its
    /// request (client disconnect) does not cancel the shared computation:
    /// it still completes and populates the cache for other waiters and
    /// future requests.
    async fn resolve_detached(
        &self,
        key: CacheKey,
        principal: Principal,
        spec: SpecValue,
    ) -> Result<Arc<dyn Instance>, Arc<ResolveError>> {
        let cache = self.cache.clone();
        let resolver = Arc::clone(&self.resolver);
        let limit = self.config.resolve_timeout();

        let shared = tokio::spawn(async move {
            cache
                .resolve(key, build_guarded(resolver, principal, spec, limit))
                .await
        });

        match shared.await {
            Ok(outcome) => outcome,
            // The detached task is never aborted and the guarded build
            // cannot unwind into it.
            Err(join_error) => unreachable!("instantiation task failed: {join_error}"),
        }
    }
}

/// Invoke the resolver under a timeout, capturing panics
///
/// The build runs in its own task so a panic in user-authored construction
/// logic surfaces as a `JoinError` here instead of unwinding through the
/// cache. On timeout the build task is aborted and nothing is cached.
async fn build_guarded(
    resolver: Arc<dyn Resolver>,
    principal: Principal,
    spec: SpecValue,
    limit: Duration,
) -> Result<Arc<dyn Instance>, ResolveError> {
    let build = tokio::spawn(async move { resolver.build(&principal, &spec).await });
    let abort = build.abort_handle();

    match tokio::time::timeout(limit, build).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_error)) if join_error.is_panic() => {
            Err(ResolveError::Fault(panic_message(join_error.into_panic())))
        }
        Ok(Err(_)) => Err(ResolveError::Fault(
            "construction task cancelled".to_string(),
        )),
        Err(_elapsed) => {
            abort.abort();
            Err(ResolveError::Timeout {
                elapsed_secs: limit.as_secs(),
            })
        }
    }
}

/// Extract a human-readable message from a panic payload
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "resolver panicked".to_string()
    }
}
