//! Testing utilities for the Kiln workspace
//!
//! Shared resolver doubles, instance doubles, and spec fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use kiln_engine::{Instance, ResolveError, Resolver};
use kiln_spec::{Principal, SpecValue};
use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Instance double that renders as the text it was built from
#[derive(Debug, Clone)]
pub struct EchoInstance {
    text: String,
}

impl EchoInstance {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Display for EchoInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Resolver that echoes the specification's canonical text
#[derive(Debug, Default)]
pub struct EchoResolver;

#[async_trait]
impl Resolver for EchoResolver {
    async fn build(
        &self,
        _principal: &Principal,
        spec: &SpecValue,
    ) -> Result<Arc<dyn Instance>, ResolveError> {
        Ok(Arc::new(EchoInstance::new(spec.to_string())))
    }
}

/// Resolver that returns a fixed-text instance regardless of the spec
#[derive(Debug, Clone)]
pub struct StaticResolver {
    text: String,
}

impl StaticResolver {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl Resolver for StaticResolver {
    async fn build(
        &self,
        _principal: &Principal,
        _spec: &SpecValue,
    ) -> Result<Arc<dyn Instance>, ResolveError> {
        Ok(Arc::new(EchoInstance::new(self.text.clone())))
    }
}

/// Wrapper that counts build invocations before delegating
#[derive(Debug)]
pub struct CountingResolver<R> {
    inner: R,
    calls: AtomicUsize,
}

impl<R> CountingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<R: Resolver> Resolver for CountingResolver<R> {
    async fn build(
        &self,
        principal: &Principal,
        spec: &SpecValue,
    ) -> Result<Arc<dyn Instance>, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.build(principal, spec).await
    }
}

/// Resolver that fails every build with a fixed error
#[derive(Debug, Clone)]
pub struct FaultyResolver {
    error: ResolveError,
}

impl FaultyResolver {
    pub fn new(error: ResolveError) -> Self {
        Self { error }
    }

    pub fn fault(message: impl Into<String>) -> Self {
        Self::new(ResolveError::Fault(message.into()))
    }
}

#[async_trait]
impl Resolver for FaultyResolver {
    async fn build(
        &self,
        _principal: &Principal,
        _spec: &SpecValue,
    ) -> Result<Arc<dyn Instance>, ResolveError> {
        Err(self.error.clone())
    }
}

/// Resolver that fails its first N builds, then echoes
#[derive(Debug)]
pub struct FlakyResolver {
    remaining_failures: AtomicUsize,
}

impl FlakyResolver {
    pub fn failing_first(failures: usize) -> Self {
        Self {
            remaining_failures: AtomicUsize::new(failures),
        }
    }
}

#[async_trait]
impl Resolver for FlakyResolver {
    async fn build(
        &self,
        principal: &Principal,
        spec: &SpecValue,
    ) -> Result<Arc<dyn Instance>, ResolveError> {
        let remaining = self.remaining_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.remaining_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(ResolveError::Fault("transient construction fault".to_string()));
        }
        EchoResolver.build(principal, spec).await
    }
}

/// Resolver that panics during construction
#[derive(Debug, Default)]
pub struct PanickingResolver;

#[async_trait]
impl Resolver for PanickingResolver {
    async fn build(
        &self,
        _principal: &Principal,
        _spec: &SpecValue,
    ) -> Result<Arc<dyn Instance>, ResolveError> {
        panic!("construction exploded");
    }
}

/// Resolver that sleeps before echoing
#[derive(Debug)]
pub struct SlowResolver {
    delay: Duration,
}

impl SlowResolver {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Resolver for SlowResolver {
    async fn build(
        &self,
        principal: &Principal,
        spec: &SpecValue,
    ) -> Result<Arc<dyn Instance>, ResolveError> {
        tokio::time::sleep(self.delay).await;
        EchoResolver.build(principal, spec).await
    }
}

/// Resolver that blocks until the test releases it
///
/// `started()` reports how many builds have begun, which lets a test wait
/// until a build is in flight before acting on it.
#[derive(Debug)]
pub struct GatedResolver {
    gate: Semaphore,
    started: AtomicUsize,
}

impl GatedResolver {
    pub fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
            started: AtomicUsize::new(0),
        }
    }

    pub fn release(&self, builds: usize) {
        self.gate.add_permits(builds);
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

impl Default for GatedResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Resolver for GatedResolver {
    async fn build(
        &self,
        principal: &Principal,
        spec: &SpecValue,
    ) -> Result<Arc<dyn Instance>, ResolveError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| ResolveError::Fault("gate closed".to_string()))?;
        EchoResolver.build(principal, spec).await
    }
}

pub fn test_principal() -> Principal {
    Principal::new("urn:github:526301")
}

pub fn sample_spec() -> SpecValue {
    SpecValue::composite(
        "com.kiln.Work",
        vec![SpecValue::text("build"), SpecValue::integer(1)],
    )
}

pub fn sample_drain() -> SpecValue {
    SpecValue::composite(
        "com.kiln.drain.Log",
        vec![SpecValue::text("s3://logs/main")],
    )
}
