//! Liveness and readiness probes for orchestrators and load balancers.
//!
//! Both probes are ordinary registered endpoints with no inputs and a
//! shared instance.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa::openapi::path::OperationBuilder;

use super::endpoint::docs::{json_response, problem_response};
use super::endpoint::{EndpointHandler, Lifetime, Reply, Verb};
use crate::domain::{ApiResult, Error};

/// Process health flags.
///
/// Starts live but not ready. The server marks it ready once the listener
/// is bound, and marks it unhealthy when draining.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness probes so orchestrators stop routing traffic here.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

/// Probe response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProbeStatus {
    #[schema(example = "ok")]
    pub status: String,
}

impl ProbeStatus {
    fn ok() -> Reply<Self> {
        Reply::Json(Self {
            status: "ok".to_owned(),
        })
    }
}

fn probe_docs(operation: OperationBuilder, failure: &str) -> OperationBuilder {
    operation
        .response("200", json_response("Probe passed", "ProbeStatus"))
        .response("503", problem_response(failure))
}

/// `GET /health/live`
pub struct LiveProbe {
    health: Arc<HealthState>,
}

impl LiveProbe {
    pub fn new(health: Arc<HealthState>) -> Self {
        Self { health }
    }
}

#[async_trait(?Send)]
impl EndpointHandler for LiveProbe {
    type Args = ();
    type Output = ProbeStatus;

    const NAME: &'static str = "liveProbe";
    const TAG: &'static str = "health";
    const VERB: Verb = Verb::Get;
    const ROUTE: &'static str = "/health/live";
    const LIFETIME: Lifetime = Lifetime::Singleton;

    async fn handle(&self, _args: ()) -> ApiResult<Reply<ProbeStatus>> {
        if self.health.is_alive() {
            Ok(ProbeStatus::ok())
        } else {
            Err(Error::service_unavailable("service is shutting down"))
        }
    }

    fn document(operation: OperationBuilder) -> OperationBuilder {
        probe_docs(operation, "Server is shutting down")
    }
}

/// `GET /health/ready`
pub struct ReadyProbe {
    health: Arc<HealthState>,
}

impl ReadyProbe {
    pub fn new(health: Arc<HealthState>) -> Self {
        Self { health }
    }
}

#[async_trait(?Send)]
impl EndpointHandler for ReadyProbe {
    type Args = ();
    type Output = ProbeStatus;

    const NAME: &'static str = "readyProbe";
    const TAG: &'static str = "health";
    const VERB: Verb = Verb::Get;
    const ROUTE: &'static str = "/health/ready";
    const LIFETIME: Lifetime = Lifetime::Singleton;

    async fn handle(&self, _args: ()) -> ApiResult<Reply<ProbeStatus>> {
        if self.health.is_ready() {
            Ok(ProbeStatus::ok())
        } else {
            Err(Error::service_unavailable("service is not ready"))
        }
    }

    fn document(operation: OperationBuilder) -> OperationBuilder {
        probe_docs(operation, "Server is not ready")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn readiness_follows_state() {
        let health = Arc::new(HealthState::new());
        let probe = ReadyProbe::new(Arc::clone(&health));

        let err = probe.handle(()).await.expect_err("not ready yet");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);

        health.mark_ready();
        assert_eq!(probe.handle(()).await.expect("ready"), ProbeStatus::ok());
    }

    #[rstest]
    #[tokio::test]
    async fn liveness_fails_once_draining() {
        let health = Arc::new(HealthState::new());
        let probe = LiveProbe::new(Arc::clone(&health));
        assert!(probe.handle(()).await.is_ok());

        health.mark_unhealthy();
        assert!(probe.handle(()).await.is_err());
    }
}
