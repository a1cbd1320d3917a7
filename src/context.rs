//! Request-scoped values passed explicitly through every call chain.

use std::future::Future;
use std::time::{Duration, Instant};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use futures_util::future::{Ready, ready};

use crate::models::config::ServerConfig;
use crate::services::{ServiceError, ServiceResult};

/// Fallback deadline when no [`ServerConfig`] is registered.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Trace identifier assigned to a request by [`crate::middleware::RequestIdMiddleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub String);

/// The request's trace id and deadline.
#[derive(Debug, Clone)]
pub struct RequestContext {
    trace_id: Option<String>,
    deadline: Instant,
}

impl RequestContext {
    pub fn new(trace_id: Option<String>, timeout: Duration) -> Self {
        Self {
            trace_id,
            deadline: Instant::now() + timeout,
        }
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Time left before the deadline; `None` once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .checked_duration_since(Instant::now())
            .filter(|left| !left.is_zero())
    }

    pub fn check_deadline(&self) -> ServiceResult<()> {
        self.remaining().map(|_| ()).ok_or(ServiceError::Timeout)
    }

    /// Runs blocking work on the thread pool, bounded by the remaining budget.
    ///
    /// Expiry resolves to [`ServiceError::Timeout`]; the blocking closure is
    /// not interrupted, but its result is discarded.
    pub async fn run_blocking<F, T>(&self, work: F) -> ServiceResult<T>
    where
        F: FnOnce() -> ServiceResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let remaining = self.remaining().ok_or(ServiceError::Timeout)?;
        within(remaining, web::block(work))
            .await?
            .map_err(|err| ServiceError::Internal(format!("blocking task failed: {err}")))?
    }
}

/// Awaits `future` for at most `limit`.
pub async fn within<F: Future>(limit: Duration, future: F) -> ServiceResult<F::Output> {
    actix_web::rt::time::timeout(limit, future)
        .await
        .map_err(|_| ServiceError::Timeout)
}

impl FromRequest for RequestContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let trace_id = req.extensions().get::<TraceId>().map(|id| id.0.clone());
        let timeout = req
            .app_data::<web::Data<ServerConfig>>()
            .map_or(DEFAULT_REQUEST_TIMEOUT, |config| config.request_timeout());
        ready(Ok(Self::new(trace_id, timeout)))
    }
}
