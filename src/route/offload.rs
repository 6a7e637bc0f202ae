use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::foundation::error::{WaylineError, WaylineResult};
use crate::route::model::{PathConfig, RoutePath, Waypoint};
use crate::route::pipeline::RouteBuilder;

/// How long a background route request may run before it is abandoned.
pub const DEFAULT_OFFLOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// One interface over both execution venues of the geometry pipeline.
///
/// Output must not depend on the venue: both implementations call the same
/// pure pipeline, so a computation can be moved between them (or a worker
/// can fall back to inline) without changing a single point.
pub trait RouteCompute {
    /// Compute the route path for one waypoint snapshot.
    fn compute(&mut self, waypoints: &[Waypoint], config: &PathConfig) -> WaylineResult<RoutePath>;
}

/// Synchronous venue: runs the pipeline on the calling thread.
#[derive(Debug, Default)]
pub struct InlineCompute {
    builder: RouteBuilder,
}

impl InlineCompute {
    /// Construct an inline venue with a fresh curvature cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RouteCompute for InlineCompute {
    fn compute(&mut self, waypoints: &[Waypoint], config: &PathConfig) -> WaylineResult<RoutePath> {
        self.builder.build(waypoints, config)
    }
}

struct Request {
    id: u64,
    waypoints: Vec<Waypoint>,
    config: PathConfig,
}

struct Response {
    id: u64,
    result: WaylineResult<RoutePath>,
}

/// Background venue: a long-lived worker thread fed one-shot
/// request/response pairs matched by correlation id.
///
/// A pending request has no mid-flight cancellation; superseding it means
/// its eventual response is recognized as stale by id and dropped. After a
/// timeout or worker death the venue permanently falls back to inline
/// computation rather than staying broken.
pub struct WorkerCompute {
    tx: mpsc::Sender<Request>,
    rx: mpsc::Receiver<Response>,
    next_id: u64,
    timeout: Duration,
    fallback: Option<InlineCompute>,
}

impl WorkerCompute {
    /// Spawn the worker thread with the default timeout.
    pub fn spawn() -> WaylineResult<Self> {
        Self::spawn_with_timeout(DEFAULT_OFFLOAD_TIMEOUT)
    }

    /// Spawn the worker thread with an explicit per-request timeout.
    pub fn spawn_with_timeout(timeout: Duration) -> WaylineResult<Self> {
        let (req_tx, req_rx) = mpsc::channel::<Request>();
        let (resp_tx, resp_rx) = mpsc::channel::<Response>();

        std::thread::Builder::new()
            .name("wayline-route".to_owned())
            .spawn(move || {
                let mut builder = RouteBuilder::new();
                while let Ok(req) = req_rx.recv() {
                    let result = builder.build(&req.waypoints, &req.config);
                    if resp_tx.send(Response { id: req.id, result }).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| WaylineError::offload(format!("failed to spawn route worker: {e}")))?;

        Ok(Self {
            tx: req_tx,
            rx: resp_rx,
            next_id: 0,
            timeout,
            fallback: None,
        })
    }

    /// `true` once the venue has abandoned its worker and runs inline.
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    fn abandon_worker(&mut self) {
        tracing::warn!("route worker abandoned, switching to inline computation");
        self.fallback = Some(InlineCompute::new());
    }
}

impl RouteCompute for WorkerCompute {
    fn compute(&mut self, waypoints: &[Waypoint], config: &PathConfig) -> WaylineResult<RoutePath> {
        if let Some(inline) = &mut self.fallback {
            return inline.compute(waypoints, config);
        }

        self.next_id += 1;
        let id = self.next_id;
        if self
            .tx
            .send(Request {
                id,
                waypoints: waypoints.to_vec(),
                config: *config,
            })
            .is_err()
        {
            self.abandon_worker();
            return Err(WaylineError::offload("route worker is gone"));
        }

        let deadline = Instant::now() + self.timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                // Stale response from a superseded request: drop and keep waiting.
                Ok(resp) if resp.id != id => continue,
                Ok(resp) => return resp.result,
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    self.abandon_worker();
                    return Err(WaylineError::offload(format!(
                        "route request {id} timed out after {:?}",
                        self.timeout
                    )));
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    self.abandon_worker();
                    return Err(WaylineError::offload("route worker is gone"));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/route/offload.rs"]
mod tests;
