//! Gate Chain
//!
//! A gate inspects a request before the handler runs and either lets it
//! through (possibly attaching data to its extensions) or rejects it. A
//! chain runs its gates in order and stops at the first rejection, so a
//! rejected request never reaches later gates or the handler.
//!
//! Panics anywhere in the chain or the handler are caught here and turned
//! into a 500, which keeps one bad request from taking the worker down.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use futures::FutureExt;

use crate::error::AuthError;

/// One interception step in front of a handler
///
/// Gates only see the request head; the body is passed through untouched.
#[async_trait]
pub trait Gate: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn intercept(&self, parts: &mut Parts) -> Result<(), AuthError>;
}

/// Ordered list of gates
///
/// Gates are shared behind `Arc`, so one gate instance (and whatever state
/// it holds, such as a rate limiter) can sit in many chains.
#[derive(Clone, Default)]
pub struct GateChain {
    gates: Vec<Arc<dyn Gate>>,
}

impl GateChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a gate
    pub fn gate<G: Gate + 'static>(self, gate: G) -> Self {
        self.shared(Arc::new(gate))
    }

    /// Append an already shared gate
    pub fn shared(mut self, gate: Arc<dyn Gate>) -> Self {
        self.gates.push(gate);
        self
    }

    /// Append every gate of `rest`, keeping its order
    pub fn then(mut self, rest: GateChain) -> Self {
        self.gates.extend(rest.gates);
        self
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.gates.iter().map(|gate| gate.name()).collect()
    }

    /// Run every gate in order, stopping at the first rejection
    pub async fn admit(&self, parts: &mut Parts) -> Result<(), AuthError> {
        for gate in &self.gates {
            if let Err(err) = gate.intercept(parts).await {
                tracing::debug!(gate = gate.name(), error = %err, "Gate rejected request");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Run the chain, then `handler` if every gate admitted the request
    pub async fn run<H, Fut>(&self, req: Request, handler: H) -> Response
    where
        H: FnOnce(Request) -> Fut,
        Fut: Future<Output = Response>,
    {
        let guarded = async move {
            let (mut parts, body) = req.into_parts();
            match self.admit(&mut parts).await {
                Ok(()) => handler(Request::from_parts(parts, body)).await,
                Err(err) => err.into_response(),
            }
        };

        match AssertUnwindSafe(guarded).catch_unwind().await {
            Ok(response) => response,
            Err(panic) => {
                tracing::error!(panic = panic_message(&*panic), "Request handling panicked");
                AuthError::Internal("request handling panicked".to_string()).into_response()
            }
        }
    }

    /// Put this chain in front of every route of `router`
    pub fn guard<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.route_layer(middleware::from_fn_with_state(self, enforce))
    }
}

impl std::fmt::Debug for GateChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Middleware entry point used by [`GateChain::guard`]
pub async fn enforce(State(chain): State<GateChain>, req: Request, next: Next) -> Response {
    chain.run(req, move |req| next.run(req)).await
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use std::sync::Mutex;

    type Trace = Arc<Mutex<Vec<&'static str>>>;

    struct Recording {
        name: &'static str,
        trace: Trace,
        reject: bool,
    }

    #[async_trait]
    impl Gate for Recording {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn intercept(&self, _parts: &mut Parts) -> Result<(), AuthError> {
            self.trace.lock().unwrap().push(self.name);
            if self.reject {
                Err(AuthError::CredentialMissing)
            } else {
                Ok(())
            }
        }
    }

    struct Panicking;

    #[async_trait]
    impl Gate for Panicking {
        fn name(&self) -> &'static str {
            "panicking"
        }

        async fn intercept(&self, _parts: &mut Parts) -> Result<(), AuthError> {
            panic!("gate exploded");
        }
    }

    async fn exploding(_req: Request) -> Response {
        panic!("handler exploded")
    }

    fn recording(name: &'static str, trace: &Trace, reject: bool) -> Recording {
        Recording {
            name,
            trace: trace.clone(),
            reject,
        }
    }

    fn request() -> Request {
        axum::http::Request::builder()
            .uri("/")
            .body(Body::empty())
            .unwrap()
    }

    async fn run(chain: &GateChain, trace: &Trace) -> Response {
        let trace = trace.clone();
        chain
            .run(request(), move |_req| async move {
                trace.lock().unwrap().push("handler");
                StatusCode::OK.into_response()
            })
            .await
    }

    #[tokio::test]
    async fn test_gates_run_in_order_before_handler() {
        let trace = Trace::default();
        let chain = GateChain::new()
            .gate(recording("a", &trace, false))
            .gate(recording("b", &trace, false))
            .gate(recording("c", &trace, false));

        let response = run(&chain, &trace).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*trace.lock().unwrap(), vec!["a", "b", "c", "handler"]);
    }

    #[tokio::test]
    async fn test_rejection_short_circuits() {
        let trace = Trace::default();
        let chain = GateChain::new()
            .gate(recording("a", &trace, false))
            .gate(recording("b", &trace, true))
            .gate(recording("c", &trace, false));

        let response = run(&chain, &trace).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(*trace.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_chain_goes_straight_to_handler() {
        let trace = Trace::default();
        let response = run(&GateChain::new(), &trace).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*trace.lock().unwrap(), vec!["handler"]);
    }

    #[tokio::test]
    async fn test_composition_is_associative() {
        let trace = Trace::default();
        let (a, b, c) = (
            Arc::new(recording("a", &trace, false)) as Arc<dyn Gate>,
            Arc::new(recording("b", &trace, false)) as Arc<dyn Gate>,
            Arc::new(recording("c", &trace, false)) as Arc<dyn Gate>,
        );

        let left = GateChain::new()
            .shared(a.clone())
            .shared(b.clone())
            .then(GateChain::new().shared(c.clone()));
        let right = GateChain::new()
            .shared(a)
            .then(GateChain::new().shared(b).shared(c));

        assert_eq!(left.names(), right.names());

        run(&left, &trace).await;
        let first: Vec<_> = trace.lock().unwrap().drain(..).collect();
        run(&right, &trace).await;
        let second: Vec<_> = trace.lock().unwrap().drain(..).collect();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_panicking_gate_becomes_500() {
        let trace = Trace::default();
        let chain = GateChain::new()
            .gate(recording("a", &trace, false))
            .gate(Panicking);

        let response = run(&chain, &trace).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(*trace.lock().unwrap(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_panicking_handler_becomes_500() {
        let chain = GateChain::new();

        let response = chain.run(request(), exploding).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*payload), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(&*payload), "bang");

        let payload: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(&*payload), "non-string panic payload");
    }
}
