//! Admission Gate
//!
//! Spends one token from the shared bucket per request. The bucket is
//! process-wide, not per client.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use axum::http::request::Parts;
use platform::rate_limit::TokenBucket;

use crate::error::AuthError;
use crate::presentation::middleware::chain::Gate;

pub struct AdmissionGate {
    bucket: Arc<TokenBucket>,
}

impl AdmissionGate {
    pub fn new(bucket: Arc<TokenBucket>) -> Self {
        Self { bucket }
    }
}

#[async_trait]
impl Gate for AdmissionGate {
    fn name(&self) -> &'static str {
        "admission"
    }

    async fn intercept(&self, _parts: &mut Parts) -> Result<(), AuthError> {
        let decision = self.bucket.check_at(Instant::now());
        if decision.allowed {
            Ok(())
        } else {
            Err(AuthError::AdmissionDenied {
                retry_after: decision.retry_after,
            })
        }
    }
}
