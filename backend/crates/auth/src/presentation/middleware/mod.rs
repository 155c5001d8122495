//! Request Gates
//!
//! Admission control, authentication and authorization as composable gates.
//! [`GateSet`] builds the standard chains so every route shares one rate
//! limiter and one token codec.

pub mod admission;
pub mod authenticate;
pub mod authorize;
pub mod chain;

use std::sync::Arc;

use platform::rate_limit::TokenBucket;

use crate::application::config::AuthConfig;
use crate::application::token_codec::TokenCodec;
use crate::domain::repository::RoleDirectory;
use crate::domain::value_object::role_name::RoleName;

pub use admission::AdmissionGate;
pub use authenticate::{AuthGate, CurrentIdentity};
pub use authorize::RoleGate;
pub use chain::{Gate, GateChain, enforce};

/// Shared gate instances and the chains built from them
#[derive(Clone)]
pub struct GateSet {
    admission: Arc<dyn Gate>,
    authenticate: Arc<dyn Gate>,
}

impl GateSet {
    pub fn new(bucket: Arc<TokenBucket>, codec: Arc<TokenCodec>, config: &AuthConfig) -> Self {
        Self {
            admission: Arc::new(AdmissionGate::new(bucket)),
            authenticate: Arc::new(AuthGate::new(codec, config.cookie.name.clone())),
        }
    }

    /// Admission control only
    pub fn public(&self) -> GateChain {
        GateChain::new().shared(self.admission.clone())
    }

    /// Admission control, then a valid credential
    pub fn authenticated(&self) -> GateChain {
        self.public().shared(self.authenticate.clone())
    }

    /// Admission control, a valid credential, then `role`
    pub fn with_role<R>(&self, roles: Arc<R>, role: RoleName) -> GateChain
    where
        R: RoleDirectory + Send + Sync + 'static,
    {
        self.authenticated().gate(RoleGate::new(roles, role))
    }
}
