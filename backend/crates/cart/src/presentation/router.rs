//! Cart Router

use std::sync::Arc;

use auth::{GateChain, GateSet};
use axum::{Router, routing::get};

use crate::application::CartStore;
use crate::domain::repository::DeviceCatalog;
use crate::infra::postgres::PgDeviceCatalog;
use crate::presentation::handlers::{self, CartAppState};

/// Create the Cart router with the PostgreSQL catalog
pub fn cart_router(catalog: PgDeviceCatalog, store: Arc<CartStore>, gates: &GateSet) -> Router {
    cart_router_generic(Arc::new(catalog), store, gates.authenticated())
}

/// Create a generic Cart router behind `chain`
///
/// `chain` must include the authentication gate; the handlers reject
/// requests without an identity.
pub fn cart_router_generic<C>(catalog: Arc<C>, store: Arc<CartStore>, chain: GateChain) -> Router
where
    C: DeviceCatalog + Send + Sync + 'static,
{
    let state = CartAppState { catalog, store };

    chain
        .guard(Router::new().route(
            "/cart",
            get(handlers::view_cart::<C>).post(handlers::add_device::<C>),
        ))
        .with_state(state)
}
