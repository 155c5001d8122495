//! HTTP Handlers
//!
//! Both handlers run behind the authentication gate and read the caller
//! through [`CurrentIdentity`].

use std::sync::Arc;

use auth::CurrentIdentity;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use crate::application::{AddDeviceUseCase, CartStore};
use crate::domain::repository::DeviceCatalog;
use crate::error::{CartError, CartResult};
use crate::presentation::dto::{AddDeviceRequest, CartResponse};

/// Shared state for cart handlers
pub struct CartAppState<C> {
    pub catalog: Arc<C>,
    pub store: Arc<CartStore>,
}

impl<C> Clone for CartAppState<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            store: self.store.clone(),
        }
    }
}

/// POST /api/cart
pub async fn add_device<C>(
    State(state): State<CartAppState<C>>,
    CurrentIdentity(identity): CurrentIdentity,
    payload: Result<Json<AddDeviceRequest>, JsonRejection>,
) -> CartResult<Json<CartResponse>>
where
    C: DeviceCatalog + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(|e| CartError::InvalidRequest(e.body_text()))?;

    let use_case = AddDeviceUseCase::new(state.catalog.clone(), state.store.clone());
    let cart = use_case.execute(&identity.subject, req.device_id).await?;

    Ok(Json(cart.into()))
}

/// GET /api/cart
pub async fn view_cart<C>(
    State(state): State<CartAppState<C>>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Json<CartResponse>
where
    C: Send + Sync + 'static,
{
    Json(state.store.snapshot(&identity.subject).into())
}
