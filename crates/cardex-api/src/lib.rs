//! JSON REST API for Cardex.
//!
//! Exposes an axum [`Router`] backed by any
//! [`cardex_core::store::CatalogStore`]. Transport concerns (TLS, timeouts,
//! request tracing) are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", cardex_api::api_router(store.clone()))
//! ```

pub mod cards;
pub mod error;
pub mod taxonomy;

use std::sync::Arc;

use axum::{
  Router, middleware,
  routing::{get, patch},
};
use cardex_core::store::CatalogStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type. Every failure response passes through the
/// diagnostic envelope layer.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CatalogStore + 'static,
{
  Router::new()
    // Cards
    .route("/card", get(cards::list::<S>).post(cards::create::<S>))
    .route("/card/find", get(cards::find::<S>))
    .route(
      "/card/{id}",
      patch(cards::update::<S>).delete(cards::remove::<S>),
    )
    // Taxonomy
    .route(
      "/card-type",
      get(taxonomy::list_types::<S>).post(taxonomy::create_type::<S>),
    )
    .route("/card-type/{id}", patch(taxonomy::update_type::<S>))
    .route(
      "/card-sub-type",
      get(taxonomy::list_sub_types::<S>).post(taxonomy::create_sub_type::<S>),
    )
    .route("/card-sub-type/{id}", patch(taxonomy::update_sub_type::<S>))
    .layer(middleware::from_fn(error::error_envelope))
    .with_state(store)
}

// ─── Integration tests ───────────────────────────────────────────────────────
