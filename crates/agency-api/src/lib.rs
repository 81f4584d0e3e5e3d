//! JSON REST API for the agency service.
//!
//! Exposes an axum [`Router`] backed by any [`AgencyStore`] and
//! [`BreedCatalog`]. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(agency_api::api_router(store.clone(), catalog.clone()))
//! ```

pub mod cats;
pub mod error;
pub mod extract;
pub mod missions;

use std::sync::Arc;

use agency_core::{catalog::BreedCatalog, store::AgencyStore};
use axum::{
  Router,
  routing::{get, patch, post},
};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct AppState<S, B> {
  pub store:  Arc<S>,
  pub breeds: Arc<B>,
}

impl<S, B> Clone for AppState<S, B> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), breeds: Arc::clone(&self.breeds) }
  }
}

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be merged or nested into any parent router
/// regardless of its own state type.
pub fn api_router<S, B>(store: Arc<S>, breeds: Arc<B>) -> Router<()>
where
  S: AgencyStore + 'static,
  B: BreedCatalog + 'static,
{
  Router::new()
    // Cats
    .route("/cats", get(cats::list::<S, B>).post(cats::create::<S, B>))
    .route(
      "/cats/{id}",
      get(cats::get_one::<S, B>)
        .put(cats::update::<S, B>)
        .patch(cats::partial_update::<S, B>)
        .delete(cats::delete_one::<S, B>),
    )
    // Missions
    .route("/missions", get(missions::list::<S, B>).post(missions::create::<S, B>))
    .route(
      "/missions/{id}",
      get(missions::get_one::<S, B>)
        .put(missions::update::<S, B>)
        .patch(missions::partial_update::<S, B>)
        .delete(missions::delete_one::<S, B>),
    )
    .route("/missions/{id}/assign", post(missions::assign::<S, B>))
    .route(
      "/missions/{id}/targets/{target_id}",
      patch(missions::update_target::<S, B>),
    )
    .with_state(AppState { store, breeds })
}
