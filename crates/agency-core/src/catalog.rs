//! The breed catalog seam.
//!
//! Every cat write that sets a breed asks a [`BreedCatalog`] first. The real
//! implementation calls a remote service; tests swap in a fixed list.

use std::future::Future;

use crate::Result;

pub trait BreedCatalog: Send + Sync {
  /// Accept `breed` if the catalog lists it.
  ///
  /// Fails with [`crate::Error::UnknownBreed`] when the name is not listed,
  /// [`crate::Error::CatalogUnavailable`] when the catalog answers with an
  /// error, and [`crate::Error::CatalogUnreachable`] when it cannot be reached
  /// in time.
  fn check_breed(&self, breed: &str) -> impl Future<Output = Result<()>> + Send;
}
