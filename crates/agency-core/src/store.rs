//! The `AgencyStore` trait.
//!
//! Implemented by storage backends (e.g. `agency-store-sqlite`). The API layer
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  CatId, MissionId, TargetId,
  cat::{Cat, CatPatch, NewCat},
  mission::{Mission, MissionUpdate, NewMission, RequestedCat, TargetPatch},
};

/// A backend error that may carry a domain rule violation.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The rule this error reports, or `None` for a backend failure.
  fn rule(&self) -> Option<&crate::Error>;
}

/// Abstraction over an agency store backend.
///
/// Every method is one atomic unit of work: when it fails, nothing it touched
/// has changed. Rejections surface as [`StoreError::rule`].
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AgencyStore: Send + Sync {
  type Error: StoreError;

  // ── Cats ──────────────────────────────────────────────────────────────

  /// All cats, ordered by id.
  fn list_cats(&self) -> impl Future<Output = Result<Vec<Cat>, Self::Error>> + Send + '_;

  /// Retrieve a cat by id. Returns `None` if not found.
  fn get_cat(
    &self,
    id: CatId,
  ) -> impl Future<Output = Result<Option<Cat>, Self::Error>> + Send + '_;

  /// Persist a new cat. The breed must already have been checked.
  fn create_cat(
    &self,
    input: NewCat,
  ) -> impl Future<Output = Result<Cat, Self::Error>> + Send + '_;

  /// Replace every field of an existing cat.
  fn update_cat(
    &self,
    id: CatId,
    input: NewCat,
  ) -> impl Future<Output = Result<Cat, Self::Error>> + Send + '_;

  /// Apply a salary-only patch.
  fn patch_cat(
    &self,
    id: CatId,
    patch: CatPatch,
  ) -> impl Future<Output = Result<Cat, Self::Error>> + Send + '_;

  /// Delete a cat. Missions it was on become unassigned.
  fn delete_cat(&self, id: CatId) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Missions ──────────────────────────────────────────────────────────

  /// All missions with their targets, ordered by id.
  fn list_missions(
    &self,
  ) -> impl Future<Output = Result<Vec<Mission>, Self::Error>> + Send + '_;

  /// Retrieve a mission and its targets. Returns `None` if not found.
  fn get_mission(
    &self,
    id: MissionId,
  ) -> impl Future<Output = Result<Option<Mission>, Self::Error>> + Send + '_;

  /// Create a mission together with its targets. A cat named in the input is
  /// bound under the same rules as [`AgencyStore::assign_cat`].
  fn create_mission(
    &self,
    input: NewMission,
  ) -> impl Future<Output = Result<Mission, Self::Error>> + Send + '_;

  /// Full (`partial == false`) or partial update of a mission.
  fn update_mission(
    &self,
    id: MissionId,
    update: MissionUpdate,
    partial: bool,
  ) -> impl Future<Output = Result<Mission, Self::Error>> + Send + '_;

  /// Delete an unassigned mission and its targets.
  fn delete_mission(
    &self,
    id: MissionId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Actions ───────────────────────────────────────────────────────────

  /// Bind a cat to a mission; see [`crate::mission::Mission::assign`] for the
  /// order in which rules are checked.
  fn assign_cat(
    &self,
    mission_id: MissionId,
    cat_id: RequestedCat,
  ) -> impl Future<Output = Result<Mission, Self::Error>> + Send + '_;

  /// Patch one target of a mission and complete the mission if that was the
  /// last open target.
  fn update_target(
    &self,
    mission_id: MissionId,
    target_id: TargetId,
    patch: TargetPatch,
  ) -> impl Future<Output = Result<Mission, Self::Error>> + Send + '_;
}
