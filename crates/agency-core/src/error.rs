//! Error types for `agency-core`.
//!
//! The `Display` string of each variant is the message handed back to API
//! clients, so it is phrased for them rather than for logs.

use thiserror::Error;

use crate::{CatId, MissionId, TargetId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  // ── Not found ───────────────────────────────────────────────────────────
  #[error("Cat not found.")]
  CatNotFound(CatId),

  #[error("Mission not found.")]
  MissionNotFound(MissionId),

  #[error("Target not found in this mission.")]
  TargetNotFound { mission: MissionId, target: TargetId },

  // ── Validation ──────────────────────────────────────────────────────────
  /// A field failed its shape or length rules.
  #[error("{0}")]
  Invalid(String),

  #[error("Breed '{breed}' is not valid. Please choose from valid cat breeds {valid:?}")]
  UnknownBreed { breed: String, valid: Vec<String> },

  #[error("Unable to validate breed. Breed catalog is unavailable.")]
  CatalogUnavailable,

  #[error("Unable to validate breed. Connection error.")]
  CatalogUnreachable,

  #[error("Only 'salary' field can be updated")]
  SalaryOnly,

  #[error("Mission must have between 1 and 3 targets.")]
  TargetCount(usize),

  #[error("Targets must be unique within a mission (name+country).")]
  DuplicateTarget { name: String, country: String },

  #[error("Targets are fixed at creation; update them individually.")]
  TargetsFixed,

  #[error("cat_id is required.")]
  CatIdRequired,

  // ── Business rules ──────────────────────────────────────────────────────
  #[error("Mission is already assigned to a cat.")]
  AlreadyAssigned,

  #[error("This cat already has an active mission.")]
  CatBusy(CatId),

  #[error("Cannot assign a cat to a completed mission.")]
  AssignToComplete,

  #[error("Mission is completed. Targets are frozen.")]
  TargetsFrozen,

  #[error("Target is completed. Notes are frozen.")]
  NotesFrozen,

  #[error("You cannot un-complete a target.")]
  Uncomplete,

  #[error("Mission cannot be deleted because it is assigned to a cat.")]
  InService,
}

impl Error {
  /// `true` for errors that mean "the addressed resource does not exist".
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::CatNotFound(_) | Self::MissionNotFound(_) | Self::TargetNotFound { .. }
    )
  }
}

impl From<validator::ValidationErrors> for Error {
  fn from(errors: validator::ValidationErrors) -> Self {
    Self::Invalid(errors.to_string())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
