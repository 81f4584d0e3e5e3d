//! Cats, the agents that missions are assigned to.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::{CatId, Error, Result};

/// A persisted cat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cat {
  pub id:                  CatId,
  pub name:                String,
  pub years_of_experience: u32,
  /// Checked against the breed catalog on every write that sets it.
  pub breed:               String,
  pub salary:              u32,
}

/// Input to [`crate::store::AgencyStore::create_cat`] and
/// [`crate::store::AgencyStore::update_cat`]. A full update replaces every
/// field, so omitted counters fall back to zero exactly as on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewCat {
  #[validate(length(min = 1, max = 50))]
  pub name:                String,
  #[serde(default)]
  pub years_of_experience: u32,
  #[validate(length(min = 1, max = 100))]
  pub breed:               String,
  #[serde(default)]
  pub salary:              u32,
}

impl NewCat {
  /// Run field-level checks. Breed membership is checked separately against
  /// a [`crate::catalog::BreedCatalog`].
  pub fn check(&self) -> Result<()> { Ok(self.validate()?) }

  pub fn into_cat(self, id: CatId) -> Cat {
    Cat {
      id,
      name: self.name,
      years_of_experience: self.years_of_experience,
      breed: self.breed,
      salary: self.salary,
    }
  }
}

// ─── Partial update ──────────────────────────────────────────────────────────

/// The only partial update a cat accepts: a new salary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatPatch {
  pub salary: Option<u32>,
}

impl CatPatch {
  /// The single field a partial update may touch.
  pub const ALLOWED: &'static str = "salary";

  /// Build a patch from the raw request object.
  ///
  /// Any key other than `salary` rejects the whole patch, even when the value
  /// would be valid on its own. An empty object is an empty patch.
  pub fn from_fields(fields: &Map<String, Value>) -> Result<Self> {
    if fields.keys().any(|k| k != Self::ALLOWED) {
      return Err(Error::SalaryOnly);
    }

    let salary = match fields.get(Self::ALLOWED) {
      None => None,
      Some(v) => Some(
        v.as_u64()
          .and_then(|n| u32::try_from(n).ok())
          .ok_or_else(|| {
            Error::Invalid(
              "salary: A valid non-negative integer is required.".to_string(),
            )
          })?,
      ),
    };

    Ok(Self { salary })
  }

  pub fn is_empty(&self) -> bool { self.salary.is_none() }

  pub fn apply(&self, cat: &mut Cat) {
    if let Some(salary) = self.salary {
      cat.salary = salary;
    }
  }
}
