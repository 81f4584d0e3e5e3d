//! Missions and their targets.
//!
//! A mission owns one to three targets, fixed when it is created. Both
//! missions and targets carry a one-way [`Completion`] flag: a target is
//! completed by a client, a mission completes itself once every target has.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::{CatId, Error, MissionId, Result, TargetId};

/// Inclusive bounds on the number of targets a mission carries.
pub const MIN_TARGETS: usize = 1;
pub const MAX_TARGETS: usize = 3;

// ─── Completion ──────────────────────────────────────────────────────────────

/// A one-way completion flag. Serialised as a plain JSON boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum Completion {
  #[default]
  Open,
  Complete,
}

impl Completion {
  pub fn is_complete(self) -> bool { matches!(self, Self::Complete) }

  /// Apply a client's requested state.
  ///
  /// `true` completes the flag and is idempotent; `false` is always refused,
  /// whatever the current state.
  pub fn request(&mut self, complete: bool) -> Result<()> {
    if !complete {
      return Err(Error::Uncomplete);
    }
    *self = Self::Complete;
    Ok(())
  }
}

impl From<bool> for Completion {
  fn from(b: bool) -> Self { if b { Self::Complete } else { Self::Open } }
}

impl From<Completion> for bool {
  fn from(c: Completion) -> Self { c.is_complete() }
}

/// Decide whether a mission is complete given its targets.
///
/// A mission that is already complete stays complete; an open one completes
/// once none of its targets is still open.
pub fn recompute_mission_completion(mission: Completion, targets: &[Target]) -> bool {
  mission.is_complete() || targets.iter().all(|t| t.complete.is_complete())
}

// ─── Targets ─────────────────────────────────────────────────────────────────

/// A named, country-tagged objective inside a mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
  pub id:       TargetId,
  pub name:     String,
  pub country:  String,
  pub notes:    String,
  pub complete: Completion,
}

impl Target {
  /// Overwrite the notes; refused once the target is complete.
  pub fn set_notes(&mut self, notes: String) -> Result<()> {
    if self.complete.is_complete() {
      return Err(Error::NotesFrozen);
    }
    self.notes = notes;
    Ok(())
  }
}

/// A target definition submitted with a new mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewTarget {
  #[validate(length(min = 1, max = 140))]
  pub name:    String,
  #[validate(length(min = 1, max = 50))]
  pub country: String,
  #[serde(default)]
  pub notes:   String,
}

impl NewTarget {
  fn key(&self) -> (&str, &str) { (&self.name, &self.country) }
}

/// Validate a submitted target list: per-field rules, then the count, then
/// `(name, country)` uniqueness. Matching is exact and case-sensitive.
pub fn check_targets(targets: &[NewTarget]) -> Result<()> {
  for t in targets {
    t.validate()?;
  }

  if !(MIN_TARGETS..=MAX_TARGETS).contains(&targets.len()) {
    return Err(Error::TargetCount(targets.len()));
  }

  let mut seen = HashSet::with_capacity(targets.len());
  for t in targets {
    if !seen.insert(t.key()) {
      return Err(Error::DuplicateTarget {
        name:    t.name.clone(),
        country: t.country.clone(),
      });
    }
  }
  Ok(())
}

/// Body of `PATCH /missions/{id}/targets/{target_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPatch {
  #[serde(default)]
  pub notes:    Option<String>,
  #[serde(default)]
  pub complete: Option<bool>,
}

// ─── Missions ────────────────────────────────────────────────────────────────

/// A mission with its targets in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
  pub id:       MissionId,
  pub cat:      Option<CatId>,
  pub complete: Completion,
  pub targets:  Vec<Target>,
}

/// Input to [`crate::store::AgencyStore::create_mission`]. Any `complete`
/// sent by the client is not part of this type and is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMission {
  #[serde(default)]
  pub cat:     Option<CatId>,
  pub targets: Vec<NewTarget>,
}

impl NewMission {
  pub fn check(&self) -> Result<()> { check_targets(&self.targets) }
}

/// Body of `PUT` / `PATCH /missions/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionUpdate {
  /// Outer `None`: key absent. `Some(None)`: explicit `null`.
  #[serde(default, deserialize_with = "present")]
  pub cat:     Option<Option<CatId>>,
  #[serde(default)]
  pub targets: Option<Vec<NewTarget>>,
}

fn present<'de, D, T>(d: D) -> std::result::Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  T::deserialize(d).map(Some)
}

/// What the store knows about the cat named in an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatStanding {
  /// No cat with that id exists.
  Missing,
  /// The cat is already on a mission that is not complete.
  Busy,
  Available,
}

/// The `cat_id` of an assign request exactly as the client sent it.
///
/// It is interpreted only after the mission is known to be free, so an
/// occupied mission is reported before anything wrong with the id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RequestedCat(Option<Value>);

impl From<Option<CatId>> for RequestedCat {
  fn from(id: Option<CatId>) -> Self { Self(id.map(Value::from)) }
}

impl RequestedCat {
  /// Absent, `null`, `false`, `0` and `""` name no cat. Integers and integer
  /// strings name one; anything else is invalid.
  pub fn resolve(&self) -> Result<Option<CatId>> {
    let invalid = || Error::Invalid("cat_id: A valid integer is required.".to_string());
    match &self.0 {
      None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
      Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
      Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(invalid),
      Some(Value::String(s)) if s.is_empty() => Ok(None),
      Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid()),
      Some(_) => Err(invalid()),
    }
  }
}

impl Mission {
  /// The cat an assign request names, once this mission is known to be free.
  pub fn requested_cat(&self, requested: &RequestedCat) -> Result<Option<CatId>> {
    if self.cat.is_some() {
      return Err(Error::AlreadyAssigned);
    }
    requested.resolve()
  }

  /// Bind a cat to this mission.
  ///
  /// `candidate` is the requested cat id together with its standing, or
  /// `None` when the request named no cat. Checks run in a fixed order so the
  /// reported error is deterministic: existing assignment, missing id,
  /// unknown cat, busy cat, completed mission.
  pub fn assign(&mut self, candidate: Option<(CatId, CatStanding)>) -> Result<()> {
    if self.cat.is_some() {
      return Err(Error::AlreadyAssigned);
    }
    let (cat_id, standing) = candidate.ok_or(Error::CatIdRequired)?;
    match standing {
      CatStanding::Missing => return Err(Error::CatNotFound(cat_id)),
      CatStanding::Busy => return Err(Error::CatBusy(cat_id)),
      CatStanding::Available => {}
    }
    if self.complete.is_complete() {
      return Err(Error::AssignToComplete);
    }
    self.cat = Some(cat_id);
    Ok(())
  }

  /// A mission with a cat on it is in service and cannot be deleted.
  pub fn ensure_deletable(&self) -> Result<()> {
    match self.cat {
      Some(_) => Err(Error::InService),
      None => Ok(()),
    }
  }

  /// Check a mission update against this mission.
  ///
  /// Returns the cat id that must go through [`Mission::assign`], if the
  /// update binds one. Resubmitted targets pass the creation rules, are
  /// refused outright on a completed mission, and must otherwise match the
  /// existing `(name, country)` sequence.
  pub fn plan_update(
    &self,
    update: &MissionUpdate,
    partial: bool,
  ) -> Result<Option<CatId>> {
    match &update.targets {
      Some(targets) => {
        check_targets(targets)?;
        if self.complete.is_complete() {
          return Err(Error::TargetsFrozen);
        }
        let same = targets.len() == self.targets.len()
          && targets
            .iter()
            .zip(&self.targets)
            .all(|(new, old)| new.name == old.name && new.country == old.country);
        if !same {
          return Err(Error::TargetsFixed);
        }
      }
      None if !partial => {
        return Err(Error::Invalid("targets: This field is required.".to_string()));
      }
      None => {}
    }

    match update.cat {
      None => Ok(None),
      Some(requested) if requested == self.cat => Ok(None),
      Some(_) if self.cat.is_some() => Err(Error::AlreadyAssigned),
      Some(requested) => Ok(requested),
    }
  }

  /// Apply a target patch and cascade completion to the mission.
  ///
  /// Returns `true` if this call completed the mission. On error nothing in
  /// `self` has changed.
  pub fn update_target(&mut self, target_id: TargetId, patch: &TargetPatch) -> Result<bool> {
    let mission_id = self.id;
    let frozen = self.complete.is_complete();

    let target = self
      .targets
      .iter_mut()
      .find(|t| t.id == target_id)
      .ok_or(Error::TargetNotFound { mission: mission_id, target: target_id })?;

    if frozen {
      return Err(Error::TargetsFrozen);
    }

    let mut next = target.clone();
    if let Some(notes) = &patch.notes {
      next.set_notes(notes.clone())?;
    }
    if let Some(complete) = patch.complete {
      next.complete.request(complete)?;
    }
    *target = next;

    if recompute_mission_completion(self.complete, &self.targets) {
      self.complete = Completion::Complete;
      return Ok(true);
    }
    Ok(false)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn new_target(name: &str, country: &str) -> NewTarget {
    NewTarget { name: name.into(), country: country.into(), notes: String::new() }
  }

  fn target(id: TargetId, complete: bool) -> Target {
    Target {
      id,
      name: format!("T{id}"),
      country: "FR".into(),
      notes: String::new(),
      complete: complete.into(),
    }
  }

  fn mission(targets: Vec<Target>) -> Mission {
    Mission { id: 7, cat: None, complete: Completion::Open, targets }
  }

  // ── Completion ──────────────────────────────────────────────────────────

  #[test]
  fn completion_is_one_way() {
    let mut c = Completion::Open;
    assert_eq!(c.request(false), Err(Error::Uncomplete));
    assert_eq!(c, Completion::Open);

    c.request(true).unwrap();
    assert!(c.is_complete());
    c.request(true).unwrap();
    assert!(c.is_complete());
    assert_eq!(c.request(false), Err(Error::Uncomplete));
    assert!(c.is_complete());
  }

  #[test]
  fn completion_serialises_as_bool() {
    assert_eq!(serde_json::to_value(Completion::Complete).unwrap(), json!(true));
    let c: Completion = serde_json::from_value(json!(false)).unwrap();
    assert_eq!(c, Completion::Open);
  }

  #[test]
  fn recompute_requires_every_target() {
    let open = [target(1, true), target(2, false)];
    assert!(!recompute_mission_completion(Completion::Open, &open));

    let done = [target(1, true), target(2, true)];
    assert!(recompute_mission_completion(Completion::Open, &done));

    assert!(recompute_mission_completion(Completion::Complete, &open));
  }

  // ── Target list validation ──────────────────────────────────────────────

  #[test]
  fn target_count_bounds() {
    assert_eq!(check_targets(&[]), Err(Error::TargetCount(0)));
    check_targets(&[new_target("A", "FR")]).unwrap();
    check_targets(&[new_target("A", "FR"), new_target("B", "DE"), new_target("C", "IT")])
      .unwrap();

    let four: Vec<_> = (0..4).map(|i| new_target(&format!("T{i}"), "FR")).collect();
    assert_eq!(check_targets(&four), Err(Error::TargetCount(4)));
  }

  #[test]
  fn duplicate_name_country_pairs_are_rejected() {
    let err = check_targets(&[new_target("A", "FR"), new_target("A", "FR")]).unwrap_err();
    assert!(matches!(err, Error::DuplicateTarget { .. }));

    // Same name in another country, or a different case, is distinct.
    check_targets(&[new_target("A", "FR"), new_target("A", "DE")]).unwrap();
    check_targets(&[new_target("A", "FR"), new_target("a", "FR")]).unwrap();
  }

  #[test]
  fn target_field_lengths_are_enforced() {
    let err = check_targets(&[new_target(&"n".repeat(141), "FR")]).unwrap_err();
    assert!(matches!(err, Error::Invalid(_)));
    let err = check_targets(&[new_target("A", &"c".repeat(51))]).unwrap_err();
    assert!(matches!(err, Error::Invalid(_)));
  }

  // ── Assignment ──────────────────────────────────────────────────────────

  #[test]
  fn assign_reports_errors_in_order() {
    let mut m = mission(vec![target(1, false)]);
    m.cat = Some(1);
    m.complete = Completion::Complete;
    // Existing assignment wins over everything else.
    assert_eq!(m.assign(None), Err(Error::AlreadyAssigned));

    m.cat = None;
    assert_eq!(m.assign(None), Err(Error::CatIdRequired));
    assert_eq!(m.assign(Some((9, CatStanding::Missing))), Err(Error::CatNotFound(9)));
    assert_eq!(m.assign(Some((9, CatStanding::Busy))), Err(Error::CatBusy(9)));
    assert_eq!(m.assign(Some((9, CatStanding::Available))), Err(Error::AssignToComplete));
    assert_eq!(m.cat, None);

    m.complete = Completion::Open;
    m.assign(Some((9, CatStanding::Available))).unwrap();
    assert_eq!(m.cat, Some(9));
  }

  #[test]
  fn requested_cat_reads_loose_ids() {
    let req = |v| RequestedCat(Some(v));

    assert_eq!(RequestedCat::default().resolve(), Ok(None));
    for blank in [json!(null), json!(0), json!(""), json!(false)] {
      assert_eq!(req(blank).resolve(), Ok(None));
    }
    assert_eq!(req(json!(4)).resolve(), Ok(Some(4)));
    assert_eq!(req(json!("4")).resolve(), Ok(Some(4)));
    for bad in [json!("x"), json!(1.5), json!(true), json!([1])] {
      assert!(matches!(req(bad).resolve(), Err(Error::Invalid(_))));
    }
  }

  #[test]
  fn occupied_mission_is_reported_before_a_bad_id() {
    let mut m = mission(vec![target(1, false)]);
    let bad = RequestedCat(Some(json!("x")));
    assert!(matches!(m.requested_cat(&bad), Err(Error::Invalid(_))));

    m.cat = Some(2);
    assert_eq!(m.requested_cat(&bad), Err(Error::AlreadyAssigned));
    assert_eq!(m.requested_cat(&RequestedCat::default()), Err(Error::AlreadyAssigned));
  }

  #[test]
  fn assigned_mission_is_not_deletable() {
    let mut m = mission(vec![target(1, false)]);
    m.ensure_deletable().unwrap();
    m.cat = Some(3);
    assert_eq!(m.ensure_deletable(), Err(Error::InService));
  }

  // ── Updates ─────────────────────────────────────────────────────────────

  #[test]
  fn plan_update_handles_cat_changes() {
    let mut m = mission(vec![target(1, false)]);
    let set = |cat| MissionUpdate { cat: Some(cat), targets: None };

    assert_eq!(m.plan_update(&MissionUpdate::default(), true), Ok(None));
    assert_eq!(m.plan_update(&set(None), true), Ok(None));
    assert_eq!(m.plan_update(&set(Some(4)), true), Ok(Some(4)));

    m.cat = Some(4);
    assert_eq!(m.plan_update(&set(Some(4)), true), Ok(None));
    assert_eq!(m.plan_update(&set(Some(5)), true), Err(Error::AlreadyAssigned));
    assert_eq!(m.plan_update(&set(None), true), Err(Error::AlreadyAssigned));
  }

  #[test]
  fn plan_update_keeps_targets_fixed() {
    let m = mission(vec![target(1, false), target(2, false)]);
    let with = |targets| MissionUpdate { cat: None, targets: Some(targets) };

    assert!(matches!(
      m.plan_update(&MissionUpdate::default(), false),
      Err(Error::Invalid(_))
    ));
    assert_eq!(
      m.plan_update(&with(vec![new_target("T1", "FR"), new_target("T2", "FR")]), false),
      Ok(None)
    );
    assert_eq!(
      m.plan_update(&with(vec![new_target("T1", "FR")]), false),
      Err(Error::TargetsFixed)
    );
    assert_eq!(m.plan_update(&with(vec![]), true), Err(Error::TargetCount(0)));
  }

  #[test]
  fn plan_update_refuses_targets_on_a_completed_mission() {
    let mut m = mission(vec![target(1, true)]);
    m.complete = Completion::Complete;
    let same = MissionUpdate { cat: None, targets: Some(vec![new_target("T1", "FR")]) };

    assert_eq!(m.plan_update(&same, false), Err(Error::TargetsFrozen));
    // Without targets the update is still accepted.
    assert_eq!(m.plan_update(&MissionUpdate::default(), true), Ok(None));
  }

  #[test]
  fn missing_cat_key_differs_from_null() {
    let absent: MissionUpdate = serde_json::from_value(json!({})).unwrap();
    assert_eq!(absent.cat, None);
    let null: MissionUpdate = serde_json::from_value(json!({ "cat": null })).unwrap();
    assert_eq!(null.cat, Some(None));
  }

  #[test]
  fn update_target_cascades_completion_once() {
    let mut m = mission(vec![target(1, false), target(2, false)]);
    let done = TargetPatch { notes: None, complete: Some(true) };

    assert_eq!(m.update_target(1, &done), Ok(false));
    assert!(!m.complete.is_complete());
    assert_eq!(m.update_target(2, &done), Ok(true));
    assert!(m.complete.is_complete());

    // Frozen afterwards, even for an idempotent request.
    assert_eq!(m.update_target(2, &done), Err(Error::TargetsFrozen));
  }

  #[test]
  fn update_target_rules() {
    let mut m = mission(vec![target(1, true), target(2, false)]);

    assert_eq!(
      m.update_target(99, &TargetPatch::default()),
      Err(Error::TargetNotFound { mission: 7, target: 99 })
    );

    let notes = TargetPatch { notes: Some("seen at dusk".into()), complete: None };
    assert_eq!(m.update_target(1, &notes), Err(Error::NotesFrozen));
    assert_eq!(m.update_target(2, &notes), Ok(false));
    assert_eq!(m.targets[1].notes, "seen at dusk");

    let undo = TargetPatch { notes: None, complete: Some(false) };
    assert_eq!(m.update_target(1, &undo), Err(Error::Uncomplete));
    assert_eq!(m.update_target(2, &undo), Err(Error::Uncomplete));

    // A rejected `complete` discards notes sent in the same patch.
    let mixed = TargetPatch { notes: Some("overwritten".into()), complete: Some(false) };
    assert_eq!(m.update_target(2, &mixed), Err(Error::Uncomplete));
    assert_eq!(m.targets[1].notes, "seen at dusk");

    let again = TargetPatch { notes: None, complete: Some(true) };
    assert_eq!(m.update_target(1, &again), Ok(false));
  }
}
