//! Handlers for `/missions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/missions` | Missions with their targets |
//! | `POST`   | `/missions` | Body: [`NewMission`] with 1–3 targets; 201 |
//! | `GET`    | `/missions/:id` | 404 if not found |
//! | `PUT`    | `/missions/:id` | Body: [`MissionUpdate`]; `targets` required |
//! | `PATCH`  | `/missions/:id` | Body: [`MissionUpdate`] |
//! | `DELETE` | `/missions/:id` | 400 while a cat is assigned; 204 otherwise |
//! | `POST`   | `/missions/:id/assign` | Body: `{"cat_id": n}` |
//! | `PATCH`  | `/missions/:id/targets/:target_id` | Body: [`TargetPatch`] |

use agency_core::{
  Error as CoreError, MissionId, TargetId,
  catalog::BreedCatalog,
  mission::{Mission, MissionUpdate, NewMission, RequestedCat, TargetPatch},
  store::AgencyStore,
};
use axum::{
  Json,
  body::Bytes,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;

use crate::{
  AppState,
  error::ApiError,
  extract::{JsonBody, PathId},
};

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /missions`
pub async fn list<S, B>(
  State(state): State<AppState<S, B>>,
) -> Result<Json<Vec<Mission>>, ApiError>
where
  S: AgencyStore,
  B: BreedCatalog,
{
  let missions = state.store.list_missions().await.map_err(ApiError::from_store)?;
  Ok(Json(missions))
}

/// `GET /missions/:id`
pub async fn get_one<S, B>(
  State(state): State<AppState<S, B>>,
  PathId(id): PathId<MissionId>,
) -> Result<Json<Mission>, ApiError>
where
  S: AgencyStore,
  B: BreedCatalog,
{
  let mission = state
    .store
    .get_mission(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(CoreError::MissionNotFound(id))?;
  Ok(Json(mission))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `POST /missions` returns 201 with the mission and its targets.
pub async fn create<S, B>(
  State(state): State<AppState<S, B>>,
  JsonBody(body): JsonBody<NewMission>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AgencyStore,
  B: BreedCatalog,
{
  let mission = state.store.create_mission(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(mission)))
}

/// `PUT /missions/:id`
pub async fn update<S, B>(
  State(state): State<AppState<S, B>>,
  PathId(id): PathId<MissionId>,
  JsonBody(body): JsonBody<MissionUpdate>,
) -> Result<Json<Mission>, ApiError>
where
  S: AgencyStore,
  B: BreedCatalog,
{
  let mission = state
    .store
    .update_mission(id, body, false)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(mission))
}

/// `PATCH /missions/:id`
pub async fn partial_update<S, B>(
  State(state): State<AppState<S, B>>,
  PathId(id): PathId<MissionId>,
  JsonBody(body): JsonBody<MissionUpdate>,
) -> Result<Json<Mission>, ApiError>
where
  S: AgencyStore,
  B: BreedCatalog,
{
  let mission = state
    .store
    .update_mission(id, body, true)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(mission))
}

/// `DELETE /missions/:id`
pub async fn delete_one<S, B>(
  State(state): State<AppState<S, B>>,
  PathId(id): PathId<MissionId>,
) -> Result<StatusCode, ApiError>
where
  S: AgencyStore,
  B: BreedCatalog,
{
  state.store.delete_mission(id).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Actions ──────────────────────────────────────────────────────────────────

/// `cat_id` is kept as sent; the store reads it once the mission is free.
#[derive(Debug, Default, Deserialize)]
pub struct AssignBody {
  #[serde(default)]
  pub cat_id: RequestedCat,
}

/// `POST /missions/:id/assign`, body: `{"cat_id": n}`.
///
/// An empty body is accepted and treated as a request without a cat id, so
/// an already-assigned mission still reports that first.
pub async fn assign<S, B>(
  State(state): State<AppState<S, B>>,
  PathId(id): PathId<MissionId>,
  body: Bytes,
) -> Result<Json<Mission>, ApiError>
where
  S: AgencyStore,
  B: BreedCatalog,
{
  let body: AssignBody = if body.is_empty() {
    AssignBody::default()
  } else {
    serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
  };

  let mission = state
    .store
    .assign_cat(id, body.cat_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(mission))
}

/// `PATCH /missions/:id/targets/:target_id`, body: `{"notes"?, "complete"?}`.
pub async fn update_target<S, B>(
  State(state): State<AppState<S, B>>,
  PathId((id, target_id)): PathId<(MissionId, TargetId)>,
  JsonBody(patch): JsonBody<TargetPatch>,
) -> Result<Json<Mission>, ApiError>
where
  S: AgencyStore,
  B: BreedCatalog,
{
  let mission = state
    .store
    .update_target(id, target_id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(mission))
}
