//! Handlers for `/cats` endpoints.
//!
//! | Method   | Path         | Notes |
//! |----------|--------------|-------|
//! | `GET`    | `/cats`      | All cats |
//! | `POST`   | `/cats`      | Body: [`NewCat`]; breed checked against the catalog; 201 |
//! | `GET`    | `/cats/:id`  | 404 if not found |
//! | `PUT`    | `/cats/:id`  | Body: [`NewCat`]; full replace, breed rechecked |
//! | `PATCH`  | `/cats/:id`  | Body: `{"salary": n}`; any other key is a 400 |
//! | `DELETE` | `/cats/:id`  | 204; the cat's missions become unassigned |

use agency_core::{
  CatId, Error as CoreError,
  cat::{Cat, CatPatch, NewCat},
  catalog::BreedCatalog,
  store::AgencyStore,
};
use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::{Map, Value};

use crate::{
  AppState,
  error::ApiError,
  extract::{JsonBody, PathId},
};

/// Field rules first, then the (remote) breed lookup.
async fn check_new_cat<B: BreedCatalog>(breeds: &B, input: &NewCat) -> Result<(), ApiError> {
  input.check()?;
  breeds.check_breed(&input.breed).await?;
  Ok(())
}

/// `GET /cats`
pub async fn list<S, B>(
  State(state): State<AppState<S, B>>,
) -> Result<Json<Vec<Cat>>, ApiError>
where
  S: AgencyStore,
  B: BreedCatalog,
{
  let cats = state.store.list_cats().await.map_err(ApiError::from_store)?;
  Ok(Json(cats))
}

/// `POST /cats` returns 201 with the stored cat.
pub async fn create<S, B>(
  State(state): State<AppState<S, B>>,
  JsonBody(body): JsonBody<NewCat>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AgencyStore,
  B: BreedCatalog,
{
  check_new_cat(state.breeds.as_ref(), &body).await?;
  let cat = state.store.create_cat(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(cat)))
}

/// `GET /cats/:id`
pub async fn get_one<S, B>(
  State(state): State<AppState<S, B>>,
  PathId(id): PathId<CatId>,
) -> Result<Json<Cat>, ApiError>
where
  S: AgencyStore,
  B: BreedCatalog,
{
  let cat = state
    .store
    .get_cat(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(CoreError::CatNotFound(id))?;
  Ok(Json(cat))
}

/// `PUT /cats/:id`. An unknown id is reported before the body is checked.
pub async fn update<S, B>(
  State(state): State<AppState<S, B>>,
  PathId(id): PathId<CatId>,
  JsonBody(body): JsonBody<NewCat>,
) -> Result<Json<Cat>, ApiError>
where
  S: AgencyStore,
  B: BreedCatalog,
{
  state
    .store
    .get_cat(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(CoreError::CatNotFound(id))?;

  check_new_cat(state.breeds.as_ref(), &body).await?;
  let cat = state.store.update_cat(id, body).await.map_err(ApiError::from_store)?;
  Ok(Json(cat))
}

/// `PATCH /cats/:id`, salary only.
///
/// The body is inspected as a raw object so that a forbidden key is refused
/// before anything else, whether or not its value would be valid.
pub async fn partial_update<S, B>(
  State(state): State<AppState<S, B>>,
  PathId(id): PathId<CatId>,
  JsonBody(fields): JsonBody<Map<String, Value>>,
) -> Result<Json<Cat>, ApiError>
where
  S: AgencyStore,
  B: BreedCatalog,
{
  let patch = CatPatch::from_fields(&fields)?;
  let cat = state.store.patch_cat(id, patch).await.map_err(ApiError::from_store)?;
  Ok(Json(cat))
}

/// `DELETE /cats/:id`
pub async fn delete_one<S, B>(
  State(state): State<AppState<S, B>>,
  PathId(id): PathId<CatId>,
) -> Result<StatusCode, ApiError>
where
  S: AgencyStore,
  B: BreedCatalog,
{
  state.store.delete_cat(id).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
