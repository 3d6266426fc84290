//! Handlers for `/card-type` and `/card-sub-type` endpoints.
//!
//! | Method  | Path                  | Notes |
//! |---------|-----------------------|-------|
//! | `POST`  | `/card-type`          | Body: `{"name": "Monster"}` |
//! | `GET`   | `/card-type`          | Paginated, id ascending |
//! | `PATCH` | `/card-type/{id}`     | Partial update |
//! | `POST`  | `/card-sub-type`      | Body: `{"name", "type_id"}`; 404 if the type is missing |
//! | `GET`   | `/card-sub-type`      | Joined with the parent type name |
//! | `PATCH` | `/card-sub-type/{id}` | Partial update; a new `type_id` must exist |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use cardex_core::{
  query::Page,
  store::CatalogStore,
  taxonomy::{
    CardSubType, CardSubTypePatch, CardSubTypeView, CardType, CardTypePatch,
  },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;

// ─── Pagination params ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default, Validate)]
pub struct PageParams {
  #[validate(range(min = 1))]
  pub limit:  Option<i64>,
  #[validate(range(min = 0))]
  pub offset: Option<i64>,
}

impl PageParams {
  fn page(&self) -> Result<Page, ApiError> {
    self.validate()?;
    Ok(Page { limit: self.limit, offset: self.offset })
  }
}

// ─── Types ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTypeBody {
  #[validate(length(min = 2, max = 50))]
  pub name: String,
}

/// `POST /card-type`
pub async fn create_type<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateTypeBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
{
  body.validate()?;
  let ty = store.create_type(body.name).await?;
  Ok((StatusCode::CREATED, Json(ty)))
}

/// `GET /card-type[?limit=..][&offset=..]`
pub async fn list_types<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<PageParams>,
) -> Result<Json<Vec<CardType>>, ApiError>
where
  S: CatalogStore,
{
  let page = params.page()?;
  Ok(Json(store.list_types(page).await?))
}

#[derive(Debug, Deserialize, Default, Validate)]
pub struct UpdateTypeBody {
  #[validate(length(min = 2, max = 50))]
  pub name: Option<String>,
}

/// `PATCH /card-type/{id}`
pub async fn update_type<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateTypeBody>,
) -> Result<Json<CardType>, ApiError>
where
  S: CatalogStore,
{
  body.validate()?;
  let patch = CardTypePatch { name: body.name };
  Ok(Json(store.update_type(id, patch).await?))
}

// ─── Subtypes ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubTypeBody {
  #[validate(length(min = 2, max = 50))]
  pub name:    String,
  pub type_id: Uuid,
}

/// `POST /card-sub-type`
pub async fn create_sub_type<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateSubTypeBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
{
  body.validate()?;
  let sub_type = store.create_sub_type(body.name, body.type_id).await?;
  Ok((StatusCode::CREATED, Json(sub_type)))
}

/// `GET /card-sub-type[?limit=..][&offset=..]`
pub async fn list_sub_types<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<PageParams>,
) -> Result<Json<Vec<CardSubTypeView>>, ApiError>
where
  S: CatalogStore,
{
  let page = params.page()?;
  Ok(Json(store.list_sub_types(page).await?))
}

#[derive(Debug, Deserialize, Default, Validate)]
pub struct UpdateSubTypeBody {
  #[validate(length(min = 2, max = 50))]
  pub name:    Option<String>,
  pub type_id: Option<Uuid>,
}

/// `PATCH /card-sub-type/{id}`
pub async fn update_sub_type<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateSubTypeBody>,
) -> Result<Json<CardSubType>, ApiError>
where
  S: CatalogStore,
{
  body.validate()?;
  let patch = CardSubTypePatch { name: body.name, type_id: body.type_id };
  Ok(Json(store.update_sub_type(id, patch).await?))
}
