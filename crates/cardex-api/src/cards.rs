//! Handlers for `/card` endpoints.
//!
//! | Method   | Path         | Notes |
//! |----------|--------------|-------|
//! | `POST`   | `/card`      | Create; 201 + the stored card |
//! | `GET`    | `/card`      | Filtered listing, soft-deleted excluded |
//! | `GET`    | `/card/find` | Requires at least one of `id`, `name`, `stars` |
//! | `PATCH`  | `/card/{id}` | Partial update, optional statistics patch |
//! | `DELETE` | `/card/{id}` | Soft delete; returns a receipt |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use cardex_core::{
  card::{
    Card, CardPatch, CardStatisticsPatch, CardView, DeletionReceipt, NewCard,
    NewCardStatistics,
  },
  query::{CardFilter, Page},
  store::CatalogStore,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStatisticsBody {
  #[validate(range(min = 1))]
  pub attack:  i64,
  #[validate(range(min = 1))]
  pub defense: i64,
  #[validate(range(min = 1))]
  pub stars:   Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCardBody {
  #[validate(length(min = 2, max = 50))]
  pub name:        String,
  #[validate(length(equal = 7))]
  pub code:        String,
  #[validate(length(min = 5, max = 255))]
  pub description: String,
  #[validate(length(min = 5, max = 255))]
  pub image_url:   Option<String>,
  pub type_id:     Uuid,
  pub sub_type_id: Uuid,
  #[validate(nested)]
  pub statistics:  Option<CreateStatisticsBody>,
}

impl From<CreateCardBody> for NewCard {
  fn from(body: CreateCardBody) -> Self {
    NewCard {
      name:        body.name,
      code:        body.code,
      description: body.description,
      image_url:   body.image_url,
      type_id:     body.type_id,
      sub_type_id: body.sub_type_id,
      statistics:  body.statistics.map(|s| NewCardStatistics {
        attack:  s.attack,
        defense: s.defense,
        stars:   s.stars,
      }),
    }
  }
}

/// `POST /card`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateCardBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
{
  body.validate()?;
  let card = store.create_card(body.into()).await?;
  Ok((StatusCode::CREATED, Json(card)))
}

// ─── List / find ─────────────────────────────────────────────────────────────

/// Query parameters shared by the listing and the single-card lookup.
#[derive(Debug, Deserialize, Default, Validate)]
pub struct CardQueryParams {
  #[validate(range(min = 1))]
  pub limit:           Option<i64>,
  #[validate(range(min = 0))]
  pub offset:          Option<i64>,
  pub id:              Option<Uuid>,
  pub name:            Option<String>,
  pub type_id:         Option<Uuid>,
  pub sub_type_id:     Option<Uuid>,
  /// Numeric string, e.g. `?stars=7`.
  pub stars:           Option<String>,
  #[serde(default)]
  pub include_deleted: bool,
}

impl CardQueryParams {
  fn into_parts(self) -> Result<(CardFilter, Page), ApiError> {
    self.validate()?;

    let stars = self
      .stars
      .as_deref()
      .map(|raw| {
        raw.parse::<i64>().map_err(|_| {
          ApiError::bad_request(format!("stars must be numeric, got {raw:?}"))
        })
      })
      .transpose()?;

    let filter = CardFilter {
      id:              self.id,
      name:            self.name,
      type_id:         self.type_id,
      sub_type_id:     self.sub_type_id,
      stars,
      include_deleted: self.include_deleted,
    };
    let page = Page { limit: self.limit, offset: self.offset };

    Ok((filter, page))
  }
}

/// `GET /card[?id=..][&name=..][&type_id=..][&sub_type_id=..][&stars=..]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<CardQueryParams>,
) -> Result<Json<Vec<CardView>>, ApiError>
where
  S: CatalogStore,
{
  let (filter, page) = params.into_parts()?;
  Ok(Json(store.list_cards(filter, page).await?))
}

/// `GET /card/find` — 400 unless at least one of `id`, `name`, `stars` is
/// present; 404 if no live card matches.
pub async fn find<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<CardQueryParams>,
) -> Result<Json<CardView>, ApiError>
where
  S: CatalogStore,
{
  let (filter, _) = params.into_parts()?;
  Ok(Json(store.find_card(filter).await?))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default, Validate)]
pub struct UpdateStatisticsBody {
  #[validate(range(min = 1))]
  pub attack:  Option<i64>,
  #[validate(range(min = 1))]
  pub defense: Option<i64>,
  #[validate(range(min = 1))]
  pub stars:   Option<i64>,
}

#[derive(Debug, Deserialize, Default, Validate)]
pub struct UpdateCardBody {
  #[validate(length(min = 2, max = 50))]
  pub name:        Option<String>,
  #[validate(length(equal = 7))]
  pub code:        Option<String>,
  #[validate(length(min = 5, max = 255))]
  pub description: Option<String>,
  #[validate(length(min = 5, max = 255))]
  pub image_url:   Option<String>,
  pub type_id:     Option<Uuid>,
  pub sub_type_id: Option<Uuid>,
  #[validate(nested)]
  pub statistics:  Option<UpdateStatisticsBody>,
}

impl UpdateCardBody {
  fn into_patches(self) -> (CardPatch, Option<CardStatisticsPatch>) {
    let patch = CardPatch {
      name:        self.name,
      code:        self.code,
      description: self.description,
      image_url:   self.image_url,
      type_id:     self.type_id,
      sub_type_id: self.sub_type_id,
    };
    let statistics = self.statistics.map(|s| CardStatisticsPatch {
      attack:  s.attack,
      defense: s.defense,
      stars:   s.stars,
    });
    (patch, statistics)
  }
}

/// `PATCH /card/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateCardBody>,
) -> Result<Json<Card>, ApiError>
where
  S: CatalogStore,
{
  body.validate()?;
  let (patch, statistics) = body.into_patches();
  Ok(Json(store.update_card(id, patch, statistics).await?))
}

// ─── Soft delete ─────────────────────────────────────────────────────────────

/// `DELETE /card/{id}`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<DeletionReceipt>, ApiError>
where
  S: CatalogStore,
{
  Ok(Json(store.soft_delete_card(id).await?))
}
