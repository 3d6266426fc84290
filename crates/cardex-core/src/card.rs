//! Card types — the catalog's central entity and its one-to-one statistics
//! sub-record.
//!
//! A card references exactly one type and one subtype (foreign-key fields),
//! and may own at most one statistics record. Statistics never exist without
//! their card and are only ever created as part of card creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Statistics ──────────────────────────────────────────────────────────────

/// Combat statistics for a card. At most one row per card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardStatistics {
  pub id:         Uuid,
  pub card_id:    Uuid,
  /// At least 1.
  pub attack:     i64,
  /// At least 1.
  pub defense:    i64,
  /// At least 1 when present; absent for cards without a level.
  pub stars:      Option<i64>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Statistics payload accepted when creating a card.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCardStatistics {
  pub attack:  i64,
  pub defense: i64,
  pub stars:   Option<i64>,
}

// ─── Card ────────────────────────────────────────────────────────────────────

/// A catalog entry. `deleted_at` marks soft-deletion; the row is retained and
/// excluded from default queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
  pub id:          Uuid,
  pub type_id:     Uuid,
  pub sub_type_id: Uuid,
  /// Unique, 2–50 characters.
  pub name:        String,
  /// Unique, exactly 7 characters.
  pub code:        String,
  /// 5–255 characters.
  pub description: String,
  /// 5–255 characters when present.
  pub image_url:   Option<String>,
  pub statistics:  Option<CardStatistics>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
  pub deleted_at:  Option<DateTime<Utc>>,
}

/// Input to card creation. Both taxonomy references must resolve, and the
/// subtype must belong to the referenced type.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCard {
  pub name:        String,
  pub code:        String,
  pub description: String,
  pub image_url:   Option<String>,
  pub type_id:     Uuid,
  pub sub_type_id: Uuid,
  pub statistics:  Option<NewCardStatistics>,
}

// ─── Patches ─────────────────────────────────────────────────────────────────

/// Partial update for a [`Card`]. Absent fields are left untouched; supplied
/// taxonomy references are re-resolved by the store before the merge commits.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardPatch {
  pub name:        Option<String>,
  pub code:        Option<String>,
  pub description: Option<String>,
  pub image_url:   Option<String>,
  pub type_id:     Option<Uuid>,
  pub sub_type_id: Option<Uuid>,
}

impl CardPatch {
  /// Merge the supplied fields into `card`.
  pub fn apply_to(&self, card: &mut Card) {
    if let Some(name) = &self.name {
      card.name = name.clone();
    }
    if let Some(code) = &self.code {
      card.code = code.clone();
    }
    if let Some(description) = &self.description {
      card.description = description.clone();
    }
    if let Some(image_url) = &self.image_url {
      card.image_url = Some(image_url.clone());
    }
    if let Some(type_id) = self.type_id {
      card.type_id = type_id;
    }
    if let Some(sub_type_id) = self.sub_type_id {
      card.sub_type_id = sub_type_id;
    }
  }
}

/// Partial update for a [`CardStatistics`] row. The merge target must already
/// exist — an update never creates a statistics record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardStatisticsPatch {
  pub attack:  Option<i64>,
  pub defense: Option<i64>,
  pub stars:   Option<i64>,
}

impl CardStatisticsPatch {
  /// Merge the supplied fields into `stats`.
  pub fn apply_to(&self, stats: &mut CardStatistics) {
    if let Some(attack) = self.attack {
      stats.attack = attack;
    }
    if let Some(defense) = self.defense {
      stats.defense = defense;
    }
    if let Some(stars) = self.stars {
      stats.stars = Some(stars);
    }
  }
}

// ─── Projections ─────────────────────────────────────────────────────────────

/// The statistics block nested inside a [`CardView`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsView {
  pub id:      Uuid,
  pub attack:  i64,
  pub defense: i64,
  pub stars:   Option<i64>,
}

/// The flat read model returned by list and find operations: card scalars
/// plus the joined type and subtype names, with statistics nested or `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardView {
  pub id:            Uuid,
  pub type_id:       Uuid,
  pub type_name:     String,
  pub sub_type_id:   Uuid,
  pub sub_type_name: String,
  pub name:          String,
  pub code:          String,
  pub description:   String,
  pub image_url:     Option<String>,
  pub statistics:    Option<StatisticsView>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
  pub deleted_at:    Option<DateTime<Utc>>,
}

// ─── Deletion receipt ────────────────────────────────────────────────────────

/// Confirmation payload returned by soft-deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionReceipt {
  pub message:    String,
  /// The moment the card was marked deleted, RFC 3339 in serialised form.
  pub deleted_at: DateTime<Utc>,
}
