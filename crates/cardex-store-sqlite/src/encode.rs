//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Integers map directly.

use cardex_core::{
  card::{Card, CardStatistics, CardView, StatisticsView},
  taxonomy::{CardSubType, CardSubTypeView, CardType},
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `card_types` row.
pub struct RawCardType {
  pub id:         String,
  pub name:       String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawCardType {
  pub fn into_card_type(self) -> Result<CardType> {
    Ok(CardType {
      id:         decode_uuid(&self.id)?,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `card_sub_types` row.
pub struct RawCardSubType {
  pub id:         String,
  pub type_id:    String,
  pub name:       String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawCardSubType {
  pub fn into_sub_type(self) -> Result<CardSubType> {
    Ok(CardSubType {
      id:         decode_uuid(&self.id)?,
      type_id:    decode_uuid(&self.type_id)?,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// A `card_sub_types` row joined with its parent type's name.
pub struct RawCardSubTypeView {
  pub id:         String,
  pub type_id:    String,
  pub type_name:  String,
  pub name:       String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawCardSubTypeView {
  pub fn into_view(self) -> Result<CardSubTypeView> {
    Ok(CardSubTypeView {
      id:         decode_uuid(&self.id)?,
      type_id:    decode_uuid(&self.type_id)?,
      type_name:  self.type_name,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `cards` row, without statistics.
pub struct RawCard {
  pub id:          String,
  pub type_id:     String,
  pub sub_type_id: String,
  pub name:        String,
  pub code:        String,
  pub description: String,
  pub image_url:   Option<String>,
  pub created_at:  String,
  pub updated_at:  String,
  pub deleted_at:  Option<String>,
}

impl RawCard {
  /// Build a [`Card`], attaching an already-decoded statistics row.
  pub fn into_card(self, statistics: Option<CardStatistics>) -> Result<Card> {
    Ok(Card {
      id:          decode_uuid(&self.id)?,
      type_id:     decode_uuid(&self.type_id)?,
      sub_type_id: decode_uuid(&self.sub_type_id)?,
      name:        self.name,
      code:        self.code,
      description: self.description,
      image_url:   self.image_url,
      statistics,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
      deleted_at:  self.deleted_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw values read directly from a `card_statistics` row.
pub struct RawStatistics {
  pub id:         String,
  pub card_id:    String,
  pub attack:     i64,
  pub defense:    i64,
  pub stars:      Option<i64>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawStatistics {
  pub fn into_statistics(self) -> Result<CardStatistics> {
    Ok(CardStatistics {
      id:         decode_uuid(&self.id)?,
      card_id:    decode_uuid(&self.card_id)?,
      attack:     self.attack,
      defense:    self.defense,
      stars:      self.stars,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// A `cards` row joined with type and subtype names and (optionally) its
/// statistics columns, as produced by the list/find projection query.
pub struct RawCardView {
  pub id:            String,
  pub type_id:       String,
  pub type_name:     String,
  pub sub_type_id:   String,
  pub sub_type_name: String,
  pub name:          String,
  pub code:          String,
  pub description:   String,
  pub image_url:     Option<String>,
  pub stats_id:      Option<String>,
  pub attack:        Option<i64>,
  pub defense:       Option<i64>,
  pub stars:         Option<i64>,
  pub created_at:    String,
  pub updated_at:    String,
  pub deleted_at:    Option<String>,
}

impl RawCardView {
  pub fn into_view(self) -> Result<CardView> {
    // The LEFT JOIN yields all-NULL statistics columns for cards without a
    // statistics row; a present stats_id implies present attack/defense.
    let statistics = match self.stats_id {
      Some(stats_id) => Some(StatisticsView {
        id:      decode_uuid(&stats_id)?,
        attack:  self.attack.unwrap_or_default(),
        defense: self.defense.unwrap_or_default(),
        stars:   self.stars,
      }),
      None => None,
    };

    Ok(CardView {
      id:            decode_uuid(&self.id)?,
      type_id:       decode_uuid(&self.type_id)?,
      type_name:     self.type_name,
      sub_type_id:   decode_uuid(&self.sub_type_id)?,
      sub_type_name: self.sub_type_name,
      name:          self.name,
      code:          self.code,
      description:   self.description,
      image_url:     self.image_url,
      statistics,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
      deleted_at:    self.deleted_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}
