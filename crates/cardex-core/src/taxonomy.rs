//! Taxonomy types — the type → subtype hierarchy cards are classified into.
//!
//! Types and subtypes hold only identity and a name; everything interesting
//! about a card lives on the card itself. A subtype always belongs to exactly
//! one type, expressed as a plain foreign-key field rather than an embedded
//! parent object — joins are performed explicitly by the store per query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Entities ────────────────────────────────────────────────────────────────

/// A top-level card classification (e.g. "Monster", "Spell", "Trap").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardType {
  pub id:         Uuid,
  /// Unique across all types, 2–50 characters.
  pub name:       String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A second-level classification under exactly one [`CardType`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSubType {
  pub id:         Uuid,
  pub type_id:    Uuid,
  /// Unique across all subtypes, 2–50 characters.
  pub name:       String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

// ─── Projections ─────────────────────────────────────────────────────────────

/// A subtype joined with its parent type's name, as returned by listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSubTypeView {
  pub id:         Uuid,
  pub type_id:    Uuid,
  pub type_name:  String,
  pub name:       String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

// ─── Patches ─────────────────────────────────────────────────────────────────

/// Partial update for a [`CardType`]. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardTypePatch {
  pub name: Option<String>,
}

impl CardTypePatch {
  /// Merge the supplied fields into `ty`.
  pub fn apply_to(&self, ty: &mut CardType) {
    if let Some(name) = &self.name {
      ty.name = name.clone();
    }
  }
}

/// Partial update for a [`CardSubType`]. A supplied `type_id` re-parents the
/// subtype and must resolve to an existing type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardSubTypePatch {
  pub name:    Option<String>,
  pub type_id: Option<Uuid>,
}

impl CardSubTypePatch {
  /// Merge the supplied fields into `sub_type`.
  pub fn apply_to(&self, sub_type: &mut CardSubType) {
    if let Some(name) = &self.name {
      sub_type.name = name.clone();
    }
    if let Some(type_id) = self.type_id {
      sub_type.type_id = type_id;
    }
  }
}
