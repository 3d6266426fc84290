//! Query composition — sparse filters and pagination.
//!
//! Filter fields are independently optional; an absent field contributes no
//! predicate at all (it is never matched against null or a default value).

use serde::Deserialize;
use uuid::Uuid;

// ─── Pagination ──────────────────────────────────────────────────────────────

pub const DEFAULT_LIMIT: i64 = 10;

/// Pagination window shared by every list operation.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Page {
  pub limit:  Option<i64>,
  pub offset: Option<i64>,
}

impl Page {
  /// Effective limit; defaults to [`DEFAULT_LIMIT`].
  pub fn limit_or_default(&self) -> i64 {
    self.limit.unwrap_or(DEFAULT_LIMIT)
  }

  /// Effective offset; defaults to 0.
  pub fn offset_or_default(&self) -> i64 {
    self.offset.unwrap_or(0)
  }
}

// ─── Card filter ─────────────────────────────────────────────────────────────

/// Criteria for card listings and single-card lookups.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardFilter {
  pub id:              Option<Uuid>,
  /// Exact-match on the card name.
  pub name:            Option<String>,
  pub type_id:         Option<Uuid>,
  pub sub_type_id:     Option<Uuid>,
  pub stars:           Option<i64>,
  /// Soft-deleted cards are excluded unless this is set.
  #[serde(default)]
  pub include_deleted: bool,
}

impl CardFilter {
  /// Whether the filter carries at least one of the fields a single-card
  /// lookup accepts (`id`, `name`, `stars`).
  pub fn has_lookup_key(&self) -> bool {
    self.id.is_some() || self.name.is_some() || self.stars.is_some()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn page_defaults() {
    let page = Page::default();
    assert_eq!(page.limit_or_default(), 10);
    assert_eq!(page.offset_or_default(), 0);
  }

  #[test]
  fn lookup_key_detection() {
    assert!(!CardFilter::default().has_lookup_key());
    assert!(
      CardFilter { stars: Some(7), ..Default::default() }.has_lookup_key()
    );
    // Taxonomy fields alone are not enough for a single-card lookup.
    assert!(
      !CardFilter { type_id: Some(Uuid::new_v4()), ..Default::default() }
        .has_lookup_key()
    );
  }
}
