//! [`SqliteStore`] — the SQLite implementation of [`CatalogStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use cardex_core::{
  card::{
    Card, CardPatch, CardStatistics, CardStatisticsPatch, CardView,
    DeletionReceipt, NewCard,
  },
  query::{CardFilter, Page},
  store::CatalogStore,
  taxonomy::{
    CardSubType, CardSubTypePatch, CardSubTypeView, CardType, CardTypePatch,
  },
};

use crate::{
  Result,
  encode::{
    RawCard, RawCardSubType, RawCardSubTypeView, RawCardType, RawCardView,
    RawStatistics, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Cardex catalog backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Delete every row, children first. Used by the seed pass; the engine
  /// itself never hard-deletes.
  pub async fn clear_all(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(
          "DELETE FROM card_statistics;
           DELETE FROM cards;
           DELETE FROM card_sub_types;
           DELETE FROM card_types;",
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Taxonomy reads ────────────────────────────────────────────────────────

  async fn get_type(&self, id: Uuid) -> Result<Option<CardType>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCardType> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, created_at, updated_at
               FROM card_types WHERE id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawCardType {
                  id:         row.get(0)?,
                  name:       row.get(1)?,
                  created_at: row.get(2)?,
                  updated_at: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCardType::into_card_type).transpose()
  }

  async fn get_sub_type(&self, id: Uuid) -> Result<Option<CardSubType>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCardSubType> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, type_id, name, created_at, updated_at
               FROM card_sub_types WHERE id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawCardSubType {
                  id:         row.get(0)?,
                  type_id:    row.get(1)?,
                  name:       row.get(2)?,
                  created_at: row.get(3)?,
                  updated_at: row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCardSubType::into_sub_type).transpose()
  }

  // ── Taxonomy writes ───────────────────────────────────────────────────────

  async fn insert_type(&self, ty: &CardType) -> Result<()> {
    let id_str   = encode_uuid(ty.id);
    let name     = ty.name.clone();
    let created  = encode_dt(ty.created_at);
    let updated  = encode_dt(ty.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO card_types (id, name, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, created, updated],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn persist_type(&self, ty: &CardType) -> Result<()> {
    let id_str  = encode_uuid(ty.id);
    let name    = ty.name.clone();
    let updated = encode_dt(ty.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE card_types SET name = ?2, updated_at = ?3 WHERE id = ?1",
          rusqlite::params![id_str, name, updated],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_sub_type(&self, sub_type: &CardSubType) -> Result<()> {
    let id_str      = encode_uuid(sub_type.id);
    let type_id_str = encode_uuid(sub_type.type_id);
    let name        = sub_type.name.clone();
    let created     = encode_dt(sub_type.created_at);
    let updated     = encode_dt(sub_type.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO card_sub_types (id, type_id, name, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, type_id_str, name, created, updated],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn persist_sub_type(&self, sub_type: &CardSubType) -> Result<()> {
    let id_str      = encode_uuid(sub_type.id);
    let type_id_str = encode_uuid(sub_type.type_id);
    let name        = sub_type.name.clone();
    let updated     = encode_dt(sub_type.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE card_sub_types
           SET type_id = ?2, name = ?3, updated_at = ?4
           WHERE id = ?1",
          rusqlite::params![id_str, type_id_str, name, updated],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Card reads ────────────────────────────────────────────────────────────

  async fn get_card_row(
    &self,
    id: Uuid,
    include_deleted: bool,
  ) -> Result<Option<RawCard>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCard> = self
      .conn
      .call(move |conn| {
        let sql = if include_deleted {
          "SELECT id, type_id, sub_type_id, name, code, description,
                  image_url, created_at, updated_at, deleted_at
           FROM cards WHERE id = ?1"
        } else {
          "SELECT id, type_id, sub_type_id, name, code, description,
                  image_url, created_at, updated_at, deleted_at
           FROM cards WHERE id = ?1 AND deleted_at IS NULL"
        };

        Ok(
          conn
            .query_row(sql, rusqlite::params![id_str], |row| {
              Ok(RawCard {
                id:          row.get(0)?,
                type_id:     row.get(1)?,
                sub_type_id: row.get(2)?,
                name:        row.get(3)?,
                code:        row.get(4)?,
                description: row.get(5)?,
                image_url:   row.get(6)?,
                created_at:  row.get(7)?,
                updated_at:  row.get(8)?,
                deleted_at:  row.get(9)?,
              })
            })
            .optional()?,
        )
      })
      .await?;

    Ok(raw)
  }

  async fn get_statistics_for(
    &self,
    card_id: Uuid,
  ) -> Result<Option<CardStatistics>> {
    let card_id_str = encode_uuid(card_id);

    let raw: Option<RawStatistics> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, card_id, attack, defense, stars, created_at, updated_at
               FROM card_statistics WHERE card_id = ?1",
              rusqlite::params![card_id_str],
              |row| {
                Ok(RawStatistics {
                  id:         row.get(0)?,
                  card_id:    row.get(1)?,
                  attack:     row.get(2)?,
                  defense:    row.get(3)?,
                  stars:      row.get(4)?,
                  created_at: row.get(5)?,
                  updated_at: row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStatistics::into_statistics).transpose()
  }

  /// Load a card together with its statistics relation.
  async fn load_card(
    &self,
    id: Uuid,
    include_deleted: bool,
  ) -> Result<Option<Card>> {
    let Some(raw) = self.get_card_row(id, include_deleted).await? else {
      return Ok(None);
    };
    let statistics = self.get_statistics_for(id).await?;
    Ok(Some(raw.into_card(statistics)?))
  }

  /// Run the shared list/find projection query: cards joined with taxonomy
  /// names and (via LEFT JOIN) statistics, filtered by whichever criteria
  /// are present.
  async fn query_card_views(
    &self,
    filter: CardFilter,
    limit: i64,
    offset: i64,
  ) -> Result<Vec<CardView>> {
    let id_str          = filter.id.map(encode_uuid);
    let name            = filter.name;
    let type_id_str     = filter.type_id.map(encode_uuid);
    let sub_type_id_str = filter.sub_type_id.map(encode_uuid);
    let stars           = filter.stars;
    let include_deleted = filter.include_deleted;

    let raws: Vec<RawCardView> = self
      .conn
      .call(move |conn| {
        // Build the WHERE clause dynamically; an absent field contributes
        // no predicate. Numbered placeholders keep the bind list fixed.
        let mut conds: Vec<&'static str> = vec![];
        if id_str.is_some() {
          conds.push("c.id = ?1");
        }
        if name.is_some() {
          conds.push("c.name = ?2");
        }
        if type_id_str.is_some() {
          conds.push("c.type_id = ?3");
        }
        if sub_type_id_str.is_some() {
          conds.push("c.sub_type_id = ?4");
        }
        if stars.is_some() {
          conds.push("s.stars = ?5");
        }
        if !include_deleted {
          conds.push("c.deleted_at IS NULL");
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT
             c.id, c.type_id, t.name AS type_name,
             c.sub_type_id, st.name AS sub_type_name,
             c.name, c.code, c.description, c.image_url,
             s.id, s.attack, s.defense, s.stars,
             c.created_at, c.updated_at, c.deleted_at
           FROM cards c
           JOIN card_types t           ON t.id  = c.type_id
           JOIN card_sub_types st      ON st.id = c.sub_type_id
           LEFT JOIN card_statistics s ON s.card_id = c.id
           {where_clause}
           ORDER BY c.id ASC
           LIMIT ?6 OFFSET ?7"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              id_str.as_deref(),
              name.as_deref(),
              type_id_str.as_deref(),
              sub_type_id_str.as_deref(),
              stars,
              limit,
              offset,
            ],
            |row| {
              Ok(RawCardView {
                id:            row.get(0)?,
                type_id:       row.get(1)?,
                type_name:     row.get(2)?,
                sub_type_id:   row.get(3)?,
                sub_type_name: row.get(4)?,
                name:          row.get(5)?,
                code:          row.get(6)?,
                description:   row.get(7)?,
                image_url:     row.get(8)?,
                stats_id:      row.get(9)?,
                attack:        row.get(10)?,
                defense:       row.get(11)?,
                stars:         row.get(12)?,
                created_at:    row.get(13)?,
                updated_at:    row.get(14)?,
                deleted_at:    row.get(15)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCardView::into_view).collect()
  }

  // ── Card writes ───────────────────────────────────────────────────────────

  async fn insert_card(&self, card: &Card) -> Result<()> {
    let id_str          = encode_uuid(card.id);
    let type_id_str     = encode_uuid(card.type_id);
    let sub_type_id_str = encode_uuid(card.sub_type_id);
    let name            = card.name.clone();
    let code            = card.code.clone();
    let description     = card.description.clone();
    let image_url       = card.image_url.clone();
    let created         = encode_dt(card.created_at);
    let updated         = encode_dt(card.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO cards (
             id, type_id, sub_type_id, name, code, description,
             image_url, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str,
            type_id_str,
            sub_type_id_str,
            name,
            code,
            description,
            image_url,
            created,
            updated,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn persist_card(&self, card: &Card) -> Result<()> {
    let id_str          = encode_uuid(card.id);
    let type_id_str     = encode_uuid(card.type_id);
    let sub_type_id_str = encode_uuid(card.sub_type_id);
    let name            = card.name.clone();
    let code            = card.code.clone();
    let description     = card.description.clone();
    let image_url       = card.image_url.clone();
    let updated         = encode_dt(card.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE cards
           SET type_id = ?2, sub_type_id = ?3, name = ?4, code = ?5,
               description = ?6, image_url = ?7, updated_at = ?8
           WHERE id = ?1",
          rusqlite::params![
            id_str,
            type_id_str,
            sub_type_id_str,
            name,
            code,
            description,
            image_url,
            updated,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_statistics(&self, stats: &CardStatistics) -> Result<()> {
    let id_str      = encode_uuid(stats.id);
    let card_id_str = encode_uuid(stats.card_id);
    let attack      = stats.attack;
    let defense     = stats.defense;
    let stars       = stats.stars;
    let created     = encode_dt(stats.created_at);
    let updated     = encode_dt(stats.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO card_statistics (
             id, card_id, attack, defense, stars, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str, card_id_str, attack, defense, stars, created, updated,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn persist_statistics(&self, stats: &CardStatistics) -> Result<()> {
    let id_str  = encode_uuid(stats.id);
    let attack  = stats.attack;
    let defense = stats.defense;
    let stars   = stats.stars;
    let updated = encode_dt(stats.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE card_statistics
           SET attack = ?2, defense = ?3, stars = ?4, updated_at = ?5
           WHERE id = ?1",
          rusqlite::params![id_str, attack, defense, stars, updated],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn mark_deleted(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE cards SET deleted_at = ?2, updated_at = ?2 WHERE id = ?1",
          rusqlite::params![id_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  // ── Taxonomy ──────────────────────────────────────────────────────────────

  async fn create_type(&self, name: String) -> cardex_core::Result<CardType> {
    let now = Utc::now();
    let ty = CardType {
      id: Uuid::new_v4(),
      name,
      created_at: now,
      updated_at: now,
    };

    self.insert_type(&ty).await?;
    Ok(ty)
  }

  async fn list_types(&self, page: Page) -> cardex_core::Result<Vec<CardType>> {
    let limit  = page.limit_or_default();
    let offset = page.offset_or_default();

    let raws: Vec<RawCardType> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, created_at, updated_at
           FROM card_types
           ORDER BY id ASC
           LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], |row| {
            Ok(RawCardType {
              id:         row.get(0)?,
              name:       row.get(1)?,
              created_at: row.get(2)?,
              updated_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(crate::Error::from)?;

    Ok(
      raws
        .into_iter()
        .map(RawCardType::into_card_type)
        .collect::<Result<Vec<_>>>()?,
    )
  }

  async fn update_type(
    &self,
    id: Uuid,
    patch: CardTypePatch,
  ) -> cardex_core::Result<CardType> {
    let mut ty = self
      .get_type(id)
      .await?
      .ok_or(cardex_core::Error::TypeNotFound(id))?;

    patch.apply_to(&mut ty);
    ty.updated_at = Utc::now();

    self.persist_type(&ty).await?;
    Ok(ty)
  }

  async fn create_sub_type(
    &self,
    name: String,
    type_id: Uuid,
  ) -> cardex_core::Result<CardSubType> {
    let parent = self
      .get_type(type_id)
      .await?
      .ok_or(cardex_core::Error::TypeNotFound(type_id))?;

    let now = Utc::now();
    let sub_type = CardSubType {
      id: Uuid::new_v4(),
      type_id: parent.id,
      name,
      created_at: now,
      updated_at: now,
    };

    self.insert_sub_type(&sub_type).await?;
    Ok(sub_type)
  }

  async fn list_sub_types(
    &self,
    page: Page,
  ) -> cardex_core::Result<Vec<CardSubTypeView>> {
    let limit  = page.limit_or_default();
    let offset = page.offset_or_default();

    let raws: Vec<RawCardSubTypeView> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT st.id, st.type_id, t.name AS type_name, st.name,
                  st.created_at, st.updated_at
           FROM card_sub_types st
           JOIN card_types t ON t.id = st.type_id
           ORDER BY st.id ASC
           LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], |row| {
            Ok(RawCardSubTypeView {
              id:         row.get(0)?,
              type_id:    row.get(1)?,
              type_name:  row.get(2)?,
              name:       row.get(3)?,
              created_at: row.get(4)?,
              updated_at: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(crate::Error::from)?;

    Ok(
      raws
        .into_iter()
        .map(RawCardSubTypeView::into_view)
        .collect::<Result<Vec<_>>>()?,
    )
  }

  async fn update_sub_type(
    &self,
    id: Uuid,
    patch: CardSubTypePatch,
  ) -> cardex_core::Result<CardSubType> {
    let mut sub_type = self
      .get_sub_type(id)
      .await?
      .ok_or(cardex_core::Error::SubTypeNotFound(id))?;

    // A re-parenting patch must point at an existing type.
    if let Some(type_id) = patch.type_id {
      self
        .get_type(type_id)
        .await?
        .ok_or(cardex_core::Error::TypeNotFound(type_id))?;
    }

    patch.apply_to(&mut sub_type);
    sub_type.updated_at = Utc::now();

    self.persist_sub_type(&sub_type).await?;
    Ok(sub_type)
  }

  // ── Cards ─────────────────────────────────────────────────────────────────

  async fn create_card(&self, input: NewCard) -> cardex_core::Result<Card> {
    let ty = self
      .get_type(input.type_id)
      .await?
      .ok_or(cardex_core::Error::TypeNotFound(input.type_id))?;
    let sub_type = self
      .get_sub_type(input.sub_type_id)
      .await?
      .ok_or(cardex_core::Error::SubTypeNotFound(input.sub_type_id))?;

    if sub_type.type_id != ty.id {
      return Err(cardex_core::Error::SubTypeMismatch {
        sub_type_id: sub_type.id,
        type_id:     ty.id,
      });
    }

    let now = Utc::now();
    let card = Card {
      id: Uuid::new_v4(),
      type_id: ty.id,
      sub_type_id: sub_type.id,
      name: input.name,
      code: input.code,
      description: input.description,
      image_url: input.image_url,
      statistics: None,
      created_at: now,
      updated_at: now,
      deleted_at: None,
    };

    self.insert_card(&card).await?;

    if let Some(stats) = input.statistics {
      let row = CardStatistics {
        id: Uuid::new_v4(),
        card_id: card.id,
        attack: stats.attack,
        defense: stats.defense,
        stars: stats.stars,
        created_at: now,
        updated_at: now,
      };
      self.insert_statistics(&row).await?;
    }

    // Re-read so the returned card reflects committed state, not the
    // in-memory object assembled above.
    self
      .load_card(card.id, false)
      .await?
      .ok_or(cardex_core::Error::CardNotFound(card.id))
  }

  async fn list_cards(
    &self,
    filter: CardFilter,
    page: Page,
  ) -> cardex_core::Result<Vec<CardView>> {
    let limit  = page.limit_or_default();
    let offset = page.offset_or_default();
    Ok(self.query_card_views(filter, limit, offset).await?)
  }

  async fn find_card(&self, filter: CardFilter) -> cardex_core::Result<CardView> {
    if !filter.has_lookup_key() {
      return Err(cardex_core::Error::EmptyFilter);
    }

    // Single-card lookups match on id, name, and stars only.
    let narrowed = CardFilter {
      id:              filter.id,
      name:            filter.name,
      stars:           filter.stars,
      include_deleted: filter.include_deleted,
      ..CardFilter::default()
    };

    let mut views = self.query_card_views(narrowed, 1, 0).await?;
    views.pop().ok_or(cardex_core::Error::NoCardMatch)
  }

  async fn update_card(
    &self,
    id: Uuid,
    patch: CardPatch,
    statistics: Option<CardStatisticsPatch>,
  ) -> cardex_core::Result<Card> {
    let mut card = self
      .load_card(id, false)
      .await?
      .ok_or(cardex_core::Error::CardNotFound(id))?;

    // Re-resolve supplied taxonomy references, then re-check that the merged
    // card still points at a subtype of its own type.
    if let Some(type_id) = patch.type_id {
      self
        .get_type(type_id)
        .await?
        .ok_or(cardex_core::Error::TypeNotFound(type_id))?;
    }
    let merged_type_id     = patch.type_id.unwrap_or(card.type_id);
    let merged_sub_type_id = patch.sub_type_id.unwrap_or(card.sub_type_id);
    let sub_type = self
      .get_sub_type(merged_sub_type_id)
      .await?
      .ok_or(cardex_core::Error::SubTypeNotFound(merged_sub_type_id))?;
    if sub_type.type_id != merged_type_id {
      return Err(cardex_core::Error::SubTypeMismatch {
        sub_type_id: merged_sub_type_id,
        type_id:     merged_type_id,
      });
    }

    let now = Utc::now();
    patch.apply_to(&mut card);
    card.updated_at = now;

    if let Some(stats_patch) = statistics {
      // Updates never create a statistics row.
      let Some(stats) = card.statistics.as_mut() else {
        return Err(cardex_core::Error::MissingStatistics(id));
      };
      stats_patch.apply_to(stats);
      stats.updated_at = now;
      self.persist_statistics(stats).await?;
    }

    self.persist_card(&card).await?;
    Ok(card)
  }

  async fn soft_delete_card(
    &self,
    id: Uuid,
  ) -> cardex_core::Result<DeletionReceipt> {
    let card = self
      .load_card(id, false)
      .await?
      .ok_or(cardex_core::Error::CardNotFound(id))?;

    let deleted_at = Utc::now();
    self.mark_deleted(card.id, deleted_at).await?;

    Ok(DeletionReceipt {
      message: format!("card with id {id} has been soft deleted"),
      deleted_at,
    })
  }
}
