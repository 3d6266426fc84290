//! The `CatalogStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `cardex-store-sqlite`).
//! Higher layers (`cardex-api`, `cardex-server`) depend on this abstraction,
//! not on any concrete backend.
//!
//! All methods return the crate's own [`Error`](crate::Error) rather than a
//! backend-specific type: the request/response boundary maps error kinds to
//! user-visible failures, so the error taxonomy is part of the contract.
//! Backends fold their internal failures into [`Error::Storage`].

use std::future::Future;

use uuid::Uuid;

use crate::{
  Result,
  card::{
    Card, CardPatch, CardStatisticsPatch, CardView, DeletionReceipt, NewCard,
  },
  query::{CardFilter, Page},
  taxonomy::{
    CardSubType, CardSubTypePatch, CardSubTypeView, CardType, CardTypePatch,
  },
};

/// Abstraction over a Cardex catalog backend.
///
/// Each method is one request-scoped unit of work; no multi-operation
/// transactions are composed at this layer. All methods return `Send`
/// futures so the trait can be used in multi-threaded async runtimes.
pub trait CatalogStore: Send + Sync {
  // ── Taxonomy ──────────────────────────────────────────────────────────

  /// Persist a new card type. Fails with [`Error::Conflict`](crate::Error)
  /// if the name is already taken.
  fn create_type(
    &self,
    name: String,
  ) -> impl Future<Output = Result<CardType>> + Send + '_;

  /// List types ordered by identifier ascending.
  fn list_types(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<CardType>>> + Send + '_;

  /// Merge the supplied fields into an existing type.
  fn update_type(
    &self,
    id: Uuid,
    patch: CardTypePatch,
  ) -> impl Future<Output = Result<CardType>> + Send + '_;

  /// Persist a new subtype under `type_id`. Fails with
  /// [`Error::TypeNotFound`](crate::Error) if the parent does not exist;
  /// nothing is persisted in that case.
  fn create_sub_type(
    &self,
    name: String,
    type_id: Uuid,
  ) -> impl Future<Output = Result<CardSubType>> + Send + '_;

  /// List subtypes joined with their parent type's name, ordered by
  /// identifier ascending.
  fn list_sub_types(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<CardSubTypeView>>> + Send + '_;

  /// Merge the supplied fields into an existing subtype. A supplied
  /// `type_id` must resolve to an existing type.
  fn update_sub_type(
    &self,
    id: Uuid,
    patch: CardSubTypePatch,
  ) -> impl Future<Output = Result<CardSubType>> + Send + '_;

  // ── Cards ─────────────────────────────────────────────────────────────

  /// Create a card, plus its statistics row when supplied, then re-read the
  /// committed card so the returned value never reflects a partially
  /// populated in-memory object.
  ///
  /// Both taxonomy references must resolve, and the subtype must belong to
  /// the referenced type.
  fn create_card(
    &self,
    input: NewCard,
  ) -> impl Future<Output = Result<Card>> + Send + '_;

  /// List cards matching `filter`, projected into [`CardView`]s. Absent
  /// filter fields are omitted from the predicate entirely; soft-deleted
  /// cards are excluded unless the filter opts in.
  fn list_cards(
    &self,
    filter: CardFilter,
    page: Page,
  ) -> impl Future<Output = Result<Vec<CardView>>> + Send + '_;

  /// Look up a single card by `id`, `name`, or `stars`. Fails with
  /// [`Error::EmptyFilter`](crate::Error) when none of those is supplied,
  /// and [`Error::NoCardMatch`](crate::Error) when nothing matches.
  fn find_card(
    &self,
    filter: CardFilter,
  ) -> impl Future<Output = Result<CardView>> + Send + '_;

  /// Merge `patch` (and optionally `statistics`) into an existing card.
  ///
  /// A statistics patch on a card without a statistics row fails with
  /// [`Error::MissingStatistics`](crate::Error) — an update never creates
  /// one.
  fn update_card(
    &self,
    id: Uuid,
    patch: CardPatch,
    statistics: Option<CardStatisticsPatch>,
  ) -> impl Future<Output = Result<Card>> + Send + '_;

  /// Mark a card deleted, retaining the row. Statistics are not touched. A
  /// second call on the same id fails with
  /// [`Error::CardNotFound`](crate::Error) because lookups exclude
  /// soft-deleted rows.
  fn soft_delete_card(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<DeletionReceipt>> + Send + '_;
}
