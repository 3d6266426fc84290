//! Integration tests for `SqliteStore` against an in-memory database.

use cardex_core::{
  Error,
  card::{CardPatch, CardStatisticsPatch, NewCard, NewCardStatistics},
  query::{CardFilter, Page},
  store::CatalogStore,
  taxonomy::{CardSubType, CardSubTypePatch, CardType, CardTypePatch},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// Create a "Monster" type with an "Effect Monster" subtype under it.
async fn taxonomy(s: &SqliteStore) -> (CardType, CardSubType) {
  let ty = s.create_type("Monster".into()).await.unwrap();
  let sub_type = s
    .create_sub_type("Effect Monster".into(), ty.id)
    .await
    .unwrap();
  (ty, sub_type)
}

fn new_card(
  name: &str,
  code: &str,
  type_id: Uuid,
  sub_type_id: Uuid,
  statistics: Option<NewCardStatistics>,
) -> NewCard {
  NewCard {
    name: name.into(),
    code: code.into(),
    description: "A creature that guards the gates of the realm.".into(),
    image_url: None,
    type_id,
    sub_type_id,
    statistics,
  }
}

fn dark_magician(type_id: Uuid, sub_type_id: Uuid) -> NewCard {
  NewCard {
    name: "Dark Magician".into(),
    code: "YGO0001".into(),
    description: "The ultimate wizard in terms of attack and defense.".into(),
    image_url: None,
    type_id,
    sub_type_id,
    statistics: Some(NewCardStatistics {
      attack:  2500,
      defense: 2100,
      stars:   Some(7),
    }),
  }
}

// ─── Types ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_list_types() {
  let s = store().await;

  s.create_type("Monster".into()).await.unwrap();
  s.create_type("Spell".into()).await.unwrap();

  let all = s.list_types(Page::default()).await.unwrap();
  assert_eq!(all.len(), 2);
  let names: Vec<_> = all.iter().map(|t| t.name.as_str()).collect();
  assert!(names.contains(&"Monster"));
  assert!(names.contains(&"Spell"));
}

#[tokio::test]
async fn list_types_pagination() {
  let s = store().await;
  for name in ["Monster", "Spell", "Trap"] {
    s.create_type(name.into()).await.unwrap();
  }

  let full = s.list_types(Page::default()).await.unwrap();
  assert_eq!(full.len(), 3);

  let first = s
    .list_types(Page { limit: Some(2), offset: None })
    .await
    .unwrap();
  let rest = s
    .list_types(Page { limit: None, offset: Some(2) })
    .await
    .unwrap();
  assert_eq!(first.len(), 2);
  assert_eq!(rest.len(), 1);

  // The two windows partition the full id-ordered listing.
  let mut combined: Vec<_> = first.iter().chain(&rest).map(|t| t.id).collect();
  let full_ids: Vec<_> = full.iter().map(|t| t.id).collect();
  assert_eq!(combined.len(), 3);
  combined.dedup();
  assert_eq!(combined, full_ids);
}

#[tokio::test]
async fn duplicate_type_name_conflicts() {
  let s = store().await;
  s.create_type("Monster".into()).await.unwrap();

  let err = s.create_type("Monster".into()).await.unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
}

#[tokio::test]
async fn update_type_merges_supplied_fields() {
  let s = store().await;
  let ty = s.create_type("Monstr".into()).await.unwrap();

  let updated = s
    .update_type(ty.id, CardTypePatch { name: Some("Monster".into()) })
    .await
    .unwrap();

  assert_eq!(updated.id, ty.id);
  assert_eq!(updated.name, "Monster");
  assert_eq!(updated.created_at, ty.created_at);
  assert!(updated.updated_at >= ty.updated_at);
}

#[tokio::test]
async fn update_type_missing_errors() {
  let s = store().await;
  let err = s
    .update_type(Uuid::new_v4(), CardTypePatch::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::TypeNotFound(_)));
}

// ─── Subtypes ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_sub_type_under_existing_type() {
  let s = store().await;
  let ty = s.create_type("Monster".into()).await.unwrap();

  let sub_type = s
    .create_sub_type("Effect Monster".into(), ty.id)
    .await
    .unwrap();
  assert_eq!(sub_type.type_id, ty.id);
  assert_eq!(sub_type.name, "Effect Monster");
}

#[tokio::test]
async fn create_sub_type_missing_type_persists_nothing() {
  let s = store().await;

  let err = s
    .create_sub_type("Effect Monster".into(), Uuid::new_v4())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::TypeNotFound(_)));

  let all = s.list_sub_types(Page::default()).await.unwrap();
  assert!(all.is_empty());
}

#[tokio::test]
async fn list_sub_types_joins_parent_type_name() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;

  let all = s.list_sub_types(Page::default()).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].id, sub_type.id);
  assert_eq!(all[0].type_id, ty.id);
  assert_eq!(all[0].type_name, "Monster");
  assert_eq!(all[0].name, "Effect Monster");
}

#[tokio::test]
async fn update_sub_type_reparents_to_existing_type() {
  let s = store().await;
  let (_, sub_type) = taxonomy(&s).await;
  let spell = s.create_type("Spell".into()).await.unwrap();

  let updated = s
    .update_sub_type(
      sub_type.id,
      CardSubTypePatch { name: None, type_id: Some(spell.id) },
    )
    .await
    .unwrap();

  assert_eq!(updated.type_id, spell.id);
  assert_eq!(updated.name, "Effect Monster");
}

#[tokio::test]
async fn update_sub_type_missing_type_errors() {
  let s = store().await;
  let (_, sub_type) = taxonomy(&s).await;

  let err = s
    .update_sub_type(
      sub_type.id,
      CardSubTypePatch { name: None, type_id: Some(Uuid::new_v4()) },
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::TypeNotFound(_)));
}

#[tokio::test]
async fn update_sub_type_missing_errors() {
  let s = store().await;
  let err = s
    .update_sub_type(Uuid::new_v4(), CardSubTypePatch::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SubTypeNotFound(_)));
}

// ─── Card creation ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_card_with_statistics_returns_them() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;

  let card = s.create_card(dark_magician(ty.id, sub_type.id)).await.unwrap();

  assert_eq!(card.name, "Dark Magician");
  assert_eq!(card.code, "YGO0001");
  assert!(card.deleted_at.is_none());

  let stats = card.statistics.expect("statistics attached");
  assert_eq!(stats.card_id, card.id);
  assert_eq!(stats.attack, 2500);
  assert_eq!(stats.defense, 2100);
  assert_eq!(stats.stars, Some(7));
}

#[tokio::test]
async fn create_card_without_statistics_returns_none() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;

  let card = s
    .create_card(new_card("Mirror Force", "YGO0008", ty.id, sub_type.id, None))
    .await
    .unwrap();
  assert!(card.statistics.is_none());
}

#[tokio::test]
async fn create_card_missing_type_persists_nothing() {
  let s = store().await;
  let (_, sub_type) = taxonomy(&s).await;

  let err = s
    .create_card(dark_magician(Uuid::new_v4(), sub_type.id))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::TypeNotFound(_)));

  let all = s
    .list_cards(CardFilter::default(), Page::default())
    .await
    .unwrap();
  assert!(all.is_empty());
}

#[tokio::test]
async fn create_card_missing_sub_type_errors() {
  let s = store().await;
  let (ty, _) = taxonomy(&s).await;

  let err = s
    .create_card(dark_magician(ty.id, Uuid::new_v4()))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SubTypeNotFound(_)));
}

#[tokio::test]
async fn create_card_rejects_sub_type_of_other_type() {
  let s = store().await;
  let (ty, _) = taxonomy(&s).await;
  let spell = s.create_type("Spell".into()).await.unwrap();
  let spell_sub = s
    .create_sub_type("Normal Spell".into(), spell.id)
    .await
    .unwrap();

  let err = s
    .create_card(dark_magician(ty.id, spell_sub.id))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SubTypeMismatch { .. }));
}

#[tokio::test]
async fn duplicate_card_name_conflicts() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  s.create_card(dark_magician(ty.id, sub_type.id)).await.unwrap();

  let err = s
    .create_card(new_card("Dark Magician", "YGO0099", ty.id, sub_type.id, None))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
}

#[tokio::test]
async fn duplicate_card_code_conflicts() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  s.create_card(dark_magician(ty.id, sub_type.id)).await.unwrap();

  let err = s
    .create_card(new_card("Summoned Skull", "YGO0001", ty.id, sub_type.id, None))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
}

// ─── Listing and lookup ──────────────────────────────────────────────────────

#[tokio::test]
async fn list_cards_projects_taxonomy_names() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  s.create_card(dark_magician(ty.id, sub_type.id)).await.unwrap();

  let views = s
    .list_cards(CardFilter::default(), Page::default())
    .await
    .unwrap();
  assert_eq!(views.len(), 1);
  assert_eq!(views[0].type_name, "Monster");
  assert_eq!(views[0].sub_type_name, "Effect Monster");
  assert_eq!(views[0].name, "Dark Magician");
}

#[tokio::test]
async fn list_cards_filters_by_stars() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  s.create_card(dark_magician(ty.id, sub_type.id)).await.unwrap();
  s.create_card(new_card(
    "Celtic Guardian",
    "YGO0010",
    ty.id,
    sub_type.id,
    Some(NewCardStatistics { attack: 1400, defense: 1200, stars: Some(4) }),
  ))
  .await
  .unwrap();

  let views = s
    .list_cards(
      CardFilter { stars: Some(7), ..Default::default() },
      Page::default(),
    )
    .await
    .unwrap();

  assert_eq!(views.len(), 1);
  assert_eq!(views[0].name, "Dark Magician");
  let stats = views[0].statistics.as_ref().expect("statistics present");
  assert_eq!(stats.attack, 2500);
}

#[tokio::test]
async fn list_cards_filters_by_taxonomy() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  let spell = s.create_type("Spell".into()).await.unwrap();
  let spell_sub = s
    .create_sub_type("Normal Spell".into(), spell.id)
    .await
    .unwrap();

  s.create_card(dark_magician(ty.id, sub_type.id)).await.unwrap();
  s.create_card(new_card("Monster Reborn", "YGO0005", spell.id, spell_sub.id, None))
    .await
    .unwrap();

  let monsters = s
    .list_cards(
      CardFilter { type_id: Some(ty.id), ..Default::default() },
      Page::default(),
    )
    .await
    .unwrap();
  assert_eq!(monsters.len(), 1);
  assert_eq!(monsters[0].name, "Dark Magician");

  let spells = s
    .list_cards(
      CardFilter { sub_type_id: Some(spell_sub.id), ..Default::default() },
      Page::default(),
    )
    .await
    .unwrap();
  assert_eq!(spells.len(), 1);
  assert_eq!(spells[0].name, "Monster Reborn");
}

#[tokio::test]
async fn list_cards_respects_pagination() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  for i in 0..3 {
    s.create_card(new_card(
      &format!("Token {i}"),
      &format!("YGO010{i}"),
      ty.id,
      sub_type.id,
      None,
    ))
    .await
    .unwrap();
  }

  let full = s
    .list_cards(CardFilter::default(), Page::default())
    .await
    .unwrap();
  let window = s
    .list_cards(
      CardFilter::default(),
      Page { limit: Some(2), offset: Some(1) },
    )
    .await
    .unwrap();

  assert_eq!(full.len(), 3);
  assert_eq!(window.len(), 2);
  assert_eq!(window[0].id, full[1].id);
  assert_eq!(window[1].id, full[2].id);
}

#[tokio::test]
async fn list_cards_excludes_soft_deleted() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  let card = s.create_card(dark_magician(ty.id, sub_type.id)).await.unwrap();
  s.create_card(new_card("Kuriboh", "YGO0011", ty.id, sub_type.id, None))
    .await
    .unwrap();

  s.soft_delete_card(card.id).await.unwrap();

  let live = s
    .list_cards(CardFilter::default(), Page::default())
    .await
    .unwrap();
  assert_eq!(live.len(), 1);
  assert!(live.iter().all(|v| v.deleted_at.is_none()));
  assert_eq!(live[0].name, "Kuriboh");
}

#[tokio::test]
async fn find_card_requires_a_lookup_key() {
  let s = store().await;
  let err = s.find_card(CardFilter::default()).await.unwrap_err();
  assert!(matches!(err, Error::EmptyFilter));
}

#[tokio::test]
async fn find_card_by_name() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  let card = s.create_card(dark_magician(ty.id, sub_type.id)).await.unwrap();

  let view = s
    .find_card(CardFilter {
      name: Some("Dark Magician".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(view.id, card.id);
  assert_eq!(view.code, "YGO0001");
}

#[tokio::test]
async fn find_card_no_match_errors() {
  let s = store().await;
  let err = s
    .find_card(CardFilter { stars: Some(12), ..Default::default() })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NoCardMatch));
}

#[tokio::test]
async fn find_card_can_include_soft_deleted() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  let card = s.create_card(dark_magician(ty.id, sub_type.id)).await.unwrap();
  s.soft_delete_card(card.id).await.unwrap();

  // Excluded by default…
  let err = s
    .find_card(CardFilter { id: Some(card.id), ..Default::default() })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NoCardMatch));

  // …but retrievable on request, statistics intact.
  let view = s
    .find_card(CardFilter {
      id: Some(card.id),
      include_deleted: true,
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(view.deleted_at.is_some());
  assert!(view.statistics.is_some());
}

// ─── Updates ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_card_changes_only_supplied_fields() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  let card = s.create_card(dark_magician(ty.id, sub_type.id)).await.unwrap();

  let updated = s
    .update_card(
      card.id,
      CardPatch { name: Some("Updated Name".into()), ..Default::default() },
      None,
    )
    .await
    .unwrap();

  assert_eq!(updated.name, "Updated Name");
  assert_eq!(updated.code, card.code);
  assert_eq!(updated.description, card.description);
  assert_eq!(updated.type_id, card.type_id);
  assert_eq!(updated.sub_type_id, card.sub_type_id);

  let stats = updated.statistics.expect("statistics retained");
  assert_eq!(stats.attack, 2500);
  assert_eq!(stats.defense, 2100);
  assert_eq!(stats.stars, Some(7));
}

#[tokio::test]
async fn update_card_merges_statistics_patch() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  let card = s.create_card(dark_magician(ty.id, sub_type.id)).await.unwrap();

  let updated = s
    .update_card(
      card.id,
      CardPatch::default(),
      Some(CardStatisticsPatch { attack: Some(2600), ..Default::default() }),
    )
    .await
    .unwrap();

  let stats = updated.statistics.expect("statistics present");
  assert_eq!(stats.attack, 2600);
  assert_eq!(stats.defense, 2100);
  assert_eq!(stats.stars, Some(7));
}

#[tokio::test]
async fn update_card_statistics_patch_without_row_errors() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  let card = s
    .create_card(new_card("Mirror Force", "YGO0008", ty.id, sub_type.id, None))
    .await
    .unwrap();

  let err = s
    .update_card(
      card.id,
      CardPatch::default(),
      Some(CardStatisticsPatch { attack: Some(100), ..Default::default() }),
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MissingStatistics(_)));

  // The failed update must not have created a statistics row.
  let view = s
    .find_card(CardFilter { id: Some(card.id), ..Default::default() })
    .await
    .unwrap();
  assert!(view.statistics.is_none());
}

#[tokio::test]
async fn update_card_missing_errors() {
  let s = store().await;
  let err = s
    .update_card(Uuid::new_v4(), CardPatch::default(), None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::CardNotFound(_)));
}

#[tokio::test]
async fn update_card_rejects_mismatched_sub_type() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  let spell = s.create_type("Spell".into()).await.unwrap();
  let spell_sub = s
    .create_sub_type("Normal Spell".into(), spell.id)
    .await
    .unwrap();
  let card = s.create_card(dark_magician(ty.id, sub_type.id)).await.unwrap();

  let err = s
    .update_card(
      card.id,
      CardPatch { sub_type_id: Some(spell_sub.id), ..Default::default() },
      None,
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SubTypeMismatch { .. }));
}

#[tokio::test]
async fn update_card_can_move_to_consistent_taxonomy() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  let spell = s.create_type("Spell".into()).await.unwrap();
  let spell_sub = s
    .create_sub_type("Normal Spell".into(), spell.id)
    .await
    .unwrap();
  let card = s.create_card(dark_magician(ty.id, sub_type.id)).await.unwrap();

  let updated = s
    .update_card(
      card.id,
      CardPatch {
        type_id: Some(spell.id),
        sub_type_id: Some(spell_sub.id),
        ..Default::default()
      },
      None,
    )
    .await
    .unwrap();

  assert_eq!(updated.type_id, spell.id);
  assert_eq!(updated.sub_type_id, spell_sub.id);
}

// ─── Soft deletion ───────────────────────────────────────────────────────────

#[tokio::test]
async fn soft_delete_returns_receipt_and_is_terminal() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  let card = s.create_card(dark_magician(ty.id, sub_type.id)).await.unwrap();

  let receipt = s.soft_delete_card(card.id).await.unwrap();
  assert!(receipt.message.contains(&card.id.to_string()));

  // The row is retained with the timestamp from the receipt.
  let view = s
    .find_card(CardFilter {
      id: Some(card.id),
      include_deleted: true,
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(view.deleted_at, Some(receipt.deleted_at));

  // A second soft-delete cannot see the card any more.
  let err = s.soft_delete_card(card.id).await.unwrap_err();
  assert!(matches!(err, Error::CardNotFound(_)));
}

#[tokio::test]
async fn soft_delete_keeps_statistics_row() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  let card = s.create_card(dark_magician(ty.id, sub_type.id)).await.unwrap();

  s.soft_delete_card(card.id).await.unwrap();

  let view = s
    .find_card(CardFilter {
      id: Some(card.id),
      include_deleted: true,
      ..Default::default()
    })
    .await
    .unwrap();
  let stats = view.statistics.expect("statistics survive soft delete");
  assert_eq!(stats.attack, 2500);
}

// ─── Housekeeping ────────────────────────────────────────────────────────────

#[tokio::test]
async fn clear_all_empties_every_table() {
  let s = store().await;
  let (ty, sub_type) = taxonomy(&s).await;
  s.create_card(dark_magician(ty.id, sub_type.id)).await.unwrap();

  s.clear_all().await.unwrap();

  assert!(s.list_types(Page::default()).await.unwrap().is_empty());
  assert!(s.list_sub_types(Page::default()).await.unwrap().is_empty());
  assert!(
    s.list_cards(CardFilter::default(), Page::default())
      .await
      .unwrap()
      .is_empty()
  );
}
