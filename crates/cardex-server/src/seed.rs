//! Demo catalog fixture.
//!
//! Clears the database and repopulates it through the public store
//! operations, so the seed pass exercises the same invariants as any other
//! caller.

use std::collections::HashMap;

use cardex_core::{
  card::{NewCard, NewCardStatistics},
  store::CatalogStore,
};
use cardex_store_sqlite::SqliteStore;

const TYPES: &[&str] = &["Monster", "Spell", "Trap"];

const SUB_TYPES: &[(&str, &[&str])] = &[
  ("Monster", &[
    "Normal Monster",
    "Effect Monster",
    "Ritual Monster",
    "Fusion Monster",
  ]),
  ("Spell", &[
    "Normal Spell",
    "Quick-Play Spell",
    "Continuous Spell",
    "Field Spell",
    "Equip Spell",
  ]),
  ("Trap", &["Normal Trap", "Continuous Trap", "Counter Trap"]),
];

struct SeedCard {
  name:          &'static str,
  code:          &'static str,
  description:   &'static str,
  type_name:     &'static str,
  sub_type_name: &'static str,
  /// `(attack, defense, stars)`; spells and traps carry no statistics.
  stats:         Option<(i64, i64, i64)>,
}

const CARDS: &[SeedCard] = &[
  SeedCard {
    name:          "Dark Magician",
    code:          "YGO0001",
    description:   "The ultimate wizard in terms of attack and defense.",
    type_name:     "Monster",
    sub_type_name: "Normal Monster",
    stats:         Some((2500, 2100, 7)),
  },
  SeedCard {
    name:          "Blue-Eyes White Dragon",
    code:          "YGO0002",
    description:   "This legendary dragon is a powerful engine of destruction.",
    type_name:     "Monster",
    sub_type_name: "Normal Monster",
    stats:         Some((3000, 2500, 8)),
  },
  SeedCard {
    name:          "Summoned Skull",
    code:          "YGO0003",
    description:   "A fiend with dark powers for confusing the enemy.",
    type_name:     "Monster",
    sub_type_name: "Effect Monster",
    stats:         Some((2500, 1200, 6)),
  },
  SeedCard {
    name:          "Dark Magician Girl",
    code:          "YGO0004",
    description:   "A magician who gains power from fallen mentors.",
    type_name:     "Monster",
    sub_type_name: "Effect Monster",
    stats:         Some((2000, 1700, 6)),
  },
  SeedCard {
    name:          "Monster Reborn",
    code:          "YGO0005",
    description:   "Target one monster in either graveyard and summon it.",
    type_name:     "Spell",
    sub_type_name: "Normal Spell",
    stats:         None,
  },
  SeedCard {
    name:          "Pot of Greed",
    code:          "YGO0006",
    description:   "Draw two cards from your deck.",
    type_name:     "Spell",
    sub_type_name: "Normal Spell",
    stats:         None,
  },
  SeedCard {
    name:          "Swords of Revealing Light",
    code:          "YGO0007",
    description:   "Opposing monsters cannot attack for three turns.",
    type_name:     "Spell",
    sub_type_name: "Continuous Spell",
    stats:         None,
  },
  SeedCard {
    name:          "Mirror Force",
    code:          "YGO0008",
    description:   "Destroys every attacking monster on the field.",
    type_name:     "Trap",
    sub_type_name: "Normal Trap",
    stats:         None,
  },
  SeedCard {
    name:          "Trap Hole",
    code:          "YGO0009",
    description:   "Destroys a newly summoned monster with enough attack.",
    type_name:     "Trap",
    sub_type_name: "Normal Trap",
    stats:         None,
  },
];

/// Wipe the store and insert the fixture catalog.
pub async fn run(store: &SqliteStore) -> anyhow::Result<()> {
  tracing::info!("clearing existing catalog");
  store.clear_all().await?;

  let mut type_ids = HashMap::new();
  for name in TYPES {
    let ty = store.create_type((*name).to_string()).await?;
    type_ids.insert(*name, ty.id);
  }

  let mut sub_type_ids = HashMap::new();
  for (type_name, names) in SUB_TYPES {
    for name in *names {
      let sub_type = store
        .create_sub_type((*name).to_string(), type_ids[type_name])
        .await?;
      sub_type_ids.insert(*name, sub_type.id);
    }
  }

  for card in CARDS {
    store
      .create_card(NewCard {
        name:        card.name.to_string(),
        code:        card.code.to_string(),
        description: card.description.to_string(),
        image_url:   None,
        type_id:     type_ids[card.type_name],
        sub_type_id: sub_type_ids[card.sub_type_name],
        statistics:  card.stats.map(|(attack, defense, stars)| {
          NewCardStatistics { attack, defense, stars: Some(stars) }
        }),
      })
      .await?;
  }

  tracing::info!(cards = CARDS.len(), "seed complete");
  Ok(())
}
