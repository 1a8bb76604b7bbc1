//! Built-in content
//!
//! A small catalog so the engine works out of the box. Hosts are expected to
//! replace or extend it from RON files (see `loader`).

use super::registry::Content;
use crate::items::{
    stats, CurseKind, EnchantmentKind, ItemCategory, ItemDefinition, LootEntry, LootTable, ModifierTable, Rarity,
};

/// Default item definitions
pub fn default_items() -> Vec<ItemDefinition> {
    vec![
        // Weapons
        ItemDefinition::new("rusty_sword", "Rusty Sword", ItemCategory::Weapon, Rarity::Common)
            .with_stat(stats::DAMAGE, 5.0)
            .with_stat(stats::ACCURACY, 65.0),
        ItemDefinition::new("iron_sword", "Iron Sword", ItemCategory::Weapon, Rarity::Common)
            .with_stat(stats::DAMAGE, 8.0)
            .with_stat(stats::ACCURACY, 70.0)
            .with_stat(stats::CRIT_CHANCE, 5.0),
        ItemDefinition::new("hunting_bow", "Hunting Bow", ItemCategory::Weapon, Rarity::Uncommon)
            .with_stat(stats::DAMAGE, 7.0)
            .with_stat(stats::ACCURACY, 80.0)
            .with_stat(stats::CRIT_CHANCE, 8.0),
        ItemDefinition::new("war_axe", "War Axe", ItemCategory::Weapon, Rarity::Rare)
            .with_stat(stats::DAMAGE, 14.0)
            .with_stat(stats::ACCURACY, 60.0)
            // Axes are too crude for precision work
            .with_enchantments(&[
                EnchantmentKind::Sharpness,
                EnchantmentKind::Flaming,
                EnchantmentKind::Vampiric,
                EnchantmentKind::Swiftness,
            ]),
        ItemDefinition::new("shadow_blade", "Shadow Blade", ItemCategory::Weapon, Rarity::Epic)
            .with_stat(stats::DAMAGE, 18.0)
            .with_stat(stats::ACCURACY, 85.0)
            .with_stat(stats::CRIT_CHANCE, 15.0),
        // Armor
        ItemDefinition::new("leather_armor", "Leather Armor", ItemCategory::Armor, Rarity::Common)
            .with_stat(stats::DEFENSE, 3.0)
            .with_stat(stats::EVASION, 10.0),
        ItemDefinition::new("chain_mail", "Chain Mail", ItemCategory::Armor, Rarity::Uncommon)
            .with_stat(stats::DEFENSE, 6.0)
            .with_stat(stats::EVASION, 4.0),
        ItemDefinition::new("tower_shield", "Tower Shield", ItemCategory::Armor, Rarity::Rare)
            .with_stat(stats::DEFENSE, 10.0)
            .with_stat(stats::SPEED, 8.0)
            .with_curses(&[CurseKind::Fragility, CurseKind::Sluggishness]),
        ItemDefinition::new("plate_armor", "Plate Armor", ItemCategory::Armor, Rarity::Epic)
            .with_stat(stats::DEFENSE, 15.0)
            .with_stat(stats::MAX_HEALTH, 20.0),
        // Artifacts
        ItemDefinition::new("bone_charm", "Bone Charm", ItemCategory::Artifact, Rarity::Uncommon)
            .with_stat(stats::LUCK, 3.0),
        ItemDefinition::new("ember_idol", "Ember Idol", ItemCategory::Artifact, Rarity::Legendary)
            .with_stat(stats::DAMAGE, 6.0)
            .with_stat(stats::FIRE_DAMAGE, 6.0),
        ItemDefinition::new("crown_of_ash", "Crown of Ash", ItemCategory::Artifact, Rarity::Mythic)
            .with_stat(stats::MAX_HEALTH, 40.0)
            .with_stat(stats::LUCK, 10.0),
        // Consumables and misc
        ItemDefinition::new("health_potion", "Health Potion", ItemCategory::Consumable, Rarity::Common)
            .with_stat(stats::MAX_HEALTH, 30.0)
            .stackable(10),
        ItemDefinition::new("throwing_knife", "Throwing Knife", ItemCategory::Consumable, Rarity::Common)
            .with_stat(stats::DAMAGE, 4.0)
            .stackable(20),
        ItemDefinition::new("old_coin", "Old Coin", ItemCategory::Misc, Rarity::Common).stackable(99),
    ]
}

/// Default loot tables
pub fn default_loot_tables() -> Vec<LootTable> {
    vec![
        LootTable::new(
            "dungeon_common",
            vec![
                LootEntry::new("rusty_sword", Rarity::Common, 40.0).floors(None, Some(5)),
                LootEntry::new("iron_sword", Rarity::Common, 30.0),
                LootEntry::new("leather_armor", Rarity::Common, 35.0),
                LootEntry::new("hunting_bow", Rarity::Uncommon, 20.0).floors(Some(2), None),
                LootEntry::new("chain_mail", Rarity::Uncommon, 20.0).floors(Some(3), None),
                LootEntry::new("bone_charm", Rarity::Uncommon, 10.0),
                LootEntry::new("health_potion", Rarity::Common, 40.0).quantity(1, 3),
                LootEntry::new("throwing_knife", Rarity::Common, 15.0).quantity(2, 6),
                LootEntry::new("old_coin", Rarity::Common, 25.0).quantity(1, 12),
            ],
        ),
        LootTable::new(
            "chest",
            vec![
                LootEntry::new("iron_sword", Rarity::Common, 25.0),
                LootEntry::new("chain_mail", Rarity::Uncommon, 25.0),
                LootEntry::new("war_axe", Rarity::Rare, 20.0).floors(Some(4), None),
                LootEntry::new("tower_shield", Rarity::Rare, 20.0).floors(Some(4), None),
                LootEntry::new("shadow_blade", Rarity::Epic, 10.0).floors(Some(8), None),
                LootEntry::new("plate_armor", Rarity::Epic, 10.0).floors(Some(8), None),
                LootEntry::new("health_potion", Rarity::Common, 30.0).quantity(2, 4),
            ],
        )
        .with_rarity_bias(0.1)
        .with_quantity_multiplier(1.5),
        LootTable::new(
            "boss",
            vec![
                LootEntry::new("war_axe", Rarity::Rare, 30.0),
                LootEntry::new("shadow_blade", Rarity::Epic, 25.0),
                LootEntry::new("plate_armor", Rarity::Epic, 25.0),
                LootEntry::new("ember_idol", Rarity::Legendary, 12.0).floors(Some(10), None),
                LootEntry::new("crown_of_ash", Rarity::Mythic, 4.0).floors(Some(20), None),
            ],
        )
        .with_rarity_bias(0.5),
    ]
}

/// Everything above, ready for `DefinitionRegistry::extend`
pub fn default_content() -> Vec<Content> {
    let mut content: Vec<Content> = default_items().into_iter().map(Content::from).collect();
    content.extend(default_loot_tables().into_iter().map(Content::from));
    content.push(ModifierTable::default().into());
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_loot_entries_reference_known_items() {
        let ids: HashSet<String> = default_items().into_iter().map(|d| d.id).collect();
        for table in default_loot_tables() {
            for entry in &table.entries {
                assert!(ids.contains(&entry.item_id), "{} references unknown {}", table.id, entry.item_id);
            }
        }
    }

    #[test]
    fn test_unique_ids() {
        let items = default_items();
        let ids: HashSet<&str> = items.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), items.len());
    }
}
