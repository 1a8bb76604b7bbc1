//! Equipment instances
//!
//! A generated item: stats, attached modifiers, and the identification and
//! curse-lock state that gates what the player gets to see.

use serde::{Deserialize, Serialize};

use super::item::{ItemCategory, ItemDefinition, Rarity, StatMap};
use super::modifier::{apply_curse_effect, apply_enchantment_effect, Curse, CurseKind, Enchantment, Modifier};
use crate::entities::ItemOwner;

/// Unique instance ID for tracking
pub type InstanceId = u64;

/// Which stat keys a modifier touches when resolving final stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatApplication {
    /// Each kind changes only its own stat
    #[default]
    Declared,
    /// Legacy behavior: every modifier transforms every stat on the item
    AllStats,
}

/// Generic quality word for an unidentified item of a tier
pub fn tier_name(tier: u8) -> &'static str {
    match tier {
        0 | 1 => "Worn",
        2 => "Sturdy",
        3 => "Fine",
        4 => "Superior",
        _ => "Magnificent",
    }
}

/// A generated item carried by an owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentInstance {
    id: InstanceId,
    definition_id: String,
    name: String,
    category: ItemCategory,
    rarity: Rarity,
    /// 1-5
    tier: u8,
    base_stats: StatMap,
    bonus_stats: StatMap,
    enchantments: Vec<Enchantment>,
    curses: Vec<Curse>,
    count: u32,
    stackable: bool,
    identified: bool,
    cursed_locked: bool,
    #[serde(default)]
    stat_application: StatApplication,
}

impl EquipmentInstance {
    /// Create an unidentified, unmodified instance of a definition
    pub fn new(id: InstanceId, definition: &ItemDefinition, tier: u8) -> Self {
        Self {
            id,
            definition_id: definition.id.clone(),
            name: definition.name.clone(),
            category: definition.category,
            rarity: definition.rarity,
            tier: tier.clamp(1, 5),
            base_stats: definition.base_stats.clone(),
            bonus_stats: StatMap::new(),
            enchantments: Vec::new(),
            curses: Vec::new(),
            count: 1,
            stackable: definition.stacking.stackable,
            identified: false,
            cursed_locked: false,
            stat_application: StatApplication::default(),
        }
    }

    /// Override the definition's rarity (loot entries carry their own)
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_enchantment(mut self, enchantment: Enchantment) -> Self {
        self.enchantments.push(enchantment);
        self
    }

    pub fn with_curse(mut self, curse: Curse) -> Self {
        self.curses.push(curse);
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count.max(1);
        self
    }

    pub fn with_stat_application(mut self, mode: StatApplication) -> Self {
        self.stat_application = mode;
        self
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn definition_id(&self) -> &str {
        &self.definition_id
    }

    /// Base name from the definition, without decoration
    pub fn base_name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> ItemCategory {
        self.category
    }

    pub fn rarity(&self) -> Rarity {
        self.rarity
    }

    pub fn tier(&self) -> u8 {
        self.tier
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_stackable(&self) -> bool {
        self.stackable
    }

    pub fn base_stats(&self) -> &StatMap {
        &self.base_stats
    }

    pub fn bonus_stats(&self) -> &StatMap {
        &self.bonus_stats
    }

    pub fn enchantments(&self) -> &[Enchantment] {
        &self.enchantments
    }

    pub fn curses(&self) -> &[Curse] {
        &self.curses
    }

    pub fn is_identified(&self) -> bool {
        self.identified
    }

    pub fn is_cursed(&self) -> bool {
        !self.curses.is_empty()
    }

    pub fn is_cursed_locked(&self) -> bool {
        self.cursed_locked
    }

    pub fn stat_application(&self) -> StatApplication {
        self.stat_application
    }

    /// Number of attached enchantments and curses
    pub fn modifier_count(&self) -> usize {
        self.enchantments.len() + self.curses.len()
    }

    pub fn bonus_stats_mut(&mut self) -> &mut StatMap {
        &mut self.bonus_stats
    }

    /// Add to the bonus overlay (e.g. from upgrades)
    pub fn add_bonus(&mut self, stat: &str, amount: f64) {
        *self.bonus_stats.entry(stat.to_string()).or_insert(0.0) += amount;
    }

    /// Resolve final stats. Modifiers are active from the moment they are
    /// attached; identification has no effect here.
    pub fn final_stats(&self) -> StatMap {
        let mut stats = self.base_stats.clone();
        for (stat, bonus) in &self.bonus_stats {
            *stats.entry(stat.clone()).or_insert(0.0) += bonus;
        }

        match self.stat_application {
            StatApplication::Declared => {
                for enchantment in &self.enchantments {
                    let value = stats.entry(enchantment.kind.stat().to_string()).or_insert(0.0);
                    *value = apply_enchantment_effect(enchantment, *value);
                }
                // Curses only degrade stats the item actually has
                for curse in &self.curses {
                    if let Some(value) = stats.get_mut(curse.kind.stat()) {
                        *value = apply_curse_effect(curse, *value);
                    }
                }
            }
            StatApplication::AllStats => {
                for enchantment in &self.enchantments {
                    for value in stats.values_mut() {
                        *value = apply_enchantment_effect(enchantment, *value);
                    }
                }
                for curse in &self.curses {
                    for value in stats.values_mut() {
                        *value = apply_curse_effect(curse, *value);
                    }
                }
            }
        }

        stats
    }

    /// Name as the player currently sees it
    pub fn display_name(&self) -> String {
        if !self.identified {
            return format!("{} {}", tier_name(self.tier), self.category.generic_noun());
        }

        let mut name = self.name.clone();
        if let Some(enchantment) = self.enchantments.first() {
            name = enchantment.kind.name_template().apply(&name);
        }
        if let Some(curse) = self.curses.first() {
            name = format!("{} {}", curse.kind.prefix(), name);
        }
        name
    }

    /// Modifiers the player can currently see: everything once identified,
    /// otherwise only curses that are not hidden
    pub fn visible_modifiers(&self) -> Vec<Modifier> {
        if self.identified {
            self.enchantments
                .iter()
                .map(|e| Modifier::Enchantment(*e))
                .chain(self.curses.iter().map(|c| Modifier::Curse(*c)))
                .collect()
        } else {
            self.curses
                .iter()
                .filter(|c| !c.hidden)
                .map(|c| Modifier::Curse(*c))
                .collect()
        }
    }

    /// Reveal the item. Returns false if it was already identified.
    /// A cursed item revealed while equipped binds to its owner.
    pub fn identify<O: ItemOwner + ?Sized>(&mut self, owner: &O) -> bool {
        if self.identified {
            log::warn!("Item {} is already identified", self.id);
            return false;
        }
        self.identified = true;

        if self.is_cursed() && owner.is_equipped(self.id) {
            self.cursed_locked = true;
            log::info!("{} binds itself to owner {}", self.display_name(), owner.id());
        } else {
            log::debug!("Identified item {} as {}", self.id, self.display_name());
        }
        true
    }

    /// Remove one curse of the given kind. Returns false if none was attached.
    pub fn remove_curse(&mut self, kind: CurseKind) -> bool {
        let Some(index) = self.curses.iter().position(|c| c.kind == kind) else {
            log::warn!("Item {} carries no {} curse", self.id, kind.name());
            return false;
        };
        self.curses.remove(index);
        if self.curses.is_empty() {
            self.cursed_locked = false;
        }
        true
    }

    /// Strip every curse, releasing any curse-lock. Returns how many were removed.
    pub fn remove_all_curses(&mut self) -> usize {
        let removed = self.curses.len();
        self.curses.clear();
        self.cursed_locked = false;
        removed
    }

    pub fn can_unequip(&self) -> bool {
        !self.cursed_locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Player;
    use crate::items::item::stats;
    use crate::items::modifier::EnchantmentKind;

    fn sword() -> ItemDefinition {
        ItemDefinition::new("iron_sword", "Iron Sword", ItemCategory::Weapon, Rarity::Common)
            .with_stat(stats::DAMAGE, 8.0)
            .with_stat(stats::ACCURACY, 70.0)
    }

    fn cursed_sword(id: InstanceId, hidden: bool) -> EquipmentInstance {
        EquipmentInstance::new(id, &sword(), 2)
            .with_enchantment(Enchantment::new(EnchantmentKind::Sharpness, 2))
            .with_curse(Curse::new(CurseKind::Dullness, 1, hidden))
    }

    #[test]
    fn test_final_stats_declared() {
        let item = cursed_sword(1, true);
        let stats = item.final_stats();
        // 8 + 2*2 - 1*2
        assert_eq!(stats[stats::DAMAGE], 10.0);
        // Untouched by a damage-only enchantment
        assert_eq!(stats[stats::ACCURACY], 70.0);
    }

    #[test]
    fn test_final_stats_all_stats_mode() {
        let item = cursed_sword(1, true).with_stat_application(StatApplication::AllStats);
        let stats = item.final_stats();
        assert_eq!(stats[stats::DAMAGE], 10.0);
        assert_eq!(stats[stats::ACCURACY], 72.0);
    }

    #[test]
    fn test_enchantment_adds_missing_stat_curse_does_not() {
        let item = EquipmentInstance::new(1, &sword(), 3)
            .with_enchantment(Enchantment::new(EnchantmentKind::Flaming, 2))
            .with_curse(Curse::new(CurseKind::Fragility, 3, false));
        let stats = item.final_stats();
        assert_eq!(stats[stats::FIRE_DAMAGE], 6.0);
        assert!(!stats.contains_key(stats::DEFENSE));
    }

    #[test]
    fn test_bonus_overlay() {
        let mut item = EquipmentInstance::new(1, &sword(), 1);
        item.add_bonus(stats::DAMAGE, 3.0);
        item.add_bonus(stats::LUCK, 1.0);
        let stats = item.final_stats();
        assert_eq!(stats[stats::DAMAGE], 11.0);
        assert_eq!(stats[stats::LUCK], 1.0);
        assert_eq!(item.base_stats()[stats::DAMAGE], 8.0);
    }

    #[test]
    fn test_identification_changes_name_not_stats() {
        let owner = Player::new(1, "Tester", 10);
        let mut item = cursed_sword(7, true);

        let stats_before = item.final_stats();
        assert_eq!(stats_before, item.final_stats());
        assert_eq!(item.display_name(), "Sturdy Weapon");

        assert!(item.identify(&owner));
        assert_eq!(item.final_stats(), stats_before);
        assert_eq!(item.display_name(), "Dull Sharp Iron Sword");
    }

    #[test]
    fn test_hidden_curse_still_applies() {
        let item = EquipmentInstance::new(3, &sword(), 1)
            .with_curse(Curse::new(CurseKind::Dullness, 3, true));
        assert!(!item.is_identified());
        assert_eq!(item.final_stats()[stats::DAMAGE], 2.0);
        assert_eq!(item.display_name(), "Worn Weapon");
        assert!(item.visible_modifiers().is_empty());
    }

    #[test]
    fn test_visible_modifiers() {
        let owner = Player::new(1, "Tester", 10);
        let mut item = cursed_sword(4, false);
        let visible = item.visible_modifiers();
        assert_eq!(visible.len(), 1);
        assert!(matches!(visible[0], Modifier::Curse(_)));

        item.identify(&owner);
        assert_eq!(item.visible_modifiers().len(), 2);
    }

    #[test]
    fn test_reidentify_is_noop() {
        let owner = Player::new(1, "Tester", 10);
        let mut item = cursed_sword(5, true);
        assert!(item.identify(&owner));
        assert!(!item.identify(&owner));
    }

    #[test]
    fn test_identify_unequipped_cursed_does_not_lock() {
        let owner = Player::new(1, "Tester", 10);
        let mut item = cursed_sword(6, true);
        item.identify(&owner);
        assert!(!item.is_cursed_locked());
        assert!(item.can_unequip());
    }

    #[test]
    fn test_curse_lock_lifecycle() {
        let mut owner = Player::new(1, "Tester", 10);
        let mut item = cursed_sword(8, true)
            .with_curse(Curse::new(CurseKind::Clumsiness, 1, false));
        assert!(owner.equip(&item));

        item.identify(&owner);
        assert!(item.is_cursed_locked());
        assert!(!item.can_unequip());

        // Removing one of two curses keeps the lock
        assert!(item.remove_curse(CurseKind::Dullness));
        assert!(!item.can_unequip());

        assert_eq!(item.remove_all_curses(), 1);
        assert!(item.can_unequip());
        assert!(!item.is_cursed());
    }

    #[test]
    fn test_remove_last_curse_releases_lock() {
        let mut owner = Player::new(1, "Tester", 10);
        let mut item = cursed_sword(9, true);
        owner.equip(&item);
        item.identify(&owner);
        assert!(item.remove_curse(CurseKind::Dullness));
        assert!(item.can_unequip());
    }

    #[test]
    fn test_remove_missing_curse() {
        let mut item = cursed_sword(10, true);
        assert!(!item.remove_curse(CurseKind::Misfortune));
        assert_eq!(item.curses().len(), 1);
    }

    #[test]
    fn test_suffix_name() {
        let owner = Player::new(1, "Tester", 10);
        let mail = ItemDefinition::new("mail", "Chain Mail", ItemCategory::Armor, Rarity::Rare)
            .with_stat(stats::DEFENSE, 6.0);
        let mut item = EquipmentInstance::new(11, &mail, 4)
            .with_enchantment(Enchantment::new(EnchantmentKind::Protection, 3));
        assert_eq!(item.display_name(), "Superior Armor");
        item.identify(&owner);
        assert_eq!(item.display_name(), "Chain Mail of Protection");
    }

    #[test]
    fn test_tier_names() {
        assert_eq!(tier_name(1), "Worn");
        assert_eq!(tier_name(3), "Fine");
        assert_eq!(tier_name(5), "Magnificent");
    }
}
