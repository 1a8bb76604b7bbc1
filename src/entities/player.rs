//! Player owner
//!
//! A plain `ItemOwner` for hosts without their own actor model, and for tests.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::owner::{ItemOwner, OwnerId};
use crate::items::{EquipmentInstance, InstanceId};
use crate::progression::Experience;

/// The player character as far as items are concerned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: OwnerId,
    pub name: String,
    pub intelligence: i32,
    /// Carrying a lens, scroll or similar
    pub identification_aid: bool,
    pub experience: Experience,
    equipped: BTreeSet<InstanceId>,
}

impl Player {
    pub fn new(id: OwnerId, name: impl Into<String>, intelligence: i32) -> Self {
        Self {
            id,
            name: name.into(),
            intelligence,
            identification_aid: false,
            experience: Experience::new(),
            equipped: BTreeSet::new(),
        }
    }

    pub fn with_identification_aid(mut self) -> Self {
        self.identification_aid = true;
        self
    }

    /// IDs of everything currently equipped
    pub fn equipped(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.equipped.iter().copied()
    }
}

impl ItemOwner for Player {
    fn id(&self) -> OwnerId {
        self.id
    }

    fn intelligence(&self) -> i32 {
        self.intelligence
    }

    fn has_identification_aid(&self) -> bool {
        self.identification_aid
    }

    fn is_equipped(&self, item: InstanceId) -> bool {
        self.equipped.contains(&item)
    }

    fn equip(&mut self, item: &EquipmentInstance) -> bool {
        if !item.category().takes_modifiers() {
            log::debug!("{} cannot equip {}", self.name, item.display_name());
            return false;
        }
        self.equipped.insert(item.id())
    }

    fn unequip(&mut self, item: &EquipmentInstance) -> bool {
        if !item.can_unequip() {
            log::info!("{} cannot remove the cursed {}", self.name, item.display_name());
            return false;
        }
        self.equipped.remove(&item.id())
    }

    fn gain_experience(&mut self, amount: u32) {
        let levels = self.experience.add_xp(amount);
        if levels > 0 {
            log::info!("{} reached level {}", self.name, self.experience.level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{Curse, CurseKind, ItemCategory, ItemDefinition, Rarity};

    fn item(id: InstanceId, category: ItemCategory) -> EquipmentInstance {
        let def = ItemDefinition::new("thing", "Thing", category, Rarity::Common);
        EquipmentInstance::new(id, &def, 1)
    }

    #[test]
    fn test_equip_unequip() {
        let mut player = Player::new(1, "Hero", 12);
        let sword = item(1, ItemCategory::Weapon);

        assert!(player.equip(&sword));
        assert!(!player.equip(&sword));
        assert!(player.is_equipped(1));
        assert!(player.unequip(&sword));
        assert!(!player.unequip(&sword));
    }

    #[test]
    fn test_consumables_not_equippable() {
        let mut player = Player::new(1, "Hero", 12);
        assert!(!player.equip(&item(2, ItemCategory::Consumable)));
    }

    #[test]
    fn test_cursed_lock_blocks_unequip() {
        let mut player = Player::new(1, "Hero", 12);
        let mut ring = item(3, ItemCategory::Artifact).with_curse(Curse::new(CurseKind::Misfortune, 1, true));
        player.equip(&ring);
        ring.identify(&player);

        assert!(!player.unequip(&ring));
        assert!(player.is_equipped(3));

        ring.remove_all_curses();
        assert!(player.unequip(&ring));
    }

    #[test]
    fn test_gain_experience() {
        let mut player = Player::new(1, "Hero", 12);
        player.gain_experience(120);
        assert_eq!(player.experience.level, 2);
    }
}
