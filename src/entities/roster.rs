//! Owners and the items they carry
//!
//! Keeps owners and items in separate maps so one of each can be borrowed
//! mutably at the same time, which is what identification needs.

use std::collections::BTreeMap;

use super::owner::{ItemOwner, OwnerId};
use super::player::Player;
use crate::items::{EquipmentInstance, InstanceId};
use crate::progression::IdentificationHost;

#[derive(Debug, Clone, Default)]
pub struct Roster {
    owners: BTreeMap<OwnerId, Player>,
    items: BTreeMap<InstanceId, EquipmentInstance>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_owner(&mut self, player: Player) {
        self.owners.insert(player.id, player);
    }

    pub fn add_item(&mut self, item: EquipmentInstance) {
        self.items.insert(item.id(), item);
    }

    /// Add a batch of freshly generated loot
    pub fn add_items(&mut self, items: impl IntoIterator<Item = EquipmentInstance>) {
        for item in items {
            self.add_item(item);
        }
    }

    pub fn remove_item(&mut self, id: InstanceId) -> Option<EquipmentInstance> {
        self.items.remove(&id)
    }

    pub fn owner(&self, id: OwnerId) -> Option<&Player> {
        self.owners.get(&id)
    }

    pub fn item(&self, id: InstanceId) -> Option<&EquipmentInstance> {
        self.items.get(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &EquipmentInstance> {
        self.items.values()
    }

    /// Borrow an owner and an item together
    pub fn split(&mut self, owner: OwnerId, item: InstanceId) -> Option<(&mut Player, &mut EquipmentInstance)> {
        let owner = self.owners.get_mut(&owner)?;
        let item = self.items.get_mut(&item)?;
        Some((owner, item))
    }

    pub fn equip(&mut self, owner: OwnerId, item: InstanceId) -> bool {
        match self.split(owner, item) {
            Some((owner, item)) => owner.equip(item),
            None => false,
        }
    }

    pub fn unequip(&mut self, owner: OwnerId, item: InstanceId) -> bool {
        match self.split(owner, item) {
            Some((owner, item)) => owner.unequip(item),
            None => false,
        }
    }
}

impl IdentificationHost for Roster {
    fn resolve(&mut self, owner: OwnerId, item: InstanceId) -> Option<(&mut dyn ItemOwner, &mut EquipmentInstance)> {
        let (owner, item) = self.split(owner, item)?;
        Some((owner as &mut dyn ItemOwner, item))
    }
}
