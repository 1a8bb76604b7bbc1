//! Item owner contract
//!
//! What the engine needs from whoever carries an item. The host game
//! implements this for its actors; the engine never stores owners.

use crate::items::{EquipmentInstance, InstanceId};

/// Unique owner ID
pub type OwnerId = u64;

/// An actor that can carry, equip and identify items
pub trait ItemOwner {
    fn id(&self) -> OwnerId;

    /// Intelligence score; points above 10 speed up identification
    fn intelligence(&self) -> i32;

    /// Whether the owner carries something that speeds up identification
    fn has_identification_aid(&self) -> bool;

    fn is_equipped(&self, item: InstanceId) -> bool;

    /// Equip an item. Returns false if it could not be equipped.
    fn equip(&mut self, item: &EquipmentInstance) -> bool;

    /// Unequip an item. Returns false if it was not equipped or is curse-locked.
    fn unequip(&mut self, item: &EquipmentInstance) -> bool;

    fn gain_experience(&mut self, amount: u32);
}
