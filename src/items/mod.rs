//! Item system

pub mod item;
pub mod modifier;
pub mod generator;
pub mod instance;
pub mod loot;

pub use item::{stats, tier_for, ItemCategory, ItemDefinition, Rarity, StackRule, StatMap};
pub use modifier::{
    apply_curse_effect, apply_enchantment_effect, Curse, CurseKind, Enchantment, EnchantmentKind, KindSlot,
    Modifier, NameTemplate,
};
pub use generator::{curse_chance, enchantment_chance, ModifierGenerator, ModifierTable};
pub use instance::{tier_name, EquipmentInstance, InstanceId, StatApplication};
pub use loot::{enchantment_rolls, LootEntry, LootGenerator, LootTable};
