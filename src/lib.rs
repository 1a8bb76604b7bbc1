//! Relicforge - procedural equipment for dungeon crawlers
//!
//! Rolls weighted loot by floor, dresses it with enchantments and curses,
//! and lets owners identify what they picked up, sometimes too late.

pub mod data;
pub mod entities;
pub mod items;
pub mod progression;
pub mod save;

// Re-export commonly used types
pub use data::{DefinitionRegistry, EngineConfig};
pub use entities::{ItemOwner, Player, Roster};
pub use items::{EquipmentInstance, ItemDefinition, LootGenerator, ModifierGenerator};
pub use progression::{IdentificationHost, IdentificationScheduler};
pub use save::ItemRecord;
