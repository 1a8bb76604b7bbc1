//! Loot generation system
//!
//! Floor-filtered weighted table draws that turn registry definitions into
//! enchanted (and sometimes cursed) equipment instances.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::generator::{weighted_index, ModifierGenerator, ModifierTable};
use super::instance::{EquipmentInstance, InstanceId, StatApplication};
use super::item::{tier_for, ItemDefinition, Rarity};
use crate::data::config::{EngineConfig, LootConfig};
use crate::data::registry::DefinitionRegistry;

/// One possible drop in a loot table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item_id: String,
    pub rarity: Rarity,
    pub weight: f64,
    #[serde(default)]
    pub min_floor: Option<u32>,
    #[serde(default)]
    pub max_floor: Option<u32>,
    /// Inclusive (min, max) stack count, 1 when absent
    #[serde(default)]
    pub quantity: Option<(u32, u32)>,
}

impl LootEntry {
    pub fn new(item_id: impl Into<String>, rarity: Rarity, weight: f64) -> Self {
        Self {
            item_id: item_id.into(),
            rarity,
            weight,
            min_floor: None,
            max_floor: None,
            quantity: None,
        }
    }

    /// Builder: restrict to a floor range (None = unbounded on that side)
    pub fn floors(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_floor = min;
        self.max_floor = max;
        self
    }

    /// Builder: drop between `min` and `max` at once
    pub fn quantity(mut self, min: u32, max: u32) -> Self {
        self.quantity = Some((min.min(max), max.max(min)));
        self
    }

    /// Whether this entry can drop on a floor
    pub fn allows_floor(&self, floor: u32) -> bool {
        self.min_floor.map_or(true, |min| floor >= min) && self.max_floor.map_or(true, |max| floor <= max)
    }

    fn roll_count(&self, rng: &mut impl Rng) -> u32 {
        match self.quantity {
            Some((min, max)) => rng.gen_range(min.min(max)..=max.max(min)),
            None => 1,
        }
    }
}

fn default_quantity_multiplier() -> f64 {
    1.0
}

/// A weighted, floor-filtered drop table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    pub id: String,
    pub entries: Vec<LootEntry>,
    /// Added to every entry's depth multiplier
    #[serde(default)]
    pub rarity_bias: f64,
    /// Scales the number of draws
    #[serde(default = "default_quantity_multiplier")]
    pub quantity_multiplier: f64,
}

impl LootTable {
    pub fn new(id: impl Into<String>, entries: Vec<LootEntry>) -> Self {
        Self {
            id: id.into(),
            entries,
            rarity_bias: 0.0,
            quantity_multiplier: 1.0,
        }
    }

    pub fn with_rarity_bias(mut self, bias: f64) -> Self {
        self.rarity_bias = bias;
        self
    }

    pub fn with_quantity_multiplier(mut self, multiplier: f64) -> Self {
        self.quantity_multiplier = multiplier;
        self
    }
}

/// Enchantment attempts per item; rarer items get more chances
pub fn enchantment_rolls(rarity: Rarity) -> usize {
    1 + rarity.rank() as usize / 2
}

/// Turns loot tables into equipment instances
#[derive(Debug)]
pub struct LootGenerator<'a> {
    registry: &'a DefinitionRegistry,
    modifiers: ModifierGenerator,
    config: LootConfig,
    stat_application: StatApplication,
    next_id: AtomicU64,
}

impl<'a> LootGenerator<'a> {
    /// Build a generator over a populated registry, using its default modifier table
    pub fn new(registry: &'a DefinitionRegistry, config: &EngineConfig) -> Self {
        let table = registry
            .modifier_table(ModifierTable::DEFAULT_ID)
            .cloned()
            .unwrap_or_default();
        let mut config = config.clone();
        config.sanitize();
        Self {
            registry,
            modifiers: ModifierGenerator::new(table, &config.modifiers),
            config: config.loot,
            stat_application: config.stat_application,
            next_id: AtomicU64::new(1),
        }
    }

    /// Continue instance IDs after previously issued ones (e.g. after a load)
    pub fn with_starting_id(self, next_id: InstanceId) -> Self {
        self.next_id.store(next_id.max(1), Ordering::Relaxed);
        self
    }

    /// Swap in a different modifier generator
    pub fn with_modifiers(mut self, modifiers: ModifierGenerator) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn modifiers(&self) -> &ModifierGenerator {
        &self.modifiers
    }

    /// ID the next generated instance will get
    pub fn peek_next_id(&self) -> InstanceId {
        self.next_id.load(Ordering::Relaxed)
    }

    fn next_instance_id(&self) -> InstanceId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Effective weight of an entry on a floor
    pub fn adjusted_weight(&self, entry: &LootEntry, table: &LootTable, floor: u32) -> f64 {
        let rarity_factor = self.config.rarity_weight(entry.rarity) / 100.0;
        let depth_bonus = (floor as f64 * self.config.rarity_bonus_per_floor).min(self.config.max_floor_bonus);
        (entry.weight * rarity_factor * (1.0 + depth_bonus + table.rarity_bias)).max(0.0)
    }

    /// Pick one entry that can drop on this floor, or None if nothing can
    pub fn select_entry<'t>(&self, table: &'t LootTable, floor: u32, rng: &mut impl Rng) -> Option<&'t LootEntry> {
        let candidates: Vec<&LootEntry> = table.entries.iter().filter(|e| e.allows_floor(floor)).collect();
        if candidates.is_empty() {
            return None;
        }

        let weights: Vec<f64> = candidates
            .iter()
            .map(|e| self.adjusted_weight(e, table, floor))
            .collect();
        weighted_index(&weights, rng).map(|i| candidates[i])
    }

    /// Roll `quantity` independent draws from a table.
    /// Unknown tables yield nothing; the miss is logged by the registry.
    pub fn generate(&self, table_id: &str, floor: u32, quantity: u32, rng: &mut impl Rng) -> Vec<EquipmentInstance> {
        let Some(table) = self.registry.loot_table(table_id) else {
            return Vec::new();
        };

        let draws = if quantity == 0 {
            0
        } else {
            ((quantity as f64 * table.quantity_multiplier).round() as u32).max(1)
        };

        let mut loot = Vec::new();
        for _ in 0..draws {
            let Some(entry) = self.select_entry(table, floor, rng) else {
                log::debug!("Loot table '{}' has nothing for floor {}", table_id, floor);
                continue;
            };

            let count = entry.roll_count(rng);
            if count == 0 {
                continue;
            }

            let Some(definition) = self.registry.item(&entry.item_id) else {
                continue;
            };

            let tier = tier_for(floor, entry.rarity);
            if definition.stacking.stackable {
                let max_stack = definition.stacking.max_stack.max(1);
                let mut remaining = count;
                while remaining > 0 {
                    let stack = remaining.min(max_stack);
                    loot.push(self.roll_instance(definition, entry.rarity, tier, rng).with_count(stack));
                    remaining -= stack;
                }
            } else {
                for _ in 0..count {
                    loot.push(self.roll_instance(definition, entry.rarity, tier, rng));
                }
            }
        }

        log::debug!(
            "Rolled {} item(s) from '{}' on floor {}",
            loot.len(),
            table_id,
            floor
        );
        loot
    }

    /// Create one instance and dress it with modifiers
    fn roll_instance(&self, definition: &ItemDefinition, rarity: Rarity, tier: u8, rng: &mut impl Rng) -> EquipmentInstance {
        let mut item = EquipmentInstance::new(self.next_instance_id(), definition, tier)
            .with_rarity(rarity)
            .with_stat_application(self.stat_application);

        if !definition.category.takes_modifiers() {
            return item;
        }

        let mut kinds = Vec::new();
        for _ in 0..enchantment_rolls(rarity) {
            if let Some(enchantment) = self.modifiers.generate_enchantment_for(definition, tier, &kinds, rng) {
                kinds.push(enchantment.kind);
                item = item.with_enchantment(enchantment);
            }
        }

        if let Some(curse) = self.modifiers.generate_curse_for(definition, tier, &[], &kinds, rng) {
            item = item.with_curse(curse);
        }

        item
    }
}
