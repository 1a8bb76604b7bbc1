//! Item definitions
//!
//! Static item templates, rarities, categories and the sparse stat map
//! shared by every generated instance.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::modifier::{CurseKind, EnchantmentKind};

/// Sparse stat map (stat name -> value). Ordered so that two resolutions
/// of the same item compare and print identically.
pub type StatMap = BTreeMap<String, f64>;

/// Well-known stat keys used by the built-in modifier kinds
pub mod stats {
    pub const DAMAGE: &str = "damage";
    pub const ACCURACY: &str = "accuracy";
    pub const CRIT_CHANCE: &str = "critChance";
    pub const FIRE_DAMAGE: &str = "fireDamage";
    pub const LIFE_STEAL: &str = "lifeSteal";
    pub const DEFENSE: &str = "defense";
    pub const EVASION: &str = "evasion";
    pub const MAX_HEALTH: &str = "maxHealth";
    pub const THORNS: &str = "thorns";
    pub const SPEED: &str = "speed";
    pub const LUCK: &str = "luck";
}

/// Item rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    /// Get rarity name
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
        }
    }

    /// Numeric rank (higher = rarer), feeds tier assignment
    pub fn rank(&self) -> u8 {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
            Rarity::Mythic => 5,
        }
    }

    /// All rarities, common first
    pub fn all() -> &'static [Rarity] {
        &[
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
            Rarity::Mythic,
        ]
    }
}

/// Main item categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Weapon,
    Armor,
    Consumable,
    Artifact,
    Misc,
}

impl ItemCategory {
    /// Generic noun shown for unidentified items
    pub fn generic_noun(&self) -> &'static str {
        match self {
            ItemCategory::Weapon => "Weapon",
            ItemCategory::Armor => "Armor",
            _ => "Item",
        }
    }

    /// Whether instances of this category get enchantments and curses
    pub fn takes_modifiers(&self) -> bool {
        matches!(self, ItemCategory::Weapon | ItemCategory::Armor | ItemCategory::Artifact)
    }
}

/// How many of an item fit in one stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackRule {
    pub stackable: bool,
    pub max_stack: u32,
}

impl StackRule {
    pub const SINGLE: StackRule = StackRule { stackable: false, max_stack: 1 };

    pub fn stack(max_stack: u32) -> Self {
        Self { stackable: true, max_stack: max_stack.max(1) }
    }
}

impl Default for StackRule {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// Immutable item template, registered once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Registry key
    pub id: String,
    /// Base display name
    pub name: String,
    pub category: ItemCategory,
    pub rarity: Rarity,
    /// Sparse base stats
    #[serde(default)]
    pub base_stats: StatMap,
    /// Enchantments this item may roll (empty = any suitable kind)
    #[serde(default)]
    pub enchantments: BTreeSet<EnchantmentKind>,
    /// Curses this item may roll (empty = any kind)
    #[serde(default)]
    pub curses: BTreeSet<CurseKind>,
    #[serde(default)]
    pub stacking: StackRule,
}

impl ItemDefinition {
    /// Create a bare definition with no stats
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: ItemCategory, rarity: Rarity) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            rarity,
            base_stats: StatMap::new(),
            enchantments: BTreeSet::new(),
            curses: BTreeSet::new(),
            stacking: StackRule::SINGLE,
        }
    }

    /// Builder: set one base stat
    pub fn with_stat(mut self, stat: &str, value: f64) -> Self {
        self.base_stats.insert(stat.to_string(), value);
        self
    }

    /// Builder: restrict the enchantment pool
    pub fn with_enchantments(mut self, kinds: &[EnchantmentKind]) -> Self {
        self.enchantments.extend(kinds.iter().copied());
        self
    }

    /// Builder: restrict the curse pool
    pub fn with_curses(mut self, kinds: &[CurseKind]) -> Self {
        self.curses.extend(kinds.iter().copied());
        self
    }

    /// Builder: make the item stackable
    pub fn stackable(mut self, max_stack: u32) -> Self {
        self.stacking = StackRule::stack(max_stack);
        self
    }

    /// Whether modifier pools should be filtered as for a weapon.
    /// Artifacts count as weapons when they carry a damage stat.
    pub fn is_weapon_like(&self) -> bool {
        match self.category {
            ItemCategory::Weapon => true,
            ItemCategory::Artifact => self.base_stats.contains_key(stats::DAMAGE),
            _ => false,
        }
    }

    pub fn allows_enchantment(&self, kind: EnchantmentKind) -> bool {
        self.enchantments.is_empty() || self.enchantments.contains(&kind)
    }

    pub fn allows_curse(&self, kind: CurseKind) -> bool {
        self.curses.is_empty() || self.curses.contains(&kind)
    }
}

/// Tier (1-5) from floor depth and rarity
pub fn tier_for(floor: u32, rarity: Rarity) -> u8 {
    let raw = floor / 5 + rarity.rank() as u32;
    raw.clamp(1, 5) as u8
}
