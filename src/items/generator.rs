//! Modifier generation
//!
//! Rolls enchantments and curses for a tier, drawing kinds from a
//! weighted modifier table.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::item::ItemDefinition;
use super::modifier::{Curse, CurseKind, Enchantment, EnchantmentKind};
use crate::data::config::ModifierConfig;

/// Per-kind rarity weights for modifier rolls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierTable {
    pub id: String,
    #[serde(default)]
    pub enchantments: BTreeMap<EnchantmentKind, u32>,
    #[serde(default)]
    pub curses: BTreeMap<CurseKind, u32>,
}

impl ModifierTable {
    /// Registry key of the built-in table
    pub const DEFAULT_ID: &'static str = "default";

    pub fn enchantment_weight(&self, kind: EnchantmentKind) -> u32 {
        self.enchantments.get(&kind).copied().unwrap_or(0)
    }

    pub fn curse_weight(&self, kind: CurseKind) -> u32 {
        self.curses.get(&kind).copied().unwrap_or(0)
    }
}

impl Default for ModifierTable {
    fn default() -> Self {
        Self {
            id: Self::DEFAULT_ID.to_string(),
            enchantments: EnchantmentKind::all()
                .iter()
                .map(|k| (*k, k.default_weight()))
                .collect(),
            curses: CurseKind::all()
                .iter()
                .map(|k| (*k, k.default_weight()))
                .collect(),
        }
    }
}

/// Pick an index by weight, drawing uniformly over the cumulative sum.
/// Non-finite and non-positive weights never win. Returns None when
/// nothing is left to pick.
pub(crate) fn weighted_index(weights: &[f64], rng: &mut impl Rng) -> Option<usize> {
    let usable = |w: f64| w.is_finite() && w > 0.0;

    // Scale by the largest weight so the sum stays finite
    let max = weights.iter().copied().filter(|w| usable(*w)).fold(0.0, f64::max);
    if max <= 0.0 {
        return None;
    }
    let total: f64 = weights.iter().copied().filter(|w| usable(*w)).map(|w| w / max).sum();

    let mut roll = rng.gen_range(0.0..total);
    let mut last_positive = None;
    for (i, w) in weights.iter().copied().enumerate() {
        if !usable(w) {
            continue;
        }
        let w = w / max;
        if roll < w {
            return Some(i);
        }
        roll -= w;
        last_positive = Some(i);
    }
    // Float drift can leave a sliver past the last bucket
    last_positive
}

/// Chance that an item of this tier rolls an enchantment
pub fn enchantment_chance(tier: u8) -> f64 {
    (tier as f64 * 0.15).min(0.8)
}

/// Chance that an item of this tier rolls a curse.
/// Not monotonic: tier 4+ pays an extra 10% as a cost for its power.
pub fn curse_chance(tier: u8) -> f64 {
    let base = (0.4 - tier as f64 * 0.08).max(0.05);
    if tier >= 4 {
        base + 0.1
    } else {
        base
    }
}

/// Rolls modifiers from a table
#[derive(Debug, Clone)]
pub struct ModifierGenerator {
    table: ModifierTable,
    hidden_curse_chance: f64,
}

impl ModifierGenerator {
    pub fn new(table: ModifierTable, config: &ModifierConfig) -> Self {
        Self {
            table,
            hidden_curse_chance: config.effective_hidden_curse_chance(),
        }
    }

    pub fn table(&self) -> &ModifierTable {
        &self.table
    }

    /// Roll an enchantment for a weapon or armor piece of the given tier
    pub fn generate_enchantment(&self, tier: u8, is_weapon: bool, rng: &mut impl Rng) -> Option<Enchantment> {
        self.roll_enchantment(tier, rng, |kind| kind.fits(is_weapon))
    }

    /// Roll an enchantment restricted to what the definition permits,
    /// skipping kinds already on the item
    pub fn generate_enchantment_for(
        &self,
        definition: &ItemDefinition,
        tier: u8,
        existing: &[EnchantmentKind],
        rng: &mut impl Rng,
    ) -> Option<Enchantment> {
        let is_weapon = definition.is_weapon_like();
        self.roll_enchantment(tier, rng, |kind| {
            kind.fits(is_weapon) && definition.allows_enchantment(kind) && !existing.contains(&kind)
        })
    }

    /// Roll a curse for the given tier
    pub fn generate_curse(&self, tier: u8, rng: &mut impl Rng) -> Option<Curse> {
        self.roll_curse(tier, rng, |_| true)
    }

    /// Roll a curse restricted to what the definition can carry.
    /// A curse must degrade a base stat the definition has, and never one
    /// an enchantment on the item raises. Kinds already on the item are skipped.
    pub fn generate_curse_for(
        &self,
        definition: &ItemDefinition,
        tier: u8,
        existing: &[CurseKind],
        enchantments: &[EnchantmentKind],
        rng: &mut impl Rng,
    ) -> Option<Curse> {
        self.roll_curse(tier, rng, |kind| {
            definition.allows_curse(kind)
                && !existing.contains(&kind)
                && definition.base_stats.contains_key(kind.stat())
                && !enchantments.iter().any(|e| e.stat() == kind.stat())
        })
    }

    fn roll_enchantment(
        &self,
        tier: u8,
        rng: &mut impl Rng,
        allowed: impl Fn(EnchantmentKind) -> bool,
    ) -> Option<Enchantment> {
        if !rng.gen_bool(enchantment_chance(tier)) {
            return None;
        }

        let pool: Vec<EnchantmentKind> = EnchantmentKind::all()
            .iter()
            .copied()
            .filter(|k| allowed(*k))
            .collect();
        let weights: Vec<f64> = pool
            .iter()
            .map(|k| self.table.enchantment_weight(*k) as f64)
            .collect();
        let kind = pool[weighted_index(&weights, rng)?];

        let floor = tier.saturating_sub(2).max(1);
        let power = (rng.gen_range(0..3u8) + floor).min(5);
        Some(Enchantment::new(kind, power))
    }

    fn roll_curse(
        &self,
        tier: u8,
        rng: &mut impl Rng,
        allowed: impl Fn(CurseKind) -> bool,
    ) -> Option<Curse> {
        if !rng.gen_bool(curse_chance(tier).min(1.0)) {
            return None;
        }

        let pool: Vec<CurseKind> = CurseKind::all()
            .iter()
            .copied()
            .filter(|k| allowed(*k))
            .collect();
        let weights: Vec<f64> = pool
            .iter()
            .map(|k| self.table.curse_weight(*k) as f64)
            .collect();
        let kind = pool[weighted_index(&weights, rng)?];

        let floor = 4u8.saturating_sub(tier).max(1);
        let severity = rng.gen_range(0..3u8) + floor;
        let hidden = rng.gen_bool(self.hidden_curse_chance);
        Some(Curse::new(kind, severity, hidden))
    }
}

impl Default for ModifierGenerator {
    fn default() -> Self {
        Self::new(ModifierTable::default(), &ModifierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::item::{stats, ItemCategory, Rarity};
    use crate::items::modifier::KindSlot;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_chances() {
        assert!((enchantment_chance(1) - 0.15).abs() < 1e-9);
        assert!((enchantment_chance(5) - 0.75).abs() < 1e-9);
        assert!((curse_chance(1) - 0.32).abs() < 1e-9);
        assert!((curse_chance(3) - 0.16).abs() < 1e-9);
        // Tier 4 and 5 pay the power tax
        assert!((curse_chance(4) - 0.18).abs() < 1e-9);
        assert!((curse_chance(5) - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_absent_rate_converges() {
        let gen = ModifierGenerator::default();
        let mut rng = StdRng::seed_from_u64(7);
        let samples = 20_000;

        for tier in 1..=5u8 {
            let absent = (0..samples)
                .filter(|_| gen.generate_enchantment(tier, true, &mut rng).is_none())
                .count();
            let rate = absent as f64 / samples as f64;
            let expected = 1.0 - enchantment_chance(tier);
            assert!(
                (rate - expected).abs() < 0.02,
                "tier {}: absent rate {} vs expected {}",
                tier,
                rate,
                expected
            );
        }
    }

    #[test]
    fn test_pool_respects_slot() {
        let gen = ModifierGenerator::default();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..2_000 {
            if let Some(e) = gen.generate_enchantment(5, true, &mut rng) {
                assert_ne!(e.kind.slot(), KindSlot::ArmorOnly);
            }
            if let Some(e) = gen.generate_enchantment(5, false, &mut rng) {
                assert_ne!(e.kind.slot(), KindSlot::WeaponOnly);
            }
        }
    }

    #[test]
    fn test_power_and_severity_ranges() {
        let gen = ModifierGenerator::default();
        let mut rng = StdRng::seed_from_u64(3);

        for tier in 1..=5u8 {
            for _ in 0..500 {
                if let Some(e) = gen.generate_enchantment(tier, true, &mut rng) {
                    let low = tier.saturating_sub(2).max(1);
                    assert!(e.power >= low && e.power <= (low + 2).min(5));
                }
                if let Some(c) = gen.generate_curse(tier, &mut rng) {
                    let low = 4u8.saturating_sub(tier).max(1);
                    assert!(c.severity >= low && c.severity <= low + 2);
                }
            }
        }
    }

    #[test]
    fn test_zero_weight_never_rolls() {
        let mut table = ModifierTable::default();
        table.enchantments.insert(EnchantmentKind::Sharpness, 0);
        let gen = ModifierGenerator::new(table, &ModifierConfig::default());
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..2_000 {
            if let Some(e) = gen.generate_enchantment(5, true, &mut rng) {
                assert_ne!(e.kind, EnchantmentKind::Sharpness);
            }
        }
    }

    #[test]
    fn test_definition_restriction_and_exclusion() {
        let gen = ModifierGenerator::default();
        let def = ItemDefinition::new("blade", "Blade", ItemCategory::Weapon, Rarity::Rare)
            .with_stat(stats::DAMAGE, 10.0)
            .with_enchantments(&[EnchantmentKind::Sharpness, EnchantmentKind::Flaming])
            .with_curses(&[CurseKind::Dullness]);
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..2_000 {
            if let Some(e) = gen.generate_enchantment_for(&def, 5, &[EnchantmentKind::Sharpness], &mut rng) {
                assert_eq!(e.kind, EnchantmentKind::Flaming);
            }
            if let Some(c) = gen.generate_curse_for(&def, 1, &[], &[], &mut rng) {
                assert_eq!(c.kind, CurseKind::Dullness);
            }
            // Only permitted curse already present: nothing left to roll
            assert!(gen.generate_curse_for(&def, 1, &[CurseKind::Dullness], &[], &mut rng).is_none());
        }
    }

    #[test]
    fn test_curse_needs_base_stat() {
        let gen = ModifierGenerator::default();
        let shield = ItemDefinition::new("shield", "Shield", ItemCategory::Armor, Rarity::Common)
            .with_stat(stats::DEFENSE, 4.0);
        let mut rng = StdRng::seed_from_u64(13);

        let mut rolled = 0;
        for _ in 0..2_000 {
            if let Some(c) = gen.generate_curse_for(&shield, 1, &[], &[], &mut rng) {
                assert_eq!(c.kind, CurseKind::Fragility);
                rolled += 1;
            }
        }
        assert!(rolled > 0);

        // No stats at all: nothing for a curse to bite on
        let bare = ItemDefinition::new("bare", "Bare", ItemCategory::Weapon, Rarity::Common);
        for _ in 0..500 {
            assert!(gen.generate_curse_for(&bare, 1, &[], &[], &mut rng).is_none());
        }
    }

    #[test]
    fn test_curse_skips_enchanted_stat() {
        let gen = ModifierGenerator::default();
        let sword = ItemDefinition::new("sword", "Sword", ItemCategory::Weapon, Rarity::Common)
            .with_stat(stats::DAMAGE, 8.0)
            .with_stat(stats::ACCURACY, 70.0);
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..2_000 {
            if let Some(c) = gen.generate_curse_for(&sword, 1, &[], &[EnchantmentKind::Sharpness], &mut rng) {
                assert_eq!(c.kind, CurseKind::Clumsiness);
            }
        }
    }

    #[test]
    fn test_seeded_replay() {
        let gen = ModifierGenerator::default();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for tier in 1..=5u8 {
            assert_eq!(
                gen.generate_enchantment(tier, false, &mut a),
                gen.generate_enchantment(tier, false, &mut b)
            );
            assert_eq!(gen.generate_curse(tier, &mut a), gen.generate_curse(tier, &mut b));
        }
    }

    #[test]
    fn test_weighted_index() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(weighted_index(&[], &mut rng), None);
        assert_eq!(weighted_index(&[0.0, 0.0], &mut rng), None);
        for _ in 0..100 {
            assert_eq!(weighted_index(&[0.0, 5.0, 0.0], &mut rng), Some(1));
            assert_eq!(weighted_index(&[f64::NAN, f64::INFINITY, 2.0], &mut rng), Some(2));
        }
    }

    #[test]
    fn test_weighted_index_huge_weights() {
        let mut rng = StdRng::seed_from_u64(8);
        // The raw sum overflows to infinity
        let weights = [1e308, 1e308];
        let mut hits = [0usize; 2];
        for _ in 0..1_000 {
            let i = weighted_index(&weights, &mut rng).unwrap();
            hits[i] += 1;
        }
        assert!(hits[0] > 400 && hits[1] > 400, "{:?}", hits);
    }

    #[test]
    fn test_nan_hidden_chance_does_not_panic() {
        let config = ModifierConfig {
            hidden_curse_chance: f64::NAN,
        };
        let gen = ModifierGenerator::new(ModifierTable::default(), &config);
        let mut rng = StdRng::seed_from_u64(4);
        let rolled = (0..500).filter_map(|_| gen.generate_curse(1, &mut rng)).count();
        assert!(rolled > 0);
    }
}
