//! Enchantments and curses
//!
//! The closed set of modifier kinds, their naming templates, and the one
//! table that says how each kind changes a stat.

use serde::{Deserialize, Serialize};

use super::item::stats;

/// Which items a kind may roll on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindSlot {
    WeaponOnly,
    ArmorOnly,
    Any,
}

/// Where a kind's name goes when decorating an item name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameTemplate {
    Prefix(&'static str),
    Suffix(&'static str),
}

impl NameTemplate {
    /// Decorate a base name
    pub fn apply(&self, name: &str) -> String {
        match self {
            NameTemplate::Prefix(p) => format!("{} {}", p, name),
            NameTemplate::Suffix(s) => format!("{} {}", name, s),
        }
    }
}

/// Enchantment kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnchantmentKind {
    // Weapon
    Sharpness,
    Precision,
    Keenness,
    Flaming,
    Vampiric,

    // Armor
    Protection,
    Evasion,
    Vitality,
    Thorns,

    // Either
    Swiftness,
    Fortune,
}

impl EnchantmentKind {
    pub fn all() -> &'static [EnchantmentKind] {
        &[
            EnchantmentKind::Sharpness,
            EnchantmentKind::Precision,
            EnchantmentKind::Keenness,
            EnchantmentKind::Flaming,
            EnchantmentKind::Vampiric,
            EnchantmentKind::Protection,
            EnchantmentKind::Evasion,
            EnchantmentKind::Vitality,
            EnchantmentKind::Thorns,
            EnchantmentKind::Swiftness,
            EnchantmentKind::Fortune,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            EnchantmentKind::Sharpness => "Sharpness",
            EnchantmentKind::Precision => "Precision",
            EnchantmentKind::Keenness => "Keenness",
            EnchantmentKind::Flaming => "Flaming",
            EnchantmentKind::Vampiric => "Vampiric",
            EnchantmentKind::Protection => "Protection",
            EnchantmentKind::Evasion => "Evasion",
            EnchantmentKind::Vitality => "Vitality",
            EnchantmentKind::Thorns => "Thorns",
            EnchantmentKind::Swiftness => "Swiftness",
            EnchantmentKind::Fortune => "Fortune",
        }
    }

    pub fn slot(&self) -> KindSlot {
        match self {
            EnchantmentKind::Sharpness
            | EnchantmentKind::Precision
            | EnchantmentKind::Keenness
            | EnchantmentKind::Flaming
            | EnchantmentKind::Vampiric => KindSlot::WeaponOnly,
            EnchantmentKind::Protection
            | EnchantmentKind::Evasion
            | EnchantmentKind::Vitality
            | EnchantmentKind::Thorns => KindSlot::ArmorOnly,
            EnchantmentKind::Swiftness | EnchantmentKind::Fortune => KindSlot::Any,
        }
    }

    /// Whether this kind can roll on a weapon (or on armor when `is_weapon` is false)
    pub fn fits(&self, is_weapon: bool) -> bool {
        match self.slot() {
            KindSlot::Any => true,
            KindSlot::WeaponOnly => is_weapon,
            KindSlot::ArmorOnly => !is_weapon,
        }
    }

    /// Default rarity weight (higher = more common)
    pub fn default_weight(&self) -> u32 {
        match self {
            EnchantmentKind::Sharpness => 100,
            EnchantmentKind::Precision => 80,
            EnchantmentKind::Keenness => 60,
            EnchantmentKind::Flaming => 40,
            EnchantmentKind::Vampiric => 20,
            EnchantmentKind::Protection => 100,
            EnchantmentKind::Evasion => 70,
            EnchantmentKind::Vitality => 80,
            EnchantmentKind::Thorns => 30,
            EnchantmentKind::Swiftness => 40,
            EnchantmentKind::Fortune => 20,
        }
    }

    /// The stat this kind modifies
    pub fn stat(&self) -> &'static str {
        match self {
            EnchantmentKind::Sharpness => stats::DAMAGE,
            EnchantmentKind::Precision => stats::ACCURACY,
            EnchantmentKind::Keenness => stats::CRIT_CHANCE,
            EnchantmentKind::Flaming => stats::FIRE_DAMAGE,
            EnchantmentKind::Vampiric => stats::LIFE_STEAL,
            EnchantmentKind::Protection => stats::DEFENSE,
            EnchantmentKind::Evasion => stats::EVASION,
            EnchantmentKind::Vitality => stats::MAX_HEALTH,
            EnchantmentKind::Thorns => stats::THORNS,
            EnchantmentKind::Swiftness => stats::SPEED,
            EnchantmentKind::Fortune => stats::LUCK,
        }
    }

    /// Flat bonus granted per point of power
    fn bonus_per_power(&self) -> f64 {
        match self {
            EnchantmentKind::Sharpness => 2.0,
            EnchantmentKind::Precision => 5.0,
            EnchantmentKind::Keenness => 2.0,
            EnchantmentKind::Flaming => 3.0,
            EnchantmentKind::Vampiric => 1.0,
            EnchantmentKind::Protection => 2.0,
            EnchantmentKind::Evasion => 3.0,
            EnchantmentKind::Vitality => 10.0,
            EnchantmentKind::Thorns => 2.0,
            EnchantmentKind::Swiftness => 1.0,
            EnchantmentKind::Fortune => 2.0,
        }
    }

    /// Transform a stat value
    pub fn apply(&self, power: u8, base: f64) -> f64 {
        base + power as f64 * self.bonus_per_power()
    }

    pub fn name_template(&self) -> NameTemplate {
        match self {
            EnchantmentKind::Sharpness => NameTemplate::Prefix("Sharp"),
            EnchantmentKind::Precision => NameTemplate::Prefix("Precise"),
            EnchantmentKind::Keenness => NameTemplate::Suffix("of Striking"),
            EnchantmentKind::Flaming => NameTemplate::Prefix("Flaming"),
            EnchantmentKind::Vampiric => NameTemplate::Prefix("Vampiric"),
            EnchantmentKind::Protection => NameTemplate::Suffix("of Protection"),
            EnchantmentKind::Evasion => NameTemplate::Suffix("of Evasion"),
            EnchantmentKind::Vitality => NameTemplate::Suffix("of Vitality"),
            EnchantmentKind::Thorns => NameTemplate::Prefix("Spiked"),
            EnchantmentKind::Swiftness => NameTemplate::Suffix("of Swiftness"),
            EnchantmentKind::Fortune => NameTemplate::Suffix("of Fortune"),
        }
    }

    /// Human-readable effect at a given power
    pub fn describe(&self, power: u8) -> String {
        let amount = power as f64 * self.bonus_per_power();
        match self {
            EnchantmentKind::Sharpness => format!("+{} damage", amount),
            EnchantmentKind::Precision => format!("+{} accuracy", amount),
            EnchantmentKind::Keenness => format!("+{}% critical chance", amount),
            EnchantmentKind::Flaming => format!("+{} fire damage", amount),
            EnchantmentKind::Vampiric => format!("Heals {}% of damage dealt", amount),
            EnchantmentKind::Protection => format!("+{} defense", amount),
            EnchantmentKind::Evasion => format!("+{} evasion", amount),
            EnchantmentKind::Vitality => format!("+{} maximum health", amount),
            EnchantmentKind::Thorns => format!("Reflects {} damage to attackers", amount),
            EnchantmentKind::Swiftness => format!("+{} speed", amount),
            EnchantmentKind::Fortune => format!("+{} luck", amount),
        }
    }
}

/// Curse kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CurseKind {
    Dullness,
    Fragility,
    Clumsiness,
    Frailty,
    Sluggishness,
    Misfortune,
}

impl CurseKind {
    pub fn all() -> &'static [CurseKind] {
        &[
            CurseKind::Dullness,
            CurseKind::Fragility,
            CurseKind::Clumsiness,
            CurseKind::Frailty,
            CurseKind::Sluggishness,
            CurseKind::Misfortune,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CurseKind::Dullness => "Dullness",
            CurseKind::Fragility => "Fragility",
            CurseKind::Clumsiness => "Clumsiness",
            CurseKind::Frailty => "Frailty",
            CurseKind::Sluggishness => "Sluggishness",
            CurseKind::Misfortune => "Misfortune",
        }
    }

    pub fn default_weight(&self) -> u32 {
        match self {
            CurseKind::Dullness => 100,
            CurseKind::Fragility => 100,
            CurseKind::Clumsiness => 80,
            CurseKind::Frailty => 60,
            CurseKind::Sluggishness => 60,
            CurseKind::Misfortune => 40,
        }
    }

    /// The stat this curse degrades
    pub fn stat(&self) -> &'static str {
        match self {
            CurseKind::Dullness => stats::DAMAGE,
            CurseKind::Fragility => stats::DEFENSE,
            CurseKind::Clumsiness => stats::ACCURACY,
            CurseKind::Frailty => stats::MAX_HEALTH,
            CurseKind::Sluggishness => stats::SPEED,
            CurseKind::Misfortune => stats::LUCK,
        }
    }

    /// Transform a stat value
    pub fn apply(&self, severity: u8, base: f64) -> f64 {
        let s = severity as f64;
        match self {
            CurseKind::Dullness => (base - s * 2.0).max(1.0),
            CurseKind::Fragility => (base - s * 2.0).max(0.0),
            CurseKind::Clumsiness => base - s * 5.0,
            CurseKind::Frailty => (base - s * 10.0).max(1.0),
            CurseKind::Sluggishness => base - s,
            CurseKind::Misfortune => base - s * 2.0,
        }
    }

    /// Prefix used once the item is identified
    pub fn prefix(&self) -> &'static str {
        match self {
            CurseKind::Dullness => "Dull",
            CurseKind::Fragility => "Brittle",
            CurseKind::Clumsiness => "Clumsy",
            CurseKind::Frailty => "Frail",
            CurseKind::Sluggishness => "Sluggish",
            CurseKind::Misfortune => "Ill-fated",
        }
    }

    pub fn describe(&self, severity: u8) -> String {
        let s = severity as u32;
        match self {
            CurseKind::Dullness => format!("-{} damage (never below 1)", s * 2),
            CurseKind::Fragility => format!("-{} defense", s * 2),
            CurseKind::Clumsiness => format!("-{} accuracy", s * 5),
            CurseKind::Frailty => format!("-{} maximum health", s * 10),
            CurseKind::Sluggishness => format!("-{} speed", s),
            CurseKind::Misfortune => format!("-{} luck", s * 2),
        }
    }
}

/// A rolled enchantment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enchantment {
    pub kind: EnchantmentKind,
    /// 1-5
    pub power: u8,
}

impl Enchantment {
    pub fn new(kind: EnchantmentKind, power: u8) -> Self {
        Self { kind, power: power.clamp(1, 5) }
    }

    pub fn description(&self) -> String {
        self.kind.describe(self.power)
    }
}

/// A rolled curse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curse {
    pub kind: CurseKind,
    /// 1-5
    pub severity: u8,
    /// Hidden curses are invisible until the item is identified
    pub hidden: bool,
}

impl Curse {
    pub fn new(kind: CurseKind, severity: u8, hidden: bool) -> Self {
        Self { kind, severity: severity.clamp(1, 5), hidden }
    }

    pub fn description(&self) -> String {
        self.kind.describe(self.severity)
    }
}

/// Either kind of modifier, for listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    Enchantment(Enchantment),
    Curse(Curse),
}

impl Modifier {
    pub fn name(&self) -> &'static str {
        match self {
            Modifier::Enchantment(e) => e.kind.name(),
            Modifier::Curse(c) => c.kind.name(),
        }
    }

    pub fn description(&self) -> String {
        match self {
            Modifier::Enchantment(e) => e.description(),
            Modifier::Curse(c) => c.description(),
        }
    }
}

/// Apply an enchantment's transform to a stat value
pub fn apply_enchantment_effect(enchantment: &Enchantment, base: f64) -> f64 {
    enchantment.kind.apply(enchantment.power, base)
}

/// Apply a curse's transform to a stat value
pub fn apply_curse_effect(curse: &Curse, base: f64) -> f64 {
    curse.kind.apply(curse.severity, base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enchantment_effects() {
        let sharp = Enchantment::new(EnchantmentKind::Sharpness, 3);
        assert_eq!(apply_enchantment_effect(&sharp, 10.0), 16.0);

        let prot = Enchantment::new(EnchantmentKind::Protection, 2);
        assert_eq!(apply_enchantment_effect(&prot, 5.0), 9.0);
    }

    #[test]
    fn test_curse_effects() {
        let dull = Curse::new(CurseKind::Dullness, 2, false);
        assert_eq!(apply_curse_effect(&dull, 10.0), 6.0);
        // Damage never drops below 1
        assert_eq!(apply_curse_effect(&dull, 3.0), 1.0);

        let brittle = Curse::new(CurseKind::Fragility, 5, true);
        assert_eq!(apply_curse_effect(&brittle, 4.0), 0.0);
    }

    #[test]
    fn test_power_clamped() {
        assert_eq!(Enchantment::new(EnchantmentKind::Fortune, 9).power, 5);
        assert_eq!(Curse::new(CurseKind::Misfortune, 0, false).severity, 1);
    }

    #[test]
    fn test_slot_filtering() {
        assert!(EnchantmentKind::Sharpness.fits(true));
        assert!(!EnchantmentKind::Sharpness.fits(false));
        assert!(EnchantmentKind::Protection.fits(false));
        assert!(!EnchantmentKind::Protection.fits(true));
        assert!(EnchantmentKind::Swiftness.fits(true));
        assert!(EnchantmentKind::Swiftness.fits(false));
    }

    #[test]
    fn test_name_templates() {
        assert_eq!(EnchantmentKind::Sharpness.name_template().apply("Sword"), "Sharp Sword");
        assert_eq!(
            EnchantmentKind::Protection.name_template().apply("Mail"),
            "Mail of Protection"
        );
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(Enchantment::new(EnchantmentKind::Sharpness, 2).description(), "+4 damage");
        assert_eq!(Curse::new(CurseKind::Frailty, 1, true).description(), "-10 maximum health");
    }
}
