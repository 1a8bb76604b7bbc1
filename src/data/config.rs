//! Engine tuning
//!
//! Loaded from a RON file with every field defaulted, so a config file only
//! needs to mention what it changes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::items::{Rarity, StatApplication};

/// Errors reading a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Loot table selection tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    /// Percent weight per rarity (100 = unchanged)
    pub rarity_weights: BTreeMap<Rarity, f64>,
    /// Added to the depth multiplier per floor
    pub rarity_bonus_per_floor: f64,
    /// Cap on the depth bonus
    pub max_floor_bonus: f64,
}

impl LootConfig {
    /// Percent weight for a rarity, falling back to the built-in value
    pub fn rarity_weight(&self, rarity: Rarity) -> f64 {
        self.rarity_weights
            .get(&rarity)
            .copied()
            .unwrap_or_else(|| default_rarity_weight(rarity))
    }
}

fn default_rarity_weight(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Common => 100.0,
        Rarity::Uncommon => 60.0,
        Rarity::Rare => 30.0,
        Rarity::Epic => 12.0,
        Rarity::Legendary => 4.0,
        Rarity::Mythic => 1.0,
    }
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            rarity_weights: Rarity::all()
                .iter()
                .map(|r| (*r, default_rarity_weight(*r)))
                .collect(),
            rarity_bonus_per_floor: 0.02,
            max_floor_bonus: 0.5,
        }
    }
}

/// Modifier roll tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierConfig {
    /// Chance a rolled curse is hidden until identification
    pub hidden_curse_chance: f64,
}

impl ModifierConfig {
    /// Hidden chance as a usable probability
    pub fn effective_hidden_curse_chance(&self) -> f64 {
        if self.hidden_curse_chance.is_finite() {
            self.hidden_curse_chance.clamp(0.0, 1.0)
        } else {
            log::warn!(
                "hidden_curse_chance {} is not a number, using the default",
                self.hidden_curse_chance
            );
            Self::default().hidden_curse_chance
        }
    }
}

impl Default for ModifierConfig {
    fn default() -> Self {
        Self { hidden_curse_chance: 0.6 }
    }
}

/// Identification timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentificationConfig {
    pub base_ticks: u32,
    pub min_ticks: u32,
    /// Ticks saved per point of intelligence above the baseline
    pub ticks_per_wisdom: u32,
    pub intelligence_baseline: i32,
    /// Duration multiplier when the owner carries an identification aid
    pub aid_scale: f64,
    pub aid_min_ticks: u32,
    /// Extra progress notice this many ticks before completion
    pub final_notice_ticks: u32,
}

impl Default for IdentificationConfig {
    fn default() -> Self {
        Self {
            base_ticks: 150,
            min_ticks: 25,
            ticks_per_wisdom: 5,
            intelligence_baseline: 10,
            aid_scale: 0.6,
            aid_min_ticks: 50,
            final_notice_ticks: 10,
        }
    }
}

/// All engine tuning in one place
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub loot: LootConfig,
    pub modifiers: ModifierConfig,
    pub identification: IdentificationConfig,
    pub stat_application: StatApplication,
}

impl EngineConfig {
    /// Parse a RON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse RON and sanitize the result
    pub fn from_ron(content: &str) -> Result<Self, ron::error::SpannedError> {
        let mut config: Self = ron::from_str(content)?;
        config.sanitize();
        Ok(config)
    }

    /// Replace values that would break the rolls (NaN, infinite, negative)
    /// with their defaults, warning for each one
    pub fn sanitize(&mut self) {
        let loot = LootConfig::default();
        self.loot.rarity_weights.retain(|rarity, weight| {
            let ok = weight.is_finite() && *weight >= 0.0;
            if !ok {
                log::warn!("rarity weight {} for {} is invalid, using the default", weight, rarity.name());
            }
            ok
        });
        fix_field("rarity_bonus_per_floor", &mut self.loot.rarity_bonus_per_floor, loot.rarity_bonus_per_floor, |v| v >= 0.0);
        fix_field("max_floor_bonus", &mut self.loot.max_floor_bonus, loot.max_floor_bonus, |v| v >= 0.0);

        self.modifiers.hidden_curse_chance = self.modifiers.effective_hidden_curse_chance();

        let identification = IdentificationConfig::default();
        fix_field("aid_scale", &mut self.identification.aid_scale, identification.aid_scale, |v| v > 0.0);
    }

    /// Load from the user config directory, or fall back to defaults
    pub fn load_or_default() -> Self {
        let path = config_path();
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded engine config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{}. Using default config.", e);
                Self::default()
            }
        }
    }
}

fn fix_field(name: &str, value: &mut f64, default: f64, valid: impl Fn(f64) -> bool) {
    if !value.is_finite() || !valid(*value) {
        log::warn!("{} {} is invalid, using {}", name, value, default);
        *value = default;
    }
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "relicforge", "Relicforge") {
        let mut path = proj_dirs.config_dir().to_path_buf();
        path.push("config.ron");
        path
    } else {
        // Fallback to current directory
        PathBuf::from("./relicforge.ron")
    }
}
