//! Experience and leveling
//!
//! XP curve, owner experience tracking, and the reward for identifying
//! a cursed item the hard way.

use serde::{Deserialize, Serialize};

/// Calculate XP needed to reach a specific level
pub fn xp_for_level(level: u32) -> u32 {
    if level <= 1 {
        0
    } else {
        // Base 100 XP for level 2, +50 per level after
        100 + (level - 2) * 50
    }
}

/// Calculate total XP needed from level 1 to reach a given level
pub fn total_xp_for_level(level: u32) -> u32 {
    (1..level).map(|l| xp_for_level(l + 1)).sum()
}

/// XP granted when an equipped cursed item finishes identifying.
/// Scales with the item's tier and how many modifiers it carries.
pub fn identification_reward(tier: u8, modifier_count: usize) -> u32 {
    tier as u32 * 10 + modifier_count as u32 * 5
}

/// Owner experience tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub level: u32,
    pub current_xp: u32,
    pub total_xp: u32,
}

impl Experience {
    pub fn new() -> Self {
        Self {
            level: 1,
            current_xp: 0,
            total_xp: 0,
        }
    }

    /// XP still needed for the next level
    pub fn xp_to_next(&self) -> u32 {
        xp_for_level(self.level + 1).saturating_sub(self.current_xp)
    }

    /// Add XP and return the number of levels gained
    pub fn add_xp(&mut self, amount: u32) -> u32 {
        self.current_xp += amount;
        self.total_xp += amount;

        let mut gained = 0;
        while self.current_xp >= xp_for_level(self.level + 1) {
            self.current_xp -= xp_for_level(self.level + 1);
            self.level += 1;
            gained += 1;
        }
        gained
    }
}

impl Default for Experience {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_for_level() {
        assert_eq!(xp_for_level(1), 0);
        assert_eq!(xp_for_level(2), 100); // Need 100 to go from 1 -> 2
        assert_eq!(xp_for_level(3), 150); // Need 150 to go from 2 -> 3
        assert_eq!(xp_for_level(4), 200);
        assert_eq!(total_xp_for_level(3), 250);
    }

    #[test]
    fn test_identification_reward() {
        assert_eq!(identification_reward(1, 1), 15);
        assert_eq!(identification_reward(5, 3), 65);
    }

    #[test]
    fn test_add_xp_levels() {
        let mut xp = Experience::new();
        assert_eq!(xp.add_xp(50), 0);
        assert_eq!(xp.xp_to_next(), 50);
        // 50 + 210 = 260 -> level 3 (100 + 150) with 10 left
        assert_eq!(xp.add_xp(210), 2);
        assert_eq!(xp.level, 3);
        assert_eq!(xp.current_xp, 10);
        assert_eq!(xp.total_xp, 260);
    }
}
