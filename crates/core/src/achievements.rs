//! Achievement tracker - tiered cross-level collection milestones
//!
//! Each achievement binds to exactly one element and carries an ordered
//! sequence of tiers. Progress is judged against the lifetime cumulative
//! collection count for the bound element, and at most one tier advances per
//! update call: a large haul that overshoots two tier targets still completes
//! only the current tier this round, with the next tier picked up on the
//! following update. `current_tier` pointing past the last tier means the
//! achievement is mastered; it stays visible but no further checks apply.

use crate::types::{Element, ElementCounts, ACHIEVEMENT_TIERS};

/// One progression step within an achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub target: u32,
    pub reward: &'static str,
    pub completed: bool,
}

impl Tier {
    const fn new(target: u32, reward: &'static str) -> Self {
        Self {
            target,
            reward,
            completed: false,
        }
    }
}

/// A tiered collection milestone bound to one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub element: Element,
    pub tiers: [Tier; ACHIEVEMENT_TIERS],
    /// Index of the next tier to complete; `tiers.len()` once mastered
    pub current_tier: usize,
    pub unlocked: bool,
}

impl Achievement {
    /// The tier currently being worked toward, if any
    pub fn current(&self) -> Option<&Tier> {
        self.tiers.get(self.current_tier)
    }

    /// Whether every tier has been completed
    pub fn mastered(&self) -> bool {
        self.current_tier >= self.tiers.len()
    }
}

/// The reference achievement set, in definition order
///
/// Fish Collector starts unlocked; the others unlock on their own first tier
/// completion (the unlock flag is sticky and only set while a next tier
/// exists).
pub fn starting_achievements() -> Vec<Achievement> {
    vec![
        Achievement {
            id: "fish_collector",
            name: "Fish Collector",
            description: "Collect fish to unlock achievements",
            element: Element::GreenFish,
            tiers: [
                Tier::new(10, "Bronze Medal"),
                Tier::new(50, "Silver Medal"),
                Tier::new(100, "Gold Medal"),
            ],
            current_tier: 0,
            unlocked: true,
        },
        Achievement {
            id: "clownfish_master",
            name: "Clownfish Master",
            description: "Master the art of collecting clownfish",
            element: Element::RedFish,
            tiers: [
                Tier::new(15, "Clownfish Badge"),
                Tier::new(75, "Clownfish Expert"),
                Tier::new(150, "Clownfish Legend"),
            ],
            current_tier: 0,
            unlocked: false,
        },
        Achievement {
            id: "dragonfly_hunter",
            name: "Dragonfly Hunter",
            description: "Hunt down those elusive dragonflies",
            element: Element::Bab,
            tiers: [
                Tier::new(20, "Dragonfly Badge"),
                Tier::new(100, "Dragonfly Expert"),
                Tier::new(200, "Dragonfly Legend"),
            ],
            current_tier: 0,
            unlocked: false,
        },
    ]
}

/// Advance achievements against lifetime cumulative collection counts
///
/// Pure: the same achievements and counts always produce the same decisions.
/// At most one tier advances per achievement per call.
pub fn update_achievements(achievements: &mut [Achievement], lifetime: &ElementCounts) {
    for achievement in achievements.iter_mut() {
        let Some(tier) = achievement.tiers.get(achievement.current_tier) else {
            // Mastered: nothing left to check.
            continue;
        };

        let collected = lifetime[achievement.element.index()];
        if collected >= tier.target && !tier.completed {
            achievement.tiers[achievement.current_tier].completed = true;
            achievement.current_tier += 1;
            let next_exists = achievement.current_tier < achievement.tiers.len();
            achievement.unlocked = achievement.unlocked || next_exists;
        }
    }
}
