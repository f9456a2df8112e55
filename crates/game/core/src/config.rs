//! Gameplay tuning values.

use std::env;

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Distance a party member keeps behind its leader.
    pub follow_distance: f32,
    /// Seconds between pathfinding retries while a destination is unreachable.
    pub unreachable_retry_interval: f32,
    /// Failed retries before a party member gives up and idles.
    pub unreachable_max_tries: u32,
    /// Furthest an item can be dropped from the selected actor.
    pub item_drop_range: f32,
    /// Enemies further than this from their target chase it.
    pub combat_range: f32,
    /// Length of the one-shot death animation.
    pub death_animation_seconds: f32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_INVENTORY_SLOTS: usize = 64;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_FOLLOW_DISTANCE: f32 = 15.0;
    pub const DEFAULT_RETRY_INTERVAL: f32 = 1.5;
    pub const DEFAULT_MAX_TRIES: u32 = 10;
    pub const DEFAULT_ITEM_DROP_RANGE: f32 = 40.0;
    pub const DEFAULT_COMBAT_RANGE: f32 = 8.0;
    pub const DEFAULT_DEATH_ANIMATION_SECONDS: f32 = 1.0;

    pub fn new() -> Self {
        Self {
            follow_distance: Self::DEFAULT_FOLLOW_DISTANCE,
            unreachable_retry_interval: Self::DEFAULT_RETRY_INTERVAL,
            unreachable_max_tries: Self::DEFAULT_MAX_TRIES,
            item_drop_range: Self::DEFAULT_ITEM_DROP_RANGE,
            combat_range: Self::DEFAULT_COMBAT_RANGE,
            death_animation_seconds: Self::DEFAULT_DEATH_ANIMATION_SECONDS,
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SAGE_FOLLOW_DISTANCE` (default: 15)
    /// - `SAGE_UNREACHABLE_RETRY_SECONDS` (default: 1.5)
    /// - `SAGE_UNREACHABLE_MAX_TRIES` (default: 10)
    /// - `SAGE_ITEM_DROP_RANGE` (default: 40)
    /// - `SAGE_COMBAT_RANGE` (default: 8)
    /// - `SAGE_DEATH_ANIMATION_SECONDS` (default: 1)
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Some(distance) = read_env::<f32>("SAGE_FOLLOW_DISTANCE") {
            config.follow_distance = distance.max(0.0);
        }
        if let Some(interval) = read_env::<f32>("SAGE_UNREACHABLE_RETRY_SECONDS") {
            config.unreachable_retry_interval = interval.max(0.0);
        }
        if let Some(tries) = read_env::<u32>("SAGE_UNREACHABLE_MAX_TRIES") {
            config.unreachable_max_tries = tries.max(1);
        }
        if let Some(range) = read_env::<f32>("SAGE_ITEM_DROP_RANGE") {
            config.item_drop_range = range.max(0.0);
        }
        if let Some(range) = read_env::<f32>("SAGE_COMBAT_RANGE") {
            config.combat_range = range.max(0.0);
        }
        if let Some(seconds) = read_env::<f32>("SAGE_DEATH_ANIMATION_SECONDS") {
            config.death_animation_seconds = seconds.max(0.0);
        }

        config
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
