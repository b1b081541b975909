//! Block stat catalog.
//!
//! Stat values for every placeable tower block kind: power output,
//! drain, range, attack period and the effect policy tags. The catalog
//! is pure data designed to be deserialized from RON; numbers here are
//! balancing configuration, not core behavior.
//!
//! All validation happens at load time. A catalog that names an unknown
//! policy or kind fails RON deserialization outright, and one with
//! nonsensical numbers is rejected by [`BlockCatalog::validate`] —
//! firing never re-checks configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::blocks::{
    BlockCapability, EffectCount, EffectDuration, EffectorKind, TargeterKind, TowerCore,
    TowerEffector, TowerTargeter,
};
use crate::error::{DefenceError, Result};
use crate::math::Fixed;

/// Stats for a core block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreData {
    /// Power produced.
    pub power: i32,
}

impl CoreData {
    /// Build the capability this data describes.
    #[must_use]
    pub const fn to_capability(self) -> BlockCapability {
        BlockCapability::Core(TowerCore::new(self.power))
    }
}

/// Stats for a targeter block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargeterData {
    /// Power drained.
    pub drain: i32,
    /// Selection strategy.
    pub kind: TargeterKind,
    /// Range in blocks.
    pub range: i32,
    /// Ticks between firings.
    pub attack_period: u32,
    /// Effect multiplier in percent (100 = unmodified).
    #[serde(default = "default_multiplier_percent")]
    pub multiplier_percent: u32,
    /// Arc range in blocks for chain targeters.
    #[serde(default)]
    pub chain_range: i32,
    /// Maximum enemies hit by one chain firing, primary included.
    #[serde(default)]
    pub chain_length: u32,
}

const fn default_multiplier_percent() -> u32 {
    100
}

impl TargeterData {
    /// Build the capability this data describes.
    #[must_use]
    pub fn to_capability(self) -> BlockCapability {
        let mut targeter = TowerTargeter::new(
            self.drain,
            self.kind,
            Fixed::from_num(self.range),
            self.attack_period,
        )
        .with_multiplier(Fixed::from_num(self.multiplier_percent) / Fixed::from_num(100));
        targeter.chain_range = Fixed::from_num(self.chain_range);
        targeter.chain_length = self.chain_length;
        BlockCapability::Targeter(targeter)
    }
}

/// Stats for an effector block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectorData {
    /// Power drained.
    pub drain: i32,
    /// Which effect is applied.
    pub kind: EffectorKind,
    /// How often the effect lands.
    pub count: EffectCount,
    /// How the effect ends.
    pub duration: EffectDuration,
}

impl EffectorData {
    /// Build the capability this data describes.
    #[must_use]
    pub const fn to_capability(self) -> BlockCapability {
        BlockCapability::Effector(TowerEffector::new(
            self.drain,
            self.kind,
            self.count,
            self.duration,
        ))
    }
}

/// Registry of all block kinds available to the game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockCatalog {
    /// Core kinds by name.
    pub cores: HashMap<String, CoreData>,
    /// Targeter kinds by name.
    pub targeters: HashMap<String, TargeterData>,
    /// Effector kinds by name.
    pub effectors: HashMap<String, EffectorData>,
}

impl BlockCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from RON text and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`DefenceError::CatalogParseError`] for malformed RON
    /// (including unknown kind or policy tags), or a validation error
    /// for entries with nonsensical numbers.
    pub fn from_ron(source: &str) -> Result<Self> {
        let catalog: Self =
            ron::from_str(source).map_err(|e| DefenceError::CatalogParseError(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check every entry for numeric sanity.
    ///
    /// # Errors
    ///
    /// Returns [`DefenceError::CatalogValidationError`] naming the
    /// first offending entry.
    pub fn validate(&self) -> Result<()> {
        for (name, core) in &self.cores {
            if core.power < 0 {
                return Err(invalid(name, "power must be non-negative"));
            }
        }

        for (name, targeter) in &self.targeters {
            if targeter.drain < 0 {
                return Err(invalid(name, "drain must be non-negative"));
            }
            if targeter.range <= 0 {
                return Err(invalid(name, "range must be positive"));
            }
            if targeter.attack_period == 0 {
                return Err(invalid(name, "attack period must be positive"));
            }
            if targeter.multiplier_percent == 0 {
                return Err(invalid(name, "multiplier must be positive"));
            }
            if targeter.kind == TargeterKind::Chain
                && (targeter.chain_length < 2 || targeter.chain_range <= 0)
            {
                return Err(invalid(
                    name,
                    "chain targeters need chain_length >= 2 and a positive chain_range",
                ));
            }
        }

        for (name, effector) in &self.effectors {
            if effector.drain < 0 {
                return Err(invalid(name, "drain must be non-negative"));
            }
        }

        Ok(())
    }

    /// Look up a core kind.
    #[must_use]
    pub fn core(&self, name: &str) -> Option<&CoreData> {
        self.cores.get(name)
    }

    /// Look up a targeter kind.
    #[must_use]
    pub fn targeter(&self, name: &str) -> Option<&TargeterData> {
        self.targeters.get(name)
    }

    /// Look up an effector kind.
    #[must_use]
    pub fn effector(&self, name: &str) -> Option<&EffectorData> {
        self.effectors.get(name)
    }

    /// The catalog shipped with the game: one core kind, the three
    /// targeter strategies, and the effect blocks with their
    /// count/duration classification.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        catalog.cores.insert("core".into(), CoreData { power: 10 });

        catalog.targeters.insert(
            "single_targeter".into(),
            TargeterData {
                drain: 5,
                kind: TargeterKind::Single,
                range: 15,
                attack_period: 20,
                multiplier_percent: 100,
                chain_range: 0,
                chain_length: 0,
            },
        );
        catalog.targeters.insert(
            "sphere_targeter".into(),
            TargeterData {
                drain: 10,
                kind: TargeterKind::Sphere,
                range: 10,
                attack_period: 30,
                multiplier_percent: 50,
                chain_range: 0,
                chain_length: 0,
            },
        );
        catalog.targeters.insert(
            "chain_targeter".into(),
            TargeterData {
                drain: 8,
                kind: TargeterKind::Chain,
                range: 12,
                attack_period: 25,
                multiplier_percent: 75,
                chain_range: 5,
                chain_length: 4,
            },
        );

        catalog.effectors.insert(
            "damage_effector".into(),
            EffectorData {
                drain: 5,
                kind: EffectorKind::Damage,
                count: EffectCount::PerShot,
                duration: EffectDuration::Instant,
            },
        );
        catalog.effectors.insert(
            "fire_effector".into(),
            EffectorData {
                drain: 8,
                kind: EffectorKind::Fire,
                count: EffectCount::PerShot,
                duration: EffectDuration::Lasting,
            },
        );
        catalog.effectors.insert(
            "poison_effector".into(),
            EffectorData {
                drain: 7,
                kind: EffectorKind::Poison,
                count: EffectCount::PerShot,
                duration: EffectDuration::Lasting,
            },
        );
        catalog.effectors.insert(
            "stun_effector".into(),
            EffectorData {
                drain: 12,
                kind: EffectorKind::Stun,
                count: EffectCount::Continuous,
                duration: EffectDuration::Lasting,
            },
        );
        catalog.effectors.insert(
            "ice_effector".into(),
            EffectorData {
                drain: 9,
                kind: EffectorKind::Ice,
                count: EffectCount::Continuous,
                duration: EffectDuration::Lasting,
            },
        );
        catalog.effectors.insert(
            "visual_effector".into(),
            EffectorData {
                drain: 1,
                kind: EffectorKind::Visual,
                count: EffectCount::Continuous,
                duration: EffectDuration::Lasting,
            },
        );

        catalog
    }
}

fn invalid(kind: &str, message: &str) -> DefenceError {
    DefenceError::CatalogValidationError {
        kind: kind.to_string(),
        message: message.to_string(),
    }
}
