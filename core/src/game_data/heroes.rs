//! Interval unit identifiers to combat-log hero names.
//!
//! `interval` snapshots name a hero by its entity class
//! (`CDOTA_Unit_Hero_Axe`), combat-log records by its hero name
//! (`npc_dota_hero_axe`). The table joining the two is data, not code: a
//! default copy is compiled in and a replacement can be loaded from disk.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use hashbrown::HashMap;
use serde::Deserialize;

use crate::context::{ConfigError, IStr, intern, lookup, resolve};

static BUNDLED_HEROES: &str = include_str!("../../data/heroes.toml");

static BUNDLED: OnceLock<Arc<HeroTable>> = OnceLock::new();

#[derive(Deserialize)]
struct HeroTableFile {
    heroes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct HeroTable {
    by_unit: HashMap<IStr, IStr>,
}

impl HeroTable {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let by_unit = pairs
            .into_iter()
            .map(|(unit, name)| (intern(unit), intern(name)))
            .collect();
        Self { by_unit }
    }

    /// Parse a `[heroes]` table of `unit = "hero name"` entries.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: HeroTableFile = toml::from_str(contents)?;
        Ok(Self::from_pairs(
            file.heroes.iter().map(|(u, n)| (u.as_str(), n.as_str())),
        ))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| ConfigError::ReadHeroTable {
                path: path.to_path_buf(),
                source,
            })?;
        let table = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), heroes = table.len(), "Loaded hero table");
        Ok(table)
    }

    /// The table shipped with the crate, parsed once per process.
    pub fn bundled() -> Arc<Self> {
        BUNDLED
            .get_or_init(|| {
                Arc::new(
                    Self::from_toml_str(BUNDLED_HEROES).expect("bundled heroes.toml is valid"),
                )
            })
            .clone()
    }

    pub fn get(&self, unit: IStr) -> Option<IStr> {
        self.by_unit.get(&unit).copied()
    }

    pub fn name_for(&self, unit: &str) -> Option<&'static str> {
        lookup(unit).and_then(|u| self.get(u)).map(resolve)
    }

    pub fn len(&self) -> usize {
        self.by_unit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_unit.is_empty()
    }
}
