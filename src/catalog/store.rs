use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{
    animation::reverse::{ExitOverrides, derive_exit},
    animation::value::PropertyBag,
    catalog::builtin::builtin_presets,
    catalog::preset::AnimationPreset,
    foundation::core::{Direction, Phase},
    foundation::error::{StagecueError, StagecueResult},
};

/// Read-only lookup table of presets, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    presets: Vec<AnimationPreset>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Catalog of the presets shipped with the crate.
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for p in builtin_presets() {
            catalog.insert(p);
        }
        catalog
    }

    /// Parse a JSON array of presets.
    pub fn from_reader<R: std::io::Read>(r: R) -> StagecueResult<Self> {
        let presets: Vec<AnimationPreset> = serde_json::from_reader(r)
            .map_err(|e| StagecueError::catalog(format!("parse preset JSON: {e}")))?;
        Self::from_presets(presets)
    }

    /// Read a JSON array of presets from a file.
    pub fn from_path(path: impl AsRef<Path>) -> StagecueResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StagecueError::catalog(format!("open preset JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Build from a preset list, rejecting empty and duplicate ids.
    pub fn from_presets(presets: Vec<AnimationPreset>) -> StagecueResult<Self> {
        let mut catalog = Self::default();
        for p in presets {
            if p.id.trim().is_empty() {
                return Err(StagecueError::catalog("preset id must be non-empty"));
            }
            if catalog.by_id.contains_key(&p.id) {
                return Err(StagecueError::catalog(format!(
                    "duplicate preset id '{}'",
                    p.id
                )));
            }
            catalog.insert(p);
        }
        Ok(catalog)
    }

    /// Add or replace a preset by id.
    pub fn insert(&mut self, preset: AnimationPreset) {
        match self.by_id.get(&preset.id) {
            Some(&idx) => self.presets[idx] = preset,
            None => {
                self.by_id.insert(preset.id.clone(), self.presets.len());
                self.presets.push(preset);
            }
        }
    }

    /// Merge another catalog; its presets win on id collisions.
    pub fn extend(&mut self, other: Catalog) {
        for p in other.presets {
            self.insert(p);
        }
    }

    /// Preset by id.
    pub fn get(&self, id: &str) -> Option<&AnimationPreset> {
        self.by_id.get(id).map(|&idx| &self.presets[idx])
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// `true` when the catalog holds no presets.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Every preset, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &AnimationPreset> {
        self.presets.iter()
    }

    /// Presets offered for a phase. Every entrance preset is also offered as an exit.
    pub fn for_phase(&self, phase: Phase) -> impl Iterator<Item = &AnimationPreset> {
        self.presets.iter().filter(move |p| {
            p.phase == phase || (phase == Phase::Exit && p.phase == Phase::Entrance)
        })
    }

    /// Parameters for `id` played in `phase`, or `None` on a lookup miss.
    ///
    /// Entrance presets used as exits are reversed; the resolved timing keys survive.
    pub fn resolve_params(
        &self,
        id: &str,
        phase: Phase,
        direction: Option<Direction>,
        amplitude: Option<f64>,
    ) -> Option<PropertyBag> {
        let preset = self.get(id)?;
        let params = preset.resolve(direction, amplitude);
        if phase == Phase::Exit && preset.phase == Phase::Entrance {
            return Some(derive_exit(&params, &ExitOverrides::from_params(&params)));
        }
        Some(params)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/store.rs"]
mod tests;
