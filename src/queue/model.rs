use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{
    animation::ease::Ease,
    animation::normalize::{NormalizedTween, normalize_params},
    animation::value::{self, PropertyBag},
    foundation::core::{Direction, Millis, Phase},
    foundation::error::{StagecueError, StagecueResult},
    foundation::math::{Fnv1a64, hash_json},
};

/// Instance category whose `delay` is an inter-character stagger.
pub const TEXT_CATEGORY: &str = "text";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A preset applied to one subject in one phase.
pub struct AnimationInstance {
    /// Catalog id of the source preset.
    pub preset_id: String,
    /// Display name.
    pub name: String,
    /// Preset grouping; [`TEXT_CATEGORY`] switches `delay` to a per-character interval.
    pub category: String,
    /// Resolved parameters; always carries `duration`, `delay` and `ease`.
    pub parameters: PropertyBag,
    /// Direction variant picked for a directional preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Transform origin picked in the inspector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_origin: Option<String>,
    /// Ease override chosen in the inspector; wins over `parameters.ease`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
}

/// What the stored `delay` of an instance means.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InstanceTiming {
    /// Offset from the start of the instance's phase.
    Offset {
        /// Delay after the phase start.
        delay_ms: Millis,
    },
    /// Interval between consecutive characters of a split text target.
    TextStagger {
        /// Time between two character starts.
        interval_ms: Millis,
    },
}

impl AnimationInstance {
    /// Duration of one play, defaulted when malformed.
    pub fn duration_ms(&self) -> Millis {
        value::duration_ms(&self.parameters)
    }

    /// Raw `delay`, clamped at 0. See [`AnimationInstance::timing`] for what it means.
    pub fn delay_ms(&self) -> Millis {
        value::delay_ms(&self.parameters)
    }

    /// `true` for `loop: true` or a negative runtime repeat.
    pub fn loops_forever(&self) -> bool {
        value::loops_forever(&self.parameters)
    }

    /// `true` for [`TEXT_CATEGORY`] instances.
    pub fn is_text(&self) -> bool {
        self.category == TEXT_CATEGORY
    }

    /// Interpret the stored delay for this instance's category.
    pub fn timing(&self) -> InstanceTiming {
        let delay_ms = self.delay_ms();
        if self.is_text() {
            InstanceTiming::TextStagger {
                interval_ms: delay_ms,
            }
        } else {
            InstanceTiming::Offset { delay_ms }
        }
    }

    /// Effective curve: the `easing` override, else `parameters.ease`.
    pub fn ease(&self) -> Ease {
        match &self.easing {
            Some(name) => Ease::parse(name),
            None => Ease::from_value(self.parameters.get("ease")),
        }
    }

    /// Runtime descriptor for this instance, with the inspector ease applied.
    pub fn tween(&self) -> NormalizedTween {
        let mut tween = normalize_params(&self.parameters);
        tween.ease = self.ease();
        tween
    }

    /// Enforce the stored-value invariants: `duration > 0`, `delay >= 0`, `ease` present.
    pub fn sanitize(&mut self) {
        let duration = value::duration_ms(&self.parameters);
        let delay = value::delay_ms(&self.parameters);
        let ease = Ease::from_value(self.parameters.get("ease"));
        self.parameters
            .insert("duration".to_owned(), value::number(duration));
        self.parameters
            .insert("delay".to_owned(), value::number(delay));
        self.parameters
            .insert("ease".to_owned(), Value::String(ease.into()));
    }
}

fn non_empty<'de, D>(d: D) -> Result<Option<Vec<AnimationInstance>>, D::Error>
where
    D: Deserializer<'de>,
{
    let list: Option<Vec<AnimationInstance>> = Option::deserialize(d)?;
    Ok(list.filter(|l| !l.is_empty()))
}

/// Per-subject animation queue as persisted by the host document.
///
/// Present lists are never empty; an empty list is read and stored as absent.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationQueue {
    /// Entrance instances, overlaid from time 0.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty"
    )]
    pub entrance: Option<Vec<AnimationInstance>>,
    /// Emphasis instances, overlaid from the end of the entrance.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty"
    )]
    pub emphasis: Option<Vec<AnimationInstance>>,
    /// Exit instances, staggered after emphasis.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty"
    )]
    pub exit: Option<Vec<AnimationInstance>>,
}

impl AnimationQueue {
    /// Parse a queue and sanitize every instance.
    pub fn from_reader<R: std::io::Read>(r: R) -> StagecueResult<Self> {
        let mut queue: Self = serde_json::from_reader(r)
            .map_err(|e| StagecueError::serde(format!("parse animation queue JSON: {e}")))?;
        queue.sanitize();
        Ok(queue)
    }

    /// Read a queue file. See [`AnimationQueue::from_reader`].
    pub fn from_path(path: impl AsRef<Path>) -> StagecueResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StagecueError::validation(format!(
                "open animation queue JSON '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Wire JSON, with empty phases omitted.
    pub fn to_json(&self) -> StagecueResult<String> {
        serde_json::to_string(self)
            .map_err(|e| StagecueError::serde(format!("serialize animation queue: {e}")))
    }

    /// Instances of `phase`; empty when absent.
    pub fn phase(&self, phase: Phase) -> &[AnimationInstance] {
        let list = match phase {
            Phase::Entrance => &self.entrance,
            Phase::Emphasis => &self.emphasis,
            Phase::Exit => &self.exit,
        };
        list.as_deref().unwrap_or(&[])
    }

    /// Replace a phase list; an empty list clears the phase.
    pub fn set_phase(&mut self, phase: Phase, list: Vec<AnimationInstance>) {
        let slot = match phase {
            Phase::Entrance => &mut self.entrance,
            Phase::Emphasis => &mut self.emphasis,
            Phase::Exit => &mut self.exit,
        };
        *slot = if list.is_empty() { None } else { Some(list) };
    }

    /// `true` when no phase has instances.
    pub fn is_empty(&self) -> bool {
        Phase::ALL.iter().all(|&p| self.phase(p).is_empty())
    }

    /// Instance count across phases.
    pub fn len(&self) -> usize {
        Phase::ALL.iter().map(|&p| self.phase(p).len()).sum()
    }

    /// `true` when any emphasis instance loops forever.
    pub fn emphasis_infinite(&self) -> bool {
        self.phase(Phase::Emphasis)
            .iter()
            .any(AnimationInstance::loops_forever)
    }

    /// `true` when any phase holds a text instance.
    pub fn has_text(&self) -> bool {
        Phase::ALL
            .iter()
            .any(|&p| self.phase(p).iter().any(AnimationInstance::is_text))
    }

    /// Sanitize every instance and drop phases left empty.
    pub fn sanitize(&mut self) {
        for phase in Phase::ALL {
            let mut list = self.phase(phase).to_vec();
            list.iter_mut().for_each(AnimationInstance::sanitize);
            self.set_phase(phase, list);
        }
    }

    /// Structural hash used to detect that a compiled timeline no longer matches its queue.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        for phase in Phase::ALL {
            let list = self.phase(phase);
            h.write_u64(list.len() as u64);
            for inst in list {
                h.write_str(&inst.preset_id);
                h.write_str(&inst.category);
                hash_json(&mut h, &Value::Object(inst.parameters.clone()));
                h.write_str(inst.easing.as_deref().unwrap_or(""));
                h.write_str(inst.transform_origin.as_deref().unwrap_or(""));
            }
        }
        h.finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/queue/model.rs"]
mod tests;
