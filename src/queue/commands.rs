//! Authoring commands over [`AnimationQueue`] values.
//!
//! Every command takes the current queue by reference and returns the next queue; the input is
//! never mutated, so schedulers and compilers can treat each queue as a plain value. Commands that
//! cannot apply (index out of range, unknown preset) return an unchanged copy.

use serde_json::Value;

use crate::{
    animation::ease::Ease,
    animation::value::{self, number},
    catalog::store::Catalog,
    foundation::core::{Direction, Millis, Phase},
    queue::model::{AnimationInstance, AnimationQueue},
};

/// One authoring edit of a subject's queue.
#[derive(Clone, Debug, PartialEq)]
pub enum QueueCommand {
    /// Append to the end of a phase.
    Add {
        /// Target phase.
        phase: Phase,
        /// Instance to append; sanitized on the way in.
        instance: AnimationInstance,
    },
    /// Swap the instance at `index` for a new one.
    ReplaceAt {
        /// Target phase.
        phase: Phase,
        /// Position within the phase.
        index: usize,
        /// Replacement; sanitized on the way in.
        instance: AnimationInstance,
    },
    /// Remove the instance at `index`.
    DeleteAt {
        /// Target phase.
        phase: Phase,
        /// Position within the phase.
        index: usize,
    },
    /// Move one instance within its phase.
    Reorder {
        /// Target phase.
        phase: Phase,
        /// Current position.
        from: usize,
        /// Position after the move.
        to: usize,
    },
    /// Clear one phase, or every phase when `None`.
    Clear {
        /// Phase to clear.
        phase: Option<Phase>,
    },
}

/// Apply `cmd` to a copy of `queue`. Out-of-range indexes leave the copy unchanged.
pub fn apply(queue: &AnimationQueue, cmd: QueueCommand) -> AnimationQueue {
    let mut next = queue.clone();
    match cmd {
        QueueCommand::Add {
            phase,
            mut instance,
        } => {
            instance.sanitize();
            let mut list = next.phase(phase).to_vec();
            list.push(instance);
            next.set_phase(phase, list);
        }
        QueueCommand::ReplaceAt {
            phase,
            index,
            mut instance,
        } => {
            let mut list = next.phase(phase).to_vec();
            let Some(slot) = list.get_mut(index) else {
                tracing::debug!(%phase, index, "replace out of range");
                return next;
            };
            instance.sanitize();
            *slot = instance;
            next.set_phase(phase, list);
        }
        QueueCommand::DeleteAt { phase, index } => {
            let mut list = next.phase(phase).to_vec();
            if index >= list.len() {
                tracing::debug!(%phase, index, "delete out of range");
                return next;
            }
            list.remove(index);
            next.set_phase(phase, list);
        }
        QueueCommand::Reorder { phase, from, to } => {
            let mut list = next.phase(phase).to_vec();
            if from >= list.len() || to >= list.len() {
                tracing::debug!(%phase, from, to, "reorder out of range");
                return next;
            }
            let item = list.remove(from);
            list.insert(to, item);
            next.set_phase(phase, list);
        }
        QueueCommand::Clear { phase: Some(phase) } => next.set_phase(phase, Vec::new()),
        QueueCommand::Clear { phase: None } => next = AnimationQueue::default(),
    }
    next
}

/// Picker request for building an instance out of a catalog preset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PresetRequest {
    /// Catalog id.
    pub preset_id: String,
    /// Direction variant for directional presets.
    pub direction: Option<Direction>,
    /// Amplitude knob value; clamped to the preset's range.
    pub amplitude: Option<f64>,
    /// Duration override.
    pub duration_ms: Option<Millis>,
    /// Delay override (character interval for text presets).
    pub delay_ms: Option<Millis>,
    /// Ease override.
    pub easing: Option<String>,
    /// Transform origin, kept only when the preset supports one.
    pub transform_origin: Option<String>,
}

impl PresetRequest {
    /// Request for `preset_id` with every knob at its preset default.
    pub fn new(preset_id: impl Into<String>) -> Self {
        Self {
            preset_id: preset_id.into(),
            ..Self::default()
        }
    }
}

/// Resolve a preset into a storable instance for `phase`, or `None` on a lookup miss.
pub fn instance_from_preset(
    catalog: &Catalog,
    phase: Phase,
    req: &PresetRequest,
) -> Option<AnimationInstance> {
    let Some(preset) = catalog.get(&req.preset_id) else {
        tracing::debug!(preset = %req.preset_id, "unknown preset");
        return None;
    };
    let mut parameters =
        catalog.resolve_params(&req.preset_id, phase, req.direction, req.amplitude)?;

    if let Some(d) = req.duration_ms.filter(|d| d.is_finite() && *d > 0.0) {
        parameters.insert("duration".to_owned(), number(d));
    }
    if let Some(d) = req.delay_ms.filter(|d| d.is_finite()) {
        parameters.insert("delay".to_owned(), number(d.max(0.0)));
    }
    if let Some(name) = &req.easing {
        parameters.insert(
            "ease".to_owned(),
            Value::String(Ease::parse(name).runtime_name().to_owned()),
        );
    }

    let direction = if preset.directional {
        req.direction.or_else(|| preset.default_direction())
    } else {
        None
    };
    let transform_origin = req
        .transform_origin
        .clone()
        .filter(|_| preset.supports_transform_origin);

    let mut instance = AnimationInstance {
        preset_id: preset.id.clone(),
        name: preset.name.clone(),
        category: preset.kind.clone(),
        parameters,
        direction,
        transform_origin,
        easing: None,
    };
    instance.sanitize();
    Some(instance)
}

/// Append a preset to a phase. Lookup misses leave the queue unchanged.
pub fn add_from_preset(
    queue: &AnimationQueue,
    catalog: &Catalog,
    phase: Phase,
    req: &PresetRequest,
) -> AnimationQueue {
    match instance_from_preset(catalog, phase, req) {
        Some(instance) => apply(queue, QueueCommand::Add { phase, instance }),
        None => queue.clone(),
    }
}

/// Swap the preset at `index`, keeping the user's duration and delay unless the request sets
/// new ones.
pub fn replace_from_preset(
    queue: &AnimationQueue,
    catalog: &Catalog,
    phase: Phase,
    index: usize,
    req: &PresetRequest,
) -> AnimationQueue {
    let Some(current) = queue.phase(phase).get(index) else {
        return queue.clone();
    };
    let mut req = req.clone();
    if req.duration_ms.is_none() {
        req.duration_ms = Some(value::duration_ms(&current.parameters));
    }
    if req.delay_ms.is_none() {
        req.delay_ms = Some(value::delay_ms(&current.parameters));
    }
    if req.direction.is_none() {
        req.direction = current.direction;
    }
    match instance_from_preset(catalog, phase, &req) {
        Some(instance) => apply(
            queue,
            QueueCommand::ReplaceAt {
                phase,
                index,
                instance,
            },
        ),
        None => queue.clone(),
    }
}

/// Set duration and/or delay of one instance, the commit step of a timing drag.
pub fn retime(
    queue: &AnimationQueue,
    phase: Phase,
    index: usize,
    duration_ms: Option<Millis>,
    delay_ms: Option<Millis>,
) -> AnimationQueue {
    let Some(current) = queue.phase(phase).get(index) else {
        return queue.clone();
    };
    let mut instance = current.clone();
    if let Some(d) = duration_ms {
        instance
            .parameters
            .insert("duration".to_owned(), number(d));
    }
    if let Some(d) = delay_ms {
        instance.parameters.insert("delay".to_owned(), number(d));
    }
    apply(
        queue,
        QueueCommand::ReplaceAt {
            phase,
            index,
            instance,
        },
    )
}

#[cfg(test)]
#[path = "../../tests/unit/queue/commands.rs"]
mod tests;
