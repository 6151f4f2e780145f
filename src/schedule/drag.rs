//! Live timing drag across several selected subjects.
//!
//! While the pointer moves, only a transient delta is kept; every affected row renders its
//! segments shifted or stretched by that delta. Stored instances change once, when the drag
//! commits, producing exactly one new queue per affected subject.

use std::collections::BTreeMap;

use crate::{
    foundation::core::{Millis, Phase, SubjectId},
    queue::commands::retime,
    queue::model::AnimationQueue,
    schedule::scheduler::{Schedule, TimelineSegment},
};

/// Shortest duration a drag can shrink an instance to.
pub const MIN_DRAG_DURATION_MS: Millis = 100.0;

/// Which edit a drag performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragKind {
    /// Moving a strip: edits `delay`.
    Delay,
    /// Resizing a strip's trailing edge: edits `duration`.
    Duration,
}

/// One selected instance.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct DragTarget {
    /// Subject owning the instance.
    pub subject: SubjectId,
    /// Phase of the instance.
    pub phase: Phase,
    /// Position within the phase.
    pub index: usize,
}

/// An in-progress drag over one or more instances.
#[derive(Clone, Debug)]
pub struct DragSession {
    kind: DragKind,
    targets: Vec<DragTarget>,
    delta_ms: Millis,
}

impl DragSession {
    /// Start a drag; duplicate targets collapse.
    pub fn begin(kind: DragKind, mut targets: Vec<DragTarget>) -> Self {
        targets.sort();
        targets.dedup();
        Self {
            kind,
            targets,
            delta_ms: 0.0,
        }
    }

    /// Edit being performed.
    pub fn kind(&self) -> DragKind {
        self.kind
    }

    /// Latest pointer delta.
    pub fn delta_ms(&self) -> Millis {
        self.delta_ms
    }

    /// Broadcast a new pointer delta. Nothing is recomputed or stored.
    pub fn update(&mut self, delta_ms: Millis) {
        if delta_ms.is_finite() {
            self.delta_ms = delta_ms;
        }
    }

    /// `true` when any target belongs to `subject`.
    pub fn affects(&self, subject: &SubjectId) -> bool {
        self.targets.iter().any(|t| &t.subject == subject)
    }

    /// Segments of `subject` as they should render mid-drag.
    pub fn preview(&self, subject: &SubjectId, schedule: &Schedule) -> Vec<TimelineSegment> {
        schedule
            .segments
            .iter()
            .map(|seg| {
                let targeted = self.targets.iter().any(|t| {
                    &t.subject == subject && t.phase == seg.phase && t.index == seg.index
                });
                if !targeted {
                    return seg.clone();
                }
                let mut seg = seg.clone();
                match self.kind {
                    DragKind::Delay => {
                        let shift = self.delta_ms.max(-seg.instance.delay_ms());
                        seg.start += shift;
                        seg.end += shift;
                    }
                    DragKind::Duration => {
                        seg.end = (seg.end + self.delta_ms).max(seg.start + MIN_DRAG_DURATION_MS);
                    }
                }
                seg
            })
            .collect()
    }

    /// Apply the final delta to the stored queues, once per affected subject.
    pub fn commit(
        self,
        queues: &BTreeMap<SubjectId, AnimationQueue>,
    ) -> Vec<(SubjectId, AnimationQueue)> {
        let mut out: Vec<(SubjectId, AnimationQueue)> = Vec::new();
        for target in &self.targets {
            let Some(original) = queues.get(&target.subject) else {
                tracing::debug!(subject = %target.subject, "drag target has no queue");
                continue;
            };
            let pos = match out.iter().position(|(s, _)| s == &target.subject) {
                Some(pos) => pos,
                None => {
                    out.push((target.subject.clone(), original.clone()));
                    out.len() - 1
                }
            };
            let current = &mut out[pos].1;
            let Some(inst) = current.phase(target.phase).get(target.index) else {
                continue;
            };
            let next = match self.kind {
                DragKind::Delay => {
                    let delay = (inst.delay_ms() + self.delta_ms).max(0.0);
                    retime(current, target.phase, target.index, None, Some(delay))
                }
                DragKind::Duration => {
                    let duration = (inst.duration_ms() + self.delta_ms).max(MIN_DRAG_DURATION_MS);
                    retime(current, target.phase, target.index, Some(duration), None)
                }
            };
            *current = next;
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/drag.rs"]
mod tests;
