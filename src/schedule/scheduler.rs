use crate::{
    foundation::core::{Millis, Phase},
    queue::model::{AnimationInstance, AnimationQueue},
};

/// Fixed gap between consecutive exit instances.
pub const EXIT_STAGGER_MS: Millis = 100.0;

/// Floor applied to the display length of any non-empty queue.
pub const MIN_DISPLAY_DURATION_MS: Millis = 1000.0;

/// Absolute placement of one instance on a subject's timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimelineSegment {
    /// Phase the instance belongs to.
    pub phase: Phase,
    /// Index of the instance inside its phase list.
    pub index: usize,
    /// The placed instance.
    pub instance: AnimationInstance,
    /// Absolute start.
    pub start: Millis,
    /// Absolute end of one play.
    pub end: Millis,
}

impl TimelineSegment {
    /// `end - start`.
    pub fn duration(&self) -> Millis {
        self.end - self.start
    }
}

/// Scheduler output for one queue.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Schedule {
    /// Every placed instance, entrance first.
    pub segments: Vec<TimelineSegment>,
    /// An emphasis instance loops forever; exits are not placed.
    pub emphasis_infinite: bool,
    /// Cursor after the entrance phase.
    pub entrance_end: Millis,
    /// Cursor after the emphasis phase.
    pub emphasis_end: Millis,
    /// Latest segment end, without the display floor.
    pub content_end: Millis,
}

impl Schedule {
    /// `true` when nothing is placed.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Display length: latest end, at least [`MIN_DISPLAY_DURATION_MS`] when anything plays.
    /// Display length of `segments`: the latest end, floored at [`MIN_DISPLAY_DURATION_MS`].
/// Empty input is 0.
/// Total displayed duration of `segments`: the latest segment end, floored at
/// `MIN_DISPLAY_DURATION_MS`, or `0.0` when there are no segments.
pub fn total_duration_ms(&self) -> Millis {
        total_duration_ms(&self.segments)
    }

    /// Segments of one phase, in queue order.
    pub fn phase_segments(&self, phase: Phase) -> impl Iterator<Item = &TimelineSegment> {
        self.segments.iter().filter(move |s| s.phase == phase)
    }
}

/// Place every instance of `queue` on an absolute millisecond timeline.
///
/// Instances of one phase overlay from a shared cursor and are offset only by their own delay.
/// Exit instances are staggered by [`EXIT_STAGGER_MS`] and dropped entirely when an emphasis
/// instance loops forever.
#[tracing::instrument(skip(queue), fields(instances = queue.len()))]
pub fn schedule(queue: &AnimationQueue) -> Schedule {
    let mut out = Schedule::default();
    let mut cursor: Millis = 0.0;

    cursor = place_overlay(queue, Phase::Entrance, cursor, &mut out.segments);
    out.entrance_end = cursor;

    out.emphasis_infinite = queue.emphasis_infinite();
    cursor = place_overlay(queue, Phase::Emphasis, cursor, &mut out.segments);
    out.emphasis_end = cursor;

    if !out.emphasis_infinite {
        for (i, inst) in queue.phase(Phase::Exit).iter().enumerate() {
            let start = cursor + i as f64 * EXIT_STAGGER_MS + inst.delay_ms();
            out.segments.push(TimelineSegment {
                phase: Phase::Exit,
                index: i,
                instance: inst.clone(),
                start,
                end: start + inst.duration_ms(),
            });
        }
    }

    out.content_end = out.segments.iter().map(|s| s.end).fold(0.0, f64::max);
    out
}

fn place_overlay(
    queue: &AnimationQueue,
    phase: Phase,
    cursor: Millis,
    out: &mut Vec<TimelineSegment>,
) -> Millis {
    let mut phase_end = cursor;
    for (i, inst) in queue.phase(phase).iter().enumerate() {
        let start = cursor + inst.delay_ms();
        let end = start + inst.duration_ms();
        phase_end = phase_end.max(end);
        out.push(TimelineSegment {
            phase,
            index: i,
            instance: inst.clone(),
            start,
            end,
        });
    }
    phase_end
}

/// Segments of [`schedule`], for callers that only render strips.
pub fn compute_segments(queue: &AnimationQueue) -> Vec<TimelineSegment> {
    schedule(queue).segments
}

/// Total displayed duration of `segments`: the latest segment end, floored at
/// `MIN_DISPLAY_DURATION_MS`, or `0.0` when there are no segments.
pub fn total_duration_ms(segments: &[TimelineSegment]) -> Millis {
    if segments.is_empty() {
        return 0.0;
    }
    segments
        .iter()
        .map(|s| s.end)
        .fold(MIN_DISPLAY_DURATION_MS, f64::max)
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scheduler.rs"]
mod tests;
