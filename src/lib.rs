//! Stagecue sequences and plays back phase-ordered animations for document editors.
//!
//! Each subject of a document (an element, or a container of elements) carries an
//! [`AnimationQueue`] with three phases: entrance, emphasis and exit. The crate turns those
//! declarative queues into absolute timing and drives an injected animation runtime through a
//! narrow trait.
//!
//! # Pipeline overview
//!
//! 1. **Author**: `Catalog + PresetRequest -> AnimationInstance` (exit presets can be derived
//!    from entrance presets by parameter reversal)
//! 2. **Edit**: `AnimationQueue + QueueCommand -> AnimationQueue` (pure, value-returning)
//! 3. **Schedule**: `AnimationQueue -> Schedule` (absolute start/end for display and drag feedback)
//! 4. **Compile**: `AnimationQueue -> CompiledTimeline` (one paused runtime timeline per subject)
//! 5. **Play**: `PlaybackController` / `Stage` (state machine, host-driven frame loop, cleanup)
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Nothing fails on the playback path**: malformed parameters fall back to defaults and
//!   unmounted subjects are skipped. Only JSON/IO boundaries return [`StagecueError`].
//! - **Single-threaded**: the host calls [`PlaybackController::tick`] from its frame callback.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod animation;
mod catalog;
mod compile;
mod foundation;
mod playback;
mod queue;
mod schedule;

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;

/// Parameter-bag helpers (reserved keys, durations, unit-aware values).
pub use animation::value;

pub use animation::ease::{Ease, NATIVE_SEPARATOR};
pub use animation::normalize::{NormalizedTween, Repeat, normalize_params};
pub use animation::reverse::{ExitOverrides, derive_exit, reverse};
pub use animation::value::PropertyBag;
pub use catalog::builtin::builtin_presets;
pub use catalog::preset::{AmplitudeConfig, AnimationPreset};
pub use catalog::store::Catalog;
pub use compile::compiler::{CompileOpts, CompiledTimeline, ResolvedTarget, compile};
pub use compile::runtime::{
    AnimationRuntime, Position, RuntimeTimeline, SplitText, SubjectKind, TargetResolver,
    TargetRole, TextSplitter, Tween,
};
pub use foundation::core::{Direction, Millis, Phase, Secs, SubjectId, ms_to_secs, secs_to_ms};
pub use foundation::error::{StagecueError, StagecueResult};
pub use playback::clock::FrameClock;
pub use playback::controller::{
    CacheState, HostSignals, PlaybackController, PlaybackHost, PlaybackOpts, PlaybackState,
    PlaybackTick, SubscriptionId,
};
pub use playback::stage::Stage;
pub use queue::commands::{
    PresetRequest, QueueCommand, add_from_preset, apply, instance_from_preset,
    replace_from_preset, retime,
};
pub use queue::model::{AnimationInstance, AnimationQueue, InstanceTiming, TEXT_CATEGORY};
pub use schedule::drag::{DragKind, DragSession, DragTarget, MIN_DRAG_DURATION_MS};
pub use schedule::scheduler::{
    EXIT_STAGGER_MS, MIN_DISPLAY_DURATION_MS, Schedule, TimelineSegment, compute_segments,
    schedule, total_duration_ms,
};
