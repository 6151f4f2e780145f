//! Boundary to the host: target resolution, text splitting and the animation runtime.
//!
//! The engine never touches the document itself. Hosts implement these traits over whatever
//! handle type their runtime animates (DOM nodes, scene-graph ids, ...).

use std::fmt;

use crate::{
    animation::ease::Ease,
    animation::value::PropertyBag,
    foundation::core::{Secs, SubjectId},
};

/// Which node of a subject an animation drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetRole {
    /// The element itself (entrance and exit).
    Element,
    /// Optional wrapper that isolates emphasis transforms from entrance/exit transforms.
    EmphasisWrapper,
    /// A container or row subject.
    Container,
}

/// What kind of subject a controller drives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SubjectKind {
    /// A single element, with an optional emphasis wrapper.
    #[default]
    Element,
    /// A container or row.
    Container,
}

/// Finds the host handles of a subject.
pub trait TargetResolver<T> {
    /// `None` means the subject is not mounted; callers no-op silently.
    fn resolve(&self, subject: &SubjectId, role: TargetRole) -> Option<T>;
}

/// Character-level split of a text target.
pub struct SplitText<T> {
    /// One handle per character, in reading order.
    pub chars: Vec<T>,
    revert: Option<Box<dyn FnOnce()>>,
}

impl<T> SplitText<T> {
    /// `revert` runs at most once, from [`SplitText::revert`].
    pub fn new(chars: Vec<T>, revert: impl FnOnce() + 'static) -> Self {
        Self {
            chars,
            revert: Some(Box::new(revert)),
        }
    }

    /// Restore the unsplit target. Later calls do nothing.
    pub fn revert(&mut self) {
        if let Some(revert) = self.revert.take() {
            revert();
        }
    }

    /// `true` once the split has been reverted.
    pub fn is_reverted(&self) -> bool {
        self.revert.is_none()
    }
}

impl<T: fmt::Debug> fmt::Debug for SplitText<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitText")
            .field("chars", &self.chars)
            .field("reverted", &self.is_reverted())
            .finish()
    }
}

/// Splits text targets into per-character handles.
pub trait TextSplitter<T> {
    /// `None` when the target cannot be split (not text, empty, ...).
    fn split(&mut self, target: &T) -> Option<SplitText<T>>;
}

/// Insertion point of a tween or label on a runtime timeline.
#[derive(Clone, Debug, PartialEq)]
pub enum Position {
    /// Time 0.
    Start,
    /// Current end of the timeline.
    End,
    /// A previously added label, plus an offset.
    Label {
        /// Label added earlier with [`RuntimeTimeline::add_label`].
        name: String,
        /// Seconds after the label; may be 0.
        offset_s: Secs,
    },
}

impl Position {
    /// Exactly at label `name`.
    pub fn label(name: &str) -> Self {
        Self::Label {
            name: name.to_owned(),
            offset_s: 0.0,
        }
    }

    /// `offset_s` after label `name`.
    pub fn label_offset(name: &str, offset_s: Secs) -> Self {
        Self::Label {
            name: name.to_owned(),
            offset_s,
        }
    }
}

/// One runtime tween.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween<T> {
    /// Handles the tween writes to.
    pub targets: Vec<T>,
    /// Explicit start state; `None` animates from the current inline state.
    pub from: Option<PropertyBag>,
    /// End state.
    pub to: PropertyBag,
    /// Intermediate frames, when the tween has more than two stops.
    pub keyframes: Option<Vec<PropertyBag>>,
    /// Length of one play.
    pub duration_s: Secs,
    /// Offset from the insertion point.
    pub delay_s: Secs,
    /// Curve of every property.
    pub ease: Ease,
    /// `0` once, `n` extra plays, `-1` forever.
    pub repeat: i32,
    /// Alternate direction on every repeat.
    pub yoyo: bool,
    /// Per-target start spacing.
    pub stagger_s: Option<Secs>,
    /// CSS-style transform origin, passed through.
    pub transform_origin: Option<String>,
}

/// A paused, seekable timeline owned by the runtime.
pub trait RuntimeTimeline {
    /// Handle of an animatable node.
    type Target;

    /// Name a point in time for later insertions.
    fn add_label(&mut self, name: &str, at: Position);

    /// Add `tween` at `at`; [`Position::End`] means after everything inserted so far.
    fn insert(&mut self, tween: Tween<Self::Target>, at: Position);

    /// Length of one pass through the timeline; infinite repeats count once.
    fn duration_s(&self) -> Secs;

    /// Render the state at `time_s` without changing the paused state.
    fn seek(&mut self, time_s: Secs);

    /// Stop and release every tween. Inline state written so far is left in place.
    fn kill(&mut self);
}

/// The host's tweening engine.
pub trait AnimationRuntime {
    /// Handle of an animatable node.
    type Target: Clone + fmt::Debug;
    /// Timeline type created by [`AnimationRuntime::create_timeline`].
    type Timeline: RuntimeTimeline<Target = Self::Target>;

    /// Create an empty timeline in the paused state.
    fn create_timeline(&mut self) -> Self::Timeline;

    /// Write inline state immediately.
    fn set(&mut self, targets: &[Self::Target], props: &PropertyBag);

    /// Remove every runtime-written inline property from `targets`.
    fn clear_props(&mut self, targets: &[Self::Target]);
}
