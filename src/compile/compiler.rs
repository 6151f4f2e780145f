use crate::{
    animation::normalize::NormalizedTween,
    animation::value::PropertyBag,
    compile::runtime::{
        AnimationRuntime, Position, RuntimeTimeline, SplitText, SubjectKind, TargetResolver,
        TargetRole, TextSplitter, Tween,
    },
    foundation::core::{Phase, SubjectId, ms_to_secs},
    queue::model::{AnimationInstance, AnimationQueue, InstanceTiming},
    schedule::scheduler::{EXIT_STAGGER_MS, Schedule, schedule},
};

/// Compiler switches.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompileOpts {
    /// Split text subjects into characters for `text` instances. When off (or when the host
    /// refuses the split) text instances animate the whole element.
    pub split_text: bool,
}

impl Default for CompileOpts {
    fn default() -> Self {
        Self { split_text: true }
    }
}

/// Handles a subject's timeline drives.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedTarget<T> {
    /// Subject the handles belong to.
    pub subject: SubjectId,
    /// The element (or container) itself.
    pub element: T,
    /// Emphasis wrapper when the host provides one.
    pub emphasis: Option<T>,
}

impl<T> ResolvedTarget<T> {
    /// `None` when the host cannot find the subject.
    pub fn resolve<R>(resolver: &R, subject: &SubjectId, kind: SubjectKind) -> Option<Self>
    where
        R: TargetResolver<T> + ?Sized,
    {
        let (element, emphasis) = match kind {
            SubjectKind::Element => (
                resolver.resolve(subject, TargetRole::Element)?,
                resolver.resolve(subject, TargetRole::EmphasisWrapper),
            ),
            SubjectKind::Container => (resolver.resolve(subject, TargetRole::Container)?, None),
        };
        Some(Self {
            subject: subject.clone(),
            element,
            emphasis,
        })
    }

    fn for_phase(&self, phase: Phase) -> &T {
        match (phase, &self.emphasis) {
            (Phase::Emphasis, Some(wrapper)) => wrapper,
            _ => &self.element,
        }
    }
}

/// A built runtime timeline plus everything teardown needs.
pub struct CompiledTimeline<R: AnimationRuntime> {
    /// Paused runtime timeline.
    pub timeline: R::Timeline,
    /// Schedule of the queue at compile time.
    pub schedule: Schedule,
    /// Every target the timeline writes inline state to.
    pub animated: Vec<R::Target>,
    /// Character split, reverted on teardown.
    pub split: Option<SplitText<R::Target>>,
    /// Fingerprint of the queue this timeline was built from.
    pub fingerprint: u64,
}

impl<R: AnimationRuntime> CompiledTimeline<R> {
    /// Kill the timeline, revert the text split and clear animated inline state.
    pub fn teardown(&mut self, runtime: &mut R) {
        self.timeline.kill();
        if let Some(split) = self.split.as_mut() {
            split.revert();
        }
        runtime.clear_props(&self.animated);
    }
}

const ENTRANCE_LABEL: &str = "entrance";
const EMPHASIS_LABEL: &str = "emphasis";
const EXIT_LABEL: &str = "exit";

/// Build one paused timeline for `queue` against the runtime.
///
/// Entrance instances share the `entrance` label at the timeline start; emphasis instances share
/// a label at the end of the entrance phase; exit instances start at the end of the emphasis phase,
/// staggered like the scheduler places them. Returns `None` when there is nothing to play.
#[tracing::instrument(skip_all, fields(subject = %target.subject))]
pub fn compile<R: AnimationRuntime>(
    runtime: &mut R,
    target: &ResolvedTarget<R::Target>,
    queue: &AnimationQueue,
    splitter: Option<&mut dyn TextSplitter<R::Target>>,
    opts: &CompileOpts,
) -> Option<CompiledTimeline<R>> {
    if queue.is_empty() {
        tracing::debug!("empty queue, nothing to compile");
        return None;
    }

    let schedule = schedule(queue);
    let mut timeline = runtime.create_timeline();
    let mut animated: Vec<R::Target> = vec![target.element.clone()];
    if let Some(wrapper) = &target.emphasis {
        animated.push(wrapper.clone());
    }

    let split = match splitter {
        Some(splitter) if opts.split_text && queue.has_text() => {
            let split = splitter.split(&target.element);
            if split.is_none() {
                tracing::debug!("host refused text split, animating whole element");
            }
            split
        }
        _ => None,
    };
    if let Some(split) = &split {
        animated.extend(split.chars.iter().cloned());
    }
    let chars = split.as_ref().map(|s| s.chars.as_slice());

    let mut builder = PhaseBuilder {
        runtime,
        timeline: &mut timeline,
        target,
        chars,
        chars_primed: false,
    };

    builder.timeline.add_label(ENTRANCE_LABEL, Position::Start);
    for inst in queue.phase(Phase::Entrance) {
        builder.insert(Phase::Entrance, inst, Position::label(ENTRANCE_LABEL));
    }

    let emphasis = queue.phase(Phase::Emphasis);
    if !emphasis.is_empty() {
        builder.timeline.add_label(EMPHASIS_LABEL, Position::End);
        for inst in emphasis {
            builder.insert(Phase::Emphasis, inst, Position::label(EMPHASIS_LABEL));
        }
    }

    let exit = queue.phase(Phase::Exit);
    if schedule.emphasis_infinite {
        if !exit.is_empty() {
            tracing::debug!("emphasis loops forever, exit skipped");
        }
    } else if !exit.is_empty() {
        builder.timeline.add_label(EXIT_LABEL, Position::End);
        for (i, inst) in exit.iter().enumerate() {
            let offset_s = ms_to_secs(i as f64 * EXIT_STAGGER_MS);
            builder.insert(
                Phase::Exit,
                inst,
                Position::label_offset(EXIT_LABEL, offset_s),
            );
        }
    }

    Some(CompiledTimeline {
        timeline,
        schedule,
        animated,
        split,
        fingerprint: queue.fingerprint(),
    })
}

struct PhaseBuilder<'a, R: AnimationRuntime> {
    runtime: &'a mut R,
    timeline: &'a mut R::Timeline,
    target: &'a ResolvedTarget<R::Target>,
    chars: Option<&'a [R::Target]>,
    /// Split characters start in the first text instance's `from` state; later instances carry
    /// their own `from` on the tween.
    chars_primed: bool,
}

impl<R: AnimationRuntime> PhaseBuilder<'_, R> {
    fn insert(&mut self, phase: Phase, inst: &AnimationInstance, at: Position) {
        let n = inst.tween();
        let (targets, delay_s, stagger_s) = match (inst.timing(), self.chars) {
            (InstanceTiming::TextStagger { interval_ms }, Some(chars)) => {
                if !self.chars_primed {
                    self.chars_primed = true;
                    if !n.from.is_empty() {
                        self.runtime.set(chars, &n.from);
                    }
                }
                (chars.to_vec(), 0.0, Some(ms_to_secs(interval_ms)))
            }
            _ => (vec![self.target.for_phase(phase).clone()], n.delay_s, None),
        };

        for tween in split_tweens(&n, targets, delay_s, stagger_s, inst) {
            self.timeline.insert(tween, at.clone());
        }
    }
}

/// Main tween plus one tween per property that carries its own duration.
fn split_tweens<T: Clone>(
    n: &NormalizedTween,
    targets: Vec<T>,
    delay_s: f64,
    stagger_s: Option<f64>,
    inst: &AnimationInstance,
) -> Vec<Tween<T>> {
    let base = Tween {
        targets,
        from: None,
        to: PropertyBag::new(),
        keyframes: None,
        duration_s: n.duration_s,
        delay_s,
        ease: n.ease.clone(),
        repeat: n.repeat.runtime_count(),
        yoyo: n.yoyo,
        stagger_s,
        transform_origin: inst.transform_origin.clone(),
    };

    let mut out = Vec::new();
    for (key, duration_s) in &n.property_durations {
        let mut own = base.clone();
        own.duration_s = *duration_s;
        if let Some(v) = n.to.get(key) {
            own.to.insert(key.clone(), v.clone());
        }
        if let Some(v) = n.from.get(key) {
            own.from = Some([(key.clone(), v.clone())].into_iter().collect());
        }
        out.push(own);
    }

    let mut main = base;
    let shared = |bag: &PropertyBag| -> PropertyBag {
        bag.iter()
            .filter(|(k, _)| !n.property_durations.contains_key(*k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    };
    main.to = shared(&n.to);
    let from = shared(&n.from);
    main.from = (!from.is_empty()).then_some(from);
    main.keyframes = n.keyframes.as_ref().map(|frames| {
        frames
            .iter()
            .map(&shared)
            .filter(|f| !f.is_empty())
            .collect()
    });
    if !main.to.is_empty() {
        out.insert(0, main);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/compile/compiler.rs"]
mod tests;
