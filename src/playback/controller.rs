use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{
    compile::compiler::{CompileOpts, CompiledTimeline, ResolvedTarget, compile},
    compile::runtime::{
        AnimationRuntime, RuntimeTimeline, SubjectKind, TargetResolver, TextSplitter,
    },
    foundation::core::{Millis, SubjectId, ms_to_secs, secs_to_ms},
    foundation::error::{StagecueError, StagecueResult},
    playback::clock::FrameClock,
    queue::model::AnimationQueue,
    schedule::scheduler::schedule,
};

/// Host readiness flags, passed in explicitly on every change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HostSignals {
    /// The host finished loading whatever playback depends on (fonts, media, layout).
    pub ready: bool,
    /// Something on top of the document (a transition, a modal) holds playback.
    pub blocked: bool,
}

impl Default for HostSignals {
    fn default() -> Self {
        Self {
            ready: true,
            blocked: false,
        }
    }
}

/// Playback switches.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlaybackOpts {
    /// Arm playback as soon as a subject becomes visible.
    pub autoplay: bool,
    /// Restart from 0 instead of completing.
    pub loop_preview: bool,
}

impl Default for PlaybackOpts {
    fn default() -> Self {
        Self {
            autoplay: true,
            loop_preview: false,
        }
    }
}

impl PlaybackOpts {
    /// Parse options JSON; missing keys take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> StagecueResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| StagecueError::serde(format!("parse playback options JSON: {e}")))
    }

    /// Read an options file.
    pub fn from_path(path: impl AsRef<Path>) -> StagecueResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StagecueError::validation(format!(
                "open playback options JSON '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

/// Where a subject's playback stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Not visible, or autoplay is off and nobody asked to play.
    Idle,
    /// Visible and waiting for the host to become ready and unblocked.
    Armed,
    /// Frames are scheduled and the playhead moves.
    Playing,
    /// Held by the user or the host.
    Paused,
    /// Reached the end; only `play` or `reset` leave this state.
    Completed,
}

impl PlaybackState {
    /// Lowercase name, as serialized.
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Armed => "armed",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    /// `true` only for [`PlaybackState::Playing`].
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Whether the compiled timeline matches the current queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheState {
    /// Nothing compiled yet, or torn down.
    Absent,
    /// Matches the current queue.
    Compiled,
    /// Compiled from an older queue; rebuilt before the next play or seek.
    Stale,
}

/// Playhead broadcast.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PlaybackTick {
    /// Playhead, clamped at the display length.
    pub current_time_ms: Millis,
    /// Whether frames are still scheduled.
    pub is_playing: bool,
}

/// Handle returned by [`PlaybackController::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Runtime and host collaborators shared by every controller.
pub struct PlaybackHost<R: AnimationRuntime> {
    /// Tweening engine.
    pub runtime: R,
    /// Subject to handle lookup.
    pub resolver: Box<dyn TargetResolver<R::Target>>,
    /// Character splitter; without one, text instances animate the whole element.
    pub splitter: Option<Box<dyn TextSplitter<R::Target>>>,
}

impl<R: AnimationRuntime> PlaybackHost<R> {
    /// Host without a text splitter.
    pub fn new(runtime: R, resolver: impl TargetResolver<R::Target> + 'static) -> Self {
        Self {
            runtime,
            resolver: Box::new(resolver),
            splitter: None,
        }
    }

    /// Enable per-character text animation.
    pub fn with_splitter(mut self, splitter: impl TextSplitter<R::Target> + 'static) -> Self {
        self.splitter = Some(Box::new(splitter));
        self
    }
}

/// Why playback sits in [`PlaybackState::Paused`].
#[derive(Clone, Copy, Debug, PartialEq)]
enum PauseCause {
    User,
    /// Blocked by the host; resume from this fraction of the content once unblocked.
    Blocked { progress: f64 },
}

type TickListener = Box<dyn FnMut(PlaybackTick)>;

/// Playback state machine for one subject.
///
/// The controller owns the subject's compiled timeline and playhead. Time only moves through
/// [`PlaybackController::tick`]; the runtime timeline stays paused and is seeked to the playhead
/// on every frame.
pub struct PlaybackController<R: AnimationRuntime> {
    subject: SubjectId,
    kind: SubjectKind,
    queue: AnimationQueue,
    opts: PlaybackOpts,
    compile_opts: CompileOpts,
    state: PlaybackState,
    pause_cause: Option<PauseCause>,
    signals: HostSignals,
    visible: bool,
    compiled: Option<CompiledTimeline<R>>,
    cache: CacheState,
    clock: FrameClock,
    listeners: Vec<(SubscriptionId, TickListener)>,
    next_listener: u64,
}

impl<R: AnimationRuntime> PlaybackController<R> {
    /// Idle, invisible controller with nothing compiled.
    pub fn new(
        subject: SubjectId,
        kind: SubjectKind,
        queue: AnimationQueue,
        opts: PlaybackOpts,
    ) -> Self {
        Self {
            subject,
            kind,
            queue,
            opts,
            compile_opts: CompileOpts::default(),
            state: PlaybackState::Idle,
            pause_cause: None,
            signals: HostSignals::default(),
            visible: false,
            compiled: None,
            cache: CacheState::Absent,
            clock: FrameClock::new(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Override the compiler switches.
    pub fn with_compile_opts(mut self, compile_opts: CompileOpts) -> Self {
        self.compile_opts = compile_opts;
        self
    }

    /// Subject this controller plays.
    pub fn subject(&self) -> &SubjectId {
        &self.subject
    }

    /// Current queue.
    pub fn queue(&self) -> &AnimationQueue {
        &self.queue
    }

    /// Current state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether the compiled timeline is current.
    pub fn cache_state(&self) -> CacheState {
        self.cache
    }

    /// Last host signals seen.
    pub fn signals(&self) -> HostSignals {
        self.signals
    }

    /// Last visibility reported by the host.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// `true` while the controller wants [`PlaybackController::tick`] calls.
    pub fn is_frame_scheduled(&self) -> bool {
        self.clock.is_scheduled()
    }

    /// Display length of the current queue (the scheduler's total, floor included).
    pub fn total_duration_ms(&self) -> Millis {
        schedule(&self.queue).total_duration_ms()
    }

    /// Playhead as reported to subscribers: clamped at the display length.
    pub fn current_time_ms(&self) -> Millis {
        self.clock.position_ms().min(self.reported_limit_ms())
    }

    /// Receive a [`PlaybackTick`] on every frame and state change.
    pub fn subscribe(&mut self, listener: impl FnMut(PlaybackTick) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    /// Replace the queue. A compiled timeline built from a different queue becomes stale.
    pub fn set_queue(&mut self, queue: AnimationQueue) {
        self.queue = queue;
        if let Some(compiled) = &self.compiled {
            self.cache = if compiled.fingerprint == self.queue.fingerprint() {
                CacheState::Compiled
            } else {
                CacheState::Stale
            };
            tracing::trace!(subject = %self.subject, cache = ?self.cache, "queue replaced");
        }
    }

    /// Visibility change reported by the host.
    ///
    /// Becoming visible arms autoplay; leaving the viewport disarms a waiting subject and pauses
    /// a playing one.
    pub fn set_visible(
        &mut self,
        host: &mut PlaybackHost<R>,
        visible: bool,
        signals: HostSignals,
    ) {
        self.visible = visible;
        self.signals = signals;
        if visible {
            if self.state == PlaybackState::Idle && self.opts.autoplay {
                self.transition(PlaybackState::Armed);
            }
        } else {
            match self.state {
                PlaybackState::Armed => self.transition(PlaybackState::Idle),
                PlaybackState::Playing => self.pause(),
                // Out of view, an unblock must not resume on its own.
                PlaybackState::Paused => self.pause_cause = Some(PauseCause::User),
                _ => {}
            }
        }
        self.apply_signals(host);
    }

    /// Host readiness change.
    pub fn update_signals(&mut self, host: &mut PlaybackHost<R>, signals: HostSignals) {
        self.signals = signals;
        self.apply_signals(host);
    }

    fn apply_signals(&mut self, host: &mut PlaybackHost<R>) {
        match (self.state, self.pause_cause) {
            (PlaybackState::Armed, _) if self.signals.ready && !self.signals.blocked => {
                self.play(host);
            }
            (PlaybackState::Playing, _) if self.signals.blocked => {
                let progress = self.progress();
                self.clock.cancel();
                self.pause_cause = Some(PauseCause::Blocked { progress });
                self.transition(PlaybackState::Paused);
                self.broadcast();
            }
            (PlaybackState::Paused, Some(PauseCause::Blocked { progress }))
                if !self.signals.blocked =>
            {
                if progress <= 0.0 {
                    self.restart(host);
                } else if self.ensure_compiled(host) {
                    let at = progress * self.content_end_ms();
                    self.seek(host, at);
                    self.resume();
                } else {
                    self.park();
                }
            }
            _ => {}
        }
    }

    /// Start or resume playback.
    ///
    /// A user pause resumes from the playhead. Anything else restarts from 0 on a freshly
    /// compiled timeline. While the host is blocked the request is parked and replayed once the
    /// block clears.
    pub fn play(&mut self, host: &mut PlaybackHost<R>) {
        if self.signals.blocked {
            let progress = match self.pause_cause {
                Some(PauseCause::User) => self.progress(),
                _ => 0.0,
            };
            self.clock.cancel();
            self.pause_cause = Some(PauseCause::Blocked { progress });
            self.transition(PlaybackState::Paused);
            return;
        }
        if self.state == PlaybackState::Paused
            && self.pause_cause == Some(PauseCause::User)
            && self.cache == CacheState::Compiled
        {
            self.resume();
            return;
        }
        self.restart(host);
    }

    /// User pause. Only a playing subject pauses.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.clock.cancel();
        self.pause_cause = Some(PauseCause::User);
        self.transition(PlaybackState::Paused);
        self.broadcast();
    }

    /// Move the playhead to `time_ms`, compiling first when needed. Playing subjects keep
    /// playing from there; a completed subject becomes paused.
    pub fn seek(&mut self, host: &mut PlaybackHost<R>, time_ms: Millis) {
        if !self.ensure_compiled(host) {
            return;
        }
        self.clock.set_position(time_ms.min(self.clock_limit_ms()));
        self.seek_runtime();
        if self.state == PlaybackState::Completed {
            self.pause_cause = Some(PauseCause::User);
            self.transition(PlaybackState::Paused);
        }
        self.broadcast();
    }

    /// One animation frame. Returns the broadcast tick, or `None` when nothing is scheduled.
    pub fn tick(&mut self, now_ms: Millis) -> Option<PlaybackTick> {
        if self.state != PlaybackState::Playing || self.compiled.is_none() {
            return None;
        }
        let limit = self.clock_limit_ms();
        self.clock.advance(now_ms, limit)?;
        self.seek_runtime();

        if self.clock.reached(limit) {
            if self.opts.loop_preview {
                self.clock.rewind();
                self.seek_runtime();
            } else {
                self.clock.cancel();
                self.transition(PlaybackState::Completed);
            }
        }
        Some(self.broadcast())
    }

    /// Stop scheduling frames. The state and playhead are left alone.
    pub fn cancel_frame_loop(&mut self) {
        if self.clock.is_scheduled() {
            tracing::trace!(subject = %self.subject, "frame loop canceled");
        }
        self.clock.cancel();
    }

    /// Kill the timeline, revert the text split and clear inline state. Safe to repeat.
    pub fn reset(&mut self, host: &mut PlaybackHost<R>) {
        let was_active = self.state != PlaybackState::Idle || self.clock.position_ms() > 0.0;
        self.teardown(host);
        self.clock.cancel();
        self.clock.set_position(0.0);
        self.pause_cause = None;
        self.transition(PlaybackState::Idle);
        if was_active {
            self.broadcast();
        }
    }

    fn restart(&mut self, host: &mut PlaybackHost<R>) {
        self.teardown(host);
        if !self.ensure_compiled(host) {
            self.park();
            return;
        }
        self.clock.set_position(0.0);
        self.seek_runtime();
        self.resume();
    }

    fn resume(&mut self) {
        self.pause_cause = None;
        self.clock.start();
        self.transition(PlaybackState::Playing);
        self.broadcast();
    }

    /// Nothing to play (the target is gone): stop scheduling and fall back to idle.
    fn park(&mut self) {
        self.clock.cancel();
        self.pause_cause = None;
        if self.state != PlaybackState::Idle {
            self.transition(PlaybackState::Idle);
            self.broadcast();
        }
    }

    fn ensure_compiled(&mut self, host: &mut PlaybackHost<R>) -> bool {
        if self.cache == CacheState::Compiled {
            return true;
        }
        self.teardown(host);

        let resolved = ResolvedTarget::resolve(host.resolver.as_ref(), &self.subject, self.kind);
        let Some(target) = resolved else {
            tracing::debug!(subject = %self.subject, "target not mounted, playback skipped");
            return false;
        };
        let splitter = host
            .splitter
            .as_deref_mut()
            .map(|s| s as &mut dyn TextSplitter<R::Target>);
        self.compiled = compile(
            &mut host.runtime,
            &target,
            &self.queue,
            splitter,
            &self.compile_opts,
        );
        if self.compiled.is_some() {
            self.cache = CacheState::Compiled;
        }
        self.compiled.is_some()
    }

    fn teardown(&mut self, host: &mut PlaybackHost<R>) {
        if let Some(mut compiled) = self.compiled.take() {
            compiled.teardown(&mut host.runtime);
        }
        self.cache = CacheState::Absent;
    }

    fn seek_runtime(&mut self) {
        let at = ms_to_secs(self.clock.position_ms());
        if let Some(compiled) = self.compiled.as_mut() {
            compiled.timeline.seek(at);
        }
    }

    fn emphasis_infinite(&self) -> bool {
        self.compiled
            .as_ref()
            .map_or_else(|| self.queue.emphasis_infinite(), |c| c.schedule.emphasis_infinite)
    }

    /// End of the content. Once compiled this is the runtime's own end, which also covers
    /// repeats and per-character stagger.
    fn content_end_ms(&self) -> Millis {
        match &self.compiled {
            Some(c) => c
                .schedule
                .content_end
                .max(secs_to_ms(c.timeline.duration_s())),
            None => schedule(&self.queue).content_end,
        }
    }

    fn reported_limit_ms(&self) -> Millis {
        self.compiled.as_ref().map_or_else(
            || self.total_duration_ms(),
            |c| c.schedule.total_duration_ms(),
        )
    }

    /// Infinite emphasis never completes; the runtime keeps looping past the display length.
    fn clock_limit_ms(&self) -> Millis {
        if self.emphasis_infinite() {
            f64::INFINITY
        } else {
            self.content_end_ms()
        }
    }

    /// Playhead as a fraction of the content. Infinite emphasis can run past 1.
    fn progress(&self) -> f64 {
        let end = self.content_end_ms();
        if end <= 0.0 {
            return 0.0;
        }
        let p = self.clock.position_ms() / end;
        if self.emphasis_infinite() { p } else { p.min(1.0) }
    }

    fn transition(&mut self, next: PlaybackState) {
        if self.state != next {
            tracing::trace!(
                subject = %self.subject,
                from = self.state.name(),
                to = next.name(),
                "playback state"
            );
            self.state = next;
        }
    }

    fn broadcast(&mut self) -> PlaybackTick {
        let tick = PlaybackTick {
            current_time_ms: self.current_time_ms(),
            is_playing: self.state.is_playing(),
        };
        for (_, listener) in &mut self.listeners {
            listener(tick);
        }
        tick
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/controller.rs"]
mod tests;
