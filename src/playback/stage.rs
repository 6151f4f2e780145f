use std::collections::BTreeMap;

use crate::{
    compile::runtime::{AnimationRuntime, SubjectKind},
    foundation::core::{Millis, SubjectId},
    foundation::error::{StagecueError, StagecueResult},
    playback::controller::{
        HostSignals, PlaybackController, PlaybackHost, PlaybackOpts, PlaybackTick,
        SubscriptionId,
    },
    queue::model::AnimationQueue,
};

/// Every subject of a document, sharing one host and one set of signals.
pub struct Stage<R: AnimationRuntime> {
    host: PlaybackHost<R>,
    opts: PlaybackOpts,
    signals: HostSignals,
    controllers: BTreeMap<SubjectId, PlaybackController<R>>,
}

impl<R: AnimationRuntime> Stage<R> {
    /// Empty stage; every controller shares `opts`.
    pub fn new(host: PlaybackHost<R>, opts: PlaybackOpts) -> Self {
        Self {
            host,
            opts,
            signals: HostSignals::default(),
            controllers: BTreeMap::new(),
        }
    }

    /// Shared collaborators.
    pub fn host(&self) -> &PlaybackHost<R> {
        &self.host
    }

    /// Shared collaborators, for swapping the resolver or splitter.
    pub fn host_mut(&mut self) -> &mut PlaybackHost<R> {
        &mut self.host
    }

    /// Last signals fanned out.
    pub fn signals(&self) -> HostSignals {
        self.signals
    }

    /// Number of subjects.
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// `true` when no subject is registered.
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Registered subjects, in id order.
    pub fn subjects(&self) -> impl Iterator<Item = &SubjectId> {
        self.controllers.keys()
    }

    /// Controller of `subject`.
    pub fn controller(&self, subject: &SubjectId) -> Option<&PlaybackController<R>> {
        self.controllers.get(subject)
    }

    /// Like [`Stage::controller`], for hosts that treat an unknown subject as an error.
    pub fn try_controller(&self, subject: &SubjectId) -> StagecueResult<&PlaybackController<R>> {
        self.controllers
            .get(subject)
            .ok_or_else(|| StagecueError::playback(format!("unknown subject '{subject}'")))
    }

    /// Register `subject`, or replace its queue when it is already on stage.
    pub fn upsert(&mut self, subject: SubjectId, kind: SubjectKind, queue: AnimationQueue) {
        if let Some(ctl) = self.controllers.get_mut(&subject) {
            ctl.set_queue(queue);
            return;
        }
        let ctl = PlaybackController::new(subject.clone(), kind, queue, self.opts.clone());
        self.controllers.insert(subject, ctl);
    }

    /// Take `subject` off stage, cleaning up whatever it left on the runtime.
    pub fn remove(&mut self, subject: &SubjectId) -> bool {
        match self.controllers.remove(subject) {
            Some(mut ctl) => {
                ctl.reset(&mut self.host);
                true
            }
            None => false,
        }
    }

    /// [`PlaybackController::play`] for `subject`; unknown subjects are ignored.
    pub fn play(&mut self, subject: &SubjectId) {
        self.with(subject, |ctl, host| ctl.play(host));
    }

    /// [`PlaybackController::pause`] for `subject`.
    pub fn pause(&mut self, subject: &SubjectId) {
        self.with(subject, |ctl, _| ctl.pause());
    }

    /// [`PlaybackController::seek`] for `subject`.
    pub fn seek(&mut self, subject: &SubjectId, time_ms: Millis) {
        self.with(subject, |ctl, host| ctl.seek(host, time_ms));
    }

    /// [`PlaybackController::reset`] for `subject`.
    pub fn reset(&mut self, subject: &SubjectId) {
        self.with(subject, |ctl, host| ctl.reset(host));
    }

    /// Visibility change for `subject`, with the stage's current signals.
    pub fn set_visible(&mut self, subject: &SubjectId, visible: bool) {
        let signals = self.signals;
        self.with(subject, |ctl, host| ctl.set_visible(host, visible, signals));
    }

    /// Listen to `subject`; `None` for unknown subjects.
    pub fn subscribe(
        &mut self,
        subject: &SubjectId,
        listener: impl FnMut(PlaybackTick) + 'static,
    ) -> Option<SubscriptionId> {
        self.controllers
            .get_mut(subject)
            .map(|ctl| ctl.subscribe(listener))
    }

    /// Fan a signal change out to every subject.
    pub fn update_signals(&mut self, signals: HostSignals) {
        self.signals = signals;
        for ctl in self.controllers.values_mut() {
            ctl.update_signals(&mut self.host, signals);
        }
    }

    /// One animation frame for every playing subject.
    pub fn tick(&mut self, now_ms: Millis) -> Vec<(SubjectId, PlaybackTick)> {
        self.controllers
            .iter_mut()
            .filter_map(|(id, ctl)| ctl.tick(now_ms).map(|t| (id.clone(), t)))
            .collect()
    }

    /// Stop every frame loop, for hosts tearing down their frame callback.
    pub fn cancel_frame_loops(&mut self) {
        self.controllers
            .values_mut()
            .for_each(PlaybackController::cancel_frame_loop);
    }

    /// Reset every subject.
    pub fn reset_all(&mut self) {
        for ctl in self.controllers.values_mut() {
            ctl.reset(&mut self.host);
        }
    }

    fn with(
        &mut self,
        subject: &SubjectId,
        f: impl FnOnce(&mut PlaybackController<R>, &mut PlaybackHost<R>),
    ) {
        match self.controllers.get_mut(subject) {
            Some(ctl) => f(ctl, &mut self.host),
            None => tracing::debug!(%subject, "no controller for subject"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/stage.rs"]
mod tests;
