use crate::foundation::core::Millis;

/// Host-driven playhead.
///
/// The host calls [`FrameClock::advance`] once per animation frame with a monotonic timestamp.
/// The first frame after [`FrameClock::start`] only anchors the clock; later frames move the
/// playhead by the elapsed time. Timestamps that go backwards are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameClock {
    scheduled: bool,
    anchor_ms: Option<Millis>,
    position_ms: Millis,
}

impl FrameClock {
    /// Unscheduled clock at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule frames from the current position.
    pub fn start(&mut self) {
        self.scheduled = true;
        self.anchor_ms = None;
    }

    /// Drop the scheduled frame callback. The playhead stays where it is.
    pub fn cancel(&mut self) {
        self.scheduled = false;
        self.anchor_ms = None;
    }

    /// `true` while frames are requested.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Current playhead.
    pub fn position_ms(&self) -> Millis {
        self.position_ms
    }

    /// Move the playhead without touching the schedule. Negative and non-finite values land on 0.
    pub fn set_position(&mut self, ms: Millis) {
        self.position_ms = if ms.is_finite() { ms.max(0.0) } else { 0.0 };
        self.anchor_ms = None;
    }

    /// Jump back to 0 between two frames. The anchor is kept, so the next frame still advances.
    pub fn rewind(&mut self) {
        self.position_ms = 0.0;
    }

    /// Advance to `now_ms`, clamped at `limit_ms`. Returns `None` when no frame is scheduled.
    pub fn advance(&mut self, now_ms: Millis, limit_ms: Millis) -> Option<Millis> {
        if !self.scheduled {
            return None;
        }
        if let Some(anchor) = self.anchor_ms {
            let elapsed = now_ms - anchor;
            if elapsed > 0.0 {
                self.position_ms = (self.position_ms + elapsed).min(limit_ms);
            }
        }
        if self.anchor_ms.is_none_or(|a| now_ms > a) {
            self.anchor_ms = Some(now_ms);
        }
        Some(self.position_ms)
    }

    /// `true` once the playhead sits at `limit_ms`.
    pub fn reached(&self, limit_ms: Millis) -> bool {
        self.position_ms >= limit_ms
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
