//! Frame scheduling. The animator asks a [`FrameHost`] for frames and gets
//! back opaque tokens; the host hands a token back when that frame is due.
//! [`FramePacer`] paces real frames to an fps cap, [`ImmediateHost`] makes
//! every request due at once for headless runs and tests.

use std::time::{Duration, Instant};

/// Opaque handle for one requested frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

/// "Call me back before the next frame." The host hands out one token per
/// request and drops it again on `cancel_frame`.
pub trait FrameHost {
    fn request_frame(&mut self) -> FrameToken;
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Fixed-cadence host for the terminal loop. At most one frame is pending.
pub struct FramePacer {
    interval: Duration,
    next_id: u64,
    pending: Option<(FrameToken, Instant)>,
    last_fire: Option<Instant>,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        let fps = fps.clamp(1, 240);
        Self {
            interval: Duration::from_secs_f64(1.0 / fps as f64),
            next_id: 1,
            pending: None,
            last_fire: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn pending(&self) -> Option<FrameToken> {
        self.pending.map(|(t, _)| t)
    }

    /// Pending token if its deadline has passed.
    pub fn poll_due(&mut self, now: Instant) -> Option<FrameToken> {
        match self.pending {
            Some((token, due)) if now >= due => {
                self.pending = None;
                self.last_fire = Some(now);
                Some(token)
            }
            _ => None,
        }
    }

    /// Sleeps at most `max_wait` for the pending frame to come due.
    pub fn wait(&mut self, max_wait: Duration) -> Option<FrameToken> {
        let now = Instant::now();
        if let Some(token) = self.poll_due(now) {
            return Some(token);
        }
        let (_, due) = self.pending?;
        let nap = due.saturating_duration_since(now).min(max_wait);
        spin_sleep(nap, now);
        self.poll_due(Instant::now())
    }
}

impl FrameHost for FramePacer {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_id);
        self.next_id += 1;
        let base = self.last_fire.unwrap_or_else(Instant::now);
        self.pending = Some((token, base + self.interval));
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending.map(|(t, _)| t) == Some(token) {
            self.pending = None;
        }
    }
}

/// Host whose requested frame is due immediately. Drives headless runs.
#[derive(Default)]
pub struct ImmediateHost {
    next_id: u64,
    pending: Option<FrameToken>,
}

impl ImmediateHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the pending frame, if any.
    pub fn take_due(&mut self) -> Option<FrameToken> {
        self.pending.take()
    }
}

impl FrameHost for ImmediateHost {
    fn request_frame(&mut self) -> FrameToken {
        self.next_id += 1;
        let token = FrameToken(self.next_id);
        self.pending = Some(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending == Some(token) {
            self.pending = None;
        }
    }
}

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique() {
        let mut p = FramePacer::new(60);
        let a = p.request_frame();
        let b = p.request_frame();
        assert_ne!(a, b);
        assert_eq!(p.pending(), Some(b));
    }

    #[test]
    fn cancel_drops_only_matching_token() {
        let mut p = FramePacer::new(60);
        let a = p.request_frame();
        let b = p.request_frame();
        p.cancel_frame(a);
        assert_eq!(p.pending(), Some(b));
        p.cancel_frame(b);
        assert_eq!(p.pending(), None);
    }

    #[test]
    fn frame_fires_after_interval() {
        let mut p = FramePacer::new(100);
        let t0 = Instant::now();
        let tok = p.request_frame();
        assert_eq!(p.poll_due(t0), None);
        assert_eq!(p.poll_due(t0 + Duration::from_millis(50)), Some(tok));
        assert_eq!(p.pending(), None);
    }

    #[test]
    fn cancelled_frame_never_fires() {
        let mut p = FramePacer::new(240);
        let tok = p.request_frame();
        p.cancel_frame(tok);
        assert_eq!(p.wait(Duration::from_millis(10)), None);
    }

    #[test]
    fn immediate_host_hands_out_pending_once() {
        let mut h = ImmediateHost::new();
        assert_eq!(h.take_due(), None);
        let tok = h.request_frame();
        assert_eq!(h.take_due(), Some(tok));
        assert_eq!(h.take_due(), None);
        let tok = h.request_frame();
        h.cancel_frame(tok);
        assert_eq!(h.take_due(), None);
    }

    #[test]
    fn fps_is_clamped() {
        assert_eq!(FramePacer::new(0).interval(), Duration::from_secs(1));
    }
}
