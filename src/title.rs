use std::time::{Duration, Instant};

/// Cycles through a list of titles, one step per interval. Each instance
/// owns its own deadline; nothing is shared between rotators.
pub struct TitleRotator {
    titles: Vec<String>,
    index: usize,
    interval: Duration,
    next_at: Option<Instant>,
}

impl TitleRotator {
    pub fn new(titles: Vec<String>, interval: Duration) -> Self {
        Self {
            titles,
            index: 0,
            interval: interval.max(Duration::from_millis(1)),
            next_at: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.next_at = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_at.is_some()
    }

    pub fn current(&self) -> Option<&str> {
        self.titles.get(self.index).map(String::as_str)
    }

    /// Steps past every elapsed interval. Returns true if the title changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(mut due) = self.next_at else {
            return false;
        };
        if self.titles.len() < 2 {
            return false;
        }
        let before = self.index;
        while now >= due {
            self.index = (self.index + 1) % self.titles.len();
            due += self.interval;
        }
        self.next_at = Some(due);
        self.index != before
    }
}
