/// Frame timing: turns monotonic timestamps into per-frame deltas.

use std::time::Instant;

#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        FrameClock { last: None }
    }

    /// Milliseconds since the previous tick.  The first tick only seeds the
    /// clock and returns 0, so the first frame never sees the whole uptime.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last = Some(now_ms);
        delta
    }
}

/// Host-side timestamp source, in milliseconds since it was created.
pub struct Timestamps {
    origin: Instant,
}

impl Timestamps {
    pub fn start() -> Self {
        Timestamps { origin: Instant::now() }
    }

    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
