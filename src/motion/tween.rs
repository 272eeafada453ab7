use super::ease::Ease;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Never,
    Infinite,
}

/// A single scalar tween on a seconds timeline. The tween holds no target;
/// callers sample it and write the value wherever it belongs.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    duration: f64,
    repeat: Repeat,
    yoyo: bool,
    ease: Ease,
    started_at: f64,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration_seconds: f64) -> Self {
        Self {
            from,
            to,
            duration: duration_seconds.max(0.0),
            repeat: Repeat::Never,
            yoyo: false,
            ease: Ease::Linear,
            started_at: 0.0,
        }
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn starting_at(mut self, seconds: f64) -> Self {
        self.started_at = seconds;
        self
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.from.min(self.to), self.from.max(self.to))
    }

    /// Total number of cycles, `None` when repeating forever.
    pub fn cycles(&self) -> Option<u64> {
        match self.repeat {
            Repeat::Never => Some(1),
            Repeat::Infinite => None,
        }
    }

    /// Linear progress inside the current cycle with yoyo direction applied,
    /// before easing.
    pub fn progress(&self, now: f64) -> f64 {
        let elapsed = now - self.started_at;
        if elapsed <= 0.0 {
            return 0.0;
        }

        let (cycle, local) = if self.duration <= 0.0 {
            (self.cycles().map_or(0, |cycles| cycles - 1), 1.0)
        } else {
            let position = elapsed / self.duration;
            let cycle = position.floor() as u64;
            match self.cycles() {
                Some(cycles) if cycle >= cycles => (cycles - 1, 1.0),
                _ => (cycle, position - position.floor()),
            }
        };

        if self.yoyo && cycle % 2 == 1 {
            1.0 - local
        } else {
            local
        }
    }

    pub fn sample(&self, now: f64) -> f64 {
        let eased = self.ease.apply(self.progress(now));
        let (low, high) = self.bounds();
        (self.from + (self.to - self.from) * eased).clamp(low, high)
    }
}
