/// What a clock step produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockSignal {
    Running(u32),
    /// Time left is within `[1, urgent_threshold]`.
    Urgent(u32),
    /// Reached zero. Emitted once.
    Expired,
    /// Already expired; nothing changed.
    Idle,
}

/// Discrete countdown for Rush mode. The owner calls [`Clock::tick`] once per
/// tick period; wrong answers call [`Clock::penalize`] out of band.
#[derive(Clone, Debug)]
pub struct Clock {
    total: u32,
    remaining: u32,
    urgent_threshold: u32,
    expired: bool,
}

impl Clock {
    pub fn new(total: u32, urgent_threshold: u32) -> Self {
        Self {
            total,
            remaining: total,
            urgent_threshold,
            expired: total == 0,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn is_urgent(&self) -> bool {
        !self.expired && self.remaining >= 1 && self.remaining <= self.urgent_threshold
    }

    /// Fraction of the starting time still left.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.remaining as f64 / self.total as f64
    }

    pub fn tick(&mut self) -> ClockSignal {
        self.step(1)
    }

    pub fn penalize(&mut self, seconds: u32) -> ClockSignal {
        self.step(seconds)
    }

    fn step(&mut self, seconds: u32) -> ClockSignal {
        if self.expired {
            return ClockSignal::Idle;
        }
        self.remaining = self.remaining.saturating_sub(seconds);
        if self.remaining == 0 {
            self.expired = true;
            ClockSignal::Expired
        } else if self.is_urgent() {
            ClockSignal::Urgent(self.remaining)
        } else {
            ClockSignal::Running(self.remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_into_urgent_window() {
        let mut clock = Clock::new(13, 10);
        assert_eq!(clock.tick(), ClockSignal::Running(12));
        assert_eq!(clock.tick(), ClockSignal::Running(11));
        assert_eq!(clock.tick(), ClockSignal::Urgent(10));
        assert!(clock.is_urgent());
    }

    #[test]
    fn expires_exactly_once() {
        let mut clock = Clock::new(2, 10);
        assert_eq!(clock.tick(), ClockSignal::Urgent(1));
        assert_eq!(clock.tick(), ClockSignal::Expired);
        assert_eq!(clock.tick(), ClockSignal::Idle);
        assert_eq!(clock.penalize(3), ClockSignal::Idle);
        assert_eq!(clock.remaining(), 0);
        assert!(!clock.is_urgent());
    }

    #[test]
    fn penalty_clamps_and_can_expire() {
        let mut clock = Clock::new(60, 10);
        assert_eq!(clock.penalize(3), ClockSignal::Running(57));
        let mut short = Clock::new(2, 10);
        assert_eq!(short.penalize(3), ClockSignal::Expired);
        assert_eq!(short.remaining(), 0);
        assert!(short.is_expired());
    }

    #[test]
    fn ratio_tracks_remaining() {
        let mut clock = Clock::new(60, 10);
        assert_eq!(clock.ratio(), 1.0);
        clock.penalize(30);
        assert_eq!(clock.ratio(), 0.5);
        assert_eq!(Clock::new(0, 10).ratio(), 0.0);
    }
}
