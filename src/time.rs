use std::time::Duration;

pub use std::time::Instant;

/// Turns host timestamps into the elapsed-seconds value that drives the scene.
///
/// Timestamps are expected to increase; one that goes backwards is ignored so
/// animation time never rewinds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    last: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, timestamp: Duration) -> f32 {
        if timestamp < self.last {
            log::warn!(
                "Host timestamp went backwards ({:?} < {:?}); holding time",
                timestamp,
                self.last
            );
        } else {
            self.last = timestamp;
        }
        self.elapsed()
    }

    pub fn elapsed(&self) -> f32 {
        self.last.as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_uses_host_timestamp_in_seconds() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(Duration::from_millis(1500)), 1.5);
        assert_eq!(clock.advance(Duration::from_millis(1750)), 1.75);
    }

    #[test]
    fn backwards_timestamp_holds_time() {
        let mut clock = FrameClock::new();
        clock.advance(Duration::from_secs(3));
        assert_eq!(clock.advance(Duration::from_secs(2)), 3.0);
        assert_eq!(clock.elapsed(), 3.0);
        assert_eq!(clock.advance(Duration::from_secs(4)), 4.0);
    }
}
