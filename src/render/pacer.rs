use std::time::Duration;

/// Slows rendered ticks down to a watchable speed.
///
/// Pacing is cosmetic; the simulation never depends on it.
pub trait Pacer {
    fn pause(&mut self);
}

/// Sleep for a fixed duration after every rendered tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::from_millis(100)
    }
}

impl Pacer for FixedDelay {
    fn pause(&mut self) {
        if !self.0.is_zero() {
            std::thread::sleep(self.0);
        }
    }
}

/// Never wait
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDelay;

impl Pacer for NoDelay {
    fn pause(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_fixed_delay_sleeps() {
        let mut pacer = FixedDelay::from_millis(20);
        let start = Instant::now();
        pacer.pause();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_default_delay() {
        assert_eq!(FixedDelay::default(), FixedDelay(Duration::from_millis(100)));
    }
}
