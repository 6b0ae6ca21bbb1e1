use jiff::Timestamp;

pub trait Clock: Send + Sync {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Wall-clock reading split into the two time fields of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    /// Whole seconds elapsed since the epoch.
    pub sec: u64,
    /// Millisecond within the current second, `0..=999`.
    pub msec: u16,
}

impl Stamp {
    /// Splits `now` relative to `epoch`.
    ///
    /// Instants before the epoch saturate to second zero.
    pub fn since(epoch: Timestamp, now: Timestamp) -> Self {
        let sec = now.as_second().saturating_sub(epoch.as_second()).max(0) as u64;
        let msec = now.subsec_millisecond().clamp(0, 999) as u16;
        Self { sec, msec }
    }

    /// Reads `clock` once and splits the result relative to `epoch`.
    pub fn read<C: Clock + ?Sized>(clock: &C, epoch: Timestamp) -> Self {
        Self::since(epoch, clock.now())
    }
}

#[cfg(any(test, feature = "test-clock"))]
pub mod test_clock {
    use crate::clock::Clock;
    use jiff::{SignedDuration, Timestamp};
    use std::sync::{Arc, Mutex};

    /// A manually driven clock for tests.
    #[derive(Clone)]
    pub struct TestClock {
        inner: Arc<Mutex<Timestamp>>,
    }

    impl TestClock {
        pub fn new(now: Timestamp) -> Self {
            Self {
                inner: Arc::new(Mutex::new(now)),
            }
        }

        pub fn advance(&self, by: SignedDuration) {
            let mut now = self
                .inner
                .lock()
                .expect("test clock lock should not be poisoned");
            *now = now
                .checked_add(by)
                .expect("advanced test clock stays in range");
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> Timestamp {
            *self
                .inner
                .lock()
                .expect("test clock lock should not be poisoned")
        }
    }

    #[test]
    fn test_clock_works() {
        let base = Timestamp::from_second(0).unwrap();
        let clock = TestClock::new(base);
        assert_eq!(clock.now(), base);

        clock.advance(SignedDuration::from_millis(1_500));
        assert_eq!(clock.now(), Timestamp::from_millisecond(1_500).unwrap());
    }
}
