use std::thread;
use std::time::{Duration, Instant};

/// A monotonic time source that can also block the current thread
///
/// The control loops only ever touch time through this trait so they can be driven by a
/// simulated clock in tests.
pub trait Clock {
    /// Time since an arbitrary, fixed origin
    fn now(&self) -> Duration;

    fn sleep(&self, duration: Duration);
}

/// Wall clock time
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Measures elapsed time from the last reset
#[derive(Clone, Debug)]
pub struct Timer<C> {
    clock: C,
    start: Duration,
}

impl<C: Clock> Timer<C> {
    pub fn new(clock: C) -> Self {
        let start = clock.now();

        Timer { clock, start }
    }

    pub fn reset(&mut self) {
        self.start = self.clock.now();
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_sub(self.start)
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }
}

/// Paces a loop to a fixed period
///
/// Each call to [`Ticker::wait`] sleeps until the next deadline. If the loop body overran the
/// deadline the schedule starts over from now rather than running the missed ticks back to back.
#[derive(Clone, Debug)]
pub struct Ticker<C> {
    clock: C,
    period: Duration,
    next: Duration,
    last: Duration,
}

impl<C: Clock> Ticker<C> {
    pub fn new(clock: C, period: Duration) -> Self {
        let now = clock.now();

        Ticker {
            clock,
            period,
            next: now + period,
            last: now,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sleeps until the next tick and returns the time since the previous one
    pub fn wait(&mut self) -> Duration {
        let now = self.clock.now();

        if let Some(remaining) = self.next.checked_sub(now) {
            self.clock.sleep(remaining);
            self.next += self.period;
        } else {
            self.next = now + self.period;
        }

        let tick = self.clock.now();
        let dt = tick.saturating_sub(self.last);
        self.last = tick;

        dt
    }
}
