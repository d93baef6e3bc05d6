//! Countdown timer over a wrapping 32-bit millisecond tick.

/// Source of the millisecond tick a [`Timer`] counts against.
///
/// The value is free running and wraps around `u32::MAX`, roughly every 49.7
/// days.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Monotonic clock counting from its creation.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            epoch: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now_ms(&self) -> u32 {
        // truncation is the wrap
        self.epoch.elapsed().as_millis() as u32
    }
}

/// A deadline on a [`Clock`].
///
/// A zeroed timer is armed with [`countdown_ms`](Timer::countdown_ms) and
/// queried with [`expired`](Timer::expired) or
/// [`remaining_ms`](Timer::remaining_ms). Expiry is still reported correctly
/// when the tick wraps between arming and checking. Durations are capped at
/// [`Timer::MAX_MS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timer {
    end_time: u32,
    overflowed: bool,
}

impl Timer {
    /// Longest countdown, about 24.8 days. Longer durations are clamped to it.
    pub const MAX_MS: u32 = i32::MAX as u32;

    pub fn new() -> Self {
        Timer::default()
    }

    pub fn countdown_ms<C: Clock>(&mut self, clock: &C, timeout_ms: u32) {
        let now = clock.now_ms();
        self.end_time = now.wrapping_add(timeout_ms.min(Self::MAX_MS));
        self.overflowed = self.end_time < now;
    }

    pub fn countdown<C: Clock>(&mut self, clock: &C, timeout_secs: u32) {
        self.countdown_ms(clock, timeout_secs.saturating_mul(1000).min(Self::MAX_MS));
    }

    pub fn expired<C: Clock>(&self, clock: &C) -> bool {
        self.left(clock.now_ms()) < 0
    }

    pub fn remaining_ms<C: Clock>(&self, clock: &C) -> u32 {
        self.left(clock.now_ms()).max(0) as u32
    }

    fn left(&self, now: u32) -> i32 {
        let left = if self.overflowed {
            u32::MAX.wrapping_sub(now).wrapping_add(self.end_time)
        } else {
            self.end_time.wrapping_sub(now)
        };
        left as i32
    }
}
