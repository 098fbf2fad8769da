// SPDX-License-Identifier: MIT
//
// Time sources for the animator.
//
// The animation is a pure function of the current time in milliseconds.
// Reading that time through a trait lets tests pin it and lets the host
// freeze it for the pause key without the animator knowing.

use std::time::Instant;

/// A source of monotonic time in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Milliseconds since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
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
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Always the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now_ms(&self) -> f64 {
        self.0
    }
}

/// Wraps another clock and can stop time.
///
/// While paused, `now_ms` keeps returning the instant of the pause. On
/// resume the paused span is subtracted, so the animation continues from
/// where it stopped instead of jumping ahead.
#[derive(Debug, Clone)]
pub struct PausableClock<C> {
    inner: C,
    paused_at: Option<f64>,
    offset: f64,
}

impl<C: Clock> PausableClock<C> {
    #[must_use]
    pub const fn new(inner: C) -> Self {
        Self {
            inner,
            paused_at: None,
            offset: 0.0,
        }
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(self.now_ms());
        }
    }

    pub fn resume(&mut self) {
        if let Some(at) = self.paused_at.take() {
            self.offset = self.inner.now_ms() - at;
        }
    }

    /// Flip between paused and running. Returns `true` if now paused.
    pub fn toggle(&mut self) -> bool {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
        self.is_paused()
    }

    #[must_use]
    pub const fn inner(&self) -> &C {
        &self.inner
    }

    pub const fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }
}

impl<C: Clock> Clock for PausableClock<C> {
    fn now_ms(&self) -> f64 {
        self.paused_at
            .unwrap_or_else(|| self.inner.now_ms() - self.offset)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(a >= 0.0);
        assert!(b >= a);
    }

    #[test]
    fn fixed_clock() {
        assert!((FixedClock(1234.5).now_ms() - 1234.5).abs() < f64::EPSILON);
    }

    #[test]
    fn pausable_clock_freezes_and_continues() {
        let mut clock = PausableClock::new(FixedClock(100.0));
        assert!((clock.now_ms() - 100.0).abs() < f64::EPSILON);

        assert!(clock.toggle());
        clock.inner_mut().0 = 250.0;
        assert!((clock.now_ms() - 100.0).abs() < f64::EPSILON);

        assert!(!clock.toggle());
        // Resumes at the paused instant, then advances with the inner clock.
        assert!((clock.now_ms() - 100.0).abs() < f64::EPSILON);
        clock.inner_mut().0 = 300.0;
        assert!((clock.now_ms() - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pause_and_resume_are_idempotent() {
        let mut clock = PausableClock::new(FixedClock(10.0));
        clock.pause();
        clock.inner_mut().0 = 20.0;
        clock.pause();
        assert!((clock.now_ms() - 10.0).abs() < f64::EPSILON);
        clock.resume();
        clock.resume();
        assert!(!clock.is_paused());
        assert!((clock.now_ms() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn boxed_clock() {
        let clock: Box<dyn Clock> = Box::new(FixedClock(5.0));
        assert!((clock.now_ms() - 5.0).abs() < f64::EPSILON);
    }
}
