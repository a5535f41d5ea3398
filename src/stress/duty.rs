use std::hint::black_box;
use std::time::Duration;

use rand::Rng;

/// Alternates a work quantum with the idle time that keeps the busy share
/// of each cycle at the target fraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DutyCycle {
    fraction: f64,
    period: Duration,
}

impl DutyCycle {
    /// `target_percent` is clamped to 1..=100
    pub fn new(target_percent: u8, period: Duration) -> Self {
        let fraction = target_percent.clamp(1, 100) as f64 / 100.0;
        Self { fraction, period }
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Busy time planned for one cycle
    pub fn work_quantum(&self) -> Duration {
        self.period.mul_f64(self.fraction)
    }

    /// Idle time that complements `worked` to hit the target fraction
    pub fn idle_after(&self, worked: Duration) -> Duration {
        if self.fraction >= 1.0 {
            return Duration::ZERO;
        }
        worked.mul_f64((1.0 - self.fraction) / self.fraction)
    }
}

/// Busy and idle time actually spent
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DutyStats {
    pub busy: Duration,
    pub idle: Duration,
    pub cycles: u64,
}

impl DutyStats {
    pub fn record(&mut self, busy: Duration, idle: Duration) {
        self.busy += busy;
        self.idle += idle;
        self.cycles += 1;
    }

    /// Achieved busy share, 0 before the first cycle
    pub fn achieved(&self) -> f64 {
        let total = self.busy + self.idle;
        if total.is_zero() { 0.0 } else { self.busy.as_secs_f64() / total.as_secs_f64() }
    }
}

/// Floating point busywork on random inputs
pub fn burn<R: Rng>(rng: &mut R, iterations: u32) -> f64 {
    let mut acc = 0.0f64;
    for _ in 0..iterations {
        acc += (rng.gen::<f64>() * 1000.0).sqrt();
        acc += (rng.gen::<f64>() * std::f64::consts::PI).sin();
        acc += (rng.gen::<f64>() + 1.0).ln();
    }
    black_box(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_close(a: Duration, b: Duration) {
        let diff = if a > b { a - b } else { b - a };
        assert!(diff < Duration::from_micros(1), "{a:?} != {b:?}");
    }

    #[test]
    fn quantum_and_idle_complement() {
        let duty = DutyCycle::new(25, Duration::from_millis(100));
        assert_close(duty.work_quantum(), Duration::from_millis(25));
        assert_close(duty.idle_after(Duration::from_millis(25)), Duration::from_millis(75));
        // overrun work is balanced by proportionally longer idle time
        assert_close(duty.idle_after(Duration::from_millis(40)), Duration::from_millis(120));
    }

    #[test]
    fn full_load_never_idles() {
        let duty = DutyCycle::new(100, Duration::from_millis(100));
        assert_eq!(duty.idle_after(Duration::from_secs(1)), Duration::ZERO);
        assert_close(duty.work_quantum(), Duration::from_millis(100));
    }

    #[test]
    fn percent_is_clamped() {
        assert_relative_eq!(DutyCycle::new(0, Duration::from_millis(10)).fraction(), 0.01);
        assert_relative_eq!(DutyCycle::new(250, Duration::from_millis(10)).fraction(), 1.0);
    }

    #[test]
    fn stats_report_achieved_share() {
        let mut stats = DutyStats::default();
        assert_eq!(stats.achieved(), 0.0);
        stats.record(Duration::from_millis(30), Duration::from_millis(70));
        stats.record(Duration::from_millis(30), Duration::from_millis(70));
        assert_eq!(stats.cycles, 2);
        assert_relative_eq!(stats.achieved(), 0.3, epsilon = 1e-9);
    }

    #[test]
    fn burn_produces_finite_work() {
        let value = burn(&mut StdRng::seed_from_u64(4), 1000);
        assert!(value.is_finite() && value > 0.0);
    }
}
