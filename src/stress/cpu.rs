use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::cancel::CancelToken;
use super::duty::{burn, DutyCycle, DutyStats};

/// Iterations between clock checks inside a work quantum
const BATCH: u32 = 2_000;

pub struct CpuWorker {
    pub duty: DutyCycle,
}

impl CpuWorker {
    pub fn new(duty: DutyCycle) -> Self {
        Self { duty }
    }

    /// Burn CPU until cancelled, holding the configured duty cycle.
    pub fn run(&self, token: &CancelToken) -> DutyStats {
        info!(target_percent = self.duty.fraction() * 100.0, "cpu load started");
        let mut rng = StdRng::from_entropy();
        let mut stats = DutyStats::default();
        let quantum = self.duty.work_quantum();

        while !token.is_cancelled() {
            let started = Instant::now();
            while started.elapsed() < quantum {
                burn(&mut rng, BATCH);
            }
            let worked = started.elapsed();

            let idle = self.duty.idle_after(worked);
            let idle_started = Instant::now();
            let cancelled = token.sleep(idle);
            stats.record(worked, idle_started.elapsed());
            if cancelled {
                break;
            }
        }

        debug!(cycles = stats.cycles, achieved = stats.achieved(), "cpu load stopped");
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stress::cancel::CancelSource;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn stops_on_cancel_and_reports_cycles() {
        let mut source = CancelSource::new();
        let token = source.token();
        let worker = CpuWorker::new(DutyCycle::new(50, Duration::from_millis(10)));
        let handle = thread::spawn(move || worker.run(&token));

        thread::sleep(Duration::from_millis(100));
        source.cancel();
        let stats = handle.join().unwrap();
        assert!(stats.cycles >= 1);
        assert!(stats.busy >= Duration::from_millis(5));
    }

    #[test]
    fn cancelled_token_does_no_work() {
        let mut source = CancelSource::new();
        source.cancel();
        let worker = CpuWorker::new(DutyCycle::new(80, Duration::from_millis(10)));
        assert_eq!(worker.run(&source.token()).cycles, 0);
    }
}
