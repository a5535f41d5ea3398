use std::collections::HashSet;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use clap::ValueEnum;
use crossbeam_channel::{unbounded, Receiver};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::cancel::CancelSource;
use super::cpu::CpuWorker;
use super::duty::DutyCycle;
use super::ram::{RamConfig, RamWorker};
use crate::error::StressError;

pub const CPU_PERCENT_RANGE: (u8, u8) = (10, 100);
pub const RAM_PERCENT_RANGE: (u8, u8) = (10, 90);
pub const MIN_DURATION: Duration = Duration::from_secs(10);

/// Length of one duty cycle for CPU workers
const DUTY_PERIOD: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TestKind {
    #[default]
    CpuRam,
    CpuOnly,
    RamOnly,
}

impl TestKind {
    pub fn loads_cpu(self) -> bool {
        matches!(self, TestKind::CpuRam | TestKind::CpuOnly)
    }

    pub fn loads_ram(self) -> bool {
        matches!(self, TestKind::CpuRam | TestKind::RamOnly)
    }
}

/// What to run and for how long
#[derive(Clone, Debug, PartialEq)]
pub struct StressPlan {
    pub cpu_percent: u8,
    pub ram_percent: u8,
    pub duration: Duration,
    pub kind: TestKind,
    pub cpu_threads: usize,
}

impl StressPlan {
    /// Pull every field into its allowed range, warning about each change.
    pub fn normalized(mut self) -> Self {
        let clamp = |name: &str, value: u8, (lo, hi): (u8, u8)| {
            let clamped = value.clamp(lo, hi);
            if clamped != value {
                warn!(value, clamped, "{name} out of range");
            }
            clamped
        };
        self.cpu_percent = clamp("cpu percent", self.cpu_percent, CPU_PERCENT_RANGE);
        self.ram_percent = clamp("ram percent", self.ram_percent, RAM_PERCENT_RANGE);
        if self.duration < MIN_DURATION {
            warn!(requested = ?self.duration, "duration below minimum, using {:?}", MIN_DURATION);
            self.duration = MIN_DURATION;
        }
        if self.cpu_threads == 0 {
            warn!("cpu threads must be at least 1");
            self.cpu_threads = 1;
        }
        self
    }

    pub fn ram_target(&self, total_memory: u64) -> usize {
        (total_memory as f64 * self.ram_percent as f64 / 100.0) as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    pub elapsed: Duration,
    pub total: Duration,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.total.as_secs_f64()).min(1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.total
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StopReport {
    pub joined: Vec<String>,
    pub detached: Vec<String>,
}

struct Worker {
    name: String,
    handle: JoinHandle<()>,
}

/// A running load test. Dropping it cancels the workers without waiting.
pub struct StressSession {
    source: CancelSource,
    workers: Vec<Worker>,
    finished: Receiver<String>,
    started: Instant,
    duration: Duration,
}

impl StressSession {
    /// Spawn the workers for `plan`. `ram_override` replaces the RAM worker
    /// config computed from `total_memory`.
    pub fn start(plan: &StressPlan, total_memory: u64, ram_override: Option<RamConfig>) -> Result<Self, StressError> {
        let source = CancelSource::new();
        let (done_tx, finished) = unbounded();
        let mut workers = Vec::new();

        let mut spawn = |name: String, body: Box<dyn FnOnce() + Send>| -> Result<(), StressError> {
            let done = done_tx.clone();
            let thread_name = name.clone();
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || {
                    body();
                    let _ = done.send(thread_name);
                })
                .map_err(|source| StressError::Spawn { name: name.clone(), source })?;
            workers.push(Worker { name, handle });
            Ok(())
        };

        if plan.kind.loads_cpu() {
            for i in 0..plan.cpu_threads.max(1) {
                let token = source.token();
                let worker = CpuWorker::new(DutyCycle::new(plan.cpu_percent, DUTY_PERIOD));
                spawn(format!("cpu-load-{i}"), Box::new(move || {
                    worker.run(&token);
                }))?;
            }
        }

        if plan.kind.loads_ram() {
            let token = source.token();
            let config = ram_override.unwrap_or_else(|| RamConfig::with_target(plan.ram_target(total_memory)));
            let worker = RamWorker::new(config);
            spawn("ram-load".to_string(), Box::new(move || {
                worker.run(&token);
            }))?;
        }

        info!(
            cpu = plan.cpu_percent,
            ram = plan.ram_percent,
            duration_s = plan.duration.as_secs(),
            kind = ?plan.kind,
            workers = workers.len(),
            "stress test started"
        );

        Ok(Self {
            source,
            workers,
            finished,
            started: Instant::now(),
            duration: plan.duration,
        })
    }

    pub fn worker_names(&self) -> Vec<&str> {
        self.workers.iter().map(|w| w.name.as_str()).collect()
    }

    pub fn progress(&self) -> Progress {
        Progress { elapsed: self.started.elapsed(), total: self.duration }
    }

    pub fn is_complete(&self) -> bool {
        self.progress().is_complete()
    }

    /// Cancel all workers and wait up to `join_timeout` for them to finish.
    /// Workers still running afterwards are detached.
    pub fn stop(mut self, join_timeout: Duration) -> StopReport {
        self.source.cancel();
        let deadline = Instant::now() + join_timeout;
        let mut reported = HashSet::new();
        while reported.len() < self.workers.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.finished.recv_timeout(remaining) {
                Ok(name) => {
                    reported.insert(name);
                }
                Err(_) => break,
            }
        }

        let mut report = StopReport::default();
        for worker in self.workers.drain(..) {
            // a reported worker has left its body and is only tearing down
            if reported.contains(&worker.name) || worker.handle.is_finished() {
                if worker.handle.join().is_err() {
                    warn!(worker = %worker.name, "worker panicked");
                }
                report.joined.push(worker.name);
            } else {
                warn!(worker = %worker.name, "worker did not stop in time, detaching");
                report.detached.push(worker.name);
            }
        }

        info!(elapsed = ?self.started.elapsed(), joined = report.joined.len(), "stress test stopped");
        report
    }
}
