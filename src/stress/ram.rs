use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::cancel::CancelToken;

pub const MIB: usize = 1024 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub struct RamConfig {
    pub target_bytes: usize,
    pub block_bytes: usize,
    /// One byte in every `touch_stride` is written after allocation
    pub touch_stride: usize,
    pub allocation_pause: Duration,
    pub hold_interval: Duration,
}

impl RamConfig {
    pub fn with_target(target_bytes: usize) -> Self {
        Self {
            target_bytes,
            block_bytes: 10 * MIB,
            touch_stride: 4096,
            allocation_pause: Duration::from_millis(100),
            hold_interval: Duration::from_millis(500),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RamReport {
    pub peak_bytes: usize,
    pub blocks: usize,
    pub touches: u64,
    pub reached_target: bool,
}

pub struct RamWorker {
    pub config: RamConfig,
}

impl RamWorker {
    pub fn new(config: RamConfig) -> Self {
        Self { config }
    }

    /// Allocate up to the target, then keep the memory resident until
    /// cancelled. Everything is released on return.
    pub fn run(&self, token: &CancelToken) -> RamReport {
        let c = &self.config;
        let block_bytes = c.block_bytes.max(1);
        let stride = c.touch_stride.max(1);
        let mut rng = StdRng::from_entropy();
        let mut blocks: Vec<Vec<u8>> = Vec::new();
        let mut report = RamReport::default();
        info!(target_mib = c.target_bytes / MIB, "ram load started");

        while !token.is_cancelled() && blocks.len() * block_bytes < c.target_bytes {
            let mut block = vec![0u8; block_bytes];
            for i in (0..block.len()).step_by(stride) {
                block[i] = rng.gen();
            }
            blocks.push(block);

            let allocated_mib = blocks.len() * block_bytes / MIB;
            let previous_mib = (blocks.len() - 1) * block_bytes / MIB;
            if allocated_mib / 100 > previous_mib / 100 {
                info!(allocated_mib, "ram allocated");
            }

            if token.sleep(c.allocation_pause) {
                break;
            }
        }

        report.blocks = blocks.len();
        report.peak_bytes = blocks.len() * block_bytes;
        report.reached_target = report.peak_bytes >= c.target_bytes;

        // hold: keep pages resident by touching a random block now and then
        while !token.sleep(c.hold_interval) {
            if let Some(block) = blocks.choose_mut(&mut rng) {
                if let Some(first) = block.first_mut() {
                    *first = first.wrapping_add(1);
                    report.touches += 1;
                }
            }
        }

        info!(released_mib = report.peak_bytes / MIB, "ram released");
        report
    }
}
