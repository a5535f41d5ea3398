//! Synthetic CPU and RAM load.
//!
//! A [`StressSession`] spawns one or more duty-cycled CPU workers and a RAM
//! worker, all sharing a [`CancelToken`]. Cancelling wakes sleeping workers
//! immediately; `stop` joins them with a bounded wait.

pub mod cancel;
pub mod cpu;
pub mod duty;
pub mod ram;
pub mod session;
pub mod telemetry;

pub use cancel::{CancelSource, CancelToken};
pub use cpu::CpuWorker;
pub use duty::{DutyCycle, DutyStats};
pub use ram::{RamConfig, RamReport, RamWorker};
pub use session::{Progress, StopReport, StressPlan, StressSession, TestKind};
pub use telemetry::{SystemTelemetry, TelemetrySnapshot, TelemetrySource};
