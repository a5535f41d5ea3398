use std::time::{Duration, Instant};

pub const MAX_VOLUME: u8 = 100;
pub const DEFAULT_VOLUME: u8 = 50;

/// Playback position bookkeeping for one loaded track
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Transport {
    #[default]
    Stopped,
    /// `offset` is the position at `since`
    Playing { since: Instant, offset: Duration },
    Paused { at: Duration },
}

impl Transport {
    pub fn is_playing(&self) -> bool {
        matches!(self, Transport::Playing { .. })
    }

    /// Start or resume. Resuming continues from the paused position.
    pub fn play(&mut self, now: Instant) {
        *self = match *self {
            Transport::Stopped => Transport::Playing { since: now, offset: Duration::ZERO },
            Transport::Paused { at } => Transport::Playing { since: now, offset: at },
            playing => playing,
        };
    }

    pub fn pause(&mut self, now: Instant) {
        if self.is_playing() {
            *self = Transport::Paused { at: self.elapsed(now) };
        }
    }

    pub fn stop(&mut self) {
        *self = Transport::Stopped;
    }

    /// Jump to `fraction` of `length`. Only a playing transport with a known
    /// length seeks.
    pub fn seek(&mut self, fraction: f64, length: Duration, now: Instant) -> bool {
        if !self.is_playing() || length.is_zero() || !fraction.is_finite() {
            return false;
        }
        let offset = length.mul_f64(fraction.clamp(0.0, 1.0));
        *self = Transport::Playing { since: now, offset };
        true
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match *self {
            Transport::Stopped => Duration::ZERO,
            Transport::Playing { since, offset } => offset + now.saturating_duration_since(since),
            Transport::Paused { at } => at,
        }
    }
}

/// `MM:SS`, minutes are not wrapped into hours
pub fn format_time(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn pause_and_resume_keep_position() {
        let t0 = Instant::now();
        let mut transport = Transport::default();
        assert_eq!(transport.elapsed(t0), Duration::ZERO);

        transport.play(t0);
        assert_eq!(transport.elapsed(t0 + 3 * SEC), 3 * SEC);

        transport.pause(t0 + 3 * SEC);
        assert_eq!(transport.elapsed(t0 + 10 * SEC), 3 * SEC);

        transport.play(t0 + 10 * SEC);
        assert_eq!(transport.elapsed(t0 + 12 * SEC), 5 * SEC);

        transport.stop();
        assert_eq!(transport.elapsed(t0 + 12 * SEC), Duration::ZERO);
    }

    #[test]
    fn play_while_playing_is_noop() {
        let t0 = Instant::now();
        let mut transport = Transport::default();
        transport.play(t0);
        transport.play(t0 + 2 * SEC);
        assert_eq!(transport.elapsed(t0 + 2 * SEC), 2 * SEC);
    }

    #[test]
    fn seek_only_while_playing() {
        let t0 = Instant::now();
        let length = 200 * SEC;
        let mut transport = Transport::default();
        assert!(!transport.seek(0.5, length, t0));

        transport.play(t0);
        assert!(!transport.seek(0.5, Duration::ZERO, t0));
        assert!(transport.seek(0.25, length, t0 + SEC));
        assert_eq!(transport.elapsed(t0 + 2 * SEC), 51 * SEC);

        assert!(transport.seek(4.0, length, t0));
        assert_eq!(transport.elapsed(t0), length);
    }

    #[test]
    fn non_finite_seek_is_ignored() {
        let t0 = Instant::now();
        let length = 100 * SEC;
        let mut transport = Transport::default();
        transport.play(t0);
        assert!(!transport.seek(f64::NAN, length, t0));
        assert!(!transport.seek(f64::INFINITY, length, t0));
        assert!(!transport.seek(f64::NEG_INFINITY, length, t0));
        assert_eq!(transport.elapsed(t0 + 2 * SEC), 2 * SEC);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(Duration::ZERO), "00:00");
        assert_eq!(format_time(Duration::from_millis(65_900)), "01:05");
        assert_eq!(format_time(Duration::from_secs(6000)), "100:00");
    }
}
