//! Millisecond clock readings and the small amount of state a clock face keeps.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, TimeZone, Timelike};

/// Ticks between refresh rate measurements
pub const RATE_WINDOW: u32 = 100;

/// Every string a clock face shows for one instant
#[derive(Clone, Debug, PartialEq)]
pub struct ClockReading {
    /// `HH:MM:SS.mmm`
    pub time: String,
    pub date: String,
    pub date_iso: String,
    pub date_full: String,
    /// seconds since the epoch, millisecond resolution
    pub unix: f64,
    pub utc_offset: String,
    pub hour: u32,
}

impl ClockReading {
    pub fn from_datetime<Tz: TimeZone>(now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self {
            time: now.format("%H:%M:%S%.3f").to_string(),
            date: now.format("%d %B %Y").to_string(),
            date_iso: now.format("%Y-%m-%d").to_string(),
            date_full: now.format("%A, %d %B %Y").to_string(),
            unix: now.timestamp_millis() as f64 / 1000.0,
            utc_offset: now.format("%:z").to_string(),
            hour: now.hour(),
        }
    }

    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn unix_text(&self) -> String {
        format!("{:.3}", self.unix)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub bg: &'static str,
    pub fg: &'static str,
}

/// Dark theme is fixed; light theme follows day (06-18) and night.
pub fn palette(theme: Theme, hour: u32) -> Palette {
    match theme {
        Theme::Dark => Palette { bg: "black", fg: "#00FF00" },
        Theme::Light if (6..18).contains(&hour) => Palette { bg: "white", fg: "black" },
        Theme::Light => Palette { bg: "#2C3E50", fg: "#ECF0F1" },
    }
}

pub struct ClockState {
    paused: bool,
    theme: Theme,
    ticks: u32,
    window_start: Instant,
    rate_hz: Option<f64>,
}

impl ClockState {
    pub fn new(now: Instant) -> Self {
        Self { paused: false, theme: Theme::Light, ticks: 0, window_start: now, rate_hz: None }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = match self.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        self.theme
    }

    /// Count one refresh. Every `RATE_WINDOW` refreshes the measured rate is
    /// returned. Paused clocks don't count.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        if self.paused {
            return None;
        }
        self.ticks += 1;
        if self.ticks < RATE_WINDOW {
            return None;
        }

        let elapsed = now.saturating_duration_since(self.window_start);
        let rate = if elapsed > Duration::ZERO { RATE_WINDOW as f64 / elapsed.as_secs_f64() } else { 0.0 };
        self.ticks = 0;
        self.window_start = now;
        self.rate_hz = Some(rate);
        Some(rate)
    }

    pub fn rate_hz(&self) -> Option<f64> {
        self.rate_hz
    }

    pub fn status_line(&self, reading: &ClockReading) -> String {
        match (self.paused, self.rate_hz) {
            (true, _) => "Clock paused.".to_string(),
            (false, Some(rate)) => format!("Clock running at ~{rate:.1} Hz. Time: {}", reading.time),
            (false, None) => "Clock running.".to_string(),
        }
    }
}
