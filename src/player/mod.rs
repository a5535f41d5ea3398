//! Playlist and transport state of a music player. Audio output is left to
//! whoever drives the [`Player`].

pub mod playlist;
pub mod transport;

use std::time::{Duration, Instant};

use tracing::{debug, info};

pub use playlist::{Playlist, Track, SUPPORTED_EXTENSIONS};
pub use transport::{format_time, Transport, DEFAULT_VOLUME, MAX_VOLUME};

#[derive(Clone, Debug)]
pub struct Player {
    pub playlist: Playlist,
    transport: Transport,
    volume: u8,
}

impl Default for Player {
    fn default() -> Self {
        Self { playlist: Playlist::new(), transport: Transport::Stopped, volume: DEFAULT_VOLUME }
    }
}

impl Player {
    pub fn new(playlist: Playlist) -> Self {
        Self { playlist, ..Self::default() }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(MAX_VOLUME);
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.transport.elapsed(now)
    }

    /// Play or pause. Returns whether the player is now playing.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.playlist.is_empty() {
            return false;
        }
        if self.transport.is_playing() {
            self.transport.pause(now);
        } else {
            if self.playlist.current().is_none() {
                self.playlist.select(0);
            }
            self.transport.play(now);
            self.log_now_playing();
        }
        self.transport.is_playing()
    }

    /// Start `index` from the beginning, or pause if it is already playing.
    pub fn play_index(&mut self, index: usize, now: Instant) -> bool {
        if self.playlist.current_index() == Some(index) && self.transport.is_playing() {
            self.transport.pause(now);
            return false;
        }
        if self.playlist.select(index).is_none() {
            return false;
        }
        self.restart(now);
        true
    }

    pub fn next(&mut self, now: Instant) -> Option<&Track> {
        self.playlist.next()?;
        self.restart(now);
        self.playlist.current()
    }

    pub fn previous(&mut self, now: Instant) -> Option<&Track> {
        self.playlist.previous()?;
        self.restart(now);
        self.playlist.current()
    }

    /// Remove a track, stopping playback if it was the one loaded
    pub fn remove(&mut self, index: usize) -> bool {
        match self.playlist.remove(index) {
            Some(true) => {
                self.transport.stop();
                true
            }
            Some(false) => true,
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.playlist.clear();
        self.transport.stop();
    }

    pub fn seek(&mut self, fraction: f64, length: Duration, now: Instant) -> bool {
        self.transport.seek(fraction, length, now)
    }

    /// Advance to the next track once the current one has run for `length`.
    /// A zero length means unknown and never advances.
    pub fn tick(&mut self, now: Instant, length: Duration) -> bool {
        if !self.transport.is_playing() || length.is_zero() || self.transport.elapsed(now) < length {
            return false;
        }
        debug!("track finished");
        self.next(now).is_some()
    }

    fn restart(&mut self, now: Instant) {
        self.transport.stop();
        self.transport.play(now);
        self.log_now_playing();
    }

    fn log_now_playing(&self) {
        if let Some(track) = self.playlist.current() {
            info!(title = %track.title, volume = self.volume, "now playing");
        }
    }
}
