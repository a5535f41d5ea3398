use std::path::{Path, PathBuf};

use tracing::debug;

pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["mp3", "wav", "ogg", "flac"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
}

impl Track {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            return None;
        }
        let title = path.file_name()?.to_string_lossy().into_owned();
        Some(Self { path: path.to_path_buf(), title })
    }
}

/// Ordered tracks and the selected one
#[derive(Clone, Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Append supported files. Selects the first track if nothing was
    /// selected. Returns how many were added.
    pub fn add<P: AsRef<Path>>(&mut self, paths: impl IntoIterator<Item = P>) -> usize {
        let before = self.tracks.len();
        for path in paths {
            match Track::from_path(path.as_ref()) {
                Some(track) => self.tracks.push(track),
                None => debug!(path = %path.as_ref().display(), "skipping unsupported file"),
            }
        }
        if self.current.is_none() && !self.tracks.is_empty() {
            self.current = Some(0);
        }
        self.tracks.len() - before
    }

    /// Remove a track. Returns true if it was the selected one; the selection
    /// then moves to the track that took its place (or the new last track).
    pub fn remove(&mut self, index: usize) -> Option<bool> {
        if index >= self.tracks.len() {
            return None;
        }
        self.tracks.remove(index);

        let was_current = self.current == Some(index);
        self.current = match self.current {
            _ if self.tracks.is_empty() => None,
            Some(cur) if cur == index => Some(index.min(self.tracks.len() - 1)),
            Some(cur) if cur > index => Some(cur - 1),
            other => other,
        };
        Some(was_current)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current = None;
    }

    pub fn select(&mut self, index: usize) -> Option<&Track> {
        if index < self.tracks.len() {
            self.current = Some(index);
        }
        self.tracks.get(index)
    }

    /// Select the following track, wrapping to the first
    pub fn next(&mut self) -> Option<&Track> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        let index = self.current.map_or(0, |i| (i + 1) % len);
        self.select(index)
    }

    /// Select the preceding track, wrapping to the last
    pub fn previous(&mut self) -> Option<&Track> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        let index = self.current.map_or(len - 1, |i| (i + len - 1) % len);
        self.select(index)
    }
}
