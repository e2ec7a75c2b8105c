use serde::Serialize;

use crate::model::Track;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Idle,
    Active,
}

#[derive(Debug, Clone)]
pub enum PlayerAction {
    SetActiveSong { song: Track, queue: Vec<Track>, index: usize },
    NextSong(i64),
    PrevSong(i64),
    PlayPause(bool),
    SetShuffle { enabled: bool, seed: u64 },
}

/// Ephemeral player state. `active_song` is a copy, so replacing the queue
/// never changes what is shown as playing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerState {
    pub queue: Vec<Track>,
    pub current_index: usize,
    pub active_song: Option<Track>,
    pub playing: bool,
    pub shuffle: bool,
    pub shuffle_seed: Option<u64>,
    pub active_genre: Option<String>,
}

impl PlayerState {
    pub fn status(&self) -> PlayerStatus {
        if self.active_song.is_some() {
            PlayerStatus::Active
        } else {
            PlayerStatus::Idle
        }
    }

    pub fn apply(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::SetActiveSong { song, queue, index } => {
                self.active_genre = song.genre_hint.clone();
                self.active_song = Some(song);
                // Out-of-range indices wrap like a step would.
                let requested = i64::try_from(index).unwrap_or(i64::MAX);
                self.current_index = wrap_index(requested, queue.len()).unwrap_or(0);
                self.queue = queue;
            }
            PlayerAction::NextSong(requested) | PlayerAction::PrevSong(requested) => self.step_to(requested),
            PlayerAction::PlayPause(playing) => self.playing = playing,
            PlayerAction::SetShuffle { enabled, seed } => {
                // Re-enabling keeps the current order.
                self.shuffle_seed = if enabled { self.shuffle_seed.or(Some(seed)) } else { None };
                self.shuffle = enabled;
            }
        }
    }

    fn step_to(&mut self, requested: i64) {
        let Some(index) = wrap_index(requested, self.queue.len()) else { return };
        let track = self.queue[index].clone();
        self.current_index = index;
        self.active_genre = track.genre_hint.clone();
        self.active_song = Some(track);
    }
}

/// Negative wraps to the last index, past-the-end wraps to the first.
/// `None` for an empty queue.
pub fn wrap_index(requested: i64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if requested < 0 {
        return Some(len - 1);
    }
    match usize::try_from(requested) {
        Ok(i) if i < len => Some(i),
        _ => Some(0),
    }
}
