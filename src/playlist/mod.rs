//! Playlist state and its reducer.
//!
//! [`PlaylistState::apply`] is a pure transition: it never validates names and
//! never touches storage. Validation and persistence live in
//! [`store::PlaylistStore`], which is the only thing that should dispatch.

use std::collections::HashSet;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Track;

pub mod store;

pub use store::{FileSlot, MemorySlot, PlaylistSlot, PlaylistStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub songs: Vec<Track>,
}

impl Playlist {
    /// Songs in playback order. With a seed the order is a permutation derived
    /// from it, so the same seed always yields the same order.
    pub fn ordered_songs(&self, shuffle_seed: Option<u64>) -> Vec<Track> {
        let mut songs = self.songs.clone();
        if let Some(seed) = shuffle_seed {
            let mut rng = StdRng::seed_from_u64(seed);
            songs.shuffle(&mut rng);
        }
        songs
    }

    fn add_unique(&mut self, tracks: &[Track]) {
        let mut existing: HashSet<String> = self.songs.iter().map(|s| s.identifier().to_string()).collect();
        for track in tracks {
            if existing.insert(track.identifier().to_string()) {
                self.songs.push(track.clone());
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModalState {
    pub create_open: bool,
    pub add_open: bool,
    pub add_target: Option<String>,
    pub candidates: Vec<Track>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistState {
    pub list: Vec<Playlist>,
    pub ui: ModalState,
}

#[derive(Debug, Clone)]
pub enum PlaylistAction {
    OpenCreateModal { candidates: Vec<Track> },
    CloseCreateModal,
    CreatePlaylist { id: String, name: String },
    CreateWithSongs { id: String, name: String, tracks: Vec<Track> },
    RenamePlaylist { playlist_id: String, name: String },
    AddSongs { playlist_id: String, tracks: Vec<Track> },
    RemoveSongs { playlist_id: String, keys: Vec<String> },
    RemovePlaylist { playlist_id: String },
    OpenAddSongs { playlist_id: String, candidates: Vec<Track> },
    CloseAddSongs,
}

impl PlaylistAction {
    pub fn touches_list(&self) -> bool {
        !matches!(
            self,
            Self::OpenCreateModal { .. } | Self::CloseCreateModal | Self::OpenAddSongs { .. } | Self::CloseAddSongs
        )
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("playlist name cannot be empty")]
    EmptyName,
    #[error("playlist name \"{0}\" already exists; choose a different name")]
    DuplicateName(String),
}

impl PlaylistState {
    pub fn with_list(list: Vec<Playlist>) -> Self {
        Self { list, ui: ModalState::default() }
    }

    pub fn find(&self, id: &str) -> Option<&Playlist> {
        self.list.iter().find(|p| p.id == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Playlist> {
        self.list.iter_mut().find(|p| p.id == id)
    }

    /// Trims `name` and checks it against every other playlist, ignoring case.
    /// `except` is the playlist being renamed, which may keep its own name.
    pub fn validate_name(&self, name: &str, except: Option<&str>) -> Result<String, PlaylistError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PlaylistError::EmptyName);
        }
        let lowered = trimmed.to_lowercase();
        let taken = self
            .list
            .iter()
            .filter(|p| Some(p.id.as_str()) != except)
            .any(|p| p.name.to_lowercase() == lowered);
        if taken {
            return Err(PlaylistError::DuplicateName(trimmed.to_string()));
        }
        Ok(trimmed.to_string())
    }

    /// Applies one transition. Returns true when the playlist list was the
    /// target, i.e. when the caller should persist.
    pub fn apply(&mut self, action: PlaylistAction) -> bool {
        let persist = action.touches_list();
        match action {
            PlaylistAction::OpenCreateModal { candidates } => {
                self.ui.create_open = true;
                self.ui.candidates = candidates;
            }
            PlaylistAction::CloseCreateModal => {
                self.ui.create_open = false;
                self.ui.candidates.clear();
            }
            PlaylistAction::CreatePlaylist { id, name } => {
                self.list.push(Playlist { id, name, songs: Vec::new() });
            }
            PlaylistAction::CreateWithSongs { id, name, tracks } => {
                let mut playlist = Playlist { id, name, songs: Vec::with_capacity(tracks.len()) };
                playlist.add_unique(&tracks);
                self.list.push(playlist);
            }
            PlaylistAction::RenamePlaylist { playlist_id, name } => {
                if let Some(p) = self.find_mut(&playlist_id) {
                    p.name = name;
                }
            }
            PlaylistAction::AddSongs { playlist_id, tracks } => {
                if let Some(p) = self.find_mut(&playlist_id) {
                    p.add_unique(&tracks);
                }
            }
            PlaylistAction::RemoveSongs { playlist_id, keys } => {
                if let Some(p) = self.find_mut(&playlist_id) {
                    let keys: HashSet<&str> = keys.iter().map(String::as_str).collect();
                    p.songs.retain(|s| !keys.contains(s.identifier()));
                }
            }
            PlaylistAction::RemovePlaylist { playlist_id } => {
                self.list.retain(|p| p.id != playlist_id);
            }
            PlaylistAction::OpenAddSongs { playlist_id, candidates } => {
                self.ui.add_open = true;
                self.ui.add_target = Some(playlist_id);
                self.ui.candidates = candidates;
            }
            PlaylistAction::CloseAddSongs => {
                self.ui.add_open = false;
                self.ui.add_target = None;
                self.ui.candidates.clear();
            }
        }
        persist
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track(id: u64, title: &str) -> Track {
        Track::from_value(&json!({ "id": id, "title": title }))
    }

    fn state_with(name: &str) -> PlaylistState {
        let mut state = PlaylistState::default();
        state.apply(PlaylistAction::CreatePlaylist { id: "p1".into(), name: name.into() });
        state
    }

    #[test]
    fn adding_same_track_twice_is_a_no_op() {
        let mut state = state_with("Mix");
        let a = track(1, "a");
        state.apply(PlaylistAction::AddSongs { playlist_id: "p1".into(), tracks: vec![a.clone()] });
        state.apply(PlaylistAction::AddSongs { playlist_id: "p1".into(), tracks: vec![a.clone(), a] });
        assert_eq!(state.find("p1").map(|p| p.songs.len()), Some(1));
    }

    #[test]
    fn add_preserves_insertion_order() {
        let mut state = state_with("Mix");
        let tracks = vec![track(3, "c"), track(1, "a"), track(2, "b")];
        state.apply(PlaylistAction::AddSongs { playlist_id: "p1".into(), tracks });
        let ids: Vec<_> = state.list[0].songs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }

    #[test]
    fn missing_playlist_is_ignored() {
        let mut state = state_with("Mix");
        let before = state.clone();
        state.apply(PlaylistAction::AddSongs { playlist_id: "nope".into(), tracks: vec![track(1, "a")] });
        state.apply(PlaylistAction::RemoveSongs { playlist_id: "nope".into(), keys: vec!["1".into()] });
        assert_eq!(state, before);
    }

    #[test]
    fn remove_songs_filters_by_identifier() {
        let mut state = state_with("Mix");
        let tracks = vec![track(1, "a"), track(2, "b"), track(3, "c")];
        state.apply(PlaylistAction::AddSongs { playlist_id: "p1".into(), tracks });
        state.apply(PlaylistAction::RemoveSongs { playlist_id: "p1".into(), keys: vec!["1".into(), "3".into()] });
        let ids: Vec<_> = state.list[0].songs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["2"]);
    }

    #[test]
    fn modal_transitions_do_not_persist() {
        let mut state = PlaylistState::default();
        assert!(!state.apply(PlaylistAction::OpenCreateModal { candidates: vec![track(1, "a")] }));
        assert!(state.ui.create_open);
        assert_eq!(state.ui.candidates.len(), 1);
        assert!(!state.apply(PlaylistAction::CloseCreateModal));
        assert!(!state.ui.create_open);
        assert!(state.ui.candidates.is_empty());

        state.apply(PlaylistAction::OpenAddSongs { playlist_id: "p9".into(), candidates: vec![] });
        assert_eq!(state.ui.add_target.as_deref(), Some("p9"));
        state.apply(PlaylistAction::CloseAddSongs);
        assert_eq!(state.ui, ModalState::default());
    }

    #[test]
    fn name_validation_is_case_insensitive() {
        let state = state_with("Road Trip");
        assert_eq!(state.validate_name("  ", None), Err(PlaylistError::EmptyName));
        assert_eq!(
            state.validate_name(" road trip ", None),
            Err(PlaylistError::DuplicateName("road trip".into()))
        );
        assert_eq!(state.validate_name("ROAD TRIP", Some("p1")), Ok("ROAD TRIP".into()));
        assert_eq!(state.validate_name(" Chill ", None), Ok("Chill".into()));
    }

    #[test]
    fn shuffle_order_is_stable_per_seed() {
        let mut state = state_with("Mix");
        let tracks: Vec<_> = (0..12).map(|i| track(i, "t")).collect();
        state.apply(PlaylistAction::AddSongs { playlist_id: "p1".into(), tracks });
        let playlist = &state.list[0];

        assert_eq!(playlist.ordered_songs(None), playlist.songs);
        let first = playlist.ordered_songs(Some(42));
        assert_eq!(first, playlist.ordered_songs(Some(42)));
        let mut sorted: Vec<_> = first.iter().map(|t| t.id.clone()).collect();
        sorted.sort();
        let mut expected: Vec<_> = playlist.songs.iter().map(|t| t.id.clone()).collect();
        expected.sort();
        assert_eq!(sorted, expected);
    }
}
