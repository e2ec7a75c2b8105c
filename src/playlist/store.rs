use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{Playlist, PlaylistAction, PlaylistError, PlaylistState};
use crate::model::Track;

/// A single durable key-value slot holding the serialized playlist list.
pub trait PlaylistSlot: Send {
    /// `Ok(None)` means the slot has never been written.
    fn read(&self) -> Result<Option<String>>;
    fn write(&self, contents: &str) -> Result<()>;
}

pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PlaylistSlot for FileSlot {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read playlists from {}", self.path.display()))?;
        Ok(Some(raw))
    }

    fn write(&self, contents: &str) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        }
        std::fs::write(&self.path, contents)
            .with_context(|| format!("failed to write playlists to {}", self.path.display()))
    }
}

#[derive(Clone, Default)]
pub struct MemorySlot {
    cell: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self { cell: Arc::new(Mutex::new(Some(contents.into()))) }
    }

    pub fn contents(&self) -> Option<String> {
        self.cell.lock().ok().and_then(|c| c.clone())
    }
}

impl PlaylistSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>> {
        let cell = self.cell.lock().map_err(|_| anyhow!("memory slot poisoned"))?;
        Ok(cell.clone())
    }

    fn write(&self, contents: &str) -> Result<()> {
        let mut cell = self.cell.lock().map_err(|_| anyhow!("memory slot poisoned"))?;
        *cell = Some(contents.to_string());
        Ok(())
    }
}

/// Owns the playlist list, validates commands, and mirrors every list
/// mutation into its slot. Persistence is best-effort: failures are logged,
/// never returned.
pub struct PlaylistStore {
    state: PlaylistState,
    slot: Box<dyn PlaylistSlot>,
}

impl PlaylistStore {
    pub fn open(slot: Box<dyn PlaylistSlot>) -> Self {
        let list = match slot.read() {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Playlist>>(&raw) {
                Ok(list) => list,
                Err(e) => {
                    warn!(?e, "Persisted playlists are malformed; starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(?e, "Playlist slot unreadable; starting empty");
                Vec::new()
            }
        };
        info!(playlists = list.len(), "Playlist store loaded");
        Self { state: PlaylistState::with_list(list), slot }
    }

    pub fn state(&self) -> &PlaylistState {
        &self.state
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.state.list
    }

    pub fn get(&self, id: &str) -> Option<&Playlist> {
        self.state.find(id)
    }

    pub fn dispatch(&mut self, action: PlaylistAction) {
        if self.state.apply(action) {
            self.persist();
        }
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.state.list) {
            Ok(json) => json,
            Err(e) => {
                warn!(?e, "Failed to serialize playlists");
                return;
            }
        };
        match self.slot.write(&json) {
            Ok(()) => debug!(playlists = self.state.list.len(), "Playlists persisted"),
            Err(e) => warn!(?e, "Failed to persist playlists"),
        }
    }

    pub fn create_playlist(&mut self, name: &str) -> Result<String, PlaylistError> {
        let name = self.state.validate_name(name, None)?;
        let id = Uuid::new_v4().to_string();
        self.dispatch(PlaylistAction::CreatePlaylist { id: id.clone(), name });
        Ok(id)
    }

    pub fn create_playlist_with_songs(&mut self, name: &str, tracks: Vec<Track>) -> Result<String, PlaylistError> {
        let name = self.state.validate_name(name, None)?;
        let id = Uuid::new_v4().to_string();
        self.dispatch(PlaylistAction::CreateWithSongs { id: id.clone(), name, tracks });
        Ok(id)
    }

    /// Returns `Ok(false)` when no playlist has that id.
    pub fn rename_playlist(&mut self, playlist_id: &str, name: &str) -> Result<bool, PlaylistError> {
        if self.state.find(playlist_id).is_none() {
            return Ok(false);
        }
        let name = self.state.validate_name(name, Some(playlist_id))?;
        self.dispatch(PlaylistAction::RenamePlaylist { playlist_id: playlist_id.to_string(), name });
        Ok(true)
    }

    pub fn add_songs(&mut self, playlist_id: &str, tracks: Vec<Track>) -> Option<&Playlist> {
        self.state.find(playlist_id)?;
        self.dispatch(PlaylistAction::AddSongs { playlist_id: playlist_id.to_string(), tracks });
        self.state.find(playlist_id)
    }

    pub fn remove_songs(&mut self, playlist_id: &str, keys: Vec<String>) -> Option<&Playlist> {
        self.state.find(playlist_id)?;
        self.dispatch(PlaylistAction::RemoveSongs { playlist_id: playlist_id.to_string(), keys });
        self.state.find(playlist_id)
    }

    pub fn remove_playlist(&mut self, playlist_id: &str) -> bool {
        let existed = self.state.find(playlist_id).is_some();
        self.dispatch(PlaylistAction::RemovePlaylist { playlist_id: playlist_id.to_string() });
        existed
    }

    pub fn open_create_modal(&mut self, candidates: Vec<Track>) {
        self.dispatch(PlaylistAction::OpenCreateModal { candidates });
    }

    pub fn close_create_modal(&mut self) {
        self.dispatch(PlaylistAction::CloseCreateModal);
    }

    pub fn open_add_songs(&mut self, playlist_id: &str, candidates: Vec<Track>) {
        self.dispatch(PlaylistAction::OpenAddSongs { playlist_id: playlist_id.to_string(), candidates });
    }

    pub fn close_add_songs(&mut self) {
        self.dispatch(PlaylistAction::CloseAddSongs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenSlot;

    impl PlaylistSlot for BrokenSlot {
        fn read(&self) -> Result<Option<String>> {
            Err(anyhow!("device gone"))
        }
        fn write(&self, _contents: &str) -> Result<()> {
            Err(anyhow!("device gone"))
        }
    }

    #[test]
    fn malformed_slot_starts_empty() {
        let store = PlaylistStore::open(Box::new(MemorySlot::with_contents("{not json")));
        assert!(store.playlists().is_empty());
    }

    #[test]
    fn unreadable_slot_starts_empty_and_swallows_writes() {
        let mut store = PlaylistStore::open(Box::new(BrokenSlot));
        assert!(store.playlists().is_empty());
        let id = store.create_playlist("Mix").expect("create");
        assert_eq!(store.get(&id).map(|p| p.name.as_str()), Some("Mix"));
    }

    #[test]
    fn modal_changes_are_not_written() {
        let slot = MemorySlot::new();
        let mut store = PlaylistStore::open(Box::new(slot.clone()));
        store.open_create_modal(Vec::new());
        store.close_create_modal();
        assert_eq!(slot.contents(), None);
    }

    #[test]
    fn rename_enforces_the_same_policy_as_create() {
        let mut store = PlaylistStore::open(Box::new(MemorySlot::new()));
        let a = store.create_playlist("Focus").expect("create");
        store.create_playlist("Gym").expect("create");
        assert_eq!(store.rename_playlist(&a, "gym"), Err(PlaylistError::DuplicateName("gym".into())));
        assert_eq!(store.rename_playlist(&a, ""), Err(PlaylistError::EmptyName));
        assert_eq!(store.rename_playlist(&a, " Deep Focus "), Ok(true));
        assert_eq!(store.get(&a).map(|p| p.name.as_str()), Some("Deep Focus"));
        assert_eq!(store.rename_playlist("missing", "x"), Ok(false));
    }
}
