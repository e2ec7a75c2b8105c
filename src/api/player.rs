use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::model::{tracks_from_payload, Track};
use crate::player::{PlayerAction, PlayerState, PlayerStatus};
use crate::state::AppState;
use crate::utils::format_duration;

#[derive(Debug, Serialize)]
pub struct PlayerView {
    pub status: PlayerStatus,
    #[serde(flatten)]
    pub state: PlayerState,
}

impl From<&PlayerState> for PlayerView {
    fn from(state: &PlayerState) -> Self {
        Self { status: state.status(), state: state.clone() }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetActiveReq {
    pub song: Value,
    /// Bare array or a paged catalog envelope.
    #[serde(default)]
    pub queue: Value,
    #[serde(default)]
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct StepReq {
    pub index: i64,
}

#[derive(Debug, Deserialize)]
pub struct PlayPauseReq {
    pub playing: bool,
}

#[derive(Debug, Deserialize)]
pub struct ShuffleReq {
    pub enabled: bool,
}

async fn dispatch(state: &AppState, action: PlayerAction) -> Json<PlayerView> {
    let mut player = state.player.lock().await;
    debug!(?action, "player action");
    player.apply(action);
    Json(PlayerView::from(&*player))
}

pub async fn get(State(state): State<AppState>) -> Json<PlayerView> {
    Json(PlayerView::from(&*state.player.lock().await))
}

pub async fn set_active(State(state): State<AppState>, Json(req): Json<SetActiveReq>) -> Json<PlayerView> {
    let song = Track::from_value(&req.song);
    let queue = tracks_from_payload(&req.queue);
    info!(
        song = %song.title,
        artist = %song.artist,
        length = %format_duration(song.duration_secs),
        queue = queue.len(),
        "Now playing"
    );
    dispatch(&state, PlayerAction::SetActiveSong { song, queue, index: req.index }).await
}

pub async fn next(State(state): State<AppState>, Json(req): Json<StepReq>) -> Json<PlayerView> {
    dispatch(&state, PlayerAction::NextSong(req.index)).await
}

pub async fn prev(State(state): State<AppState>, Json(req): Json<StepReq>) -> Json<PlayerView> {
    dispatch(&state, PlayerAction::PrevSong(req.index)).await
}

pub async fn play_pause(State(state): State<AppState>, Json(req): Json<PlayPauseReq>) -> Json<PlayerView> {
    dispatch(&state, PlayerAction::PlayPause(req.playing)).await
}

pub async fn shuffle(State(state): State<AppState>, Json(req): Json<ShuffleReq>) -> Json<PlayerView> {
    let seed = rand::random::<u64>();
    dispatch(&state, PlayerAction::SetShuffle { enabled: req.enabled, seed }).await
}
