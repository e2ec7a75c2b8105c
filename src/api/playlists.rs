use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::api::error::ApiError;
use crate::model::{tracks_from_payload, Track};
use crate::playlist::{ModalState, Playlist};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistReq {
    pub name: String,
    /// Any track payload: a bare array or a catalog envelope.
    #[serde(default)]
    pub songs: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RenameReq {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SongsReq {
    pub songs: Value,
}

#[derive(Debug, Deserialize)]
pub struct RemoveSongsReq {
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RemoveSongsRes {
    pub playlist: Playlist,
    /// The client should ask whether to delete the now-empty playlist.
    pub now_empty: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenCreateReq {
    #[serde(default)]
    pub songs: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAddReq {
    pub playlist_id: String,
    #[serde(default)]
    pub songs: Option<Value>,
}

pub async fn list(State(state): State<AppState>) -> Json<Vec<Playlist>> {
    Json(state.playlists.lock().await.playlists().to_vec())
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreatePlaylistReq>,
) -> Result<impl IntoResponse, ApiError> {
    let tracks = req.songs.as_ref().map(tracks_from_payload).unwrap_or_default();
    let mut store = state.playlists.lock().await;
    let id = if tracks.is_empty() {
        store.create_playlist(&req.name)?
    } else {
        store.create_playlist_with_songs(&req.name, tracks)?
    };
    let playlist = store.get(&id).cloned().ok_or_else(|| ApiError::upstream("Playlist vanished after create"))?;
    info!(id = %playlist.id, name = %playlist.name, songs = playlist.songs.len(), "Playlist created");
    Ok((StatusCode::CREATED, Json(playlist)))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Playlist>, ApiError> {
    let seed = state.player.lock().await.shuffle_seed;
    let store = state.playlists.lock().await;
    let playlist = store.get(&id).ok_or_else(|| ApiError::not_found("Playlist not found"))?;
    Ok(Json(Playlist { id: playlist.id.clone(), name: playlist.name.clone(), songs: playlist.ordered_songs(seed) }))
}

pub async fn rename(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RenameReq>,
) -> Result<Response, ApiError> {
    let mut store = state.playlists.lock().await;
    if !store.rename_playlist(&id, &req.name)? {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(store.get(&id).cloned()).into_response())
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.playlists.lock().await.remove_playlist(&id) {
        info!(%id, "Playlist deleted");
    }
    StatusCode::NO_CONTENT
}

pub async fn add_songs(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SongsReq>,
) -> Response {
    let tracks = tracks_from_payload(&req.songs);
    let mut store = state.playlists.lock().await;
    match store.add_songs(&id, tracks) {
        Some(playlist) => Json(playlist.clone()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub async fn remove_songs(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RemoveSongsReq>,
) -> Response {
    let mut store = state.playlists.lock().await;
    match store.remove_songs(&id, req.keys) {
        Some(playlist) => {
            Json(RemoveSongsRes { now_empty: playlist.songs.is_empty(), playlist: playlist.clone() }).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub async fn modal(State(state): State<AppState>) -> Json<ModalState> {
    Json(state.playlists.lock().await.state().ui.clone())
}

async fn candidates(state: &AppState, songs: Option<&Value>) -> Vec<Track> {
    match songs {
        Some(v) => tracks_from_payload(v),
        None => state.discover_pool().await,
    }
}

/// The body is optional; without `songs` the latest discover results are offered.
pub async fn open_create(State(state): State<AppState>, body: Bytes) -> Result<Json<ModalState>, ApiError> {
    let req: OpenCreateReq = if body.is_empty() {
        OpenCreateReq::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::bad_request(e.to_string()))?
    };
    let candidates = candidates(&state, req.songs.as_ref()).await;
    let mut store = state.playlists.lock().await;
    store.open_create_modal(candidates);
    Ok(Json(store.state().ui.clone()))
}

pub async fn close_create(State(state): State<AppState>) -> Json<ModalState> {
    let mut store = state.playlists.lock().await;
    store.close_create_modal();
    Json(store.state().ui.clone())
}

pub async fn open_add(State(state): State<AppState>, Json(req): Json<OpenAddReq>) -> Json<ModalState> {
    let candidates = candidates(&state, req.songs.as_ref()).await;
    let mut store = state.playlists.lock().await;
    store.open_add_songs(&req.playlist_id, candidates);
    Json(store.state().ui.clone())
}

pub async fn close_add(State(state): State<AppState>) -> Json<ModalState> {
    let mut store = state.playlists.lock().await;
    store.close_add_songs();
    Json(store.state().ui.clone())
}
