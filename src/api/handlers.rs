use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::api::error::ApiError;
use crate::catalog::LyricsEntry;
use crate::model::{tracks_from_payload, Track};
use crate::state::{generation::DISCOVER, AppState};

#[derive(Debug, Deserialize)]
pub struct DiscoverParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LyricsParams {
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LyricsRes {
    pub data: Vec<LyricsEntry>,
}

#[derive(Debug, Serialize)]
pub struct TrackList {
    pub data: Vec<Track>,
}

pub async fn charts(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.catalog.charts().await.map(Json).map_err(|e| {
        warn!(?e, "charts fetch failed");
        ApiError::upstream("Failed to fetch top charts")
    })
}

pub async fn discover(
    State(state): State<AppState>,
    Query(p): Query<DiscoverParams>,
) -> Result<Json<Value>, ApiError> {
    let ticket = state.generations.begin(DISCOVER);
    let data = state.catalog.discover(p.q.as_deref(), p.genre.as_deref()).await.map_err(|e| {
        warn!(?e, q = ?p.q, genre = ?p.genre, "discover fetch failed");
        ApiError::upstream("Failed to fetch discover songs")
    })?;
    state.offer_discover_results(&ticket, tracks_from_payload(&data)).await;
    Ok(Json(data))
}

pub async fn discover_tagged(
    State(state): State<AppState>,
    Query(p): Query<DiscoverParams>,
) -> Result<Json<TrackList>, ApiError> {
    let ticket = state.generations.begin(DISCOVER);
    let tracks = state.catalog.discover_tagged(p.q.as_deref(), &state.cfg.genres).await.map_err(|e| {
        warn!(?e, q = ?p.q, "tagged discover fetch failed");
        ApiError::upstream("Failed to fetch discover songs")
    })?;
    let tracks = match p.genre.as_deref().filter(|g| !crate::catalog::is_unfiltered_genre(g)) {
        Some(genre) => tracks.into_iter().filter(|t| t.genre.eq_ignore_ascii_case(genre)).collect(),
        None => tracks,
    };
    state.offer_discover_results(&ticket, tracks.clone()).await;
    Ok(Json(TrackList { data: tracks }))
}

pub async fn song_details(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, ApiError> {
    state.catalog.track(&id).await.map(Json).map_err(|e| {
        warn!(?e, %id, "song details fetch failed");
        ApiError::upstream("Failed to fetch song details")
    })
}

pub async fn song_related(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse, ApiError> {
    state.catalog.related(&id).await.map(Json).map_err(|e| {
        warn!(?e, %id, "related songs fetch failed");
        ApiError::upstream("Failed to fetch related songs")
    })
}

pub async fn top_artists(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.catalog.top_artists().await.map(Json).map_err(|e| {
        warn!(?e, "top artists fetch failed");
        ApiError::upstream("Failed to fetch top artists")
    })
}

pub async fn artist_songs(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, ApiError> {
    state.catalog.artist_songs(&id).await.map(Json).map_err(|e| {
        warn!(?e, %id, "artist songs fetch failed");
        ApiError::upstream("Failed to fetch artist songs")
    })
}

pub async fn artist_details(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, ApiError> {
    state.catalog.artist(&id).await.map(Json).map_err(|e| {
        warn!(?e, %id, "artist details fetch failed");
        ApiError::upstream("Failed to fetch artist details")
    })
}

pub async fn lyrics(State(state): State<AppState>, Query(p): Query<LyricsParams>) -> Result<Json<LyricsRes>, ApiError> {
    let (Some(artist), Some(title)) = (
        p.artist.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        p.title.as_deref().map(str::trim).filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::bad_request("Missing artist or title"));
    };
    let data = state.catalog.lyrics(artist, title).await;
    if data.is_empty() {
        info!(%artist, %title, "no lyrics available");
    }
    Ok(Json(LyricsRes { data }))
}

pub async fn top_plays(State(state): State<AppState>) -> Result<Json<TrackList>, ApiError> {
    let tracks = state.catalog.top_plays(state.cfg.top_plays, &state.cfg.genres).await.map_err(|e| {
        warn!(?e, "top plays fetch failed");
        ApiError::upstream("Failed to load top charts")
    })?;
    Ok(Json(TrackList { data: tracks }))
}

pub async fn info(State(state): State<AppState>) -> impl IntoResponse {
    let playlists = state.playlists.lock().await.playlists().len();
    let player = state.player.lock().await.status();
    Json(json!({
        "name": "tunehub",
        "version": env!("CARGO_PKG_VERSION"),
        "playlists": playlists,
        "player": player,
        "genres": state.cfg.genres.iter().map(|g| g.title.as_str()).collect::<Vec<_>>(),
    }))
}

pub async fn version() -> impl IntoResponse {
    env!("CARGO_PKG_VERSION")
}
