use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub mod error;
pub mod handlers;
pub mod player;
pub mod playlists;

pub use error::ApiError;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/charts", get(handlers::charts))
        .route("/api/discover", get(handlers::discover))
        .route("/api/discover/tagged", get(handlers::discover_tagged))
        .route("/api/songs/details/{id}", get(handlers::song_details))
        .route("/api/songs/related/{id}", get(handlers::song_related))
        .route("/api/top-artists", get(handlers::top_artists))
        .route("/api/artist-songs/{id}", get(handlers::artist_songs))
        .route("/api/artists/details/{id}", get(handlers::artist_details))
        .route("/api/lyrics", get(handlers::lyrics))
        .route("/api/top-plays", get(handlers::top_plays))
        .route("/api/playlists", get(playlists::list).post(playlists::create))
        .route("/api/playlists/ui", get(playlists::modal))
        .route("/api/playlists/ui/create", post(playlists::open_create).delete(playlists::close_create))
        .route("/api/playlists/ui/add", post(playlists::open_add).delete(playlists::close_add))
        .route(
            "/api/playlists/{id}",
            get(playlists::get).patch(playlists::rename).delete(playlists::remove),
        )
        .route("/api/playlists/{id}/songs", post(playlists::add_songs))
        .route("/api/playlists/{id}/songs/remove", post(playlists::remove_songs))
        .route("/api/player", get(player::get))
        .route("/api/player/active", post(player::set_active))
        .route("/api/player/next", post(player::next))
        .route("/api/player/prev", post(player::prev))
        .route("/api/player/play-pause", post(player::play_pause))
        .route("/api/player/shuffle", post(player::shuffle))
        .route("/info", get(handlers::info))
        .route("/version", get(handlers::version))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
