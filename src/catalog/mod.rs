//! Gateway to the upstream music catalog and lyrics service.
//!
//! Responses are passed through as JSON; only the composite endpoints
//! (related songs, genre samples, tagged discover) look inside them.

use std::time::Duration;

use futures::future::join_all;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::{EffectiveConfig, GenreEntry};
use crate::genre::GenreSamples;
use crate::model::{tracks_from_payload, Track};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid upstream url: {0}")]
    Url(#[from] url::ParseError),
    #[error("upstream url cannot carry a path: {0}")]
    NotABase(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedTracks {
    pub artist_top_tracks: Vec<Value>,
    pub genre_tracks: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsEntry {
    pub lyrics: String,
}

pub fn is_unfiltered_genre(genre: &str) -> bool {
    genre.is_empty() || genre.eq_ignore_ascii_case("all") || genre == crate::genre::UNKNOWN_GENRE
}

/// Builds the discover search term: the user's query, or `fallback` when the
/// query is blank, with the genre appended unless it is a no-filter value.
pub fn discover_query(q: Option<&str>, genre: Option<&str>, fallback: &str) -> String {
    let mut query = match q.map(str::trim) {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => fallback.to_string(),
    };
    if let Some(g) = genre.map(str::trim).filter(|g| !is_unfiltered_genre(g)) {
        query.push(' ');
        query.push_str(g);
    }
    query
}

pub struct CatalogClient {
    http: reqwest::Client,
    catalog_base: Url,
    lyrics_base: Url,
    chart_limit: u32,
    search_limit: u32,
    artist_songs_limit: u32,
    related_artist_limit: u32,
    related_genre_limit: u32,
    random_terms: Vec<String>,
    sample_size: usize,
}

impl CatalogClient {
    pub fn new(cfg: &EffectiveConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.catalog_timeout_ms))
            .user_agent(concat!("tunehub/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            catalog_base: Url::parse(&cfg.catalog_base_url)?,
            lyrics_base: Url::parse(&cfg.lyrics_base_url)?,
            chart_limit: cfg.chart_limit,
            search_limit: cfg.search_limit,
            artist_songs_limit: cfg.artist_songs_limit,
            related_artist_limit: cfg.related_artist_limit,
            related_genre_limit: cfg.related_genre_limit,
            random_terms: cfg.random_terms.clone(),
            sample_size: cfg.genre_sample_size,
        })
    }

    fn endpoint(base: &Url, segments: &[&str], query: &[(&str, String)]) -> Result<Url, CatalogError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::NotABase(base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value, CatalogError> {
        debug!(%url, "catalog request");
        let value = self.http.get(url).send().await?.error_for_status()?.json::<Value>().await?;
        Ok(value)
    }

    async fn catalog(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Value, CatalogError> {
        let url = Self::endpoint(&self.catalog_base, segments, query)?;
        self.get_json(url).await
    }

    pub async fn charts(&self) -> Result<Value, CatalogError> {
        self.catalog(&["chart", "0", "tracks"], &[("limit", self.chart_limit.to_string())]).await
    }

    pub async fn top_artists(&self) -> Result<Value, CatalogError> {
        self.catalog(&["chart", "0", "artists"], &[("limit", self.chart_limit.to_string())]).await
    }

    fn random_term(&self) -> String {
        self.random_terms.choose(&mut rand::rng()).cloned().unwrap_or_else(|| "love".into())
    }

    pub async fn discover(&self, q: Option<&str>, genre: Option<&str>) -> Result<Value, CatalogError> {
        let query = discover_query(q, genre, &self.random_term());
        self.catalog(&["search"], &[("q", query), ("limit", self.search_limit.to_string())]).await
    }

    pub async fn track(&self, id: &str) -> Result<Value, CatalogError> {
        self.catalog(&["track", id], &[]).await
    }

    pub async fn artist(&self, id: &str) -> Result<Value, CatalogError> {
        self.catalog(&["artist", id], &[]).await
    }

    pub async fn artist_top(&self, id: &str, limit: u32) -> Result<Value, CatalogError> {
        self.catalog(&["artist", id, "top"], &[("limit", limit.to_string())]).await
    }

    pub async fn artist_songs(&self, id: &str) -> Result<Value, CatalogError> {
        self.artist_top(id, self.artist_songs_limit).await
    }

    /// Top tracks of the same artist plus a few tracks by the first artist
    /// listed under the track's genre.
    pub async fn related(&self, id: &str) -> Result<RelatedTracks, CatalogError> {
        let track = self.track(id).await?;
        let mut related = RelatedTracks::default();

        if let Some(artist_id) = track.pointer("/artist/id").and_then(json_id) {
            let top = self.artist_top(&artist_id, self.related_artist_limit).await?;
            related.artist_top_tracks = data_array(&top);
        }

        let genre_id = track
            .pointer("/album/genres/data/0/id")
            .or_else(|| track.pointer("/artist/genre"))
            .and_then(json_id);
        if let Some(genre_id) = genre_id {
            let artists = self.catalog(&["genre", genre_id.as_str(), "artists"], &[]).await?;
            if let Some(first) = artists.pointer("/data/0/id").and_then(json_id) {
                let top = self.artist_top(&first, self.related_genre_limit).await?;
                related.genre_tracks = data_array(&top);
            }
        }

        Ok(related)
    }

    pub async fn lyrics(&self, artist: &str, title: &str) -> Vec<LyricsEntry> {
        let url = match Self::endpoint(&self.lyrics_base, &[artist, title], &[]) {
            Ok(url) => url,
            Err(e) => {
                warn!(?e, "lyrics url");
                return Vec::new();
            }
        };
        let resp = match self.http.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(?e, %artist, %title, "lyrics upstream unreachable");
                return Vec::new();
            }
        };
        // lyrics.ovh answers 404 with a JSON error body when it has nothing.
        match resp.json::<Value>().await {
            Ok(body) => body
                .get("lyrics")
                .and_then(Value::as_str)
                .filter(|l| !l.trim().is_empty())
                .map(|l| vec![LyricsEntry { lyrics: l.to_string() }])
                .unwrap_or_default(),
            Err(e) => {
                debug!(?e, %artist, %title, "lyrics body unreadable");
                Vec::new()
            }
        }
    }

    pub async fn genre_samples(&self, taxonomy: &[GenreEntry]) -> GenreSamples {
        let pages = join_all(taxonomy.iter().map(|g| self.discover(None, Some(&g.value)))).await;
        let mut samples = GenreSamples::new(self.sample_size);
        for (genre, page) in taxonomy.iter().zip(pages) {
            let tracks = match page {
                Ok(v) => tracks_from_payload(&v),
                Err(e) => {
                    warn!(?e, genre = %genre.title, "genre sample fetch failed");
                    Vec::new()
                }
            };
            samples.insert(genre.title.clone(), &tracks);
        }
        samples
    }

    /// Discover results for every genre, each track labelled with the genre
    /// it was found under. Fails only if every genre fails.
    pub async fn discover_tagged(&self, q: Option<&str>, taxonomy: &[GenreEntry]) -> Result<Vec<Track>, CatalogError> {
        let pages = join_all(taxonomy.iter().map(|g| self.discover(q, Some(&g.value)))).await;
        let mut combined = Vec::new();
        let mut last_err = None;
        let mut any_ok = false;
        for (genre, page) in taxonomy.iter().zip(pages) {
            match page {
                Ok(v) => {
                    any_ok = true;
                    combined.extend(tracks_from_payload(&v).into_iter().map(|mut t| {
                        t.genre = genre.title.clone();
                        t
                    }));
                }
                Err(e) => {
                    warn!(?e, genre = %genre.title, "tagged discover fetch failed");
                    last_err = Some(e);
                }
            }
        }
        match last_err {
            Some(e) if !any_ok => Err(e),
            _ => Ok(combined),
        }
    }

    pub async fn top_plays(&self, limit: usize, taxonomy: &[GenreEntry]) -> Result<Vec<Track>, CatalogError> {
        let charts = self.charts().await?;
        let top: Vec<Track> = tracks_from_payload(&charts).into_iter().take(limit).collect();
        if top.is_empty() {
            return Ok(top);
        }
        let samples = self.genre_samples(taxonomy).await;
        Ok(samples.tag(top))
    }
}

fn json_id(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn data_array(v: &Value) -> Vec<Value> {
    v.get("data").and_then(Value::as_array).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_query_falls_back_and_appends_genre() {
        assert_eq!(discover_query(Some("daft punk"), None, "love"), "daft punk");
        assert_eq!(discover_query(Some("  "), Some("rock"), "night"), "night rock");
        assert_eq!(discover_query(None, Some("all"), "dream"), "dream");
        assert_eq!(discover_query(None, Some("Unknown Genre"), "dream"), "dream");
    }

    #[test]
    fn endpoint_encodes_segments_and_keeps_base_path() {
        let base = Url::parse("https://api.lyrics.ovh/v1").unwrap();
        let url = CatalogClient::endpoint(&base, &["AC/DC", "Back in Black"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.lyrics.ovh/v1/AC%2FDC/Back%20in%20Black");

        let base = Url::parse("https://api.deezer.com").unwrap();
        let url = CatalogClient::endpoint(&base, &["search"], &[("q", "love rock".into()), ("limit", "50".into())]).unwrap();
        assert_eq!(url.as_str(), "https://api.deezer.com/search?q=love+rock&limit=50");
    }

    #[test]
    fn related_tracks_use_camel_case_keys() {
        let related = RelatedTracks { artist_top_tracks: vec![Value::Null], genre_tracks: vec![] };
        let v = serde_json::to_value(&related).unwrap();
        assert!(v.get("artistTopTracks").is_some());
        assert!(v.get("genreTracks").is_some());
    }
}
