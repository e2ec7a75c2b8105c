use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Canonical track shape. Every catalog payload is normalized into this once,
/// at ingestion; playlists and the player only ever hold these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub key: String,
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub artist_id: Option<u64>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub cover_art: String,
    #[serde(default)]
    pub duration_secs: f64,
    #[serde(default)]
    pub play_url: Option<String>,
    pub genre: String,
    #[serde(default)]
    pub genre_hint: Option<String>,
}

impl Track {
    /// Normalizes an arbitrary catalog track object. Never fails: missing
    /// fields get defaults and a missing identifier is derived from title and
    /// artist.
    pub fn from_value(v: &Value) -> Self {
        let title = first_str(&[v.get("title"), v.get("name")]).unwrap_or_else(|| UNKNOWN_TITLE.into());

        let artist = first_str(&[
            v.get("artist").filter(|a| a.is_string()),
            v.pointer("/artist/name"),
            v.get("subtitle"),
            v.pointer("/artists/0/name"),
        ])
        .unwrap_or_else(|| UNKNOWN_ARTIST.into());

        let key = id_string(v.get("key")).or_else(|| id_string(v.get("id")));
        let id = id_string(v.get("id")).or_else(|| id_string(v.get("key")));
        let (key, id) = match (key, id) {
            (Some(k), Some(i)) => (k, i),
            _ => {
                let derived = format!("{}::{}", title.to_lowercase(), artist.to_lowercase());
                (derived.clone(), derived)
            }
        };

        let album = first_str(&[v.get("album").filter(|a| a.is_string()), v.pointer("/album/title")]);

        let cover_art = first_str(&[
            v.get("cover_art"),
            v.pointer("/images/coverart"),
            v.pointer("/album/cover_medium"),
            v.pointer("/album/cover_big"),
            v.pointer("/artist/picture_medium"),
        ])
        .unwrap_or_default();

        let duration_secs = first_positive(&[v.get("duration_secs"), v.get("duration")])
            .or_else(|| v.get("duration_ms").and_then(Value::as_f64).map(|ms| ms / 1000.0).filter(|d| *d > 0.0))
            .unwrap_or(0.0);

        let play_url = first_str(&[
            v.get("play_url"),
            v.pointer("/hub/actions/0/uri"),
            v.pointer("/hub/actions/1/uri"),
            v.get("preview"),
        ]);

        let genre = first_str(&[v.get("__appliedGenre"), v.get("genre")]).unwrap_or_else(|| UNKNOWN_LABEL.into());

        let genre_hint = if v.get("genre_hint").is_some() {
            first_str(&[v.get("genre_hint")])
        } else {
            genre_from_metadata(v)
        };

        Self {
            key,
            id,
            title,
            artist,
            artist_id: v.pointer("/artist/id").and_then(Value::as_u64).or_else(|| v.get("artist_id").and_then(Value::as_u64)),
            album,
            cover_art,
            duration_secs,
            play_url,
            genre,
            genre_hint,
        }
    }

    /// Identifier used for de-duplication and removal.
    pub fn identifier(&self) -> &str {
        if self.key.is_empty() {
            &self.id
        } else {
            &self.key
        }
    }

    pub fn has_default_genre(&self) -> bool {
        self.genre == UNKNOWN_LABEL
    }
}

/// Genre carried by the track's own metadata, checked in order: `genre`,
/// `genres.primary`, `primaryGenre`, `genre_name`.
pub fn genre_from_metadata(v: &Value) -> Option<String> {
    first_str(&[v.get("genre"), v.pointer("/genres/primary"), v.get("primaryGenre"), v.get("genre_name")])
}

/// Unwraps the envelopes catalog responses arrive in and normalizes every
/// entry: `{tracks: {hits: [{track}]}}`, `{tracks: [{track}]}`, `{data: [..]}`
/// or a bare array. Anything else yields no tracks.
pub fn tracks_from_payload(v: &Value) -> Vec<Track> {
    let unwrap_item = |item: &Value| Track::from_value(item.get("track").unwrap_or(item));

    if let Some(hits) = v.pointer("/tracks/hits").and_then(Value::as_array) {
        return hits.iter().map(unwrap_item).collect();
    }
    if let Some(tracks) = v.get("tracks").and_then(Value::as_array) {
        return tracks.iter().map(unwrap_item).collect();
    }
    if let Some(data) = v.get("data").and_then(Value::as_array) {
        return data.iter().map(Track::from_value).collect();
    }
    if let Some(items) = v.as_array() {
        return items.iter().map(unwrap_item).collect();
    }
    Vec::new()
}

fn first_str(candidates: &[Option<&Value>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .filter_map(|v| v.as_str())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_positive(candidates: &[Option<&Value>]) -> Option<f64> {
    candidates.iter().flatten().filter_map(|v| v.as_f64()).find(|d| *d > 0.0)
}

fn id_string(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
