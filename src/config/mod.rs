use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub lyrics: LyricsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub genres: GenresConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}
fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_clean_log")]
    pub clean_log_on_start: bool,
}
fn default_clean_log() -> bool {
    true
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self { clean_log_on_start: default_clean_log() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_base")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    #[serde(default = "default_chart_limit")]
    pub chart_limit: u32,
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
    #[serde(default = "default_artist_songs_limit")]
    pub artist_songs_limit: u32,
    #[serde(default = "default_related_artist_limit")]
    pub related_artist_limit: u32,
    #[serde(default = "default_related_genre_limit")]
    pub related_genre_limit: u32,
    #[serde(default = "default_random_terms")]
    pub random_terms: Vec<String>,
}
fn default_catalog_base() -> String {
    "https://api.deezer.com".into()
}
fn default_timeout() -> u64 {
    10_000
}
fn default_chart_limit() -> u32 {
    50
}
fn default_search_limit() -> u32 {
    50
}
fn default_artist_songs_limit() -> u32 {
    50
}
fn default_related_artist_limit() -> u32 {
    7
}
fn default_related_genre_limit() -> u32 {
    3
}
fn default_random_terms() -> Vec<String> {
    ["love", "summer", "night", "life", "dream", "dance", "heart"].iter().map(|s| s.to_string()).collect()
}
impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_base(),
            timeout_ms: default_timeout(),
            chart_limit: default_chart_limit(),
            search_limit: default_search_limit(),
            artist_songs_limit: default_artist_songs_limit(),
            related_artist_limit: default_related_artist_limit(),
            related_genre_limit: default_related_genre_limit(),
            random_terms: default_random_terms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LyricsConfig {
    #[serde(default = "default_lyrics_base")]
    pub base_url: String,
}
fn default_lyrics_base() -> String {
    "https://api.lyrics.ovh/v1".into()
}
impl Default for LyricsConfig {
    fn default() -> Self {
        Self { base_url: default_lyrics_base() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_playlists_path")]
    pub playlists_path: String,
}
fn default_playlists_path() -> String {
    "data/playlists_v1.json".into()
}
impl Default for StorageConfig {
    fn default() -> Self {
        Self { playlists_path: default_playlists_path() }
    }
}

/// One entry of the fixed genre taxonomy. `title` is the label shown to users
/// and applied to tracks, `value` is the term appended to catalog searches.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GenreEntry {
    pub title: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenresConfig {
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    #[serde(default = "default_top_plays")]
    pub top_plays: usize,
    #[serde(default = "default_taxonomy")]
    pub taxonomy: Vec<GenreEntry>,
}
fn default_sample_size() -> usize {
    20
}
fn default_top_plays() -> usize {
    5
}
fn default_taxonomy() -> Vec<GenreEntry> {
    [
        ("Pop", "pop"),
        ("Hip-Hop", "hip hop"),
        ("Dance", "dance"),
        ("Electronic", "electronic"),
        ("Soul", "soul"),
        ("Alternative", "alternative"),
        ("Rock", "rock"),
        ("Latin", "latin"),
        ("Film", "soundtrack"),
        ("Country", "country"),
        ("Reggae", "reggae"),
        ("House", "house"),
        ("K-Pop", "k-pop"),
    ]
    .iter()
    .map(|(title, value)| GenreEntry { title: title.to_string(), value: value.to_string() })
    .collect()
}
impl Default for GenresConfig {
    fn default() -> Self {
        Self { sample_size: default_sample_size(), top_plays: default_top_plays(), taxonomy: default_taxonomy() }
    }
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub host: String,
    pub port: u16,
    pub clean_log_on_start: bool,
    pub catalog_base_url: String,
    pub catalog_timeout_ms: u64,
    pub chart_limit: u32,
    pub search_limit: u32,
    pub artist_songs_limit: u32,
    pub related_artist_limit: u32,
    pub related_genre_limit: u32,
    pub random_terms: Vec<String>,
    pub lyrics_base_url: String,
    pub playlists_path: String,
    pub genre_sample_size: usize,
    pub top_plays: usize,
    pub genres: Vec<GenreEntry>,
}

pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Tunehub Node Configuration

[server]
# Host/IP to bind. Default: 0.0.0.0
host = "0.0.0.0"
# Port to bind. Default: 5000
port = 5000

[logging]
# Truncate .logs/latest.log on startup. Default: true
clean_log_on_start = true

[catalog]
# Base URL of the Deezer-compatible music catalog. Default: "https://api.deezer.com"
base_url = "https://api.deezer.com"
# Timeout for a single upstream request in milliseconds. Default: 10000
timeout_ms = 10000
# Number of tracks returned by /api/charts. Default: 50
chart_limit = 50
# Number of tracks returned by a discover search. Default: 50
search_limit = 50
# Number of tracks returned by /api/artist-songs. Default: 50
artist_songs_limit = 50
# Related songs: top tracks of the same artist. Default: 7
related_artist_limit = 7
# Related songs: top tracks of an artist from the same genre. Default: 3
related_genre_limit = 3
# Search terms picked at random when discover is called without a query.
random_terms = ["love", "summer", "night", "life", "dream", "dance", "heart"]

[lyrics]
# Base URL of the lyrics.ovh-compatible lyrics API. Default: "https://api.lyrics.ovh/v1"
base_url = "https://api.lyrics.ovh/v1"

[storage]
# JSON file holding the persisted playlists. Default: "data/playlists_v1.json"
playlists_path = "data/playlists_v1.json"

[genres]
# Tracks kept per genre when building genre samples. Default: 20
sample_size = 20
# Chart tracks labelled by /api/top-plays. Default: 5
top_plays = 5

# Genre taxonomy. Order matters: the first genre whose samples match wins.
[[genres.taxonomy]]
title = "Pop"
value = "pop"

[[genres.taxonomy]]
title = "Hip-Hop"
value = "hip hop"

[[genres.taxonomy]]
title = "Dance"
value = "dance"

[[genres.taxonomy]]
title = "Electronic"
value = "electronic"

[[genres.taxonomy]]
title = "Soul"
value = "soul"

[[genres.taxonomy]]
title = "Alternative"
value = "alternative"

[[genres.taxonomy]]
title = "Rock"
value = "rock"

[[genres.taxonomy]]
title = "Latin"
value = "latin"

[[genres.taxonomy]]
title = "Film"
value = "soundtrack"

[[genres.taxonomy]]
title = "Country"
value = "country"

[[genres.taxonomy]]
title = "Reggae"
value = "reggae"

[[genres.taxonomy]]
title = "House"
value = "house"

[[genres.taxonomy]]
title = "K-Pop"
value = "k-pop""#;

pub fn load_config() -> EffectiveConfig {
    let _ = dotenvy::dotenv();

    let config_paths = ["tunehub.toml", "Tunehub.toml"];
    let config_exists = config_paths.iter().any(|path| std::path::Path::new(path).exists());

    if !config_exists {
        if let Err(e) = std::fs::write("tunehub.toml", DEFAULT_CONFIG_TEMPLATE) {
            tracing::warn!(?e, "Failed to create default config file");
        } else {
            tracing::info!("Created default config file at tunehub.toml");
        }
    }

    let contents = std::fs::read_to_string("tunehub.toml")
        .or_else(|_| std::fs::read_to_string("Tunehub.toml"))
        .unwrap_or_default();

    let mut cfg = parse_config(&contents);
    apply_env_overrides(&mut cfg);
    cfg
}

/// Parses TOML into an effective config. Malformed input falls back to defaults.
pub fn parse_config(contents: &str) -> EffectiveConfig {
    let raw = match toml::from_str::<RawConfig>(contents) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(?e, "Failed to parse tunehub config; using defaults");
            RawConfig::default()
        }
    };

    EffectiveConfig {
        host: raw.server.host,
        port: raw.server.port,
        clean_log_on_start: raw.logging.clean_log_on_start,
        catalog_base_url: raw.catalog.base_url,
        catalog_timeout_ms: raw.catalog.timeout_ms,
        chart_limit: raw.catalog.chart_limit,
        search_limit: raw.catalog.search_limit,
        artist_songs_limit: raw.catalog.artist_songs_limit,
        related_artist_limit: raw.catalog.related_artist_limit,
        related_genre_limit: raw.catalog.related_genre_limit,
        random_terms: raw.catalog.random_terms,
        lyrics_base_url: raw.lyrics.base_url,
        playlists_path: raw.storage.playlists_path,
        genre_sample_size: raw.genres.sample_size,
        top_plays: raw.genres.top_plays,
        genres: raw.genres.taxonomy,
    }
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) {
    if let Ok(v) = std::env::var("TUNEHUB_HOST") {
        cfg.host = v;
    }
    if let Some(v) = std::env::var("TUNEHUB_PORT").ok().and_then(|s| s.parse().ok()) {
        cfg.port = v;
    }
    if let Ok(v) = std::env::var("CATALOG_BASE_URL") {
        cfg.catalog_base_url = v;
    }
    if let Ok(v) = std::env::var("LYRICS_BASE_URL") {
        cfg.lyrics_base_url = v;
    }
    if let Some(v) = std::env::var("CATALOG_TIMEOUT_MS").ok().and_then(|s| s.parse().ok()) {
        cfg.catalog_timeout_ms = v;
    }
    if let Ok(v) = std::env::var("PLAYLISTS_PATH") {
        cfg.playlists_path = v;
    }
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        parse_config("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_matches_defaults() {
        let from_template = parse_config(DEFAULT_CONFIG_TEMPLATE);
        let defaults = EffectiveConfig::default();
        assert_eq!(from_template.port, defaults.port);
        assert_eq!(from_template.catalog_base_url, defaults.catalog_base_url);
        assert_eq!(from_template.random_terms, defaults.random_terms);
        assert_eq!(from_template.genres, defaults.genres);
        assert_eq!(from_template.genre_sample_size, 20);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = parse_config("[server]\nport = 8080\n\n[genres]\ntop_plays = 3\n");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.top_plays, 3);
        assert_eq!(cfg.related_artist_limit, 7);
        assert_eq!(cfg.genres.first().map(|g| g.title.as_str()), Some("Pop"));
    }

    #[test]
    fn malformed_file_falls_back() {
        let cfg = parse_config("[server\nport = ");
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.playlists_path, "data/playlists_v1.json");
    }
}
