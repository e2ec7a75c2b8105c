//! Best-guess genre labels for tracks the catalog leaves untagged.
//!
//! Each genre keeps a small sample of lower-cased titles and artist names
//! taken from a catalog search for that genre. A track gets the first genre
//! (in taxonomy order) with a sample whose title or artist is a substring of
//! the track's own. The result is advisory and only ever used for display.

use crate::model::track::{Track, UNKNOWN_ARTIST, UNKNOWN_TITLE};

pub const UNKNOWN_GENRE: &str = "Unknown Genre";
pub const DEFAULT_SAMPLE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub title: Option<String>,
    pub artist: Option<String>,
}

impl Sample {
    pub fn new(title: &str, artist: &str) -> Self {
        Self {
            title: lowered(title).filter(|_| title != UNKNOWN_TITLE),
            artist: lowered(artist).filter(|_| artist != UNKNOWN_ARTIST),
        }
    }

    fn matches(&self, title: &str, artist: &str) -> bool {
        let title_hit = matches!(&self.title, Some(t) if !title.is_empty() && title.contains(t.as_str()));
        let artist_hit = matches!(&self.artist, Some(a) if !artist.is_empty() && artist.contains(a.as_str()));
        title_hit || artist_hit
    }
}

fn lowered(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_lowercase())
}

#[derive(Debug, Clone)]
pub struct GenreSamples {
    sample_size: usize,
    genres: Vec<(String, Vec<Sample>)>,
}

impl Default for GenreSamples {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_SIZE)
    }
}

impl GenreSamples {
    pub fn new(sample_size: usize) -> Self {
        Self { sample_size, genres: Vec::new() }
    }

    pub fn insert(&mut self, genre: impl Into<String>, tracks: &[Track]) {
        let samples = tracks.iter().take(self.sample_size).map(|t| Sample::new(&t.title, &t.artist)).collect();
        self.insert_samples(genre, samples);
    }

    pub fn insert_samples(&mut self, genre: impl Into<String>, samples: Vec<Sample>) {
        let genre = genre.into();
        match self.genres.iter_mut().find(|(name, _)| *name == genre) {
            Some((_, existing)) => *existing = samples,
            None => self.genres.push((genre, samples)),
        }
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    /// First matching genre, not the best one.
    pub fn classify(&self, track: &Track) -> &str {
        let title = track.title.to_lowercase();
        let artist = track.artist.to_lowercase();
        self.genres
            .iter()
            .find(|(_, samples)| samples.iter().any(|s| s.matches(&title, &artist)))
            .map(|(name, _)| name.as_str())
            .unwrap_or(UNKNOWN_GENRE)
    }

    pub fn tag(&self, tracks: Vec<Track>) -> Vec<Track> {
        tracks
            .into_iter()
            .map(|mut track| {
                if track.has_default_genre() {
                    track.genre = self.classify(&track).to_string();
                }
                track
            })
            .collect()
    }
}
