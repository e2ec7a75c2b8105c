pub mod track;

pub use track::{tracks_from_payload, Track};
