//! Music discovery node: a proxy in front of a music catalog and a lyrics
//! API, plus the playlist store, player queue and genre matcher that clients
//! drive over HTTP.

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod genre;
pub mod model;
pub mod player;
pub mod playlist;
pub mod state;
pub mod utils;
