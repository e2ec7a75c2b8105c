use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::debug;

use crate::catalog::CatalogClient;
use crate::config::EffectiveConfig;
use crate::model::Track;
use crate::player::PlayerState;
use crate::playlist::{FileSlot, PlaylistSlot, PlaylistStore};

pub mod generation;

pub use generation::{RequestGenerations, Ticket};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<EffectiveConfig>,
    pub catalog: Arc<CatalogClient>,
    pub playlists: Arc<Mutex<PlaylistStore>>,
    pub player: Arc<Mutex<PlayerState>>,
    pub generations: RequestGenerations,
    discover_pool: Arc<Mutex<Vec<Track>>>,
}

impl AppState {
    pub fn new(cfg: EffectiveConfig) -> Result<Self> {
        let slot = FileSlot::new(&cfg.playlists_path);
        Self::with_slot(cfg, Box::new(slot))
    }

    pub fn with_slot(cfg: EffectiveConfig, slot: Box<dyn PlaylistSlot>) -> Result<Self> {
        let catalog = CatalogClient::new(&cfg).context("failed to build catalog client")?;
        Ok(Self {
            cfg: Arc::new(cfg),
            catalog: Arc::new(catalog),
            playlists: Arc::new(Mutex::new(PlaylistStore::open(slot))),
            player: Arc::new(Mutex::new(PlayerState::default())),
            generations: RequestGenerations::new(),
            discover_pool: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub async fn offer_discover_results(&self, ticket: &Ticket, tracks: Vec<Track>) -> bool {
        let mut pool = self.discover_pool.lock().await;
        if !self.generations.is_current(ticket) {
            debug!(generation = ticket.generation(), "superseded discover result not applied");
            return false;
        }
        *pool = tracks;
        true
    }

    pub async fn discover_pool(&self) -> Vec<Track> {
        self.discover_pool.lock().await.clone()
    }
}
