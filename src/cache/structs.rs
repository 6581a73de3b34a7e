use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::models::{BggId, GameDetails};
use crate::errors::cache_context;

/// File-based cache for per-game detail payloads
///
/// Detail fetches are the slow part of ingestion (one throttled request
/// per game), so parsed results are kept as JSON keyed by BGG ID and
/// reused on the next ingest unless a refresh is forced.
pub struct DetailsCache {
    cache_dir: PathBuf,
}

impl DetailsCache {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();

        fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;

        Ok(Self { cache_dir })
    }

    pub fn store(&self, game_id: BggId, details: &GameDetails) -> Result<()> {
        let file_path = self.entry_path(game_id);

        let json = serde_json::to_string_pretty(details)
            .with_context(|| cache_context("serialize", game_id))?;
        fs::write(&file_path, json).with_context(|| cache_context("write", game_id))?;

        debug!("Cached details for game {}", game_id);
        Ok(())
    }

    pub fn get(&self, game_id: BggId) -> Result<Option<GameDetails>> {
        let file_path = self.entry_path(game_id);

        if !file_path.exists() {
            return Ok(None);
        }

        let json =
            fs::read_to_string(&file_path).with_context(|| cache_context("read", game_id))?;
        let details = serde_json::from_str(&json)
            .with_context(|| cache_context("deserialize", game_id))?;

        Ok(Some(details))
    }

    pub fn contains(&self, game_id: BggId) -> bool {
        self.entry_path(game_id).exists()
    }

    pub fn clear(&self) -> Result<()> {
        fs::remove_dir_all(&self.cache_dir).context("Failed to clear cache")?;
        fs::create_dir_all(&self.cache_dir).context("Failed to recreate cache directory")?;

        info!("Cleared details cache");
        Ok(())
    }

    fn entry_path(&self, game_id: BggId) -> PathBuf {
        self.cache_dir.join(format!("game_{}.json", game_id))
    }
}
