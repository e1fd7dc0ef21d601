pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;

use crate::artwork::Artwork;

/// The user's curated set of artworks, unique by id, in the order they were added.
#[async_trait]
pub trait Exhibition: Send + Sync {
    /// Add an artwork. Returns `false` if one with the same id is already present.
    async fn add(&self, artwork: Artwork) -> Result<bool>;
    /// Remove by id. Returns `false` if it was not there.
    async fn remove(&self, id: &str) -> Result<bool>;
    async fn clear(&self) -> Result<()>;
    async fn contains(&self, id: &str) -> Result<bool>;
    async fn size(&self) -> Result<usize>;
    async fn artworks(&self) -> Result<Vec<Artwork>>;
}
