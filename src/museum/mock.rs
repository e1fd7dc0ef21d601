use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{Museum, SourcePage};
use crate::artwork::{Artwork, ArtworkId, ImageSize, Source};
use crate::consts::PLACEHOLDER_IMAGE;
use crate::error::SourceError;

/// A scripted museum for tests. Serves a fixed list of artworks, or fails.
pub struct MockMuseum {
    source: Source,
    artworks: Vec<Artwork>,
    total: Option<u64>,
    fail_with: Option<StatusCode>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

impl MockMuseum {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            artworks: Vec::new(),
            total: None,
            fail_with: None,
            delay: None,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    /// Serve `artworks` from every search, truncated to the requested limit.
    pub fn with_artworks(mut self, artworks: Vec<Artwork>) -> Self {
        self.artworks = artworks;
        self
    }

    /// Report this total instead of the number of artworks served.
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Fail every call with a 503.
    pub fn failing(self) -> Self {
        self.failing_with(StatusCode::SERVICE_UNAVAILABLE)
    }

    pub fn failing_with(mut self, status: StatusCode) -> Self {
        self.fail_with = Some(status);
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `search` or `fetch_one` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// How many calls ran to the end (past any delay) instead of being dropped.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> Result<(), SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        match self.fail_with {
            Some(status) => Err(SourceError::Status {
                museum: self.source,
                status,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Museum for MockMuseum {
    fn source(&self) -> Source {
        self.source
    }

    async fn search(&self, _query: &str, _page: u32, limit: u32) -> Result<SourcePage, SourceError> {
        self.enter().await?;
        let artworks: Vec<Artwork> = self
            .artworks
            .iter()
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(SourcePage {
            total: self.total.unwrap_or(self.artworks.len() as u64),
            artworks,
        })
    }

    async fn fetch_one(&self, id: u64) -> Result<Artwork, SourceError> {
        self.enter().await?;
        self.artworks
            .iter()
            .find(|a| a.original_id == id)
            .cloned()
            .ok_or(SourceError::NotFound {
                museum: self.source,
                id,
            })
    }

    fn image_url(&self, image_ref: Option<&str>, _size: ImageSize) -> String {
        image_ref.map_or_else(|| PLACEHOLDER_IMAGE.to_string(), str::to_string)
    }
}

/// A minimal artwork for tests: every text field filled in from `title` and `date`.
pub fn artwork(source: Source, original_id: u64, title: &str, date: &str) -> Artwork {
    Artwork {
        id: ArtworkId::new(source, original_id).to_string(),
        source,
        original_id,
        title: title.to_string(),
        artist: "Test Artist".to_string(),
        date: date.to_string(),
        medium: "Oil on canvas".to_string(),
        dimensions: "10 × 10 cm".to_string(),
        image_url: PLACEHOLDER_IMAGE.to_string(),
        department: String::new(),
        classification: String::new(),
        culture: String::new(),
        origin: String::new(),
        description: String::new(),
        provenance: None,
        gallery: None,
        credit_line: None,
        is_on_view: false,
    }
}
