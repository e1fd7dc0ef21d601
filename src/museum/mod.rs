pub mod chicago;
pub mod cleveland;
pub mod harvard;
pub mod mock;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::artwork::{Artwork, ImageSize, Source};
use crate::error::SourceError;
use chicago::{Chicago, ChicagoConfig};
use cleveland::{Cleveland, ClevelandConfig};
use harvard::{Harvard, HarvardConfig};

/// One page of normalized results from a single source.
#[derive(Debug, Clone, Default)]
pub struct SourcePage {
    pub artworks: Vec<Artwork>,
    /// Total matches reported by the upstream pagination metadata.
    pub total: u64,
}

/// A museum open-data API: can search, can fetch one, can build an image URL.
///
/// Implementations translate the canonical query into their native request,
/// parse the native response and run it through their normalizer.
#[async_trait]
pub trait Museum: Send + Sync {
    fn source(&self) -> Source;

    /// Search one page. `page` is 1-based.
    async fn search(&self, query: &str, page: u32, limit: u32) -> Result<SourcePage, SourceError>;

    /// Fetch a single artwork by its source-native id.
    async fn fetch_one(&self, id: u64) -> Result<Artwork, SourceError>;

    /// Resolve a source-native image reference to a URL. Never does I/O.
    fn image_url(&self, image_ref: Option<&str>, size: ImageSize) -> String;
}

/// Museums keyed by [`Source`], in registration order.
///
/// Registration order is dispatch order: merged results list the first
/// registered museum's artworks first. A reserved museum answers when asked
/// for by name but is left out of the "all" fan-out.
#[derive(Default, Clone)]
pub struct MuseumRegistry {
    museums: Vec<Arc<dyn Museum>>,
    reserved: Vec<Arc<dyn Museum>>,
}

impl MuseumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a museum to the fan-out. Replaces (in place) any museum already
    /// registered for the same source.
    pub fn register(&mut self, museum: Arc<dyn Museum>) {
        let source = museum.source();
        self.reserved.retain(|m| m.source() != source);
        match self.museums.iter_mut().find(|m| m.source() == source) {
            Some(slot) => *slot = museum,
            None => self.museums.push(museum),
        }
    }

    /// Add a museum reachable only by name.
    pub fn reserve(&mut self, museum: Arc<dyn Museum>) {
        let source = museum.source();
        self.museums.retain(|m| m.source() != source);
        self.reserved.retain(|m| m.source() != source);
        self.reserved.push(museum);
    }

    /// Look a museum up by source, reserved ones included.
    pub fn get(&self, source: Source) -> Option<Arc<dyn Museum>> {
        self.museums
            .iter()
            .chain(&self.reserved)
            .find(|m| m.source() == source)
            .map(Arc::clone)
    }

    /// Sources in the fan-out, in dispatch order.
    pub fn sources(&self) -> Vec<Source> {
        self.museums.iter().map(|m| m.source()).collect()
    }

    pub fn museums(&self) -> &[Arc<dyn Museum>] {
        &self.museums
    }

    pub fn len(&self) -> usize {
        self.museums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.museums.is_empty()
    }
}

/// Chicago and Cleveland always fan out. Harvard fans out only when it has
/// an API key; without one it is reserved, so a search naming it still
/// reaches the API and degrades to an empty page.
pub fn standard_registry(
    client: &Client,
    chicago: ChicagoConfig,
    cleveland: ClevelandConfig,
    harvard: HarvardConfig,
) -> MuseumRegistry {
    let mut registry = MuseumRegistry::new();
    registry.register(Arc::new(Chicago::new(client.clone(), chicago)));
    registry.register(Arc::new(Cleveland::new(client.clone(), cleveland)));
    let harvard = Harvard::new(client.clone(), harvard);
    if harvard.has_api_key() {
        registry.register(Arc::new(harvard));
    } else {
        registry.reserve(Arc::new(harvard));
    }
    registry
}

/// Send a request, mapping connection-level failures to [`SourceError::Transport`].
pub(crate) async fn send(museum: Source, request: RequestBuilder) -> Result<Response, SourceError> {
    request
        .send()
        .await
        .map_err(|cause| SourceError::Transport { museum, cause })
}

/// Parse a JSON body, mapping failures to [`SourceError::Decode`].
pub(crate) async fn decode<T: DeserializeOwned>(
    museum: Source,
    response: Response,
) -> Result<T, SourceError> {
    response
        .json()
        .await
        .map_err(|cause| SourceError::Decode { museum, cause })
}

/// Map a non-2xx status on a detail lookup. 404 means the id is unknown.
pub(crate) fn detail_error(museum: Source, status: StatusCode, id: u64) -> SourceError {
    if status == StatusCode::NOT_FOUND {
        SourceError::NotFound { museum, id }
    } else {
        SourceError::Status { museum, status }
    }
}

/// Strip a trailing slash so paths can be appended with `format!`.
pub(crate) fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
