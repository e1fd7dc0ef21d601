pub mod sort;

use futures::future::join_all;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::artwork::{Artwork, ArtworkId, Source};
use crate::consts::{DEFAULT_LIMIT, DEFAULT_SOURCE_TIMEOUT};
use crate::error::{EngineError, LookupError, SourceError};
use crate::museum::{Museum, MuseumRegistry, SourcePage};

pub use sort::SortBy;

/// Which museums a search fans out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MuseumScope {
    #[default]
    All,
    Only(Source),
}

impl fmt::Display for MuseumScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MuseumScope::All => f.write_str("all"),
            MuseumScope::Only(source) => source.fmt(f),
        }
    }
}

impl FromStr for MuseumScope {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(MuseumScope::All),
            other => other.parse().map(MuseumScope::Only),
        }
    }
}

/// One logical search. `page` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Free text; empty means "browse everything".
    pub query: String,
    pub scope: MuseumScope,
    pub sort_by: SortBy,
    pub limit: u32,
    pub page: u32,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            scope: MuseumScope::All,
            sort_by: SortBy::Relevance,
            limit: DEFAULT_LIMIT,
            page: 1,
        }
    }
}

/// Caller-facing options; anything left out takes the [`SearchRequest`] default.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub query: Option<String>,
    pub museum: Option<MuseumScope>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<SortBy>,
}

impl From<SearchOptions> for SearchRequest {
    fn from(options: SearchOptions) -> Self {
        let defaults = SearchRequest::default();
        Self {
            query: options.query.map(|q| q.trim().to_string()).unwrap_or(defaults.query),
            scope: options.museum.unwrap_or(defaults.scope),
            sort_by: options.sort_by.unwrap_or(defaults.sort_by),
            limit: options.limit.unwrap_or(defaults.limit).max(1),
            page: options.page.unwrap_or(defaults.page).max(1),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub artworks: Vec<Artwork>,
    /// Upstream total for a single source; the number returned otherwise.
    pub total: u64,
    pub page: u32,
    pub sources_queried: Vec<Source>,
}

pub struct EngineConfig {
    /// Applied to every source call; a source that overruns contributes nothing.
    pub source_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }
}

/// Fans a search out to the registered museums and merges what comes back.
pub struct Aggregator {
    registry: MuseumRegistry,
    config: EngineConfig,
}

impl Aggregator {
    pub fn new(registry: MuseumRegistry, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Run one aggregation pass.
    ///
    /// Scope "all" never fails: sources that error or time out are dropped
    /// and the survivors are merged. A single-source scope has nothing to fall
    /// back on, so its error is returned.
    pub async fn aggregate(&self, request: &SearchRequest) -> Result<SearchResult, EngineError> {
        let result = match request.scope {
            MuseumScope::Only(source) => self.aggregate_one(source, request).await?,
            MuseumScope::All => self.aggregate_all(request).await,
        };
        Ok(SearchResult {
            artworks: sort::sort(result.artworks, request.sort_by),
            ..result
        })
    }

    /// [`aggregate`](Self::aggregate) with defaults filled in.
    pub async fn search_artworks(&self, options: SearchOptions) -> Result<SearchResult, EngineError> {
        self.aggregate(&options.into()).await
    }

    async fn aggregate_one(
        &self,
        source: Source,
        request: &SearchRequest,
    ) -> Result<SearchResult, EngineError> {
        let museum = self
            .registry
            .get(source)
            .ok_or(EngineError::Unregistered(source))?;
        let page = search_with_timeout(
            museum,
            request.query.clone(),
            request.page,
            request.limit,
            self.config.source_timeout,
        )
        .await?;

        Ok(SearchResult {
            artworks: dedup_by_id(page.artworks),
            total: page.total,
            page: request.page,
            sources_queried: vec![source],
        })
    }

    async fn aggregate_all(&self, request: &SearchRequest) -> SearchResult {
        let museums = self.registry.museums();
        let sources_queried = self.registry.sources();
        if museums.is_empty() {
            return SearchResult {
                artworks: Vec::new(),
                total: 0,
                page: request.page,
                sources_queried,
            };
        }

        let per_source = request.limit.div_ceil(museums.len() as u32);
        debug!(
            sources = museums.len(),
            per_source,
            query = %request.query,
            "dispatching search"
        );

        // Not spawned: dropping this future cancels every in-flight call.
        let calls: Vec<_> = museums
            .iter()
            .map(|museum| {
                search_with_timeout(
                    Arc::clone(museum),
                    request.query.clone(),
                    request.page,
                    per_source,
                    self.config.source_timeout,
                )
            })
            .collect();

        let outcomes = join_all(calls).await;

        let mut merged = Vec::new();
        for (source, outcome) in sources_queried.iter().zip(outcomes) {
            match outcome {
                Ok(page) => {
                    debug!(%source, count = page.artworks.len(), "source answered");
                    merged.extend(page.artworks);
                }
                Err(e) => warn!(%source, error = %e, "dropping source from results"),
            }
        }

        let artworks = dedup_by_id(merged);
        SearchResult {
            total: artworks.len() as u64,
            artworks,
            page: request.page,
            sources_queried,
        }
    }

    /// Resolve a namespaced id (`chicago-27992`) to one artwork.
    pub async fn lookup(&self, id: &str) -> Result<Artwork, LookupError> {
        let id: ArtworkId = id.parse()?;
        let museum = self
            .registry
            .get(id.source)
            .ok_or(LookupError::Unregistered(id.source))?;
        let timeout = self.config.source_timeout;
        match tokio::time::timeout(timeout, museum.fetch_one(id.original_id)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(SourceError::Timeout {
                museum: id.source,
                after: timeout,
            }
            .into()),
        }
    }

    /// Like [`lookup`](Self::lookup), but any failure is `None`.
    pub async fn get_artwork(&self, id: &str) -> Option<Artwork> {
        match self.lookup(id).await {
            Ok(artwork) => Some(artwork),
            Err(e) => {
                debug!(%id, error = %e, "artwork lookup failed");
                None
            }
        }
    }
}

async fn search_with_timeout(
    museum: Arc<dyn Museum>,
    query: String,
    page: u32,
    limit: u32,
    timeout: Duration,
) -> Result<SourcePage, SourceError> {
    let source = museum.source();
    match tokio::time::timeout(timeout, museum.search(&query, page, limit)).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout {
            museum: source,
            after: timeout,
        }),
    }
}

/// Keep the first artwork for each id, preserving order.
fn dedup_by_id(artworks: Vec<Artwork>) -> Vec<Artwork> {
    let mut seen = HashSet::with_capacity(artworks.len());
    artworks
        .into_iter()
        .filter(|a| {
            let fresh = seen.insert(a.artwork_id());
            if !fresh {
                debug!(id = %a.id, "dropping duplicate artwork");
            }
            fresh
        })
        .collect()
}
