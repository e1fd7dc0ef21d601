//! Harvard Art Museums API.
//!
//! The API needs a key. Search degrades to an empty page when the key is
//! missing or rejected so the rest of the catalogue stays usable; detail
//! lookups still fail loudly.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Museum, SourcePage, decode, detail_error, send, trim_base};
use crate::artwork::{Artwork, ArtworkId, ImageSize, Source};
use crate::consts::{
    DEFAULT_HARVARD_BASE_URL, PLACEHOLDER_IMAGE, UNKNOWN_ARTIST, UNKNOWN_DATE,
    UNKNOWN_DIMENSIONS, UNKNOWN_MEDIUM, UNKNOWN_TITLE,
};
use crate::error::SourceError;
use crate::normalize::{description, non_empty, text_or};

const IIIF_BASE: &str = "https://ids.lib.harvard.edu/ids/iiif";
const DEFAULT_SORT: &str = "rank";
const DEFAULT_SORT_ORDER: &str = "desc";

#[derive(Debug, Clone)]
pub struct HarvardConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for HarvardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HARVARD_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Person {
    pub name: Option<String>,
}

/// An object record as the Harvard API returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarvardArtwork {
    pub id: u64,
    pub title: Option<String>,
    pub artist_display: Option<String>,
    pub people: Option<Vec<Person>>,
    pub dated: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub imageid: Option<u64>,
    pub department: Option<String>,
    pub classification: Option<String>,
    pub culture: Option<String>,
    pub period: Option<String>,
    #[serde(alias = "provenance")]
    pub provenance_text: Option<String>,
    pub description: Option<String>,
    pub gallery_title: Option<String>,
    pub creditline: Option<String>,
    pub on_view_status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HarvardInfo {
    #[serde(alias = "total")]
    pub totalrecords: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HarvardPage {
    #[serde(default, alias = "pagination")]
    pub info: HarvardInfo,
    #[serde(default)]
    pub records: Vec<HarvardArtwork>,
}

pub struct Harvard {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl Harvard {
    pub fn new(client: Client, config: HarvardConfig) -> Self {
        Self {
            client,
            base_url: trim_base(&config.base_url),
            api_key: config.api_key.filter(|k| !k.is_empty()),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn with_headers(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("accept", "application/json");
        match &self.api_key {
            Some(key) => request.header("apikey", key),
            None => request,
        }
    }

    /// Native search. Any non-2xx answer yields an empty page.
    pub async fn search_records(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<HarvardPage, SourceError> {
        let url = format!("{}/objects", self.base_url);
        let mut params = vec![
            ("page", page.to_string()),
            ("size", size.to_string()),
            ("sort", DEFAULT_SORT.to_string()),
            ("sortorder", DEFAULT_SORT_ORDER.to_string()),
        ];
        if !query.is_empty() {
            params.push(("q", query.to_string()));
        }
        debug!(%url, page, size, "harvard search");

        let resp = send(
            Source::Harvard,
            self.with_headers(self.client.get(&url).query(&params)),
        )
        .await?;

        let status = resp.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                warn!(%status, "harvard search rejected, check HARVARD_API_KEY");
            } else {
                warn!(%status, "harvard search failed, returning no results");
            }
            return Ok(HarvardPage::default());
        }
        decode(Source::Harvard, resp).await
    }

    pub async fn fetch_record(&self, id: u64) -> Result<HarvardArtwork, SourceError> {
        let url = format!("{}/object/{}", self.base_url, id);
        debug!(%url, "harvard detail");

        let resp = send(Source::Harvard, self.with_headers(self.client.get(&url))).await?;
        let status = resp.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(SourceError::Auth {
                museum: Source::Harvard,
                status,
            });
        }
        if !status.is_success() {
            return Err(detail_error(Source::Harvard, status, id));
        }
        decode(Source::Harvard, resp).await
    }
}

/// IIIF image URL for a Harvard `imageid`.
pub fn image_url(image_id: Option<&str>, size: ImageSize) -> String {
    let Some(image_id) = image_id.filter(|id| !id.is_empty()) else {
        return PLACEHOLDER_IMAGE.to_string();
    };
    let query = match size {
        ImageSize::Small => "?height=300",
        ImageSize::Medium => "?height=600",
        ImageSize::Large => "?height=1000",
        ImageSize::Full => "",
    };
    format!("{IIIF_BASE}/{image_id}{query}")
}

fn on_view(status: Option<&str>) -> bool {
    status
        .map(str::trim)
        .is_some_and(|s| !s.is_empty() && !s.eq_ignore_ascii_case("not on view"))
}

pub fn normalize(record: HarvardArtwork) -> Artwork {
    let id = ArtworkId::new(Source::Harvard, record.id);
    let artist = non_empty(record.artist_display).or_else(|| {
        record
            .people
            .as_deref()
            .and_then(|people| people.first())
            .and_then(|p| non_empty(p.name.clone()))
    });
    let image_id = record.imageid.map(|id| id.to_string());

    Artwork {
        id: id.to_string(),
        source: Source::Harvard,
        original_id: record.id,
        title: text_or(record.title, UNKNOWN_TITLE),
        artist: text_or(artist, UNKNOWN_ARTIST),
        date: text_or(record.dated, UNKNOWN_DATE),
        medium: text_or(record.medium, UNKNOWN_MEDIUM),
        dimensions: text_or(record.dimensions, UNKNOWN_DIMENSIONS),
        image_url: image_url(image_id.as_deref(), ImageSize::Medium),
        department: record.department.unwrap_or_default(),
        classification: record.classification.unwrap_or_default(),
        culture: record.culture.unwrap_or_default(),
        origin: record.period.unwrap_or_default(),
        description: description(record.description),
        provenance: non_empty(record.provenance_text),
        gallery: non_empty(record.gallery_title),
        credit_line: non_empty(record.creditline),
        is_on_view: on_view(record.on_view_status.as_deref()),
    }
}

#[async_trait]
impl Museum for Harvard {
    fn source(&self) -> Source {
        Source::Harvard
    }

    async fn search(&self, query: &str, page: u32, limit: u32) -> Result<SourcePage, SourceError> {
        let page = self.search_records(query, page, limit).await?;
        Ok(SourcePage {
            total: page.info.totalrecords.unwrap_or(0),
            artworks: page.records.into_iter().map(normalize).collect(),
        })
    }

    async fn fetch_one(&self, id: u64) -> Result<Artwork, SourceError> {
        self.fetch_record(id).await.map(normalize)
    }

    fn image_url(&self, image_ref: Option<&str>, size: ImageSize) -> String {
        image_url(image_ref, size)
    }
}
