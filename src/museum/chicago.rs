//! Art Institute of Chicago public API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{Museum, SourcePage, decode, detail_error, send, trim_base};
use crate::artwork::{Artwork, ArtworkId, ImageSize, Source};
use crate::consts::{
    DEFAULT_CHICAGO_BASE_URL, PLACEHOLDER_IMAGE, UNKNOWN_ARTIST, UNKNOWN_DATE,
    UNKNOWN_DIMENSIONS, UNKNOWN_MEDIUM, UNKNOWN_TITLE,
};
use crate::error::SourceError;
use crate::normalize::{description, non_empty, text_or};

/// Field selection sent with every request; the API returns everything otherwise.
const FIELDS: &str = "id,title,artist_display,date_display,medium_display,dimensions,image_id,department_title,artwork_type_title,place_of_origin,description,provenance_text,gallery_title,credit_line,is_on_view";

const IIIF_BASE: &str = "https://www.artic.edu/iiif/2";

#[derive(Debug, Clone)]
pub struct ChicagoConfig {
    pub base_url: String,
}

impl Default for ChicagoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CHICAGO_BASE_URL.to_string(),
        }
    }
}

/// An artwork as the Chicago API returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChicagoArtwork {
    pub id: u64,
    pub title: Option<String>,
    pub artist_display: Option<String>,
    pub date_display: Option<String>,
    pub medium_display: Option<String>,
    pub dimensions: Option<String>,
    pub image_id: Option<String>,
    pub department_title: Option<String>,
    pub artwork_type_title: Option<String>,
    pub place_of_origin: Option<String>,
    pub description: Option<String>,
    pub provenance_text: Option<String>,
    pub gallery_title: Option<String>,
    pub credit_line: Option<String>,
    pub is_on_view: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChicagoPagination {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub struct ChicagoPage {
    #[serde(default)]
    pub pagination: ChicagoPagination,
    #[serde(default)]
    pub data: Vec<ChicagoArtwork>,
}

#[derive(Debug, Deserialize)]
struct ChicagoDetail {
    data: ChicagoArtwork,
}

pub struct Chicago {
    client: Client,
    base_url: String,
}

impl Chicago {
    pub fn new(client: Client, config: ChicagoConfig) -> Self {
        Self {
            client,
            base_url: trim_base(&config.base_url),
        }
    }

    /// Native search. Chicago paginates by page number.
    pub async fn search_records(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<ChicagoPage, SourceError> {
        let url = format!("{}/artworks", self.base_url);
        let mut params = vec![
            ("page", page.to_string()),
            ("limit", limit.to_string()),
            ("fields", FIELDS.to_string()),
        ];
        if !query.is_empty() {
            params.push(("q", query.to_string()));
        }
        debug!(%url, page, limit, "chicago search");

        let resp = send(Source::Chicago, self.client.get(&url).query(&params)).await?;
        if !resp.status().is_success() {
            return Err(SourceError::Status {
                museum: Source::Chicago,
                status: resp.status(),
            });
        }
        decode(Source::Chicago, resp).await
    }

    pub async fn fetch_record(&self, id: u64) -> Result<ChicagoArtwork, SourceError> {
        let url = format!("{}/artworks/{}", self.base_url, id);
        debug!(%url, "chicago detail");

        let resp = send(Source::Chicago, self.client.get(&url).query(&[("fields", FIELDS)])).await?;
        if !resp.status().is_success() {
            return Err(detail_error(Source::Chicago, resp.status(), id));
        }
        let detail: ChicagoDetail = decode(Source::Chicago, resp).await?;
        Ok(detail.data)
    }
}

/// IIIF image URL for a Chicago `image_id`.
pub fn image_url(image_id: Option<&str>, size: ImageSize) -> String {
    let Some(image_id) = image_id.filter(|id| !id.is_empty()) else {
        return PLACEHOLDER_IMAGE.to_string();
    };
    let width = match size {
        ImageSize::Small => "300,",
        ImageSize::Medium => "600,",
        ImageSize::Large => "843,",
        ImageSize::Full => "max",
    };
    format!("{IIIF_BASE}/{image_id}/full/{width}/0/default.jpg")
}

pub fn normalize(record: ChicagoArtwork) -> Artwork {
    let id = ArtworkId::new(Source::Chicago, record.id);
    Artwork {
        id: id.to_string(),
        source: Source::Chicago,
        original_id: record.id,
        title: text_or(record.title, UNKNOWN_TITLE),
        artist: text_or(record.artist_display, UNKNOWN_ARTIST),
        date: text_or(record.date_display, UNKNOWN_DATE),
        medium: text_or(record.medium_display, UNKNOWN_MEDIUM),
        dimensions: text_or(record.dimensions, UNKNOWN_DIMENSIONS),
        image_url: image_url(record.image_id.as_deref(), ImageSize::Medium),
        department: record.department_title.unwrap_or_default(),
        classification: record.artwork_type_title.unwrap_or_default(),
        culture: String::new(),
        origin: record.place_of_origin.unwrap_or_default(),
        description: description(record.description),
        provenance: non_empty(record.provenance_text),
        gallery: non_empty(record.gallery_title),
        credit_line: non_empty(record.credit_line),
        is_on_view: record.is_on_view.unwrap_or(false),
    }
}

#[async_trait]
impl Museum for Chicago {
    fn source(&self) -> Source {
        Source::Chicago
    }

    async fn search(&self, query: &str, page: u32, limit: u32) -> Result<SourcePage, SourceError> {
        let page = self.search_records(query, page, limit).await?;
        Ok(SourcePage {
            total: page.pagination.total,
            artworks: page.data.into_iter().map(normalize).collect(),
        })
    }

    async fn fetch_one(&self, id: u64) -> Result<Artwork, SourceError> {
        self.fetch_record(id).await.map(normalize)
    }

    fn image_url(&self, image_ref: Option<&str>, size: ImageSize) -> String {
        image_url(image_ref, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nighthawks() -> ChicagoArtwork {
        serde_json::from_value(serde_json::json!({
            "id": 111628,
            "title": "Nighthawks",
            "artist_display": "Edward Hopper\nAmerican, 1882–1967",
            "date_display": "1942",
            "medium_display": "Oil on canvas",
            "dimensions": "84.1 × 152.4 cm",
            "image_id": "831a05de-d3f6-f4fa-a460-23008dd58dda",
            "department_title": "Arts of the Americas",
            "artwork_type_title": "Painting",
            "place_of_origin": "United States",
            "description": "<p>Hopper said that <em>Nighthawks</em> was inspired by a restaurant.</p>",
            "provenance_text": null,
            "gallery_title": "Gallery 262",
            "credit_line": "Friends of American Art Collection",
            "is_on_view": true
        }))
        .unwrap()
    }

    #[test]
    fn image_url_tiers() {
        let id = Some("abc");
        assert_eq!(
            image_url(id, ImageSize::Small),
            "https://www.artic.edu/iiif/2/abc/full/300,/0/default.jpg"
        );
        assert_eq!(
            image_url(id, ImageSize::Medium),
            "https://www.artic.edu/iiif/2/abc/full/600,/0/default.jpg"
        );
        assert_eq!(
            image_url(id, ImageSize::Large),
            "https://www.artic.edu/iiif/2/abc/full/843,/0/default.jpg"
        );
        assert_eq!(
            image_url(id, ImageSize::Full),
            "https://www.artic.edu/iiif/2/abc/full/max/0/default.jpg"
        );
    }

    #[test]
    fn image_url_placeholder_when_absent() {
        assert_eq!(image_url(None, ImageSize::Large), PLACEHOLDER_IMAGE);
        assert_eq!(image_url(Some(""), ImageSize::Large), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn normalize_full_record() {
        let artwork = normalize(nighthawks());
        assert_eq!(artwork.id, "chicago-111628");
        assert_eq!(artwork.source, Source::Chicago);
        assert_eq!(artwork.original_id, 111628);
        assert_eq!(artwork.title, "Nighthawks");
        assert_eq!(artwork.date, "1942");
        assert_eq!(artwork.classification, "Painting");
        assert_eq!(artwork.origin, "United States");
        assert_eq!(artwork.culture, "");
        assert_eq!(
            artwork.description,
            "Hopper said that Nighthawks was inspired by a restaurant."
        );
        assert!(artwork.image_url.ends_with("/full/600,/0/default.jpg"));
        assert_eq!(artwork.provenance, None);
        assert_eq!(artwork.gallery.as_deref(), Some("Gallery 262"));
        assert!(artwork.is_on_view);
    }

    #[test]
    fn normalize_sparse_record_uses_fallbacks() {
        let record: ChicagoArtwork = serde_json::from_value(serde_json::json!({ "id": 5 })).unwrap();
        let artwork = normalize(record);
        assert_eq!(artwork.title, UNKNOWN_TITLE);
        assert_eq!(artwork.artist, UNKNOWN_ARTIST);
        assert_eq!(artwork.date, UNKNOWN_DATE);
        assert_eq!(artwork.medium, UNKNOWN_MEDIUM);
        assert_eq!(artwork.dimensions, UNKNOWN_DIMENSIONS);
        assert_eq!(artwork.image_url, PLACEHOLDER_IMAGE);
        assert_eq!(artwork.description, "");
        assert!(!artwork.is_on_view);
    }

    #[test]
    fn normalize_null_fields_use_fallbacks() {
        let record: ChicagoArtwork = serde_json::from_value(serde_json::json!({
            "id": 6,
            "title": null,
            "image_id": null,
            "is_on_view": null
        }))
        .unwrap();
        let artwork = normalize(record);
        assert_eq!(artwork.title, UNKNOWN_TITLE);
        assert_eq!(artwork.image_url, PLACEHOLDER_IMAGE);
        assert!(!artwork.is_on_view);
    }
}
