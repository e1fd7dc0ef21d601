//! Cleveland Museum of Art open access API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{Museum, SourcePage, decode, detail_error, send, trim_base};
use crate::artwork::{Artwork, ArtworkId, ImageSize, Source};
use crate::consts::{
    DEFAULT_CLEVELAND_BASE_URL, PLACEHOLDER_IMAGE, UNKNOWN_ARTIST, UNKNOWN_DATE,
    UNKNOWN_DIMENSIONS, UNKNOWN_MEDIUM, UNKNOWN_TITLE,
};
use crate::error::SourceError;
use crate::normalize::{description, non_empty, text_or};

#[derive(Debug, Clone)]
pub struct ClevelandConfig {
    pub base_url: String,
}

impl Default for ClevelandConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CLEVELAND_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Creator {
    pub name: Option<String>,
    /// Live API entries carry the display name here instead of `name`.
    pub description: Option<String>,
}

impl Creator {
    fn display_name(&self) -> Option<String> {
        non_empty(self.name.clone()).or_else(|| non_empty(self.description.clone()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebImage {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageSet {
    pub web: Option<WebImage>,
}

/// An artwork as the Cleveland API returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClevelandArtwork {
    pub id: u64,
    pub title: Option<String>,
    pub creators: Option<Vec<Creator>>,
    pub creation_date: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub images: Option<Vec<ImageSet>>,
    pub department_title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub culture: Option<CultureField>,
    pub provenance: Option<String>,
    pub description: Option<String>,
    pub gallery_title: Option<String>,
    pub accession_number: Option<String>,
    pub is_on_view: Option<bool>,
}

/// `culture` is a plain string in some responses and a list of strings in others.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CultureField {
    One(String),
    Many(Vec<String>),
}

impl CultureField {
    fn into_text(self) -> String {
        match self {
            CultureField::One(s) => s,
            CultureField::Many(list) => list.join("; "),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ClevelandInfo {
    #[serde(alias = "total_count")]
    pub total: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ClevelandPage {
    #[serde(default)]
    pub info: ClevelandInfo,
    #[serde(default)]
    pub data: Vec<ClevelandArtwork>,
}

/// Detail responses are wrapped in `data` by the live API; accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClevelandDetail {
    Wrapped { data: ClevelandArtwork },
    Bare(ClevelandArtwork),
}

pub struct Cleveland {
    client: Client,
    base_url: String,
}

impl Cleveland {
    pub fn new(client: Client, config: ClevelandConfig) -> Self {
        Self {
            client,
            base_url: trim_base(&config.base_url),
        }
    }

    /// Native search. Cleveland paginates by offset: `skip = (page - 1) * limit`.
    pub async fn search_records(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<ClevelandPage, SourceError> {
        let url = format!("{}/artworks", self.base_url);
        let skip = u64::from(page.max(1) - 1) * u64::from(limit);
        let mut params = vec![("limit", limit.to_string()), ("skip", skip.to_string())];
        if !query.is_empty() {
            params.push(("q", query.to_string()));
        }
        debug!(%url, skip, limit, "cleveland search");

        let resp = send(Source::Cleveland, self.client.get(&url).query(&params)).await?;
        if !resp.status().is_success() {
            return Err(SourceError::Status {
                museum: Source::Cleveland,
                status: resp.status(),
            });
        }
        decode(Source::Cleveland, resp).await
    }

    pub async fn fetch_record(&self, id: u64) -> Result<ClevelandArtwork, SourceError> {
        let url = format!("{}/artworks/{}", self.base_url, id);
        debug!(%url, "cleveland detail");

        let resp = send(Source::Cleveland, self.client.get(&url)).await?;
        if !resp.status().is_success() {
            return Err(detail_error(Source::Cleveland, resp.status(), id));
        }
        match decode(Source::Cleveland, resp).await? {
            ClevelandDetail::Wrapped { data } => Ok(data),
            ClevelandDetail::Bare(record) => Ok(record),
        }
    }
}

/// Cleveland serves ready-made URLs, so the reference *is* the URL and the
/// size tier has no effect.
pub fn image_url(web_url: Option<&str>, _size: ImageSize) -> String {
    match web_url.filter(|url| !url.is_empty()) {
        Some(url) => url.to_string(),
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}

/// The first image's web URL, if any.
fn first_web_url(images: Option<&[ImageSet]>) -> Option<&str> {
    images?.first()?.web.as_ref()?.url.as_deref()
}

pub fn normalize(record: ClevelandArtwork) -> Artwork {
    let id = ArtworkId::new(Source::Cleveland, record.id);
    let artist = record
        .creators
        .as_deref()
        .and_then(|creators| creators.first())
        .and_then(Creator::display_name);
    let image = image_url(first_web_url(record.images.as_deref()), ImageSize::Medium);

    Artwork {
        id: id.to_string(),
        source: Source::Cleveland,
        original_id: record.id,
        title: text_or(record.title, UNKNOWN_TITLE),
        artist: text_or(artist, UNKNOWN_ARTIST),
        date: text_or(record.creation_date, UNKNOWN_DATE),
        medium: text_or(record.medium, UNKNOWN_MEDIUM),
        dimensions: text_or(record.dimensions, UNKNOWN_DIMENSIONS),
        image_url: image,
        department: record.department_title.unwrap_or_default(),
        classification: record.kind.unwrap_or_default(),
        culture: record.culture.map(CultureField::into_text).unwrap_or_default(),
        origin: String::new(),
        description: description(record.description),
        provenance: non_empty(record.provenance),
        gallery: non_empty(record.gallery_title),
        credit_line: non_empty(record.accession_number),
        is_on_view: record.is_on_view.unwrap_or(false),
    }
}

#[async_trait]
impl Museum for Cleveland {
    fn source(&self) -> Source {
        Source::Cleveland
    }

    async fn search(&self, query: &str, page: u32, limit: u32) -> Result<SourcePage, SourceError> {
        let page = self.search_records(query, page, limit).await?;
        let returned = page.data.len() as u64;
        Ok(SourcePage {
            total: page.info.total.unwrap_or(returned),
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

    fn record(value: serde_json::Value) -> ClevelandArtwork {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn normalize_picks_first_creator() {
        let artwork = normalize(record(serde_json::json!({
            "id": 135382,
            "title": "Water Lilies (Agapanthus)",
            "creators": [
                {"name": "Claude Monet", "role": "artist"},
                {"name": "Someone Else", "role": "printer"}
            ],
            "creation_date": "c. 1915–1926",
            "type": "Painting",
            "culture": ["France, 20th century"],
            "accession_number": "1960.81",
            "images": [{"web": {"url": "https://openaccess-cdn.clevelandart.org/1960.81/1960.81_web.jpg"}}],
            "is_on_view": true
        })));

        assert_eq!(artwork.id, "cleveland-135382");
        assert_eq!(artwork.artist, "Claude Monet");
        assert_eq!(artwork.classification, "Painting");
        assert_eq!(artwork.culture, "France, 20th century");
        assert_eq!(artwork.credit_line.as_deref(), Some("1960.81"));
        assert_eq!(
            artwork.image_url,
            "https://openaccess-cdn.clevelandart.org/1960.81/1960.81_web.jpg"
        );
        assert_eq!(artwork.origin, "");
        assert!(artwork.is_on_view);
    }

    #[test]
    fn normalize_creator_description_fallback() {
        let artwork = normalize(record(serde_json::json!({
            "id": 1,
            "creators": [{"description": "Katsushika Hokusai (Japanese, 1760–1849)"}]
        })));
        assert_eq!(artwork.artist, "Katsushika Hokusai (Japanese, 1760–1849)");
    }

    #[test]
    fn normalize_empty_creators_uses_fallback() {
        let artwork = normalize(record(serde_json::json!({ "id": 1, "creators": [] })));
        assert_eq!(artwork.artist, UNKNOWN_ARTIST);

        let artwork = normalize(record(serde_json::json!({ "id": 1, "creators": null })));
        assert_eq!(artwork.artist, UNKNOWN_ARTIST);
    }

    #[test]
    fn normalize_missing_images_uses_placeholder() {
        let artwork = normalize(record(serde_json::json!({ "id": 1, "images": [] })));
        assert_eq!(artwork.image_url, PLACEHOLDER_IMAGE);

        let artwork = normalize(record(serde_json::json!({ "id": 1, "images": [{"web": null}] })));
        assert_eq!(artwork.image_url, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn normalize_strips_description_markup() {
        let artwork = normalize(record(serde_json::json!({
            "id": 1,
            "description": "<p>Painted at <b>Giverny</b>.</p>"
        })));
        assert_eq!(artwork.description, "Painted at Giverny.");
    }

    #[test]
    fn culture_accepts_plain_string() {
        let artwork = normalize(record(serde_json::json!({ "id": 1, "culture": "Japan" })));
        assert_eq!(artwork.culture, "Japan");
    }

    #[test]
    fn image_url_ignores_size() {
        assert_eq!(image_url(Some("https://x/y.jpg"), ImageSize::Full), "https://x/y.jpg");
        assert_eq!(image_url(None, ImageSize::Small), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn detail_accepts_wrapped_and_bare() {
        let wrapped: ClevelandDetail =
            serde_json::from_value(serde_json::json!({"data": {"id": 9, "title": "A"}})).unwrap();
        assert!(matches!(wrapped, ClevelandDetail::Wrapped { data } if data.id == 9));

        let bare: ClevelandDetail =
            serde_json::from_value(serde_json::json!({"id": 9, "title": "A"})).unwrap();
        assert!(matches!(bare, ClevelandDetail::Bare(r) if r.id == 9));
    }

    #[test]
    fn page_reads_either_total_field() {
        let page: ClevelandPage =
            serde_json::from_value(serde_json::json!({"info": {"total": 31}, "data": []})).unwrap();
        assert_eq!(page.info.total, Some(31));

        let page: ClevelandPage = serde_json::from_value(
            serde_json::json!({"info": {"total_count": 12}, "data": []}),
        )
        .unwrap();
        assert_eq!(page.info.total, Some(12));
    }
}
