//! The canonical, source-agnostic artwork and its identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// One upstream museum open-data API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Chicago,
    Cleveland,
    Harvard,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Chicago, Source::Cleveland, Source::Harvard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Chicago => "chicago",
            Source::Cleveland => "cleveland",
            Source::Harvard => "harvard",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| LookupError::UnknownSource(s.to_string()))
    }
}

/// Requested image resolution tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    Small,
    #[default]
    Medium,
    Large,
    Full,
}

/// A namespaced artwork identifier: `{source}-{original_id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtworkId {
    pub source: Source,
    pub original_id: u64,
}

impl ArtworkId {
    pub fn new(source: Source, original_id: u64) -> Self {
        Self {
            source,
            original_id,
        }
    }
}

impl fmt::Display for ArtworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.original_id)
    }
}

impl FromStr for ArtworkId {
    type Err = LookupError;

    /// Splits on the first `-`. Source names never contain one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (source, original_id) = s
            .split_once('-')
            .ok_or_else(|| LookupError::InvalidId(s.to_string()))?;
        let source: Source = source.parse()?;
        if !original_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LookupError::InvalidId(s.to_string()));
        }
        let original_id = original_id
            .parse()
            .map_err(|_| LookupError::InvalidId(s.to_string()))?;
        Ok(Self::new(source, original_id))
    }
}

/// The unified artwork every source normalizes into.
///
/// Text fields are never absent: a missing upstream value becomes its
/// fallback literal (or an empty string). Only `provenance`, `gallery`
/// and `credit_line` stay optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    pub id: String,
    pub source: Source,
    pub original_id: u64,
    pub title: String,
    pub artist: String,
    pub date: String,
    pub medium: String,
    pub dimensions: String,
    pub image_url: String,
    pub department: String,
    pub classification: String,
    pub culture: String,
    pub origin: String,
    pub description: String,
    pub provenance: Option<String>,
    pub gallery: Option<String>,
    pub credit_line: Option<String>,
    pub is_on_view: bool,
}

impl Artwork {
    pub fn artwork_id(&self) -> ArtworkId {
        ArtworkId::new(self.source, self.original_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_formats_with_source_prefix() {
        let id = ArtworkId::new(Source::Chicago, 27992);
        assert_eq!(id.to_string(), "chicago-27992");
    }

    #[test]
    fn id_round_trips_for_every_source() {
        for source in Source::ALL {
            let id = ArtworkId::new(source, 42);
            let parsed: ArtworkId = id.to_string().parse().unwrap();
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn id_without_separator_is_invalid() {
        let err = "chicago27992".parse::<ArtworkId>().unwrap_err();
        assert!(matches!(err, LookupError::InvalidId(_)));
    }

    #[test]
    fn id_with_non_numeric_suffix_is_invalid() {
        let err = "cleveland-abc".parse::<ArtworkId>().unwrap_err();
        assert!(matches!(err, LookupError::InvalidId(_)));
    }

    #[test]
    fn id_with_negative_number_is_invalid() {
        // "-5" after the first separator is not a valid u64
        let err = "chicago--5".parse::<ArtworkId>().unwrap_err();
        assert!(matches!(err, LookupError::InvalidId(_)));
    }

    #[test]
    fn id_with_unknown_source_is_rejected() {
        let err = "louvre-1".parse::<ArtworkId>().unwrap_err();
        assert!(matches!(err, LookupError::UnknownSource(s) if s == "louvre"));
    }

    #[test]
    fn source_serializes_lowercase() {
        let json = serde_json::to_string(&Source::Cleveland).unwrap();
        assert_eq!(json, "\"cleveland\"");
    }

    #[test]
    fn artwork_serializes_camel_case() {
        let artwork = Artwork {
            id: "harvard-1".to_string(),
            source: Source::Harvard,
            original_id: 1,
            title: "t".to_string(),
            artist: "a".to_string(),
            date: "d".to_string(),
            medium: "m".to_string(),
            dimensions: "x".to_string(),
            image_url: "u".to_string(),
            department: String::new(),
            classification: String::new(),
            culture: String::new(),
            origin: String::new(),
            description: String::new(),
            provenance: None,
            gallery: None,
            credit_line: Some("gift".to_string()),
            is_on_view: true,
        };
        let value = serde_json::to_value(&artwork).unwrap();
        assert_eq!(value["originalId"], 1);
        assert_eq!(value["imageUrl"], "u");
        assert_eq!(value["creditLine"], "gift");
        assert_eq!(value["isOnView"], true);
        assert!(value["provenance"].is_null());
    }
}
