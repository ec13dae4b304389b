//! Discogs API response types
//!
//! Data structures for deserializing Discogs collection API responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DiscogsError, Result};

/// Pagination block returned on every collection listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page (1-based)
    pub page: u32,

    /// Total number of pages
    pub pages: u32,

    /// Page size
    pub per_page: u32,

    /// Total number of items in the collection
    pub items: u64,
}

/// `GET /users/{user}/collection/folders/0/releases` response
#[derive(Debug, Deserialize)]
pub struct ReleasesResponse {
    pub pagination: Pagination,

    /// Raw release objects; payloads are indexed verbatim so they are kept
    /// as untyped JSON
    #[serde(default)]
    pub releases: Vec<Value>,
}

/// `GET /users/{user}/collection/folders/0` response
#[derive(Debug, Deserialize)]
pub struct FolderResponse {
    /// Number of items in the folder
    pub count: u64,
}

/// `GET /users/{user}` profile response (token validity check)
#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    /// Only present when the request was made with a valid token belonging
    /// to some account
    #[serde(default)]
    pub email: Option<String>,
}

/// Error body shape returned by the Discogs API
#[derive(Debug, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

/// Fields extracted from a release for identification and diagnostics
#[derive(Debug, Deserialize)]
struct ReleaseFields {
    date_added: String,

    #[serde(default)]
    basic_information: BasicInformation,
}

#[derive(Debug, Default, Deserialize)]
struct BasicInformation {
    #[serde(default)]
    title: String,

    #[serde(default)]
    artists: Vec<ArtistRef>,
}

#[derive(Debug, Deserialize)]
struct ArtistRef {
    name: String,
}

/// One entry of a user's collection
///
/// The `date_added` timestamp is the natural key bridging the remote catalog
/// item and its indexed document; it is assumed unique per item. The full
/// release JSON is carried verbatim as the document body.
#[derive(Debug, Clone)]
pub struct CollectionItem {
    /// Natural key (`date_added` timestamp string)
    pub id: String,

    /// Release title, for log lines only
    pub title: String,

    /// First credited artist, for log lines only
    pub artist: String,

    /// Full release payload, stored in the index untransformed
    pub body: Value,
}

impl CollectionItem {
    /// Build an item from a raw release object.
    ///
    /// # Errors
    ///
    /// Returns a parse error if `date_added` is missing; title and artist
    /// are diagnostics only and fall back to placeholders.
    pub fn from_release(release: Value) -> Result<Self> {
        let fields: ReleaseFields = serde_json::from_value(release.clone())
            .map_err(|e| DiscogsError::ParseError(format!("Malformed release object: {}", e)))?;

        let artist = fields
            .basic_information
            .artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_else(|| "(unknown artist)".to_string());

        let title = if fields.basic_information.title.is_empty() {
            "(untitled)".to_string()
        } else {
            fields.basic_information.title
        };

        Ok(Self {
            id: fields.date_added,
            title,
            artist,
            body: release,
        })
    }
}

/// One fetched page of a collection
#[derive(Debug)]
pub struct CollectionPage {
    pub pagination: Pagination,
    pub items: Vec<CollectionItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_from_release() {
        let release = json!({
            "date_added": "2020-01-01T00:00:00-08:00",
            "rating": 5,
            "basic_information": {
                "title": "Kind of Blue",
                "artists": [{"name": "Miles Davis"}, {"name": "John Coltrane"}]
            }
        });

        let item = CollectionItem::from_release(release.clone()).unwrap();

        assert_eq!(item.id, "2020-01-01T00:00:00-08:00");
        assert_eq!(item.title, "Kind of Blue");
        assert_eq!(item.artist, "Miles Davis");
        assert_eq!(item.body, release);
    }

    #[test]
    fn test_item_missing_natural_key_is_error() {
        let release = json!({"basic_information": {"title": "Untagged"}});

        assert!(CollectionItem::from_release(release).is_err());
    }

    #[test]
    fn test_item_without_diagnostics_uses_placeholders() {
        let release = json!({"date_added": "2021-06-15T12:00:00-08:00"});

        let item = CollectionItem::from_release(release).unwrap();

        assert_eq!(item.title, "(untitled)");
        assert_eq!(item.artist, "(unknown artist)");
    }

    #[test]
    fn test_releases_response_parsing() {
        let body = json!({
            "pagination": {"page": 1, "pages": 2, "per_page": 100, "items": 150},
            "releases": [{"date_added": "2020-01-01T00:00:00-08:00"}]
        });

        let parsed: ReleasesResponse = serde_json::from_value(body).unwrap();

        assert_eq!(parsed.pagination.pages, 2);
        assert_eq!(parsed.pagination.items, 150);
        assert_eq!(parsed.releases.len(), 1);
    }
}
