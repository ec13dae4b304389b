//! Elasticsearch REST response types

use serde::Deserialize;
use serde_json::Value;

/// `_search` / `_search/scroll` response envelope
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// Scroll cursor for the next batch
    #[serde(rename = "_scroll_id", default)]
    pub scroll_id: Option<String>,

    pub hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct HitsEnvelope {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
}

/// `GET /{index}/_doc/{id}` response
#[derive(Debug, Deserialize)]
pub struct GetDocResponse {
    #[serde(default)]
    pub found: bool,

    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_parsing() {
        let body = r#"{
            "_scroll_id": "cursor-1",
            "took": 3,
            "hits": {
                "total": {"value": 2},
                "hits": [
                    {"_index": "discogs_rodney", "_id": "a"},
                    {"_index": "discogs_rodney", "_id": "b"}
                ]
            }
        }"#;

        let parsed: SearchResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.scroll_id.as_deref(), Some("cursor-1"));
        assert_eq!(parsed.hits.hits.len(), 2);
        assert_eq!(parsed.hits.hits[0].id, "a");
    }

    #[test]
    fn test_get_doc_response_parsing() {
        let body = r#"{"_id": "a", "found": true, "_source": {"title": "A"}}"#;

        let parsed: GetDocResponse = serde_json::from_str(body).unwrap();

        assert!(parsed.found);
        assert_eq!(parsed.source.unwrap()["title"], "A");
    }
}
