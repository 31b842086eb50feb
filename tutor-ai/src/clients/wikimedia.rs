//! Wikimedia Commons image search client

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use super::{build_http_client, ensure_success, ClientError, ImageSearch};
use crate::models::ImageDescriptor;

pub const DEFAULT_BASE_URL: &str = "https://commons.wikimedia.org/w/api.php";

/// Thumbnail width requested from the image-info API
const THUMB_WIDTH: &str = "800";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<Query>,
}

#[derive(Debug, Deserialize)]
struct Query {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    /// Search rank from the generator
    index: Option<u32>,
    imageinfo: Option<Vec<ImageInfo>>,
}

#[derive(Debug, Deserialize)]
struct ImageInfo {
    url: Option<String>,
    extmetadata: Option<ExtMetadata>,
}

#[derive(Debug, Deserialize)]
struct ExtMetadata {
    #[serde(rename = "ImageDescription")]
    image_description: Option<MetadataField>,
    #[serde(rename = "License")]
    license: Option<MetadataField>,
}

#[derive(Debug, Deserialize)]
struct MetadataField {
    value: Value,
}

impl MetadataField {
    fn into_string(self) -> Option<String> {
        match self.value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }
}

/// Convert a query response into descriptors ordered by search rank
fn into_descriptors(response: QueryResponse) -> Vec<ImageDescriptor> {
    let Some(query) = response.query else {
        return Vec::new();
    };

    let mut pages: Vec<Page> = query.pages.into_values().collect();
    pages.sort_by_key(|p| p.index.unwrap_or(u32::MAX));

    pages
        .into_iter()
        .map(|page| {
            let info = page.imageinfo.and_then(|infos| infos.into_iter().next());
            let (url, metadata) = match info {
                Some(info) => (info.url, info.extmetadata),
                None => (None, None),
            };
            let (description, license) = match metadata {
                Some(m) => (
                    m.image_description.and_then(MetadataField::into_string),
                    m.license.and_then(MetadataField::into_string),
                ),
                None => (None, None),
            };

            ImageDescriptor {
                title: page.title,
                url: url.unwrap_or_default(),
                description,
                license,
            }
        })
        .collect()
}

/// Wikimedia Commons client
pub struct WikimediaClient {
    http_client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl WikimediaClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            base_url,
            timeout,
        })
    }
}

#[async_trait]
impl ImageSearch for WikimediaClient {
    fn name(&self) -> &'static str {
        "wikimedia"
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<ImageDescriptor>, ClientError> {
        // Restrict to files with a "depicts" statement
        let search = format!("{} haswbstatement:P180", term);
        let limit = limit.to_string();
        let params = [
            ("action", "query"),
            ("format", "json"),
            ("generator", "search"),
            ("gsrsearch", search.as_str()),
            ("gsrnamespace", "6"),
            ("gsrlimit", limit.as_str()),
            ("prop", "imageinfo"),
            ("iiprop", "url|extmetadata"),
            ("iiurlwidth", THUMB_WIDTH),
            ("origin", "*"),
        ];

        tracing::debug!(term = term, limit = %limit, "Querying Wikimedia Commons");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.timeout))?;

        let parsed: QueryResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;

        Ok(into_descriptors(parsed))
    }
}
