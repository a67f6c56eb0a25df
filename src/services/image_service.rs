use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::models::attraction::Attraction;
use crate::services::http::{endpoint, get_json, FetchError};

#[derive(Debug, Default, Deserialize)]
struct PhotoSearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: Option<PhotoUrls>,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
}

/// Looks up representative photos on Unsplash.
#[derive(Clone)]
pub struct ImageService {
    http_client: Client,
    unsplash_url: String,
    access_key: Option<String>,
    concurrency: usize,
}

impl ImageService {
    pub fn new(config: &AppConfig, http_client: Client) -> Self {
        Self {
            http_client,
            unsplash_url: config.unsplash_url.clone(),
            access_key: config.unsplash_access_key.clone(),
            concurrency: config.image_concurrency.max(1),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.access_key.is_some()
    }

    /// First regular-size photo for `query`, or `None` on any failure.
    pub async fn search(&self, query: &str) -> Option<String> {
        match self.fetch_first_photo(query).await {
            Ok(url) => url,
            Err(FetchError::MissingKey(_)) => None,
            Err(e) => {
                log::warn!("Image lookup for '{}' failed: {}", query, e);
                None
            }
        }
    }

    /// Attach a photo to every attraction that lacks one.
    ///
    /// Lookups run with bounded concurrency and keep the input order; a
    /// failed lookup leaves only its own attraction without an image.
    pub async fn enrich(&self, attractions: Vec<Attraction>) -> Vec<Attraction> {
        if !self.is_enabled() {
            return attractions;
        }

        stream::iter(attractions)
            .map(|mut attraction| async move {
                if attraction.image_url.is_none() {
                    attraction.image_url = self.search(&attraction.name).await;
                }
                attraction
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }

    async fn fetch_first_photo(&self, query: &str) -> Result<Option<String>, FetchError> {
        let access_key = self
            .access_key
            .as_deref()
            .ok_or(FetchError::MissingKey("UNSPLASH_ACCESS_KEY"))?;

        // Query pairs are form-encoded, so spaces in names go out as '+'
        let url = endpoint(&self.unsplash_url, "search/photos");
        let response: PhotoSearchResponse = get_json(
            &self.http_client,
            &url,
            &[("query", query), ("per_page", "1"), ("client_id", access_key)],
        )
        .await?;

        Ok(response
            .results
            .into_iter()
            .next()
            .and_then(|photo| photo.urls)
            .and_then(|urls| urls.regular))
    }
}
