//! Open Library client used to pre-fill catalog records from an ISBN.
//!
//! Two calls per lookup: the edition record (`/isbn/{isbn}.json`) and then the
//! first author's record (`/authors/{key}.json`) for a readable name.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::DomainError;
use crate::models::BookDraft;

const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Deserialize)]
struct OpenLibraryEdition {
    title: String,
    #[serde(default)]
    authors: Vec<OpenLibraryKey>,
    publish_date: Option<String>,
    created: Option<OpenLibraryTypedValue>,
}

#[derive(Debug, Deserialize)]
struct OpenLibraryKey {
    key: String,
}

#[derive(Debug, Deserialize)]
struct OpenLibraryTypedValue {
    value: String,
}

#[derive(Debug, Deserialize)]
struct OpenLibraryAuthor {
    name: String,
}

/// Thin HTTP client over the Open Library JSON API
#[derive(Clone, Debug)]
pub struct OpenLibraryClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Wrap an already configured reqwest client
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a catalog draft for `isbn`, defaulting to one copy.
    pub async fn lookup_isbn(&self, isbn: &str) -> Result<BookDraft, DomainError> {
        let edition: OpenLibraryEdition = self
            .get_json(&format!("/isbn/{}.json", urlencoding::encode(isbn)))
            .await?;

        let author = match edition.authors.first() {
            Some(author_ref) => self.fetch_author_name(&author_ref.key).await?,
            None => UNKNOWN_AUTHOR.to_string(),
        };

        let publication_year = edition
            .publish_date
            .as_deref()
            .and_then(extract_year)
            .or_else(|| {
                edition
                    .created
                    .as_ref()
                    .and_then(|c| c.value.get(..4))
                    .and_then(|y| y.parse().ok())
            });

        Ok(BookDraft {
            title: edition.title,
            author,
            isbn: isbn.to_string(),
            publication_year,
            copies_total: 1,
            copies_available: 1,
        })
    }

    async fn fetch_author_name(&self, key: &str) -> Result<String, DomainError> {
        let key = key.trim_start_matches("/authors/");
        let author: OpenLibraryAuthor = self
            .get_json(&format!("/authors/{}.json", urlencoding::encode(key)))
            .await?;

        Ok(author.name)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, DomainError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Open Library request: GET {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| lookup_failed(format!("request to {} failed: {}", url, e)))?;

        if !resp.status().is_success() {
            return Err(lookup_failed(format!(
                "Open Library returned status {} for {}",
                resp.status(),
                url
            )));
        }

        resp.json::<T>()
            .await
            .map_err(|e| lookup_failed(format!("failed to decode {}: {}", url, e)))
    }
}

fn lookup_failed(detail: String) -> DomainError {
    DomainError::External(format!("lookup failed: {}", detail))
}

/// First run of four digits in a free-form date ("March 1965", "1965-03-01").
fn extract_year(date: &str) -> Option<i32> {
    let bytes = date.as_bytes();
    bytes
        .windows(4)
        .enumerate()
        .find(|(i, w)| {
            w.iter().all(u8::is_ascii_digit)
                && !bytes.get(i + 4).is_some_and(u8::is_ascii_digit)
                && (*i == 0 || !bytes[i - 1].is_ascii_digit())
        })
        .and_then(|(i, _)| date[i..i + 4].parse().ok())
}
