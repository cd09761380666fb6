//! ISBN lookup: local catalog first, Open Library second

use serde::Serialize;

use crate::domain::{BookRepository, DomainError};
use crate::models::{Book, BookDraft};
use crate::modules::integrations::openlibrary::OpenLibraryClient;

/// Where a lookup result came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", content = "book", rename_all = "lowercase")]
pub enum LookupOutcome {
    /// Already in the catalog
    Local(Book),
    /// Draft built from Open Library, not saved yet
    OpenLibrary(BookDraft),
}

pub async fn lookup_isbn(
    books: &dyn BookRepository,
    client: &OpenLibraryClient,
    isbn: &str,
) -> Result<LookupOutcome, DomainError> {
    let isbn = isbn.trim();
    if isbn.is_empty() {
        return Err(DomainError::validation("isbn is required"));
    }

    match books.find_by_isbn(isbn).await {
        Ok(book) => {
            tracing::debug!("ISBN {} found in local catalog as book {}", isbn, book.id);
            return Ok(LookupOutcome::Local(book));
        }
        Err(DomainError::NotFound(_)) => {}
        Err(DomainError::Conflict(msg)) => {
            tracing::debug!("Local ISBN match ambiguous ({}), asking Open Library", msg);
        }
        Err(e) => return Err(e),
    }

    let draft = client.lookup_isbn(isbn).await.inspect_err(|e| {
        tracing::warn!("ISBN lookup for {} failed: {}", isbn, e);
    })?;

    Ok(LookupOutcome::OpenLibrary(draft))
}
