use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: Option<i32>,
    pub copies_total: i32,
    pub copies_available: i32,
    /// Lowercased copies of the searchable fields
    pub title_key: String,
    pub author_key: String,
    pub isbn_key: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::borrowing::Entity")]
    Borrowings,
}

impl Related<super::borrowing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Borrowings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: Option<i32>,
    pub copies_total: i32,
    pub copies_available: i32,
}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            author: model.author,
            isbn: model.isbn,
            publication_year: model.publication_year,
            copies_total: model.copies_total,
            copies_available: model.copies_available,
        }
    }
}

/// Fields accepted when adding or replacing a book.
///
/// `copies_available` is ignored on creation: a new book starts with every copy
/// on the shelf. On update, when omitted, the current count is kept (capped at
/// the new `copies_total`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BookInput {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    pub publication_year: Option<i32>,
    pub copies_total: i32,
    pub copies_available: Option<i32>,
}

impl BookInput {
    /// Checks the fields shared by create and update.
    pub fn validate(&self) -> Result<(), crate::domain::DomainError> {
        use crate::domain::DomainError;

        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title is required"));
        }
        if self.copies_total < 0 {
            return Err(DomainError::validation("copies_total must not be negative"));
        }
        if let Some(year) = self.publication_year
            && year < 0
        {
            return Err(DomainError::validation(
                "publication_year must not be negative",
            ));
        }
        if let Some(available) = self.copies_available
            && !(0..=self.copies_total).contains(&available)
        {
            return Err(DomainError::validation(format!(
                "copies_available must be between 0 and {}",
                self.copies_total
            )));
        }
        Ok(())
    }
}

/// Catalog record pre-filled from a metadata lookup, not yet saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: Option<i32>,
    pub copies_total: i32,
    pub copies_available: i32,
}

impl From<Book> for BookDraft {
    fn from(book: Book) -> Self {
        Self {
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            publication_year: book.publication_year,
            copies_total: book.copies_total,
            copies_available: book.copies_available,
        }
    }
}
