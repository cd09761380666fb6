//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use crate::models::{Book, BookInput, BorrowingDetail, Member, MemberInput};

/// Repository trait for the catalog (Book entity)
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books, ordered by title
    async fn find_all(&self) -> Result<Vec<Book>, DomainError>;

    /// Case-insensitive substring search over title, author and ISBN
    async fn search(&self, query: &str) -> Result<Vec<Book>, DomainError>;

    /// Find a single book by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;

    /// The one book whose ISBN contains `isbn`.
    ///
    /// No match is `NotFound`; several matches is a `Conflict`.
    async fn find_by_isbn(&self, isbn: &str) -> Result<Book, DomainError>;

    /// Create a new book with every copy available
    async fn create(&self, input: BookInput) -> Result<Book, DomainError>;

    /// Replace every field of an existing book
    async fn update(&self, id: i32, input: BookInput) -> Result<Book, DomainError>;

    /// Delete a book and, before it, all of its borrowings
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for Member entity
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Member>, DomainError>;

    /// Case-insensitive substring search over name and contact
    async fn search(&self, query: &str) -> Result<Vec<Member>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Member>, DomainError>;

    async fn create(&self, input: MemberInput) -> Result<Member, DomainError>;

    async fn update(&self, id: i32, input: MemberInput) -> Result<Member, DomainError>;

    /// Delete a member and, before it, all of their borrowings
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Which borrowings a listing should include
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BorrowingStatus {
    #[default]
    Active,
    Returned,
    All,
}

impl std::str::FromStr for BorrowingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(BorrowingStatus::Active),
            "returned" => Ok(BorrowingStatus::Returned),
            "all" => Ok(BorrowingStatus::All),
            other => Err(DomainError::validation(format!(
                "unknown borrowing status '{}' (expected active, returned or all)",
                other
            ))),
        }
    }
}

/// Filter criteria for borrowing queries
#[derive(Debug, Default, Clone)]
pub struct BorrowingFilter {
    pub status: BorrowingStatus,
    pub member_id: Option<i32>,
    pub book_id: Option<i32>,
    /// Only borrowings due strictly before this timestamp (storage format)
    pub due_before: Option<String>,
}

/// Data needed to open a borrowing
#[derive(Debug, Clone)]
pub struct NewBorrowing {
    pub book_id: i32,
    pub member_id: i32,
    pub issue_date: String,
    pub due_date: Option<String>,
}

/// Repository trait for the circulation records.
///
/// `open` and `close` keep the book's available-copy count in step with the
/// borrowing rows; each runs in a single transaction.
#[async_trait]
pub trait BorrowingRepository: Send + Sync {
    async fn find_all(&self, filter: BorrowingFilter) -> Result<Vec<BorrowingDetail>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<BorrowingDetail>, DomainError>;

    /// Take one copy off the shelf and record the loan.
    ///
    /// Fails with `NotFound` for an unknown book and `Conflict` when no copy
    /// is available; nothing is written in either case.
    async fn open(&self, borrowing: NewBorrowing) -> Result<BorrowingDetail, DomainError>;

    /// Stamp the return and put the copy back on the shelf.
    ///
    /// Fails with `Conflict` if the borrowing was already returned.
    async fn close(
        &self,
        id: i32,
        return_date: String,
        fine: f64,
    ) -> Result<BorrowingDetail, DomainError>;
}
