//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};

use crate::domain::{BookRepository, DomainError};
use crate::models::book::{ActiveModel, Column, Entity as BookEntity};
use crate::models::borrowing::{self, Entity as BorrowingEntity};
use crate::models::{Book, BookInput};
use crate::utils::search::fold;
use crate::utils::time::now_db_timestamp;

use super::key_contains;

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self) -> Result<Vec<Book>, DomainError> {
        let books = BookEntity::find()
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<Book>, DomainError> {
        let cond = Condition::any()
            .add(key_contains(Column::TitleKey, query))
            .add(key_contains(Column::AuthorKey, query))
            .add(key_contains(Column::IsbnKey, query));

        let books = BookEntity::find()
            .filter(cond)
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        let book = BookEntity::find_by_id(id).one(&self.db).await?;
        Ok(book.map(Book::from))
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Book, DomainError> {
        let mut matches = BookEntity::find()
            .filter(key_contains(Column::IsbnKey, isbn))
            .all(&self.db)
            .await?;

        tracing::debug!("ISBN search '{}' matched {} book(s)", isbn, matches.len());

        match matches.len() {
            0 => Err(DomainError::not_found(format!("book with isbn {}", isbn))),
            1 => Ok(Book::from(matches.remove(0))),
            _ => Err(DomainError::conflict(format!(
                "multiple books match isbn {}",
                isbn
            ))),
        }
    }

    async fn create(&self, input: BookInput) -> Result<Book, DomainError> {
        let now = now_db_timestamp();

        let new_book = ActiveModel {
            title_key: Set(fold(&input.title)),
            author_key: Set(fold(&input.author)),
            isbn_key: Set(fold(&input.isbn)),
            title: Set(input.title),
            author: Set(input.author),
            isbn: Set(input.isbn),
            publication_year: Set(input.publication_year),
            copies_total: Set(input.copies_total),
            copies_available: Set(input.copies_total),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = new_book.insert(&self.db).await?;
        Ok(Book::from(result))
    }

    async fn update(&self, id: i32, input: BookInput) -> Result<Book, DomainError> {
        // Omitted count: cap the stored value in SQL, never write back a read
        let available: SimpleExpr = match input.copies_available {
            Some(available) => Expr::value(available),
            None => Func::cust(Alias::new("MIN"))
                .arg(Expr::col(Column::CopiesAvailable))
                .arg(Expr::value(input.copies_total))
                .into(),
        };

        let txn = self.db.begin().await?;

        let result = BookEntity::update_many()
            .col_expr(Column::Title, Expr::value(input.title.clone()))
            .col_expr(Column::Author, Expr::value(input.author.clone()))
            .col_expr(Column::Isbn, Expr::value(input.isbn.clone()))
            .col_expr(Column::TitleKey, Expr::value(fold(&input.title)))
            .col_expr(Column::AuthorKey, Expr::value(fold(&input.author)))
            .col_expr(Column::IsbnKey, Expr::value(fold(&input.isbn)))
            .col_expr(Column::PublicationYear, Expr::value(input.publication_year))
            .col_expr(Column::CopiesTotal, Expr::value(input.copies_total))
            .col_expr(Column::CopiesAvailable, available)
            .col_expr(Column::UpdatedAt, Expr::value(now_db_timestamp()))
            .filter(Column::Id.eq(id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found(format!("book {}", id)));
        }

        let updated = BookEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::Internal(format!("book {} vanished", id)))?;

        txn.commit().await?;

        Ok(Book::from(updated))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        let removed = BorrowingEntity::delete_many()
            .filter(borrowing::Column::BookId.eq(id))
            .exec(&txn)
            .await?;

        let result = BookEntity::delete_by_id(id).exec(&txn).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found(format!("book {}", id)));
        }

        txn.commit().await?;

        tracing::info!(
            "Deleted book {} and {} borrowing record(s)",
            id,
            removed.rows_affected
        );
        Ok(())
    }
}
